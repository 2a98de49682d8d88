//! Deferred resources: images, embedded fonts and HTML chunks.
//!
//! The tree walk never reads package parts. It registers a
//! [`PendingResource`] and emits a [`Node::Slot`] in its place; after the
//! walk every pending resource is fetched and decoded, and the slots are
//! replaced in one pass. Failed resources leave no trace in the output.

use super::dom::{HtmlElement, Node};
use super::options::Options;
use crate::container::decode_xml_bytes;
use crate::docx::{fonts::decode_embedded_font, DocxParser};
use crate::error::{Error, Result};
use crate::model::{CssProps, FontVariant};
use crate::units::css_string;
use base64::Engine;
use std::collections::HashMap;

/// Where resource bytes come from.
pub trait PartSource {
    fn read_part(&self, path: &str) -> Result<Vec<u8>>;
}

impl PartSource for DocxParser {
    fn read_part(&self, path: &str) -> Result<Vec<u8>> {
        DocxParser::read_part(self, path)
    }
}

impl PartSource for HashMap<String, Vec<u8>> {
    fn read_part(&self, path: &str) -> Result<Vec<u8>> {
        self.get(path)
            .cloned()
            .ok_or_else(|| Error::MissingComponent(path.to_string()))
    }
}

/// What a slot stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceKind {
    /// A picture; `svg` selects an SVG `image` instead of an HTML `img`
    Image {
        path: String,
        alt: Option<String>,
        css: CssProps,
        svg: bool,
    },
    /// One face of an embedded font, rendered as an `@font-face` rule
    Font {
        family: String,
        variant: FontVariant,
        path: String,
        key: Option<String>,
    },
    /// An embedded HTML part (`w:altChunk`)
    AltChunk { path: String, class: String },
}

/// A resource registered during the tree walk.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingResource {
    pub slot: usize,
    pub kind: ResourceKind,
}

impl PendingResource {
    /// Package path the resource reads.
    pub fn path(&self) -> &str {
        match &self.kind {
            ResourceKind::Image { path, .. }
            | ResourceKind::Font { path, .. }
            | ResourceKind::AltChunk { path, .. } => path,
        }
    }

    /// Whether materializing needs the part bytes.
    pub fn needs_bytes(&self, options: &Options) -> bool {
        match self.kind {
            ResourceKind::Image { .. } => options.use_base64_url,
            ResourceKind::Font { .. } | ResourceKind::AltChunk { .. } => true,
        }
    }

    /// Read the bytes the resource needs, if any.
    pub fn fetch(&self, source: &dyn PartSource, options: &Options) -> Result<Option<Vec<u8>>> {
        if !self.needs_bytes(options) {
            return Ok(None);
        }
        source.read_part(self.path()).map(Some)
    }

    /// Build the output node from fetched bytes.
    pub fn materialize(&self, bytes: Option<Vec<u8>>) -> Result<Node> {
        match &self.kind {
            ResourceKind::Image { path, alt, css, svg } => {
                let src = match bytes {
                    Some(data) => data_url(mime_type(path).unwrap_or("application/octet-stream"), &data),
                    None => path.clone(),
                };
                let node = if *svg {
                    HtmlElement::new("image")
                        .attr("href", src)
                        .attr("width", "100%")
                        .attr("height", "100%")
                        .attr("preserveAspectRatio", "none")
                } else {
                    let mut img = HtmlElement::new("img").attr("src", src);
                    img.set_attr("alt", alt.clone().unwrap_or_default());
                    img.style(css)
                };
                Ok(node.into())
            }
            ResourceKind::Font {
                family,
                variant,
                path,
                key,
            } => {
                let data = bytes.ok_or_else(|| Error::ResourceNotFound(path.clone()))?;
                let key = key
                    .as_deref()
                    .ok_or_else(|| Error::InvalidData(format!("no key for {}", path)))?;
                let font = decode_embedded_font(data, key)?;
                Ok(Node::Text(format!(
                    "@font-face {{ font-family: {}; src: url({}); font-weight: {}; font-style: {}; }}\n",
                    css_string(family),
                    data_url(font_mime(&font), &font),
                    variant.css_weight(),
                    variant.css_style()
                )))
            }
            ResourceKind::AltChunk { path, class } => {
                if !is_html_path(path) {
                    return Err(Error::InvalidData(format!("unsupported chunk type: {}", path)));
                }
                let data = bytes.ok_or_else(|| Error::ResourceNotFound(path.clone()))?;
                let html = decode_xml_bytes(&data)?;
                Ok(HtmlElement::new("iframe")
                    .class(class)
                    .attr("srcdoc", html)
                    .into())
            }
        }
    }
}

/// Collector the tree walk registers resources with.
#[derive(Debug, Default)]
pub struct Resources {
    pending: Vec<PendingResource>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource and return the slot that stands for it.
    pub fn add(&mut self, kind: ResourceKind) -> Node {
        let slot = self.pending.len();
        self.pending.push(PendingResource { slot, kind });
        Node::Slot(slot)
    }

    pub fn pending(&self) -> &[PendingResource] {
        &self.pending
    }

    pub fn into_pending(self) -> Vec<PendingResource> {
        self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

fn report(resource: &PendingResource, err: &Error, options: &Options) {
    if options.debug {
        log::warn!("dropped resource {}: {}", resource.path(), err);
    }
}

/// Fetch and decode every pending resource.
///
/// Returns the node for each slot that resolved; failures are dropped.
pub fn resolve_all(
    pending: &[PendingResource],
    source: &dyn PartSource,
    options: &Options,
) -> HashMap<usize, Node> {
    let mut resolved = HashMap::new();
    for resource in pending {
        match resource
            .fetch(source, options)
            .and_then(|bytes| resource.materialize(bytes))
        {
            Ok(node) => {
                resolved.insert(resource.slot, node);
            }
            Err(err) => report(resource, &err, options),
        }
    }
    resolved
}

/// A resource together with the bytes read for it.
pub type FetchedResource = (PendingResource, Option<Vec<u8>>);

/// Read the bytes of every pending resource.
///
/// Resources whose part cannot be read are dropped here.
pub fn fetch_all(
    pending: Vec<PendingResource>,
    source: &dyn PartSource,
    options: &Options,
) -> Vec<FetchedResource> {
    pending
        .into_iter()
        .filter_map(|resource| match resource.fetch(source, options) {
            Ok(bytes) => Some((resource, bytes)),
            Err(err) => {
                report(&resource, &err, options);
                None
            }
        })
        .collect()
}

/// Decode fetched resources on blocking tasks.
///
/// Decoding (base64 encoding, font deobfuscation) runs on a
/// [`tokio::task::JoinSet`] that is joined once. Slots are keyed, so
/// completion order does not matter.
#[cfg(feature = "async")]
pub async fn materialize_all_async(
    fetched: Vec<FetchedResource>,
    options: &Options,
) -> HashMap<usize, Node> {
    let mut tasks = tokio::task::JoinSet::new();
    for (resource, bytes) in fetched {
        let debug = options.debug;
        tasks.spawn_blocking(move || {
            let result = resource.materialize(bytes);
            if let Err(err) = &result {
                if debug {
                    log::warn!("dropped resource {}: {}", resource.path(), err);
                }
            }
            (resource.slot, result.ok())
        });
    }

    let mut resolved = HashMap::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((slot, Some(node))) => {
                resolved.insert(slot, node);
            }
            Ok((_, None)) => {}
            Err(err) => {
                if options.debug {
                    log::warn!("resource task failed: {}", err);
                }
            }
        }
    }
    resolved
}

/// Replace the slots of a rendered tree with resolved nodes.
pub fn fill_slots(nodes: &mut Vec<Node>, resolved: &mut HashMap<usize, Node>) {
    Node::resolve_slots(nodes, &mut |slot| resolved.remove(&slot));
}

/// `data:` URL for binary content.
pub fn data_url(mime: &str, data: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(data)
    )
}

/// Guess MIME type from file extension.
pub fn mime_type(path: &str) -> Option<&'static str> {
    let ext = std::path::Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())?;

    Some(match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tiff" | "tif" => "image/tiff",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "emf" => "image/x-emf",
        "wmf" => "image/x-wmf",
        _ => return None,
    })
}

fn font_mime(font: &[u8]) -> &'static str {
    match font.get(..4) {
        Some(b"OTTO") => "font/otf",
        Some(b"ttcf") => "font/collection",
        _ => "font/ttf",
    }
}

fn is_html_path(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.ends_with(".htm") || lower.ends_with(".html") || lower.ends_with(".xhtml")
}
