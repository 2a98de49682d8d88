//! # dochtml
//!
//! Render Word (.docx) documents to HTML and CSS.
//!
//! The package is parsed into a typed element tree with style, numbering,
//! font and theme catalogs, then rendered to page `section`s whose formatting
//! is resolved through the Word style cascade and written as inline styles.
//!
//! ## Quick Start
//!
//! ```no_run
//! use dochtml::{to_html, Options};
//!
//! let data = std::fs::read("report.docx")?;
//! let html = to_html(&data, &Options::default())?;
//! std::fs::write("report.html", html)?;
//! # Ok::<(), dochtml::Error>(())
//! ```
//!
//! ## Rendering into containers
//!
//! ```no_run
//! use dochtml::{render_document, HtmlContainer, Options};
//!
//! let data = std::fs::read("report.docx")?;
//! let mut body = HtmlContainer::new();
//! let mut styles = HtmlContainer::new();
//! render_document(&data, &mut body, Some(&mut styles), &Options::default())?;
//! # Ok::<(), dochtml::Error>(())
//! ```
//!
//! ## Features
//!
//! - `async`: resolve images and fonts on a Tokio `JoinSet` ([`render_async`])

pub mod container;
pub mod detect;
pub mod docx;
pub mod error;
pub mod model;
pub mod render;
pub mod units;
pub mod xml;

// Re-exports
pub use container::{OoxmlContainer, Relationship, Relationships};
pub use detect::{detect_from_bytes, detect_from_path, DocumentKind};
pub use error::{Error, Result};
pub use model::{DocumentPart, Element, ElementKind, WordDocument};
pub use render::{FieldMode, HtmlContainer, HtmlElement, Node, Options};

use docx::DocxParser;
use std::path::Path;

fn log_warnings(doc: &WordDocument, options: &Options) {
    if options.debug {
        for warning in &doc.warnings {
            log::warn!("{}", warning);
        }
    }
}

/// Parse a document from bytes without rendering it.
///
/// # Example
///
/// ```no_run
/// use dochtml::{parse_bytes, Options};
///
/// let data = std::fs::read("document.docx")?;
/// let doc = parse_bytes(&data, &Options::default())?;
/// println!("{}", doc.to_json()?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_bytes(data: &[u8], options: &Options) -> Result<WordDocument> {
    let parser = DocxParser::from_bytes(data.to_vec())?.with_debug(options.debug);
    let doc = parser.parse()?;
    log_warnings(&doc, options);
    Ok(doc)
}

/// Parse a document file without rendering it.
pub fn parse_file(path: impl AsRef<Path>, options: &Options) -> Result<WordDocument> {
    let parser = DocxParser::open(path)?.with_debug(options.debug);
    let doc = parser.parse()?;
    log_warnings(&doc, options);
    Ok(doc)
}

/// Store rendered nodes; styles go in front of the body when there is no
/// separate style container.
fn deliver(
    styles: Vec<render::Node>,
    body: Vec<render::Node>,
    body_container: &mut HtmlContainer,
    style_container: Option<&mut HtmlContainer>,
) {
    match style_container {
        Some(container) => {
            container.append(styles);
            body_container.append(body);
        }
        None => {
            body_container.append(body);
            body_container.prepend(styles);
        }
    }
}

/// Render a document into HTML containers.
///
/// Nothing is written to either container unless the conversion succeeds.
///
/// # Errors
///
/// Fails when `data` is not a ZIP archive ([`Error::ZipArchive`]), holds no
/// word-processing document ([`Error::UnknownFormat`]), or its main document
/// cannot be read or parsed. Optional parts and resources that fail are
/// left out of the output instead.
pub fn render_document(
    data: &[u8],
    body: &mut HtmlContainer,
    style: Option<&mut HtmlContainer>,
    options: &Options,
) -> Result<()> {
    let parser = DocxParser::from_bytes(data.to_vec())?.with_debug(options.debug);
    let doc = parser.parse()?;
    log_warnings(&doc, options);

    let output = render::render(&doc, options);
    let resolved = render::resolve_all(&output.pending, &parser, options);
    let (styles, nodes) = output.finish(resolved);

    deliver(styles, nodes, body, style);
    Ok(())
}

/// Async form of [`render_document`].
///
/// Part bytes are read up front; decoding them (base64 encoding, font
/// deobfuscation) runs on Tokio blocking tasks joined once before the
/// containers are written.
#[cfg(feature = "async")]
pub async fn render_async(
    data: Vec<u8>,
    body: &mut HtmlContainer,
    style: Option<&mut HtmlContainer>,
    options: &Options,
) -> Result<()> {
    let (output, fetched) = {
        let parser = DocxParser::from_bytes(data)?.with_debug(options.debug);
        let doc = parser.parse()?;
        log_warnings(&doc, options);

        let mut output = render::render(&doc, options);
        let pending = std::mem::take(&mut output.pending);
        let fetched = render::fetch_all(pending, &parser, options);
        (output, fetched)
    };

    let resolved = render::materialize_all_async(fetched, options).await;
    let (styles, nodes) = output.finish(resolved);

    deliver(styles, nodes, body, style);
    Ok(())
}

/// Convert a document to one HTML fragment: the `<style>` element followed
/// by the pages.
///
/// # Example
///
/// ```no_run
/// use dochtml::{to_html, Options};
///
/// let data = std::fs::read("document.docx")?;
/// let options = Options::default().with_wrapper(false).with_comments(true);
/// let html = to_html(&data, &options)?;
/// # Ok::<(), dochtml::Error>(())
/// ```
pub fn to_html(data: &[u8], options: &Options) -> Result<String> {
    let mut body = HtmlContainer::new();
    render_document(data, &mut body, None, options)?;
    Ok(body.to_html())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_archive_is_fatal() {
        let mut body = HtmlContainer::new();
        let result = render_document(b"plain text", &mut body, None, &Options::default());
        assert!(matches!(result, Err(Error::ZipArchive(_))));
        assert!(body.is_empty());
    }

    #[test]
    fn test_deliver_prepends_styles() {
        let mut body = HtmlContainer::new();
        deliver(
            vec![HtmlElement::new("style").into()],
            vec![HtmlElement::new("div").into()],
            &mut body,
            None,
        );
        assert_eq!(body.to_html(), "<style></style><div></div>");

        let mut body = HtmlContainer::new();
        let mut styles = HtmlContainer::new();
        deliver(
            vec![HtmlElement::new("style").into()],
            vec![HtmlElement::new("div").into()],
            &mut body,
            Some(&mut styles),
        );
        assert_eq!(body.to_html(), "<div></div>");
        assert_eq!(styles.len(), 1);
    }
}
