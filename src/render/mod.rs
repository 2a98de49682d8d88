//! HTML rendering for parsed documents.
//!
//! [`render`] walks a [`WordDocument`] once, producing the stylesheet and
//! page nodes together with the resources (images, fonts, HTML chunks) they
//! refer to. Resources are left as slots until [`RenderOutput::finish`]
//! fills them in, so reading and decoding them happens at one join point.
//!
//! # Example
//!
//! ```no_run
//! use dochtml::docx::DocxParser;
//! use dochtml::render::{self, resolve_all, Options};
//!
//! let parser = DocxParser::open("document.docx")?;
//! let doc = parser.parse()?;
//! let options = Options::default();
//!
//! let output = render::render(&doc, &options);
//! let resolved = resolve_all(&output.pending, &parser, &options);
//! let (styles, body) = output.finish(resolved);
//! # Ok::<(), dochtml::Error>(())
//! ```

mod cascade;
mod comments;
mod dom;
mod fields;
mod fonts;
mod html;
mod math;
mod notes;
mod options;
mod page;
mod resources;
mod stylesheet;
mod table;
mod vml;

pub use cascade::{style_class, Cascade, CellFormat, CellPosition, ParagraphFormat, TableFormat};
pub use dom::{HtmlContainer, HtmlElement, Node};
pub use fields::{parse_instruction, FieldKind, FieldState, PageInfo};
pub use html::HtmlRenderer;
pub use options::{FieldMode, Options};
pub use page::{paginate, sections, Page, SectionSlice};
pub use resources::{
    data_url, fetch_all, fill_slots, mime_type, resolve_all, FetchedResource, PartSource,
    PendingResource, ResourceKind, Resources,
};
pub use table::{layout_table, PlacedCell, TableLayout};

#[cfg(feature = "async")]
pub use resources::materialize_all_async;

use crate::model::WordDocument;
use std::collections::HashMap;

/// Rendered document with unresolved resource slots.
#[derive(Debug)]
pub struct RenderOutput {
    /// The `<style>` element
    pub styles: Vec<Node>,
    /// Pages, optionally inside the wrapper
    pub body: Vec<Node>,
    /// Resources referenced by slots in `styles` and `body`
    pub pending: Vec<PendingResource>,
}

impl RenderOutput {
    /// Replace every slot with its resolved node; unresolved slots vanish.
    pub fn finish(self, mut resolved: HashMap<usize, Node>) -> (Vec<Node>, Vec<Node>) {
        let RenderOutput {
            mut styles,
            mut body,
            ..
        } = self;
        fill_slots(&mut styles, &mut resolved);
        fill_slots(&mut body, &mut resolved);
        (styles, body)
    }
}

/// Render a document to stylesheet and page nodes.
pub fn render(doc: &WordDocument, options: &Options) -> RenderOutput {
    let sections = page::sections(&doc.body.root);
    let pages = page::paginate(&sections, options);
    let refs = page::inherited_refs(&sections);

    let mut section_pages = vec![0u32; sections.len()];
    for p in &pages {
        section_pages[p.section] += 1;
    }
    let total_pages = pages.len() as u32;

    let mut renderer = HtmlRenderer::new(doc, options);
    let mut rendered: Vec<Node> = Vec::new();

    for (i, current) in pages.iter().enumerate() {
        let section = &sections[current.section];
        renderer.set_page(PageInfo {
            number: current.number,
            section_pages: section_pages[current.section],
            total_pages,
        });

        let mut el = HtmlElement::new("section")
            .class(&options.class_name)
            .class(&options.class(&format!("sect-{}", current.section + 1)));
        let kind = page::header_kind(current, &section.props, &doc.settings);

        if options.render_headers {
            if let Some(rel_id) = refs[current.section].headers.get(&kind) {
                if let Some(header) = renderer.render_header_footer(rel_id, false) {
                    el.push(header);
                }
            }
        }

        let mut article = HtmlElement::new("article");
        for block in &current.content {
            renderer.render_block(block, None, &mut article.children);
        }
        el.push(article);

        if options.render_footnotes {
            if let Some(notes) = renderer.render_footnotes() {
                el.push(notes);
            }
        }
        if options.render_endnotes && i + 1 == pages.len() {
            if let Some(notes) = renderer.render_endnotes() {
                el.push(notes);
            }
        }
        if let Some(comments) = renderer.render_comments() {
            el.push(comments);
        }

        if options.render_footers {
            if let Some(rel_id) = refs[current.section].footers.get(&kind) {
                if let Some(footer) = renderer.render_header_footer(rel_id, true) {
                    el.push(footer);
                }
            }
        }

        if options.break_pages && i > 0 {
            rendered.push(HtmlElement::new("div").class(&options.class("page-break")).into());
        }
        rendered.push(el.into());
    }

    let body = if options.in_wrapper {
        let mut wrapper = HtmlElement::new("div").class(&options.class("wrapper"));
        wrapper.extend(rendered);
        vec![wrapper.into()]
    } else {
        rendered
    };

    let font_faces = fonts::font_faces(doc, options, renderer.resources_mut());
    let styles = vec![stylesheet::render_stylesheet(doc, options, &sections, font_faces)];

    RenderOutput {
        styles,
        body,
        pending: renderer.into_resources().into_pending(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Relationships;
    use crate::docx::ContentParser;
    use crate::model::DocumentPart;
    use crate::xml::XmlElement;

    fn document(body: &str) -> WordDocument {
        let xml = format!(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        );
        let root = XmlElement::parse(&xml).unwrap();
        let root = ContentParser::new().parse_document(&root);
        WordDocument::new(DocumentPart::new("word/document.xml", root, Relationships::new()))
    }

    fn body_html(output: RenderOutput) -> String {
        let (_, body) = output.finish(HashMap::new());
        let mut out = String::new();
        body.iter().for_each(|n| n.write_html(&mut out));
        out
    }

    #[test]
    fn test_single_page_structure() {
        let doc = document("<w:p><w:r><w:t>Hello</w:t></w:r></w:p>");
        let html = body_html(render(&doc, &Options::default()));
        assert_eq!(
            html,
            r#"<div class="docx-wrapper"><section class="docx docx-sect-1"><article><p><span>Hello</span></p></article></section></div>"#
        );
    }

    #[test]
    fn test_page_breaks_emit_markers() {
        let doc = document(
            r#"<w:p><w:r><w:t>one</w:t></w:r></w:p><w:p><w:r><w:br w:type="page"/><w:t>two</w:t></w:r></w:p>"#,
        );
        let options = Options::default().with_wrapper(false);
        let html = body_html(render(&doc, &options));
        assert_eq!(html.matches("<section").count(), 2);
        assert_eq!(html.matches(r#"class="docx-page-break""#).count(), 1);

        let flowing = body_html(render(&doc, &options.clone().with_break_pages(false)));
        assert_eq!(flowing.matches("<section").count(), 1);
        assert!(!flowing.contains("docx-page-break\""));
    }

    #[test]
    fn test_stylesheet_is_separate() {
        let doc = document("<w:p/>");
        let output = render(&doc, &Options::default());
        assert_eq!(output.styles.len(), 1);
        assert_eq!(output.styles[0].as_element().map(|e| e.tag.as_str()), Some("style"));
        assert!(output.pending.is_empty());
    }
}
