//! Element tree to HTML.
//!
//! [`HtmlRenderer`] walks one document in order, resolving formatting through
//! the [`Cascade`] and writing the result as inline styles. State that spans
//! elements (list counters, open complex fields, note and comment numbering,
//! pending resources) lives on the renderer for the duration of one render.

use super::cascade::{style_class, Cascade, CellFormat, CellPosition};
use super::comments::{self, CommentTracker};
use super::dom::{HtmlElement, Node};
use super::fields::{parse_instruction, FieldState, PageInfo};
use super::math::render_math;
use super::notes::{note_item, note_list, NoteKind, NoteTracker};
use super::options::{FieldMode, Options};
use super::resources::{ResourceKind, Resources};
use super::table;
use super::vml::{render_vml, VmlContext};
use crate::model::{
    BreakType, ChangeInfo, CssProps, DocumentPart, Element, ElementKind, LevelSuffix,
    NumberingCounters, NumberingRef, StyleType, WordDocument,
};
use crate::units::css_string;

const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// Renders the elements of one document to HTML nodes.
pub struct HtmlRenderer<'a> {
    doc: &'a WordDocument,
    options: &'a Options,
    cascade: Cascade<'a>,
    /// Part whose relationships resolve links and images
    part: &'a DocumentPart,
    counters: NumberingCounters,
    fields: FieldState,
    notes: NoteTracker,
    comments: CommentTracker,
    resources: Resources,
    page: PageInfo,
}

impl<'a> HtmlRenderer<'a> {
    pub fn new(doc: &'a WordDocument, options: &'a Options) -> Self {
        Self {
            doc,
            options,
            cascade: Cascade::new(&doc.styles, &doc.numbering),
            part: &doc.body,
            counters: NumberingCounters::new(),
            fields: FieldState::new(options.field_mode),
            notes: NoteTracker::new(),
            comments: CommentTracker::new(),
            resources: Resources::new(),
            page: PageInfo {
                number: 1,
                section_pages: 1,
                total_pages: 1,
            },
        }
    }

    /// Page numbers used by computed fields from now on.
    pub fn set_page(&mut self, page: PageInfo) {
        self.page = page;
    }

    pub fn resources_mut(&mut self) -> &mut Resources {
        &mut self.resources
    }

    pub fn into_resources(self) -> Resources {
        self.resources
    }

    /// Render with another part's relationships and a fresh field state.
    fn with_part<R>(&mut self, part: &'a DocumentPart, render: impl FnOnce(&mut Self) -> R) -> R {
        let part = std::mem::replace(&mut self.part, part);
        let fields = std::mem::replace(&mut self.fields, FieldState::new(self.options.field_mode));
        let result = render(self);
        self.part = part;
        self.fields = fields;
        result
    }

    fn style_class_of(&self, id: Option<&str>, style_type: StyleType) -> Option<String> {
        let styles = &self.doc.styles;
        let style = match id.and_then(|id| styles.get(id)) {
            Some(style) => style,
            None => styles.default_style(style_type)?,
        };
        Some(style_class(&self.options.class_name, &style.id))
    }

    /// Comment markup is only emitted for comments the comments part holds.
    fn has_comment(&self, id: &str) -> bool {
        self.options.render_comments && self.doc.comment(id).is_some()
    }

    fn tab(&self) -> Node {
        HtmlElement::new("span").class(&self.options.class("tab")).into()
    }

    // ---- blocks ----

    pub fn render_blocks(&mut self, elements: &[Element], cell: Option<&CellFormat>) -> Vec<Node> {
        let mut out = Vec::new();
        for el in elements {
            self.render_block(el, cell, &mut out);
        }
        out
    }

    pub fn render_block(&mut self, el: &Element, cell: Option<&CellFormat>, out: &mut Vec<Node>) {
        match &el.kind {
            ElementKind::Paragraph(_) => out.push(self.render_paragraph(el, cell)),
            ElementKind::Table(_) => out.push(self.render_table(el)),
            ElementKind::AltChunk { rel_id } => {
                if !self.options.render_alt_chunks {
                    return;
                }
                if let Some(path) = self.part.resolve_target(rel_id) {
                    out.push(self.resources.add(ResourceKind::AltChunk {
                        path,
                        class: self.options.class("altchunk"),
                    }));
                }
            }
            ElementKind::Math { .. } => out.push(render_math(el)),
            ElementKind::Inserted(info) => {
                if self.options.render_changes {
                    let mut ins = self.change_element("ins", "inserted", info);
                    for child in &el.children {
                        self.render_block(child, cell, &mut ins.children);
                    }
                    out.push(ins.into());
                } else {
                    for child in &el.children {
                        self.render_block(child, cell, out);
                    }
                }
            }
            ElementKind::Deleted(info) => {
                if self.options.render_changes {
                    let mut del = self.change_element("del", "deleted", info);
                    for child in &el.children {
                        self.render_block(child, cell, &mut del.children);
                    }
                    out.push(del.into());
                }
            }
            _ => {
                let base = self.doc.styles.defaults.run.clone();
                self.render_inline_element(el, &base, out);
            }
        }
    }

    pub fn render_paragraph(&mut self, el: &Element, cell: Option<&CellFormat>) -> Node {
        let format = self.cascade.paragraph(el, cell);
        let tag = match format.outline_level {
            Some(level) if level < 6 => format!("h{}", level + 1),
            _ => "p".to_string(),
        };

        let mut p = HtmlElement::new(tag);
        if let Some(class) = self.style_class_of(el.style_id.as_deref(), StyleType::Paragraph) {
            p.add_class(&class);
        }
        p.set_style(&format.css);

        if let Some(numbering) = &format.numbering {
            if let Some(marker) = self.numbering_marker(numbering, &format.run) {
                p.extend(marker);
            }
        }

        let mut children = Vec::new();
        self.render_inline(&el.children, &format.run, &mut children);
        if self.options.render_comments {
            comments::wrap_comment_ranges(&mut children, self.options);
        }
        p.extend(children);
        p.into()
    }

    fn numbering_marker(&mut self, numbering: &NumberingRef, run: &CssProps) -> Option<Vec<Node>> {
        let level = self.cascade.level(numbering)?;
        let text = self
            .counters
            .next_marker(&self.doc.numbering, &numbering.id, numbering.level)?;
        let css = self.cascade.marker(level, run);

        let mut nodes = vec![HtmlElement::new("span")
            .class(&self.options.class("num"))
            .style(&css)
            .text(text)
            .into()];
        match level.suffix {
            LevelSuffix::Tab => nodes.push(self.tab()),
            LevelSuffix::Space => nodes.push(Node::text(" ")),
            LevelSuffix::Nothing => {}
        }
        Some(nodes)
    }

    pub fn render_table(&mut self, el: &Element) -> Node {
        let format = self.cascade.table(el);
        let layout = table::layout_table(el);

        let mut html_table = HtmlElement::new("table");
        if let Some(class) = self.style_class_of(el.style_id.as_deref(), StyleType::Table) {
            html_table.add_class(&class);
        }
        html_table.set_style(&format.css);

        let widths = table::column_widths(el, &layout);
        if widths.iter().any(Option::is_some) {
            let mut colgroup = HtmlElement::new("colgroup");
            for width in widths {
                let mut col = HtmlElement::new("col");
                if let Some(width) = width {
                    col.set_attr("style", format!("width: {}", width));
                }
                colgroup.push(col);
            }
            html_table.push(colgroup);
        }

        for (r, (row, props)) in table::rows(el).enumerate() {
            let mut tr = HtmlElement::new("tr");
            if props.is_header {
                tr.add_class(&self.options.class("header-row"));
            }
            let row_position = CellPosition {
                row: r,
                col: 0,
                rows: layout.rows,
                cols: layout.columns,
            };
            tr.set_style(&self.cascade.row(&format, row_position, row));

            for placed in layout.row(r) {
                let Some(cell) = row.children.get(placed.index) else {
                    continue;
                };
                let position = CellPosition {
                    row: r,
                    col: placed.col,
                    rows: layout.rows,
                    cols: layout.columns,
                };
                let (css, content) = self.cascade.cell(&format, position, cell);
                let mut td = HtmlElement::new("td");
                if placed.colspan > 1 {
                    td.set_attr("colspan", placed.colspan.to_string());
                }
                if placed.rowspan > 1 {
                    td.set_attr("rowspan", placed.rowspan.to_string());
                }
                td.set_style(&css);
                td.extend(self.render_blocks(&cell.children, Some(&content)));
                tr.push(td);
            }
            html_table.push(tr);
        }
        html_table.into()
    }

    // ---- inline content ----

    fn render_inline(&mut self, elements: &[Element], base: &CssProps, out: &mut Vec<Node>) {
        for el in elements {
            self.render_inline_element(el, base, out);
        }
    }

    fn render_inline_element(&mut self, el: &Element, base: &CssProps, out: &mut Vec<Node>) {
        match &el.kind {
            ElementKind::Run => self.render_run(el, base, out),
            ElementKind::Hyperlink {
                rel_id,
                anchor,
                tooltip,
            } => {
                let target = rel_id.as_deref().and_then(|id| {
                    self.part
                        .external_target(id)
                        .map(String::from)
                        .or_else(|| self.part.resolve_target(id))
                });
                let href = match (target, anchor) {
                    (Some(target), Some(anchor)) => Some(format!("{}#{}", target, anchor)),
                    (Some(target), None) => Some(target),
                    (None, Some(anchor)) => Some(format!("#{}", anchor)),
                    (None, None) => None,
                };
                let mut a = HtmlElement::new("a");
                if let Some(href) = href {
                    a.set_attr("href", href);
                }
                if let Some(tooltip) = tooltip {
                    a.set_attr("title", tooltip.clone());
                }
                self.render_inline(&el.children, base, &mut a.children);
                out.push(a.into());
            }
            ElementKind::BookmarkStart { name, .. } => {
                if !name.is_empty() && name != "_GoBack" {
                    out.push(
                        HtmlElement::new("span")
                            .attr("id", name.clone())
                            .class(&self.options.class("bookmark"))
                            .into(),
                    );
                }
            }
            ElementKind::BookmarkEnd { .. } => {}
            ElementKind::SimpleField { instruction } => {
                let kind = parse_instruction(instruction);
                if self.options.field_mode == FieldMode::Live {
                    if let Some(value) = self.page.value(&kind) {
                        let css = match el.children.iter().find(|c| matches!(c.kind, ElementKind::Run)) {
                            Some(run) => self.cascade.run(run, base),
                            None => base.clone(),
                        };
                        out.push(HtmlElement::new("span").style(&css).text(value).into());
                        return;
                    }
                    if let Some(href) = kind.href() {
                        let mut a = HtmlElement::new("a").attr("href", href);
                        self.render_inline(&el.children, base, &mut a.children);
                        out.push(a.into());
                        return;
                    }
                }
                self.render_inline(&el.children, base, out);
            }
            ElementKind::Inserted(info) => {
                if self.options.render_changes {
                    let mut ins = self.change_element("ins", "inserted", info);
                    self.render_inline(&el.children, base, &mut ins.children);
                    out.push(ins.into());
                } else {
                    self.render_inline(&el.children, base, out);
                }
            }
            ElementKind::Deleted(info) => {
                if self.options.render_changes {
                    let mut del = self.change_element("del", "deleted", info);
                    self.render_inline(&el.children, base, &mut del.children);
                    out.push(del.into());
                }
            }
            ElementKind::CommentRangeStart { id } => {
                if self.has_comment(id) {
                    self.comments.number(id);
                    out.push(comments::range_start(id, self.options));
                }
            }
            ElementKind::CommentRangeEnd { id } => {
                if self.has_comment(id) {
                    out.push(comments::range_end(id, self.options));
                }
            }
            ElementKind::FieldChar { .. } | ElementKind::InstrText { .. } => {
                // field characters outside a run still drive the field state
                self.render_run_content(std::slice::from_ref(el), base, None, out);
            }
            ElementKind::Paragraph(_) | ElementKind::Table(_) | ElementKind::AltChunk { .. } => {
                self.render_block(el, None, out)
            }
            _ => {
                if !self.fields.hides_content() {
                    out.extend(self.render_run_child(el, base));
                }
            }
        }
    }

    fn change_element(&self, tag: &str, suffix: &str, info: &ChangeInfo) -> HtmlElement {
        let mut el = HtmlElement::new(tag).class(&self.options.class(suffix));
        if info.moved {
            el.add_class(&self.options.class("moved"));
        }
        if let Some(author) = &info.author {
            el.set_attr("data-author", author.clone());
        }
        if let Some(date) = &info.date {
            el.set_attr("data-date", date.clone());
        }
        el
    }

    fn render_run(&mut self, el: &Element, base: &CssProps, out: &mut Vec<Node>) {
        let css = self.cascade.run(el, base);
        let class = el
            .style_id
            .as_deref()
            .filter(|id| self.doc.styles.get(id).is_some())
            .map(|id| style_class(&self.options.class_name, id));
        let style = RunStyle {
            css: &css,
            class: class.as_deref(),
        };
        self.render_run_content(&el.children, &css, Some(style), out);
    }

    /// Render the children of a run, tracking complex fields.
    ///
    /// Visible content is grouped into spans; content inside the result of
    /// a linking field (live mode) is wrapped in `a`.
    fn render_run_content(
        &mut self,
        children: &[Element],
        css: &CssProps,
        style: Option<RunStyle<'_>>,
        out: &mut Vec<Node>,
    ) {
        let mut pending: Vec<Node> = Vec::new();
        let mut link: Option<String> = None;

        for child in children {
            match &child.kind {
                ElementKind::FieldChar { char_type } => {
                    flush_run(&mut pending, style, link.as_deref(), out);
                    let value = match char_type {
                        crate::model::FieldCharType::Begin => {
                            self.fields.begin();
                            None
                        }
                        crate::model::FieldCharType::Separate => self.fields.separate(&self.page),
                        crate::model::FieldCharType::End => self.fields.end(&self.page),
                    };
                    if let Some(value) = value {
                        let target = self.fields.link();
                        pending.push(Node::Text(value));
                        flush_run(&mut pending, style, target.as_deref(), out);
                    }
                    link = None;
                }
                ElementKind::InstrText { text } => self.fields.instruction(text),
                _ => {
                    if self.fields.hides_content() {
                        continue;
                    }
                    let current = self.fields.link();
                    if current != link {
                        flush_run(&mut pending, style, link.as_deref(), out);
                        link = current;
                    }
                    pending.extend(self.render_run_child(child, css));
                }
            }
        }
        flush_run(&mut pending, style, link.as_deref(), out);
    }

    fn render_run_child(&mut self, el: &Element, css: &CssProps) -> Vec<Node> {
        match &el.kind {
            ElementKind::Text { text } => vec![Node::text(text.clone())],
            ElementKind::DeletedText { text } => {
                if self.options.render_changes {
                    vec![Node::text(text.clone())]
                } else {
                    Vec::new()
                }
            }
            ElementKind::Tab => vec![self.tab()],
            ElementKind::Break { break_type } => match break_type {
                BreakType::TextWrapping => vec![HtmlElement::new("br").into()],
                BreakType::Page if !self.options.break_pages => {
                    vec![HtmlElement::new("br").class(&self.options.class("break")).into()]
                }
                _ => Vec::new(),
            },
            ElementKind::Symbol { font, char_code } => symbol(font.as_deref(), char_code)
                .map(|node| vec![node])
                .unwrap_or_default(),
            ElementKind::NoBreakHyphen => vec![Node::text("\u{2011}")],
            ElementKind::SoftHyphen => vec![Node::text("\u{ad}")],
            ElementKind::FootnoteReference { id } => {
                if self.options.render_footnotes && self.doc.footnote(id).is_some() {
                    vec![self.notes.reference(NoteKind::Footnote, id, self.options)]
                } else {
                    Vec::new()
                }
            }
            ElementKind::EndnoteReference { id } => {
                if self.options.render_endnotes && self.doc.endnote(id).is_some() {
                    vec![self.notes.reference(NoteKind::Endnote, id, self.options)]
                } else {
                    Vec::new()
                }
            }
            ElementKind::CommentReference { id } => {
                if self.has_comment(id) {
                    let number = self.comments.number(id);
                    vec![comments::reference(id, number, self.options)]
                } else {
                    Vec::new()
                }
            }
            ElementKind::Drawing { .. } => self.render_drawing(el),
            ElementKind::Vml(_) => render_vml(el, self).into_iter().collect(),
            ElementKind::Math { .. } => vec![render_math(el)],
            ElementKind::Run => {
                let mut out = Vec::new();
                self.render_run(el, css, &mut out);
                out
            }
            ElementKind::Hyperlink { .. }
            | ElementKind::BookmarkStart { .. }
            | ElementKind::SimpleField { .. }
            | ElementKind::Inserted(_)
            | ElementKind::Deleted(_)
            | ElementKind::CommentRangeStart { .. }
            | ElementKind::CommentRangeEnd { .. }
            | ElementKind::Paragraph(_)
            | ElementKind::Table(_) => {
                let mut out = Vec::new();
                self.render_inline_element(el, css, &mut out);
                out
            }
            _ => Vec::new(),
        }
    }

    fn render_drawing(&mut self, el: &Element) -> Vec<Node> {
        let mut images = Vec::new();
        for child in &el.children {
            if let ElementKind::Image { rel_id, alt } = &child.kind {
                if let Some(node) = self.image_node(rel_id, alt.clone(), child.css.clone(), false) {
                    images.push(node);
                }
            }
        }
        if images.is_empty() || el.css.is_empty() {
            return images;
        }
        let mut span = HtmlElement::new("span")
            .class(&self.options.class("drawing"))
            .style(&el.css);
        span.extend(images);
        vec![span.into()]
    }

    /// An image node: a resource slot for package parts, a plain `img` for
    /// linked external pictures.
    fn image_node(&mut self, rel_id: &str, alt: Option<String>, css: CssProps, svg: bool) -> Option<Node> {
        if let Some(url) = self.part.external_target(rel_id) {
            let node = if svg {
                HtmlElement::new("image")
                    .attr("href", url)
                    .attr("width", "100%")
                    .attr("height", "100%")
            } else {
                HtmlElement::new("img")
                    .attr("src", url)
                    .attr("alt", alt.unwrap_or_default())
                    .style(&css)
            };
            return Some(node.into());
        }
        let path = self.part.resolve_target(rel_id)?;
        Some(self.resources.add(ResourceKind::Image {
            path,
            alt,
            css,
            svg,
        }))
    }

    // ---- page furniture ----

    /// The header or footer part behind a relationship id.
    pub fn render_header_footer(&mut self, rel_id: &str, footer: bool) -> Option<Node> {
        let doc = self.doc;
        let part = if footer {
            doc.footers.get(rel_id)
        } else {
            doc.headers.get(rel_id)
        }?;
        let body = self.with_part(part, |r| r.render_blocks(part.children(), None));
        let mut el = HtmlElement::new(if footer { "footer" } else { "header" });
        el.extend(body);
        Some(el.into())
    }

    /// Footnotes referenced since the last call, as a list.
    pub fn render_footnotes(&mut self) -> Option<Node> {
        let entries = self.notes.take_page_footnotes();
        self.render_note_list(NoteKind::Footnote, entries)
    }

    /// Every endnote referenced so far, as a list.
    pub fn render_endnotes(&mut self) -> Option<Node> {
        let entries = self.notes.take_endnotes();
        self.render_note_list(NoteKind::Endnote, entries)
    }

    fn render_note_list(&mut self, kind: NoteKind, entries: Vec<super::notes::NoteEntry>) -> Option<Node> {
        if entries.is_empty() {
            return None;
        }
        let doc = self.doc;
        let part = match kind {
            NoteKind::Footnote => doc.footnotes.as_ref(),
            NoteKind::Endnote => doc.endnotes.as_ref(),
        }?;

        let mut items = Vec::new();
        for entry in &entries {
            let note = match kind {
                NoteKind::Footnote => doc.footnote(&entry.id),
                NoteKind::Endnote => doc.endnote(&entry.id),
            };
            let Some(note) = note else {
                continue;
            };
            let body = self.with_part(part, |r| r.render_blocks(&note.children, None));
            items.push(note_item(kind, entry, body, self.options));
        }
        (!items.is_empty()).then(|| note_list(kind, items, self.options))
    }

    /// Comments referenced since the last call, as an `aside`.
    pub fn render_comments(&mut self) -> Option<Node> {
        if !self.options.render_comments {
            return None;
        }
        let ids = self.comments.take_page();
        let doc = self.doc;
        let part = doc.comments.as_ref()?;

        let mut items = Vec::new();
        for (id, number) in ids {
            let Some(comment) = doc.comment(&id) else {
                continue;
            };
            let ElementKind::Comment(info) = &comment.kind else {
                continue;
            };
            let body = self.with_part(part, |r| r.render_blocks(&comment.children, None));
            items.push(comments::comment_item(info, number, body, self.options));
        }
        (!items.is_empty()).then(|| comments::comment_list(items, self.options))
    }
}

impl VmlContext for HtmlRenderer<'_> {
    fn image(&mut self, rel_id: &str) -> Option<Node> {
        self.image_node(rel_id, None, CssProps::new(), true)
    }

    fn text_box(&mut self, content: &[Element]) -> Node {
        let mut div = HtmlElement::new("div")
            .attr("xmlns", XHTML_NS)
            .class(&self.options.class("textbox"));
        div.extend(self.render_blocks(content, None));
        div.into()
    }
}

/// Formatting of the span a run's content is grouped into.
#[derive(Debug, Clone, Copy)]
struct RunStyle<'s> {
    css: &'s CssProps,
    class: Option<&'s str>,
}

fn flush_run(pending: &mut Vec<Node>, style: Option<RunStyle<'_>>, link: Option<&str>, out: &mut Vec<Node>) {
    if pending.is_empty() {
        return;
    }
    let content: Vec<Node> = match style {
        Some(style) => {
            let mut span = HtmlElement::new("span");
            if let Some(class) = style.class {
                span.add_class(class);
            }
            span.set_style(style.css);
            span.extend(pending.drain(..));
            vec![span.into()]
        }
        None => pending.drain(..).collect(),
    };
    match link {
        Some(href) => {
            let mut a = HtmlElement::new("a").attr("href", href);
            a.extend(content);
            out.push(a.into());
        }
        None => out.extend(content),
    }
}

/// A `w:sym` character. Symbol fonts use the private-use range
/// `F000`-`F0FF` for their single-byte code points.
fn symbol(font: Option<&str>, char_code: &str) -> Option<Node> {
    let mut code = u32::from_str_radix(char_code.trim(), 16).ok()?;
    if (0xF000..=0xF0FF).contains(&code) {
        code -= 0xF000;
    }
    let c = char::from_u32(code)?;
    let mut span = HtmlElement::new("span").text(c.to_string());
    if let Some(font) = font {
        span.set_attr("style", format!("font-family: {}", css_string(font)));
    }
    Some(span.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Relationships;
    use crate::docx::ContentParser;
    use crate::model::{NumberingCatalog, StyleCatalog};
    use crate::xml::XmlElement;

    const NS: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#;

    fn document(body: &str) -> WordDocument {
        let xml = format!(r#"<w:document {}><w:body>{}</w:body></w:document>"#, NS, body);
        let root = XmlElement::parse(&xml).unwrap();
        let mut parser = ContentParser::new();
        let root = parser.parse_document(&root);
        WordDocument::new(DocumentPart::new("word/document.xml", root, Relationships::new()))
    }

    fn render(doc: &WordDocument, options: &Options) -> String {
        let mut renderer = HtmlRenderer::new(doc, options);
        let nodes = renderer.render_blocks(doc.body.children(), None);
        let mut out = String::new();
        nodes.iter().for_each(|n| n.write_html(&mut out));
        out
    }

    #[test]
    fn test_paragraph_and_run_styles() {
        let doc = document(
            r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t>Hi</w:t></w:r></w:p>"#,
        );
        let html = render(&doc, &Options::default());
        assert_eq!(
            html,
            r#"<p style="text-align: center"><span style="font-weight: bold">Hi</span></p>"#
        );
    }

    #[test]
    fn test_tracked_changes_toggle() {
        let doc = document(
            r#"<w:p><w:ins w:id="1" w:author="Ann"><w:r><w:t>new</w:t></w:r></w:ins><w:del w:id="2" w:author="Bob"><w:r><w:delText>old</w:delText></w:r></w:del></w:p>"#,
        );
        let off = render(&doc, &Options::default());
        assert_eq!(off, "<p><span>new</span></p>");

        let on = render(&doc, &Options::default().with_changes(true));
        assert!(on.contains(r#"<ins class="docx-inserted" data-author="Ann"><span>new</span></ins>"#));
        assert!(on.contains(r#"<del class="docx-deleted" data-author="Bob"><span>old</span></del>"#));
    }

    #[test]
    fn test_complex_field_modes() {
        let body = r#"<w:p><w:r><w:fldChar w:fldCharType="begin"/></w:r><w:r><w:instrText xml:space="preserve"> PAGE </w:instrText></w:r><w:r><w:fldChar w:fldCharType="separate"/></w:r><w:r><w:t>7</w:t></w:r><w:r><w:fldChar w:fldCharType="end"/></w:r></w:p>"#;
        let doc = document(body);
        assert_eq!(render(&doc, &Options::default()), "<p><span>7</span></p>");

        let options = Options::default().with_field_mode(FieldMode::Live);
        let mut renderer = HtmlRenderer::new(&doc, &options);
        renderer.set_page(PageInfo {
            number: 3,
            section_pages: 3,
            total_pages: 5,
        });
        let nodes = renderer.render_blocks(doc.body.children(), None);
        assert_eq!(nodes[0].text_content(), "3");
    }

    #[test]
    fn test_hyperlink_anchor_and_bookmark() {
        let doc = document(
            r#"<w:p><w:bookmarkStart w:id="0" w:name="target"/><w:bookmarkEnd w:id="0"/><w:hyperlink w:anchor="target"><w:r><w:t>go</w:t></w:r></w:hyperlink></w:p>"#,
        );
        let html = render(&doc, &Options::default());
        assert_eq!(
            html,
            r##"<p><span id="target" class="docx-bookmark"></span><a href="#target"><span>go</span></a></p>"##
        );
    }

    #[test]
    fn test_heading_from_style_outline_level() {
        let mut doc = document(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Title</w:t></w:r></w:p>"#,
        );
        let styles_xml = format!(
            r#"<w:styles {}><w:style w:type="paragraph" w:styleId="Heading1"><w:pPr><w:outlineLvl w:val="0"/></w:pPr></w:style></w:styles>"#,
            NS
        );
        doc.styles = crate::docx::styles::parse_styles(&styles_xml).unwrap();
        let html = render(&doc, &Options::default());
        assert!(html.starts_with(r#"<h1 class="docx_heading1">"#));
    }

    #[test]
    fn test_symbol_and_breaks() {
        let doc = document(
            r#"<w:p><w:r><w:sym w:font="Wingdings" w:char="F0E8"/><w:br/><w:tab/><w:t>x</w:t></w:r></w:p>"#,
        );
        let html = render(&doc, &Options::default());
        assert_eq!(
            html,
            "<p><span><span style=\"font-family: 'Wingdings'\">\u{e8}</span><br><span class=\"docx-tab\"></span>x</span></p>"
        );
    }

    #[test]
    fn test_unknown_catalog_references_are_harmless() {
        let mut doc = document(
            r#"<w:p><w:pPr><w:pStyle w:val="Missing"/><w:numPr><w:ilvl w:val="0"/><w:numId w:val="9"/></w:numPr></w:pPr><w:r><w:t>x</w:t></w:r></w:p>"#,
        );
        doc.styles = StyleCatalog::default();
        doc.numbering = NumberingCatalog::default();
        assert_eq!(render(&doc, &Options::default()), "<p><span>x</span></p>");
    }
}
