//! Element tree parser for document, header, footer, note and comment parts.

use super::{math, properties, section, styles, vml};
use crate::model::{
    BreakType, CellProps, ChangeInfo, CommentInfo, CssProps, Element, ElementKind,
    FieldCharType, ParagraphProps, RowProps, TabStop, TableLook, TableProps, VMerge,
};
use crate::units::{convert_length, LengthUsage};
use crate::xml::XmlElement;
use std::collections::HashSet;

/// Elements that carry nothing the renderer uses. Skipped without a warning.
const IGNORED: &[&str] = &[
    "w:proofErr",
    "w:permStart",
    "w:permEnd",
    "w:noProof",
    "w:footnoteRef",
    "w:endnoteRef",
    "w:separator",
    "w:continuationSeparator",
    "w:annotationRef",
    "w:moveFromRangeStart",
    "w:moveFromRangeEnd",
    "w:moveToRangeStart",
    "w:moveToRangeEnd",
    "w:customXmlInsRangeStart",
    "w:customXmlInsRangeEnd",
    "w:customXmlDelRangeStart",
    "w:customXmlDelRangeEnd",
    "w:sdtPr",
    "w:sdtEndPr",
    "w:tblPrEx",
    "w:fldData",
    "w:dayShort",
    "w:dayLong",
    "w:monthShort",
    "w:monthLong",
    "w:yearShort",
    "w:yearLong",
    "w:contentPart",
    "w:pPrChange",
    "w:rPrChange",
];

/// Parses part XML into the element model.
///
/// Unknown elements never fail a parse: they are skipped and reported once
/// per name through [`ContentParser::warnings`].
#[derive(Debug, Default)]
pub struct ContentParser {
    warnings: Vec<String>,
    reported: HashSet<String>,
}

impl ContentParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Warnings collected so far.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Take the collected warnings, leaving the parser empty.
    pub fn take_warnings(&mut self) -> Vec<String> {
        self.reported.clear();
        std::mem::take(&mut self.warnings)
    }

    fn warn_unknown(&mut self, el: &XmlElement, context: &str) {
        if IGNORED.contains(&el.name.as_str()) {
            return;
        }
        let key = format!("{}/{}", context, el.name);
        if self.reported.insert(key) {
            self.warnings
                .push(format!("skipped unsupported element <{}> in {}", el.name, context));
        }
    }

    /// Parse a `w:document` root.
    pub fn parse_document(&mut self, root: &XmlElement) -> Element {
        let mut doc = Element::new(ElementKind::Document { section: None });
        let Some(body) = root.child("w:body") else {
            self.warnings.push("document has no w:body".to_string());
            return doc;
        };

        for el in body.elements() {
            if el.name == "w:sectPr" {
                doc.kind = ElementKind::Document {
                    section: Some(Box::new(section::parse_section(el))),
                };
                continue;
            }
            self.parse_block(el, &mut doc.children);
        }
        doc
    }

    /// Parse a `w:hdr` or `w:ftr` root.
    pub fn parse_header_footer(&mut self, root: &XmlElement) -> Element {
        let kind = if root.name == "w:ftr" {
            ElementKind::Footer
        } else {
            ElementKind::Header
        };
        let children = self.parse_blocks(root);
        Element::with_children(kind, children)
    }

    /// Parse a `w:footnotes` or `w:endnotes` root.
    ///
    /// Separator and continuation notes are dropped.
    pub fn parse_notes(&mut self, root: &XmlElement) -> Element {
        let mut notes = Vec::new();
        for el in root.elements() {
            let endnote = match el.name.as_str() {
                "w:footnote" => false,
                "w:endnote" => true,
                _ => continue,
            };
            if matches!(
                el.attr("w:type"),
                Some("separator") | Some("continuationSeparator") | Some("continuationNotice")
            ) {
                continue;
            }
            let Some(id) = el.attr("w:id") else {
                continue;
            };
            let id = id.to_string();
            let kind = if endnote {
                ElementKind::Endnote { id }
            } else {
                ElementKind::Footnote { id }
            };
            let children = self.parse_blocks(el);
            notes.push(Element::with_children(kind, children));
        }
        Element::with_children(ElementKind::Document { section: None }, notes)
    }

    /// Parse a `w:comments` root.
    pub fn parse_comments(&mut self, root: &XmlElement) -> Element {
        let mut comments = Vec::new();
        for el in root.children_named("w:comment") {
            let Some(id) = el.attr("w:id") else {
                continue;
            };
            let info = CommentInfo {
                id: id.to_string(),
                author: el.attr("w:author").map(String::from),
                initials: el.attr("w:initials").map(String::from),
                date: el.attr("w:date").map(String::from),
            };
            let children = self.parse_blocks(el);
            comments.push(Element::with_children(ElementKind::Comment(info), children));
        }
        Element::with_children(ElementKind::Document { section: None }, comments)
    }

    /// Parse block-level content (paragraphs, tables) of a container.
    pub fn parse_blocks(&mut self, container: &XmlElement) -> Vec<Element> {
        let mut out = Vec::new();
        for el in container.elements() {
            self.parse_block(el, &mut out);
        }
        out
    }

    fn parse_block(&mut self, el: &XmlElement, out: &mut Vec<Element>) {
        match el.name.as_str() {
            "w:p" => out.push(self.parse_paragraph(el)),
            "w:tbl" => out.push(self.parse_table(el)),
            "w:sdt" => {
                if let Some(content) = el.child("w:sdtContent") {
                    for child in content.elements() {
                        self.parse_block(child, out);
                    }
                }
            }
            "w:customXml" => {
                for child in el.elements() {
                    self.parse_block(child, out);
                }
            }
            "w:ins" | "w:moveTo" | "w:del" | "w:moveFrom" => {
                let mut change = Element::new(change_kind(el));
                for child in el.elements() {
                    self.parse_block(child, &mut change.children);
                }
                out.push(change);
            }
            "mc:AlternateContent" => {
                if let Some(branch) = choose_alternate(el) {
                    for child in branch.elements() {
                        self.parse_block(child, out);
                    }
                }
            }
            "w:altChunk" => {
                if let Some(rel_id) = el.attr("r:id") {
                    out.push(Element::new(ElementKind::AltChunk {
                        rel_id: rel_id.to_string(),
                    }));
                }
            }
            "w:bookmarkStart" | "w:bookmarkEnd" => {
                if let Some(marker) = bookmark(el) {
                    out.push(marker);
                }
            }
            "m:oMathPara" => out.push(math::parse_math(el)),
            "w:sectPr" | "w:tblPr" => {}
            _ => self.warn_unknown(el, "body"),
        }
    }

    /// Parse a `w:p` element.
    pub fn parse_paragraph(&mut self, el: &XmlElement) -> Element {
        let mut props = ParagraphProps::default();
        let mut css = CssProps::new();
        let mut style_id = None;

        if let Some(ppr) = el.child("w:pPr") {
            properties::paragraph_css(ppr, &mut css);
            for p in ppr.elements() {
                match p.name.as_str() {
                    "w:pStyle" => style_id = p.val().map(String::from),
                    "w:numPr" => props.numbering = styles::parse_num_pr(p),
                    "w:sectPr" => props.section = Some(Box::new(section::parse_section(p))),
                    "w:outlineLvl" => {
                        props.outline_level =
                            p.val().and_then(|v| v.parse::<u8>().ok()).filter(|l| *l < 9)
                    }
                    "w:pageBreakBefore" => {
                        props.page_break_before = crate::units::convert_boolean(p.val(), true)
                    }
                    "w:tabs" => props.tabs = parse_tabs(p),
                    _ => {}
                }
            }
        }

        let mut para = Element::new(ElementKind::Paragraph(props));
        para.css = css;
        para.style_id = style_id;

        for child in el.elements() {
            self.parse_inline(child, &mut para.children);
        }
        para
    }

    /// Parse paragraph-level content: runs and their containers.
    fn parse_inline(&mut self, el: &XmlElement, out: &mut Vec<Element>) {
        match el.name.as_str() {
            "w:pPr" => {}
            "w:r" => out.push(self.parse_run(el)),
            "w:hyperlink" => {
                let mut link = Element::new(ElementKind::Hyperlink {
                    rel_id: el.attr("r:id").map(String::from),
                    anchor: el.attr("w:anchor").map(String::from),
                    tooltip: el.attr("w:tooltip").map(String::from),
                });
                for child in el.elements() {
                    self.parse_inline(child, &mut link.children);
                }
                out.push(link);
            }
            "w:bookmarkStart" | "w:bookmarkEnd" => {
                if let Some(marker) = bookmark(el) {
                    out.push(marker);
                }
            }
            "w:fldSimple" => {
                let mut field = Element::new(ElementKind::SimpleField {
                    instruction: el.attr("w:instr").unwrap_or_default().trim().to_string(),
                });
                for child in el.elements() {
                    self.parse_inline(child, &mut field.children);
                }
                out.push(field);
            }
            "w:ins" | "w:moveTo" | "w:del" | "w:moveFrom" => {
                let mut change = Element::new(change_kind(el));
                for child in el.elements() {
                    self.parse_inline(child, &mut change.children);
                }
                out.push(change);
            }
            "w:commentRangeStart" | "w:commentRangeEnd" => {
                if let Some(id) = el.attr("w:id") {
                    let id = id.to_string();
                    out.push(Element::new(if el.name == "w:commentRangeStart" {
                        ElementKind::CommentRangeStart { id }
                    } else {
                        ElementKind::CommentRangeEnd { id }
                    }));
                }
            }
            "w:sdt" => {
                if let Some(content) = el.child("w:sdtContent") {
                    for child in content.elements() {
                        self.parse_inline(child, out);
                    }
                }
            }
            "w:smartTag" | "w:customXml" | "w:dir" | "w:bdo" => {
                for child in el.elements() {
                    self.parse_inline(child, out);
                }
            }
            "w:ruby" => {
                if let Some(base) = el.child("w:rubyBase") {
                    for child in base.elements() {
                        self.parse_inline(child, out);
                    }
                }
            }
            "m:oMath" | "m:oMathPara" => out.push(math::parse_math(el)),
            "mc:AlternateContent" => {
                if let Some(branch) = choose_alternate(el) {
                    for child in branch.elements() {
                        self.parse_inline(child, out);
                    }
                }
            }
            _ => self.warn_unknown(el, "paragraph"),
        }
    }

    /// Parse a `w:r` element.
    pub fn parse_run(&mut self, el: &XmlElement) -> Element {
        let mut run = Element::new(ElementKind::Run);

        for child in el.elements() {
            match child.name.as_str() {
                "w:rPr" => {
                    properties::run_css(child, &mut run.css);
                    run.style_id = child.child("w:rStyle").and_then(|s| s.val()).map(String::from);
                }
                "w:t" => run.children.push(Element::text(child.text())),
                "w:delText" => run.children.push(Element::new(ElementKind::DeletedText {
                    text: child.text(),
                })),
                "w:tab" | "w:ptab" => run.children.push(Element::new(ElementKind::Tab)),
                "w:br" => {
                    let break_type = match child.attr("w:type") {
                        Some("page") => BreakType::Page,
                        Some("column") => BreakType::Column,
                        _ => BreakType::TextWrapping,
                    };
                    run.children.push(Element::new(ElementKind::Break { break_type }));
                }
                "w:cr" => run.children.push(Element::new(ElementKind::Break {
                    break_type: BreakType::TextWrapping,
                })),
                "w:lastRenderedPageBreak" => run.children.push(Element::new(ElementKind::Break {
                    break_type: BreakType::LastRenderedPage,
                })),
                "w:sym" => {
                    if let Some(code) = child.attr("w:char") {
                        run.children.push(Element::new(ElementKind::Symbol {
                            font: child.attr("w:font").map(String::from),
                            char_code: code.to_string(),
                        }));
                    }
                }
                "w:noBreakHyphen" => run.children.push(Element::new(ElementKind::NoBreakHyphen)),
                "w:softHyphen" => run.children.push(Element::new(ElementKind::SoftHyphen)),
                "w:fldChar" => {
                    let char_type = match child.attr("w:fldCharType") {
                        Some("begin") => Some(FieldCharType::Begin),
                        Some("separate") => Some(FieldCharType::Separate),
                        Some("end") => Some(FieldCharType::End),
                        _ => None,
                    };
                    if let Some(char_type) = char_type {
                        run.children.push(Element::new(ElementKind::FieldChar { char_type }));
                    }
                }
                "w:instrText" | "w:delInstrText" => {
                    run.children.push(Element::new(ElementKind::InstrText { text: child.text() }))
                }
                "w:footnoteReference" | "w:endnoteReference" | "w:commentReference" => {
                    if let Some(id) = child.attr("w:id") {
                        let id = id.to_string();
                        run.children.push(Element::new(match child.name.as_str() {
                            "w:footnoteReference" => ElementKind::FootnoteReference { id },
                            "w:endnoteReference" => ElementKind::EndnoteReference { id },
                            _ => ElementKind::CommentReference { id },
                        }));
                    }
                }
                "w:drawing" => {
                    if let Some(drawing) = self.parse_drawing(child) {
                        run.children.push(drawing);
                    }
                }
                "w:pict" | "w:object" => {
                    let mut content = |txbx: &XmlElement| self.parse_blocks(txbx);
                    if let Some(shape) = vml::parse_vml(child, &mut content) {
                        run.children.push(shape);
                    }
                }
                "mc:AlternateContent" => {
                    if let Some(branch) = choose_alternate(child) {
                        // Re-enter as if the branch content were run content
                        let inner = XmlElement {
                            name: "w:r".to_string(),
                            attributes: Vec::new(),
                            children: branch.children.clone(),
                        };
                        let parsed = self.parse_run(&inner);
                        run.children.extend(parsed.children);
                    }
                }
                "m:oMath" => run.children.push(math::parse_math(child)),
                _ => self.warn_unknown(child, "run"),
            }
        }

        run
    }

    /// Parse a `w:drawing` holding a picture.
    fn parse_drawing(&mut self, el: &XmlElement) -> Option<Element> {
        let (container, inline) = match el.child("wp:inline") {
            Some(inline) => (inline, true),
            None => (el.child("wp:anchor")?, false),
        };

        let Some(blip) = container.descendant("a:blip") else {
            self.warn_unknown(container, "drawing without picture");
            return None;
        };
        let rel_id = blip.attr("r:embed").or_else(|| blip.attr("r:link"))?;

        let mut drawing = Element::new(ElementKind::Drawing { inline });
        if let Some(extent) = container.child("wp:extent") {
            if let Some(cx) = extent.attr("cx") {
                drawing.css.set_opt("width", convert_length(cx, LengthUsage::Emu));
            }
            if let Some(cy) = extent.attr("cy") {
                drawing.css.set_opt("height", convert_length(cy, LengthUsage::Emu));
            }
        }
        if !inline {
            let align_right = container
                .child("wp:positionH")
                .and_then(|p| p.child("wp:align"))
                .map(|a| a.text() == "right")
                .unwrap_or(false);
            let wraps = container.child("wp:wrapSquare").is_some()
                || container.child("wp:wrapTight").is_some()
                || container.child("wp:wrapThrough").is_some();
            if wraps {
                drawing
                    .css
                    .set("float", if align_right { "right" } else { "left" });
            } else {
                drawing.css.set("display", "block");
            }
        }

        let alt = container
            .child("wp:docPr")
            .and_then(|d| d.attr("descr").or_else(|| d.attr("title")))
            .filter(|s| !s.is_empty())
            .map(String::from);

        let mut image = Element::new(ElementKind::Image {
            rel_id: rel_id.to_string(),
            alt,
        });
        image.css = drawing.css.clone();
        image.css.remove("float");
        image.css.remove("display");
        drawing.children.push(image);
        Some(drawing)
    }

    /// Parse a `w:tbl` element.
    pub fn parse_table(&mut self, el: &XmlElement) -> Element {
        let mut props = TableProps::default();
        let mut css = CssProps::new();
        let mut style_id = None;

        if let Some(tblpr) = el.child("w:tblPr") {
            properties::table_css(tblpr, &mut css, &mut props.cell_css);
            style_id = tblpr.child("w:tblStyle").and_then(|s| s.val()).map(String::from);
            if let Some(look) = tblpr.child("w:tblLook") {
                props.look = parse_table_look(look);
            }
        }

        if let Some(grid) = el.child("w:tblGrid") {
            props.grid = grid
                .children_named("w:gridCol")
                .map(|col| {
                    col.attr("w:w")
                        .and_then(|w| convert_length(w, LengthUsage::Dxa))
                        .unwrap_or_else(|| "0.00pt".to_string())
                })
                .collect();
        }

        let mut table = Element::new(ElementKind::Table(props));
        table.css = css;
        table.style_id = style_id;

        for child in el.elements() {
            self.parse_table_content(child, &mut table.children);
        }
        table
    }

    fn parse_table_content(&mut self, el: &XmlElement, rows: &mut Vec<Element>) {
        match el.name.as_str() {
            "w:tr" => rows.push(self.parse_row(el)),
            "w:sdt" => {
                if let Some(content) = el.child("w:sdtContent") {
                    for child in content.elements() {
                        self.parse_table_content(child, rows);
                    }
                }
            }
            "w:customXml" => {
                for child in el.elements() {
                    self.parse_table_content(child, rows);
                }
            }
            "w:tblPr" | "w:tblGrid" | "w:bookmarkStart" | "w:bookmarkEnd" => {}
            _ => self.warn_unknown(el, "table"),
        }
    }

    fn parse_row(&mut self, el: &XmlElement) -> Element {
        let mut props = RowProps::default();
        let mut css = CssProps::new();

        if let Some(trpr) = el.child("w:trPr") {
            properties::row_css(trpr, &mut css);
            for p in trpr.elements() {
                match p.name.as_str() {
                    "w:tblHeader" => props.is_header = crate::units::convert_boolean(p.val(), true),
                    "w:gridBefore" => props.grid_before = parse_count(p),
                    "w:gridAfter" => props.grid_after = parse_count(p),
                    _ => {}
                }
            }
        }

        let mut row = Element::new(ElementKind::TableRow(props));
        row.css = css;

        for child in el.elements() {
            self.parse_row_content(child, &mut row.children);
        }
        row
    }

    fn parse_row_content(&mut self, el: &XmlElement, cells: &mut Vec<Element>) {
        match el.name.as_str() {
            "w:tc" => cells.push(self.parse_cell(el)),
            "w:sdt" => {
                if let Some(content) = el.child("w:sdtContent") {
                    for child in content.elements() {
                        self.parse_row_content(child, cells);
                    }
                }
            }
            "w:customXml" => {
                for child in el.elements() {
                    self.parse_row_content(child, cells);
                }
            }
            "w:trPr" | "w:tblPrEx" | "w:bookmarkStart" | "w:bookmarkEnd" => {}
            _ => self.warn_unknown(el, "table row"),
        }
    }

    fn parse_cell(&mut self, el: &XmlElement) -> Element {
        let mut props = CellProps::default();
        let mut css = CssProps::new();

        if let Some(tcpr) = el.child("w:tcPr") {
            properties::cell_css(tcpr, &mut css);
            for p in tcpr.elements() {
                match p.name.as_str() {
                    "w:gridSpan" => props.grid_span = parse_count(p).max(1),
                    "w:vMerge" => {
                        props.v_merge = Some(match p.val() {
                            Some("restart") => VMerge::Restart,
                            _ => VMerge::Continue,
                        })
                    }
                    "w:hMerge" => {
                        // Legacy horizontal merge: continuation cells collapse
                        if p.val() != Some("restart") {
                            props.grid_span = 0;
                        }
                    }
                    "w:tcW" => props.width = properties::width_value(p),
                    _ => {}
                }
            }
        }

        let mut cell = Element::new(ElementKind::TableCell(props));
        cell.css = css;
        cell.children = self.parse_blocks(el);
        cell
    }
}

fn parse_count(el: &XmlElement) -> u32 {
    el.val().and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

fn parse_tabs(el: &XmlElement) -> Vec<TabStop> {
    el.children_named("w:tab")
        .filter_map(|tab| {
            Some(TabStop {
                style: tab.val().unwrap_or("left").to_string(),
                leader: tab.attr("w:leader").map(String::from),
                position: convert_length(tab.attr("w:pos")?, LengthUsage::Dxa)?,
            })
        })
        .collect()
}

fn parse_table_look(el: &XmlElement) -> TableLook {
    let mut look = match el.val().and_then(|v| u32::from_str_radix(v, 16).ok()) {
        Some(mask) => TableLook::from_mask(mask),
        None => TableLook::default(),
    };
    let flag = |name: &str| el.attr(name).map(|v| crate::units::convert_boolean(Some(v), false));
    if let Some(v) = flag("w:firstRow") {
        look.first_row = v;
    }
    if let Some(v) = flag("w:lastRow") {
        look.last_row = v;
    }
    if let Some(v) = flag("w:firstColumn") {
        look.first_column = v;
    }
    if let Some(v) = flag("w:lastColumn") {
        look.last_column = v;
    }
    if let Some(v) = flag("w:noHBand") {
        look.no_h_band = v;
    }
    if let Some(v) = flag("w:noVBand") {
        look.no_v_band = v;
    }
    look
}

/// `w:ins`/`w:moveTo` become insertions, `w:del`/`w:moveFrom` deletions.
fn change_kind(el: &XmlElement) -> ElementKind {
    let info = ChangeInfo {
        id: el.attr("w:id").unwrap_or_default().to_string(),
        author: el.attr("w:author").map(String::from),
        date: el.attr("w:date").map(String::from),
        moved: el.name.starts_with("w:move"),
    };
    if matches!(el.name.as_str(), "w:ins" | "w:moveTo") {
        ElementKind::Inserted(info)
    } else {
        ElementKind::Deleted(info)
    }
}

fn bookmark(el: &XmlElement) -> Option<Element> {
    let id = el.attr("w:id")?.to_string();
    if el.name == "w:bookmarkEnd" {
        return Some(Element::new(ElementKind::BookmarkEnd { id }));
    }
    let col = |name: &str| el.attr(name).and_then(|v| v.trim().parse().ok());
    Some(Element::new(ElementKind::BookmarkStart {
        id,
        name: el.attr("w:name").unwrap_or_default().to_string(),
        col_first: col("w:colFirst"),
        col_last: col("w:colLast"),
    }))
}

/// Pick the branch of `mc:AlternateContent` to parse.
///
/// A choice holding a picture is understood; other choices (shapes, ink,
/// charts) fall back to `mc:Fallback` when one exists.
fn choose_alternate(el: &XmlElement) -> Option<&XmlElement> {
    let choice = el.child("mc:Choice");
    let fallback = el.child("mc:Fallback");
    match (choice, fallback) {
        (Some(c), _) if c.descendant("pic:pic").is_some() => Some(c),
        (_, Some(f)) => Some(f),
        (c, None) => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_body(body: &str) -> (Element, Vec<String>) {
        let xml = format!(
            r#"<w:document xmlns:w="w" xmlns:r="r"><w:body>{}</w:body></w:document>"#,
            body
        );
        let root = XmlElement::parse(&xml).unwrap();
        let mut parser = ContentParser::new();
        let doc = parser.parse_document(&root);
        (doc, parser.take_warnings())
    }

    #[test]
    fn test_paragraph_and_runs() {
        let (doc, warnings) = parse_body(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/><w:numPr><w:ilvl w:val="1"/><w:numId w:val="4"/></w:numPr><w:jc w:val="center"/></w:pPr><w:r><w:rPr><w:rStyle w:val="Strong"/><w:b/></w:rPr><w:t xml:space="preserve">Hello </w:t><w:tab/><w:t>world</w:t></w:r></w:p>"#,
        );
        assert!(warnings.is_empty());
        let para = &doc.children[0];
        assert_eq!(para.style_id.as_deref(), Some("Heading1"));
        assert_eq!(para.css.get("text-align"), Some("center"));
        let num = para.paragraph_props().unwrap().numbering.as_ref().unwrap();
        assert_eq!((num.id.as_str(), num.level), ("4", 1));

        let run = &para.children[0];
        assert_eq!(run.style_id.as_deref(), Some("Strong"));
        assert_eq!(run.css.get("font-weight"), Some("bold"));
        assert_eq!(run.children.len(), 3);
        assert_eq!(para.plain_text(), "Hello \tworld\n");
    }

    #[test]
    fn test_unknown_elements_are_skipped() {
        let (doc, warnings) = parse_body(
            r#"<w:futureThing><w:p/></w:futureThing><w:p><w:futureRun/><w:r><w:t>kept</w:t></w:r></w:p><w:futureThing/>"#,
        );
        assert_eq!(doc.children.len(), 1);
        assert_eq!(doc.plain_text(), "kept\n");
        // reported once per element name and context
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("w:futureThing"));
    }

    #[test]
    fn test_rebound_prefix_parses() {
        let xml = r#"<ns0:document xmlns:ns0="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><ns0:body><ns0:p><ns0:pPr><ns0:pStyle ns0:val="Title"/></ns0:pPr><ns0:r><ns0:t>rebound</ns0:t></ns0:r></ns0:p></ns0:body></ns0:document>"#;
        let root = XmlElement::parse(xml).unwrap();
        let mut parser = ContentParser::new();
        let doc = parser.parse_document(&root);
        assert!(parser.take_warnings().is_empty());
        assert_eq!(doc.children[0].style_id.as_deref(), Some("Title"));
        assert_eq!(doc.plain_text(), "rebound\n");
    }

    #[test]
    fn test_final_section() {
        let (doc, _) = parse_body(r#"<w:p/><w:sectPr><w:pgSz w:w="12240" w:h="15840"/></w:sectPr>"#);
        match &doc.kind {
            ElementKind::Document { section: Some(sect) } => {
                assert_eq!(sect.page_size.width.as_deref(), Some("612.00pt"));
            }
            other => panic!("unexpected root {:?}", other),
        }
    }

    #[test]
    fn test_tracked_changes_and_fields() {
        let (doc, _) = parse_body(
            r#"<w:p><w:ins w:id="1" w:author="Ana" w:date="2024-01-02T00:00:00Z"><w:r><w:t>new</w:t></w:r></w:ins><w:del w:id="2" w:author="Bo"><w:r><w:delText>old</w:delText></w:r></w:del><w:r><w:fldChar w:fldCharType="begin"/></w:r><w:r><w:instrText> PAGE </w:instrText></w:r><w:r><w:fldChar w:fldCharType="separate"/></w:r><w:r><w:t>1</w:t></w:r><w:r><w:fldChar w:fldCharType="end"/></w:r><w:fldSimple w:instr=" NUMPAGES "><w:r><w:t>3</w:t></w:r></w:fldSimple></w:p>"#,
        );
        let para = &doc.children[0];
        match &para.children[0].kind {
            ElementKind::Inserted(info) => assert_eq!(info.author.as_deref(), Some("Ana")),
            other => panic!("expected insertion, got {:?}", other),
        }
        assert!(matches!(para.children[1].kind, ElementKind::Deleted(_)));
        assert!(matches!(
            para.children[2].children[0].kind,
            ElementKind::FieldChar {
                char_type: FieldCharType::Begin
            }
        ));
        match &para.children.last().unwrap().kind {
            ElementKind::SimpleField { instruction } => assert_eq!(instruction, "NUMPAGES"),
            other => panic!("expected simple field, got {:?}", other),
        }
    }

    #[test]
    fn test_block_level_changes_wrap_blocks() {
        let (doc, warnings) = parse_body(
            r#"<w:ins w:id="3" w:author="Ana"><w:p><w:r><w:t>new</w:t></w:r></w:p></w:ins><w:del w:id="4"><w:p><w:r><w:delText>old</w:delText></w:r></w:p><w:tbl><w:tr><w:tc><w:p/></w:tc></w:tr></w:tbl></w:del>"#,
        );
        assert!(warnings.is_empty());
        assert_eq!(doc.children.len(), 2);
        assert!(matches!(doc.children[0].kind, ElementKind::Inserted(_)));
        assert!(matches!(doc.children[0].children[0].kind, ElementKind::Paragraph(_)));
        assert!(matches!(doc.children[1].kind, ElementKind::Deleted(_)));
        assert!(matches!(doc.children[1].children[1].kind, ElementKind::Table(_)));
    }

    #[test]
    fn test_table_structure() {
        let (doc, _) = parse_body(
            r#"<w:tbl><w:tblPr><w:tblStyle w:val="Grid"/><w:tblLook w:firstRow="1" w:lastRow="0" w:firstColumn="0" w:lastColumn="0" w:noHBand="0" w:noVBand="1"/></w:tblPr><w:tblGrid><w:gridCol w:w="2000"/><w:gridCol w:w="3000"/></w:tblGrid><w:tr><w:trPr><w:tblHeader/></w:trPr><w:tc><w:tcPr><w:gridSpan w:val="2"/><w:vMerge w:val="restart"/></w:tcPr><w:p/></w:tc></w:tr><w:tr><w:trPr><w:gridBefore w:val="1"/></w:trPr><w:tc><w:tcPr><w:vMerge/></w:tcPr><w:p/></w:tc></w:tr></w:tbl>"#,
        );
        let table = &doc.children[0];
        assert_eq!(table.style_id.as_deref(), Some("Grid"));
        let ElementKind::Table(props) = &table.kind else {
            panic!("expected table");
        };
        assert_eq!(props.grid, vec!["100.00pt", "150.00pt"]);
        assert!(props.look.first_row && !props.look.first_column);

        let ElementKind::TableRow(row0) = &table.children[0].kind else {
            panic!("expected row");
        };
        assert!(row0.is_header);
        let ElementKind::TableCell(cell) = &table.children[0].children[0].kind else {
            panic!("expected cell");
        };
        assert_eq!(cell.grid_span, 2);
        assert_eq!(cell.v_merge, Some(VMerge::Restart));

        let ElementKind::TableRow(row1) = &table.children[1].kind else {
            panic!("expected row");
        };
        assert_eq!(row1.grid_before, 1);
    }

    #[test]
    fn test_drawing_and_alternate_content() {
        let (doc, _) = parse_body(
            r#"<w:p><w:r><mc:AlternateContent><mc:Choice Requires="wps"><w:drawing><wp:anchor><wps:wsp/></wp:anchor></w:drawing></mc:Choice><mc:Fallback><w:pict><v:rect/></w:pict></mc:Fallback></mc:AlternateContent><w:drawing><wp:inline><wp:extent cx="914400" cy="457200"/><wp:docPr id="1" name="Picture 1" descr="A chart"/><a:graphic><a:graphicData><pic:pic><pic:blipFill><a:blip r:embed="rId5"/></pic:blipFill></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"#,
        );
        let run = &doc.children[0].children[0];
        assert_eq!(run.children.len(), 2);
        assert!(matches!(run.children[0].kind, ElementKind::Vml(_)));

        let drawing = &run.children[1];
        assert_eq!(drawing.css.get("width"), Some("72.00pt"));
        match &drawing.children[0].kind {
            ElementKind::Image { rel_id, alt } => {
                assert_eq!(rel_id, "rId5");
                assert_eq!(alt.as_deref(), Some("A chart"));
            }
            other => panic!("expected image, got {:?}", other),
        }
    }

    #[test]
    fn test_notes_skip_separators() {
        let xml = r#"<w:footnotes><w:footnote w:type="separator" w:id="-1"><w:p/></w:footnote><w:footnote w:id="1"><w:p><w:r><w:t>Note</w:t></w:r></w:p></w:footnote></w:footnotes>"#;
        let mut parser = ContentParser::new();
        let notes = parser.parse_notes(&XmlElement::parse(xml).unwrap());
        assert_eq!(notes.children.len(), 1);
        assert!(matches!(&notes.children[0].kind, ElementKind::Footnote { id } if id == "1"));
    }

    #[test]
    fn test_preserved_whitespace() {
        let (doc, _) = parse_body(r#"<w:p><w:r><w:t xml:space="preserve">  two  </w:t></w:r></w:p>"#);
        assert_eq!(doc.plain_text(), "  two  \n");
    }
}
