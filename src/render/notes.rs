//! Footnote and endnote numbering and markup.

use super::dom::{HtmlElement, Node};
use super::options::Options;

/// Which note list a reference belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    Footnote,
    Endnote,
}

impl NoteKind {
    fn name(self) -> &'static str {
        match self {
            NoteKind::Footnote => "footnote",
            NoteKind::Endnote => "endnote",
        }
    }

    /// Element id of a note body.
    pub fn anchor(self, options: &Options, id: &str) -> String {
        format!("{}-{}-{}", options.class_name, self.name(), id)
    }
}

/// A referenced note with its display number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEntry {
    pub id: String,
    pub number: u32,
}

/// Numbers note references in document order and remembers which notes
/// the current page and the document reference.
#[derive(Debug, Default)]
pub struct NoteTracker {
    footnote_count: u32,
    endnote_count: u32,
    page_footnotes: Vec<NoteEntry>,
    endnotes: Vec<NoteEntry>,
}

impl NoteTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reference and return its marker.
    pub fn reference(&mut self, kind: NoteKind, id: &str, options: &Options) -> Node {
        let (count, list) = match kind {
            NoteKind::Footnote => (&mut self.footnote_count, &mut self.page_footnotes),
            NoteKind::Endnote => (&mut self.endnote_count, &mut self.endnotes),
        };
        *count += 1;
        list.push(NoteEntry {
            id: id.to_string(),
            number: *count,
        });
        reference_marker(kind, id, *count, options)
    }

    /// Footnotes referenced since the last call.
    pub fn take_page_footnotes(&mut self) -> Vec<NoteEntry> {
        std::mem::take(&mut self.page_footnotes)
    }

    /// Every endnote referenced so far.
    pub fn take_endnotes(&mut self) -> Vec<NoteEntry> {
        std::mem::take(&mut self.endnotes)
    }
}

/// `<sup class="{p}-footnote-ref"><a href="#...">n</a></sup>`
pub fn reference_marker(kind: NoteKind, id: &str, number: u32, options: &Options) -> Node {
    HtmlElement::new("sup")
        .class(&options.class(&format!("{}-ref", kind.name())))
        .child(
            HtmlElement::new("a")
                .attr("href", format!("#{}", kind.anchor(options, id)))
                .text(number.to_string()),
        )
        .into()
}

/// The list element holding rendered note bodies.
pub fn note_list(kind: NoteKind, items: Vec<Node>, options: &Options) -> Node {
    let mut ol = HtmlElement::new("ol").class(&options.class(&format!("{}s", kind.name())));
    ol.extend(items);
    ol.into()
}

/// One list item of a note list.
pub fn note_item(kind: NoteKind, entry: &NoteEntry, body: Vec<Node>, options: &Options) -> Node {
    let mut li = HtmlElement::new("li")
        .attr("id", kind.anchor(options, &entry.id))
        .attr("value", entry.number.to_string());
    li.extend(body);
    li.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_numbering() {
        let options = Options::default();
        let mut notes = NoteTracker::new();
        let first = notes.reference(NoteKind::Footnote, "2", &options);
        notes.reference(NoteKind::Endnote, "1", &options);
        notes.reference(NoteKind::Footnote, "3", &options);

        assert_eq!(
            first.as_element().unwrap().to_html(),
            r##"<sup class="docx-footnote-ref"><a href="#docx-footnote-2">1</a></sup>"##
        );
        let page = notes.take_page_footnotes();
        assert_eq!(page.iter().map(|e| e.number).collect::<Vec<_>>(), vec![1, 2]);
        assert!(notes.take_page_footnotes().is_empty());
        assert_eq!(notes.take_endnotes()[0].id, "1");
    }

    #[test]
    fn test_note_list_markup() {
        let options = Options::default().with_class_name("doc");
        let entry = NoteEntry {
            id: "5".to_string(),
            number: 1,
        };
        let item = note_item(NoteKind::Endnote, &entry, vec![Node::text("n")], &options);
        let list = note_list(NoteKind::Endnote, vec![item], &options);
        assert_eq!(
            list.as_element().unwrap().to_html(),
            r#"<ol class="doc-endnotes"><li id="doc-endnote-5" value="1">n</li></ol>"#
        );
    }
}
