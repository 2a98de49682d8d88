//! Section and page splitting.
//!
//! The body is split into sections at every paragraph-level `w:sectPr` and
//! at the end of the body. With page breaking on, each section is split
//! further at explicit page breaks. A paragraph broken in the middle is cut
//! at the run level into two paragraphs; the continuation carries no list
//! marker.

use super::options::Options;
use crate::model::{
    BreakType, Element, ElementKind, HeaderFooterKind, NumberingRef, SectionProperties, Settings,
};
use std::borrow::Cow;
use std::collections::HashMap;

/// A run of body content sharing one set of section properties.
#[derive(Debug, Clone)]
pub struct SectionSlice<'a> {
    /// Position of the section in the document, from 0
    pub index: usize,
    pub props: Cow<'a, SectionProperties>,
    pub content: &'a [Element],
}

/// One rendered page.
#[derive(Debug, Clone)]
pub struct Page<'a> {
    /// Index of the section the page belongs to
    pub section: usize,
    /// Displayed page number
    pub number: u32,
    /// Whether this is the first page of its section
    pub first_in_section: bool,
    pub content: Vec<Cow<'a, Element>>,
}

/// Split the body into sections.
pub fn sections(body: &Element) -> Vec<SectionSlice<'_>> {
    let final_props = match &body.kind {
        ElementKind::Document { section } => section.as_deref(),
        _ => None,
    };

    let mut out = Vec::new();
    let mut start = 0;
    for (i, el) in body.children.iter().enumerate() {
        let Some(props) = el.paragraph_props().and_then(|p| p.section.as_deref()) else {
            continue;
        };
        out.push(SectionSlice {
            index: out.len(),
            props: Cow::Borrowed(props),
            content: &body.children[start..=i],
        });
        start = i + 1;
    }

    if start < body.children.len() || out.is_empty() {
        out.push(SectionSlice {
            index: out.len(),
            props: match final_props {
                Some(props) => Cow::Borrowed(props),
                None => Cow::Owned(SectionProperties::default()),
            },
            content: &body.children[start..],
        });
    }
    out
}

fn breaks_page(el: &Element, options: &Options) -> bool {
    match &el.kind {
        ElementKind::Break { break_type } => match break_type {
            BreakType::Page => true,
            BreakType::LastRenderedPage => options.respect_last_rendered_page_break(),
            BreakType::Column | BreakType::TextWrapping => false,
        },
        _ => false,
    }
}

/// Split a paragraph at page breaks in its direct runs.
///
/// Returns `None` when there is no break; otherwise the pieces, with a page
/// break between each consecutive pair.
fn split_paragraph(para: &Element, options: &Options) -> Option<Vec<Element>> {
    let has_break = para.children.iter().any(|child| {
        matches!(child.kind, ElementKind::Run) && child.children.iter().any(|c| breaks_page(c, options))
    });
    if !has_break {
        return None;
    }

    let mut pieces = Vec::new();
    let mut current = shallow(para);

    for child in &para.children {
        if !matches!(child.kind, ElementKind::Run) {
            current.children.push(child.clone());
            continue;
        }
        let mut run = shallow(child);
        for grandchild in &child.children {
            if breaks_page(grandchild, options) {
                if !run.children.is_empty() {
                    current.children.push(run.clone());
                }
                run.children.clear();
                let next = continuation(&current);
                pieces.push(std::mem::replace(&mut current, next));
            } else {
                run.children.push(grandchild.clone());
            }
        }
        if !run.children.is_empty() {
            current.children.push(run);
        }
    }
    pieces.push(current);
    Some(pieces)
}

/// A copy of an element without its children.
fn shallow(el: &Element) -> Element {
    Element {
        kind: el.kind.clone(),
        children: Vec::new(),
        css: el.css.clone(),
        style_id: el.style_id.clone(),
    }
}

/// An empty paragraph continuing `para` after a break.
fn continuation(para: &Element) -> Element {
    let mut next = shallow(para);
    if let ElementKind::Paragraph(props) = &mut next.kind {
        props.page_break_before = false;
        // numbering id 0 switches numbering off
        let level = props.numbering.as_ref().map(|n| n.level).unwrap_or(0);
        props.numbering = Some(NumberingRef {
            id: "0".to_string(),
            level,
        });
    }
    next
}

fn has_content(para: &Element) -> bool {
    para.children.iter().any(|c| match c.kind {
        ElementKind::Run => !c.children.is_empty(),
        _ => true,
    })
}

/// Split every section into pages and number them.
pub fn paginate<'a>(sections: &[SectionSlice<'a>], options: &Options) -> Vec<Page<'a>> {
    let mut pages: Vec<Page<'a>> = Vec::new();
    let mut number = 0u32;

    for section in sections {
        let mut section_pages: Vec<Vec<Cow<'a, Element>>> = vec![Vec::new()];

        for el in section.content {
            let current_has_content = section_pages.last().map(|p| !p.is_empty()).unwrap_or(false);
            let break_before = options.break_pages
                && el.paragraph_props().map(|p| p.page_break_before).unwrap_or(false);
            if break_before && current_has_content {
                section_pages.push(Vec::new());
            }

            let pieces = if options.break_pages && el.paragraph_props().is_some() {
                split_paragraph(el, options)
            } else {
                None
            };

            match pieces {
                None => {
                    if let Some(page) = section_pages.last_mut() {
                        page.push(Cow::Borrowed(el));
                    }
                }
                Some(pieces) => {
                    for (i, piece) in pieces.into_iter().enumerate() {
                        if i > 0 && section_pages.last().map(|p| !p.is_empty()).unwrap_or(false) {
                            section_pages.push(Vec::new());
                        }
                        // a paragraph broken at its start leaves an empty first piece
                        if i == 0 && !has_content(&piece) {
                            continue;
                        }
                        if let Some(page) = section_pages.last_mut() {
                            page.push(Cow::Owned(piece));
                        }
                    }
                }
            }
        }

        // a break at the very end leaves an empty trailing page
        if section_pages.len() > 1 && section_pages.last().map(Vec::is_empty).unwrap_or(false) {
            section_pages.pop();
        }

        if let Some(start) = section.props.page_number_start {
            number = start.saturating_sub(1);
        }
        for (i, content) in section_pages.into_iter().enumerate() {
            number += 1;
            pages.push(Page {
                section: section.index,
                number,
                first_in_section: i == 0,
                content,
            });
        }
    }
    pages
}

/// Which header or footer kind a page shows.
pub fn header_kind(page: &Page<'_>, props: &SectionProperties, settings: &Settings) -> HeaderFooterKind {
    if props.title_page && page.first_in_section {
        HeaderFooterKind::First
    } else if settings.even_and_odd_headers && page.number % 2 == 0 {
        HeaderFooterKind::Even
    } else {
        HeaderFooterKind::Default
    }
}

/// Header and footer references in effect for each section.
///
/// A section without a reference of some kind inherits the previous
/// section's reference of that kind.
#[derive(Debug, Clone, Default)]
pub struct HeaderFooterRefs {
    pub headers: HashMap<HeaderFooterKind, String>,
    pub footers: HashMap<HeaderFooterKind, String>,
}

pub fn inherited_refs(sections: &[SectionSlice<'_>]) -> Vec<HeaderFooterRefs> {
    let mut current = HeaderFooterRefs::default();
    sections
        .iter()
        .map(|section| {
            for r in &section.props.headers {
                current.headers.insert(r.kind, r.rel_id.clone());
            }
            for r in &section.props.footers {
                current.footers.insert(r.kind, r.rel_id.clone());
            }
            current.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeaderFooterRef, ParagraphProps};

    fn para(text: &str) -> Element {
        Element::with_children(
            ElementKind::Paragraph(ParagraphProps::default()),
            vec![Element::text_run(text)],
        )
    }

    fn page_break() -> Element {
        Element::new(ElementKind::Break {
            break_type: BreakType::Page,
        })
    }

    fn section_end(props: SectionProperties) -> Element {
        Element::new(ElementKind::Paragraph(ParagraphProps {
            section: Some(Box::new(props)),
            ..Default::default()
        }))
    }

    fn body(children: Vec<Element>, last: Option<SectionProperties>) -> Element {
        Element::with_children(
            ElementKind::Document {
                section: last.map(Box::new),
            },
            children,
        )
    }

    fn texts(page: &Page<'_>) -> Vec<String> {
        page.content.iter().map(|el| el.plain_text()).collect()
    }

    #[test]
    fn test_sections_split_at_paragraph_sect_pr() {
        let doc = body(
            vec![para("a"), section_end(SectionProperties::default()), para("b")],
            Some(SectionProperties {
                title_page: true,
                ..Default::default()
            }),
        );
        let sections = sections(&doc);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].content.len(), 2);
        assert_eq!(sections[1].content.len(), 1);
        assert!(sections[1].props.title_page);
    }

    #[test]
    fn test_page_break_splits_paragraph() {
        let mut p = para("before");
        p.children.push(Element::with_children(
            ElementKind::Run,
            vec![Element::text("x"), page_break(), Element::text("after")],
        ));
        if let ElementKind::Paragraph(props) = &mut p.kind {
            props.numbering = Some(NumberingRef {
                id: "1".to_string(),
                level: 0,
            });
        }
        let doc = body(vec![p, para("next")], None);
        let sections = sections(&doc);
        let pages = paginate(&sections, &Options::default());

        assert_eq!(pages.len(), 2);
        assert_eq!(texts(&pages[0]), vec!["beforex\n"]);
        assert_eq!(texts(&pages[1]), vec!["after\n", "next\n"]);
        let continued = pages[1].content[0].paragraph_props().unwrap();
        assert_eq!(continued.numbering.as_ref().unwrap().id, "0");
        assert_eq!((pages[0].number, pages[1].number), (1, 2));
    }

    #[test]
    fn test_break_pages_off_keeps_one_page() {
        let mut p = para("a");
        p.children.push(Element::with_children(ElementKind::Run, vec![page_break()]));
        let doc = body(vec![p, para("b")], None);
        let sections = sections(&doc);
        let pages = paginate(&sections, &Options::default().with_break_pages(false));
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].content.len(), 2);
    }

    #[test]
    fn test_page_break_before_and_rendered_hints() {
        let mut second = para("b");
        if let ElementKind::Paragraph(props) = &mut second.kind {
            props.page_break_before = true;
        }
        let mut third = para("c");
        third.children.insert(
            0,
            Element::with_children(
                ElementKind::Run,
                vec![Element::new(ElementKind::Break {
                    break_type: BreakType::LastRenderedPage,
                })],
            ),
        );
        let doc = body(vec![para("a"), second, third], None);
        let sections = sections(&doc);

        let pages = paginate(&sections, &Options::default());
        assert_eq!(pages.len(), 2);

        let options = Options::default().with_last_rendered_page_breaks(true);
        let pages = paginate(&sections, &options);
        assert_eq!(pages.len(), 3);
        // the empty piece before the hint is dropped
        assert_eq!(texts(&pages[2]), vec!["c\n"]);
    }

    #[test]
    fn test_page_numbers_restart_per_section() {
        let doc = body(
            vec![
                para("a"),
                section_end(SectionProperties::default()),
                para("b"),
            ],
            Some(SectionProperties {
                page_number_start: Some(10),
                ..Default::default()
            }),
        );
        let sections = sections(&doc);
        let pages = paginate(&sections, &Options::default());
        assert_eq!(pages.iter().map(|p| p.number).collect::<Vec<_>>(), vec![1, 10]);
        assert!(pages[1].first_in_section);
    }

    #[test]
    fn test_header_selection_and_inheritance() {
        let first = SectionProperties {
            headers: vec![
                HeaderFooterRef {
                    kind: HeaderFooterKind::Default,
                    rel_id: "rId1".to_string(),
                },
                HeaderFooterRef {
                    kind: HeaderFooterKind::First,
                    rel_id: "rId2".to_string(),
                },
            ],
            title_page: true,
            ..Default::default()
        };
        let doc = body(
            vec![para("a"), section_end(first), para("b")],
            Some(SectionProperties::default()),
        );
        let sections = sections(&doc);
        let refs = inherited_refs(&sections);
        assert_eq!(refs[1].headers[&HeaderFooterKind::Default], "rId1");

        let pages = paginate(&sections, &Options::default());
        let settings = Settings {
            even_and_odd_headers: true,
            ..Default::default()
        };
        assert_eq!(
            header_kind(&pages[0], &sections[0].props, &settings),
            HeaderFooterKind::First
        );
        assert_eq!(
            header_kind(&pages[1], &sections[1].props, &settings),
            HeaderFooterKind::Even
        );
    }
}
