//! Comment markers, ranges and the per-page comment list.
//!
//! Rendering is best effort: markers are only emitted for comments the
//! comments part defines, so a missing part yields plain content.

use super::dom::{HtmlElement, Node};
use super::options::Options;
use crate::model::CommentInfo;
use std::collections::HashMap;

/// Numbers comments in order of first appearance and collects the ones the
/// current page refers to.
#[derive(Debug, Default)]
pub struct CommentTracker {
    numbers: HashMap<String, u32>,
    page: Vec<String>,
}

impl CommentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Display number of a comment, assigning one on first sight.
    pub fn number(&mut self, id: &str) -> u32 {
        let next = self.numbers.len() as u32 + 1;
        let number = *self.numbers.entry(id.to_string()).or_insert(next);
        if !self.page.iter().any(|p| p == id) {
            self.page.push(id.to_string());
        }
        number
    }

    /// Comment ids referenced since the last call, in order.
    pub fn take_page(&mut self) -> Vec<(String, u32)> {
        std::mem::take(&mut self.page)
            .into_iter()
            .map(|id| {
                let number = self.numbers.get(&id).copied().unwrap_or(0);
                (id, number)
            })
            .collect()
    }
}

fn anchor(options: &Options, id: &str) -> String {
    format!("{}-comment-{}", options.class_name, id)
}

/// Zero-width marker at the start of a commented range.
pub fn range_start(id: &str, options: &Options) -> Node {
    HtmlElement::new("span")
        .class(&options.class("comment-start"))
        .attr("data-comment-id", id)
        .into()
}

/// Zero-width marker at the end of a commented range.
pub fn range_end(id: &str, options: &Options) -> Node {
    HtmlElement::new("span")
        .class(&options.class("comment-end"))
        .attr("data-comment-id", id)
        .into()
}

/// `<sup class="{p}-comment-ref"><a href="#...">[n]</a></sup>`
pub fn reference(id: &str, number: u32, options: &Options) -> Node {
    HtmlElement::new("sup")
        .class(&options.class("comment-ref"))
        .child(
            HtmlElement::new("a")
                .attr("href", format!("#{}", anchor(options, id)))
                .text(format!("[{}]", number)),
        )
        .into()
}

fn marker_id<'n>(node: &'n Node, class: &str) -> Option<&'n str> {
    let el = node.as_element()?;
    if el.has_class(class) {
        el.get_attr("data-comment-id")
    } else {
        None
    }
}

/// Wrap the nodes between sibling start and end markers in
/// `<mark class="{p}-comment-range">`.
///
/// Ranges whose start and end markers have different parents are left as
/// bare markers.
pub fn wrap_comment_ranges(nodes: &mut Vec<Node>, options: &Options) {
    for node in nodes.iter_mut() {
        if let Node::Element(el) = node {
            wrap_comment_ranges(&mut el.children, options);
        }
    }
    wrap_siblings(nodes, options);
}

/// Wrap ranges among `nodes` themselves; ranges nested inside a wrapped
/// range are wrapped within its `mark`.
fn wrap_siblings(nodes: &mut Vec<Node>, options: &Options) {
    let start_class = options.class("comment-start");
    let end_class = options.class("comment-end");
    let mut i = 0;
    while i < nodes.len() {
        let Some(id) = marker_id(&nodes[i], &start_class).map(String::from) else {
            i += 1;
            continue;
        };
        let end = nodes[i + 1..]
            .iter()
            .position(|n| marker_id(n, &end_class) == Some(id.as_str()))
            .map(|offset| i + 1 + offset);
        match end {
            Some(end) if end > i + 1 => {
                let mut inner: Vec<Node> = nodes.drain(i + 1..end).collect();
                wrap_siblings(&mut inner, options);
                let mut mark = HtmlElement::new("mark")
                    .class(&options.class("comment-range"))
                    .attr("data-comment-id", id);
                mark.extend(inner);
                nodes.insert(i + 1, mark.into());
                i += 3;
            }
            _ => i += 1,
        }
    }
}

/// One comment of the page's comment list.
pub fn comment_item(info: &CommentInfo, number: u32, body: Vec<Node>, options: &Options) -> Node {
    let mut heading = format!("[{}]", number);
    if let Some(author) = &info.author {
        heading.push(' ');
        heading.push_str(author);
    }
    let mut meta = HtmlElement::new("div")
        .class(&options.class("comment-author"))
        .text(heading);
    if let Some(date) = &info.date {
        meta.push(
            HtmlElement::new("time")
                .attr("datetime", date.clone())
                .text(format!(" {}", date)),
        );
    }

    let mut item = HtmlElement::new("div")
        .class(&options.class("comment"))
        .attr("id", anchor(options, &info.id))
        .child(meta);
    item.extend(body);
    item.into()
}

/// The comment list of a page.
pub fn comment_list(items: Vec<Node>, options: &Options) -> Node {
    let mut aside = HtmlElement::new("aside").class(&options.class("comments"));
    aside.extend(items);
    aside.into()
}
