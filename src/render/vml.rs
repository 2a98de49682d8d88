//! Legacy VML shapes to inline SVG.
//!
//! Shape geometry is converted to points and the outer `svg` uses a
//! point-based `viewBox`, so one user unit is one point throughout.

use super::dom::{HtmlElement, Node};
use crate::model::{Element, ElementKind, VmlShape, VmlShapeKind};
use crate::units::{format_number, length_value, LengthUsage};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// What the shape translation needs from the surrounding renderer.
pub trait VmlContext {
    /// A slot for an image fill, rendered as an SVG `image`.
    fn image(&mut self, rel_id: &str) -> Option<Node>;
    /// Rendered text box content, as an XHTML element.
    fn text_box(&mut self, content: &[Element]) -> Node;
}

fn shape_of(el: &Element) -> Option<&VmlShape> {
    match &el.kind {
        ElementKind::Vml(shape) => Some(shape),
        _ => None,
    }
}

fn num(shape: &VmlShape, key: &str) -> f64 {
    shape
        .attrs
        .get(key)
        .and_then(|v| length_value(v, LengthUsage::Point))
        .unwrap_or(0.0)
}

fn fmt(value: f64) -> String {
    format_number(value)
}

#[derive(Debug, Clone, Copy, Default)]
struct Bounds {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Bounds {
    fn of(shape: &VmlShape) -> Self {
        match shape.kind {
            VmlShapeKind::Line => {
                let (x1, y1) = (num(shape, "x1"), num(shape, "y1"));
                let (x2, y2) = (num(shape, "x2"), num(shape, "y2"));
                Bounds {
                    x: x1.min(x2),
                    y: y1.min(y2),
                    width: (x2 - x1).abs(),
                    height: (y2 - y1).abs(),
                }
            }
            _ => Bounds {
                x: num(shape, "x"),
                y: num(shape, "y"),
                width: num(shape, "width"),
                height: num(shape, "height"),
            },
        }
    }

    fn right(&self) -> f64 {
        self.x + self.width
    }

    fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Render a `w:pict` element as an inline SVG picture.
///
/// Returns `None` when nothing inside is supported.
pub fn render_vml(el: &Element, ctx: &mut dyn VmlContext) -> Option<Node> {
    let shape = shape_of(el)?;
    if shape.kind != VmlShapeKind::Picture {
        return render_shape(el, shape, ctx);
    }

    let mut width: f64 = 0.0;
    let mut height: f64 = 0.0;
    let mut shapes = Vec::new();
    for child in &el.children {
        let Some(child_shape) = shape_of(child) else {
            continue;
        };
        let bounds = Bounds::of(child_shape);
        width = width.max(bounds.right());
        height = height.max(bounds.bottom());
        if let Some(node) = render_shape(child, child_shape, ctx) {
            shapes.push(node);
        }
    }
    if shapes.is_empty() {
        return None;
    }

    let mut svg = HtmlElement::new("svg")
        .attr("xmlns", SVG_NS)
        .attr("width", format!("{}pt", fmt(width)))
        .attr("height", format!("{}pt", fmt(height)))
        .attr("viewBox", format!("0 0 {} {}", fmt(width), fmt(height)))
        .attr("style", "overflow: visible");
    svg.extend(shapes);
    Some(svg.into())
}

fn paint(svg: &mut HtmlElement, shape: &VmlShape, fill: &str, stroke: &str) {
    svg.set_attr(
        "fill",
        shape.attrs.get("fill").map(String::as_str).unwrap_or(fill),
    );
    svg.set_attr(
        "stroke",
        shape.attrs.get("stroke").map(String::as_str).unwrap_or(stroke),
    );
    let width = shape
        .attrs
        .get("stroke-width")
        .and_then(|w| length_value(w, LengthUsage::Point))
        .unwrap_or(0.75);
    svg.set_attr("stroke-width", fmt(width));
}

fn render_shape(el: &Element, shape: &VmlShape, ctx: &mut dyn VmlContext) -> Option<Node> {
    let bounds = Bounds::of(shape);
    let mut node = match shape.kind {
        VmlShapeKind::Picture | VmlShapeKind::TextBox => return None,
        VmlShapeKind::Group => {
            let mut group = HtmlElement::new("svg")
                .attr("x", fmt(bounds.x))
                .attr("y", fmt(bounds.y))
                .attr("width", fmt(bounds.width))
                .attr("height", fmt(bounds.height))
                .attr("preserveAspectRatio", "none");
            if let Some(view_box) = shape.attrs.get("viewBox") {
                group.set_attr("viewBox", view_box.clone());
            }
            for child in &el.children {
                if let Some(child_shape) = shape_of(child) {
                    if let Some(node) = render_shape(child, child_shape, ctx) {
                        group.push(node);
                    }
                }
            }
            return Some(group.into());
        }
        VmlShapeKind::Rect | VmlShapeKind::RoundRect => {
            let mut rect = HtmlElement::new("rect")
                .attr("x", fmt(bounds.x))
                .attr("y", fmt(bounds.y))
                .attr("width", fmt(bounds.width))
                .attr("height", fmt(bounds.height));
            if shape.kind == VmlShapeKind::RoundRect {
                let arc = shape
                    .attrs
                    .get("arcsize")
                    .and_then(|a| a.parse::<f64>().ok())
                    .unwrap_or(0.2);
                rect.set_attr("rx", fmt(arc * bounds.width.min(bounds.height) / 2.0));
            }
            paint(&mut rect, shape, "#ffffff", "#000000");
            rect
        }
        VmlShapeKind::Oval => {
            let mut ellipse = HtmlElement::new("ellipse")
                .attr("cx", fmt(bounds.x + bounds.width / 2.0))
                .attr("cy", fmt(bounds.y + bounds.height / 2.0))
                .attr("rx", fmt(bounds.width / 2.0))
                .attr("ry", fmt(bounds.height / 2.0));
            paint(&mut ellipse, shape, "#ffffff", "#000000");
            ellipse
        }
        VmlShapeKind::Line => {
            let mut line = HtmlElement::new("line")
                .attr("x1", fmt(num(shape, "x1")))
                .attr("y1", fmt(num(shape, "y1")))
                .attr("x2", fmt(num(shape, "x2")))
                .attr("y2", fmt(num(shape, "y2")));
            paint(&mut line, shape, "none", "#000000");
            line
        }
        VmlShapeKind::PolyLine => {
            let mut poly = HtmlElement::new("polyline")
                .attr("points", shape.attrs.get("points").cloned().unwrap_or_default());
            paint(&mut poly, shape, "none", "#000000");
            poly
        }
        VmlShapeKind::Shape => {
            let mut group = HtmlElement::new("g");
            if shape.attrs.contains_key("fill") || shape.attrs.contains_key("stroke") {
                let mut rect = HtmlElement::new("rect")
                    .attr("x", fmt(bounds.x))
                    .attr("y", fmt(bounds.y))
                    .attr("width", fmt(bounds.width))
                    .attr("height", fmt(bounds.height));
                paint(&mut rect, shape, "none", "none");
                group.push(rect);
            }
            group
        }
    };

    // image fill and text box content sit in the shape's box
    let mut extras = Vec::new();
    if let Some(image) = shape.image_rel.as_deref().and_then(|rel| ctx.image(rel)) {
        extras.push(
            HtmlElement::new("svg")
                .attr("x", fmt(bounds.x))
                .attr("y", fmt(bounds.y))
                .attr("width", fmt(bounds.width))
                .attr("height", fmt(bounds.height))
                .child(image)
                .into(),
        );
    }
    for child in &el.children {
        if matches!(shape_of(child), Some(s) if s.kind == VmlShapeKind::TextBox) {
            extras.push(
                HtmlElement::new("foreignObject")
                    .attr("x", fmt(bounds.x))
                    .attr("y", fmt(bounds.y))
                    .attr("width", fmt(bounds.width))
                    .attr("height", fmt(bounds.height))
                    .child(ctx.text_box(&child.children))
                    .into(),
            );
        }
    }

    if extras.is_empty() {
        return Some(node.into());
    }
    if node.tag != "g" {
        node = HtmlElement::new("g").child(node);
    }
    node.extend(extras);
    Some(node.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    struct Recorder {
        images: Vec<String>,
    }

    impl VmlContext for Recorder {
        fn image(&mut self, rel_id: &str) -> Option<Node> {
            self.images.push(rel_id.to_string());
            Some(Node::Slot(self.images.len() - 1))
        }

        fn text_box(&mut self, content: &[Element]) -> Node {
            let text: String = content.iter().map(|c| c.plain_text()).collect();
            HtmlElement::new("div").text(text).into()
        }
    }

    fn shape(kind: VmlShapeKind, attrs: &[(&str, &str)], children: Vec<Element>) -> Element {
        Element::with_children(
            ElementKind::Vml(VmlShape {
                kind,
                attrs: attrs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect::<BTreeMap<_, _>>(),
                image_rel: None,
            }),
            children,
        )
    }

    fn html(node: &Node) -> String {
        let mut out = String::new();
        node.write_html(&mut out);
        out
    }

    #[test]
    fn test_rect_in_picture() {
        let pict = shape(
            VmlShapeKind::Picture,
            &[],
            vec![shape(
                VmlShapeKind::Rect,
                &[("width", "100pt"), ("height", "50pt"), ("fill", "#4472c4")],
                vec![],
            )],
        );
        let mut ctx = Recorder { images: vec![] };
        let out = html(&render_vml(&pict, &mut ctx).unwrap());
        assert!(out.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="100.00pt" height="50.00pt" viewBox="0 0 100.00 50.00""#));
        assert!(out.contains(r##"<rect x="0.00" y="0.00" width="100.00" height="50.00" fill="#4472c4" stroke="#000000" stroke-width="0.75">"##));
    }

    #[test]
    fn test_oval_and_line() {
        let pict = shape(
            VmlShapeKind::Picture,
            &[],
            vec![
                shape(VmlShapeKind::Oval, &[("width", "20pt"), ("height", "10pt")], vec![]),
                shape(
                    VmlShapeKind::Line,
                    &[("x1", "0"), ("y1", "0"), ("x2", "40pt"), ("y2", "5pt")],
                    vec![],
                ),
            ],
        );
        let mut ctx = Recorder { images: vec![] };
        let out = html(&render_vml(&pict, &mut ctx).unwrap());
        assert!(out.contains(r#"<ellipse cx="10.00" cy="5.00" rx="10.00" ry="5.00""#));
        assert!(out.contains(r#"<line x1="0.00" y1="0.00" x2="40.00" y2="5.00" fill="none""#));
        assert!(out.contains(r#"width="40.00pt" height="10.00pt""#));
    }

    #[test]
    fn test_shape_with_image_and_textbox() {
        let mut s = shape(
            VmlShapeKind::Shape,
            &[("width", "200pt"), ("height", "80pt")],
            vec![shape(VmlShapeKind::TextBox, &[], vec![Element::text_run("boxed")])],
        );
        if let ElementKind::Vml(v) = &mut s.kind {
            v.image_rel = Some("rId9".to_string());
        }
        let pict = shape(VmlShapeKind::Picture, &[], vec![s]);
        let mut ctx = Recorder { images: vec![] };
        let node = render_vml(&pict, &mut ctx).unwrap();
        assert_eq!(ctx.images, vec!["rId9".to_string()]);

        let svg = node.as_element().unwrap();
        let group = svg.children[0].as_element().unwrap();
        assert_eq!(group.tag, "g");
        assert_eq!(group.children[0].as_element().unwrap().children[0], Node::Slot(0));
        assert!(html(&node).contains("<foreignObject x=\"0.00\" y=\"0.00\" width=\"200.00\" height=\"80.00\"><div>boxed</div></foreignObject>"));
    }

    #[test]
    fn test_empty_picture_renders_nothing() {
        let pict = shape(VmlShapeKind::Picture, &[], vec![]);
        let mut ctx = Recorder { images: vec![] };
        assert!(render_vml(&pict, &mut ctx).is_none());
    }
}
