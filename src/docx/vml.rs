//! Legacy VML drawing (`w:pict`, `w:object`) parsing.
//!
//! Only the shapes in [`VmlShapeKind`] are kept. Their geometry and paint
//! attributes are normalised to the SVG attribute names the renderer emits.

use crate::model::{Element, ElementKind, VmlShape, VmlShapeKind};
use crate::units::{format_number, length_value, LengthUsage};
use crate::xml::XmlElement;
use std::collections::BTreeMap;

/// VML colours may carry a palette index suffix (`#4472c4 [3204]`).
fn vml_color(raw: &str) -> Option<String> {
    let color = raw.split_whitespace().next()?;
    if color.is_empty() {
        None
    } else {
        Some(color.to_string())
    }
}

fn is_off(raw: Option<&str>) -> bool {
    matches!(raw, Some("f") | Some("false") | Some("0"))
}

/// Split a VML `style` attribute into its declarations.
fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (k, v) = decl.split_once(':')?;
            Some((k.trim().to_string(), v.trim().to_string()))
        })
        .collect()
}

/// Coordinate pair (`from`, `to`, `coordsize`, `coordorigin`).
fn pair(raw: &str) -> Option<(String, String)> {
    let (a, b) = raw.split_once(',')?;
    Some((a.trim().to_string(), b.trim().to_string()))
}

/// Polyline points with units stripped to point values.
fn points(raw: &str) -> Option<String> {
    let values: Vec<String> = raw
        .split([',', ' '])
        .filter(|s| !s.is_empty())
        .map(|v| length_value(v, LengthUsage::Point).map(format_number))
        .collect::<Option<Vec<_>>>()?;
    if values.len() < 4 || values.len() % 2 != 0 {
        return None;
    }
    Some(
        values
            .chunks(2)
            .map(|c| format!("{},{}", c[0], c[1]))
            .collect::<Vec<_>>()
            .join(" "),
    )
}

fn shape_attrs(el: &XmlElement, kind: VmlShapeKind) -> BTreeMap<String, String> {
    let mut attrs = BTreeMap::new();

    if let Some(style) = el.attr("style") {
        for (key, value) in parse_style(style) {
            match key.as_str() {
                "left" | "margin-left" => {
                    attrs.insert("x".to_string(), value);
                }
                "top" | "margin-top" => {
                    attrs.insert("y".to_string(), value);
                }
                "width" | "height" | "rotation" => {
                    attrs.insert(key, value);
                }
                _ => {}
            }
        }
    }

    // Paint
    if is_off(el.attr("filled")) {
        attrs.insert("fill".to_string(), "none".to_string());
    } else if let Some(fill) = el
        .attr("fillcolor")
        .or_else(|| el.child("v:fill").and_then(|f| f.attr("color")))
        .and_then(vml_color)
    {
        attrs.insert("fill".to_string(), fill);
    }
    if is_off(el.attr("stroked")) {
        attrs.insert("stroke".to_string(), "none".to_string());
    } else {
        let stroke_el = el.child("v:stroke");
        if let Some(stroke) = el
            .attr("strokecolor")
            .or_else(|| stroke_el.and_then(|s| s.attr("color")))
            .and_then(vml_color)
        {
            attrs.insert("stroke".to_string(), stroke);
        }
        if let Some(weight) = el
            .attr("strokeweight")
            .or_else(|| stroke_el.and_then(|s| s.attr("weight")))
        {
            attrs.insert("stroke-width".to_string(), weight.to_string());
        }
    }

    // Geometry
    match kind {
        VmlShapeKind::Line => {
            if let Some((x1, y1)) = el.attr("from").and_then(pair) {
                attrs.insert("x1".to_string(), x1);
                attrs.insert("y1".to_string(), y1);
            }
            if let Some((x2, y2)) = el.attr("to").and_then(pair) {
                attrs.insert("x2".to_string(), x2);
                attrs.insert("y2".to_string(), y2);
            }
        }
        VmlShapeKind::PolyLine => {
            if let Some(pts) = el.attr("points").and_then(points) {
                attrs.insert("points".to_string(), pts);
            }
        }
        VmlShapeKind::RoundRect => {
            // arcsize is a fraction of the shorter side ("0.1" or "6554f")
            let arc = el.attr("arcsize").and_then(|a| {
                let a = a.trim();
                match a.strip_suffix('f') {
                    Some(fixed) => fixed.parse::<f64>().ok().map(|v| v / 65536.0),
                    None => a.trim_end_matches('%').parse::<f64>().ok().map(|v| {
                        if v > 1.0 {
                            v / 100.0
                        } else {
                            v
                        }
                    }),
                }
            });
            attrs.insert(
                "arcsize".to_string(),
                format_number(arc.unwrap_or(0.2)),
            );
        }
        VmlShapeKind::Group => {
            let size = el.attr("coordsize").and_then(pair);
            let origin = el
                .attr("coordorigin")
                .and_then(pair)
                .unwrap_or_else(|| ("0".to_string(), "0".to_string()));
            if let Some((w, h)) = size {
                attrs.insert(
                    "viewBox".to_string(),
                    format!("{} {} {} {}", origin.0, origin.1, w, h),
                );
            }
        }
        _ => {}
    }

    attrs
}

/// Parse a VML container or shape.
///
/// `content` parses the body content of a `w:txbxContent` so text boxes
/// keep their paragraphs. Returns `None` for elements outside the supported
/// shape set.
pub fn parse_vml(
    el: &XmlElement,
    content: &mut dyn FnMut(&XmlElement) -> Vec<Element>,
) -> Option<Element> {
    let kind = VmlShapeKind::from_name(&el.name)?;

    if kind == VmlShapeKind::TextBox {
        let mut textbox = Element::new(ElementKind::Vml(VmlShape {
            kind,
            attrs: BTreeMap::new(),
            image_rel: None,
        }));
        if let Some(txbx) = el.child("w:txbxContent") {
            textbox.children = content(txbx);
        }
        return Some(textbox);
    }

    let image_rel = el
        .child("v:imagedata")
        .and_then(|img| img.attr("r:id").or_else(|| img.attr("o:relid")))
        .map(String::from);

    let mut element = Element::new(ElementKind::Vml(VmlShape {
        kind,
        attrs: shape_attrs(el, kind),
        image_rel,
    }));

    for child in el.elements() {
        if let Some(shape) = parse_vml(child, content) {
            element.children.push(shape);
        }
    }

    Some(element)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Option<Element> {
        let tree = XmlElement::parse(xml).unwrap();
        parse_vml(&tree, &mut |_| vec![Element::text_run("boxed")])
    }

    fn shape(el: &Element) -> &VmlShape {
        match &el.kind {
            ElementKind::Vml(shape) => shape,
            other => panic!("not a VML shape: {:?}", other),
        }
    }

    #[test]
    fn test_rect_paint() {
        let el = parse(
            r##"<w:pict><v:rect style="position:absolute;width:100pt;height:50pt" fillcolor="#4472c4 [3204]" strokecolor="red" strokeweight="2pt"/></w:pict>"##,
        )
        .unwrap();
        assert_eq!(shape(&el).kind, VmlShapeKind::Picture);
        let rect = shape(&el.children[0]);
        assert_eq!(rect.kind, VmlShapeKind::Rect);
        assert_eq!(rect.attrs["width"], "100pt");
        assert_eq!(rect.attrs["fill"], "#4472c4");
        assert_eq!(rect.attrs["stroke"], "red");
        assert_eq!(rect.attrs["stroke-width"], "2pt");
    }

    #[test]
    fn test_line_and_polyline() {
        let el = parse(r#"<w:pict><v:line from="0,0" to="100pt,20pt"/><v:polyline points="0,0,10pt,10pt,20pt,0" filled="f"/></w:pict>"#).unwrap();
        let line = shape(&el.children[0]);
        assert_eq!(line.attrs["x2"], "100pt");
        let poly = shape(&el.children[1]);
        assert_eq!(poly.attrs["points"], "0.00,0.00 10.00,10.00 20.00,0.00");
        assert_eq!(poly.attrs["fill"], "none");
    }

    #[test]
    fn test_textbox_and_image() {
        let el = parse(
            r#"<w:pict><v:shape style="width:200pt;height:80pt"><v:imagedata r:id="rId9"/><v:textbox><w:txbxContent><w:p/></w:txbxContent></v:textbox></v:shape></w:pict>"#,
        )
        .unwrap();
        let s = &el.children[0];
        assert_eq!(shape(s).image_rel.as_deref(), Some("rId9"));
        let textbox = &s.children[0];
        assert_eq!(shape(textbox).kind, VmlShapeKind::TextBox);
        assert_eq!(textbox.plain_text(), "boxed");
    }

    #[test]
    fn test_unsupported_shapes_are_omitted() {
        let el = parse(r#"<w:pict><v:arc/><v:shapetype/><v:oval/></w:pict>"#).unwrap();
        assert_eq!(el.children.len(), 1);
        assert_eq!(shape(&el.children[0]).kind, VmlShapeKind::Oval);
        assert!(parse("<v:arc/>").is_none());
    }
}
