//! Translation of WordprocessingML property elements to CSS.
//!
//! Each function reads one property container (`w:pPr`, `w:rPr`, `w:tblPr`,
//! `w:trPr`, `w:tcPr`) and writes the CSS it implies into a [`CssProps`].
//! Children that carry structure rather than formatting (`w:numPr`,
//! `w:pStyle`, `w:gridSpan`, ...) are left to the element parser.

use crate::model::CssProps;
use crate::units::{
    convert_border, convert_boolean, convert_color, convert_length, css_string, highlight_color,
    shading_color, theme_color_var, theme_font_var, underline_style, LengthUsage,
};
use crate::xml::XmlElement;

/// Border sides and the CSS properties they map to.
const BORDER_SIDES: [(&str, &str); 6] = [
    ("w:top", "border-top"),
    ("w:bottom", "border-bottom"),
    ("w:left", "border-left"),
    ("w:start", "border-left"),
    ("w:right", "border-right"),
    ("w:end", "border-right"),
];

/// Margin sides (`w:tblCellMar`, `w:tcMar`) and their padding properties.
const PADDING_SIDES: [(&str, &str); 6] = [
    ("w:top", "padding-top"),
    ("w:bottom", "padding-bottom"),
    ("w:left", "padding-left"),
    ("w:start", "padding-left"),
    ("w:right", "padding-right"),
    ("w:end", "padding-right"),
];

/// Value of an `ST_OnOff` toggle element.
fn toggle(el: &XmlElement) -> bool {
    convert_boolean(el.val(), true)
}

/// Colour of an element with `w:val` / `w:themeColor`.
fn color_value(el: &XmlElement) -> Option<String> {
    let explicit = el.val().and_then(convert_color);
    match el.attr("w:themeColor") {
        Some(theme) => theme_color_var(theme, explicit.as_deref()),
        None => explicit,
    }
}

/// A `w:w` + `w:type` width (`w:tblW`, `w:tcW`, `w:tblInd`, margins).
pub fn width_value(el: &XmlElement) -> Option<String> {
    let raw = el.attr("w:w")?;
    match el.attr("w:type") {
        Some("auto") | Some("nil") => None,
        Some("pct") => convert_length(raw, LengthUsage::Percent),
        _ => convert_length(raw, LengthUsage::Dxa),
    }
}

fn border_value(el: &XmlElement) -> Option<String> {
    let color = el.attr("w:color");
    let color_css = match el.attr("w:themeColor") {
        Some(theme) => theme_color_var(theme, color.and_then(convert_color).as_deref()),
        None => None,
    };
    let border = convert_border(el.val(), el.attr("w:sz"), color)?;
    match color_css {
        Some(theme_css) if border != "none" => {
            // Replace the trailing colour with the theme reference
            let mut parts: Vec<&str> = border.splitn(3, ' ').collect();
            parts.truncate(2);
            Some(format!("{} {}", parts.join(" "), theme_css))
        }
        _ => Some(border),
    }
}

/// Translate a border container (`w:pBdr`, `w:tblBorders`, `w:tcBorders`).
pub fn borders_css(container: &XmlElement, css: &mut CssProps) {
    for (name, prop) in BORDER_SIDES {
        if let Some(side) = container.child(name) {
            css.set_opt(prop, border_value(side));
        }
    }
}

/// Translate the inside borders of `w:tblBorders` to per-cell borders.
pub fn inside_borders_css(container: &XmlElement, cell_css: &mut CssProps) {
    if let Some(h) = container.child("w:insideH").and_then(border_value) {
        cell_css.set("border-top", h.clone());
        cell_css.set("border-bottom", h);
    }
    if let Some(v) = container.child("w:insideV").and_then(border_value) {
        cell_css.set("border-left", v.clone());
        cell_css.set("border-right", v);
    }
}

fn margins_css(container: &XmlElement, css: &mut CssProps) {
    for (name, prop) in PADDING_SIDES {
        if let Some(side) = container.child(name) {
            css.set_opt(prop, width_value(side));
        }
    }
}

fn shading_css(el: &XmlElement, css: &mut CssProps) {
    let fill = match el.attr("w:themeFill") {
        Some(theme) => theme_color_var(theme, el.attr("w:fill").and_then(convert_color).as_deref()),
        None => shading_color(el.val(), el.attr("w:color"), el.attr("w:fill")),
    };
    css.set_opt("background-color", fill);
}

fn text_align(val: &str) -> Option<&'static str> {
    match val {
        "left" | "start" => Some("left"),
        "right" | "end" => Some("right"),
        "center" => Some("center"),
        "both" | "distribute" | "lowKashida" | "mediumKashida" | "highKashida"
        | "thaiDistribute" => Some("justify"),
        _ => None,
    }
}

fn vertical_align(val: &str) -> Option<&'static str> {
    match val {
        "top" => Some("top"),
        "center" => Some("middle"),
        "bottom" => Some("bottom"),
        "baseline" => Some("baseline"),
        "auto" => Some("baseline"),
        _ => None,
    }
}

fn spacing_css(el: &XmlElement, css: &mut CssProps) {
    if let Some(before) = el.attr("w:before") {
        css.set_opt("margin-top", convert_length(before, LengthUsage::Dxa));
    }
    if let Some(after) = el.attr("w:after") {
        css.set_opt("margin-bottom", convert_length(after, LengthUsage::Dxa));
    }
    if let Some(line) = el.attr("w:line") {
        match el.attr("w:lineRule") {
            Some("exact") => css.set_opt("line-height", convert_length(line, LengthUsage::Dxa)),
            Some("atLeast") => {
                if let Some(pt) = convert_length(line, LengthUsage::Dxa) {
                    css.set("line-height", format!("calc(100% + {})", pt));
                }
            }
            _ => css.set_opt("line-height", convert_length(line, LengthUsage::LineHeight)),
        }
    }
}

fn indentation_css(el: &XmlElement, css: &mut CssProps) {
    let left = el.attr("w:left").or_else(|| el.attr("w:start"));
    let right = el.attr("w:right").or_else(|| el.attr("w:end"));
    if let Some(left) = left {
        css.set_opt("margin-left", convert_length(left, LengthUsage::Dxa));
    }
    if let Some(right) = right {
        css.set_opt("margin-right", convert_length(right, LengthUsage::Dxa));
    }
    if let Some(first) = el.attr("w:firstLine") {
        css.set_opt("text-indent", convert_length(first, LengthUsage::Dxa));
    }
    if let Some(hanging) = el.attr("w:hanging") {
        if let Some(value) = convert_length(hanging, LengthUsage::Dxa) {
            css.set("text-indent", format!("-{}", value));
        }
    }
}

/// Translate `w:pPr` formatting.
pub fn paragraph_css(ppr: &XmlElement, css: &mut CssProps) {
    for el in ppr.elements() {
        match el.name.as_str() {
            "w:jc" => {
                if let Some(align) = el.val().and_then(text_align) {
                    css.set("text-align", align);
                }
            }
            "w:textAlignment" => {
                if let Some(align) = el.val().and_then(vertical_align) {
                    css.set("vertical-align", align);
                }
            }
            "w:spacing" => spacing_css(el, css),
            "w:ind" => indentation_css(el, css),
            "w:pBdr" => borders_css(el, css),
            "w:shd" => shading_css(el, css),
            "w:keepNext" if toggle(el) => css.set("break-after", "avoid"),
            "w:keepLines" if toggle(el) => css.set("break-inside", "avoid"),
            "w:bidi" if toggle(el) => css.set("direction", "rtl"),
            "w:suppressAutoHyphens" if toggle(el) => css.set("hyphens", "manual"),
            "w:wordWrap" if !toggle(el) => css.set("word-break", "break-all"),
            _ => {}
        }
    }
}

fn font_family_css(el: &XmlElement, css: &mut CssProps) {
    let primary = el
        .attr("w:asciiTheme")
        .or_else(|| el.attr("w:hAnsiTheme"))
        .and_then(theme_font_var)
        .or_else(|| el.attr("w:ascii").or_else(|| el.attr("w:hAnsi")).map(css_string));
    let east_asian = el
        .attr("w:eastAsiaTheme")
        .and_then(theme_font_var)
        .or_else(|| el.attr("w:eastAsia").map(css_string));

    let mut families: Vec<String> = Vec::new();
    for family in [primary, east_asian].into_iter().flatten() {
        if !families.contains(&family) {
            families.push(family);
        }
    }
    if !families.is_empty() {
        css.set("font-family", families.join(", "));
    }
}

/// Translate `w:rPr` formatting.
pub fn run_css(rpr: &XmlElement, css: &mut CssProps) {
    let mut underline: Option<bool> = None;
    let mut strike: Option<bool> = None;
    let mut highlight: Option<&'static str> = None;

    for el in rpr.elements() {
        match el.name.as_str() {
            "w:rFonts" => font_family_css(el, css),
            "w:b" => css.set("font-weight", if toggle(el) { "bold" } else { "normal" }),
            "w:i" => css.set("font-style", if toggle(el) { "italic" } else { "normal" }),
            "w:caps" => css.set("text-transform", if toggle(el) { "uppercase" } else { "none" }),
            "w:smallCaps" => {
                css.set("font-variant", if toggle(el) { "small-caps" } else { "normal" })
            }
            "w:strike" | "w:dstrike" => strike = Some(toggle(el)),
            "w:u" => {
                let style = el.val().map(underline_style).unwrap_or(Some("solid"));
                underline = Some(style.is_some());
                if let Some(style) = style {
                    if style != "solid" {
                        css.set("text-decoration-style", style);
                    }
                    if let Some(color) = el.attr("w:color").and_then(convert_color) {
                        css.set("text-decoration-color", color);
                    }
                }
            }
            "w:color" => css.set_opt("color", color_value(el)),
            "w:sz" => {
                if let Some(size) = el.val() {
                    css.set_opt("font-size", convert_length(size, LengthUsage::FontSize));
                }
            }
            "w:highlight" => highlight = el.val().and_then(highlight_color),
            "w:shd" => shading_css(el, css),
            "w:vertAlign" => match el.val() {
                Some("superscript") => {
                    css.set("vertical-align", "super");
                    css.set("font-size", "smaller");
                }
                Some("subscript") => {
                    css.set("vertical-align", "sub");
                    css.set("font-size", "smaller");
                }
                _ => {}
            },
            "w:position" => {
                if let Some(pos) = el.val() {
                    css.set_opt("vertical-align", convert_length(pos, LengthUsage::FontSize));
                }
            }
            "w:spacing" => {
                if let Some(spacing) = el.val() {
                    css.set_opt("letter-spacing", convert_length(spacing, LengthUsage::Dxa));
                }
            }
            "w:vanish" if toggle(el) => css.set("display", "none"),
            "w:noWrap" if toggle(el) => css.set("white-space", "nowrap"),
            "w:rtl" if toggle(el) => css.set("direction", "rtl"),
            "w:bdr" => css.set_opt("border", border_value(el)),
            "w:outline" if toggle(el) => {
                css.set("-webkit-text-stroke", "1px");
                css.set("color", "transparent");
            }
            "w:shadow" if toggle(el) => css.set("text-shadow", "1px 1px 1px rgba(0, 0, 0, 0.5)"),
            "w:emboss" if toggle(el) => css.set("text-shadow", "-1px -1px 0 #808080"),
            "w:imprint" if toggle(el) => css.set("text-shadow", "1px 1px 0 #808080"),
            _ => {}
        }
    }

    if let Some(color) = highlight {
        css.set("background-color", color);
    }

    match (underline, strike) {
        (None, None) => {}
        (u, s) => {
            let mut lines = Vec::new();
            if u == Some(true) {
                lines.push("underline");
            }
            if s == Some(true) {
                lines.push("line-through");
            }
            if lines.is_empty() {
                css.set("text-decoration", "none");
            } else {
                css.set("text-decoration", lines.join(" "));
            }
        }
    }
}

/// Translate `w:tblPr` formatting.
///
/// Table-level properties go to `css`; properties every cell receives
/// (inside borders, default cell margins) go to `cell_css`.
pub fn table_css(tblpr: &XmlElement, css: &mut CssProps, cell_css: &mut CssProps) {
    for el in tblpr.elements() {
        match el.name.as_str() {
            "w:tblW" => css.set_opt("width", width_value(el)),
            "w:jc" => match el.val() {
                Some("center") => {
                    css.set("margin-left", "auto");
                    css.set("margin-right", "auto");
                }
                Some("right") | Some("end") => css.set("margin-left", "auto"),
                _ => {}
            },
            "w:tblInd" => css.set_opt("margin-left", width_value(el)),
            "w:tblBorders" => {
                borders_css(el, css);
                inside_borders_css(el, cell_css);
            }
            "w:tblCellMar" => margins_css(el, cell_css),
            "w:shd" => shading_css(el, css),
            "w:tblLayout" if el.attr("w:type") == Some("fixed") => {
                css.set("table-layout", "fixed")
            }
            "w:tblCellSpacing" => {
                if let Some(spacing) = width_value(el) {
                    css.set("border-spacing", spacing);
                    css.set("border-collapse", "separate");
                }
            }
            "w:bidiVisual" if toggle(el) => css.set("direction", "rtl"),
            _ => {}
        }
    }
}

/// Translate `w:trPr` formatting.
pub fn row_css(trpr: &XmlElement, css: &mut CssProps) {
    for el in trpr.elements() {
        match el.name.as_str() {
            "w:trHeight" => {
                if let Some(height) = el.val().and_then(|v| convert_length(v, LengthUsage::Dxa)) {
                    css.set("height", height);
                }
            }
            "w:cantSplit" if toggle(el) => css.set("break-inside", "avoid"),
            "w:jc" => {
                if let Some(align) = el.val().and_then(text_align) {
                    css.set("text-align", align);
                }
            }
            _ => {}
        }
    }
}

/// Translate `w:tcPr` formatting.
pub fn cell_css(tcpr: &XmlElement, css: &mut CssProps) {
    for el in tcpr.elements() {
        match el.name.as_str() {
            "w:tcW" => css.set_opt("width", width_value(el)),
            "w:tcBorders" => borders_css(el, css),
            "w:tcMar" => margins_css(el, css),
            "w:shd" => shading_css(el, css),
            "w:vAlign" => {
                if let Some(align) = el.val().and_then(vertical_align) {
                    css.set("vertical-align", align);
                }
            }
            "w:noWrap" if toggle(el) => css.set("white-space", "nowrap"),
            "w:textDirection" => match el.val() {
                Some("btLr") => {
                    css.set("writing-mode", "vertical-rl");
                    css.set("transform", "rotate(180deg)");
                }
                Some("tbRl") | Some("tbRlV") => css.set("writing-mode", "vertical-rl"),
                _ => {}
            },
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xml(s: &str) -> XmlElement {
        XmlElement::parse(s).unwrap()
    }

    #[test]
    fn test_paragraph_css() {
        let ppr = xml(
            r#"<w:pPr><w:jc w:val="both"/><w:spacing w:before="240" w:after="120" w:line="360" w:lineRule="auto"/><w:ind w:left="720" w:hanging="360"/></w:pPr>"#,
        );
        let mut css = CssProps::new();
        paragraph_css(&ppr, &mut css);
        assert_eq!(css.get("text-align"), Some("justify"));
        assert_eq!(css.get("margin-top"), Some("12.00pt"));
        assert_eq!(css.get("margin-bottom"), Some("6.00pt"));
        assert_eq!(css.get("line-height"), Some("1.50"));
        assert_eq!(css.get("margin-left"), Some("36.00pt"));
        assert_eq!(css.get("text-indent"), Some("-18.00pt"));
    }

    #[test]
    fn test_run_css() {
        let rpr = xml(
            r#"<w:rPr><w:rFonts w:ascii="Arial" w:eastAsia="MS Mincho"/><w:b/><w:i w:val="0"/><w:u w:val="double"/><w:strike/><w:sz w:val="28"/><w:color w:val="FF0000"/><w:highlight w:val="yellow"/></w:rPr>"#,
        );
        let mut css = CssProps::new();
        run_css(&rpr, &mut css);
        assert_eq!(css.get("font-family"), Some("'Arial', 'MS Mincho'"));
        assert_eq!(css.get("font-weight"), Some("bold"));
        assert_eq!(css.get("font-style"), Some("normal"));
        assert_eq!(css.get("text-decoration"), Some("underline line-through"));
        assert_eq!(css.get("text-decoration-style"), Some("double"));
        assert_eq!(css.get("font-size"), Some("14.00pt"));
        assert_eq!(css.get("color"), Some("#FF0000"));
        assert_eq!(css.get("background-color"), Some("#FFFF00"));
    }

    #[test]
    fn test_theme_references() {
        let rpr = xml(
            r#"<w:rPr><w:rFonts w:asciiTheme="minorHAnsi"/><w:color w:val="2F5496" w:themeColor="accent1"/></w:rPr>"#,
        );
        let mut css = CssProps::new();
        run_css(&rpr, &mut css);
        assert_eq!(css.get("font-family"), Some("var(--docx-minorHAnsi-font)"));
        assert_eq!(css.get("color"), Some("var(--docx-accent1-color, #2F5496)"));
    }

    #[test]
    fn test_font_names_are_quoted() {
        let rpr = xml(
            r#"<w:rPr><w:rFonts w:ascii="O'Brien Sans" w:eastAsia="x&lt;/style&gt;"/><w:color w:val="red;}"/></w:rPr>"#,
        );
        let mut css = CssProps::new();
        run_css(&rpr, &mut css);
        assert_eq!(css.get("font-family"), Some(r"'O\'Brien Sans', 'x\3C /style\3E '"));
        assert_eq!(css.get("color"), None);
    }

    #[test]
    fn test_underline_none_clears_decoration() {
        let rpr = xml(r#"<w:rPr><w:u w:val="none"/></w:rPr>"#);
        let mut css = CssProps::new();
        run_css(&rpr, &mut css);
        assert_eq!(css.get("text-decoration"), Some("none"));
    }

    #[test]
    fn test_table_css() {
        let tblpr = xml(
            r#"<w:tblPr><w:tblW w:w="5000" w:type="pct"/><w:tblBorders><w:top w:val="single" w:sz="8" w:color="000000"/><w:insideH w:val="single" w:sz="4"/></w:tblBorders><w:tblCellMar><w:left w:w="108" w:type="dxa"/></w:tblCellMar><w:tblLayout w:type="fixed"/></w:tblPr>"#,
        );
        let mut css = CssProps::new();
        let mut cells = CssProps::new();
        table_css(&tblpr, &mut css, &mut cells);
        assert_eq!(css.get("width"), Some("100.00%"));
        assert_eq!(css.get("border-top"), Some("1.00pt solid #000000"));
        assert_eq!(css.get("table-layout"), Some("fixed"));
        assert_eq!(cells.get("border-top"), Some("0.50pt solid black"));
        assert_eq!(cells.get("padding-left"), Some("5.40pt"));
    }

    #[test]
    fn test_cell_css() {
        let tcpr = xml(
            r#"<w:tcPr><w:tcW w:w="2880" w:type="dxa"/><w:shd w:val="clear" w:color="auto" w:fill="D9E2F3"/><w:vAlign w:val="center"/><w:tcBorders><w:bottom w:val="nil"/></w:tcBorders></w:tcPr>"#,
        );
        let mut css = CssProps::new();
        cell_css(&tcpr, &mut css);
        assert_eq!(css.get("width"), Some("144.00pt"));
        assert_eq!(css.get("background-color"), Some("#D9E2F3"));
        assert_eq!(css.get("vertical-align"), Some("middle"));
        assert_eq!(css.get("border-bottom"), Some("none"));
    }
}
