//! Unit conversion and low-level property value mapping.
//!
//! WordprocessingML stores lengths as bare integers whose unit depends on the
//! attribute (twentieths of a point, EMUs, half-points, eighths of a point,
//! fiftieths of a percent). Everything here turns those raw attribute values
//! into CSS values, and back where a reverse mapping exists.

/// The unit a raw length attribute is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUsage {
    /// Twentieths of a point (twips). Most page, indent and spacing values.
    Dxa,
    /// English Metric Units (914400 per inch). DrawingML extents.
    Emu,
    /// Half-points. Run font sizes.
    FontSize,
    /// Eighths of a point, clamped to the range Word accepts. Borders.
    Border,
    /// Whole points.
    Point,
    /// Fiftieths of a percent. Table and cell widths of type `pct`.
    Percent,
    /// 240ths of a line. Auto line spacing.
    LineHeight,
    /// EMUs rendered as unitless SVG user units.
    VmlEmu,
}

impl LengthUsage {
    fn factor(self) -> f64 {
        match self {
            LengthUsage::Dxa => 0.05,
            LengthUsage::Emu | LengthUsage::VmlEmu => 1.0 / 12700.0,
            LengthUsage::FontSize => 0.5,
            LengthUsage::Border => 0.125,
            LengthUsage::Point => 1.0,
            LengthUsage::Percent => 0.02,
            LengthUsage::LineHeight => 1.0 / 240.0,
        }
    }

    fn unit(self) -> &'static str {
        match self {
            LengthUsage::Percent => "%",
            LengthUsage::LineHeight | LengthUsage::VmlEmu => "",
            _ => "pt",
        }
    }

    fn bounds(self) -> Option<(f64, f64)> {
        match self {
            LengthUsage::Border => Some((0.25, 12.0)),
            _ => None,
        }
    }
}

/// Points per unit for the universal measures `ST_UniversalMeasure` allows.
fn universal_unit_to_pt(unit: &str) -> Option<f64> {
    match unit {
        "pt" => Some(1.0),
        "in" => Some(72.0),
        "cm" => Some(72.0 / 2.54),
        "mm" => Some(72.0 / 25.4),
        "pc" | "pi" => Some(12.0),
        _ => None,
    }
}

/// Format a number the way every generated length is formatted: two decimals.
pub fn format_number(value: f64) -> String {
    format!("{:.2}", value)
}

/// Convert a raw attribute value to its numeric value in the usage's CSS unit.
///
/// Values that already carry a unit (`"12pt"`, `"2.5cm"`, `"50%"`) are
/// converted from that unit instead of the usage's implicit one.
pub fn length_value(raw: &str, usage: LengthUsage) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(number) = raw.strip_suffix('%') {
        return number.trim().parse::<f64>().ok();
    }

    let split = raw
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(raw.len());
    let (number, unit) = raw.split_at(split);
    let number: f64 = number.trim().parse().ok()?;

    let mut value = if unit.is_empty() {
        number * usage.factor()
    } else if unit == "px" {
        number * 0.75
    } else {
        number * universal_unit_to_pt(unit)?
    };

    if let Some((min, max)) = usage.bounds() {
        value = value.clamp(min, max);
    }

    Some(value)
}

/// Convert a raw attribute value to a CSS length string.
///
/// ```
/// use dochtml::units::{convert_length, LengthUsage};
///
/// assert_eq!(convert_length("1440", LengthUsage::Dxa).as_deref(), Some("72.00pt"));
/// assert_eq!(convert_length("24", LengthUsage::FontSize).as_deref(), Some("12.00pt"));
/// assert_eq!(convert_length("5000", LengthUsage::Percent).as_deref(), Some("100.00%"));
/// ```
pub fn convert_length(raw: &str, usage: LengthUsage) -> Option<String> {
    let raw = raw.trim();
    if raw.ends_with('%') {
        let value = length_value(raw, usage)?;
        return Some(format!("{}%", format_number(value)));
    }
    if let Some(number) = raw.strip_suffix("pt").or_else(|| raw.strip_suffix("px")) {
        number.trim().parse::<f64>().ok()?;
        return Some(raw.to_string());
    }
    let value = length_value(raw, usage)?;
    let unit = if raw.ends_with(|c: char| c.is_ascii_alphabetic()) {
        "pt"
    } else {
        usage.unit()
    };
    Some(format!("{}{}", format_number(value), unit))
}

/// Map a CSS length produced by [`convert_length`] back to the usage's raw
/// unit.
///
/// Only `pt`, `%` and unitless values have a reverse mapping. The result
/// differs from the original raw value by at most the rounding of the two
/// decimals [`format_number`] keeps, divided by the usage factor.
pub fn to_source_units(css: &str, usage: LengthUsage) -> Option<f64> {
    let css = css.trim();
    let number = css
        .strip_suffix("pt")
        .or_else(|| css.strip_suffix('%'))
        .unwrap_or(css);
    let value: f64 = number.trim().parse().ok()?;
    Some(value / usage.factor())
}

/// Interpret an `ST_OnOff` value.
///
/// A missing value means the toggle element is present without `w:val`,
/// which Word treats as "on"; callers pass that as `default`.
pub fn convert_boolean(raw: Option<&str>, default: bool) -> bool {
    match raw {
        Some("1") | Some("on") | Some("true") => true,
        Some("0") | Some("off") | Some("false") | Some("none") => false,
        _ => default,
    }
}

/// Convert an `ST_HexColor` value to CSS. `auto` has no CSS equivalent.
pub fn convert_color(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("auto") {
        return None;
    }
    if raw.len() == 6 && raw.chars().all(|c| c.is_ascii_hexdigit()) {
        return Some(format!("#{}", raw.to_ascii_uppercase()));
    }
    // Some producers write preset names instead of hex
    highlight_color(raw).map(String::from)
}

/// Quote a document-supplied name (a font family) as a CSS string.
///
/// Backslashes and quotes are escaped, `<` and `>` become CSS escapes and
/// control characters are dropped, so the value is safe both in a
/// `style` attribute and inside a `<style>` element.
///
/// ```
/// use dochtml::units::css_string;
///
/// assert_eq!(css_string("O'Brien Sans"), r"'O\'Brien Sans'");
/// assert_eq!(css_string("a</style>"), r"'a\3C /style\3E '");
/// ```
pub fn css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '<' => out.push_str("\\3C "),
            '>' => out.push_str("\\3E "),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Whether a theme slot or font name can be spliced into a custom
/// property name.
fn is_theme_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric())
}

/// CSS value for a theme colour reference (`w:themeColor`).
///
/// The explicit colour stored next to the reference becomes the fallback;
/// it is also all that is left when the slot name is not a plain name.
///
/// Theme variables are always named `--docx-*`, whatever class prefix the
/// output uses: they are defined on the prefix class and only read below
/// it, so documents rendered with different prefixes never see each
/// other's values.
pub fn theme_color_var(theme_color: &str, fallback: Option<&str>) -> Option<String> {
    let key = match theme_color {
        "text1" => "dk1",
        "background1" => "lt1",
        "text2" => "dk2",
        "background2" => "lt2",
        other => other,
    };
    if !is_theme_key(key) {
        return fallback.map(String::from);
    }
    Some(match fallback {
        Some(fallback) => format!("var(--docx-{}-color, {})", key, fallback),
        None => format!("var(--docx-{}-color)", key),
    })
}

/// CSS value for a theme font reference (`w:asciiTheme` and friends).
pub fn theme_font_var(theme_font: &str) -> Option<String> {
    is_theme_key(theme_font).then(|| format!("var(--docx-{}-font)", theme_font))
}

/// Map an `ST_HighlightColor` name to a CSS colour.
pub fn highlight_color(name: &str) -> Option<&'static str> {
    Some(match name {
        "black" => "#000000",
        "blue" => "#0000FF",
        "cyan" => "#00FFFF",
        "green" => "#00FF00",
        "magenta" => "#FF00FF",
        "red" => "#FF0000",
        "yellow" => "#FFFF00",
        "white" => "#FFFFFF",
        "darkBlue" => "#000080",
        "darkCyan" => "#008080",
        "darkGreen" => "#008000",
        "darkMagenta" => "#800080",
        "darkRed" => "#800000",
        "darkYellow" => "#808000",
        "darkGray" => "#808080",
        "lightGray" => "#C0C0C0",
        _ => return None,
    })
}

/// Map an `ST_Border` line style to a CSS border style.
pub fn border_style(val: &str) -> &'static str {
    match val {
        "nil" | "none" => "none",
        "dashed" | "dashSmallGap" | "dashDotStroked" => "dashed",
        "dotted" | "dotDash" | "dotDotDash" => "dotted",
        "double" | "triple" | "thinThickSmallGap" | "thickThinSmallGap"
        | "thinThickThinSmallGap" | "thinThickMediumGap" | "thickThinMediumGap"
        | "thinThickThinMediumGap" | "thinThickLargeGap" | "thickThinLargeGap"
        | "thinThickThinLargeGap" | "doubleWave" => "double",
        "threeDEmboss" => "ridge",
        "threeDEngrave" => "groove",
        "outset" => "outset",
        "inset" => "inset",
        _ => "solid",
    }
}

/// Build a CSS border shorthand from the attributes of a border element
/// (`w:top`, `w:left`, ... inside `w:pBdr`, `w:tblBorders`, `w:tcBorders`).
pub fn convert_border(val: Option<&str>, size: Option<&str>, color: Option<&str>) -> Option<String> {
    let style = border_style(val.unwrap_or("single"));
    if style == "none" {
        return Some("none".to_string());
    }
    let width = size
        .and_then(|s| convert_length(s, LengthUsage::Border))
        .unwrap_or_else(|| "0.50pt".to_string());
    let color = color
        .and_then(convert_color)
        .unwrap_or_else(|| "black".to_string());
    Some(format!("{} {} {}", width, style, color))
}

/// Resolve the background colour of a `w:shd` element.
///
/// Solid patterns take the pattern colour; clear patterns take the fill.
pub fn shading_color(val: Option<&str>, color: Option<&str>, fill: Option<&str>) -> Option<String> {
    match val {
        Some("nil") => None,
        Some("solid") => color.and_then(convert_color).or_else(|| Some("black".to_string())),
        _ => fill.and_then(convert_color),
    }
}

/// Map `w:u w:val` to a CSS `text-decoration-style`, `None` meaning no underline.
pub fn underline_style(val: &str) -> Option<&'static str> {
    match val {
        "none" | "0" | "false" => None,
        "double" => Some("double"),
        "dotted" | "dottedHeavy" => Some("dotted"),
        "dash" | "dashedHeavy" | "dashLong" | "dashLongHeavy" | "dotDash" | "dotDotDash"
        | "dashDotHeavy" | "dashDotDotHeavy" => Some("dashed"),
        "wave" | "wavyHeavy" | "wavyDouble" => Some("wavy"),
        _ => Some("solid"),
    }
}
