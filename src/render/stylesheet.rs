//! The document stylesheet.
//!
//! One `<style>` element holding the base rules, theme variables, a class
//! rule per style definition and the page geometry of every section.
//! Embedded font faces are appended as resource slots.

use super::cascade::style_class;
use super::dom::{HtmlElement, Node};
use super::options::Options;
use super::page::SectionSlice;
use crate::model::{CssProps, StyleLayers, StyleType, WordDocument};
use std::fmt::Write;

/// Build the `<style>` node for a document.
pub fn render_stylesheet(
    doc: &WordDocument,
    options: &Options,
    sections: &[SectionSlice<'_>],
    font_faces: Vec<Node>,
) -> Node {
    let mut css = base_rules(doc, options);
    if options.hide_wrapper_on_print {
        css.push_str(&print_rules(options));
    }
    css.push_str(&theme_rules(doc, options));
    css.push_str(&style_rules(doc, options));
    for section in sections {
        css.push_str(&section_rules(section, options));
    }

    let mut style = HtmlElement::new("style").text(css);
    style.extend(font_faces);
    style.into()
}

fn rule(out: &mut String, selector: &str, props: &CssProps) {
    if !props.is_empty() {
        let _ = writeln!(out, "{} {{ {}; }}", selector, props.to_inline());
    }
}

fn base_rules(doc: &WordDocument, options: &Options) -> String {
    let p = &options.class_name;
    let mut css = String::new();

    if options.in_wrapper {
        let _ = writeln!(
            css,
            ".{p}-wrapper {{ background: gray; padding: 30px; padding-bottom: 0px; display: flex; flex-flow: column; align-items: center; }}"
        );
        let _ = writeln!(
            css,
            ".{p}-wrapper > section.{p} {{ background: white; box-shadow: 0 0 10px rgba(0, 0, 0, 0.5); margin-bottom: 30px; }}"
        );
    }

    let hyphens = if doc.settings.auto_hyphenation { "auto" } else { "manual" };
    let _ = writeln!(
        css,
        ".{p} {{ color: black; hyphens: {hyphens}; text-underline-position: from-font; }}"
    );
    let _ = writeln!(
        css,
        "section.{p} {{ box-sizing: border-box; display: flex; flex-flow: column nowrap; position: relative; overflow: hidden; }}"
    );
    let _ = writeln!(css, "section.{p} > article {{ margin-bottom: auto; z-index: 1; }}");
    let _ = writeln!(css, "section.{p} > footer {{ z-index: 1; }}");
    let _ = writeln!(css, ".{p} table {{ border-collapse: collapse; }}");
    let _ = writeln!(css, ".{p} table td, .{p} table th {{ vertical-align: top; }}");
    let _ = writeln!(
        css,
        ".{p} p, .{p} h1, .{p} h2, .{p} h3, .{p} h4, .{p} h5, .{p} h6 {{ margin: 0pt; min-height: 1em; font-size: inherit; font-weight: inherit; }}"
    );
    let _ = writeln!(css, ".{p} p:empty::before {{ content: \"\\00a0\"; }}");
    let _ = writeln!(css, ".{p} span {{ white-space: pre-wrap; overflow-wrap: break-word; }}");
    let _ = writeln!(css, ".{p} a {{ color: inherit; text-decoration: inherit; }}");
    let _ = writeln!(
        css,
        ".{p}-tab {{ display: inline-block; width: {}; }}",
        doc.settings.default_tab_stop
    );
    let _ = writeln!(css, ".{p}-num {{ white-space: pre; }}");
    let _ = writeln!(css, ".{p}-footnotes, .{p}-endnotes {{ font-size: smaller; }}");
    let _ = writeln!(css, ".{p}-inserted {{ text-decoration: underline; }}");
    let _ = writeln!(css, ".{p}-deleted {{ text-decoration: line-through; }}");
    let _ = writeln!(css, ".{p}-comment-range {{ background: #fff3b0; }}");
    let _ = writeln!(
        css,
        ".{p}-comments {{ border-left: 2px solid #e0c000; padding-left: 6pt; font-size: smaller; }}"
    );
    let _ = writeln!(css, ".{p}-altchunk {{ width: 100%; border: none; }}");
    let _ = writeln!(css, ".{p}-page-break {{ break-after: page; }}");
    css
}

fn print_rules(options: &Options) -> String {
    let p = &options.class_name;
    format!(
        "@media print {{\n  .{p}-wrapper {{ background: white; display: block; padding: 0; }}\n  .{p}-wrapper > section.{p} {{ box-shadow: none; margin-bottom: 0; }}\n}}\n"
    )
}

fn theme_rules(doc: &WordDocument, options: &Options) -> String {
    let vars: CssProps = doc.theme.css_variables().into_iter().collect();
    let mut css = String::new();
    rule(&mut css, &format!(".{}", options.class_name), &vars);
    css
}

/// One rule set per style, flattened over its inheritance chain.
fn style_rules(doc: &WordDocument, options: &Options) -> String {
    let p = &options.class_name;
    let styles = &doc.styles;
    let mut css = String::new();

    rule(&mut css, &format!("section.{}", p), &styles.defaults.run);

    let mut ids: Vec<&String> = styles.styles.keys().collect();
    ids.sort();
    for id in ids {
        let Some(style) = styles.get(id) else {
            continue;
        };
        let mut layers = StyleLayers::default();
        for ancestor in styles.chain(id) {
            layers.merge(&ancestor.layers);
        }
        let class = style_class(p, id);
        match style.style_type {
            Some(StyleType::Paragraph) => {
                rule(&mut css, &format!(".{} .{}", p, class), &layers.paragraph);
                rule(&mut css, &format!(".{} .{} span", p, class), &layers.run);
            }
            Some(StyleType::Character) => {
                rule(&mut css, &format!(".{} span.{}", p, class), &layers.run);
            }
            Some(StyleType::Table) => {
                rule(&mut css, &format!(".{} table.{}", p, class), &layers.table);
                rule(&mut css, &format!(".{} table.{} tr", p, class), &layers.row);
                rule(&mut css, &format!(".{} table.{} td", p, class), &layers.cell);
                rule(&mut css, &format!(".{} table.{} td p", p, class), &layers.paragraph);
                rule(&mut css, &format!(".{} table.{} td span", p, class), &layers.run);
            }
            _ => {}
        }
    }
    css
}

/// Page box of one section: size, margins, columns and a named `@page`.
fn section_rules(section: &SectionSlice<'_>, options: &Options) -> String {
    let p = &options.class_name;
    let props = &section.props;
    let class = format!("{}-sect-{}", p, section.index + 1);
    let mut css = String::new();

    let mut page = CssProps::new();
    if !options.ignore_width {
        page.set_opt("width", props.page_size.width.clone());
    }
    if !options.ignore_height {
        page.set_opt("min-height", props.page_size.height.clone());
    }
    let margins = &props.margins;
    if margins.top.is_some() || margins.right.is_some() || margins.bottom.is_some() || margins.left.is_some() {
        let side = |v: &Option<String>| v.clone().unwrap_or_else(|| "0pt".to_string());
        page.set(
            "padding",
            format!(
                "{} {} {} {}",
                side(&margins.top),
                side(&margins.right),
                side(&margins.bottom),
                side(&margins.left)
            ),
        );
    }
    page.set("page", class.clone());
    rule(&mut css, &format!("section.{}", class), &page);

    if let (Some(width), Some(height)) = (&props.page_size.width, &props.page_size.height) {
        let _ = writeln!(css, "@page {} {{ size: {} {}; margin: 0; }}", class, width, height);
    }

    if let Some(header) = &margins.header {
        let mut header_css = CssProps::new();
        if let Some(top) = &margins.top {
            header_css.set("margin-top", format!("calc({} - {})", header, top));
        }
        header_css.set("min-height", format!("calc({} - {})", margins.top.as_deref().unwrap_or("0pt"), header));
        rule(&mut css, &format!("section.{} > header", class), &header_css);
    }
    if let Some(footer) = &margins.footer {
        let mut footer_css = CssProps::new();
        if let Some(bottom) = &margins.bottom {
            footer_css.set("margin-bottom", format!("calc({} - {})", footer, bottom));
        }
        rule(&mut css, &format!("section.{} > footer", class), &footer_css);
    }

    if let Some(columns) = props.columns.as_ref().filter(|c| c.count > 1) {
        let mut article = CssProps::new();
        article.set("column-count", columns.count.to_string());
        article.set_opt("column-gap", columns.space.clone());
        if columns.separator {
            article.set("column-rule", "solid 1px");
        }
        rule(&mut css, &format!("section.{} > article", class), &article);
    }
    css
}
