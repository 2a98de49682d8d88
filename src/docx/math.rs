//! Office Math (OMML) parsing.

use crate::model::{Element, ElementKind, MathNode};
use crate::units::convert_boolean;
use crate::xml::XmlElement;

/// Property child of a math construct (`m:fPr`, `m:naryPr`, ...).
fn props<'a>(el: &'a XmlElement, name: &str) -> Option<&'a XmlElement> {
    el.child(name)
}

/// `m:val` of a named property inside a property container.
fn prop_val<'a>(container: Option<&'a XmlElement>, name: &str) -> Option<&'a str> {
    container?.child(name)?.val()
}

fn prop_flag(container: Option<&XmlElement>, name: &str) -> bool {
    match container.and_then(|c| c.child(name)) {
        Some(el) => convert_boolean(el.val(), true),
        None => false,
    }
}

/// Map an OMML element to its node kind, reading construct properties.
fn math_node(el: &XmlElement) -> Option<MathNode> {
    Some(match el.name.as_str() {
        "m:oMath" => MathNode::Math,
        "m:oMathPara" => MathNode::MathPara,
        "m:r" => MathNode::Run,
        "m:f" => {
            let pr = props(el, "m:fPr");
            MathNode::Fraction {
                bar: prop_val(pr, "m:type") != Some("noBar"),
            }
        }
        "m:num" => MathNode::Numerator,
        "m:den" => MathNode::Denominator,
        "m:rad" => MathNode::Radical {
            hide_degree: prop_flag(props(el, "m:radPr"), "m:degHide"),
        },
        "m:deg" => MathNode::Degree,
        "m:e" => MathNode::Base,
        "m:sSup" => MathNode::Superscript,
        "m:sSub" => MathNode::Subscript,
        "m:sSubSup" => MathNode::SubSuperscript,
        "m:sPre" => MathNode::PreSubSuperscript,
        "m:sup" => MathNode::SuperscriptArg,
        "m:sub" => MathNode::SubscriptArg,
        "m:nary" => {
            let pr = props(el, "m:naryPr");
            MathNode::Nary {
                chr: prop_val(pr, "m:chr").map(String::from),
                under_over: prop_val(pr, "m:limLoc") == Some("undOvr"),
                hide_sub: prop_flag(pr, "m:subHide"),
                hide_sup: prop_flag(pr, "m:supHide"),
            }
        }
        "m:d" => {
            let pr = props(el, "m:dPr");
            MathNode::Delimiter {
                begin: prop_val(pr, "m:begChr").map(String::from),
                end: prop_val(pr, "m:endChr").map(String::from),
                separator: prop_val(pr, "m:sepChr").map(String::from),
            }
        }
        "m:func" => MathNode::Function,
        "m:fName" => MathNode::FunctionName,
        "m:limLow" => MathNode::LowerLimit,
        "m:limUpp" => MathNode::UpperLimit,
        "m:lim" => MathNode::Limit,
        "m:bar" => MathNode::Bar {
            top: prop_val(props(el, "m:barPr"), "m:pos") == Some("top"),
        },
        "m:acc" => MathNode::Accent {
            chr: prop_val(props(el, "m:accPr"), "m:chr").map(String::from),
        },
        "m:groupChr" => {
            let pr = props(el, "m:groupChrPr");
            MathNode::GroupChar {
                chr: prop_val(pr, "m:chr").map(String::from),
                top: prop_val(pr, "m:pos") == Some("top"),
            }
        }
        "m:m" => MathNode::Matrix,
        "m:mr" => MathNode::MatrixRow,
        "m:eqArr" => MathNode::EqArray,
        "m:box" => MathNode::Boxed,
        "m:borderBox" => MathNode::BorderBox,
        "m:phant" => MathNode::Phantom,
        _ => return None,
    })
}

/// Property containers that configure their parent and carry no content.
fn is_property(name: &str) -> bool {
    name.ends_with("Pr") && (name.starts_with("m:") || name.starts_with("w:"))
}

/// Parse an OMML element (`m:oMath`, `m:oMathPara` or any construct) into
/// a math element subtree.
///
/// Elements outside the supported set become [`MathNode::Unsupported`]
/// carrying their text content.
pub fn parse_math(el: &XmlElement) -> Element {
    let Some(node) = math_node(el) else {
        let mut unsupported = Element::new(ElementKind::Math {
            node: MathNode::Unsupported {
                name: el.name.clone(),
            },
        });
        let text = el.text();
        if !text.is_empty() {
            unsupported.children.push(Element::text(text));
        }
        return unsupported;
    };

    let mut element = Element::new(ElementKind::Math { node: node.clone() });

    if node == MathNode::Run {
        let text: String = el.children_named("m:t").map(|t| t.text()).collect();
        if !text.is_empty() {
            element.children.push(Element::text(text));
        }
        return element;
    }

    for child in el.elements() {
        if is_property(&child.name) {
            continue;
        }
        // Word wraps math content in w: runs in some producers
        if child.name == "w:r" {
            let text: String = child.children_named("w:t").map(|t| t.text()).collect();
            if !text.is_empty() {
                element.children.push(Element::new(ElementKind::Math {
                    node: MathNode::Run,
                }));
                if let Some(last) = element.children.last_mut() {
                    last.children.push(Element::text(text));
                }
            }
            continue;
        }
        element.children.push(parse_math(child));
    }

    element
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Element {
        parse_math(&XmlElement::parse(xml).unwrap())
    }

    fn node(el: &Element) -> &MathNode {
        match &el.kind {
            ElementKind::Math { node } => node,
            other => panic!("not a math node: {:?}", other),
        }
    }

    #[test]
    fn test_fraction() {
        let math = parse(
            r#"<m:oMath><m:f><m:fPr><m:type m:val="noBar"/></m:fPr><m:num><m:r><m:t>a</m:t></m:r></m:num><m:den><m:r><m:t>2</m:t></m:r></m:den></m:f></m:oMath>"#,
        );
        assert_eq!(node(&math), &MathNode::Math);
        let frac = &math.children[0];
        assert_eq!(node(frac), &MathNode::Fraction { bar: false });
        assert_eq!(frac.children.len(), 2);
        assert_eq!(node(&frac.children[0]), &MathNode::Numerator);
        assert_eq!(frac.children[1].plain_text(), "2");
    }

    #[test]
    fn test_nary_properties() {
        let math = parse(
            r#"<m:nary><m:naryPr><m:chr m:val="∑"/><m:limLoc m:val="undOvr"/><m:supHide/></m:naryPr><m:sub/><m:sup/><m:e/></m:nary>"#,
        );
        assert_eq!(
            node(&math),
            &MathNode::Nary {
                chr: Some("∑".to_string()),
                under_over: true,
                hide_sub: false,
                hide_sup: true,
            }
        );
        assert_eq!(math.children.len(), 3);
    }

    #[test]
    fn test_unsupported_keeps_text() {
        let math = parse(r#"<m:oMath><m:unknownThing><m:r><m:t>x</m:t></m:r></m:unknownThing></m:oMath>"#);
        let child = &math.children[0];
        assert_eq!(
            node(child),
            &MathNode::Unsupported {
                name: "m:unknownThing".to_string()
            }
        );
        assert_eq!(child.plain_text(), "x");
    }
}
