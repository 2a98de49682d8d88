//! Office Math to MathML.

use super::dom::{HtmlElement, Node};
use crate::model::{Element, ElementKind, MathNode};

const MATHML_NS: &str = "http://www.w3.org/1998/Math/MathML";

/// Characters rendered as `mo` inside math runs.
const OPERATORS: &str = "+-=<>()[]{}|/*,.;:!?^~\u{2212}\u{00b1}\u{00d7}\u{00f7}\u{2211}\u{220f}\u{222b}\u{2264}\u{2265}\u{2260}\u{2248}\u{221e}\u{2202}\u{2192}\u{2190}\u{2194}\u{22c5}\u{2208}\u{2209}\u{2229}\u{222a}\u{2282}\u{2283}";

fn node_of(el: &Element) -> Option<&MathNode> {
    match &el.kind {
        ElementKind::Math { node } => Some(node),
        _ => None,
    }
}

/// Render a math element tree (`m:oMath` or `m:oMathPara`).
pub fn render_math(el: &Element) -> Node {
    match node_of(el) {
        Some(MathNode::MathPara) => {
            let mut math = HtmlElement::new("math")
                .attr("xmlns", MATHML_NS)
                .attr("display", "block");
            for child in &el.children {
                // each equation of the paragraph on its own line
                let row = HtmlElement::new("mrow").child(inner(child));
                math.push(HtmlElement::new("mtable").child(
                    HtmlElement::new("mtr").child(HtmlElement::new("mtd").child(row)),
                ));
            }
            math.into()
        }
        _ => HtmlElement::new("math")
            .attr("xmlns", MATHML_NS)
            .child(inner(el))
            .into(),
    }
}

/// The content of an `m:oMath` without the `math` wrapper.
fn inner(el: &Element) -> Node {
    match node_of(el) {
        Some(MathNode::Math) => row(&el.children),
        _ => convert(el),
    }
}

fn row(children: &[Element]) -> Node {
    let mut nodes: Vec<Node> = children.iter().map(convert).collect();
    if nodes.len() == 1 {
        return nodes.remove(0);
    }
    let mut mrow = HtmlElement::new("mrow");
    mrow.extend(nodes);
    mrow.into()
}

fn argument(el: &Element, wanted: fn(&MathNode) -> bool) -> Node {
    match el
        .children
        .iter()
        .find(|c| node_of(c).map(wanted).unwrap_or(false))
    {
        Some(arg) => row(&arg.children),
        None => HtmlElement::new("mrow").into(),
    }
}

fn base(el: &Element) -> Node {
    argument(el, |n| matches!(n, MathNode::Base))
}

fn mo(text: &str) -> Node {
    HtmlElement::new("mo").text(text).into()
}

fn with_args(tag: &str, args: Vec<Node>) -> Node {
    let mut el = HtmlElement::new(tag);
    el.extend(args);
    el.into()
}

fn convert(el: &Element) -> Node {
    let Some(node) = node_of(el) else {
        return HtmlElement::new("mtext").text(el.plain_text()).into();
    };

    match node {
        MathNode::Math | MathNode::MathPara => row(&el.children),
        MathNode::Run => run(&el.plain_text()),
        MathNode::Fraction { bar } => {
            let mut frac = HtmlElement::new("mfrac");
            if !bar {
                frac.set_attr("linethickness", "0");
            }
            frac.push(argument(el, |n| matches!(n, MathNode::Numerator)));
            frac.push(argument(el, |n| matches!(n, MathNode::Denominator)));
            frac.into()
        }
        MathNode::Radical { hide_degree } => {
            let degree = el
                .children
                .iter()
                .find(|c| matches!(node_of(c), Some(MathNode::Degree)))
                .filter(|d| !d.children.is_empty());
            match degree {
                Some(degree) if !hide_degree => with_args("mroot", vec![base(el), row(&degree.children)]),
                _ => with_args("msqrt", vec![base(el)]),
            }
        }
        MathNode::Superscript => with_args(
            "msup",
            vec![base(el), argument(el, |n| matches!(n, MathNode::SuperscriptArg))],
        ),
        MathNode::Subscript => with_args(
            "msub",
            vec![base(el), argument(el, |n| matches!(n, MathNode::SubscriptArg))],
        ),
        MathNode::SubSuperscript => with_args(
            "msubsup",
            vec![
                base(el),
                argument(el, |n| matches!(n, MathNode::SubscriptArg)),
                argument(el, |n| matches!(n, MathNode::SuperscriptArg)),
            ],
        ),
        MathNode::PreSubSuperscript => with_args(
            "mmultiscripts",
            vec![
                base(el),
                HtmlElement::new("mprescripts").into(),
                argument(el, |n| matches!(n, MathNode::SubscriptArg)),
                argument(el, |n| matches!(n, MathNode::SuperscriptArg)),
            ],
        ),
        MathNode::Nary {
            chr,
            under_over,
            hide_sub,
            hide_sup,
        } => {
            let op = mo(chr.as_deref().unwrap_or("\u{222b}"));
            let sub = argument(el, |n| matches!(n, MathNode::SubscriptArg));
            let sup = argument(el, |n| matches!(n, MathNode::SuperscriptArg));
            let scripted = match (*hide_sub, *hide_sup, *under_over) {
                (true, true, _) => op,
                (false, true, true) => with_args("munder", vec![op, sub]),
                (false, true, false) => with_args("msub", vec![op, sub]),
                (true, false, true) => with_args("mover", vec![op, sup]),
                (true, false, false) => with_args("msup", vec![op, sup]),
                (false, false, true) => with_args("munderover", vec![op, sub, sup]),
                (false, false, false) => with_args("msubsup", vec![op, sub, sup]),
            };
            with_args("mrow", vec![scripted, base(el)])
        }
        MathNode::Delimiter {
            begin,
            end,
            separator,
        } => {
            let mut mrow = HtmlElement::new("mrow");
            mrow.push(mo(begin.as_deref().unwrap_or("(")));
            let bases = el
                .children
                .iter()
                .filter(|c| matches!(node_of(c), Some(MathNode::Base)));
            for (i, b) in bases.enumerate() {
                if i > 0 {
                    mrow.push(mo(separator.as_deref().unwrap_or("|")));
                }
                mrow.push(row(&b.children));
            }
            mrow.push(mo(end.as_deref().unwrap_or(")")));
            mrow.into()
        }
        MathNode::Function => with_args(
            "mrow",
            vec![
                argument(el, |n| matches!(n, MathNode::FunctionName)),
                mo("\u{2061}"),
                base(el),
            ],
        ),
        MathNode::LowerLimit => with_args(
            "munder",
            vec![base(el), argument(el, |n| matches!(n, MathNode::Limit))],
        ),
        MathNode::UpperLimit => with_args(
            "mover",
            vec![base(el), argument(el, |n| matches!(n, MathNode::Limit))],
        ),
        MathNode::Bar { top } => {
            if *top {
                with_args("mover", vec![base(el), mo("\u{203e}")])
            } else {
                with_args("munder", vec![base(el), mo("_")])
            }
        }
        MathNode::Accent { chr } => {
            let mut over = HtmlElement::new("mover").attr("accent", "true");
            over.push(base(el));
            over.push(mo(chr.as_deref().unwrap_or("\u{0302}")));
            over.into()
        }
        MathNode::GroupChar { chr, top } => {
            let tag = if *top { "mover" } else { "munder" };
            with_args(tag, vec![base(el), mo(chr.as_deref().unwrap_or("\u{23df}"))])
        }
        MathNode::Matrix => {
            let mut table = HtmlElement::new("mtable");
            for mr in el
                .children
                .iter()
                .filter(|c| matches!(node_of(c), Some(MathNode::MatrixRow)))
            {
                let mut tr = HtmlElement::new("mtr");
                for cell in &mr.children {
                    tr.push(HtmlElement::new("mtd").child(row(&cell.children)));
                }
                table.push(tr);
            }
            table.into()
        }
        MathNode::EqArray => {
            let mut table = HtmlElement::new("mtable");
            for line in &el.children {
                table.push(
                    HtmlElement::new("mtr")
                        .child(HtmlElement::new("mtd").child(row(&line.children))),
                );
            }
            table.into()
        }
        MathNode::BorderBox => HtmlElement::new("menclose")
            .attr("notation", "box")
            .child(base(el))
            .into(),
        MathNode::Boxed => with_args("mrow", vec![base(el)]),
        MathNode::Phantom => with_args("mphantom", vec![base(el)]),
        MathNode::Numerator
        | MathNode::Denominator
        | MathNode::Degree
        | MathNode::Base
        | MathNode::SuperscriptArg
        | MathNode::SubscriptArg
        | MathNode::FunctionName
        | MathNode::Limit
        | MathNode::MatrixRow => row(&el.children),
        MathNode::Unsupported { .. } => HtmlElement::new("mtext").text(el.plain_text()).into(),
    }
}

#[derive(PartialEq, Clone, Copy)]
enum Token {
    Number,
    Operator,
    Identifier,
}

fn classify(c: char) -> Token {
    if c.is_ascii_digit() {
        Token::Number
    } else if OPERATORS.contains(c) {
        Token::Operator
    } else {
        Token::Identifier
    }
}

/// Split math run text into `mn`, `mo` and `mi` tokens.
fn run(text: &str) -> Node {
    let mut tokens: Vec<(Token, String)> = Vec::new();
    for c in text.chars().filter(|c| !c.is_whitespace()) {
        let mut token = classify(c);
        // a decimal point inside a number stays part of it
        if c == '.' && matches!(tokens.last(), Some((Token::Number, _))) {
            token = Token::Number;
        }
        match tokens.last_mut() {
            Some((last, value)) if *last == token && token != Token::Operator => value.push(c),
            _ => tokens.push((token, c.to_string())),
        }
    }

    let mut nodes: Vec<Node> = tokens
        .into_iter()
        .map(|(token, value)| {
            let tag = match token {
                Token::Number => "mn",
                Token::Operator => "mo",
                Token::Identifier => "mi",
            };
            HtmlElement::new(tag).text(value).into()
        })
        .collect();

    if nodes.len() == 1 {
        return nodes.remove(0);
    }
    let mut mrow = HtmlElement::new("mrow");
    mrow.extend(nodes);
    mrow.into()
}
