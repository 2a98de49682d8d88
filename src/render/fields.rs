//! Field code interpretation and the complex-field state machine.
//!
//! A complex field is spread over runs, possibly over paragraphs:
//! `begin`, instruction text, `separate`, the stored result, `end`. Fields
//! nest. The renderer feeds every field character and instruction into
//! [`FieldState`] and asks it whether ordinary content is currently visible
//! and whether it belongs to a link.

use super::options::FieldMode;

/// Field codes the renderer understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Page,
    NumPages,
    SectionPages,
    /// `REF bookmark`
    Ref(String),
    /// `PAGEREF bookmark`
    PageRef(String),
    /// `HYPERLINK url` or `HYPERLINK \l anchor`; holds the href
    Hyperlink(String),
    Other(String),
}

impl FieldKind {
    /// Whether live mode replaces the stored result with a computed value.
    pub fn is_computed(&self) -> bool {
        matches!(self, FieldKind::Page | FieldKind::NumPages | FieldKind::SectionPages)
    }

    /// Link target in live mode.
    pub fn href(&self) -> Option<String> {
        match self {
            FieldKind::Ref(bookmark) | FieldKind::PageRef(bookmark) => Some(format!("#{}", bookmark)),
            FieldKind::Hyperlink(href) => Some(href.clone()),
            _ => None,
        }
    }
}

/// Split an instruction into words, honouring double quotes.
fn tokenize(instruction: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for c in instruction.chars() {
        match c {
            '"' => {
                if quoted {
                    tokens.push(std::mem::take(&mut current));
                } else if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                quoted = !quoted;
            }
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Interpret a field instruction.
pub fn parse_instruction(instruction: &str) -> FieldKind {
    let tokens = tokenize(instruction);
    let Some(code) = tokens.first() else {
        return FieldKind::Other(String::new());
    };
    let argument = tokens.iter().skip(1).find(|t| !t.starts_with('\\')).cloned();

    match code.to_ascii_uppercase().as_str() {
        "PAGE" => FieldKind::Page,
        "NUMPAGES" => FieldKind::NumPages,
        "SECTIONPAGES" => FieldKind::SectionPages,
        "REF" => match argument {
            Some(bookmark) => FieldKind::Ref(bookmark),
            None => FieldKind::Other(code.clone()),
        },
        "PAGEREF" => match argument {
            Some(bookmark) => FieldKind::PageRef(bookmark),
            None => FieldKind::Other(code.clone()),
        },
        "HYPERLINK" => {
            let anchor = tokens
                .windows(2)
                .find(|w| w[0].eq_ignore_ascii_case("\\l"))
                .map(|w| w[1].clone());
            let url = tokens
                .iter()
                .skip(1)
                .take_while(|t| !t.starts_with('\\'))
                .next()
                .cloned();
            match (url, anchor) {
                (Some(url), Some(anchor)) => FieldKind::Hyperlink(format!("{}#{}", url, anchor)),
                (Some(url), None) => FieldKind::Hyperlink(url),
                (None, Some(anchor)) => FieldKind::Hyperlink(format!("#{}", anchor)),
                (None, None) => FieldKind::Other(code.clone()),
            }
        }
        other => FieldKind::Other(other.to_string()),
    }
}

/// Page numbers available to computed fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageInfo {
    /// Displayed number of the current page
    pub number: u32,
    /// Pages in the current section
    pub section_pages: u32,
    /// Pages in the document
    pub total_pages: u32,
}

impl PageInfo {
    /// Value of a computed field.
    pub fn value(&self, kind: &FieldKind) -> Option<String> {
        match kind {
            FieldKind::Page => Some(self.number.to_string()),
            FieldKind::NumPages => Some(self.total_pages.to_string()),
            FieldKind::SectionPages => Some(self.section_pages.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Code,
    Result,
}

#[derive(Debug, Clone)]
struct Frame {
    instruction: String,
    phase: Phase,
    kind: Option<FieldKind>,
    emitted: bool,
}

impl Frame {
    fn kind(&mut self) -> &FieldKind {
        let instruction = &self.instruction;
        self.kind.get_or_insert_with(|| parse_instruction(instruction))
    }
}

/// Complex field tracking across runs and paragraphs.
#[derive(Debug, Clone)]
pub struct FieldState {
    mode: FieldMode,
    stack: Vec<Frame>,
}

impl FieldState {
    pub fn new(mode: FieldMode) -> Self {
        Self {
            mode,
            stack: Vec::new(),
        }
    }

    pub fn begin(&mut self) {
        self.stack.push(Frame {
            instruction: String::new(),
            phase: Phase::Code,
            kind: None,
            emitted: false,
        });
    }

    pub fn instruction(&mut self, text: &str) {
        if let Some(frame) = self.stack.last_mut() {
            if frame.phase == Phase::Code {
                frame.instruction.push_str(text);
            }
        }
    }

    /// Enter the result part. Returns a computed value to emit in live mode.
    pub fn separate(&mut self, page: &PageInfo) -> Option<String> {
        let live = self.mode == FieldMode::Live;
        let frame = self.stack.last_mut()?;
        frame.phase = Phase::Result;
        if live && frame.kind().is_computed() {
            frame.emitted = true;
            return page.value(frame.kind());
        }
        None
    }

    /// Close the innermost field. Returns a computed value when live mode
    /// has not emitted one yet (fields without a stored result).
    pub fn end(&mut self, page: &PageInfo) -> Option<String> {
        let live = self.mode == FieldMode::Live;
        let mut frame = self.stack.pop()?;
        if live && !frame.emitted && frame.kind().is_computed() {
            return page.value(frame.kind());
        }
        None
    }

    /// Whether ordinary content is hidden: instruction parts always are,
    /// stored results of computed fields are in live mode.
    pub fn hides_content(&self) -> bool {
        self.stack.iter().any(|frame| {
            frame.phase == Phase::Code
                || (self.mode == FieldMode::Live
                    && frame.kind.as_ref().map(FieldKind::is_computed).unwrap_or(false))
        })
    }

    /// Link target for content of the innermost linking field in live mode.
    pub fn link(&self) -> Option<String> {
        if self.mode != FieldMode::Live {
            return None;
        }
        self.stack
            .iter()
            .rev()
            .filter(|frame| frame.phase == Phase::Result)
            .find_map(|frame| frame.kind.as_ref().and_then(FieldKind::href))
    }

    pub fn is_open(&self) -> bool {
        !self.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: PageInfo = PageInfo {
        number: 4,
        section_pages: 2,
        total_pages: 9,
    };

    #[test]
    fn test_parse_instruction() {
        assert_eq!(parse_instruction(" PAGE \\* MERGEFORMAT "), FieldKind::Page);
        assert_eq!(parse_instruction("numpages"), FieldKind::NumPages);
        assert_eq!(
            parse_instruction("REF _Ref123 \\h"),
            FieldKind::Ref("_Ref123".to_string())
        );
        assert_eq!(
            parse_instruction("PAGEREF _Toc1 \\h"),
            FieldKind::PageRef("_Toc1".to_string())
        );
        assert_eq!(
            parse_instruction(r#"HYPERLINK "https://example.com/a b""#),
            FieldKind::Hyperlink("https://example.com/a b".to_string())
        );
        assert_eq!(
            parse_instruction(r#"HYPERLINK \l "_Toc2""#),
            FieldKind::Hyperlink("#_Toc2".to_string())
        );
        assert_eq!(
            parse_instruction("DATE \\@ \"d MMMM\""),
            FieldKind::Other("DATE".to_string())
        );
    }

    #[test]
    fn test_last_computed_mode_shows_stored_result() {
        let mut state = FieldState::new(FieldMode::LastComputed);
        state.begin();
        assert!(state.hides_content());
        state.instruction(" PAGE ");
        assert_eq!(state.separate(&PAGE), None);
        assert!(!state.hides_content());
        assert_eq!(state.link(), None);
        assert_eq!(state.end(&PAGE), None);
        assert!(!state.is_open());
    }

    #[test]
    fn test_live_mode_computes_pages() {
        let mut state = FieldState::new(FieldMode::Live);
        state.begin();
        state.instruction(" NUM");
        state.instruction("PAGES ");
        assert_eq!(state.separate(&PAGE).as_deref(), Some("9"));
        // the stale stored value is hidden
        assert!(state.hides_content());
        assert_eq!(state.end(&PAGE), None);
        assert!(!state.hides_content());

        // no stored result: the value comes at the end
        state.begin();
        state.instruction("SECTIONPAGES");
        assert_eq!(state.end(&PAGE).as_deref(), Some("2"));
    }

    #[test]
    fn test_live_mode_links_and_nesting() {
        let mut state = FieldState::new(FieldMode::Live);
        state.begin();
        state.instruction("HYPERLINK \\l \"_Toc1\"");
        state.separate(&PAGE);
        assert_eq!(state.link().as_deref(), Some("#_Toc1"));

        // a nested PAGEREF inside the link's result
        state.begin();
        state.instruction("PAGEREF _Toc1 \\h");
        assert!(state.hides_content());
        state.separate(&PAGE);
        assert!(!state.hides_content());
        assert_eq!(state.link().as_deref(), Some("#_Toc1"));
        state.end(&PAGE);
        state.end(&PAGE);
        assert_eq!(state.link(), None);
    }

    #[test]
    fn test_unbalanced_end_is_ignored() {
        let mut state = FieldState::new(FieldMode::Live);
        assert_eq!(state.end(&PAGE), None);
        state.instruction("PAGE");
        assert!(!state.hides_content());
    }
}
