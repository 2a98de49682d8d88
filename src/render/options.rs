//! Rendering options configuration.

/// How field results are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldMode {
    /// Render the display value Word stored when it last updated the field
    #[default]
    LastComputed,
    /// Compute page numbers and turn references into links
    Live,
}

/// Options for rendering documents.
///
/// Passed by reference to every renderer; never mutated during a render.
#[derive(Debug, Clone)]
pub struct Options {
    /// CSS class prefix for every generated class. Theme custom
    /// properties keep their `--docx-*` names; they are scoped by this class.
    pub class_name: String,

    /// Wrap the pages in `div.{class_name}-wrapper`
    pub in_wrapper: bool,

    /// Emit print CSS that removes the wrapper background and page shadows
    pub hide_wrapper_on_print: bool,

    /// Drop the page width from the page rules
    pub ignore_width: bool,

    /// Drop the page min-height from the page rules
    pub ignore_height: bool,

    /// Skip `@font-face` rules for embedded fonts
    pub ignore_fonts: bool,

    /// Split pages at explicit page breaks and emit break markers
    pub break_pages: bool,

    /// Ignore `w:lastRenderedPageBreak` hints
    pub ignore_last_rendered_page_break: bool,

    pub render_headers: bool,
    pub render_footers: bool,
    pub render_footnotes: bool,
    pub render_endnotes: bool,

    /// Tracked-change markup; when off insertions are plain and deletions dropped
    pub render_changes: bool,

    /// Comment ranges, references and bodies
    pub render_comments: bool,

    /// Embedded HTML chunks (`w:altChunk`)
    pub render_alt_chunks: bool,

    /// Embed images and fonts as data URIs instead of package paths
    pub use_base64_url: bool,

    pub field_mode: FieldMode,

    /// Log non-fatal diagnostics through `log`
    pub debug: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            class_name: "docx".to_string(),
            in_wrapper: true,
            hide_wrapper_on_print: false,
            ignore_width: false,
            ignore_height: false,
            ignore_fonts: false,
            break_pages: true,
            ignore_last_rendered_page_break: true,
            render_headers: true,
            render_footers: true,
            render_footnotes: true,
            render_endnotes: true,
            render_changes: false,
            render_comments: false,
            render_alt_chunks: true,
            use_base64_url: true,
            field_mode: FieldMode::LastComputed,
            debug: false,
        }
    }
}

impl Options {
    /// Create new render options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the CSS class prefix.
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// Wrap pages in a wrapper element.
    pub fn with_wrapper(mut self, in_wrapper: bool) -> Self {
        self.in_wrapper = in_wrapper;
        self
    }

    /// Hide the wrapper chrome when printing.
    pub fn with_hide_wrapper_on_print(mut self, hide: bool) -> Self {
        self.hide_wrapper_on_print = hide;
        self
    }

    /// Ignore page width and height.
    pub fn with_ignore_page_size(mut self, width: bool, height: bool) -> Self {
        self.ignore_width = width;
        self.ignore_height = height;
        self
    }

    /// Skip embedded fonts.
    pub fn with_ignore_fonts(mut self, ignore: bool) -> Self {
        self.ignore_fonts = ignore;
        self
    }

    /// Split pages on page breaks.
    pub fn with_break_pages(mut self, break_pages: bool) -> Self {
        self.break_pages = break_pages;
        self
    }

    /// Honour Word's `w:lastRenderedPageBreak` hints.
    pub fn with_last_rendered_page_breaks(mut self, respect: bool) -> Self {
        self.ignore_last_rendered_page_break = !respect;
        self
    }

    /// Whether `w:lastRenderedPageBreak` hints split pages.
    pub fn respect_last_rendered_page_break(&self) -> bool {
        !self.ignore_last_rendered_page_break
    }

    /// Render headers and footers.
    pub fn with_headers_footers(mut self, headers: bool, footers: bool) -> Self {
        self.render_headers = headers;
        self.render_footers = footers;
        self
    }

    /// Render footnotes and endnotes.
    pub fn with_notes(mut self, footnotes: bool, endnotes: bool) -> Self {
        self.render_footnotes = footnotes;
        self.render_endnotes = endnotes;
        self
    }

    /// Render tracked-change markup.
    pub fn with_changes(mut self, render: bool) -> Self {
        self.render_changes = render;
        self
    }

    /// Render comments.
    pub fn with_comments(mut self, render: bool) -> Self {
        self.render_comments = render;
        self
    }

    /// Render embedded HTML chunks.
    pub fn with_alt_chunks(mut self, render: bool) -> Self {
        self.render_alt_chunks = render;
        self
    }

    /// Use data URIs for images and fonts.
    pub fn with_base64_url(mut self, use_base64: bool) -> Self {
        self.use_base64_url = use_base64;
        self
    }

    /// Set the field rendering mode.
    pub fn with_field_mode(mut self, mode: FieldMode) -> Self {
        self.field_mode = mode;
        self
    }

    /// Log diagnostics.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Class name with a suffix: `{class_name}-{suffix}`.
    pub fn class(&self, suffix: &str) -> String {
        format!("{}-{}", self.class_name, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = Options::default();
        assert_eq!(opts.class_name, "docx");
        assert!(opts.in_wrapper);
        assert!(opts.break_pages);
        assert!(!opts.render_changes);
        assert!(!opts.render_comments);
        assert!(opts.use_base64_url);
        assert!(!opts.respect_last_rendered_page_break());
        assert_eq!(opts.field_mode, FieldMode::LastComputed);
    }

    #[test]
    fn test_builder_pattern() {
        let opts = Options::new()
            .with_class_name("doc")
            .with_changes(true)
            .with_last_rendered_page_breaks(true)
            .with_field_mode(FieldMode::Live);

        assert_eq!(opts.class("page-break"), "doc-page-break");
        assert!(opts.render_changes);
        assert!(opts.respect_last_rendered_page_break());
        assert_eq!(opts.field_mode, FieldMode::Live);
    }
}
