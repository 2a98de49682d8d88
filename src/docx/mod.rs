//! DOCX (Word) document parsing.

pub mod fonts;
pub mod math;
pub mod numbering;
mod package;
pub mod parser;
pub mod properties;
pub mod section;
pub mod settings;
pub mod styles;
pub mod theme;
pub mod vml;

pub use package::{font_part_path, DocxParser};
pub use parser::ContentParser;
