//! Document model for word-processing packages.
//!
//! The parser turns package XML into these structures: a typed element tree
//! per part, plus the style, numbering, font and theme catalogs the renderer
//! consults while resolving the cascade.

mod css;
mod document;
mod element;
mod fonts;
mod numbering;
mod section;
mod styles;
mod theme;

pub use css::*;
pub use document::*;
pub use element::*;
pub use fonts::*;
pub use numbering::*;
pub use section::*;
pub use styles::*;
pub use theme::*;
