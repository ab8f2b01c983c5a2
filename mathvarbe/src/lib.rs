//! Backends that turn one variant's mapping into on-disk artifacts: a
//! minimal WOFF font and the four reftest fixture documents.

mod error;
mod font;
mod glyph;
pub mod paths;
mod reftest;
mod woff;

pub use error::Error;
pub use font::synthesize;
pub use glyph::GlyphBag;
pub use paths::Paths;
pub use reftest::ReftestQuartet;
pub use woff::wrap_woff;
