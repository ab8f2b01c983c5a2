//! Intermediate representation of mathvariant transforms: which base
//! character becomes which transformed character, per variant.

mod error;
mod extract;
mod variant;

pub use error::Error;
pub use extract::{extract, parse_codepoint, MappingTable, VariantMap};
pub use variant::VariantName;
