use std::{io, path::PathBuf};

use thiserror::Error;
use write_fonts::{
    error::Error as CompileError,
    read::ReadError,
    tables::{cmap::CmapConflict, glyf::MalformedPath},
    BuilderError,
};

#[derive(Debug, Error)]
pub enum Error {
    #[error("glyph for U+{codepoint:04X} has a bad outline: {problem:?}")]
    GlyphOutline {
        codepoint: u32,
        problem: MalformedPath,
    },
    #[error("U+{0:04X} is not a unicode scalar value")]
    NotAChar(u32),
    #[error(transparent)]
    CmapConflict(#[from] CmapConflict),
    #[error("Unable to compile glyph data: '{0}'")]
    GlyphCompilation(#[from] CompileError),
    #[error("Unable to assemble font: '{0}'")]
    FontAssembly(#[from] BuilderError),
    #[error("Unable to reparse assembled font: '{0}'")]
    FontReparse(#[from] ReadError),
    #[error("{what} {value} out of bounds")]
    OutOfBounds { what: String, value: String },
    #[error("Unable to compress table data: '{0}'")]
    Compression(#[source] io::Error),
    #[error("Unable to write '{path}': '{source}'")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn write_failure(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::WriteFailure {
            path: path.into(),
            source,
        }
    }
}
