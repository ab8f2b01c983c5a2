use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("'{0}' exists but is not a directory")]
    ExpectedDirectory(PathBuf),
    #[error("io failed for '{path}': '{source}'")]
    FileIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Unable to fetch '{url}': '{source}'")]
    SourceUnavailable {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },
    #[error("Unable to read the response from '{url}': '{source}'")]
    SourceRead {
        url: String,
        #[source]
        source: io::Error,
    },
    #[error("Bad --variant-filter: '{0}'")]
    BadRegex(#[from] regex::Error),
    #[error(transparent)]
    YamlSerError(#[from] serde_yaml::Error),
    #[error(transparent)]
    ReaderError(#[from] unicode_reader::ReaderError),
    #[error(transparent)]
    ExtractionError(#[from] mathvarir::Error),
    #[error(transparent)]
    Backend(#[from] mathvarbe::Error),
}
