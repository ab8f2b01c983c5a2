//! Command line arguments

use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SOURCE_URL: &str = "https://www.w3.org/2003/entities/2007xml/unicode.xml";

/// What mathvariant artifacts can we generate for you today?
#[derive(Serialize, Deserialize, Parser, Debug, Clone, PartialEq)]
pub struct Args {
    /// Root of the web-platform-tests checkout to write into.
    #[arg(short, long)]
    #[clap(default_value = ".")]
    pub wpt_root: PathBuf,

    /// Where the character database lives.
    #[arg(long)]
    #[clap(default_value = DEFAULT_SOURCE_URL)]
    pub source_url: String,

    /// Local copy of the character database; reused when still valid.
    #[arg(long)]
    #[clap(default_value = "build/unicode.xml")]
    pub cache_file: PathBuf,

    /// Variant names must match this regex to be processed
    #[arg(short, long)]
    #[clap(default_value = None)]
    pub variant_filter: Option<String>,
}

impl Args {
    #[cfg(test)]
    pub(crate) fn for_test(wpt_root: &std::path::Path) -> Args {
        Args {
            wpt_root: wpt_root.to_path_buf(),
            source_url: DEFAULT_SOURCE_URL.to_string(),
            cache_file: wpt_root.join("build").join("unicode.xml"),
            variant_filter: None,
        }
    }
}
