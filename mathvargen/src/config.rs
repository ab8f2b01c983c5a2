//! State for a generation run

use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Args, Error};

/// The settings of a single run, persisted beside the download cache.
///
/// This remembers which source populated the cache, so a run against a
/// different URL refetches instead of reusing stale bytes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub args: Args,
}

impl Config {
    pub fn new(args: Args) -> Config {
        Config { args }
    }

    /// Returns the path to the config file for this run
    fn file(&self) -> PathBuf {
        self.args.cache_file.with_file_name("mathvargen.yml")
    }

    /// True if the cached database can be reused for these args.
    pub fn cache_is_valid(&self) -> bool {
        if !self.args.cache_file.is_file() {
            return false;
        }
        let Ok(yml) = fs::read_to_string(self.file()) else {
            return false;
        };
        match serde_yaml::from_str::<Config>(&yml) {
            Ok(prior_config) => prior_config.args.source_url == self.args.source_url,
            Err(err) => {
                log::warn!("Unable to parse prior config {err:#?}");
                false
            }
        }
    }

    /// Record what populated the cache.
    pub fn save(&self) -> Result<(), Error> {
        let file = self.file();
        fs::write(&file, serde_yaml::to_string(self)?).map_err(|source| Error::FileIo {
            path: file,
            source,
        })
    }
}
