//! Fetching and caching the character database.

use std::{fs, io::Read};

use log::{debug, info};

use crate::{config::Config, error::Error};

/// The bytes of unicode.xml, from the local cache when it is still valid.
///
/// This is a one-time gate: any failure here is fatal and happens before
/// any output is produced.
pub fn fetch_source(config: &Config) -> Result<Vec<u8>, Error> {
    let cache_file = &config.args.cache_file;
    if config.cache_is_valid() {
        debug!("using cached {}", cache_file.display());
        return fs::read(cache_file).map_err(|source| Error::FileIo {
            path: cache_file.clone(),
            source,
        });
    }

    let url = &config.args.source_url;
    info!("downloading {url}");
    let mut body = ureq::get(url)
        .header("User-Agent", "mathvargen")
        .call()
        .map_err(|source| Error::SourceUnavailable {
            url: url.clone(),
            source: Box::new(source),
        })?
        .into_body();
    let mut bytes = Vec::new();
    body.as_reader()
        .read_to_end(&mut bytes)
        .map_err(|source| Error::SourceRead {
            url: url.clone(),
            source,
        })?;

    if let Some(dir) = cache_file.parent() {
        fs::create_dir_all(dir).map_err(|source| Error::FileIo {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    fs::write(cache_file, &bytes).map_err(|source| Error::FileIo {
        path: cache_file.clone(),
        source,
    })?;
    config.save()?;
    Ok(bytes)
}
