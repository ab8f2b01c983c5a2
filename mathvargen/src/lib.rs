//! A generator for the WPT mathvariant suite: per variant, one minimal
//! WOFF font plus two test/reference fixture pairs asserting that a
//! transformed character renders exactly like its target character.

mod args;
mod config;
mod download;
mod error;

pub use args::Args;
pub use config::Config;
pub use error::Error;

use std::{
    fs,
    io::Write,
    path::Path,
};

use log::{debug, info, trace};
use mathvarbe::{Paths, ReftestQuartet};
use mathvarir::{MappingTable, VariantMap, VariantName};
use regex::Regex;
use tempfile::NamedTempFile;

fn require_dir(dir: &Path) -> Result<(), Error> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::ExpectedDirectory(dir.to_path_buf()));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| Error::FileIo {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    debug!("require_dir {:?}", dir);
    Ok(())
}

fn write_atomic(target: &Path, bytes: &[u8]) -> Result<(), Error> {
    let file_io = |source| Error::FileIo {
        path: target.to_path_buf(),
        source,
    };
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir).map_err(file_io)?;
    temp.write_all(bytes).map_err(file_io)?;
    temp.persist(target).map_err(|e| file_io(e.error))?;
    Ok(())
}

/// Extract the mapping table from raw unicode.xml bytes, applying the
/// variant filter when one is configured.
pub fn extract_table(xml: &[u8], variant_filter: Option<&Regex>) -> Result<MappingTable, Error> {
    let records = unicode_reader::parse_records(xml)?;
    let mut table = mathvarir::extract(&records)?;
    if let Some(regex) = variant_filter {
        table.retain(|variant, _| {
            let keep = regex.is_match(variant.as_str());
            if !keep {
                trace!("'{variant}' does not match --variant-filter");
            }
            keep
        });
    }
    Ok(table)
}

/// One variant's unit of work: the font plus its reftest quartet.
///
/// All or nothing: a failure anywhere removes whatever the unit already
/// moved into place.
fn generate_variant(
    variant: &VariantName,
    mapping: &VariantMap,
    paths: &Paths,
) -> Result<(), Error> {
    let sfnt = mathvarbe::synthesize(variant, mapping)?;
    let woff = mathvarbe::wrap_woff(&sfnt)?;

    let mut quartet = ReftestQuartet::create(variant, paths)?;
    for (base, transformed) in mapping {
        quartet.write_row(*base, *transformed)?;
    }

    let font_file = paths.font_file(variant);
    write_atomic(&font_file, &woff)?;
    if let Err(e) = quartet.finish() {
        let _ = fs::remove_file(&font_file);
        return Err(e.into());
    }
    Ok(())
}

/// Generate fonts and fixtures for every variant in the table, in table
/// order. The first failing variant aborts the run.
pub fn generate(table: &MappingTable, paths: &Paths) -> Result<(), Error> {
    require_dir(paths.font_dir())?;
    require_dir(paths.reftest_dir())?;
    require_dir(paths.css_reftest_dir())?;

    for (variant, mapping) in table {
        debug!("Generating tests for {variant}...");
        generate_variant(variant, mapping, paths)?;
        info!("Generated {} tests for {variant}", mapping.len());
    }
    Ok(())
}

pub fn run(args: Args) -> Result<(), Error> {
    let variant_filter = args
        .variant_filter
        .as_deref()
        .map(Regex::new)
        .transpose()?;
    let config = Config::new(args);
    let xml = download::fetch_source(&config)?;
    let table = extract_table(&xml, variant_filter.as_ref())?;
    let paths = Paths::new(&config.args.wpt_root);
    generate(&table, &paths)
}
