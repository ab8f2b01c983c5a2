//! Writing the four reftest fixture documents for one variant.
//!
//! The documents are row-aligned: row i of each refers to the same
//! (base, transformed) pair, so a comparison tool can correlate rows across
//! files. Content goes to temporary files first and all four land together,
//! or not at all.

use std::{
    fs,
    io::{BufWriter, Write},
    path::PathBuf,
};

use log::trace;
use mathvarir::VariantName;
use tempfile::NamedTempFile;

use crate::{error::Error, paths::Paths};

const ROWS_PER_LINE: usize = 10;
const FOOTER: &str = "</body>\n</html>\n";

/// One fixture document: its final location plus the temp file receiving
/// content until the whole quartet is complete.
struct Fixture {
    target: PathBuf,
    file: BufWriter<NamedTempFile>,
}

impl Fixture {
    fn create(target: PathBuf) -> Result<Fixture, Error> {
        // land the temp file next to its target so persist() never crosses
        // a filesystem boundary
        let dir = target.parent().unwrap_or_else(|| std::path::Path::new("."));
        let file = NamedTempFile::new_in(dir)
            .map_err(|source| Error::write_failure(&target, source))?;
        Ok(Fixture {
            target,
            file: BufWriter::new(file),
        })
    }

    fn write(&mut self, content: &str) -> Result<(), Error> {
        self.file
            .write_all(content.as_bytes())
            .map_err(|source| Error::write_failure(&self.target, source))
    }
}

/// The four row-aligned documents asserting one variant's transform:
/// test/reference for the native markup mechanism and test/reference for
/// the CSS text-transform property.
///
/// Dropping an unfinished quartet removes the temporary files; a partial
/// quartet never appears at the target paths.
pub struct ReftestQuartet {
    variant: VariantName,
    // [native test, native reference, css test, css reference]
    fixtures: [Fixture; 4],
    rows: usize,
}

impl ReftestQuartet {
    /// Open the four documents and write their headers.
    pub fn create(variant: &VariantName, paths: &Paths) -> Result<ReftestQuartet, Error> {
        let mut quartet = ReftestQuartet {
            variant: variant.clone(),
            fixtures: [
                Fixture::create(paths.reftest_file(variant))?,
                Fixture::create(paths.reftest_reference_file(variant))?,
                Fixture::create(paths.css_reftest_file(variant))?,
                Fixture::create(paths.css_reftest_reference_file(variant))?,
            ],
            rows: 0,
        };
        quartet.write_headers()?;
        Ok(quartet)
    }

    fn write_headers(&mut self) -> Result<(), Error> {
        let variant = self.variant.clone();
        let titles = [
            format!("mathvariant {variant}"),
            format!("mathvariant {variant} (reference)"),
            format!("text-transform math-{variant}"),
            format!("text-transform math-{variant} (reference)"),
        ];
        for (fixture, title) in self.fixtures.iter_mut().zip(titles) {
            fixture.write(&format!(
                "<!DOCTYPE html>\n\
                 <html>\n\
                 <head>\n\
                 <meta charset=\"utf-8\"/>\n\
                 <title>{title}</title>\n"
            ))?;
        }

        self.fixtures[0].write(&format!(
            "<link rel=\"help\" href=\"https://mathml-refresh.github.io/mathml-core/#cssproperties\"/>\n\
             <link rel=\"match\" href=\"mathvariant-{variant}-ref.html\"/>\n\
             <meta name=\"assert\" content=\"Verify that a single-char <mtext> with a {variant} mathvariant is equivalent to an <mtext> with the transformed unicode character.\">\n"
        ))?;
        self.fixtures[2].write(&format!(
            "<link rel=\"help\" href=\"https://github.com/w3c/csswg-drafts/issues/3745\"/>\n\
             <link rel=\"match\" href=\"text-transform-math-{variant}-001.tentative-ref.html\"/>\n\
             <meta name=\"assert\" content=\"Verify that a character with 'text-transform: math-{variant}' renders the same as the transformed unicode character.\">\n"
        ))?;

        let style = format!(
            "<style>\n\
            \x20 @font-face {{\n\
            \x20   font-family: TestFont;\n\
            \x20   src: url(\"/fonts/math/mathvariant-{variant}.woff\");\n\
            \x20 }}\n\
            \x20 body > span {{\n\
            \x20   padding: 10px;\n\
            \x20 }}\n\
            \x20 span > span {{\n\
            \x20   font-family: monospace;\n\
            \x20   font-size: 10px;\n\
            \x20 }}\n\
            \x20 .testfont {{\n\
            \x20   font-family: TestFont;\n\
            \x20   font-size: 10px;\n\
            \x20 }}\n\
             </style>\n\
             <body>\n\
            \x20 <!-- Generated by mathvargen; DO NOT EDIT. -->\n\
            \x20 <p>Test passes if all the equalities below are true.</p>\n"
        );
        for fixture in self.fixtures.iter_mut() {
            fixture.write(&style)?;
        }
        Ok(())
    }

    /// Write one (base, transformed) row to all four documents.
    ///
    /// The label prints the transformed codepoint as 5-digit zero-padded
    /// uppercase hex. Every 10th row is followed by a line break in all
    /// four documents simultaneously.
    pub fn write_row(&mut self, base: u32, transformed: u32) -> Result<(), Error> {
        let variant = &self.variant;
        let rows = [
            format!(
                "  <span><math class=\"testfont\"><mtext mathvariant=\"{variant}\">&#x{base:X};</mtext></math>=<span>{transformed:05X}</span></span>"
            ),
            format!(
                "  <span><math class=\"testfont\"><mtext>&#x{transformed:X};</mtext></math>=<span>{transformed:05X}</span></span>"
            ),
            format!(
                "  <span><span class=\"testfont\" style=\"text-transform: math-{variant}\">&#x{base:X};</span>=<span>{transformed:05X}</span></span>"
            ),
            format!(
                "  <span><span class=\"testfont\">&#x{transformed:X};</span>=<span>{transformed:05X}</span></span>"
            ),
        ];
        self.rows += 1;
        let separator = self.rows % ROWS_PER_LINE == 0;
        for (fixture, row) in self.fixtures.iter_mut().zip(rows) {
            fixture.write(&row)?;
            if separator {
                fixture.write("<br/>")?;
            }
            fixture.write("\n")?;
        }
        Ok(())
    }

    /// Rows written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Write the trailer and move all four documents to their final paths.
    ///
    /// If any of the four fails to land, the ones already moved are removed
    /// again; the invariant is all four or none.
    pub fn finish(mut self) -> Result<(), Error> {
        for fixture in self.fixtures.iter_mut() {
            fixture.write(FOOTER)?;
        }

        let mut persisted: Vec<PathBuf> = Vec::with_capacity(4);
        for Fixture { target, file } in self.fixtures {
            let result = file
                .into_inner()
                .map_err(|e| e.into_error())
                .and_then(|temp| temp.persist(&target).map(|_| ()).map_err(|e| e.error));
            if let Err(source) = result {
                for path in &persisted {
                    trace!("removing partially written {}", path.display());
                    let _ = fs::remove_file(path);
                }
                return Err(Error::WriteFailure {
                    path: target,
                    source,
                });
            }
            persisted.push(target);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn write_quartet(paths: &Paths, pairs: &[(u32, u32)]) -> Result<(), Error> {
        let mut quartet = ReftestQuartet::create(&"script".into(), paths)?;
        for (base, transformed) in pairs {
            quartet.write_row(*base, *transformed)?;
        }
        quartet.finish()
    }

    fn make_dirs(paths: &Paths) {
        for dir in [paths.font_dir(), paths.reftest_dir(), paths.css_reftest_dir()] {
            fs::create_dir_all(dir).unwrap();
        }
    }

    fn quartet_files(paths: &Paths) -> [PathBuf; 4] {
        let variant = "script".into();
        [
            paths.reftest_file(&variant),
            paths.reftest_reference_file(&variant),
            paths.css_reftest_file(&variant),
            paths.css_reftest_reference_file(&variant),
        ]
    }

    #[test]
    fn documents_are_row_aligned() {
        let temp_dir = tempdir().unwrap();
        let paths = Paths::new(temp_dir.path());
        make_dirs(&paths);

        let pairs: Vec<_> = (0..25_u32).map(|i| (0x41 + i, 0x1D49C + i)).collect();
        write_quartet(&paths, &pairs).unwrap();

        let contents = quartet_files(&paths).map(|path| fs::read_to_string(path).unwrap());
        for content in &contents {
            let rows: Vec<_> = content
                .lines()
                .filter(|line| line.starts_with("  <span>"))
                .collect();
            assert_eq!(pairs.len(), rows.len());
        }
        // row i refers to the same pair everywhere: the label is shared
        for (i, (_, transformed)) in pairs.iter().enumerate() {
            let label = format!("<span>{transformed:05X}</span>");
            for content in &contents {
                let row = content
                    .lines()
                    .filter(|line| line.starts_with("  <span>"))
                    .nth(i)
                    .unwrap();
                assert!(row.contains(&label), "row {i}: {row}");
            }
        }
    }

    #[test]
    fn breaks_after_every_tenth_row() {
        let temp_dir = tempdir().unwrap();
        let paths = Paths::new(temp_dir.path());
        make_dirs(&paths);

        let pairs: Vec<_> = (0..25_u32).map(|i| (0x41 + i, 0x1D49C + i)).collect();
        write_quartet(&paths, &pairs).unwrap();

        for path in quartet_files(&paths) {
            let content = fs::read_to_string(path).unwrap();
            let break_positions: Vec<_> = content
                .lines()
                .filter(|line| line.starts_with("  <span>"))
                .enumerate()
                .filter(|(_, line)| line.ends_with("<br/>"))
                .map(|(i, _)| i + 1)
                .collect();
            assert_eq!(vec![10, 20], break_positions);
        }
    }

    #[test]
    fn tests_render_the_base_references_render_the_transform() {
        let temp_dir = tempdir().unwrap();
        let paths = Paths::new(temp_dir.path());
        make_dirs(&paths);

        write_quartet(&paths, &[(0x41, 0x1D49C)]).unwrap();
        let [test, reference, css_test, css_reference] =
            quartet_files(&paths).map(|path| fs::read_to_string(path).unwrap());

        assert!(test.contains("<mtext mathvariant=\"script\">&#x41;</mtext>"), "{test}");
        assert!(reference.contains("<mtext>&#x1D49C;</mtext>"), "{reference}");
        assert!(
            css_test.contains("style=\"text-transform: math-script\">&#x41;</span>"),
            "{css_test}"
        );
        assert!(
            css_reference.contains("class=\"testfont\">&#x1D49C;</span>"),
            "{css_reference}"
        );
        for content in [&test, &reference, &css_test, &css_reference] {
            assert!(content.contains("<span>1D49C</span>"));
            assert!(content.ends_with("</body>\n</html>\n"));
        }
    }

    #[test]
    fn unfinished_quartet_leaves_nothing_behind() {
        let temp_dir = tempdir().unwrap();
        let paths = Paths::new(temp_dir.path());
        make_dirs(&paths);

        let mut quartet = ReftestQuartet::create(&"script".into(), &paths).unwrap();
        quartet.write_row(0x41, 0x1D49C).unwrap();
        drop(quartet);

        for path in quartet_files(&paths) {
            assert!(!path.exists(), "{path:?}");
        }
        for dir in [paths.reftest_dir(), paths.css_reftest_dir()] {
            assert_eq!(0, fs::read_dir(dir).unwrap().count(), "{dir:?}");
        }
    }

    #[test]
    fn output_is_reproducible() {
        let run = |root: &std::path::Path| {
            let paths = Paths::new(root);
            make_dirs(&paths);
            write_quartet(&paths, &[(0x41, 0x1D49C), (0x42, 0x1D49D)]).unwrap();
            quartet_files(&paths).map(|path| fs::read(path).unwrap())
        };
        let first_dir = tempdir().unwrap();
        let second_dir = tempdir().unwrap();
        assert_eq!(run(first_dir.path()), run(second_dir.path()));
    }
}
