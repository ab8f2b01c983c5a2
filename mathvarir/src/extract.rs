//! Folding character records into the per-variant mapping table.

use indexmap::IndexMap;
use log::warn;
use unicode_reader::CharacterRecord;

use crate::{error::Error, variant::VariantName};

/// base codepoint → transformed codepoint, in first-seen order.
pub type VariantMap = IndexMap<u32, u32>;

/// variant name → its substitution map, in first-seen order.
///
/// Insertion order at both levels is the determinism contract for everything
/// downstream; fonts and fixtures iterate these maps directly and their
/// output must not vary between runs on the same input.
pub type MappingTable = IndexMap<VariantName, VariantMap>;

/// Decode a codepoint attribute, e.g. "U1D49C".
///
/// The schema prefixes hex values with one non-hex character; strip it and
/// decode the rest. Anything else is fatal, there is no partial-record
/// recovery.
pub fn parse_codepoint(raw: &str) -> Result<u32, Error> {
    let hex = raw.get(1..).unwrap_or("");
    u32::from_str_radix(hex, 16).map_err(|inner| Error::MalformedCodepoint {
        raw: raw.to_owned(),
        inner,
    })
}

/// Project the full record set into the mapping table.
///
/// A single pure fold: every surrogate-bearing record contributes one
/// (base → transformed) pair under its variant name, where transformed is
/// the alternate-plane reference when the record has one and the record's
/// own id otherwise. A repeated base keeps the last mapping seen.
pub fn extract(records: &[CharacterRecord]) -> Result<MappingTable, Error> {
    let mut table = MappingTable::default();
    for record in records {
        let variant = VariantName::new(&record.surrogate.mathvariant);
        let base = parse_codepoint(&record.surrogate.base_ref)?;
        let transformed = match &record.bmp_ref {
            Some(bmp_ref) => parse_codepoint(bmp_ref)?,
            None => parse_codepoint(&record.id)?,
        };
        if let Some(prior) = table.entry(variant).or_default().insert(base, transformed) {
            warn!(
                "{}: base U+{base:04X} remapped from U+{prior:04X} to U+{transformed:04X}",
                record.surrogate.mathvariant
            );
        }
    }

    // "isolated" is a rendering classification, not a substitution
    table.shift_remove(VariantName::ISOLATED.as_str());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use unicode_reader::{CharacterRecord, SurrogateRef};

    use super::*;

    fn record(id: &str, mathvariant: &str, base_ref: &str, bmp_ref: Option<&str>) -> CharacterRecord {
        CharacterRecord {
            id: id.into(),
            surrogate: SurrogateRef {
                mathvariant: mathvariant.into(),
                base_ref: base_ref.into(),
            },
            bmp_ref: bmp_ref.map(Into::into),
        }
    }

    #[rstest]
    #[case::bmp("U0041", 0x41)]
    #[case::padded("U00041", 0x41)]
    #[case::supplementary("U1D49C", 0x1D49C)]
    #[case::lowercase("Uabcd", 0xABCD)]
    fn codepoints_parse(#[case] raw: &str, #[case] expected: u32) {
        assert_eq!(expected, parse_codepoint(raw).unwrap());
    }

    #[rstest]
    #[case::empty("")]
    #[case::prefix_only("U")]
    #[case::not_hex("UZZZZ")]
    #[case::compound_id("UD835-DC9C")]
    fn bad_codepoints_are_fatal(#[case] raw: &str) {
        assert!(matches!(
            parse_codepoint(raw),
            Err(Error::MalformedCodepoint { .. })
        ));
    }

    #[test]
    fn script_capital_a() {
        // the record's own id supplies the transform when there is no bmp ref
        let table = extract(&[record("U1D49C", "script", "U00041", None)]).unwrap();
        assert_eq!(1, table.len());
        assert_eq!(
            vec![(0x41_u32, 0x1D49C_u32)],
            table["script"].iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn bmp_ref_wins_over_id() {
        let table = extract(&[record("UD835-DC9C", "script", "U00041", Some("U1D49C"))]).unwrap();
        assert_eq!(0x1D49C, table["script"][&0x41]);
    }

    #[test]
    fn isolated_never_survives() {
        let table = extract(&[
            record("U1EE00", "isolated", "U0627", None),
            record("U1D400", "bold", "U0041", None),
        ])
        .unwrap();
        assert!(!table.contains_key("isolated"));
        assert_eq!(1, table.len());
    }

    #[test]
    fn repeated_base_keeps_last() {
        let table = extract(&[
            record("U1D49C", "script", "U00041", None),
            record("U1D4D0", "script", "U00041", None),
        ])
        .unwrap();
        assert_eq!(0x1D4D0, table["script"][&0x41]);
        assert_eq!(1, table["script"].len());
    }

    #[test]
    fn variants_and_bases_keep_first_seen_order() {
        let table = extract(&[
            record("U1D49D", "script", "U00042", None),
            record("U1D400", "bold", "U0041", None),
            record("U1D49C", "script", "U00041", None),
        ])
        .unwrap();
        assert_eq!(
            vec!["script", "bold"],
            table.keys().map(VariantName::as_str).collect::<Vec<_>>()
        );
        assert_eq!(
            vec![0x42_u32, 0x41],
            table["script"].keys().copied().collect::<Vec<_>>()
        );
    }

    #[test]
    fn malformed_base_aborts_the_fold() {
        let result = extract(&[
            record("U1D49C", "script", "U00041", None),
            record("U1D49D", "script", "bogus", None),
        ]);
        assert!(matches!(result, Err(Error::MalformedCodepoint { .. })));
    }
}
