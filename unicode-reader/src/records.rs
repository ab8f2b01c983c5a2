//! Streaming projection of unicode.xml into flat character records.
//!
//! unicode.xml is large and each `<character>` carries dozens of child
//! elements we have no interest in, so this is a single forward pass that
//! keeps only what the mathvariant pipeline needs.

use log::debug;
use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};
use smol_str::SmolStr;

use crate::error::ReaderError;

/// One `<character>` entry that carries a surrogate reference.
///
/// Codepoint attributes are kept as raw prefixed-hex strings ("U1D49C");
/// decoding them belongs to the mapping extractor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterRecord {
    /// The character's own identifying codepoint.
    pub id: SmolStr,
    pub surrogate: SurrogateRef,
    /// Alternate-plane reference, preferred over `id` when present.
    pub bmp_ref: Option<SmolStr>,
}

/// Declares the owning character to be the `mathvariant` form of `base_ref`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurrogateRef {
    pub mathvariant: SmolStr,
    pub base_ref: SmolStr,
}

/// Parse the mathvariant-relevant records out of a unicode.xml document.
///
/// Characters without a `<surrogate>` child are structurally filtered out;
/// they describe no substitution.
pub fn parse_records(xml: &[u8]) -> Result<Vec<CharacterRecord>, ReaderError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    advance_to_charlist(&mut reader)?;

    let mut records = Vec::new();
    let mut current: Option<PartialRecord> = None;
    loop {
        match reader.read_event()? {
            Event::Start(start) if start.name().as_ref() == b"character" => {
                current = Some(PartialRecord::new(&start)?);
            }
            // a childless <character/> cannot carry a surrogate
            Event::Empty(start) if start.name().as_ref() == b"character" => (),
            Event::Start(start) | Event::Empty(start) => {
                if let Some(record) = current.as_mut() {
                    record.visit_child(&start)?;
                }
            }
            Event::End(end) if end.name().as_ref() == b"character" => {
                if let Some(record) = current.take().and_then(PartialRecord::finish) {
                    records.push(record);
                }
            }
            Event::Eof => break,
            _other => (),
        }
    }
    debug!("{} surrogate-bearing records", records.len());
    Ok(records)
}

/// Skip decl, doctype, comments and the document root until `<charlist>`.
fn advance_to_charlist(reader: &mut Reader<&[u8]>) -> Result<(), ReaderError> {
    loop {
        match reader.read_event()? {
            Event::Start(start) if start.name().as_ref() == b"charlist" => return Ok(()),
            Event::Eof => return Err(ReaderError::MissingCharlist),
            _other => (),
        }
    }
}

struct PartialRecord {
    id: SmolStr,
    surrogate: Option<SurrogateRef>,
    bmp_ref: Option<SmolStr>,
}

impl PartialRecord {
    fn new(start: &BytesStart) -> Result<PartialRecord, ReaderError> {
        let mut id = None;
        for attr in start.attributes() {
            let attr = attr?;
            if attr.key.as_ref() == b"id" {
                id = Some(SmolStr::new(attr.unescape_value()?));
            }
        }
        let id = id.ok_or_else(|| ReaderError::missing_attr("id", start.attributes_raw()))?;
        Ok(PartialRecord {
            id,
            surrogate: None,
            bmp_ref: None,
        })
    }

    fn visit_child(&mut self, child: &BytesStart) -> Result<(), ReaderError> {
        match child.name().as_ref() {
            b"surrogate" => {
                let mut mathvariant = None;
                let mut base_ref = None;
                for attr in child.attributes() {
                    let attr = attr?;
                    match attr.key.as_ref() {
                        b"mathvariant" => mathvariant = Some(SmolStr::new(attr.unescape_value()?)),
                        b"ref" => base_ref = Some(SmolStr::new(attr.unescape_value()?)),
                        _other => (),
                    }
                }
                let mathvariant = mathvariant.ok_or_else(|| {
                    ReaderError::missing_attr("mathvariant", child.attributes_raw())
                })?;
                let base_ref = base_ref
                    .ok_or_else(|| ReaderError::missing_attr("ref", child.attributes_raw()))?;
                self.surrogate = Some(SurrogateRef {
                    mathvariant,
                    base_ref,
                });
            }
            b"bmp" => {
                let mut bmp_ref = None;
                for attr in child.attributes() {
                    let attr = attr?;
                    if attr.key.as_ref() == b"ref" {
                        bmp_ref = Some(SmolStr::new(attr.unescape_value()?));
                    }
                }
                self.bmp_ref = Some(
                    bmp_ref
                        .ok_or_else(|| ReaderError::missing_attr("ref", child.attributes_raw()))?,
                );
            }
            _other => (),
        }
        Ok(())
    }

    fn finish(self) -> Option<CharacterRecord> {
        let surrogate = self.surrogate?;
        Some(CharacterRecord {
            id: self.id,
            surrogate,
            bmp_ref: self.bmp_ref,
        })
    }
}
