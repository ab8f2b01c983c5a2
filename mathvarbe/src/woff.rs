//! WOFF (1.0) container assembly.
//!
//! <https://www.w3.org/TR/WOFF/>

use std::io::Write;

use flate2::{write::ZlibEncoder, Compression};
use write_fonts::read::{FontRef, ReadError};

use crate::error::Error;

const WOFF_SIGNATURE: u32 = 0x774F_4646; // 'wOFF'
const WOFF_HEADER_LEN: u32 = 44;
const WOFF_DIR_ENTRY_LEN: u32 = 20;
const SFNT_HEADER_LEN: u32 = 12;
const SFNT_DIR_ENTRY_LEN: u32 = 16;

fn round4(len: u32) -> u32 {
    (len + 3) & !3
}

fn compress(data: &[u8]) -> Result<Vec<u8>, Error> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data).map_err(Error::Compression)?;
    encoder.finish().map_err(Error::Compression)
}

struct WoffTable {
    tag: [u8; 4],
    checksum: u32,
    orig_len: u32,
    data: Vec<u8>,
}

/// Wrap an sfnt into a WOFF file.
///
/// Tables keep the directory's tag order and original checksums; each is
/// zlib-compressed unless compression fails to shrink it, as the spec
/// directs. Identical sfnt input yields identical WOFF output.
pub fn wrap_woff(sfnt: &[u8]) -> Result<Vec<u8>, Error> {
    let font = FontRef::new(sfnt)?;
    let directory = font.table_directory();

    let mut tables = Vec::with_capacity(directory.table_records().len());
    for record in directory.table_records() {
        let start = record.offset() as usize;
        let end = start + record.length() as usize;
        let orig = sfnt
            .get(start..end)
            .ok_or(Error::FontReparse(ReadError::OutOfBounds))?;
        let compressed = compress(orig)?;
        let data = if compressed.len() < orig.len() {
            compressed
        } else {
            orig.to_vec()
        };
        tables.push(WoffTable {
            tag: record.tag().to_be_bytes(),
            checksum: record.checksum(),
            orig_len: record.length(),
            data,
        });
    }

    let num_tables = tables.len() as u16;
    let directory_len = WOFF_HEADER_LEN + WOFF_DIR_ENTRY_LEN * num_tables as u32;
    let total_len = directory_len
        + tables
            .iter()
            .map(|table| round4(table.data.len() as u32))
            .sum::<u32>();
    let total_sfnt_size = SFNT_HEADER_LEN
        + SFNT_DIR_ENTRY_LEN * num_tables as u32
        + tables
            .iter()
            .map(|table| round4(table.orig_len))
            .sum::<u32>();

    let mut woff = Vec::with_capacity(total_len as usize);
    woff.extend_from_slice(&WOFF_SIGNATURE.to_be_bytes());
    woff.extend_from_slice(&directory.sfnt_version().to_be_bytes());
    woff.extend_from_slice(&total_len.to_be_bytes());
    woff.extend_from_slice(&num_tables.to_be_bytes());
    woff.extend_from_slice(&0u16.to_be_bytes()); // reserved
    woff.extend_from_slice(&total_sfnt_size.to_be_bytes());
    woff.extend_from_slice(&1u16.to_be_bytes()); // majorVersion
    woff.extend_from_slice(&0u16.to_be_bytes()); // minorVersion
    for _meta_or_priv in 0..5 {
        woff.extend_from_slice(&0u32.to_be_bytes());
    }

    let mut offset = directory_len;
    for table in &tables {
        woff.extend_from_slice(&table.tag);
        woff.extend_from_slice(&offset.to_be_bytes());
        woff.extend_from_slice(&(table.data.len() as u32).to_be_bytes());
        woff.extend_from_slice(&table.orig_len.to_be_bytes());
        woff.extend_from_slice(&table.checksum.to_be_bytes());
        offset += round4(table.data.len() as u32);
    }
    for table in tables {
        let padding = (round4(table.data.len() as u32) - table.data.len() as u32) as usize;
        woff.extend(table.data);
        woff.extend(std::iter::repeat(0u8).take(padding));
    }
    debug_assert_eq!(total_len as usize, woff.len());
    Ok(woff)
}

#[cfg(test)]
mod tests {
    use flate2::read::ZlibDecoder;
    use more_asserts::assert_le;
    use std::io::Read;

    use super::*;
    use crate::font::synthesize;

    fn sample_sfnt() -> Vec<u8> {
        let mapping = (0..40_u32)
            .map(|i| (0x41 + i, 0x1D400 + i))
            .collect();
        synthesize(&"bold".into(), &mapping).unwrap()
    }

    fn be_u32(bytes: &[u8]) -> u32 {
        u32::from_be_bytes(bytes.try_into().unwrap())
    }

    fn be_u16(bytes: &[u8]) -> u16 {
        u16::from_be_bytes(bytes.try_into().unwrap())
    }

    #[test]
    fn header_is_well_formed() {
        let sfnt = sample_sfnt();
        let woff = wrap_woff(&sfnt).unwrap();

        assert_eq!(WOFF_SIGNATURE, be_u32(&woff[0..4]));
        assert_eq!(be_u32(&sfnt[0..4]), be_u32(&woff[4..8]));
        assert_eq!(woff.len() as u32, be_u32(&woff[8..12]));
        let num_tables = be_u16(&woff[12..14]);
        assert_ne!(0, num_tables);
        assert_eq!(0, be_u16(&woff[14..16]));
        assert_le!(woff.len() as u32, be_u32(&woff[16..20]));
    }

    #[test]
    fn tables_round_trip_through_compression() {
        let sfnt = sample_sfnt();
        let font = FontRef::new(&sfnt).unwrap();
        let woff = wrap_woff(&sfnt).unwrap();
        let num_tables = be_u16(&woff[12..14]) as usize;
        assert_eq!(font.table_directory().table_records().len(), num_tables);

        for (i, record) in font.table_directory().table_records().iter().enumerate() {
            let entry = &woff[44 + 20 * i..44 + 20 * (i + 1)];
            assert_eq!(record.tag().to_be_bytes(), entry[0..4]);
            let offset = be_u32(&entry[4..8]) as usize;
            let comp_len = be_u32(&entry[8..12]) as usize;
            let orig_len = be_u32(&entry[12..16]) as usize;
            assert_eq!(record.length() as usize, orig_len);
            assert_le!(comp_len, orig_len);

            let stored = &woff[offset..offset + comp_len];
            let original = {
                let start = record.offset() as usize;
                &sfnt[start..start + orig_len]
            };
            if comp_len < orig_len {
                let mut decompressed = Vec::new();
                ZlibDecoder::new(stored)
                    .read_to_end(&mut decompressed)
                    .unwrap();
                assert_eq!(original, decompressed.as_slice());
            } else {
                assert_eq!(original, stored);
            }
        }
    }

    #[test]
    fn output_is_reproducible() {
        let sfnt = sample_sfnt();
        assert_eq!(wrap_woff(&sfnt).unwrap(), wrap_woff(&sfnt).unwrap());
    }
}
