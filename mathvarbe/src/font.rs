//! Assembling one variant's font.
//!
//! The table set is the minimum a reftest needs: cmap, glyf/loca, metrics
//! and naming. Identical input must yield byte-identical output to support
//! regression diffing, so the head timestamps are pinned.

use std::{
    cmp::{max, min},
    env,
};

use chrono::{DateTime, TimeZone, Utc};
use log::{debug, warn};
use mathvarir::{VariantMap, VariantName};
use write_fonts::{
    tables::{
        cmap::Cmap,
        glyf::{GlyfLocaBuilder, SimpleGlyph},
        head::Head,
        hhea::Hhea,
        hmtx::Hmtx,
        loca::LocaFormat,
        maxp::Maxp,
        name::{Name, NameRecord},
        os2::{Os2, SelectionFlags},
        post::Post,
        vmtx::LongMetric,
    },
    types::{FWord, LongDateTime, NameId, Tag, UfWord},
    FontBuilder, OffsetMarker,
};

use crate::{
    error::Error,
    glyph::{glyph_name, simple_glyph, GlyphBag},
};

pub(crate) const UNITS_PER_EM: u16 = 1000;
pub(crate) const ADVANCE: u16 = 1000;
pub(crate) const ASCENDER: i16 = 800;
pub(crate) const DESCENDER: i16 = -200;

// The TrueType epoch (1st January 1904) as a Unix timestamp.
const MACINTOSH_EPOCH: i64 = -2082844800;

fn timestamp_since_mac_epoch(datetime: DateTime<Utc>) -> i64 {
    let mac_epoch = Utc.timestamp_opt(MACINTOSH_EPOCH, 0).unwrap();
    datetime.signed_duration_since(mac_epoch).num_seconds()
}

/// The creation date stamped into 'head'.
///
/// A fixed date, unless the
/// [SOURCE_DATE_EPOCH](https://reproducible-builds.org/specs/source-date-epoch/)
/// environment variable overrides it; the current time would break
/// byte-for-byte reproducibility.
fn head_timestamp() -> LongDateTime {
    let mut src_date = None;
    if let Ok(src_date_var) = env::var("SOURCE_DATE_EPOCH") {
        if let Ok(timestamp) = src_date_var.parse::<i64>() {
            src_date = Utc.timestamp_opt(timestamp, 0).single();
        };
        if src_date.is_none() {
            warn!("Invalid SOURCE_DATE_EPOCH value: {src_date_var:?}. Using the default date.");
        }
    }
    let datetime = src_date.unwrap_or_else(|| Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
    LongDateTime::new(timestamp_since_mac_epoch(datetime))
}

/// Synthesize the font for one variant, as sfnt bytes.
///
/// Every base and every transformed codepoint of the mapping gets exactly
/// one glyph; glyph order is the mapping's iteration order, so the same
/// mapping always compiles to the same bytes.
pub fn synthesize(variant: &VariantName, mapping: &VariantMap) -> Result<Vec<u8>, Error> {
    let mut glyphs = GlyphBag::new();
    for (base, transformed) in mapping {
        glyphs.ensure_glyph(*base);
        glyphs.ensure_glyph(*transformed);
    }

    let family_name = format!("mathvariant-{variant}");
    debug!(
        "{family_name}: {} mappings, {} glyphs",
        mapping.len(),
        glyphs.len() + 1
    );

    // .notdef plus one simple glyph per codepoint, in allocation order
    let mut glyf_loca = GlyfLocaBuilder::new();
    glyf_loca.add_glyph(&SimpleGlyph::default())?;

    let mut long_metrics = vec![LongMetric {
        advance: ADVANCE,
        side_bearing: 0,
    }];
    let mut min_left_side_bearing = None;
    let mut min_right_side_bearing = None;
    let mut x_max_extent = None;
    for (codepoint, _) in glyphs.iter() {
        let glyph = simple_glyph(codepoint)?;
        let bbox = glyph.bbox;
        glyf_loca.add_glyph(&glyph)?;

        let left_side_bearing = bbox.x_min;
        let right_side_bearing = ADVANCE as i16 - bbox.x_max;
        min_left_side_bearing = min_left_side_bearing
            .map(|v| min(v, left_side_bearing))
            .or(Some(left_side_bearing));
        min_right_side_bearing = min_right_side_bearing
            .map(|v| min(v, right_side_bearing))
            .or(Some(right_side_bearing));
        x_max_extent = x_max_extent.map(|v| max(v, bbox.x_max)).or(Some(bbox.x_max));

        long_metrics.push(LongMetric {
            advance: ADVANCE,
            side_bearing: left_side_bearing,
        });
    }
    let (glyf, loca, loca_format) = glyf_loca.build();

    // A trailing run of equal advances can be stored as bare side bearings
    let num_lsb_only = {
        let last_advance = long_metrics.last().map(|m| m.advance).unwrap_or_default();
        let lsb_run = long_metrics
            .iter()
            .rev()
            .take_while(|metric| metric.advance == last_advance)
            .count();
        // keep one metric carrying the advance that repeats
        lsb_run - 1
    };
    let lsbs = long_metrics
        .split_off(long_metrics.len() - num_lsb_only)
        .into_iter()
        .map(|metric| metric.side_bearing)
        .collect();

    let number_of_long_metrics =
        long_metrics
            .len()
            .try_into()
            .map_err(|_| Error::OutOfBounds {
                what: "number_of_long_metrics".into(),
                value: format!("{}", long_metrics.len()),
            })?;
    let num_glyphs: u16 = (glyphs.len() + 1)
        .try_into()
        .map_err(|_| Error::OutOfBounds {
            what: "num_glyphs".into(),
            value: format!("{}", glyphs.len() + 1),
        })?;

    let mappings = glyphs
        .iter()
        .map(|(codepoint, gid)| {
            char::from_u32(codepoint)
                .map(|ch| (ch, gid))
                .ok_or(Error::NotAChar(codepoint))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let cmap = Cmap::from_mappings(mappings)?;

    let now = head_timestamp();
    let head = Head {
        units_per_em: UNITS_PER_EM,
        created: now,
        modified: now,
        index_to_loc_format: match loca_format {
            LocaFormat::Short => 0,
            LocaFormat::Long => 1,
        },
        ..Default::default()
    };

    let hhea = Hhea {
        ascender: FWord::new(ASCENDER),
        descender: FWord::new(DESCENDER),
        advance_width_max: UfWord::new(ADVANCE),
        min_left_side_bearing: FWord::new(min_left_side_bearing.unwrap_or_default()),
        min_right_side_bearing: FWord::new(min_right_side_bearing.unwrap_or_default()),
        x_max_extent: FWord::new(x_max_extent.unwrap_or_default()),
        number_of_h_metrics: number_of_long_metrics,
        ..Default::default()
    };
    let hmtx = Hmtx::new(long_metrics, lsbs);

    let maxp = Maxp {
        num_glyphs,
        // maxp computes its version from whether these are set; set them all
        max_points: Some(0),
        max_contours: Some(0),
        max_composite_points: Some(0),
        max_composite_contours: Some(0),
        max_zones: Some(1),
        max_twilight_points: Some(0),
        max_storage: Some(0),
        max_function_defs: Some(0),
        max_instruction_defs: Some(0),
        max_stack_elements: Some(0),
        max_size_of_instructions: Some(0),
        max_component_elements: Some(0),
        max_component_depth: Some(0),
    };

    let name = build_name(&family_name);
    let os2 = build_os2(&glyphs);

    let glyph_names: Vec<String> = std::iter::once(".notdef".to_string())
        .chain(glyphs.iter().map(|(codepoint, _)| glyph_name(codepoint)))
        .collect();
    let mut post = Post::new_v2(glyph_names.iter().map(String::as_str));
    post.underline_position = FWord::new(-75);
    post.underline_thickness = FWord::new(50);

    let mut builder = FontBuilder::new();
    builder
        .add_table(&cmap)?
        .add_table(&glyf)?
        .add_table(&head)?
        .add_table(&hhea)?
        .add_table(&hmtx)?
        .add_table(&loca)?
        .add_table(&maxp)?
        .add_table(&name)?
        .add_table(&os2)?
        .add_table(&post)?;
    Ok(builder.build())
}

fn build_name(family_name: &str) -> Name {
    let records = [
        (NameId::FAMILY_NAME, family_name),
        (NameId::SUBFAMILY_NAME, "Regular"),
        (NameId::UNIQUE_ID, family_name),
        (NameId::FULL_NAME, family_name),
        (NameId::VERSION_STRING, "Version 1.000"),
        (NameId::POSTSCRIPT_NAME, family_name),
    ]
    .into_iter()
    .map(|(name_id, value)| NameRecord {
        name_id,
        platform_id: 3,
        encoding_id: 1,
        language_id: 0x409,
        string: OffsetMarker::new(value.to_string()),
    })
    .collect();
    Name::new(records)
}

fn build_os2(glyphs: &GlyphBag) -> Os2 {
    let first_char = glyphs.iter().map(|(codepoint, _)| codepoint).min();
    let last_char = glyphs.iter().map(|(codepoint, _)| codepoint).max();
    Os2 {
        x_avg_char_width: ADVANCE as i16,
        us_weight_class: 400,
        us_width_class: 5,
        fs_selection: SelectionFlags::REGULAR,
        s_typo_ascender: ASCENDER,
        s_typo_descender: DESCENDER,
        s_typo_line_gap: 0,
        us_win_ascent: ASCENDER as u16,
        us_win_descent: DESCENDER.unsigned_abs(),
        // codepoints past the BMP clamp to 0xFFFF per the OS/2 spec
        us_first_char_index: first_char.map(|cp| min(cp, 0xFFFF) as u16).unwrap_or(0),
        us_last_char_index: last_char.map(|cp| min(cp, 0xFFFF) as u16).unwrap_or(0),
        ach_vend_id: Tag::new(b"NONE"),
        // avoid "field must be present for version 2" caused by default None
        ul_code_page_range_1: Some(0),
        ul_code_page_range_2: Some(0),
        us_default_char: Some(0),
        us_break_char: Some(32),
        us_max_context: Some(0),
        ..Default::default()
    }
}
