//! Glyph allocation and outline synthesis.
//!
//! Glyph shapes only need to be renderable and mutually distinguishable;
//! each codepoint gets a baseline bar plus one tick per set bit of its
//! value, so no two distinct codepoints share an outline.

use indexmap::IndexMap;
use kurbo::BezPath;
use write_fonts::{tables::glyf::SimpleGlyph, types::GlyphId};

use crate::error::Error;

/// The glyphs allocated for one variant's font, keyed by codepoint.
///
/// Glyph id 0 is always .notdef; codepoint glyphs follow in allocation
/// order, which is the mapping's iteration order.
#[derive(Debug, Default)]
pub struct GlyphBag {
    glyphs: IndexMap<u32, GlyphId>,
}

impl GlyphBag {
    pub fn new() -> GlyphBag {
        GlyphBag::default()
    }

    /// Allocate a glyph for `codepoint` unless it already has one, and
    /// return its id.
    ///
    /// Bases and targets overlap freely within one font; repeats share the
    /// existing glyph.
    pub fn ensure_glyph(&mut self, codepoint: u32) -> GlyphId {
        let next = GlyphId::new(self.glyphs.len() as u32 + 1);
        *self.glyphs.entry(codepoint).or_insert(next)
    }

    pub fn get(&self, codepoint: u32) -> Option<GlyphId> {
        self.glyphs.get(&codepoint).copied()
    }

    /// Codepoint glyphs in allocation order; .notdef is not included.
    pub fn iter(&self) -> impl Iterator<Item = (u32, GlyphId)> + '_ {
        self.glyphs.iter().map(|(codepoint, gid)| (*codepoint, *gid))
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// Postscript-style glyph name: uniXXXX inside the BMP, uXXXXX beyond it.
pub(crate) fn glyph_name(codepoint: u32) -> String {
    if codepoint <= 0xFFFF {
        format!("uni{codepoint:04X}")
    } else {
        format!("u{codepoint:X}")
    }
}

pub(crate) fn simple_glyph(codepoint: u32) -> Result<SimpleGlyph, Error> {
    SimpleGlyph::from_bezpath(&outline(codepoint))
        .map_err(|problem| Error::GlyphOutline { codepoint, problem })
}

fn push_rect(path: &mut BezPath, x0: f64, y0: f64, x1: f64, y1: f64) {
    path.move_to((x0, y0));
    path.line_to((x0, y1));
    path.line_to((x1, y1));
    path.line_to((x1, y0));
    path.close_path();
}

/// The value-encoding outline, in a 1000 upem square.
///
/// Codepoints fit in 21 bits; U+0000 still draws the bar.
fn outline(codepoint: u32) -> BezPath {
    let mut path = BezPath::new();
    push_rect(&mut path, 50.0, 0.0, 950.0, 60.0);
    for bit in 0..21 {
        if codepoint & (1 << bit) != 0 {
            let x0 = 50.0 + 43.0 * bit as f64;
            push_rect(&mut path, x0, 120.0, x0 + 30.0, 760.0);
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_glyph_is_idempotent() {
        let mut bag = GlyphBag::new();
        let first = bag.ensure_glyph(0x41);
        let second = bag.ensure_glyph(0x1D49C);
        assert_eq!(first, bag.ensure_glyph(0x41));
        assert_eq!(second, bag.ensure_glyph(0x1D49C));
        assert_eq!(2, bag.len());
    }

    #[test]
    fn ids_start_after_notdef() {
        let mut bag = GlyphBag::new();
        assert_eq!(GlyphId::new(1), bag.ensure_glyph(0x41));
        assert_eq!(GlyphId::new(2), bag.ensure_glyph(0x42));
    }

    #[test]
    fn distinct_codepoints_get_distinct_outlines() {
        let glyph_a = simple_glyph(0x41).unwrap();
        let glyph_b = simple_glyph(0x42).unwrap();
        assert_ne!(glyph_a, glyph_b);
    }

    #[test]
    fn nul_still_renders_something() {
        let glyph = simple_glyph(0).unwrap();
        assert!(!glyph.contours.is_empty());
    }
}
