//! True kerning: per-pair horizontal adjustments computed from glyph pixels.
//!
//! Pseudo-kerning (cropping each glyph to its ink box) already removes the
//! blank margins around a glyph. True kerning tightens specific pairs
//! further by finding, across every pixel row, the smallest gap between the
//! right edge of the left glyph's ink and the left edge of the right
//! glyph's ink.

use crate::sheet::{GLYPH_COUNT, GlyphCell, GlyphSheet, Spacing, is_ink};

/// Kerning offsets from one left glyph to every possible right glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KerningTable {
    offsets: [i16; GLYPH_COUNT],
}

impl KerningTable {
    fn zeroed() -> Self {
        Self {
            offsets: [0; GLYPH_COUNT],
        }
    }

    /// Pixel adjustment when `right` follows this table's glyph.
    /// Negative pulls the pair closer.
    pub fn offset(&self, right: u8) -> i16 {
        self.offsets[right as usize]
    }

    pub fn offsets(&self) -> &[i16; GLYPH_COUNT] {
        &self.offsets
    }
}

/// Leftmost and rightmost ink column of every pixel row of a glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowExtents {
    /// Leftmost ink column in this row or the rows directly above and
    /// below; `cell_width` when none of them has ink.
    pub left: Vec<i32>,
    /// Rightmost ink column in this row; 0 when the row has no ink.
    pub right: Vec<i32>,
}

impl RowExtents {
    /// Measure cropped RGBA cell pixels.
    ///
    /// The left edge also looks one row up and down so that diagonal
    /// strokes of two glyphs never nest into touching corners.
    pub fn measure(pixels: &[u8], cell_width: usize, cell_height: usize) -> Self {
        let ink_at = |x: usize, y: usize| is_ink(pixels[(y * cell_width + x) * 4 + 3]);

        let mut left = Vec::with_capacity(cell_height);
        let mut right = Vec::with_capacity(cell_height);
        for y in 0..cell_height {
            let r = (0..cell_width).rev().find(|&x| ink_at(x, y)).unwrap_or(0);
            let rows = y.saturating_sub(1)..=(y + 1).min(cell_height - 1);
            let l = (0..cell_width)
                .find(|&x| rows.clone().any(|yy| ink_at(x, yy)))
                .unwrap_or(cell_width);
            left.push(l as i32);
            right.push(r as i32);
        }
        Self { left, right }
    }
}

/// Compute the kerning table of every glyph in `sheet`.
///
/// Only glyphs whose pixels were retained (non-blank, variable width) get a
/// table; every other slot is `None`. Fixed-width sheets get no tables.
pub fn solve(sheet: &GlyphSheet) -> Vec<Option<Box<KerningTable>>> {
    let mut tables: Vec<Option<Box<KerningTable>>> = vec![None; GLYPH_COUNT];
    if sheet.spacing() != Spacing::Variable {
        return tables;
    }

    let cell_width = sheet.cell_width();
    let cell_height = sheet.cell_height();
    let extents: Vec<Option<RowExtents>> = sheet
        .cells()
        .iter()
        .map(|cell| {
            cell.pixels
                .as_deref()
                .map(|px| RowExtents::measure(px, cell_width, cell_height))
        })
        .collect();

    let mut kerned_pairs = 0usize;
    for (i, left) in extents.iter().enumerate() {
        let Some(left) = left else { continue };
        let left_cell = &sheet.cells()[i];

        let mut table = KerningTable::zeroed();
        for (j, right) in extents.iter().enumerate() {
            let Some(right) = right else { continue };
            let offset = pair_offset(left, right, left_cell, &sheet.cells()[j], cell_width as i32);
            if offset != 0 {
                kerned_pairs += 1;
            }
            table.offsets[j] = offset;
        }
        tables[i] = Some(Box::new(table));
    }

    log::debug!(
        "kerning: {} tables, {kerned_pairs} kerned pairs",
        tables.iter().filter(|t| t.is_some()).count()
    );
    tables
}

/// Adjustment for `left` followed by `right`, on top of pseudo-kerning.
fn pair_offset(
    left: &RowExtents,
    right: &RowExtents,
    left_cell: &GlyphCell,
    right_cell: &GlyphCell,
    cell_width: i32,
) -> i16 {
    // Gap between the two glyphs' ink, per row, with the cells placed
    // edge to edge.
    let mut min_distance = left
        .right
        .iter()
        .zip(&right.left)
        .map(|(r, l)| (cell_width - r - 1) + l)
        .fold(2 * cell_width, i32::min);

    // Cropping has already removed the right glyph's leading margin and the
    // left glyph's trailing margin.
    min_distance -= right_cell.left_ink_offset;
    min_distance -= cell_width - (left_cell.left_ink_offset + left_cell.ink_width);

    // A gap as wide as the left glyph means the two never collide
    // horizontally; pulling them together would be a full overhang.
    if min_distance > 0 && min_distance < left_cell.ink_width {
        -(min_distance as i16)
    } else {
        0
    }
}
