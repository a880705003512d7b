//! Per-font layout metrics: glyph widths, ink offsets, kerning tables, and
//! the font-wide spacing constants.
//!
//! `FontMetrics` is everything layout needs and nothing drawing needs, so a
//! font can borrow another font's spacing while keeping its own sprites.

use crate::kerning::KerningTable;
use crate::sheet::{GLYPH_COUNT, GlyphSheet, Spacing};

/// Spacing constants supplied when a font is loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacingConfig {
    /// Extra pixels between consecutive glyphs.
    pub char_spacing: i32,
    /// Advance of the space character in pixels.
    pub space_width: i32,
    /// Multiplier on the base layout scale.
    pub scale_factor: f64,
}

impl Default for SpacingConfig {
    fn default() -> Self {
        Self {
            char_spacing: 0,
            space_width: 8,
            scale_factor: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FontMetrics {
    left_offsets: [i32; GLYPH_COUNT],
    widths: [i32; GLYPH_COUNT],
    kerning: Vec<Option<Box<KerningTable>>>,
    scale_factor: f64,
    char_spacing: i32,
    space_width: i32,
    fixed_width: bool,
    block_width: i32,
    cell_width: i32,
    cell_height: i32,
    accents_present: bool,
}

impl FontMetrics {
    /// Collect metrics from a sliced sheet and its kerning tables.
    pub fn new(
        sheet: &GlyphSheet,
        kerning: Vec<Option<Box<KerningTable>>>,
        spacing: SpacingConfig,
    ) -> Self {
        let mut left_offsets = [0; GLYPH_COUNT];
        let mut widths = [0; GLYPH_COUNT];
        for (i, cell) in sheet.cells().iter().enumerate() {
            left_offsets[i] = cell.left_ink_offset;
            widths[i] = cell.ink_width;
        }

        Self {
            left_offsets,
            widths,
            kerning,
            scale_factor: spacing.scale_factor,
            char_spacing: spacing.char_spacing,
            space_width: spacing.space_width,
            fixed_width: matches!(sheet.spacing(), Spacing::Fixed { .. }),
            block_width: sheet.block_width() as i32,
            cell_width: sheet.cell_width() as i32,
            cell_height: sheet.cell_height() as i32,
            accents_present: sheet.accents_present(),
        }
    }

    /// Ink width of glyph `c` (its advance in variable-width mode).
    pub fn glyph_width(&self, c: u8) -> i32 {
        self.widths[c as usize]
    }

    /// Blank columns to the left of glyph `c`'s ink.
    pub fn left_offset(&self, c: u8) -> i32 {
        self.left_offsets[c as usize]
    }

    /// Kerning adjustment for the pair, or `None` if `left` has no table.
    pub fn kerning(&self, left: u8, right: u8) -> Option<i16> {
        self.kerning[left as usize].as_ref().map(|t| t.offset(right))
    }

    pub fn kerning_table(&self, left: u8) -> Option<&KerningTable> {
        self.kerning[left as usize].as_deref()
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
    }

    pub fn char_spacing(&self) -> i32 {
        self.char_spacing
    }

    pub fn space_width(&self) -> i32 {
        self.space_width
    }

    pub fn fixed_width(&self) -> bool {
        self.fixed_width
    }

    pub fn block_width(&self) -> i32 {
        self.block_width
    }

    pub fn cell_width(&self) -> i32 {
        self.cell_width
    }

    pub fn cell_height(&self) -> i32 {
        self.cell_height
    }

    pub fn accents_present(&self) -> bool {
        self.accents_present
    }
}
