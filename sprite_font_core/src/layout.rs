//! String layout and measurement.
//!
//! Walks a codepoint sequence, advancing a pen by each glyph's width plus
//! the font's character spacing, applies pairwise kerning between ASCII
//! neighbours, and emits the position at which each glyph's sprite should
//! be centred.

use crate::metrics::FontMetrics;

/// Pixel-to-world scale applied before the font's own scale factor.
pub const BASE_SCALE: f64 = 1.0 / 16.0;

/// Codepoints at or above this are drawn by the fallback rasterizer.
pub const FALLBACK_START: u32 = 128;

const SPACE: u32 = b' ' as u32;

/// Horizontal anchoring of a laid-out string relative to its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// A 2D position in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Per-font layout switches, independent of the font's metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSettings {
    pub base_scale: f64,
    pub kerning: bool,
    /// Grid that emitted x positions snap down to; 0 disables snapping.
    pub min_position_precision: f64,
    /// Advance of fallback glyphs (codepoints >= 128) in pixels.
    pub fallback_advance: i32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            base_scale: BASE_SCALE,
            kerning: true,
            min_position_precision: 0.0,
            fallback_advance: 35,
        }
    }
}

/// Draw positions for a string, one per codepoint.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    pub positions: Vec<Position>,
    /// Pen x after the last glyph, without trailing spacing.
    pub end_x: f64,
}

/// Lays out codepoint strings against one font's metrics.
#[derive(Debug, Clone, Copy)]
pub struct LayoutEngine<'a> {
    metrics: &'a FontMetrics,
    settings: &'a LayoutSettings,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(metrics: &'a FontMetrics, settings: &'a LayoutSettings) -> Self {
        Self { metrics, settings }
    }

    /// World units per sheet pixel.
    pub fn scale(&self) -> f64 {
        self.settings.base_scale * self.metrics.scale_factor()
    }

    /// Advance of `c` and the position its sprite is drawn at when the pen
    /// is at `target`.
    pub fn position_character(&self, c: u32, target: Position) -> (f64, Position) {
        let scale = self.scale();
        let m = self.metrics;
        let mut pos = target;

        if c == SPACE {
            return (f64::from(m.space_width()) * scale, pos);
        }
        if m.fixed_width() {
            return (f64::from(m.block_width()) * scale, pos);
        }

        let width = match ascii(c) {
            Some(b) => {
                pos.x -= f64::from(m.left_offset(b)) * scale;
                m.glyph_width(b)
            }
            None => self.settings.fallback_advance,
        };
        (f64::from(width) * scale, pos)
    }

    /// Width of `text`, or of its first `limit` codepoints.
    pub fn measure(&self, text: &[u32], limit: Option<usize>) -> f64 {
        let n = limit.map_or(text.len(), |l| l.min(text.len()));
        let text = &text[..n];
        let spacing = self.spacing();

        let mut width = 0.0;
        for (i, &c) in text.iter().enumerate() {
            let (advance, _) = self.position_character(c, Position::default());
            width += advance + spacing + self.kerning_after(text, i);
        }
        if !text.is_empty() {
            width -= spacing;
        }
        width
    }

    /// Position every codepoint of `text` relative to `origin`.
    pub fn layout(&self, text: &[u32], origin: Position, align: Alignment) -> Layout {
        let scale = self.scale();
        let m = self.metrics;
        let spacing = self.spacing();

        let mut x = origin.x;
        let mut y = origin.y;

        // Accent-equipped sheets carry extra headspace above the glyphs.
        if m.accents_present() {
            y += scale * f64::from(m.cell_height()) / 4.0;
        }

        match align {
            Alignment::Left => {}
            Alignment::Center => x -= self.measure(text, None) / 2.0,
            Alignment::Right => x -= self.measure(text, None),
        }

        // Sprites are drawn on their centres.
        x += scale * f64::from(m.cell_width()) / 2.0;

        let mut positions = Vec::with_capacity(text.len());
        for (i, &c) in text.iter().enumerate() {
            let (advance, mut pos) = self.position_character(c, Position::new(x, y));
            pos.x = self.quantize(pos.x);
            positions.push(pos);
            x += advance + spacing + self.kerning_after(text, i);
        }
        if !text.is_empty() {
            x -= spacing;
        }

        Layout {
            positions,
            end_x: x,
        }
    }

    fn spacing(&self) -> f64 {
        f64::from(self.metrics.char_spacing()) * self.scale()
    }

    /// Scaled kerning between `text[i]` and the codepoint after it.
    fn kerning_after(&self, text: &[u32], i: usize) -> f64 {
        if self.metrics.fixed_width() || !self.settings.kerning {
            return 0.0;
        }
        let (Some(left), Some(right)) = (
            text.get(i).copied().and_then(ascii),
            text.get(i + 1).copied().and_then(ascii),
        ) else {
            return 0.0;
        };
        self.metrics
            .kerning(left, right)
            .map_or(0.0, |offset| f64::from(offset) * self.scale())
    }

    fn quantize(&self, x: f64) -> f64 {
        let precision = self.settings.min_position_precision;
        if precision > 0.0 {
            (x / precision).floor() * precision
        } else {
            x
        }
    }
}

/// The sheet index of `c` if it is drawn from the sprite sheet.
fn ascii(c: u32) -> Option<u8> {
    (c < FALLBACK_START).then_some(c as u8)
}
