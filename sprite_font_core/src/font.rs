//! The `Font` aggregate: sprites for the 256 sheet glyphs, layout metrics,
//! and a handle to the shared fallback glyph context.

use crate::backend::{GlyphPainter, SpriteBackend};
use crate::codec;
use crate::error::FontResult;
use crate::fallback::SharedFallback;
use crate::kerning;
use crate::layout::{Alignment, FALLBACK_START, Layout, LayoutEngine, LayoutSettings, Position};
use crate::metrics::{FontMetrics, SpacingConfig};
use crate::sheet::{GLYPH_COUNT, GlyphSheet, SheetImage, Spacing};

/// Load-time font parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontOptions {
    pub char_spacing: i32,
    pub space_width: i32,
    pub fixed_width: bool,
    pub scale_factor: f64,
    /// Advance of every glyph in fixed-width mode; 0 uses the cell width.
    pub fixed_char_width: usize,
    /// Alpha multiplier for fallback glyphs (faded font variants).
    pub fallback_alpha: f32,
}

impl Default for FontOptions {
    fn default() -> Self {
        let spacing = SpacingConfig::default();
        Self {
            char_spacing: spacing.char_spacing,
            space_width: spacing.space_width,
            fixed_width: false,
            scale_factor: spacing.scale_factor,
            fixed_char_width: 0,
            fallback_alpha: 1.0,
        }
    }
}

/// A sprite-sheet font.
///
/// Owns one sprite per non-blank sheet cell; dropping the font releases
/// them. Fallback glyphs live in the shared context instead.
pub struct Font<S> {
    sprites: Vec<Option<S>>,
    metrics: FontMetrics,
    settings: LayoutSettings,
    fallback: SharedFallback<S>,
    fallback_alpha: f32,
}

impl<S> Font<S> {
    /// Slice `image`, measure and kern its glyphs, and upload a sprite for
    /// every non-blank cell through `backend`.
    pub fn from_sheet<B>(
        image: SheetImage,
        options: &FontOptions,
        fallback: SharedFallback<S>,
        backend: &mut B,
    ) -> FontResult<Self>
    where
        B: SpriteBackend<Sprite = S>,
    {
        let spacing = if options.fixed_width {
            Spacing::Fixed {
                block_width: options.fixed_char_width,
            }
        } else {
            Spacing::Variable
        };

        let mut sprites: Vec<Option<S>> = std::iter::repeat_with(|| None).take(GLYPH_COUNT).collect();
        let mut sheet = GlyphSheet::slice(image, spacing, |index, pixels, width, height| {
            sprites[index as usize] = Some(backend.create_sprite(pixels, width, height));
        })?;

        let tables = kerning::solve(&sheet);
        sheet.discard_pixels();

        let metrics = FontMetrics::new(
            &sheet,
            tables,
            SpacingConfig {
                char_spacing: options.char_spacing,
                space_width: options.space_width,
                scale_factor: options.scale_factor,
            },
        );
        let settings = LayoutSettings {
            fallback_advance: fallback.borrow().metrics().advance,
            ..LayoutSettings::default()
        };

        log::debug!(
            "font: {} sprites, {}x{} cells, {}",
            sprites.iter().filter(|s| s.is_some()).count(),
            metrics.cell_width(),
            metrics.cell_height(),
            if metrics.fixed_width() { "fixed width" } else { "variable width" },
        );

        Ok(Self {
            sprites,
            metrics,
            settings,
            fallback,
            fallback_alpha: options.fallback_alpha,
        })
    }

    fn engine(&self) -> LayoutEngine<'_> {
        LayoutEngine::new(&self.metrics, &self.settings)
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    /// Sprite of sheet glyph `c`, if its cell has any visible pixels.
    pub fn sprite(&self, c: u8) -> Option<&S> {
        self.sprites[c as usize].as_ref()
    }

    pub fn fallback(&self) -> &SharedFallback<S> {
        &self.fallback
    }

    /// Width of a UTF-8 string, or of its first `char_limit` codepoints.
    pub fn measure(&self, text: &str, char_limit: Option<usize>) -> f64 {
        self.measure_codepoints(&codec::decode_string(text.as_bytes()), char_limit)
    }

    pub fn measure_codepoints(&self, text: &[u32], char_limit: Option<usize>) -> f64 {
        self.engine().measure(text, char_limit)
    }

    /// Draw positions for a UTF-8 string.
    pub fn layout(&self, text: &str, origin: Position, align: Alignment) -> Layout {
        self.layout_codepoints(&codec::decode_string(text.as_bytes()), origin, align)
    }

    pub fn layout_codepoints(&self, text: &[u32], origin: Position, align: Alignment) -> Layout {
        self.engine().layout(text, origin, align)
    }

    /// Advance of `c` and where its sprite goes when the pen is at `target`.
    pub fn position_character(&self, c: u32, target: Position) -> (f64, Position) {
        self.engine().position_character(c, target)
    }

    /// Line height in world units; accent headspace is not counted.
    pub fn height(&self) -> f64 {
        let accent_factor = if self.metrics.accents_present() { 0.5 } else { 1.0 };
        self.engine().scale() * f64::from(self.metrics.cell_height()) * accent_factor
    }

    /// Scaled spacing between consecutive glyphs.
    pub fn char_spacing(&self) -> f64 {
        f64::from(self.metrics.char_spacing()) * self.engine().scale()
    }

    pub fn scale_factor(&self) -> f64 {
        self.metrics.scale_factor()
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.metrics.set_scale_factor(scale_factor);
    }

    /// Override the world-units-per-pixel base scale (default 1/16).
    pub fn set_base_scale(&mut self, base_scale: f64) {
        self.settings.base_scale = base_scale;
    }

    pub fn kerning_enabled(&self) -> bool {
        self.settings.kerning
    }

    pub fn set_kerning_enabled(&mut self, enabled: bool) {
        self.settings.kerning = enabled;
    }

    /// Snap emitted x positions down to multiples of `precision` (0 = off).
    pub fn set_minimum_position_precision(&mut self, precision: f64) {
        self.settings.min_position_precision = precision;
    }

    /// Adopt `other`'s widths, offsets, kerning, scale and spacing while
    /// keeping this font's own sprites.
    pub fn copy_layout_from<T>(&mut self, other: &Font<T>) {
        self.metrics = other.metrics.clone();
    }

    /// Lay out and draw a UTF-8 string. Returns the pen x after the last glyph.
    pub fn draw_string<B, P>(
        &self,
        text: &str,
        origin: Position,
        align: Alignment,
        backend: &mut B,
        painter: &mut P,
    ) -> f64
    where
        B: SpriteBackend<Sprite = S>,
        P: GlyphPainter<S>,
    {
        let text = codec::decode_string(text.as_bytes());
        let layout = self.layout_codepoints(&text, origin, align);
        for (&c, &pos) in text.iter().zip(&layout.positions) {
            self.draw_glyph(c, pos, backend, painter);
        }
        layout.end_x
    }

    /// Position and draw one character with the pen at `pos`. Returns its
    /// advance.
    pub fn draw_character<B, P>(&self, c: u32, pos: Position, backend: &mut B, painter: &mut P) -> f64
    where
        B: SpriteBackend<Sprite = S>,
        P: GlyphPainter<S>,
    {
        let (advance, draw_pos) = self.position_character(c, pos);
        if c != u32::from(b' ') {
            self.draw_glyph(c, draw_pos, backend, painter);
        }
        advance
    }

    /// Draw one character's sprite centred exactly on `center`.
    pub fn draw_character_sprite<B, P>(&self, c: u32, center: Position, backend: &mut B, painter: &mut P)
    where
        B: SpriteBackend<Sprite = S>,
        P: GlyphPainter<S>,
    {
        self.draw_glyph(c, center, backend, painter);
    }

    fn draw_glyph<B, P>(&self, c: u32, center: Position, backend: &mut B, painter: &mut P)
    where
        B: SpriteBackend<Sprite = S>,
        P: GlyphPainter<S>,
    {
        if c < FALLBACK_START {
            if let Some(sprite) = self.sprite(c as u8) {
                painter.draw_sprite(sprite, center, self.engine().scale());
            }
            return;
        }

        let mut fallback = self.fallback.borrow_mut();
        let offset = f64::from(fallback.metrics().draw_offset);
        let Some(glyph) = fallback.glyph(c, backend) else {
            return;
        };
        let corner = Position::new(
            (center.x - (glyph.width / 2) as f64 + offset).trunc(),
            (center.y - (glyph.height / 2) as f64).trunc(),
        );
        painter.draw_fallback(&glyph.sprite, corner, glyph.width, glyph.height, self.fallback_alpha);
    }
}

impl<S> Drop for Font<S> {
    fn drop(&mut self) {
        log::debug!(
            "font: releasing {} glyph sprites",
            self.sprites.iter().filter(|s| s.is_some()).count()
        );
    }
}

#[cfg(test)]
mod tests;
