//! Traits at the boundary with the graphics and rasterization layers.
//!
//! The core never touches a GPU or a font file. A renderer supplies a
//! `SpriteBackend` that turns RGBA pixels into its own texture handles and
//! a `GlyphPainter` that draws them; an outline-font library supplies a
//! `GlyphRasterizer` for codepoints the sprite sheet cannot cover.

use crate::layout::Position;

/// Creates drawable sprites from RGBA pixels.
///
/// Sprites are released by dropping them, so a font releases everything it
/// created when it is dropped.
pub trait SpriteBackend {
    type Sprite;

    /// Build a sprite from `width` × `height` RGBA pixels (row-major).
    fn create_sprite(&mut self, rgba: &[u8], width: usize, height: usize) -> Self::Sprite;
}

/// Draws sprites produced by a [`SpriteBackend`].
pub trait GlyphPainter<S> {
    /// Draw a sheet glyph centred on `center`, each sheet pixel covering
    /// `scale` world units.
    fn draw_sprite(&mut self, sprite: &S, center: Position, scale: f64);

    /// Draw a fallback glyph at native pixel size with its minimum-x,
    /// minimum-y corner at `corner`, its alpha multiplied by `alpha`.
    fn draw_fallback(&mut self, sprite: &S, corner: Position, width: usize, height: usize, alpha: f32);
}

/// An 8-bit coverage bitmap produced by a rasterizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaBitmap {
    pub width: usize,
    pub height: usize,
    /// One alpha byte per pixel, row-major.
    pub data: Vec<u8>,
}

/// Renders codepoints outside the sprite sheet.
pub trait GlyphRasterizer {
    /// Rasterize `codepoint`, or `None` if the font has no glyph for it.
    fn rasterize(&mut self, codepoint: u32) -> Option<AlphaBitmap>;
}

/// A rasterizer with no font: every fallback glyph is missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRasterizer;

impl GlyphRasterizer for NoRasterizer {
    fn rasterize(&mut self, _codepoint: u32) -> Option<AlphaBitmap> {
        None
    }
}
