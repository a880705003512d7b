//! Shared cache of rasterized fallback glyphs.
//!
//! Every font in a process draws non-sheet codepoints through the same
//! rasterizer and cache. The context is shared explicitly: each `Font`
//! holds a [`SharedFallback`] handle, and the cached sprites are released
//! when the last handle is dropped.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::backend::{AlphaBitmap, GlyphRasterizer, NoRasterizer, SpriteBackend};

/// Shared handle to a [`FallbackContext`].
pub type SharedFallback<S> = Rc<RefCell<FallbackContext<S>>>;

/// Placement constants for fallback glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackMetrics {
    /// Pen advance in sheet pixels.
    pub advance: i32,
    /// Horizontal draw correction in output pixels.
    pub draw_offset: i32,
}

impl Default for FallbackMetrics {
    fn default() -> Self {
        Self {
            advance: 35,
            draw_offset: -5,
        }
    }
}

/// A rasterized glyph turned into a sprite.
#[derive(Debug)]
pub struct FallbackGlyph<S> {
    pub sprite: S,
    pub width: usize,
    pub height: usize,
}

pub struct FallbackContext<S> {
    rasterizer: Box<dyn GlyphRasterizer>,
    metrics: FallbackMetrics,
    /// Misses are cached too, so a missing glyph is rasterized only once.
    cache: HashMap<u32, Option<FallbackGlyph<S>>>,
}

impl<S> FallbackContext<S> {
    pub fn new(rasterizer: Box<dyn GlyphRasterizer>, metrics: FallbackMetrics) -> Self {
        Self {
            rasterizer,
            metrics,
            cache: HashMap::new(),
        }
    }

    /// A context whose fallback glyphs are all missing.
    pub fn without_rasterizer(metrics: FallbackMetrics) -> Self {
        Self::new(Box::new(NoRasterizer), metrics)
    }

    /// Wrap the context for sharing between fonts.
    pub fn shared(self) -> SharedFallback<S> {
        Rc::new(RefCell::new(self))
    }

    pub fn metrics(&self) -> FallbackMetrics {
        self.metrics
    }

    /// Number of codepoints looked up so far, hits and misses.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// The glyph for `codepoint`, rasterizing and uploading it on first use.
    pub fn glyph<B>(&mut self, codepoint: u32, backend: &mut B) -> Option<&FallbackGlyph<S>>
    where
        B: SpriteBackend<Sprite = S>,
    {
        let rasterizer = &mut self.rasterizer;
        self.cache
            .entry(codepoint)
            .or_insert_with(|| {
                let glyph = rasterizer
                    .rasterize(codepoint)
                    .and_then(|bitmap| upload(codepoint, &bitmap, backend));
                if glyph.is_none() {
                    log::debug!("fallback: no glyph for U+{codepoint:04X}");
                }
                glyph
            })
            .as_ref()
    }
}

impl<S> Drop for FallbackContext<S> {
    fn drop(&mut self) {
        let live = self.cache.values().filter(|g| g.is_some()).count();
        log::debug!("fallback: releasing {live} cached glyphs");
    }
}

/// Convert coverage to white-with-alpha RGBA and build a sprite from it.
fn upload<B: SpriteBackend>(
    codepoint: u32,
    bitmap: &AlphaBitmap,
    backend: &mut B,
) -> Option<FallbackGlyph<B::Sprite>> {
    if bitmap.data.len() != bitmap.width * bitmap.height {
        log::warn!(
            "fallback: U+{codepoint:04X} bitmap holds {} bytes, expected {}x{}",
            bitmap.data.len(),
            bitmap.width,
            bitmap.height
        );
        return None;
    }

    let rgba: Vec<u8> = bitmap
        .data
        .iter()
        .flat_map(|&a| [0xFF, 0xFF, 0xFF, a])
        .collect();
    Some(FallbackGlyph {
        sprite: backend.create_sprite(&rgba, bitmap.width, bitmap.height),
        width: bitmap.width,
        height: bitmap.height,
    })
}
