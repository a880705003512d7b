//! Outline-font rasterizer for codepoints outside the sprite sheet.

use std::path::Path;

use sprite_font_core::{AlphaBitmap, GlyphRasterizer};
use swash::scale::{Render, ScaleContext, Source};
use swash::zeno::Format;
use swash::{CacheKey, FontRef};

use crate::error::LoadError;

/// Rasterizes glyphs from one TrueType/OpenType face at a fixed pixel size.
pub struct SwashRasterizer {
    /// Raw font file bytes; `FontRef`s borrow from here.
    bytes: Vec<u8>,
    /// Byte offset to the font table directory (from `FontRef::from_index`).
    offset: u32,
    cache_key: CacheKey,
    size: f32,
    scale_context: ScaleContext,
}

impl SwashRasterizer {
    /// Read the first face of the font file at `path`.
    pub fn open(path: &Path, pixel_size: f32) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let Some((offset, cache_key)) = FontRef::from_index(&bytes, 0).map(|fr| (fr.offset, fr.key)) else {
            return Err(LoadError::FontFile {
                path: path.to_path_buf(),
            });
        };
        log::debug!("fallback font: {} at {pixel_size}px", path.display());
        Ok(Self {
            bytes,
            offset,
            cache_key,
            size: pixel_size,
            scale_context: ScaleContext::new(),
        })
    }

    pub fn pixel_size(&self) -> f32 {
        self.size
    }

    /// Whether the face maps `ch` to a real glyph.
    pub fn covers(&self, ch: char) -> bool {
        self.font_ref().charmap().map(ch) != 0
    }

    fn font_ref(&self) -> FontRef<'_> {
        FontRef {
            data: &self.bytes,
            offset: self.offset,
            key: self.cache_key,
        }
    }
}

impl GlyphRasterizer for SwashRasterizer {
    fn rasterize(&mut self, codepoint: u32) -> Option<AlphaBitmap> {
        let ch = char::from_u32(codepoint)?;
        let fr = FontRef {
            data: &self.bytes,
            offset: self.offset,
            key: self.cache_key,
        };
        let glyph_id = fr.charmap().map(ch);
        if glyph_id == 0 {
            return None;
        }

        let mut scaler = self.scale_context.builder(fr).size(self.size).hint(true).build();
        let image = Render::new(&[Source::Outline])
            .format(Format::Alpha)
            .render(&mut scaler, glyph_id)?;

        Some(AlphaBitmap {
            width: image.placement.width as usize,
            height: image.placement.height as usize,
            data: image.data,
        })
    }
}

#[cfg(test)]
mod tests;
