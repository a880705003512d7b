//! Building fonts from files on disk.

use std::path::Path;

use sprite_font_core::{FallbackContext, Font, FontOptions, SharedFallback, SheetImage, SpriteBackend};

use crate::config::FallbackConfig;
use crate::error::LoadError;
use crate::rasterizer::SwashRasterizer;

/// Decode a PNG or TGA sheet into RGBA8.
pub fn load_sheet(path: &Path) -> Result<SheetImage, LoadError> {
    let image = image::open(path)
        .map_err(|source| LoadError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .into_rgba8();
    let (width, height) = image.dimensions();
    Ok(SheetImage::new(width as usize, height as usize, image.into_raw())?)
}

/// Load the sheet at `path` and build a font whose sprites come from `backend`.
pub fn load_font<B: SpriteBackend>(
    path: &Path,
    options: &FontOptions,
    fallback: SharedFallback<B::Sprite>,
    backend: &mut B,
) -> Result<Font<B::Sprite>, LoadError> {
    let sheet = load_sheet(path)?;
    log::info!("font: loading {} ({}x{})", path.display(), sheet.width(), sheet.height());
    Ok(Font::from_sheet(sheet, options, fallback, backend)?)
}

/// Create the fallback context described by `config`.
///
/// Without a configured outline font every fallback glyph is blank but
/// still advances the pen.
pub fn open_fallback<S>(config: &FallbackConfig, scale_factor: f64) -> Result<SharedFallback<S>, LoadError> {
    let context = match &config.font {
        Some(path) => {
            let rasterizer = SwashRasterizer::open(path, config.pixel_size(scale_factor))?;
            FallbackContext::new(Box::new(rasterizer), config.metrics())
        }
        None => {
            log::info!("fallback: no outline font configured, non-ASCII glyphs will be blank");
            FallbackContext::without_rasterizer(config.metrics())
        }
    };
    Ok(context.shared())
}
