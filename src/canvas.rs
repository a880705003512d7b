//! CPU rendering backend: sprites are plain RGBA buffers and drawing
//! composites them into an [`RgbaImage`].
//!
//! Canvas coordinates follow the layout engine: one world unit per pixel,
//! x to the right, y up from the bottom edge.

use image::{Rgba, RgbaImage};
use sprite_font_core::{Alignment, Font, GlyphPainter, Position, SpriteBackend};

use crate::config::RenderConfig;

/// An uploaded glyph: white RGB plus coverage alpha, row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasSprite {
    width: usize,
    height: usize,
    rgba: Vec<u8>,
}

impl CanvasSprite {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// RGBA at (`x`, `y`), transparent outside the sprite.
    fn texel(&self, x: usize, y: usize) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0; 4];
        }
        let i = (y * self.width + x) * 4;
        self.rgba
            .get(i..i + 4)
            .map_or([0; 4], |p| [p[0], p[1], p[2], p[3]])
    }
}

/// Creates [`CanvasSprite`]s and counts them.
#[derive(Debug, Default)]
pub struct SpriteStore {
    created: usize,
}

impl SpriteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sprites created so far.
    pub fn created(&self) -> usize {
        self.created
    }
}

impl SpriteBackend for SpriteStore {
    type Sprite = CanvasSprite;

    fn create_sprite(&mut self, rgba: &[u8], width: usize, height: usize) -> CanvasSprite {
        self.created += 1;
        CanvasSprite {
            width,
            height,
            rgba: rgba.to_vec(),
        }
    }
}

/// A software render target.
pub struct Canvas {
    image: RgbaImage,
    ink: [u8; 3],
}

impl Canvas {
    /// An opaque canvas filled with `background`; glyphs are tinted `ink`.
    pub fn new(width: u32, height: u32, background: [u8; 3], ink: [u8; 3]) -> Self {
        let [r, g, b] = background;
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba([r, g, b, 0xFF])),
            ink,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Image row of world `y`, measured from the top edge.
    fn row_of(&self, y: f64) -> f64 {
        f64::from(self.image.height()) - y
    }

    /// Composite one texel's worth of ink over the pixel at (`x`, `y`).
    fn blend(&mut self, x: i64, y: i64, texel: [u8; 4], alpha: f32) {
        let coverage = f32::from(texel[3]) / 255.0 * alpha.clamp(0.0, 1.0);
        if coverage <= 0.0 {
            return;
        }
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return;
        };
        if x >= self.image.width() || y >= self.image.height() {
            return;
        }

        let Rgba(dst) = self.image.get_pixel_mut(x, y);
        for ((channel, &ink), &tint) in dst.iter_mut().zip(&self.ink).zip(&texel) {
            let src = f32::from(ink) * f32::from(tint) / 255.0;
            *channel = (src * coverage + f32::from(*channel) * (1.0 - coverage)).round() as u8;
        }
        let dst_alpha = f32::from(dst[3]) / 255.0;
        dst[3] = ((coverage + dst_alpha * (1.0 - coverage)) * 255.0).round() as u8;
    }
}

impl GlyphPainter<CanvasSprite> for Canvas {
    fn draw_sprite(&mut self, sprite: &CanvasSprite, center: Position, scale: f64) {
        if scale <= 0.0 {
            return;
        }
        let width = sprite.width as f64 * scale;
        let height = sprite.height as f64 * scale;
        let left = center.x - width / 2.0;
        let top = self.row_of(center.y) - height / 2.0;

        // Nearest sampling at each destination pixel centre.
        for py in top.floor() as i64..(top + height).ceil() as i64 {
            let sy = ((py as f64 + 0.5 - top) / scale).floor();
            if sy < 0.0 || sy >= sprite.height as f64 {
                continue;
            }
            for px in left.floor() as i64..(left + width).ceil() as i64 {
                let sx = ((px as f64 + 0.5 - left) / scale).floor();
                if sx < 0.0 || sx >= sprite.width as f64 {
                    continue;
                }
                let texel = sprite.texel(sx as usize, sy as usize);
                self.blend(px, py, texel, 1.0);
            }
        }
    }

    fn draw_fallback(&mut self, sprite: &CanvasSprite, corner: Position, width: usize, height: usize, alpha: f32) {
        let left = corner.x as i64;
        let top = self.row_of(corner.y + height as f64) as i64;
        for y in 0..height.min(sprite.height) {
            for x in 0..width.min(sprite.width) {
                self.blend(left + x as i64, top + y as i64, sprite.texel(x, y), alpha);
            }
        }
    }
}

/// Render `text` onto a canvas sized to fit it.
///
/// The font's base scale should be `config.pixel_scale` so that world units
/// are pixels.
pub fn render_preview(
    font: &Font<CanvasSprite>,
    store: &mut SpriteStore,
    text: &str,
    align: Alignment,
    config: &RenderConfig,
) -> RgbaImage {
    let padding = f64::from(config.padding);
    let scale = font.settings().base_scale * font.scale_factor();
    let line = f64::from(font.metrics().cell_height()) * scale;
    let text_width = font.measure(text, None).max(0.0);

    let width = (text_width + 2.0 * padding).ceil().max(1.0);
    let height = (line + 2.0 * padding).ceil().max(1.0);

    let x = match align {
        Alignment::Left => padding,
        Alignment::Center => width / 2.0,
        Alignment::Right => width - padding,
    };
    // Layout lifts accent sheets by a quarter cell; undo it so the whole
    // cell sits in the middle of the canvas.
    let lift = if font.metrics().accents_present() { line / 4.0 } else { 0.0 };
    let origin = Position::new(x, height / 2.0 - lift);

    let mut canvas = Canvas::new(
        width as u32,
        height as u32,
        config.effective_background(),
        config.effective_color(),
    );
    let end_x = font.draw_string(text, origin, align, store, &mut canvas);
    log::debug!("preview: {}x{} canvas, pen ended at {end_x:.1}", width, height);
    canvas.into_image()
}
