//! Sprite-sheet bitmap fonts: slicing, auto-kerning, and text layout.
//!
//! A font image is a 16×16 grid of glyph cells indexed by byte value. This
//! crate slices the grid, measures each glyph's ink, derives pairwise
//! kerning from the pixels, and lays out strings into draw positions. It
//! contains no GPU, image-decoding, or font-file code; those plug in
//! through the traits in [`backend`].

#![deny(unsafe_code)]

pub mod backend;
pub mod codec;
pub mod error;
pub mod fallback;
pub mod font;
pub mod kerning;
pub mod layout;
pub mod metrics;
pub mod sheet;

#[cfg(test)]
mod testing;

pub use backend::{AlphaBitmap, GlyphPainter, GlyphRasterizer, NoRasterizer, SpriteBackend};
pub use error::{FontError, FontResult};
pub use fallback::{FallbackContext, FallbackGlyph, FallbackMetrics, SharedFallback};
pub use font::{Font, FontOptions};
pub use layout::{Alignment, BASE_SCALE, Layout, LayoutSettings, Position};
pub use sheet::{GeometryWarning, SheetImage};
