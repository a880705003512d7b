//! Sprite-sheet fonts from image files, with an outline-font fallback and a
//! software renderer for previews.
//!
//! The slicing, kerning, and layout logic lives in [`sprite_font_core`];
//! this crate adds image decoding, configuration, and the CPU backend.

#![deny(unsafe_code)]

pub mod canvas;
pub mod config;
pub mod error;
pub mod loader;
pub mod rasterizer;

pub use canvas::{Canvas, CanvasSprite, SpriteStore, render_preview};
pub use config::Config;
pub use error::LoadError;
pub use loader::{load_font, load_sheet, open_fallback};
pub use rasterizer::SwashRasterizer;
pub use sprite_font_core::{Alignment, Font, FontOptions, Layout, Position};
