//! Configuration structures and loading logic.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sprite_font_core::{Alignment, BASE_SCALE, FallbackMetrics, Font, FontOptions};

use crate::error::LoadError;

/// Top-level configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub font: FontConfig,
    pub fallback: FallbackConfig,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

/// Sprite-sheet font parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Sheet image (PNG or TGA). The CLI's positional argument overrides it.
    pub path: Option<PathBuf>,
    pub char_spacing: i32,
    pub space_width: i32,
    pub fixed_width: bool,
    pub scale_factor: f64,
    /// Fixed-width advance in pixels; 0 uses the cell width.
    pub fixed_char_width: usize,
    /// Alpha multiplier for fallback glyphs, 0.0–1.0.
    pub fallback_alpha: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        let options = FontOptions::default();
        Self {
            path: None,
            char_spacing: options.char_spacing,
            space_width: options.space_width,
            fixed_width: options.fixed_width,
            scale_factor: options.scale_factor,
            fixed_char_width: options.fixed_char_width,
            fallback_alpha: options.fallback_alpha,
        }
    }
}

impl FontConfig {
    /// Load-time options for [`Font::from_sheet`].
    pub fn options(&self) -> FontOptions {
        FontOptions {
            char_spacing: self.char_spacing,
            space_width: self.space_width,
            fixed_width: self.fixed_width,
            scale_factor: self.scale_factor,
            fixed_char_width: self.fixed_char_width,
            fallback_alpha: self.fallback_alpha.clamp(0.0, 1.0),
        }
    }
}

/// Outline font used for codepoints the sheet cannot draw.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// TrueType/OpenType file. Without one, fallback glyphs are blank.
    pub font: Option<PathBuf>,
    /// Rasterizer pixel size per unit of font scale factor.
    pub scale: f64,
    pub advance: i32,
    /// Horizontal nudge applied when drawing a fallback glyph.
    pub offset: i32,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        let metrics = FallbackMetrics::default();
        Self {
            font: None,
            scale: 1.5,
            advance: metrics.advance,
            offset: metrics.draw_offset,
        }
    }
}

impl FallbackConfig {
    pub fn metrics(&self) -> FallbackMetrics {
        FallbackMetrics {
            advance: self.advance,
            draw_offset: self.offset,
        }
    }

    /// Rasterizer pixel size for a font with the given scale factor.
    pub fn pixel_size(&self, scale_factor: f64) -> f32 {
        (scale_factor * self.scale) as f32
    }
}

/// Layout switches applied to a loaded font.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub base_scale: f64,
    pub kerning: bool,
    pub min_position_precision: f64,
    /// `left`, `center`, or `right`.
    pub align: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_scale: BASE_SCALE,
            kerning: true,
            min_position_precision: 0.0,
            align: "left".to_owned(),
        }
    }
}

impl LayoutConfig {
    pub fn alignment(&self) -> Alignment {
        parse_alignment(&self.align)
    }

    /// Push these settings onto `font`.
    pub fn apply<S>(&self, font: &mut Font<S>) {
        font.set_base_scale(self.base_scale);
        font.set_kerning_enabled(self.kerning);
        font.set_minimum_position_precision(self.min_position_precision);
    }
}

/// Software preview output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Ink color as "#RRGGBB" hex.
    pub color: String,
    /// Canvas color as "#RRGGBB" hex.
    pub background: String,
    pub padding: u32,
    /// Base scale used for previews, where one world unit is one pixel.
    pub pixel_scale: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            color: "#FFFFFF".to_owned(),
            background: "#000000".to_owned(),
            padding: 8,
            pixel_scale: 1.0,
        }
    }
}

impl RenderConfig {
    /// Ink color, white when `color` doesn't parse.
    pub fn effective_color(&self) -> [u8; 3] {
        parse_hex_color(&self.color).unwrap_or([0xFF; 3])
    }

    /// Canvas color, black when `background` doesn't parse.
    pub fn effective_background(&self) -> [u8; 3] {
        parse_hex_color(&self.background).unwrap_or([0; 3])
    }
}

/// Return the platform-specific configuration directory for `sprite_font`.
pub fn config_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("sprite_font");
        }
        PathBuf::from(".").join("sprite_font")
    }
    #[cfg(not(target_os = "windows"))]
    {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("sprite_font");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".config").join("sprite_font");
        }
        PathBuf::from(".").join("sprite_font")
    }
}

/// Return the path to the config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Parse an alignment name. Accepts "left", "center"/"centre", "right".
/// Defaults to Left.
pub fn parse_alignment(s: &str) -> Alignment {
    match s.to_ascii_lowercase().as_str() {
        "center" | "centre" => Alignment::Center,
        "right" => Alignment::Right,
        _ => Alignment::Left,
    }
}

/// Parse "#RRGGBB" or "#RGB". Returns None on invalid input.
pub fn parse_hex_color(s: &str) -> Option<[u8; 3]> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    match hex.len() {
        6 => Some([channel(0..2)?, channel(2..4)?, channel(4..6)?]),
        3 => Some([channel(0..1)? * 17, channel(1..2)? * 17, channel(2..3)? * 17]),
        _ => None,
    }
}

impl Config {
    /// Load config from `path`. Returns defaults if the file doesn't exist
    /// or can't be parsed.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(cfg) => {
                log::info!("config: loaded from {}", path.display());
                cfg
            }
            Err(LoadError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("config: {} not found, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("config: {e}");
                Self::default()
            }
        }
    }

    /// Load config from `path`, keeping the distinction between a missing
    /// file and a parse error.
    pub fn try_load(path: &Path) -> Result<Self, LoadError> {
        let data = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&data).map_err(|source| LoadError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
