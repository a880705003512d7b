//! Errors raised while loading fonts, configuration, and preview output.

use std::path::PathBuf;

use sprite_font_core::FontError;

/// Failure to produce a usable font or write its output.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to decode sprite sheet {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a usable outline font", path.display())]
    FontFile { path: PathBuf },

    #[error(transparent)]
    Font(#[from] FontError),

    #[error("parse error in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
