//! Error types for sprite-sheet ingestion.

use thiserror::Error;

/// Failure to build a font from a sprite sheet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FontError {
    #[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferSize {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("sprite sheet {width}x{height} is smaller than the 16x16 glyph grid")]
    SheetTooSmall { width: usize, height: usize },
}

/// Result alias for core font operations.
pub type FontResult<T> = Result<T, FontError>;
