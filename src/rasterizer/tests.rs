use std::path::PathBuf;

use super::*;

/// First readable system font, if the machine has one.
fn system_font() -> Option<PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/Library/Fonts/Arial Unicode.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .find(|p| p.is_file())
}

#[test]
fn missing_file_is_io_error() {
    let path = std::env::temp_dir().join("sprite_font_no_such_font.ttf");
    let err = SwashRasterizer::open(&path, 16.0).err().expect("open should fail");
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn garbage_bytes_are_rejected() {
    let path = std::env::temp_dir().join(format!("sprite_font_garbage_{}.ttf", std::process::id()));
    std::fs::write(&path, b"definitely not a font").expect("write");
    let err = SwashRasterizer::open(&path, 16.0).err().expect("open should fail");
    let _ = std::fs::remove_file(&path);
    assert!(matches!(err, LoadError::FontFile { .. }));
}

#[test]
fn rasterizes_covered_glyphs() {
    let Some(path) = system_font() else {
        return;
    };
    let mut rasterizer = SwashRasterizer::open(&path, 24.0).expect("system font");
    assert!((rasterizer.pixel_size() - 24.0).abs() < f32::EPSILON);
    assert!(rasterizer.covers('A'));

    let bitmap = rasterizer.rasterize(u32::from('A')).expect("glyph for A");
    assert!(bitmap.width > 0 && bitmap.height > 0);
    assert_eq!(bitmap.data.len(), bitmap.width * bitmap.height);
    assert!(bitmap.data.iter().any(|&a| a > 0));
}

#[test]
fn surrogates_and_unmapped_codepoints_miss() {
    let Some(path) = system_font() else {
        return;
    };
    let mut rasterizer = SwashRasterizer::open(&path, 24.0).expect("system font");
    assert!(rasterizer.rasterize(0xD800).is_none());
    // Private use area is unmapped in common system fonts.
    assert!(rasterizer.rasterize(0x10_FFFD).is_none());
}
