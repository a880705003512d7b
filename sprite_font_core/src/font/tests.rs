use std::cell::Cell;
use std::rc::Rc;

use super::{Font, FontOptions};
use crate::fallback::{FallbackContext, FallbackMetrics, SharedFallback};
use crate::layout::{Alignment, Position};
use crate::sheet::SheetImage;
use crate::testing::{CountingRasterizer, Draw, MISSING, Recorder, SheetBuilder, TestBackend, TestSprite};

fn sheet() -> SheetImage {
    SheetBuilder::new(16, 16)
        .block(b'A', 2..=13, 0..=15)
        .block(b'L', 0..=1, 0..=15)
        .block(b'L', 0..=9, 14..=15)
        .block(b'o', 0..=5, 0..=5)
        .build()
}

fn no_fallback() -> SharedFallback<TestSprite> {
    FallbackContext::without_rasterizer(FallbackMetrics::default()).shared()
}

fn font_with(options: &FontOptions, fallback: SharedFallback<TestSprite>) -> (Font<TestSprite>, TestBackend) {
    let mut backend = TestBackend::default();
    let mut font = Font::from_sheet(sheet(), options, fallback, &mut backend).unwrap();
    font.set_base_scale(1.0);
    (font, backend)
}

fn font() -> (Font<TestSprite>, TestBackend) {
    font_with(&FontOptions::default(), no_fallback())
}

fn sprite_centers(draws: &[Draw]) -> Vec<f64> {
    draws
        .iter()
        .filter_map(|d| match d {
            Draw::Sprite { center, .. } => Some(center.x),
            Draw::Fallback { .. } => None,
        })
        .collect()
}

#[test]
fn sprites_only_for_non_blank_cells() {
    let (font, backend) = font();
    assert_eq!(backend.created, 3);
    assert!(font.sprite(b'A').is_some());
    assert!(font.sprite(b' ').is_none());
    assert_eq!(font.sprite(b'o').map(|s| (s.width, s.height)), Some((16, 16)));
}

#[test]
fn dropping_font_releases_sprites() {
    let (font, backend) = font();
    assert_eq!(backend.live(), 3);
    drop(font);
    assert_eq!(backend.live(), 0);
}

#[test]
fn end_to_end_single_glyph() {
    let (mut font, _) = font();
    font.set_scale_factor(3.0);
    let layout = font.layout("A", Position::default(), Alignment::Left);
    assert_eq!(layout.positions, vec![Position::new(18.0, 0.0)]);
}

#[test]
fn measure_and_limit() {
    let (font, _) = font();
    assert!(font.measure("", None).abs() < f64::EPSILON);
    assert!((font.measure("Lo", None) - 8.0).abs() < 1e-9);
    assert!((font.measure("Lo", Some(1)) - 10.0).abs() < 1e-9);
}

#[test]
fn kerning_toggle() {
    let (mut font, _) = font();
    assert!(font.kerning_enabled());
    font.set_kerning_enabled(false);
    assert!(!font.kerning_enabled());
    assert!((font.measure("Lo", None) - 16.0).abs() < 1e-9);
}

#[test]
fn precision_setting_snaps_layout() {
    let (mut font, _) = font();
    font.set_minimum_position_precision(4.0);
    let layout = font.layout("AA", Position::default(), Alignment::Left);
    let xs: Vec<f64> = layout.positions.iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![4.0, 16.0]);
}

#[test]
fn height_and_spacing_scale() {
    let options = FontOptions {
        char_spacing: 2,
        scale_factor: 2.0,
        ..FontOptions::default()
    };
    let (font, _) = font_with(&options, no_fallback());
    assert!((font.height() - 32.0).abs() < 1e-9);
    assert!((font.char_spacing() - 4.0).abs() < 1e-9);
    assert!((font.scale_factor() - 2.0).abs() < f64::EPSILON);
}

#[test]
fn accent_sheets_report_half_height() {
    let image = SheetBuilder::new(16, 32).block(b'A', 0..=3, 0..=3).build();
    let mut backend = TestBackend::default();
    let mut font = Font::from_sheet(image, &FontOptions::default(), no_fallback(), &mut backend).unwrap();
    font.set_base_scale(1.0);
    assert!((font.height() - 16.0).abs() < 1e-9);
}

#[test]
fn fixed_width_font() {
    let options = FontOptions {
        fixed_width: true,
        fixed_char_width: 10,
        ..FontOptions::default()
    };
    let (font, backend) = font_with(&options, no_fallback());
    assert_eq!(backend.created, 3);
    assert!(font.metrics().fixed_width());
    assert!((font.measure("ALo", None) - 30.0).abs() < 1e-9);
    assert!(font.metrics().kerning_table(b'L').is_none());
}

#[test]
fn copy_layout_keeps_own_sprites() {
    let (mut worn, backend) = font();
    let mut other_backend = TestBackend::default();
    let wide = SheetBuilder::new(16, 16).block(b'A', 0..=15, 0..=15).build();
    let options = FontOptions {
        char_spacing: 5,
        scale_factor: 2.0,
        ..FontOptions::default()
    };
    let normal = Font::from_sheet(wide, &options, no_fallback(), &mut other_backend).unwrap();

    worn.copy_layout_from(&normal);
    assert_eq!(worn.metrics().glyph_width(b'A'), 16);
    assert_eq!(worn.metrics().char_spacing(), 5);
    assert!((worn.scale_factor() - 2.0).abs() < f64::EPSILON);
    assert!(worn.metrics().kerning_table(b'L').is_none());
    // Sprites are untouched.
    assert!(worn.sprite(b'L').is_some());
    assert_eq!(backend.live(), 3);
}

#[test]
fn draw_string_draws_sheet_sprites_at_layout_positions() {
    let (font, mut backend) = font();
    let mut painter = Recorder::default();
    let end = font.draw_string("A Lo", Position::default(), Alignment::Left, &mut backend, &mut painter);

    // The space has no sprite, so three draws.
    assert_eq!(painter.draws.len(), 3);
    let layout = font.layout("A Lo", Position::default(), Alignment::Left);
    let expected: Vec<f64> = [0, 2, 3].iter().map(|&i| layout.positions[i].x).collect();
    assert_eq!(sprite_centers(&painter.draws), expected);
    assert!((end - layout.end_x).abs() < 1e-9);
    match &painter.draws[0] {
        Draw::Sprite { scale, .. } => assert!((scale - 1.0).abs() < f64::EPSILON),
        Draw::Fallback { .. } => panic!("expected a sheet sprite"),
    }
}

#[test]
fn fallback_glyphs_drawn_with_offset_and_alpha() {
    let calls = Rc::new(Cell::new(0));
    let rasterizer = CountingRasterizer {
        size: 7,
        calls: Rc::clone(&calls),
    };
    let fallback = FallbackContext::new(Box::new(rasterizer), FallbackMetrics::default()).shared();
    let options = FontOptions {
        fallback_alpha: 0.1,
        ..FontOptions::default()
    };
    let (font, mut backend) = font_with(&options, Rc::clone(&fallback));
    let mut painter = Recorder::default();

    font.draw_string("漢漢", Position::new(0.0, 10.0), Alignment::Left, &mut backend, &mut painter);

    assert_eq!(calls.get(), 1);
    assert_eq!(painter.draws.len(), 2);
    // Centre x = 8; 8 - 7/2 - 5 = 0. Centre y = 10; 10 - 3 = 7.
    match &painter.draws[0] {
        Draw::Fallback {
            corner,
            width,
            height,
            alpha,
        } => {
            assert_eq!(*corner, Position::new(0.0, 7.0));
            assert_eq!((*width, *height), (7, 7));
            assert!((alpha - 0.1).abs() < f32::EPSILON);
        }
        Draw::Sprite { .. } => panic!("expected a fallback glyph"),
    }
    match &painter.draws[1] {
        Draw::Fallback { corner, .. } => assert!((corner.x - 35.0).abs() < 1e-9),
        Draw::Sprite { .. } => panic!("expected a fallback glyph"),
    }
}

#[test]
fn missing_fallback_glyph_draws_nothing_but_advances() {
    let calls = Rc::new(Cell::new(0));
    let rasterizer = CountingRasterizer {
        size: 4,
        calls: Rc::clone(&calls),
    };
    let fallback = FallbackContext::new(Box::new(rasterizer), FallbackMetrics::default()).shared();
    let (font, mut backend) = font_with(&FontOptions::default(), fallback);
    let mut painter = Recorder::default();

    let text: String = [char::from_u32(MISSING).unwrap(), 'A'].iter().collect();
    let end = font.draw_string(&text, Position::default(), Alignment::Left, &mut backend, &mut painter);

    assert_eq!(painter.draws.len(), 1);
    assert_eq!(sprite_centers(&painter.draws), vec![8.0 + 35.0 - 2.0]);
    assert!((end - (8.0 + 35.0 + 12.0)).abs() < 1e-9);
}

#[test]
fn fonts_share_one_fallback_cache() {
    let calls = Rc::new(Cell::new(0));
    let rasterizer = CountingRasterizer {
        size: 4,
        calls: Rc::clone(&calls),
    };
    let fallback = FallbackContext::new(Box::new(rasterizer), FallbackMetrics::default()).shared();
    let (first, mut backend) = font_with(&FontOptions::default(), Rc::clone(&fallback));
    let (second, _) = font_with(&FontOptions::default(), Rc::clone(&fallback));
    drop(fallback);

    let mut painter = Recorder::default();
    first.draw_string("é", Position::default(), Alignment::Left, &mut backend, &mut painter);
    second.draw_string("é", Position::default(), Alignment::Left, &mut backend, &mut painter);
    assert_eq!(calls.get(), 1);
    assert_eq!(painter.draws.len(), 2);

    // First font's three sheet sprites plus the shared fallback glyph.
    assert_eq!(backend.live(), 4);
    drop(first);
    assert_eq!(backend.live(), 1);
    assert_eq!(cache_len(&second), 1);
    drop(second);
    assert_eq!(backend.live(), 0);
}

fn cache_len(font: &Font<TestSprite>) -> usize {
    font.fallback().borrow().cached_len()
}

#[test]
fn draw_character_skips_space() {
    let (font, mut backend) = font();
    let mut painter = Recorder::default();
    let advance = font.draw_character(u32::from(b' '), Position::default(), &mut backend, &mut painter);
    assert!((advance - 8.0).abs() < 1e-9);
    assert!(painter.draws.is_empty());

    let advance = font.draw_character(u32::from(b'A'), Position::new(10.0, 0.0), &mut backend, &mut painter);
    assert!((advance - 12.0).abs() < 1e-9);
    assert_eq!(sprite_centers(&painter.draws), vec![8.0]);
}

#[test]
fn draw_character_sprite_uses_exact_center() {
    let (font, mut backend) = font();
    let mut painter = Recorder::default();
    font.draw_character_sprite(u32::from(b'A'), Position::new(10.0, 0.0), &mut backend, &mut painter);
    assert_eq!(sprite_centers(&painter.draws), vec![10.0]);
}

#[test]
fn bad_buffer_is_an_error() {
    let mut backend = TestBackend::default();
    let image = SheetImage::new(8, 8, vec![0; 8 * 8 * 4]).unwrap();
    let result = Font::from_sheet(image, &FontOptions::default(), no_fallback(), &mut backend);
    assert!(result.is_err());
}
