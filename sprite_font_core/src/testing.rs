//! Synthetic sprite sheets and recording backends for unit tests.

use std::cell::Cell;
use std::ops::RangeInclusive;
use std::rc::Rc;

use crate::backend::{AlphaBitmap, GlyphPainter, GlyphRasterizer, SpriteBackend};
use crate::layout::Position;
use crate::sheet::{GRID, SheetImage};

/// Paints glyph cells of a 16×16 grid pixel by pixel.
///
/// Ink is written into the red channel, as real sheet files store it.
pub(crate) struct SheetBuilder {
    cell_width: usize,
    cell_height: usize,
    rgba: Vec<u8>,
}

impl SheetBuilder {
    pub(crate) fn new(cell_width: usize, cell_height: usize) -> Self {
        Self {
            cell_width,
            cell_height,
            rgba: vec![0; cell_width * GRID * cell_height * GRID * 4],
        }
    }

    /// Set one pixel of `glyph`'s cell to ink intensity `red`.
    pub(crate) fn pixel(mut self, glyph: u8, x: usize, y: usize, red: u8) -> Self {
        let sheet_width = self.cell_width * GRID;
        let gx = (glyph as usize % GRID) * self.cell_width + x;
        let gy = (glyph as usize / GRID) * self.cell_height + y;
        let i = (gy * sheet_width + gx) * 4;
        self.rgba[i..i + 4].copy_from_slice(&[red, red, red, 0xFF]);
        self
    }

    /// Fill columns `xs` on rows `ys` of `glyph` with full-intensity ink.
    pub(crate) fn block(
        mut self,
        glyph: u8,
        xs: RangeInclusive<usize>,
        ys: RangeInclusive<usize>,
    ) -> Self {
        for y in ys {
            for x in xs.clone() {
                self = self.pixel(glyph, x, y, 0xFF);
            }
        }
        self
    }

    pub(crate) fn build(self) -> SheetImage {
        SheetImage::new(self.cell_width * GRID, self.cell_height * GRID, self.rgba)
            .expect("builder keeps buffer size consistent")
    }
}

/// Decrements the backend's live-sprite count when dropped.
#[derive(Debug)]
struct LiveToken(Rc<Cell<usize>>);

impl Drop for LiveToken {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

#[derive(Debug)]
pub(crate) struct TestSprite {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) rgba: Vec<u8>,
    _live: LiveToken,
}

/// Keeps pixel copies as sprites and counts how many are alive.
#[derive(Debug, Default)]
pub(crate) struct TestBackend {
    pub(crate) created: usize,
    live: Rc<Cell<usize>>,
}

impl TestBackend {
    pub(crate) fn live(&self) -> usize {
        self.live.get()
    }
}

impl SpriteBackend for TestBackend {
    type Sprite = TestSprite;

    fn create_sprite(&mut self, rgba: &[u8], width: usize, height: usize) -> TestSprite {
        self.created += 1;
        self.live.set(self.live.get() + 1);
        TestSprite {
            width,
            height,
            rgba: rgba.to_vec(),
            _live: LiveToken(Rc::clone(&self.live)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Draw {
    Sprite {
        center: Position,
        scale: f64,
    },
    Fallback {
        corner: Position,
        width: usize,
        height: usize,
        alpha: f32,
    },
}

/// Painter that records every draw call.
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    pub(crate) draws: Vec<Draw>,
}

impl GlyphPainter<TestSprite> for Recorder {
    fn draw_sprite(&mut self, _sprite: &TestSprite, center: Position, scale: f64) {
        self.draws.push(Draw::Sprite { center, scale });
    }

    fn draw_fallback(
        &mut self,
        _sprite: &TestSprite,
        corner: Position,
        width: usize,
        height: usize,
        alpha: f32,
    ) {
        self.draws.push(Draw::Fallback {
            corner,
            width,
            height,
            alpha,
        });
    }
}

/// Rasterizes every codepoint except U+2603 to a solid `size` × `size`
/// square, counting calls.
pub(crate) struct CountingRasterizer {
    pub(crate) size: usize,
    pub(crate) calls: Rc<Cell<usize>>,
}

pub(crate) const MISSING: u32 = 0x2603;

impl GlyphRasterizer for CountingRasterizer {
    fn rasterize(&mut self, codepoint: u32) -> Option<AlphaBitmap> {
        self.calls.set(self.calls.get() + 1);
        (codepoint != MISSING).then(|| AlphaBitmap {
            width: self.size,
            height: self.size,
            data: vec![200; self.size * self.size],
        })
    }
}
