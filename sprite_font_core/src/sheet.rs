//! Sprite-sheet ingestion: slicing a 16×16 glyph grid into cells and
//! measuring each cell's ink bounding box (pseudo-kerning).
//!
//! Sheets store ink intensity as grayscale in the red channel. On load the
//! red channel becomes alpha and RGB is forced to white, so glyphs can be
//! tinted at draw time by modulating a solid colour.

use std::fmt;

use crate::error::{FontError, FontResult};

/// Glyph cells per sheet row and column.
pub const GRID: usize = 16;

/// Number of byte-indexed glyph cells in a sheet.
pub const GLYPH_COUNT: usize = GRID * GRID;

/// Alpha at or below this level is a cosmetic "tip", not ink.
///
/// Dim tips of pointed glyphs would otherwise make a glyph logically wider
/// than it looks.
pub const INK_THRESHOLD: u8 = 127;

/// Whether an alpha value counts as ink for width and kerning measurement.
#[inline]
pub fn is_ink(alpha: u8) -> bool {
    alpha > INK_THRESHOLD
}

/// A decoded RGBA sprite-sheet image (4 bytes per pixel, row-major).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetImage {
    width: usize,
    height: usize,
    rgba: Vec<u8>,
}

impl SheetImage {
    /// Wrap an RGBA buffer, checking that its length matches the dimensions.
    pub fn new(width: usize, height: usize, rgba: Vec<u8>) -> FontResult<Self> {
        let expected = width * height * 4;
        if rgba.len() != expected {
            return Err(FontError::BufferSize {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.rgba
    }
}

/// Sheet dimensions that do not divide evenly into the glyph grid.
///
/// The remainder pixels on the right and bottom edges are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryWarning {
    pub width: usize,
    pub height: usize,
    pub cell_width: usize,
    pub cell_height: usize,
}

impl fmt::Display for GeometryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sheet {}x{} is not a multiple of {GRID}; using {}x{} cells and ignoring {}x{} trailing pixels",
            self.width,
            self.height,
            self.cell_width,
            self.cell_height,
            self.width % GRID,
            self.height % GRID,
        )
    }
}

/// Horizontal spacing mode of a font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spacing {
    /// Each glyph advances by its own ink width.
    Variable,
    /// Every glyph advances by the same block width.
    Fixed { block_width: usize },
}

/// One sliced grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphCell {
    /// Every pixel in the cell has alpha 0.
    pub blank: bool,
    /// Column of the leftmost ink pixel.
    pub left_ink_offset: i32,
    /// Columns from the leftmost to the rightmost ink pixel, inclusive.
    pub ink_width: i32,
    /// Cropped RGBA pixels, kept only for non-blank cells of variable-width
    /// fonts (kerning needs them).
    pub pixels: Option<Vec<u8>>,
}

/// A sprite sheet sliced into its 256 glyph cells.
#[derive(Debug, Clone)]
pub struct GlyphSheet {
    cell_width: usize,
    cell_height: usize,
    block_width: usize,
    spacing: Spacing,
    cells: Vec<GlyphCell>,
    geometry_warning: Option<GeometryWarning>,
}

impl GlyphSheet {
    /// Slice `image` into glyph cells.
    ///
    /// `on_glyph` is called once for every non-blank cell with the cell's
    /// index and its cropped, ink-masked RGBA pixels (`cell_width` ×
    /// `cell_height`). Blank cells get no callback.
    pub fn slice<F>(image: SheetImage, spacing: Spacing, mut on_glyph: F) -> FontResult<Self>
    where
        F: FnMut(u8, &[u8], usize, usize),
    {
        let SheetImage {
            width,
            height,
            mut rgba,
        } = image;

        let cell_width = width / GRID;
        let cell_height = height / GRID;
        if cell_width == 0 || cell_height == 0 {
            return Err(FontError::SheetTooSmall { width, height });
        }

        let geometry_warning = (width % GRID != 0 || height % GRID != 0).then(|| {
            let warning = GeometryWarning {
                width,
                height,
                cell_width,
                cell_height,
            };
            log::warn!("sheet: {warning}");
            warning
        });

        ink_mask_from_red(&mut rgba);

        let block_width = match spacing {
            Spacing::Fixed { block_width } if block_width > 0 => block_width,
            _ => cell_width,
        };

        let mut cells = Vec::with_capacity(GLYPH_COUNT);
        for index in 0..GLYPH_COUNT {
            let pixels = crop_cell(&rgba, width, index, cell_width, cell_height);
            let blank = pixels.chunks_exact(4).all(|px| px[3] == 0);

            if !blank {
                on_glyph(index as u8, &pixels, cell_width, cell_height);
            }

            let (left_ink_offset, ink_width) = match spacing {
                Spacing::Fixed { .. } => (0, block_width as i32),
                Spacing::Variable if blank => (0, cell_width as i32),
                Spacing::Variable => ink_bounds(&pixels, cell_width).unwrap_or((0, cell_width as i32)),
            };

            let keep = !blank && spacing == Spacing::Variable;
            cells.push(GlyphCell {
                blank,
                left_ink_offset,
                ink_width,
                pixels: keep.then_some(pixels),
            });
        }

        log::debug!(
            "sheet: sliced {width}x{height} into {cell_width}x{cell_height} cells, {} non-blank",
            cells.iter().filter(|c| !c.blank).count()
        );

        Ok(Self {
            cell_width,
            cell_height,
            block_width,
            spacing,
            cells,
            geometry_warning,
        })
    }

    pub fn cell_width(&self) -> usize {
        self.cell_width
    }

    pub fn cell_height(&self) -> usize {
        self.cell_height
    }

    /// Advance of every glyph in fixed-width mode (cell width unless overridden).
    pub fn block_width(&self) -> usize {
        self.block_width
    }

    pub fn spacing(&self) -> Spacing {
        self.spacing
    }

    /// Cells taller than wide reserve headspace for accents above capitals.
    pub fn accents_present(&self) -> bool {
        self.cell_height != self.cell_width
    }

    pub fn geometry_warning(&self) -> Option<GeometryWarning> {
        self.geometry_warning
    }

    pub fn cell(&self, index: u8) -> &GlyphCell {
        &self.cells[index as usize]
    }

    pub fn cells(&self) -> &[GlyphCell] {
        &self.cells
    }

    /// Release the retained cell pixels once kerning no longer needs them.
    pub fn discard_pixels(&mut self) {
        for cell in &mut self.cells {
            cell.pixels = None;
        }
    }
}

/// Reinterpret the red channel as alpha and paint everything white.
fn ink_mask_from_red(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        px[3] = px[0];
        px[0] = 0xFF;
        px[1] = 0xFF;
        px[2] = 0xFF;
    }
}

/// Copy grid cell `index` (row-major) out of the full sheet.
fn crop_cell(
    rgba: &[u8],
    sheet_width: usize,
    index: usize,
    cell_width: usize,
    cell_height: usize,
) -> Vec<u8> {
    let x0 = (index % GRID) * cell_width;
    let y0 = (index / GRID) * cell_height;
    let row_bytes = cell_width * 4;

    let mut out = Vec::with_capacity(row_bytes * cell_height);
    for y in y0..y0 + cell_height {
        let start = (y * sheet_width + x0) * 4;
        out.extend_from_slice(&rgba[start..start + row_bytes]);
    }
    out
}

/// Leftmost ink column and inclusive ink width, or `None` if no pixel
/// passes the ink threshold.
fn ink_bounds(pixels: &[u8], cell_width: usize) -> Option<(i32, i32)> {
    let mut left = cell_width;
    let mut right = 0;
    let mut some_ink = false;

    for (i, px) in pixels.chunks_exact(4).enumerate() {
        if is_ink(px[3]) {
            let x = i % cell_width;
            some_ink = true;
            left = left.min(x);
            right = right.max(x);
        }
    }

    some_ink.then(|| (left as i32, (right - left + 1) as i32))
}
