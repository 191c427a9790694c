//! Graph rasterization: numeric series → glyph grid.
//!
//! Two resolutions are supported:
//! - **Block mode**: one data column per character cell, 8 vertical levels
//!   per cell via the U+2581..U+2588 partial-block glyphs.
//! - **Dot mode**: braille-style 2×4 sub-cell addressing with line
//!   interpolation between consecutive points, so the trace reads as a
//!   continuous curve rather than a scatter.
//!
//! Percentage metrics rasterize against a fixed ceiling of 100; rate metrics
//! use [`AutoScale`], which grows to the observed peak immediately and decays
//! multiplicatively while traffic is quiet so bursty graphs stay legible.

use bitflags::bitflags;

/// Fixed ceiling for percentage metrics.
pub const PERCENT_CEILING: f64 = 100.0;

/// Default auto-scale baseline: 1 MiB/s.
pub const DEFAULT_RATE_FLOOR: f64 = 1024.0 * 1024.0;

/// Per-tick multiplicative decay applied while no new peak is observed.
pub const AUTO_SCALE_DECAY: f64 = 0.99;

/// Fill glyphs indexed by eighths: empty, 1/8 .. 7/8, full.
pub const BLOCK_GLYPHS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

bitflags! {
    /// Dot positions of one braille cell, named by sub-cell quadrant.
    ///
    /// Columns are `LEFT`/`RIGHT`, rows are numbered 1 (top) to 4 (bottom).
    /// The bit values match the Unicode braille dot encoding, but callers
    /// never touch codepoints directly; `glyph()` goes through a table.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DotMask: u8 {
        const LEFT_1 = 0x01;
        const LEFT_2 = 0x02;
        const LEFT_3 = 0x04;
        const LEFT_4 = 0x40;
        const RIGHT_1 = 0x08;
        const RIGHT_2 = 0x10;
        const RIGHT_3 = 0x20;
        const RIGHT_4 = 0x80;
    }
}

const LEFT_COLUMN: [DotMask; 4] = [
    DotMask::LEFT_1,
    DotMask::LEFT_2,
    DotMask::LEFT_3,
    DotMask::LEFT_4,
];

const RIGHT_COLUMN: [DotMask; 4] = [
    DotMask::RIGHT_1,
    DotMask::RIGHT_2,
    DotMask::RIGHT_3,
    DotMask::RIGHT_4,
];

const fn build_braille_table() -> [char; 256] {
    let mut table = [' '; 256];
    let mut i = 0usize;
    while i < 256 {
        table[i] = match char::from_u32(0x2800 + i as u32) {
            Some(c) => c,
            None => ' ',
        };
        i += 1;
    }
    table
}

/// All 256 braille glyphs, indexed by dot mask bits.
static BRAILLE_GLYPHS: [char; 256] = build_braille_table();

impl DotMask {
    /// Dot for a sub-cell position: `sub_x` in 0..2, `sub_y` in 0..4 (top = 0).
    pub fn at(sub_x: usize, sub_y: usize) -> Self {
        debug_assert!(sub_x < 2 && sub_y < 4);
        if sub_x == 0 {
            LEFT_COLUMN[sub_y]
        } else {
            RIGHT_COLUMN[sub_y]
        }
    }

    /// Display glyph for this mask. An empty mask is the blank braille cell.
    pub fn glyph(self) -> char {
        BRAILLE_GLYPHS[self.bits() as usize]
    }
}

/// A cols×rows grid of glyphs, built fresh each render.
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    cols: usize,
    rows: usize,
    glyphs: Vec<char>,
}

impl RasterCanvas {
    fn blank(cols: usize, rows: usize, fill: char) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            glyphs: vec![fill; cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn glyph(&self, col: usize, row: usize) -> char {
        self.glyphs[row * self.cols + col]
    }

    fn set(&mut self, col: usize, row: usize, glyph: char) {
        self.glyphs[row * self.cols + col] = glyph;
    }

    /// One rendered row as a string.
    pub fn row_text(&self, row: usize) -> String {
        self.glyphs[row * self.cols..(row + 1) * self.cols]
            .iter()
            .collect()
    }
}

/// Adaptive scale ceiling for unbounded rate metrics.
///
/// Grows immediately to any new peak; decays ×[`AUTO_SCALE_DECAY`] per tick
/// toward the current window peak otherwise, never dropping below that peak
/// within one step, and never below the floor baseline.
#[derive(Debug, Clone)]
pub struct AutoScale {
    ceiling: f64,
    floor: f64,
}

impl AutoScale {
    pub fn new(floor: f64) -> Self {
        let floor = if floor > 0.0 { floor } else { 1.0 };
        Self {
            ceiling: floor,
            floor,
        }
    }

    /// Feed this tick's window peak; returns the ceiling to rasterize with.
    pub fn observe(&mut self, window_peak: f64) -> f64 {
        let peak = window_peak.max(0.0);
        if peak > self.ceiling {
            self.ceiling = peak;
        } else {
            self.ceiling = (self.ceiling * AUTO_SCALE_DECAY).max(peak).max(self.floor);
        }
        self.ceiling
    }

    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }
}

impl Default for AutoScale {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_FLOOR)
    }
}

fn sanitize_scale(scale_max: f64) -> f64 {
    if scale_max > 0.0 { scale_max } else { 1.0 }
}

/// Rasterize at block resolution: one data point per column, 8 levels/cell.
///
/// A series shorter than `cols` is drawn right-aligned, newest at the right
/// edge; the leftmost columns stay empty.
pub fn rasterize_blocks(window: &[f64], scale_max: f64, cols: usize, rows: usize) -> RasterCanvas {
    let mut canvas = RasterCanvas::blank(cols, rows, ' ');
    let (cols, rows) = (canvas.cols(), canvas.rows());
    let scale_max = sanitize_scale(scale_max);

    let data = tail(window, cols);
    let offset = cols - data.len();

    for (i, &value) in data.iter().enumerate() {
        let clamped = value.max(0.0).min(scale_max);
        let eighths = ((clamped / scale_max) * (rows * 8) as f64).floor() as usize;
        for row in 0..rows {
            let row_base = (rows - 1 - row) * 8;
            let glyph = if eighths >= row_base + 8 {
                BLOCK_GLYPHS[8]
            } else if eighths > row_base {
                BLOCK_GLYPHS[eighths - row_base]
            } else {
                continue;
            };
            canvas.set(offset + i, row, glyph);
        }
    }
    canvas
}

/// Rasterize at braille resolution: 2 sub-columns × 4 sub-rows per cell.
///
/// Each point maps to one vertical pixel; consecutive points differing in
/// height are joined by an inclusive vertical run.
pub fn rasterize_braille(window: &[f64], scale_max: f64, cols: usize, rows: usize) -> RasterCanvas {
    let cols = cols.max(1);
    let rows = rows.max(1);
    let scale_max = sanitize_scale(scale_max);

    let pixel_width = cols * 2;
    let pixel_height = rows * 4;
    let mut masks = vec![DotMask::empty(); cols * rows];

    let mut set_pixel = |x: usize, y: usize| {
        if x >= pixel_width || y >= pixel_height {
            return;
        }
        let idx = (y / 4) * cols + x / 2;
        masks[idx] |= DotMask::at(x % 2, y % 4);
    };

    let data = tail(window, pixel_width);
    let offset = pixel_width - data.len();

    let mut prev_y: Option<usize> = None;
    for (i, &value) in data.iter().enumerate() {
        let x = offset + i;
        let clamped = value.max(0.0).min(scale_max);
        let ratio = clamped / scale_max;
        let y = ((1.0 - ratio) * (pixel_height - 1) as f64).round() as usize;
        match prev_y {
            Some(prev) => {
                let (lo, hi) = if prev <= y { (prev, y) } else { (y, prev) };
                for run_y in lo..=hi {
                    set_pixel(x, run_y);
                }
            }
            None => set_pixel(x, y),
        }
        prev_y = Some(y);
    }

    let mut canvas = RasterCanvas::blank(cols, rows, BRAILLE_GLYPHS[0]);
    for row in 0..rows {
        for col in 0..cols {
            canvas.set(col, row, masks[row * cols + col].glyph());
        }
    }
    canvas
}

fn tail(window: &[f64], max_len: usize) -> &[f64] {
    if window.len() > max_len {
        &window[window.len() - max_len..]
    } else {
        window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_eighths(canvas: &RasterCanvas, col: usize) -> usize {
        (0..canvas.rows())
            .map(|row| {
                let glyph = canvas.glyph(col, row);
                BLOCK_GLYPHS.iter().position(|&g| g == glyph).unwrap()
            })
            .sum()
    }

    #[test]
    fn block_full_value_fills_every_row() {
        let canvas = rasterize_blocks(&[100.0], 100.0, 1, 4);
        for row in 0..4 {
            assert_eq!(canvas.glyph(0, row), '█', "row {row} not full");
        }
    }

    #[test]
    fn block_zero_value_is_all_empty() {
        let canvas = rasterize_blocks(&[0.0], 100.0, 1, 4);
        for row in 0..4 {
            assert_eq!(canvas.glyph(0, row), ' ');
        }
    }

    #[test]
    fn block_half_value_fills_half_the_eighths() {
        let canvas = rasterize_blocks(&[50.0], 100.0, 1, 4);
        assert_eq!(filled_eighths(&canvas, 0), 16);
        // Bottom two rows full, top two empty.
        assert_eq!(canvas.glyph(0, 2), '█');
        assert_eq!(canvas.glyph(0, 3), '█');
        assert_eq!(canvas.glyph(0, 0), ' ');
        assert_eq!(canvas.glyph(0, 1), ' ');
    }

    #[test]
    fn block_exact_row_boundary_renders_full_not_partial() {
        // 25% of 4 rows = 8 eighths = exactly the bottom row's top edge.
        let canvas = rasterize_blocks(&[25.0], 100.0, 1, 4);
        assert_eq!(canvas.glyph(0, 3), '█');
        assert_eq!(canvas.glyph(0, 2), ' ');
    }

    #[test]
    fn block_partial_row_uses_remainder_glyph() {
        // 3/32 of the column: bottom row gets the 3/8 glyph.
        let value = 3.0 / 32.0 * 100.0;
        let canvas = rasterize_blocks(&[value], 100.0, 1, 4);
        assert_eq!(canvas.glyph(0, 3), '▃');
        assert_eq!(canvas.glyph(0, 2), ' ');
    }

    #[test]
    fn block_short_series_is_right_aligned() {
        let canvas = rasterize_blocks(&[100.0], 100.0, 3, 2);
        assert_eq!(canvas.glyph(0, 1), ' ');
        assert_eq!(canvas.glyph(1, 1), ' ');
        assert_eq!(canvas.glyph(2, 1), '█');
    }

    #[test]
    fn block_values_above_scale_are_clamped() {
        let canvas = rasterize_blocks(&[250.0], 100.0, 1, 2);
        assert_eq!(filled_eighths(&canvas, 0), 16);
    }

    #[test]
    fn block_zero_scale_substitutes_one() {
        // All-zero series with a zero ceiling must not divide by zero.
        let canvas = rasterize_blocks(&[0.0, 0.0], 0.0, 2, 2);
        assert_eq!(filled_eighths(&canvas, 0), 0);
        assert_eq!(filled_eighths(&canvas, 1), 0);
    }

    #[test]
    fn dot_mask_positions_match_braille_encoding() {
        assert_eq!(DotMask::at(0, 0), DotMask::LEFT_1);
        assert_eq!(DotMask::at(0, 3), DotMask::LEFT_4);
        assert_eq!(DotMask::at(1, 0), DotMask::RIGHT_1);
        assert_eq!(DotMask::at(1, 3), DotMask::RIGHT_4);
    }

    #[test]
    fn dot_mask_glyph_table_round_trips() {
        assert_eq!(DotMask::empty().glyph(), '\u{2800}');
        assert_eq!(DotMask::all().glyph(), '\u{28FF}');
        assert_eq!(DotMask::LEFT_1.glyph(), '\u{2801}');
        assert_eq!((DotMask::LEFT_1 | DotMask::RIGHT_1).glyph(), '\u{2809}');
    }

    #[test]
    fn braille_flat_zero_series_sits_on_the_bottom() {
        let canvas = rasterize_braille(&[0.0, 0.0, 0.0, 0.0], 100.0, 2, 1);
        // Every pixel column carries exactly the bottom dot.
        let expected = (DotMask::LEFT_4 | DotMask::RIGHT_4).glyph();
        assert_eq!(canvas.glyph(0, 0), expected);
        assert_eq!(canvas.glyph(1, 0), expected);
    }

    #[test]
    fn braille_max_value_sets_top_pixel() {
        let canvas = rasterize_braille(&[100.0], 100.0, 1, 1);
        // Single point, right-aligned: x = 1, y = 0 → RIGHT_1.
        assert_eq!(canvas.glyph(0, 0), DotMask::RIGHT_1.glyph());
    }

    #[test]
    fn braille_connects_consecutive_points_vertically() {
        // Jump from 0 to 100 across one cell: the second pixel column must
        // carry a full vertical run, not a single dot.
        let canvas = rasterize_braille(&[0.0, 100.0], 100.0, 1, 1);
        let expected = DotMask::LEFT_4
            | DotMask::RIGHT_1
            | DotMask::RIGHT_2
            | DotMask::RIGHT_3
            | DotMask::RIGHT_4;
        assert_eq!(canvas.glyph(0, 0), expected.glyph());
    }

    #[test]
    fn braille_empty_series_renders_blank_cells() {
        let canvas = rasterize_braille(&[], 100.0, 2, 2);
        for row in 0..2 {
            for col in 0..2 {
                assert_eq!(canvas.glyph(col, row), '\u{2800}');
            }
        }
    }

    #[test]
    fn auto_scale_grows_immediately_on_spike() {
        let mut scale = AutoScale::new(1.0);
        assert_eq!(scale.observe(0.0), 1.0);
        assert_eq!(scale.observe(2048.0), 2048.0);
    }

    #[test]
    fn auto_scale_decays_toward_trailing_peak() {
        let mut scale = AutoScale::new(1.0);
        scale.observe(2048.0);
        let after_one = scale.observe(0.0);
        assert!((after_one - 2048.0 * AUTO_SCALE_DECAY).abs() < 1e-9);
        let after_two = scale.observe(0.0);
        assert!(after_two < after_one);
        assert!(after_two >= 1.0);
    }

    #[test]
    fn auto_scale_never_drops_below_window_peak_in_one_step() {
        let mut scale = AutoScale::new(1.0);
        scale.observe(1000.0);
        // Peak still present in the window: decay must not undercut it.
        let ceiling = scale.observe(1000.0 * AUTO_SCALE_DECAY + 5.0);
        assert!(ceiling >= 1000.0 * AUTO_SCALE_DECAY + 5.0);
    }

    #[test]
    fn auto_scale_respects_floor() {
        let mut scale = AutoScale::new(512.0);
        for _ in 0..10_000 {
            scale.observe(0.0);
        }
        assert_eq!(scale.ceiling(), 512.0);
    }

    #[test]
    fn auto_scale_zero_floor_substitutes_one() {
        let scale = AutoScale::new(0.0);
        assert_eq!(scale.ceiling(), 1.0);
    }
}
