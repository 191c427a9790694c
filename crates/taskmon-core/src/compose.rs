//! Frame composition: rasterized graphs + chrome → styled rows.
//!
//! The composer owns the theme and produces [`StyledLine`] rows ready for
//! direct ANSI write or embedding in a host layout. Panel dimensions are
//! recomputed from the terminal size on every call, since the terminal can
//! resize between ticks.

use crate::dashboard::DashboardState;
use crate::raster::{RasterCanvas, rasterize_blocks, rasterize_braille};
use crate::sampler::SampleSnapshot;
use crate::style::{ColorRole, StyledLine, StyledSpan, Theme};
use crate::units::{format_percent, format_rate, format_uptime};

/// Smallest usable panel width.
pub const MIN_PANEL_WIDTH: u16 = 10;

/// Smallest usable quadrant height.
pub const MIN_QUADRANT_HEIGHT: u16 = 5;

/// Fixed horizontal chrome: mid gap + sidebar gap + right margin.
const SPACER_COLS: u16 = 3;

/// Fixed vertical chrome: header, tabs, hints, status, one gap row.
const CHROME_ROWS: u16 = 5;

/// Graph resolution for a composed panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphMode {
    /// 1×8 block glyphs.
    Blocks,
    /// 2×4 braille sub-cells with line interpolation.
    Dots,
}

/// Width and height of one quadrant panel given the current terminal size.
pub fn quadrant_dims(term_w: u16, term_h: u16, sidebar_w: u16, show_sidebar: bool) -> (u16, u16) {
    let sidebar = if show_sidebar { sidebar_w } else { 0 };
    let available_w = term_w.saturating_sub(sidebar + SPACER_COLS);
    let quad_w = (available_w / 2).max(MIN_PANEL_WIDTH);
    let available_h = term_h.saturating_sub(CHROME_ROWS);
    let quad_h = (available_h / 2).max(MIN_QUADRANT_HEIGHT);
    (quad_w, quad_h)
}

/// Assembles styled frames from dashboard state.
pub struct FrameComposer {
    theme: Theme,
}

impl FrameComposer {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// The one-row dashboard header.
    pub fn header(&self, hostname: &str, width: u16) -> StyledLine {
        let text = format!(" SYSTEM MONITOR - {hostname} ");
        let width = width as usize;
        let pad = width.saturating_sub(text.chars().count());
        let left = pad / 2;
        let mut line = String::with_capacity(width);
        line.push_str(&" ".repeat(left));
        line.push_str(&text);
        line.push_str(&" ".repeat(pad - left));
        StyledSpan::bold(line, ColorRole::Primary).into()
    }

    /// A bordered graph panel: title with the current value, graph body,
    /// one column of horizontal padding inside the border.
    pub fn graph_panel(
        &self,
        title: &str,
        window: &[f64],
        scale_max: f64,
        value_label: &str,
        value_role: ColorRole,
        mode: GraphMode,
        width: u16,
        height: u16,
    ) -> Vec<StyledLine> {
        let width = width.max(MIN_PANEL_WIDTH) as usize;
        let height = height.max(3) as usize;
        let inner_w = width - 4;
        let inner_h = height - 2;

        let canvas = match mode {
            GraphMode::Blocks => rasterize_blocks(window, scale_max, inner_w, inner_h),
            GraphMode::Dots => rasterize_braille(window, scale_max, inner_w, inner_h),
        };
        self.framed(title, value_label, value_role, &canvas, width, height)
    }

    fn framed(
        &self,
        title: &str,
        value_label: &str,
        value_role: ColorRole,
        canvas: &RasterCanvas,
        width: usize,
        height: usize,
    ) -> Vec<StyledLine> {
        let mut lines = Vec::with_capacity(height);

        let label = format!(" {title}: ");
        let head_used = 2 + label.chars().count() + value_label.chars().count() + 1;
        let head_fill = width.saturating_sub(head_used + 1);
        lines.push(clip_line(
            StyledLine::new(vec![
                StyledSpan::new("╭─", ColorRole::Primary),
                StyledSpan::bold(label, ColorRole::Primary),
                StyledSpan::bold(value_label.to_string(), value_role),
                StyledSpan::new(" ", ColorRole::Primary),
                StyledSpan::new(format!("{}╮", "─".repeat(head_fill)), ColorRole::Primary),
            ]),
            width,
        ));

        for row in 0..height - 2 {
            lines.push(StyledLine::new(vec![
                StyledSpan::new("│ ", ColorRole::Primary),
                StyledSpan::new(canvas.row_text(row), ColorRole::Secondary),
                StyledSpan::new(" │", ColorRole::Primary),
            ]));
        }

        lines.push(StyledLine::new(vec![StyledSpan::new(
            format!("╰{}╯", "─".repeat(width - 2)),
            ColorRole::Primary,
        )]));
        lines
    }

    /// The details sidebar: uptime and aggregate counters.
    pub fn sidebar(&self, snap: &SampleSnapshot, width: u16, height: u16) -> Vec<StyledLine> {
        let width = width.max(MIN_PANEL_WIDTH) as usize;
        let height = height.max(3) as usize;
        let inner_w = width - 4;

        let rows: [(&str, String); 4] = [
            ("Up time", format_uptime(snap.uptime_secs)),
            ("Processes", snap.process_count.to_string()),
            ("Threads", snap.thread_count.to_string()),
            ("Handles", snap.handle_count.to_string()),
        ];

        let mut body: Vec<StyledLine> = Vec::new();
        for (label, value) in rows {
            body.push(pad_line(
                StyledSpan::new(label.to_string(), ColorRole::Text),
                inner_w,
            ));
            body.push(pad_line(StyledSpan::bold(value, ColorRole::Value), inner_w));
            body.push(pad_line(StyledSpan::new(String::new(), ColorRole::Dim), inner_w));
        }
        body.truncate(height - 2);

        let mut lines = Vec::with_capacity(height);
        let title = " Details ";
        let head_fill = width.saturating_sub(2 + title.chars().count() + 1);
        lines.push(clip_line(
            StyledLine::new(vec![
                StyledSpan::new("╭─", ColorRole::Primary),
                StyledSpan::bold(title.to_string(), ColorRole::Primary),
                StyledSpan::new(format!("{}╮", "─".repeat(head_fill)), ColorRole::Primary),
            ]),
            width,
        ));
        for row in 0..height - 2 {
            let mut spans = vec![StyledSpan::new("│ ", ColorRole::Primary)];
            match body.get(row) {
                Some(line) => spans.extend(line.spans.iter().cloned()),
                None => spans.push(StyledSpan::new(" ".repeat(inner_w), ColorRole::Dim)),
            }
            spans.push(StyledSpan::new(" │", ColorRole::Primary));
            lines.push(StyledLine::new(spans));
        }
        lines.push(StyledLine::new(vec![StyledSpan::new(
            format!("╰{}╯", "─".repeat(width - 2)),
            ColorRole::Primary,
        )]));
        lines
    }

    /// The full performance view: a 2×2 quadrant of CPU/RAM/GPU/Network
    /// graphs, with the network quadrant split into stacked download and
    /// upload halves, plus the sidebar in full mode.
    pub fn performance_frame(
        &self,
        state: &DashboardState,
        term_w: u16,
        term_h: u16,
    ) -> Vec<StyledLine> {
        let mode = state.current_mode();
        let bp = state.blueprints.get(mode);
        let show_sidebar = mode.shows_sidebar();
        let (quad_w, quad_h) = quadrant_dims(term_w, term_h, bp.sidebar_width, show_sidebar);

        let hist = state.histories();
        let window_len = (quad_w.max(MIN_PANEL_WIDTH) as usize - 4) * 2;

        let percent_panel = |title: &str, buffer: &crate::history::HistoryBuffer| {
            self.graph_panel(
                title,
                &buffer.window(window_len),
                crate::raster::PERCENT_CEILING,
                &format_percent(buffer.latest()),
                ColorRole::Secondary,
                GraphMode::Dots,
                quad_w,
                quad_h,
            )
        };

        let cpu = percent_panel("CPU", &hist.cpu);
        let ram = percent_panel("RAM", &hist.ram);
        let gpu = percent_panel("GPU", &hist.gpu);

        let down_h = quad_h / 2;
        let up_h = quad_h - down_h;
        let mut network = self.graph_panel(
            "Download Speed",
            &hist.down.window(window_len),
            state.down_ceiling(),
            &format_rate(hist.down.latest()),
            ColorRole::Value,
            GraphMode::Dots,
            quad_w,
            down_h,
        );
        network.extend(self.graph_panel(
            "Upload Speed",
            &hist.up.window(window_len),
            state.up_ceiling(),
            &format_rate(hist.up.latest()),
            ColorRole::Value,
            GraphMode::Dots,
            quad_w,
            up_h,
        ));

        let top = hjoin(&[cpu, ram], bp.mid_gap as usize);
        let bottom = hjoin(&[gpu, network], bp.mid_gap as usize);
        let mut grid = top;
        grid.extend(bottom);

        if show_sidebar {
            let sidebar = self.sidebar(state.latest(), bp.sidebar_width, quad_h * 2);
            grid = hjoin(&[grid, sidebar], 1);
        }
        grid
    }

    /// Serialize composed rows for direct terminal write.
    pub fn to_ansi(&self, lines: &[StyledLine]) -> String {
        let mut out = String::new();
        for line in lines {
            out.push_str(&line.to_ansi(&self.theme));
            out.push('\n');
        }
        out
    }
}

impl Default for FrameComposer {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

fn pad_line(mut span: StyledSpan, width: usize) -> StyledLine {
    let mut used = span.text.chars().count();
    if used > width {
        span.text = span.text.chars().take(width).collect();
        used = width;
    }
    let mut spans = vec![span];
    if used < width {
        spans.push(StyledSpan::new(" ".repeat(width - used), ColorRole::Dim));
    }
    StyledLine::new(spans)
}

/// Truncate a row to `width` cells, preserving span styling.
fn clip_line(line: StyledLine, width: usize) -> StyledLine {
    if line.width() <= width {
        return line;
    }
    let mut spans = Vec::with_capacity(line.spans.len());
    let mut used = 0;
    for mut span in line.spans {
        let len = span.text.chars().count();
        if used + len <= width {
            used += len;
            spans.push(span);
        } else {
            let take = width - used;
            if take > 0 {
                span.text = span.text.chars().take(take).collect();
                spans.push(span);
            }
            break;
        }
    }
    StyledLine::new(spans)
}

/// Join column blocks side by side, padding short columns with blanks.
fn hjoin(columns: &[Vec<StyledLine>], gap: usize) -> Vec<StyledLine> {
    let rows = columns.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = columns
        .iter()
        .map(|c| c.iter().map(StyledLine::width).max().unwrap_or(0))
        .collect();

    let mut out = Vec::with_capacity(rows);
    for row in 0..rows {
        let mut spans = Vec::new();
        for (i, column) in columns.iter().enumerate() {
            if i > 0 && gap > 0 {
                spans.push(StyledSpan::new(" ".repeat(gap), ColorRole::Dim));
            }
            match column.get(row) {
                Some(line) => spans.extend(line.spans.iter().cloned()),
                None => spans.push(StyledSpan::new(" ".repeat(widths[i]), ColorRole::Dim)),
            }
        }
        out.push(StyledLine::new(spans));
    }
    out
}
