//! Dashboard state: tabs, selection, mode transitions, metric histories.
//!
//! Everything here is mutated only from the UI-owning context. The sampling
//! worker hands immutable snapshots across a channel; [`DashboardState`]
//! applies them. No locks, no ambient globals.

use log::debug;

use crate::blueprint::{BlueprintSet, LayoutMode};
use crate::history::HistoryBuffer;
use crate::raster::{AutoScale, DEFAULT_RATE_FLOOR};
use crate::sampler::{ProcessRecord, SampleSnapshot, StartupEntry};

/// The three dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Processes,
    Performance,
    Startup,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Processes, Tab::Performance, Tab::Startup];

    pub fn label(self) -> &'static str {
        match self {
            Self::Processes => "Processes",
            Self::Performance => "Performance",
            Self::Startup => "Startup",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Processes => 0,
            Self::Performance => 1,
            Self::Startup => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Cursor into a row list, with the scroll offset that keeps it visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionCursor {
    index: usize,
    offset: usize,
}

impl SelectionCursor {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Move the selection, clamped to `[0, row_count-1]`; out-of-range moves
    /// leave the selection unchanged at the boundary.
    pub fn move_by(&mut self, delta: isize, row_count: usize) {
        if row_count == 0 {
            self.reset();
            return;
        }
        let max = (row_count - 1) as isize;
        self.index = (self.index as isize + delta).clamp(0, max) as usize;
    }

    /// Clamp after the row list shrank underneath the cursor. The scroll
    /// offset follows so the visible slice never starts past the end.
    pub fn clamp(&mut self, row_count: usize) {
        if row_count == 0 {
            self.reset();
            return;
        }
        if self.index > row_count - 1 {
            self.index = row_count - 1;
        }
        self.offset = self.offset.min(self.index);
    }

    /// Adjust the scroll offset so the selection stays inside the window:
    /// scroll up when it moved above, down when it moved past the page.
    pub fn ensure_visible(&mut self, page_size: usize) {
        if page_size == 0 {
            return;
        }
        if self.index < self.offset {
            self.offset = self.index;
        } else if self.index >= self.offset + page_size {
            self.offset = self.index - page_size + 1;
        }
    }
}

/// Detects layout-mode transition edges.
///
/// Mode selection itself is pure and recomputed every tick; the tracker
/// answers "did it just change?" so the forced full redraw happens exactly
/// once per transition instead of every tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModeTracker {
    current: LayoutMode,
}

impl ModeTracker {
    pub fn current(&self) -> LayoutMode {
        self.current
    }

    /// Record the newly selected mode; true exactly on transition edges.
    pub fn update(&mut self, mode: LayoutMode) -> bool {
        if mode == self.current {
            return false;
        }
        debug!("layout mode {} -> {}", self.current.label(), mode.label());
        self.current = mode;
        true
    }
}

/// History buffers for the five graphed metrics.
#[derive(Debug, Clone, Default)]
pub struct MetricHistories {
    pub cpu: HistoryBuffer,
    pub ram: HistoryBuffer,
    pub gpu: HistoryBuffer,
    pub down: HistoryBuffer,
    pub up: HistoryBuffer,
}

impl MetricHistories {
    fn apply(&mut self, snap: &SampleSnapshot) {
        self.cpu.push(snap.cpu_pct);
        self.ram.push(snap.ram_pct);
        self.gpu.push(snap.gpu_pct);
        self.down.push(snap.down_rate);
        self.up.push(snap.up_rate);
    }
}

/// Result of feeding the current terminal width into the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeChange {
    pub mode: LayoutMode,
    /// True exactly on the tick the mode flipped; force a full clear then.
    pub changed: bool,
}

/// Whole-dashboard state owned by the UI context.
pub struct DashboardState {
    pub blueprints: BlueprintSet,
    tab: Tab,
    cursor: SelectionCursor,
    mode: ModeTracker,
    histories: MetricHistories,
    down_scale: AutoScale,
    up_scale: AutoScale,
    latest: SampleSnapshot,
    processes: Vec<ProcessRecord>,
    startup: Vec<StartupEntry>,
}

impl DashboardState {
    pub fn new(blueprints: BlueprintSet) -> Self {
        Self {
            blueprints,
            tab: Tab::default(),
            cursor: SelectionCursor::default(),
            mode: ModeTracker::default(),
            histories: MetricHistories::default(),
            down_scale: AutoScale::new(DEFAULT_RATE_FLOOR),
            up_scale: AutoScale::new(DEFAULT_RATE_FLOOR),
            latest: SampleSnapshot::default(),
            processes: Vec::new(),
            startup: Vec::new(),
        }
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Cycle tabs; every tab change resets selection and scroll.
    pub fn cycle_tab_forward(&mut self) {
        self.tab = self.tab.next();
        self.cursor.reset();
    }

    pub fn cycle_tab_back(&mut self) {
        self.tab = self.tab.prev();
        self.cursor.reset();
    }

    pub fn cursor(&self) -> SelectionCursor {
        self.cursor
    }

    /// Move the selection on the visible table and keep it in view.
    pub fn move_selection(&mut self, delta: isize, page_size: usize) {
        let rows = self.visible_row_count();
        self.cursor.move_by(delta, rows);
        self.cursor.ensure_visible(page_size);
    }

    pub fn visible_row_count(&self) -> usize {
        match self.tab {
            Tab::Processes => self.processes.len(),
            Tab::Performance => 0,
            Tab::Startup => self.startup.len(),
        }
    }

    /// Apply one tick's snapshot: extend histories, advance rate ceilings.
    pub fn apply_snapshot(&mut self, snap: SampleSnapshot) {
        self.histories.apply(&snap);
        let window = self.histories.down.capacity();
        self.down_scale.observe(window_peak(&self.histories.down, window));
        self.up_scale.observe(window_peak(&self.histories.up, window));
        self.latest = snap;
    }

    pub fn set_processes(&mut self, rows: Vec<ProcessRecord>) {
        self.processes = rows;
        if self.tab == Tab::Processes {
            self.cursor.clamp(self.processes.len());
        }
    }

    pub fn set_startup(&mut self, rows: Vec<StartupEntry>) {
        self.startup = rows;
        if self.tab == Tab::Startup {
            self.cursor.clamp(self.startup.len());
        }
    }

    /// Select the layout mode for the current width and detect the edge.
    pub fn select_mode(&mut self, term_width: u16) -> ModeChange {
        let mode = self.blueprints.select(term_width);
        let changed = self.mode.update(mode);
        ModeChange { mode, changed }
    }

    pub fn current_mode(&self) -> LayoutMode {
        self.mode.current()
    }

    pub fn histories(&self) -> &MetricHistories {
        &self.histories
    }

    pub fn latest(&self) -> &SampleSnapshot {
        &self.latest
    }

    pub fn processes(&self) -> &[ProcessRecord] {
        &self.processes
    }

    pub fn startup(&self) -> &[StartupEntry] {
        &self.startup
    }

    pub fn down_ceiling(&self) -> f64 {
        self.down_scale.ceiling()
    }

    pub fn up_ceiling(&self) -> f64 {
        self.up_scale.ceiling()
    }
}

fn window_peak(history: &HistoryBuffer, window: usize) -> f64 {
    history
        .window(window)
        .into_iter()
        .fold(0.0f64, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_cycle_modulo_three() {
        let mut tab = Tab::Processes;
        tab = tab.next();
        assert_eq!(tab, Tab::Performance);
        tab = tab.next();
        assert_eq!(tab, Tab::Startup);
        tab = tab.next();
        assert_eq!(tab, Tab::Processes);
        assert_eq!(Tab::Processes.prev(), Tab::Startup);
    }

    #[test]
    fn tab_change_resets_selection_and_scroll() {
        let mut state = DashboardState::new(BlueprintSet::default());
        state.set_processes(fake_rows(50));
        state.move_selection(30, 20);
        assert_eq!(state.cursor().index(), 30);
        state.cycle_tab_forward();
        assert_eq!(state.cursor(), SelectionCursor::default());
    }

    #[test]
    fn selection_scroll_follows_page_window() {
        let mut cursor = SelectionCursor::default();
        // 50 rows, 20 visible: 19 -> 20 shifts the offset from 0 to 1.
        cursor.move_by(19, 50);
        cursor.ensure_visible(20);
        assert_eq!((cursor.index(), cursor.offset()), (19, 0));
        cursor.move_by(1, 50);
        cursor.ensure_visible(20);
        assert_eq!((cursor.index(), cursor.offset()), (20, 1));
    }

    #[test]
    fn selection_scrolls_up_when_moving_above_offset() {
        let mut cursor = SelectionCursor::default();
        cursor.move_by(30, 50);
        cursor.ensure_visible(20);
        assert_eq!(cursor.offset(), 11);
        cursor.move_by(-25, 50);
        cursor.ensure_visible(20);
        assert_eq!((cursor.index(), cursor.offset()), (5, 5));
    }

    #[test]
    fn selection_is_clamped_at_both_ends() {
        let mut cursor = SelectionCursor::default();
        cursor.move_by(-1, 50);
        assert_eq!(cursor.index(), 0);
        cursor.move_by(49, 50);
        cursor.move_by(1, 50);
        assert_eq!(cursor.index(), 49);
    }

    #[test]
    fn cursor_clamps_when_rows_shrink() {
        let mut state = DashboardState::new(BlueprintSet::default());
        state.set_processes(fake_rows(10));
        state.move_selection(9, 20);
        state.set_processes(fake_rows(3));
        assert_eq!(state.cursor().index(), 2);
        state.set_processes(Vec::new());
        assert_eq!(state.cursor().index(), 0);
    }

    #[test]
    fn scroll_offset_follows_shrinking_rows() {
        let mut state = DashboardState::new(BlueprintSet::default());
        state.set_processes(fake_rows(100));
        state.move_selection(80, 20);
        assert_eq!(state.cursor().offset(), 61);
        state.set_processes(fake_rows(10));
        let cursor = state.cursor();
        assert_eq!(cursor.index(), 9);
        assert!(cursor.offset() <= cursor.index());
    }

    #[test]
    fn mode_transition_fires_exactly_once() {
        let mut state = DashboardState::new(BlueprintSet::default());
        assert!(!state.select_mode(100).changed);
        assert!(!state.select_mode(123).changed);
        let change = state.select_mode(124);
        assert!(change.changed);
        assert_eq!(change.mode, LayoutMode::Full);
        // Same width again: no edge, no forced redraw.
        assert!(!state.select_mode(124).changed);
        assert!(!state.select_mode(200).changed);
        assert!(state.select_mode(80).changed);
    }

    #[test]
    fn snapshot_application_extends_all_histories() {
        let mut state = DashboardState::new(BlueprintSet::default());
        state.apply_snapshot(SampleSnapshot {
            cpu_pct: 10.0,
            ram_pct: 20.0,
            gpu_pct: 30.0,
            down_rate: 4096.0,
            up_rate: 512.0,
            ..Default::default()
        });
        let h = state.histories();
        assert_eq!(h.cpu.latest(), 10.0);
        assert_eq!(h.ram.latest(), 20.0);
        assert_eq!(h.gpu.latest(), 30.0);
        assert_eq!(h.down.latest(), 4096.0);
        assert_eq!(h.up.latest(), 512.0);
    }

    #[test]
    fn rate_ceilings_track_observed_traffic() {
        let mut state = DashboardState::new(BlueprintSet::default());
        let spike = 8.0 * 1024.0 * 1024.0;
        state.apply_snapshot(SampleSnapshot {
            down_rate: spike,
            ..Default::default()
        });
        assert!(state.down_ceiling() >= spike);
        // Upload stays at the floor baseline.
        assert_eq!(state.up_ceiling(), DEFAULT_RATE_FLOOR);
    }

    fn fake_rows(n: usize) -> Vec<ProcessRecord> {
        (0..n)
            .map(|i| ProcessRecord {
                pid: i as u32,
                name: format!("proc-{i}"),
                cpu_pct: 0.0,
                mem_pct: 0.0,
            })
            .collect()
    }
}
