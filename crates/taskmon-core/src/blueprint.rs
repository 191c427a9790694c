//! Layout blueprints: terminal width → display mode.
//!
//! Mode selection is a pure function of the current column count and is
//! recomputed every tick; the dashboard state tracks edges so the screen is
//! cleared exactly once per transition (see `dashboard::ModeTracker`).

use serde::{Deserialize, Serialize};

/// Column count at or above which the full layout (with sidebar) is used.
pub const FULL_THRESHOLD: u16 = 124;

/// Discrete display mode, selected by terminal width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// Graphs only, no sidebar. Fits a 120-column launch.
    #[default]
    Mini,
    /// Graphs plus the details sidebar.
    Full,
}

impl LayoutMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Mini => "mini",
            Self::Full => "full",
        }
    }

    /// Sidebar visibility follows directly from the mode.
    pub fn shows_sidebar(self) -> bool {
        matches!(self, Self::Full)
    }
}

/// One named layout configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayBlueprint {
    pub graph_width: u16,
    pub graph_height: u16,
    pub sidebar_width: u16,
    pub mid_gap: u16,
    pub right_padding: u16,
}

impl Default for DisplayBlueprint {
    fn default() -> Self {
        MINI_BLUEPRINT
    }
}

/// Built-in mini layout.
pub const MINI_BLUEPRINT: DisplayBlueprint = DisplayBlueprint {
    graph_width: 59,
    graph_height: 14,
    sidebar_width: 0,
    mid_gap: 1,
    right_padding: 1,
};

/// Built-in full layout.
pub const FULL_BLUEPRINT: DisplayBlueprint = DisplayBlueprint {
    graph_width: 50,
    graph_height: 14,
    sidebar_width: 22,
    mid_gap: 1,
    right_padding: 1,
};

/// The mode set, overridable from the persisted config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlueprintSet {
    pub mini: DisplayBlueprint,
    pub full: DisplayBlueprint,
}

impl Default for BlueprintSet {
    fn default() -> Self {
        Self {
            mini: MINI_BLUEPRINT,
            full: FULL_BLUEPRINT,
        }
    }
}

impl BlueprintSet {
    /// Select the display mode for the current terminal width.
    pub fn select(&self, term_width: u16) -> LayoutMode {
        if term_width >= FULL_THRESHOLD {
            LayoutMode::Full
        } else {
            LayoutMode::Mini
        }
    }

    pub fn get(&self, mode: LayoutMode) -> &DisplayBlueprint {
        match mode {
            LayoutMode::Mini => &self.mini,
            LayoutMode::Full => &self.full,
        }
    }
}
