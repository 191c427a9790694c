//! # taskmon-core
//!
//! **A live terminal resource dashboard engine.**
//!
//! `taskmon-core` is the monitoring and rendering engine behind the taskmon
//! task manager: a fixed-cadence OS sampler, circular per-metric history
//! buffers, width-adaptive layout blueprints, and a sub-character-resolution
//! rasterizer that draws bounded series as block or braille sparklines.
//!
//! ## Quick Start
//!
//! ```no_run
//! use taskmon_core::{BlueprintSet, DashboardState, FrameComposer, MetricSampler};
//!
//! let mut sampler = MetricSampler::new();
//! let mut state = DashboardState::new(BlueprintSet::default());
//!
//! // One tick: sample off the UI thread, apply on it, compose.
//! state.select_mode(120);
//! state.apply_snapshot(sampler.sample());
//!
//! let composer = FrameComposer::default();
//! let rows = composer.performance_frame(&state, 120, 40);
//! print!("{}", composer.to_ansi(&rows));
//! ```
//!
//! ## Architecture
//!
//! Sampler → histories → blueprint/scale selection → rasterizer → composer
//!
//! The sampling side is deliberately failure-tolerant: an unreadable
//! sub-metric degrades to a neutral or last-known value for that sub-metric
//! only, and nothing in the render path can fail: a too-small terminal
//! clamps and a missing config falls back to defaults. The worst case is a
//! stale graph, never a crash.

pub mod blueprint;
pub mod compose;
pub mod config;
pub mod dashboard;
pub mod history;
pub mod raster;
pub mod sampler;
pub mod style;
pub mod units;

pub use blueprint::{
    BlueprintSet, DisplayBlueprint, FULL_BLUEPRINT, FULL_THRESHOLD, LayoutMode, MINI_BLUEPRINT,
};
pub use compose::{FrameComposer, GraphMode, MIN_PANEL_WIDTH, MIN_QUADRANT_HEIGHT, quadrant_dims};
pub use config::{DEFAULT_CONFIG_PATH, DashboardConfig, store_show_sidebar};
pub use dashboard::{
    DashboardState, MetricHistories, ModeChange, ModeTracker, SelectionCursor, Tab,
};
pub use history::{DEFAULT_CAPACITY, HistoryBuffer};
pub use raster::{
    AUTO_SCALE_DECAY, AutoScale, BLOCK_GLYPHS, DEFAULT_RATE_FLOOR, DotMask, PERCENT_CEILING,
    RasterCanvas, rasterize_blocks, rasterize_braille,
};
pub use sampler::{
    GpuProbe, MetricSampler, ProcessRecord, RATE_EPSILON_SECS, SampleSnapshot, StartupEntry,
    hostname,
};
pub use style::{ColorRole, Rgb, StyledLine, StyledSpan, Theme};
pub use units::{format_percent, format_rate, format_uptime};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
