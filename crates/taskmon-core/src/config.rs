//! Persisted dashboard configuration.
//!
//! Two fields live in an external JSON config file: the performance
//! sidebar visibility (written on change) and optional blueprint overrides
//! (read only). The dashboard must always render with no config present, so
//! every failure here degrades to built-in defaults.

use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::blueprint::BlueprintSet;

/// Default config file name, resolved relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceVisibility {
    pub show_sidebar: bool,
}

impl Default for PerformanceVisibility {
    fn default() -> Self {
        Self { show_sidebar: true }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutVisibility {
    pub performance: PerformanceVisibility,
}

/// The slice of the config file the dashboard reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub layout_visibility: LayoutVisibility,
    pub layout_blueprints: BlueprintSet,
}

impl DashboardConfig {
    /// Load from `path`, falling back to defaults on any failure.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    debug!("config parse failed ({e}), using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                debug!("config read failed ({e}), using defaults");
                Self::default()
            }
        }
    }

    pub fn show_sidebar(&self) -> bool {
        self.layout_visibility.performance.show_sidebar
    }
}

/// Persist the sidebar preference, preserving unrelated keys in the file.
/// Best-effort: failures are logged and swallowed.
pub fn store_show_sidebar(path: &Path, show_sidebar: bool) {
    fn ensure_object(slot: &mut serde_json::Value) {
        if !slot.is_object() {
            *slot = serde_json::json!({});
        }
    }

    let mut root: serde_json::Value = std::fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_else(|| serde_json::json!({}));

    ensure_object(&mut root);
    ensure_object(&mut root["layout_visibility"]);
    ensure_object(&mut root["layout_visibility"]["performance"]);
    root["layout_visibility"]["performance"]["show_sidebar"] = serde_json::json!(show_sidebar);

    match serde_json::to_string_pretty(&root) {
        Ok(contents) => {
            if let Err(e) = std::fs::write(path, contents) {
                warn!("config write failed: {e}");
            }
        }
        Err(e) => warn!("config serialize failed: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::FULL_BLUEPRINT;

    #[test]
    fn missing_file_yields_defaults() {
        let config = DashboardConfig::load(Path::new("/nonexistent/taskmon.json"));
        assert!(config.show_sidebar());
        assert_eq!(config.layout_blueprints.full, FULL_BLUEPRINT);
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        let config = DashboardConfig::load(&path);
        assert!(config.show_sidebar());
    }

    #[test]
    fn visibility_round_trips_through_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        store_show_sidebar(&path, false);
        let config = DashboardConfig::load(&path);
        assert!(!config.show_sidebar());

        store_show_sidebar(&path, true);
        assert!(DashboardConfig::load(&path).show_sidebar());
    }

    #[test]
    fn store_preserves_unrelated_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"theme": "matrix", "layout_visibility": {"other": 1}}"#)
            .unwrap();

        store_show_sidebar(&path, false);

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["theme"], "matrix");
        assert_eq!(raw["layout_visibility"]["other"], 1);
        assert_eq!(
            raw["layout_visibility"]["performance"]["show_sidebar"],
            false
        );
    }

    #[test]
    fn blueprint_overrides_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"layout_blueprints": {"full": {"sidebar_width": 28}}}"#,
        )
        .unwrap();
        let config = DashboardConfig::load(&path);
        assert_eq!(config.layout_blueprints.full.sidebar_width, 28);
    }
}
