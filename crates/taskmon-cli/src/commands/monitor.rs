use std::path::PathBuf;

use taskmon_core::DashboardConfig;

pub fn run(refresh: f64, config: &str) {
    let config_path = PathBuf::from(config);
    let loaded = DashboardConfig::load(&config_path);
    let mut app = crate::tui::app::App::new(loaded, config_path, refresh);
    if let Err(e) = app.run() {
        eprintln!("TUI error: {e}");
        std::process::exit(1);
    }
}
