//! CLI for taskmon — a live terminal task manager and resource dashboard.

mod commands;
mod tui;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "taskmon")]
#[command(about = "taskmon — live terminal task manager and resource dashboard")]
#[command(version = taskmon_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Live interactive dashboard (TUI): graphs, processes, startup apps
    Monitor {
        /// Refresh rate in seconds
        #[arg(long, default_value = "0.5")]
        refresh: f64,

        /// Config file holding layout blueprints and visibility state
        #[arg(long, default_value = taskmon_core::DEFAULT_CONFIG_PATH)]
        config: String,
    },

    /// Print one sampling tick and exit
    Snapshot {
        /// Emit machine-readable JSON instead of the text summary
        #[arg(long)]
        json: bool,
    },

    /// Print the process table once, CPU-heaviest first
    Processes {
        /// Maximum number of rows to print
        #[arg(long, default_value = "25")]
        limit: usize,
    },

    /// List startup applications and their enablement status
    Startup,

    /// Stream samples to stdout, one line per tick (pipe-friendly)
    Watch {
        /// Refresh rate in seconds
        #[arg(long, default_value = "0.5")]
        refresh: f64,

        /// Stop after this many ticks (default: run until Ctrl-C)
        #[arg(long)]
        ticks: Option<u64>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Monitor { refresh, config } => commands::monitor::run(refresh, &config),
        Commands::Snapshot { json } => commands::snapshot::run(json),
        Commands::Processes { limit } => commands::processes::run(limit),
        Commands::Startup => commands::startup::run(),
        Commands::Watch { refresh, ticks } => commands::watch::run(refresh, ticks),
    }
}
