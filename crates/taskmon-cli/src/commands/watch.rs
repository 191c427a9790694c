use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use taskmon_core::{format_percent, format_rate};

/// Headless sampling loop: one line per tick until Ctrl-C or `--ticks`.
pub fn run(refresh: f64, ticks: Option<u64>) {
    let interval = Duration::from_secs_f64(refresh.max(0.1));

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        if ctrlc::set_handler(move || stop.store(true, Ordering::Relaxed)).is_err() {
            eprintln!("warning: Ctrl-C handler unavailable; use --ticks to bound the run");
        }
    }

    let mut sampler = super::warmed_sampler();
    let mut tick: u64 = 0;

    println!(
        "{:>6}  {:>8}  {:>8}  {:>8}  {:>12}  {:>12}",
        "tick", "cpu", "ram", "gpu", "down", "up"
    );
    while !stop.load(Ordering::Relaxed) {
        let snap = sampler.sample();
        tick += 1;
        println!(
            "{tick:>6}  {:>8}  {:>8}  {:>8}  {:>12}  {:>12}",
            format_percent(snap.cpu_pct),
            format_percent(snap.ram_pct),
            format_percent(snap.gpu_pct),
            format_rate(snap.down_rate),
            format_rate(snap.up_rate),
        );
        if ticks.is_some_and(|max| tick >= max) {
            break;
        }
        std::thread::sleep(interval);
    }
}
