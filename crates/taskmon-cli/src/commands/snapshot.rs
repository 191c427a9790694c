use taskmon_core::{format_percent, format_rate, format_uptime};

/// Print one sampling tick and exit.
pub fn run(json: bool) {
    let mut sampler = super::warmed_sampler();
    let snap = sampler.sample();

    if json {
        match serde_json::to_string_pretty(&snap) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("serialization error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    println!("CPU        {:>12}", format_percent(snap.cpu_pct));
    println!("RAM        {:>12}", format_percent(snap.ram_pct));
    println!("GPU        {:>12}", format_percent(snap.gpu_pct));
    println!("Download   {:>12}", format_rate(snap.down_rate));
    println!("Upload     {:>12}", format_rate(snap.up_rate));
    println!("Processes  {:>12}", snap.process_count);
    println!("Threads    {:>12}", snap.thread_count);
    println!("Handles    {:>12}", snap.handle_count);
    println!("Uptime     {:>12}", format_uptime(snap.uptime_secs));
}
