use taskmon_core::MetricSampler;

/// List startup applications and their enablement status.
pub fn run() {
    let sampler = MetricSampler::new();
    let entries = sampler.startup_entries();

    if entries.is_empty() {
        println!("No startup applications found.");
        return;
    }

    println!("{:<40} {:>10}", "App Name", "Status");
    for entry in entries {
        let status = if entry.enabled { "Enabled" } else { "Disabled" };
        println!("{:<40} {:>10}", entry.name, status);
    }
}
