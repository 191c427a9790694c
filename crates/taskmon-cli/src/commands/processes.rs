/// Print the process table once, CPU-heaviest first.
pub fn run(limit: usize) {
    let mut sampler = super::warmed_sampler();
    let _ = sampler.sample();
    let rows = sampler.processes();

    println!("{:<8} {:<32} {:>7} {:>7}", "PID", "Name", "CPU%", "MEM%");
    for row in rows.iter().take(limit) {
        let mut name = row.name.clone();
        if name.chars().count() > 32 {
            name = name.chars().take(31).collect::<String>() + "…";
        }
        println!(
            "{:<8} {:<32} {:>7.1} {:>7.1}",
            row.pid, name, row.cpu_pct, row.mem_pct
        );
    }
}
