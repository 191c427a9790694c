//! OS metric sampling.
//!
//! One [`MetricSampler::sample`] call per tick produces a [`SampleSnapshot`]:
//! instantaneous CPU/RAM percentages, a best-effort GPU reading, network
//! rates derived from cumulative counter deltas, and aggregate system
//! counters. Sampling never fails: an unavailable sub-metric degrades to a
//! neutral or last-known value for that sub-metric only.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, Networks, ProcessRefreshKind, ProcessesToUpdate, System};

/// Elapsed-seconds divisor floor, guarding rate math against clock anomalies.
pub const RATE_EPSILON_SECS: f64 = 0.5;

/// One polling tick's readings. Created each tick, applied, not retained.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SampleSnapshot {
    pub cpu_pct: f64,
    pub ram_pct: f64,
    pub gpu_pct: f64,
    /// Receive rate in bytes/sec.
    pub down_rate: f64,
    /// Transmit rate in bytes/sec.
    pub up_rate: f64,
    pub process_count: usize,
    pub thread_count: usize,
    pub handle_count: usize,
    pub uptime_secs: u64,
}

/// One row of the process table, sorted by CPU share descending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub name: String,
    pub cpu_pct: f32,
    pub mem_pct: f32,
}

/// One row of the startup-apps table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartupEntry {
    pub name: String,
    pub enabled: bool,
}

/// Optional GPU utilization backend.
///
/// Real GPU metrics are pluggable; with no probe installed the sampler
/// reports the last-known value (initially 0) instead of failing.
pub trait GpuProbe: Send {
    /// Current GPU load in percent, or `None` when unreadable this tick.
    fn utilization(&mut self) -> Option<f64>;
}

/// Polls OS counters and derives per-tick rates.
pub struct MetricSampler {
    system: System,
    networks: Networks,
    gpu_probe: Option<Box<dyn GpuProbe>>,
    last_gpu_pct: f64,
    prev_rx: u64,
    prev_tx: u64,
    prev_instant: Instant,
}

impl MetricSampler {
    /// Create a sampler and establish the network counter baseline.
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu_specifics(CpuRefreshKind::everything());
        let networks = Networks::new_with_refreshed_list();
        let (prev_rx, prev_tx) = cumulative_totals(&networks);
        Self {
            system,
            networks,
            gpu_probe: None,
            last_gpu_pct: 0.0,
            prev_rx,
            prev_tx,
            prev_instant: Instant::now(),
        }
    }

    /// Install a GPU backend.
    pub fn with_gpu_probe(mut self, probe: Box<dyn GpuProbe>) -> Self {
        self.gpu_probe = Some(probe);
        self
    }

    /// Take one snapshot. Blocking (full process enumeration), so callers
    /// run it off the UI thread.
    pub fn sample(&mut self) -> SampleSnapshot {
        self.system
            .refresh_cpu_specifics(CpuRefreshKind::everything());
        self.system
            .refresh_memory_specifics(MemoryRefreshKind::everything());
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_cpu().with_memory(),
        );

        let cpus = self.system.cpus();
        let cpu_pct = if cpus.is_empty() {
            0.0
        } else {
            cpus.iter().map(|c| c.cpu_usage() as f64).sum::<f64>() / cpus.len() as f64
        };

        let total_mem = self.system.total_memory();
        let ram_pct = if total_mem > 0 {
            self.system.used_memory() as f64 / total_mem as f64 * 100.0
        } else {
            0.0
        };

        let gpu_pct = match self.gpu_probe.as_mut().and_then(|p| p.utilization()) {
            Some(v) => {
                self.last_gpu_pct = v.clamp(0.0, 100.0);
                self.last_gpu_pct
            }
            None => self.last_gpu_pct,
        };

        let (down_rate, up_rate) = self.network_rates();

        let process_count = self.system.processes().len();
        let thread_count = self.thread_count();
        let handle_count = handle_count();

        SampleSnapshot {
            cpu_pct,
            ram_pct,
            gpu_pct,
            down_rate,
            up_rate,
            process_count,
            thread_count,
            handle_count,
            uptime_secs: System::uptime(),
        }
    }

    /// Full process table, CPU-heaviest first. Inaccessible processes are
    /// simply absent from the sysinfo table; the scan never aborts.
    pub fn processes(&mut self) -> Vec<ProcessRecord> {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_cpu().with_memory(),
        );
        let total_mem = self.system.total_memory().max(1);
        let mut records: Vec<ProcessRecord> = self
            .system
            .processes()
            .values()
            .map(|p| ProcessRecord {
                pid: p.pid().as_u32(),
                name: p.name().to_string_lossy().into_owned(),
                cpu_pct: p.cpu_usage(),
                mem_pct: (p.memory() as f64 / total_mem as f64 * 100.0) as f32,
            })
            .collect();
        records.sort_by(|a, b| {
            b.cpu_pct
                .partial_cmp(&a.cpu_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });
        records
    }

    /// Startup applications, best-effort per platform.
    pub fn startup_entries(&self) -> Vec<StartupEntry> {
        startup_entries()
    }

    fn network_rates(&mut self) -> (f64, f64) {
        self.networks.refresh(true);
        let (rx, tx) = cumulative_totals(&self.networks);

        let now = Instant::now();
        let elapsed = now
            .duration_since(self.prev_instant)
            .as_secs_f64()
            .max(RATE_EPSILON_SECS);

        let down = rate_from(rx.saturating_sub(self.prev_rx), elapsed);
        let up = rate_from(tx.saturating_sub(self.prev_tx), elapsed);

        self.prev_rx = rx;
        self.prev_tx = tx;
        self.prev_instant = now;
        (down, up)
    }

    #[cfg(target_os = "linux")]
    fn thread_count(&self) -> usize {
        self.system
            .processes()
            .values()
            .map(|p| p.tasks().map_or(1, |t| t.len().max(1)))
            .sum()
    }

    #[cfg(not(target_os = "linux"))]
    fn thread_count(&self) -> usize {
        0
    }
}

impl Default for MetricSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Machine hostname, `localhost` when unreadable.
pub fn hostname() -> String {
    System::host_name().unwrap_or_else(|| "localhost".to_string())
}

fn cumulative_totals(networks: &Networks) -> (u64, u64) {
    networks.iter().fold((0u64, 0u64), |acc, (_name, data)| {
        (
            acc.0 + data.total_received(),
            acc.1 + data.total_transmitted(),
        )
    })
}

fn rate_from(delta_bytes: u64, elapsed_secs: f64) -> f64 {
    delta_bytes as f64 / elapsed_secs.max(RATE_EPSILON_SECS)
}

/// System-wide open handle count: open file descriptors on Linux, 0 where
/// no cheap equivalent exists.
#[cfg(target_os = "linux")]
fn handle_count() -> usize {
    std::fs::read_to_string("/proc/sys/fs/file-nr")
        .ok()
        .and_then(|s| s.split_whitespace().next().and_then(|v| v.parse().ok()))
        .unwrap_or(0)
}

#[cfg(not(target_os = "linux"))]
fn handle_count() -> usize {
    0
}

#[cfg(target_os = "linux")]
fn startup_entries() -> Vec<StartupEntry> {
    let mut dirs = vec![std::path::PathBuf::from("/etc/xdg/autostart")];
    if let Some(home) = std::env::var_os("HOME") {
        dirs.push(std::path::Path::new(&home).join(".config/autostart"));
    }

    let mut entries = Vec::new();
    for dir in dirs {
        let Ok(read_dir) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in read_dir.flatten() {
            let path = entry.path();
            if path.extension().is_none_or(|e| e != "desktop") {
                continue;
            }
            let Ok(contents) = std::fs::read_to_string(&path) else {
                continue;
            };
            entries.push(parse_desktop_entry(&path, &contents));
        }
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

#[cfg(target_os = "linux")]
fn parse_desktop_entry(path: &std::path::Path, contents: &str) -> StartupEntry {
    let mut name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut enabled = true;
    for line in contents.lines() {
        if let Some(v) = line.strip_prefix("Name=") {
            name = v.trim().to_string();
        } else if let Some(v) = line.strip_prefix("Hidden=") {
            enabled &= !v.trim().eq_ignore_ascii_case("true");
        } else if let Some(v) = line.strip_prefix("X-GNOME-Autostart-enabled=") {
            enabled &= !v.trim().eq_ignore_ascii_case("false");
        }
    }
    StartupEntry { name, enabled }
}

#[cfg(target_os = "macos")]
fn startup_entries() -> Vec<StartupEntry> {
    let Some(home) = std::env::var_os("HOME") else {
        return Vec::new();
    };
    let dir = std::path::Path::new(&home).join("Library/LaunchAgents");
    let Ok(read_dir) = std::fs::read_dir(&dir) else {
        return Vec::new();
    };
    let mut entries: Vec<StartupEntry> = read_dir
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            if path.extension()? != "plist" {
                return None;
            }
            Some(StartupEntry {
                name: path.file_stem()?.to_string_lossy().into_owned(),
                enabled: true,
            })
        })
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn startup_entries() -> Vec<StartupEntry> {
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_uses_epsilon_floor_for_tiny_elapsed() {
        // 1024 bytes over a bogus 1ms tick: divided by the 0.5s floor.
        assert_eq!(rate_from(1024, 0.001), 2048.0);
        assert_eq!(rate_from(1024, 0.0), 2048.0);
    }

    #[test]
    fn rate_uses_real_elapsed_above_epsilon() {
        assert_eq!(rate_from(2048, 2.0), 1024.0);
    }

    #[test]
    fn snapshot_defaults_are_neutral() {
        let snap = SampleSnapshot::default();
        assert_eq!(snap.cpu_pct, 0.0);
        assert_eq!(snap.down_rate, 0.0);
        assert_eq!(snap.process_count, 0);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let snap = SampleSnapshot {
            cpu_pct: 12.5,
            ..Default::default()
        };
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"cpu_pct\":12.5"));
    }

    #[test]
    fn gpu_probe_failure_keeps_last_known_value() {
        struct Flaky {
            calls: u32,
        }
        impl GpuProbe for Flaky {
            fn utilization(&mut self) -> Option<f64> {
                self.calls += 1;
                if self.calls == 1 { Some(63.0) } else { None }
            }
        }

        let mut sampler = MetricSampler::new().with_gpu_probe(Box::new(Flaky { calls: 0 }));
        let first = sampler.sample();
        assert_eq!(first.gpu_pct, 63.0);
        let second = sampler.sample();
        assert_eq!(second.gpu_pct, 63.0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn desktop_entry_parsing_reads_name_and_flags() {
        let path = std::path::Path::new("/tmp/updater.desktop");
        let entry = parse_desktop_entry(
            path,
            "[Desktop Entry]\nName=Updater\nHidden=true\n",
        );
        assert_eq!(entry.name, "Updater");
        assert!(!entry.enabled);

        let entry = parse_desktop_entry(path, "[Desktop Entry]\nExec=x\n");
        assert_eq!(entry.name, "updater");
        assert!(entry.enabled);

        let entry = parse_desktop_entry(
            path,
            "Name=Agent\nX-GNOME-Autostart-enabled=false\n",
        );
        assert!(!entry.enabled);
    }
}
