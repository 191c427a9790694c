pub mod monitor;
pub mod processes;
pub mod snapshot;
pub mod startup;
pub mod watch;

use std::time::Duration;

use taskmon_core::MetricSampler;

/// Delay between the baseline and the reported sample, so per-process and
/// per-core CPU deltas have something to diff against.
const WARMUP_DELAY: Duration = Duration::from_millis(200);

/// Build a sampler with a warm CPU baseline for one-shot commands.
pub(crate) fn warmed_sampler() -> MetricSampler {
    let mut sampler = MetricSampler::new();
    let _ = sampler.sample();
    std::thread::sleep(WARMUP_DELAY);
    sampler
}
