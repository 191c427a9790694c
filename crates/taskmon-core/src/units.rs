//! Human-readable formatting for metric values.

/// Format a transfer rate with 1024-based thresholds.
///
/// Whole bytes below 1 KB/s, one decimal above.
pub fn format_rate(bytes_per_sec: f64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;
    if bytes_per_sec < KB {
        format!("{bytes_per_sec:.0} B/s")
    } else if bytes_per_sec < MB {
        format!("{:.1} KB/s", bytes_per_sec / KB)
    } else {
        format!("{:.1} MB/s", bytes_per_sec / MB)
    }
}

/// Format a percentage metric with one decimal, e.g. `42.5%`.
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Format uptime seconds as `H:MM:SS` (days folded into hours).
pub fn format_uptime(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    format!("{hours}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_below_one_kb_is_whole_bytes() {
        assert_eq!(format_rate(512.0), "512 B/s");
        assert_eq!(format_rate(0.0), "0 B/s");
        assert_eq!(format_rate(1023.0), "1023 B/s");
    }

    #[test]
    fn rate_kb_threshold_at_1024() {
        assert_eq!(format_rate(1024.0), "1.0 KB/s");
        assert_eq!(format_rate(2048.0), "2.0 KB/s");
        assert_eq!(format_rate(1536.0), "1.5 KB/s");
    }

    #[test]
    fn rate_mb_threshold_at_1024_squared() {
        assert_eq!(format_rate(3.0 * 1024.0 * 1024.0), "3.0 MB/s");
        assert_eq!(format_rate(1024.0 * 1024.0), "1.0 MB/s");
        assert_eq!(format_rate(1024.0 * 1024.0 - 1.0), "1024.0 KB/s");
    }

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(format_percent(42.46), "42.5%");
        assert_eq!(format_percent(0.0), "0.0%");
        assert_eq!(format_percent(100.0), "100.0%");
    }

    #[test]
    fn uptime_folds_days_into_hours() {
        assert_eq!(format_uptime(0), "0:00:00");
        assert_eq!(format_uptime(61), "0:01:01");
        assert_eq!(format_uptime(3661), "1:01:01");
        assert_eq!(format_uptime(90_000), "25:00:00");
    }
}
