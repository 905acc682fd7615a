//! Units formatting and conversion utilities
//!
//! Provides human-readable size formatting and the throughput math used
//! by the benchmark report.

use std::time::Duration;

/// Binary unit prefixes walked by [`format_size`], in ascending order.
const UNIT_PREFIXES: &[&str] = &["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "Zi"];

/// Format a byte count as a human-readable string with binary prefixes.
///
/// The magnitude is divided by 1024 until it fits the current prefix and
/// rendered with exactly one fractional digit. The sign is preserved;
/// prefix selection uses the absolute value. Values past `Zi` fall back
/// to `Yi`. The binary `i` marker is always part of the prefix, whatever
/// the suffix.
///
/// # Examples
/// ```
/// use drivespeed::util::units::format_size;
///
/// assert_eq!(format_size(1024.0, "B"), "1.0KiB");
/// assert_eq!(format_size(1_048_576.0, "B"), "1.0MiB");
/// assert_eq!(format_size(1_000_000.0, "B"), "976.6KiB");
/// ```
pub fn format_size(num: f64, suffix: &str) -> String {
    let mut num = num;
    for prefix in UNIT_PREFIXES {
        if num.abs() < 1024.0 {
            return format!("{:.1}{}{}", num, prefix, suffix);
        }
        num /= 1024.0;
    }
    format!("{:.1}Yi{}", num, suffix)
}

/// Calculate throughput in MB/s from bytes and duration
///
/// Divides by 1 048 576, so the figure is mebibytes per second even
/// though the report labels it `MB/s`.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use drivespeed::util::units::calculate_throughput_mbps;
///
/// let throughput = calculate_throughput_mbps(1048576, Duration::from_secs(1));
/// assert!((throughput - 1.0).abs() < 0.01);
/// ```
pub fn calculate_throughput_mbps(bytes: u64, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 0.0;
    }

    let duration_secs = duration.as_secs_f64();
    let megabytes = bytes as f64 / 1_048_576.0;
    megabytes / duration_secs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0.0, "B"), "0.0B");
        assert_eq!(format_size(512.0, "B"), "512.0B");
        assert_eq!(format_size(1024.0, "B"), "1.0KiB");
        assert_eq!(format_size(1536.0, "B"), "1.5KiB");
        assert_eq!(format_size(1_000_000.0, "B"), "976.6KiB");
        assert_eq!(format_size(1_048_576.0, "B"), "1.0MiB");
        assert_eq!(format_size(1_073_741_824.0, "B"), "1.0GiB");
    }

    #[test]
    fn test_format_size_preserves_sign() {
        assert_eq!(format_size(-512.0, "B"), "-512.0B");
        assert_eq!(format_size(-2048.0, "B"), "-2.0KiB");
    }

    #[test]
    fn test_format_size_custom_suffix() {
        assert_eq!(format_size(2048.0, "B/s"), "2.0KiB/s");
        assert_eq!(format_size(100.0, ""), "100.0");
    }

    #[test]
    fn test_format_size_yi_fallback() {
        // 2^80 exhausts every listed prefix
        let huge = (1u128 << 80) as f64;
        assert_eq!(format_size(huge, "B"), "1.0YiB");
    }

    #[test]
    fn test_format_size_monotonic_prefix_selection() {
        let rendered: Vec<String> = (0..8)
            .map(|exp| format_size(1024f64.powi(exp), "B"))
            .collect();
        for (exp, text) in rendered.iter().enumerate() {
            let expected_prefix = UNIT_PREFIXES[exp];
            assert!(
                text.ends_with(&format!("{}B", expected_prefix)),
                "1024^{} rendered as {}",
                exp,
                text
            );
        }
    }

    #[test]
    fn test_calculate_throughput_mbps() {
        let throughput = calculate_throughput_mbps(1_048_576, Duration::from_secs(1));
        assert!((throughput - 1.0).abs() < 0.01);

        let throughput = calculate_throughput_mbps(2_097_152, Duration::from_secs(2));
        assert!((throughput - 1.0).abs() < 0.01);

        assert_eq!(calculate_throughput_mbps(1000, Duration::ZERO), 0.0);
    }
}
