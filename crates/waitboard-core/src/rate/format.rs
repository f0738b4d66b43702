//! Human-readable formatting for byte counts, rates and durations.

use std::time::Duration;

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;
const TIB: u64 = GIB * 1024;

/// Format a byte count using binary units (`B`, `KiB`, `MiB`, `GiB`, `TiB`).
///
/// Values below one KiB are printed as whole bytes; everything else gets
/// one decimal place.
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: u64) -> String {
    let (unit, divisor) = match bytes {
        b if b >= TIB => ("TiB", TIB),
        b if b >= GIB => ("GiB", GIB),
        b if b >= MIB => ("MiB", MIB),
        b if b >= KIB => ("KiB", KIB),
        _ => return format!("{bytes} B"),
    };
    format!("{:.1} {unit}", bytes as f64 / divisor as f64)
}

/// Format a throughput in bytes per second, e.g. `1.5 MiB/s`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_rate(bytes_per_second: f64) -> String {
    let whole = if bytes_per_second.is_finite() && bytes_per_second > 0.0 {
        bytes_per_second.round() as u64
    } else {
        0
    };
    format!("{}/s", format_bytes(whole))
}

/// Format a remaining-time estimate as `m:ss` or `h:mm:ss`.
pub fn format_eta(eta: Duration) -> String {
    let secs = eta.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes_small_values_are_whole() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
    }

    #[test]
    fn test_format_bytes_scales_units() {
        assert_eq!(format_bytes(1024), "1.0 KiB");
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(5 * MIB), "5.0 MiB");
        assert_eq!(format_bytes(3 * GIB + GIB / 2), "3.5 GiB");
        assert_eq!(format_bytes(2 * TIB), "2.0 TiB");
    }

    #[test]
    fn test_format_rate_handles_degenerate_input() {
        assert_eq!(format_rate(0.0), "0 B/s");
        assert_eq!(format_rate(-5.0), "0 B/s");
        assert_eq!(format_rate(f64::NAN), "0 B/s");
        assert_eq!(format_rate(2048.0), "2.0 KiB/s");
    }

    #[test]
    fn test_format_eta() {
        assert_eq!(format_eta(Duration::from_secs(0)), "0:00");
        assert_eq!(format_eta(Duration::from_secs(65)), "1:05");
        assert_eq!(format_eta(Duration::from_secs(3 * 3600 + 7)), "3:00:07");
    }
}
