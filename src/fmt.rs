//! Readout formatting.
//!
//! Monitors are narrow; every view compacts its numbers the same way
//! so a wall of displays reads consistently. Counts compact to `1.2K`,
//! energy to `12.5 kFE`, rates carry a sign and `/t` suffix.

use std::time::Duration;

/// Compact an item count: `950` stays, `1234` becomes `1.2K`,
/// `3_400_000` becomes `3.4M`.
pub fn compact(n: u64) -> String {
    const STEPS: [(u64, &str); 4] = [
        (1_000_000_000_000, "T"),
        (1_000_000_000, "G"),
        (1_000_000, "M"),
        (1_000, "K"),
    ];

    for (div, suffix) in STEPS {
        if n >= div {
            return format!("{}{}", one_decimal(n as f64 / div as f64), suffix);
        }
    }
    n.to_string()
}

/// Format an energy amount in FE with a metric prefix.
pub fn energy(n: u64) -> String {
    const STEPS: [(u64, &str); 3] = [
        (1_000_000_000, "GFE"),
        (1_000_000, "MFE"),
        (1_000, "kFE"),
    ];

    for (div, suffix) in STEPS {
        if n >= div {
            return format!("{} {}", one_decimal(n as f64 / div as f64), suffix);
        }
    }
    format!("{} FE", n)
}

/// Format a signed per-tick rate: `+120 FE/t`, `-3.4 kFE/t`, `0 FE/t`.
pub fn rate(n: i64) -> String {
    let magnitude = energy(n.unsigned_abs());
    if n > 0 {
        format!("+{}/t", magnitude)
    } else if n < 0 {
        format!("-{}/t", magnitude)
    } else {
        "0 FE/t".to_string()
    }
}

/// Format a ratio as a whole percentage, clamped to 0..=100.
pub fn percent(frac: f32) -> String {
    format!("{}%", (frac.clamp(0.0, 1.0) * 100.0).round() as u32)
}

/// Format a duration as the two most significant units: `2m 14s`,
/// `1h 03m`, `45s`.
pub fn eta(d: Duration) -> String {
    let total = d.as_secs();
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);

    if h > 0 {
        format!("{}h {:02}m", h, m)
    } else if m > 0 {
        format!("{}m {:02}s", m, s)
    } else {
        format!("{}s", s)
    }
}

/// One decimal place, with `.0` stripped: `1.0` renders as `1`.
fn one_decimal(v: f64) -> String {
    let s = format!("{:.1}", v);
    match s.strip_suffix(".0") {
        Some(trimmed) => trimmed.to_string(),
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_small() {
        assert_eq!(compact(0), "0");
        assert_eq!(compact(950), "950");
        assert_eq!(compact(999), "999");
    }

    #[test]
    fn test_compact_scaled() {
        assert_eq!(compact(1_000), "1K");
        assert_eq!(compact(1_234), "1.2K");
        assert_eq!(compact(3_400_000), "3.4M");
        assert_eq!(compact(8_100_000_000), "8.1G");
        assert_eq!(compact(2_000_000_000_000), "2T");
    }

    #[test]
    fn test_energy() {
        assert_eq!(energy(512), "512 FE");
        assert_eq!(energy(12_500), "12.5 kFE");
        assert_eq!(energy(2_000_000), "2 MFE");
    }

    #[test]
    fn test_rate_signs() {
        assert_eq!(rate(120), "+120 FE/t");
        assert_eq!(rate(-3_400), "-3.4 kFE/t");
        assert_eq!(rate(0), "0 FE/t");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0.0), "0%");
        assert_eq!(percent(0.426), "43%");
        assert_eq!(percent(1.0), "100%");
        assert_eq!(percent(1.7), "100%");
        assert_eq!(percent(-0.5), "0%");
    }

    #[test]
    fn test_eta() {
        assert_eq!(eta(Duration::from_secs(45)), "45s");
        assert_eq!(eta(Duration::from_secs(134)), "2m 14s");
        assert_eq!(eta(Duration::from_secs(3780)), "1h 03m");
    }
}
