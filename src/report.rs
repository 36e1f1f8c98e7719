//! Human-readable formatting for run summaries.

/// Scale `value` into the largest unit it reaches (units are `mult` apart) and
/// print it with roughly `sigfigs` significant digits.
fn with_unit(mut value: f64, sigfigs: usize, mult: f64, units: &[&str]) -> String {
    let mut unit = 0;
    while unit + 1 < units.len() && value >= mult {
        value /= mult;
        unit += 1;
    }
    let decimals = if unit == 0 {
        0
    } else if value < 10.0 {
        sigfigs.saturating_sub(1)
    } else if value < 100.0 {
        sigfigs.saturating_sub(2)
    } else {
        sigfigs.saturating_sub(3)
    };
    format!("{:.*} {}", decimals, value, units[unit])
}

/// Format a byte count with binary prefixes, e.g. `1.50 KiB`.
pub fn format_bytes(bytes: u64) -> String {
    with_unit(bytes as f64, 3, 1024.0, &["bytes", "KiB", "MiB", "GiB"])
}

/// Format a duration in seconds with 3 significant digits, e.g. `12.3 ms`.
pub fn format_duration(seconds: f64) -> String {
    with_unit(seconds * 1e9, 3, 1000.0, &["ns", "us", "ms", "s"])
}
