const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Formats a byte count with 1024-based units, picking the largest unit in
/// which the value is at least 1. One decimal place, trailing `.0` dropped.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0usize;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.1}", value);
    let trimmed = rounded.strip_suffix(".0").unwrap_or(&rounded);
    format!("{} {}", trimmed, UNITS[unit])
}

/// Clamps a raw percentage into [0, 100]; non-finite input renders as 0.
pub fn clamp_percentage(raw: f64) -> f64 {
    if raw.is_finite() {
        raw.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}
