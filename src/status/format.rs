// Display helpers: durations as HH:MM.

/// Shown wherever a duration is not known. Never rendered as zero.
pub const UNKNOWN_DISPLAY: &str = "??:??";

const MS_PER_MINUTE: i64 = 60_000;

/// `HH:MM`; hours are not wrapped at 24. Negative inputs render as `00:00`.
pub fn format_duration(ms: i64) -> String {
    let minutes = ms.max(0) / MS_PER_MINUTE;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

pub fn format_optional(ms: Option<i64>) -> String {
    ms.map(format_duration)
        .unwrap_or_else(|| UNKNOWN_DISPLAY.to_string())
}
