//! Duration formatting and normalization of user-typed trim points.
//!
//! Pure functions, no state. Durations are rendered as `MM:SS` below one hour
//! and `H:MM:SS` from one hour on (hours unpadded).

/// Rendered for absent, negative, NaN or infinite durations.
pub const UNKNOWN_DURATION: &str = "--:--";

/// Formats a duration in seconds. Fractional seconds are truncated.
///
/// - `format_duration(Some(125.0))` → `"02:05"`
/// - `format_duration(Some(3725.9))` → `"1:02:05"`
/// - `format_duration(None)` → `"--:--"`
pub fn format_duration(seconds: Option<f64>) -> String {
    let secs = match seconds {
        Some(s) if s.is_finite() && s >= 0.0 => s.floor() as u64,
        _ => return UNKNOWN_DURATION.to_string(),
    };
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

/// Normalizes a trim point as typed by the user.
///
/// Empty input is returned unchanged. All-digit input is a whole number of
/// seconds and is reformatted with [`format_duration`]. Colon-delimited input
/// has each segment left-padded to two digits (`"1:5"` → `"01:05"`); segments
/// are not range-checked, the service rejects out-of-range trim points.
/// Anything else is returned unchanged.
pub fn normalize_time_input(text: &str) -> String {
    let value = text.trim();
    if value.is_empty() {
        return text.to_string();
    }

    if value.bytes().all(|b| b.is_ascii_digit()) {
        return match value.parse::<u64>() {
            Ok(secs) => format_duration(Some(secs as f64)),
            Err(_) => text.to_string(),
        };
    }

    if value.contains(':') {
        return value
            .split(':')
            .map(|part| format!("{part:0>2}"))
            .collect::<Vec<_>>()
            .join(":");
    }

    text.to_string()
}

/// Parses `H:MM:SS`, `MM:SS` or plain seconds into a number of seconds.
///
/// Returns `None` for empty input, non-numeric segments, more than three
/// segments, or a total that does not fit in a `u64`.
pub fn parse_timecode(text: &str) -> Option<u64> {
    let value = text.trim();
    if value.is_empty() {
        return None;
    }
    let parts = value
        .split(':')
        .map(|p| p.trim().parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;
    let (h, m, s) = match parts.as_slice() {
        [s] => (0, 0, *s),
        [m, s] => (0, *m, *s),
        [h, m, s] => (*h, *m, *s),
        _ => return None,
    };
    h.checked_mul(3600)?
        .checked_add(m.checked_mul(60)?)?
        .checked_add(s)
}

/// Placeholder and label for trim inputs, chosen from the media duration.
///
/// Media of an hour or more gets `("00:00:00", "H:MM:SS")`, shorter media
/// `("00:00", "MM:SS")`.
pub fn time_placeholder(duration: Option<f64>) -> (&'static str, &'static str) {
    if format_duration(duration).split(':').count() == 3 {
        ("00:00:00", "H:MM:SS")
    } else {
        ("00:00", "MM:SS")
    }
}
