//! Filename sanitization for Linux and Windows hosts.

/// Longest name in bytes most filesystems accept (NAME_MAX).
const NAME_MAX: usize = 255;

/// Device names Windows refuses as file stems.
const RESERVED_STEMS: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Makes a suggested filename safe to create in a local directory.
///
/// - path separators, `: * ? " < > |` and control characters become `_`
///   (runs of replacements collapse to one `_`)
/// - leading/trailing spaces, dots and underscores are trimmed
/// - reserved device stems (`CON`, `NUL`, ...) get a leading `_`
/// - the result is cut to 255 bytes on a char boundary
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_replaced = false;

    for c in name.chars() {
        let unsafe_char = c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|');
        if unsafe_char {
            if !prev_replaced {
                out.push('_');
            }
            prev_replaced = true;
        } else {
            out.push(c);
            prev_replaced = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == ' ' || c == '.' || c == '_');
    let mut result = trimmed.to_string();

    let stem = result.split('.').next().unwrap_or("");
    if RESERVED_STEMS.iter().any(|r| r.eq_ignore_ascii_case(stem)) {
        result.insert(0, '_');
    }

    if result.len() > NAME_MAX {
        let mut take = NAME_MAX;
        while take > 0 && !result.is_char_boundary(take) {
            take -= 1;
        }
        result.truncate(take);
    }
    result
}
