//! Artifact filename derivation.
//!
//! Prefers the name the service suggests in `Content-Disposition`, sanitized
//! for local filesystems; falls back to `video.<ext>`.

mod content_disposition;
mod sanitize;

pub use content_disposition::parse_content_disposition_filename;
pub use sanitize::sanitize_filename;

/// Stem used when the service suggests no usable name.
const FALLBACK_STEM: &str = "video";

/// Derives the local filename for a downloaded artifact.
///
/// - `artifact_filename(Some("attachment; filename=\"Talk.mp4\""), "mp4")` → `"Talk.mp4"`
/// - `artifact_filename(None, "mp3")` → `"video.mp3"`
pub fn artifact_filename(content_disposition: Option<&str>, extension: &str) -> String {
    let sanitized = content_disposition
        .and_then(parse_content_disposition_filename)
        .map(|raw| sanitize_filename(&raw))
        .filter(|s| !s.is_empty() && s != "." && s != "..");

    match sanitized {
        Some(name) => name,
        None => format!("{}.{}", FALLBACK_STEM, extension),
    }
}
