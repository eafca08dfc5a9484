//! JSON bodies exchanged with the job service.

use serde::{Deserialize, Serialize};

use crate::job::{ConvertRequest, DownloadRequest, JobId, OutputFormat};

#[derive(Debug, Serialize)]
pub(super) struct StartDownloadBody<'a> {
    pub url: &'a str,
    pub format: &'static str,
    pub download_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_quality: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<&'a str>,
}

impl<'a> StartDownloadBody<'a> {
    pub fn new(req: &'a DownloadRequest, candidate: &'a JobId) -> Self {
        let (quality, audio_quality) = match req.format {
            OutputFormat::Mp4 { max_height } => (max_height, None),
            OutputFormat::Mp3 { bitrate_kbps } => (None, bitrate_kbps),
        };
        Self {
            url: &req.url,
            format: req.format.extension(),
            download_id: candidate.as_str(),
            quality,
            audio_quality,
            start_time: req.trim.start.as_deref(),
            end_time: req.trim.end.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct StartConvertBody<'a> {
    pub filename: &'a str,
    pub convert_id: &'a str,
}

impl<'a> StartConvertBody<'a> {
    pub fn new(req: &'a ConvertRequest, candidate: &'a JobId) -> Self {
        Self {
            filename: &req.filename,
            convert_id: candidate.as_str(),
        }
    }
}

/// Start response; the id field name depends on the job kind.
#[derive(Debug, Deserialize)]
pub(super) struct StartedBody {
    #[serde(alias = "download_id", alias = "convert_id")]
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct CancelBody {
    #[serde(default, alias = "success")]
    pub cancelled: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct RevealBody<'a> {
    pub path: &'a str,
}

/// FastAPI-style error body.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    pub detail: serde_json::Value,
}

/// Extracts a human-readable message from an error response body.
pub(super) fn error_detail(body: &[u8]) -> String {
    if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) {
        return match parsed.detail {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
    }
    String::from_utf8_lossy(body).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::TrimRange;

    #[test]
    fn download_body_carries_only_video_quality() {
        let req = DownloadRequest::new(
            "https://x/video",
            OutputFormat::Mp4 {
                max_height: Some(720),
            },
        );
        let id = JobId::new("cand");
        let json = serde_json::to_value(StartDownloadBody::new(&req, &id)).unwrap();
        assert_eq!(json["format"], "mp4");
        assert_eq!(json["quality"], 720);
        assert_eq!(json["download_id"], "cand");
        assert!(json.get("audio_quality").is_none());
        assert!(json.get("start_time").is_none());
    }

    #[test]
    fn download_body_audio_and_trim() {
        let req = DownloadRequest::new(
            "https://x/song",
            OutputFormat::Mp3 {
                bitrate_kbps: Some(320),
            },
        )
        .with_trim(TrimRange::from_inputs(Some("5"), Some("1:30")));
        let id = JobId::new("c");
        let json = serde_json::to_value(StartDownloadBody::new(&req, &id)).unwrap();
        assert_eq!(json["format"], "mp3");
        assert_eq!(json["audio_quality"], 320);
        assert!(json.get("quality").is_none());
        assert_eq!(json["start_time"], "00:05");
        assert_eq!(json["end_time"], "01:30");
    }

    #[test]
    fn started_body_accepts_either_id_field() {
        let a: StartedBody = serde_json::from_str(r#"{"download_id":"abc"}"#).unwrap();
        let b: StartedBody = serde_json::from_str(r#"{"convert_id":"xyz"}"#).unwrap();
        assert_eq!(a.id, "abc");
        assert_eq!(b.id, "xyz");
    }

    #[test]
    fn error_detail_prefers_json_detail() {
        assert_eq!(error_detail(br#"{"detail":"Unsupported URL"}"#), "Unsupported URL");
        assert_eq!(error_detail(b"  Bad Gateway \n"), "Bad Gateway");
        assert_eq!(error_detail(b""), "");
    }
}
