//! Immutable job requests, fixed when a job is created.

use crate::client::JobError;
use crate::time_format::{normalize_time_input, parse_timecode};

use super::JobKind;

/// Output container plus its quality selector. Video height and audio bitrate
/// are mutually exclusive, so each lives on its own variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Video; optional maximum height tier (e.g. 720, 1080).
    Mp4 { max_height: Option<u32> },
    /// Audio only; optional bitrate tier in kbps (e.g. 192, 320).
    Mp3 { bitrate_kbps: Option<u32> },
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Mp4 { .. } => "mp4",
            OutputFormat::Mp3 { .. } => "mp3",
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Mp4 { max_height: None }
    }
}

/// Optional sub-interval of the media, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrimRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl TrimRange {
    /// Builds a range from raw inputs. Each point is normalized; blank inputs
    /// become absent.
    pub fn from_inputs(start: Option<&str>, end: Option<&str>) -> Self {
        let clean = |v: Option<&str>| {
            v.map(normalize_time_input)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        Self {
            start: clean(start),
            end: clean(end),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub format: OutputFormat,
    pub trim: TrimRange,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>, format: OutputFormat) -> Self {
        Self {
            url: url.into().trim().to_string(),
            format,
            trim: TrimRange::default(),
        }
    }

    pub fn with_trim(mut self, trim: TrimRange) -> Self {
        self.trim = trim;
        self
    }
}

/// Re-encodes a file the service already produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertRequest {
    pub filename: String,
}

impl ConvertRequest {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into().trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobRequest {
    Download(DownloadRequest),
    Convert(ConvertRequest),
}

impl JobRequest {
    pub fn kind(&self) -> JobKind {
        match self {
            JobRequest::Download(_) => JobKind::Download,
            JobRequest::Convert(_) => JobKind::Convert,
        }
    }

    /// Output format of a download; `None` for conversions.
    pub fn output_format(&self) -> Option<OutputFormat> {
        match self {
            JobRequest::Download(d) => Some(d.format),
            JobRequest::Convert(_) => None,
        }
    }

    /// Checks the request before any network interaction.
    pub fn validate(&self) -> Result<(), JobError> {
        match self {
            JobRequest::Download(d) => {
                if d.url.trim().is_empty() {
                    return Err(JobError::Validation("a media URL is required".into()));
                }
                let start = d.trim.start.as_deref().and_then(parse_timecode);
                let end = d.trim.end.as_deref().and_then(parse_timecode);
                if let (Some(start), Some(end)) = (start, end) {
                    if end <= start {
                        return Err(JobError::Validation(
                            "end time must be after start time".into(),
                        ));
                    }
                }
                Ok(())
            }
            JobRequest::Convert(c) => {
                if c.filename.trim().is_empty() {
                    return Err(JobError::Validation("a filename is required".into()));
                }
                Ok(())
            }
        }
    }
}

impl From<DownloadRequest> for JobRequest {
    fn from(r: DownloadRequest) -> Self {
        JobRequest::Download(r)
    }
}

impl From<ConvertRequest> for JobRequest {
    fn from(r: ConvertRequest) -> Self {
        JobRequest::Convert(r)
    }
}
