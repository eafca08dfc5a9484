//! `mdl download`: fetch a media URL through the service and save it locally.

use anyhow::{bail, Result};
use mdl_core::artifact::DirectorySink;
use mdl_core::config::MdlConfig;
use mdl_core::job::{DownloadRequest, OutputFormat, TrimRange};
use mdl_core::JobKind;
use std::path::PathBuf;
use std::sync::Arc;

use super::job::{drive, job_client, outcome_report};
use crate::cli::FormatArg;

#[derive(Debug)]
pub struct DownloadArgs {
    pub url: String,
    pub format: FormatArg,
    pub quality: Option<u32>,
    pub audio_quality: Option<u32>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub overwrite: bool,
}

/// Quality flags must match the container: height for mp4, bitrate for mp3.
pub(crate) fn output_format(
    format: FormatArg,
    quality: Option<u32>,
    audio_quality: Option<u32>,
) -> Result<OutputFormat> {
    match format {
        FormatArg::Mp4 => {
            if audio_quality.is_some() {
                bail!("--audio-quality only applies to --format mp3");
            }
            Ok(OutputFormat::Mp4 {
                max_height: quality,
            })
        }
        FormatArg::Mp3 => {
            if quality.is_some() {
                bail!("--quality only applies to --format mp4");
            }
            Ok(OutputFormat::Mp3 {
                bitrate_kbps: audio_quality,
            })
        }
    }
}

pub async fn run_download(cfg: &MdlConfig, args: DownloadArgs) -> Result<()> {
    let format = output_format(args.format, args.quality, args.audio_quality)?;
    let trim = TrimRange::from_inputs(args.start.as_deref(), args.end.as_deref());
    let request = DownloadRequest::new(args.url, format).with_trim(trim);

    let dir = match args.output_dir.or_else(|| cfg.download_dir.clone()) {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let sink = DirectorySink::new(dir).overwrite(args.overwrite);
    let client = job_client(cfg, Arc::new(sink))?;

    let outcome = drive(&client, request.into()).await?;
    println!("{}", outcome_report(JobKind::Download, &outcome));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_flags_follow_format() {
        assert_eq!(
            output_format(FormatArg::Mp4, Some(720), None).unwrap(),
            OutputFormat::Mp4 {
                max_height: Some(720)
            }
        );
        assert_eq!(
            output_format(FormatArg::Mp3, None, Some(320)).unwrap(),
            OutputFormat::Mp3 {
                bitrate_kbps: Some(320)
            }
        );
        assert!(output_format(FormatArg::Mp4, None, Some(320)).is_err());
        assert!(output_format(FormatArg::Mp3, Some(720), None).is_err());
    }
}
