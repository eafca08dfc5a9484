//! CLI for the MDL media job client.

mod commands;
mod control_socket;
mod presenter;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use mdl_core::config;
use mdl_core::job::JobKind;
use std::path::PathBuf;

use commands::{
    run_cancel, run_completions, run_convert, run_download, run_list, run_man, run_reveal,
    run_scan, DownloadArgs,
};

/// Top-level CLI for the MDL media job client.
#[derive(Debug, Parser)]
#[command(name = "mdl")]
#[command(about = "MDL: download and convert media through a remote job service", long_about = None)]
pub struct Cli {
    /// Base URL of the job service (overrides `service_url` in the config file).
    #[arg(long, global = true, value_name = "URL")]
    pub service_url: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Mp4,
    Mp3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Download,
    Convert,
}

impl From<KindArg> for JobKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Download => JobKind::Download,
            KindArg::Convert => JobKind::Convert,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download a media URL through the service and save the result locally.
    Download {
        /// Media page URL (e.g. a video link).
        url: String,

        /// Output container.
        #[arg(long, value_enum, default_value_t = FormatArg::Mp4)]
        format: FormatArg,

        /// Maximum video height for mp4 (e.g. 720, 1080).
        #[arg(long, value_name = "HEIGHT")]
        quality: Option<u32>,

        /// Audio bitrate in kbps for mp3 (e.g. 192, 320).
        #[arg(long, value_name = "KBPS", conflicts_with = "quality")]
        audio_quality: Option<u32>,

        /// Trim start (seconds, MM:SS or H:MM:SS).
        #[arg(long, value_name = "TIME")]
        start: Option<String>,

        /// Trim end (seconds, MM:SS or H:MM:SS).
        #[arg(long, value_name = "TIME")]
        end: Option<String>,

        /// Directory for the saved file (default: config `download_dir`, then the current directory).
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Replace an existing file instead of saving as `name (n).ext`.
        #[arg(long)]
        overwrite: bool,
    },

    /// Convert a file in the service's download folder.
    Convert {
        /// File name as listed by `mdl list`.
        filename: String,
    },

    /// Cancel the job of a running `mdl download` or `mdl convert`.
    Cancel {
        #[arg(value_enum)]
        kind: KindArg,

        /// Only stop watching locally; the service keeps working on the job.
        #[arg(long)]
        detach: bool,
    },

    /// Show title and duration of a media URL without starting a job.
    Scan {
        url: String,
    },

    /// List files in the service's download folder.
    List,

    /// Reveal a file in the service host's file manager.
    Reveal {
        /// Path as shown by `mdl list`.
        path: String,
    },

    /// Print shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the man page.
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        // Generators need no config or service.
        match cli.command {
            CliCommand::Completions { shell } => return run_completions(shell),
            CliCommand::Man => return run_man(),
            _ => {}
        }

        let mut cfg = config::load_or_init()?;
        if let Some(url) = cli.service_url {
            cfg.service_url = url;
        }
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Download {
                url,
                format,
                quality,
                audio_quality,
                start,
                end,
                output_dir,
                overwrite,
            } => {
                let args = DownloadArgs {
                    url,
                    format,
                    quality,
                    audio_quality,
                    start,
                    end,
                    output_dir,
                    overwrite,
                };
                run_download(&cfg, args).await?
            }
            CliCommand::Convert { filename } => run_convert(&cfg, &filename).await?,
            CliCommand::Cancel { kind, detach } => run_cancel(kind.into(), detach).await?,
            CliCommand::Scan { url } => run_scan(&cfg, &url).await?,
            CliCommand::List => run_list(&cfg).await?,
            CliCommand::Reveal { path } => run_reveal(&cfg, &path).await?,
            CliCommand::Completions { .. } | CliCommand::Man => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
