//! CLI command handlers, one per file.

mod cancel;
mod convert;
mod download;
mod generate;
mod job;
mod library;
mod scan;

pub use cancel::run_cancel;
pub use convert::run_convert;
pub use download::{run_download, DownloadArgs};
pub use generate::{run_completions, run_man};
pub use library::{run_list, run_reveal};
pub use scan::run_scan;

use anyhow::Result;
use mdl_core::config::MdlConfig;
use mdl_core::service::HttpJobService;

/// Service client for the configured base URL.
pub(crate) fn http_service(cfg: &MdlConfig) -> Result<HttpJobService> {
    HttpJobService::new(&cfg.service_url, cfg.http_timeouts())
}
