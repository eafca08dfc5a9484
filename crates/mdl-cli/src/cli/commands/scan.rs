//! `mdl scan`: show what the service knows about a media URL.

use anyhow::{Context, Result};
use mdl_core::config::MdlConfig;
use mdl_core::time_format::{format_duration, time_placeholder};

use super::http_service;

pub async fn run_scan(cfg: &MdlConfig, url: &str) -> Result<()> {
    let service = http_service(cfg)?;
    let url = url.to_string();
    let info = tokio::task::spawn_blocking(move || service.scan(&url))
        .await
        .context("scan task join")?
        .context("scan failed")?;

    let (example, pattern) = time_placeholder(info.duration);
    println!("{}", info.title);
    println!("  duration  {}", format_duration(info.duration));
    println!("  trim as   {} (e.g. --start {})", pattern, example);
    if let Some(page) = info.webpage_url {
        println!("  page      {}", page);
    }
    if let Some(thumb) = info.thumbnail {
        println!("  thumbnail {}", thumb);
    }
    Ok(())
}
