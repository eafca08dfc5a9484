//! `mdl list` and `mdl reveal`: the service's download folder.

use anyhow::{Context, Result};
use mdl_core::config::MdlConfig;
use mdl_core::service::{DownloadedFile, FileCategory};

use super::http_service;

pub async fn run_list(cfg: &MdlConfig) -> Result<()> {
    let service = http_service(cfg)?;
    let files = tokio::task::spawn_blocking(move || service.list_downloads())
        .await
        .context("list task join")?
        .context("listing downloads failed")?;

    if files.is_empty() {
        println!("no downloads");
        return Ok(());
    }
    for f in &files {
        println!("{}", list_line(f));
    }
    Ok(())
}

fn list_line(f: &DownloadedFile) -> String {
    let tag = match f.category {
        FileCategory::Video => "video",
        FileCategory::Audio => "audio",
        FileCategory::File => "file",
    };
    format!("{:<5}  {:>10}  {}  {}", tag, f.size, f.created_at, f.filename)
}

pub async fn run_reveal(cfg: &MdlConfig, path: &str) -> Result<()> {
    let service = http_service(cfg)?;
    let path = path.to_string();
    tokio::task::spawn_blocking(move || service.reveal(&path))
        .await
        .context("reveal task join")?
        .context("reveal failed")?;
    println!("opened on the service host");
    Ok(())
}
