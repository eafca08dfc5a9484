//! `mdl convert`: re-encode a file already in the service's download folder.

use anyhow::Result;
use mdl_core::artifact::DirectorySink;
use mdl_core::config::MdlConfig;
use mdl_core::job::ConvertRequest;
use mdl_core::{JobKind, JobOutcome};
use std::sync::Arc;

use super::job::{drive, job_client, outcome_report};

pub async fn run_convert(cfg: &MdlConfig, filename: &str) -> Result<()> {
    // Conversions leave their result on the service; the sink is never used.
    let sink = DirectorySink::new(std::env::current_dir()?);
    let client = job_client(cfg, Arc::new(sink))?;

    let outcome = drive(&client, ConvertRequest::new(filename).into()).await?;
    match outcome {
        JobOutcome::Converted => println!("conversion of {} finished", filename.trim()),
        other => println!("{}", outcome_report(JobKind::Convert, &other)),
    }
    Ok(())
}
