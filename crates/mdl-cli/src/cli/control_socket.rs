//! Control socket: server (during `mdl download`/`mdl convert`) and client
//! (for `mdl cancel`). One command line in, one reply line out.

use anyhow::Result;
use mdl_core::control::{ControlCommand, ControlReply};
use mdl_core::job::JobKind;
use mdl_core::JobClient;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};

/// Binds `path` and answers control commands for the `kind` job of `client`.
/// Refuses when another process still accepts connections on `path`; a stale
/// socket left by an exited mdl is replaced.
pub async fn spawn_control_listener(
    client: JobClient,
    kind: JobKind,
    path: &Path,
) -> Result<tokio::task::JoinHandle<()>> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    if path.exists() {
        if UnixStream::connect(path).await.is_ok() {
            anyhow::bail!("another mdl is serving {}", path.display());
        }
        std::fs::remove_file(path)?;
    }
    let listener = UnixListener::bind(path)?;
    tracing::debug!(path = %path.display(), "control socket listening");

    let handle = tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, _)) => {
                    let client = client.clone();
                    tokio::spawn(async move {
                        if let Err(e) = serve(stream, &client, kind).await {
                            tracing::debug!("control connection: {}", e);
                        }
                    });
                }
                Err(e) => tracing::debug!("control socket accept: {}", e),
            }
        }
    });
    Ok(handle)
}

async fn serve(stream: UnixStream, client: &JobClient, kind: JobKind) -> std::io::Result<()> {
    let (read, mut write) = stream.into_split();
    let mut lines = BufReader::new(read).lines();
    while let Some(line) = lines.next_line().await? {
        let reply = match ControlCommand::parse(&line) {
            Some(ControlCommand::Cancel) => ControlReply::from(client.cancel_job(kind).await),
            Some(ControlCommand::Abandon) => {
                if client.abandon(kind) {
                    ControlReply::Abandoned
                } else {
                    ControlReply::Idle
                }
            }
            None => ControlReply::Unknown,
        };
        write.write_all(format!("{}\n", reply).as_bytes()).await?;
    }
    Ok(())
}

/// Sends `command` and returns the reply. `None` when nothing is listening.
pub async fn send_command(socket_path: &Path, command: ControlCommand) -> Result<Option<ControlReply>> {
    if !socket_path.exists() {
        return Ok(None);
    }
    let stream = match UnixStream::connect(socket_path).await {
        Ok(s) => s,
        // Stale socket of an mdl that has exited.
        Err(e) if e.kind() == std::io::ErrorKind::ConnectionRefused => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let (read, mut write) = stream.into_split();
    write
        .write_all(format!("{}\n", command.as_str()).as_bytes())
        .await?;
    let mut lines = BufReader::new(read).lines();
    let reply = lines.next_line().await?;
    Ok(reply.as_deref().and_then(ControlReply::parse))
}
