//! `mdl cancel <kind>`: ask a running `mdl download`/`mdl convert` to cancel.
//!
//! Prints the reply line (`cancelled <id>`, `unconfirmed <id>`, `idle`, ...).

use anyhow::Result;
use mdl_core::control::{default_control_socket_path, ControlCommand, ControlReply};
use mdl_core::job::JobKind;

use crate::cli::control_socket;

pub async fn run_cancel(kind: JobKind, detach: bool) -> Result<()> {
    let path = default_control_socket_path(kind)?;
    let command = if detach {
        ControlCommand::Abandon
    } else {
        ControlCommand::Cancel
    };
    let reply = control_socket::send_command(&path, command)
        .await?
        .unwrap_or(ControlReply::Idle);
    if reply == ControlReply::Unknown {
        anyhow::bail!("the running mdl did not understand {:?}", command.as_str());
    }
    println!("{}", reply);
    Ok(())
}
