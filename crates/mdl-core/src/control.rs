//! Control channel between a running `mdl download`/`mdl convert` and other
//! invocations (e.g. `mdl cancel download`).
//!
//! One socket per job kind under the XDG state dir. Protocol: one command
//! line in, one reply line out.

use std::fmt;
use std::path::PathBuf;

use crate::client::CancelOutcome;
use crate::job::{JobId, JobKind};
use crate::logging::state_dir;

/// Socket path for the running job of `kind` (`$XDG_STATE_HOME/mdl/<kind>.sock`).
pub fn default_control_socket_path(kind: JobKind) -> anyhow::Result<PathBuf> {
    Ok(state_dir()?.join(format!("{}.sock", kind.as_str())))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Ask the service to cancel the job.
    Cancel,
    /// Stop watching the job locally.
    Abandon,
}

impl ControlCommand {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "cancel" => Some(ControlCommand::Cancel),
            "abandon" => Some(ControlCommand::Abandon),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ControlCommand::Cancel => "cancel",
            ControlCommand::Abandon => "abandon",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlReply {
    Idle,
    Cancelled(JobId),
    Unconfirmed(JobId),
    Abandoned,
    /// The command line was not understood.
    Unknown,
}

impl ControlReply {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(' ') {
            Some((w, r)) => (w, r.trim()),
            None => (line, ""),
        };
        match (word, rest) {
            ("idle", "") => Some(ControlReply::Idle),
            ("abandoned", "") => Some(ControlReply::Abandoned),
            ("unknown", "") => Some(ControlReply::Unknown),
            ("cancelled", id) if !id.is_empty() => Some(ControlReply::Cancelled(JobId::new(id))),
            ("unconfirmed", id) if !id.is_empty() => {
                Some(ControlReply::Unconfirmed(JobId::new(id)))
            }
            _ => None,
        }
    }
}

impl From<CancelOutcome> for ControlReply {
    fn from(outcome: CancelOutcome) -> Self {
        match outcome {
            CancelOutcome::Idle => ControlReply::Idle,
            CancelOutcome::Cancelled(id) => ControlReply::Cancelled(id),
            CancelOutcome::Unconfirmed(id) => ControlReply::Unconfirmed(id),
        }
    }
}

impl fmt::Display for ControlReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlReply::Idle => f.write_str("idle"),
            ControlReply::Cancelled(id) => write!(f, "cancelled {}", id),
            ControlReply::Unconfirmed(id) => write!(f, "unconfirmed {}", id),
            ControlReply::Abandoned => f.write_str("abandoned"),
            ControlReply::Unknown => f.write_str("unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sockets_live_next_to_the_log_file() {
        let log = crate::logging::log_file_path().unwrap();
        let socket = default_control_socket_path(JobKind::Convert).unwrap();
        assert_eq!(socket.parent(), log.parent());
    }

    #[test]
    fn commands() {
        assert_eq!(ControlCommand::parse("cancel\n"), Some(ControlCommand::Cancel));
        assert_eq!(ControlCommand::parse(" abandon "), Some(ControlCommand::Abandon));
        assert_eq!(ControlCommand::parse("pause 1"), None);
    }

    #[test]
    fn replies_parse_their_own_output() {
        for reply in [
            ControlReply::Idle,
            ControlReply::Cancelled(JobId::new("abc")),
            ControlReply::Unconfirmed(JobId::new("xyz")),
            ControlReply::Abandoned,
            ControlReply::Unknown,
        ] {
            assert_eq!(ControlReply::parse(&reply.to_string()), Some(reply));
        }
        assert_eq!(ControlReply::parse("cancelled"), None);
        assert_eq!(ControlReply::parse("garbage"), None);
    }

    #[test]
    fn socket_path_is_per_kind() {
        let p = default_control_socket_path(JobKind::Convert).unwrap();
        assert!(p.ends_with("mdl/convert.sock"));
    }
}
