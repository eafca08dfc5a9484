//! Job kinds and opaque job identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which kind of work a job performs. Selects endpoints, poll cadence, and
/// whether an artifact is fetched on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    Download,
    Convert,
}

impl JobKind {
    pub const ALL: [JobKind; 2] = [JobKind::Download, JobKind::Convert];

    pub fn as_str(self) -> &'static str {
        match self {
            JobKind::Download => "download",
            JobKind::Convert => "convert",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "download" => Some(JobKind::Download),
            "convert" => Some(JobKind::Convert),
            _ => None,
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque job token. The service is the source of truth; a client-generated
/// id is only a candidate sent with the start call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh candidate id for a start call.
    pub fn candidate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_round_trip() {
        for kind in JobKind::ALL {
            assert_eq!(JobKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(JobKind::parse("upload"), None);
    }

    #[test]
    fn candidates_are_unique() {
        let a = JobId::candidate();
        let b = JobId::candidate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
    }
}
