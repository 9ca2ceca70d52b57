// Import outcomes reported back to the host, one per handle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The content was missing or unreadable when opened.
    NotFound,
    /// Reading the source or writing the destination failed.
    IoError,
    /// The provider exposed no usable file name.
    NoDisplayName,
}

impl FailureReason {
    /// User-facing error message for this reason.
    pub fn message(self) -> &'static str {
        match self {
            FailureReason::NotFound => "The selected file could not be found.",
            FailureReason::IoError => "The file could not be read or saved.",
            FailureReason::NoDisplayName => "The selected file has no name.",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureReason::NotFound => "not found",
            FailureReason::IoError => "I/O error",
            FailureReason::NoDisplayName => "no display name",
        };
        f.write_str(s)
    }
}

/// Terminal result of importing one handle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImportOutcome {
    Success { name: String, path: PathBuf },
    Cancelled,
    Failed { reason: FailureReason },
}

impl ImportOutcome {
    pub fn failed(reason: FailureReason) -> Self {
        ImportOutcome::Failed { reason }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ImportOutcome::Success { .. })
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            ImportOutcome::Success { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn reason(&self) -> Option<FailureReason> {
        match self {
            ImportOutcome::Failed { reason } => Some(*reason),
            _ => None,
        }
    }

    /// The single notification the host shows for this outcome.
    pub fn notice(&self) -> String {
        match self {
            ImportOutcome::Success { name, .. } => format!("Imported {name}"),
            ImportOutcome::Cancelled => "Import cancelled".to_string(),
            ImportOutcome::Failed { reason } => reason.message().to_string(),
        }
    }
}
