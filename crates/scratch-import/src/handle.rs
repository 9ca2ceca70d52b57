// Content handles and inbound import requests.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque reference to a byte source outside app storage.
///
/// On Android this is a `content://` URI handed over by a share sheet or a
/// document picker. The pipeline never interprets it; only a
/// [`ContentResolver`](crate::ContentResolver) does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHandle(String);

impl ContentHandle {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentHandle {
    fn from(uri: &str) -> Self {
        Self::new(uri)
    }
}

impl From<String> for ContentHandle {
    fn from(uri: String) -> Self {
        Self(uri)
    }
}

/// How the host received the handles.
///
/// All three kinds are imported the same way: as a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "handles", rename_all = "snake_case")]
pub enum ImportRequest {
    /// "Open with" on a single document
    View(ContentHandle),
    /// Single-item share
    Send(ContentHandle),
    /// Multi-select share
    SendMultiple(Vec<ContentHandle>),
}

impl ImportRequest {
    pub fn into_handles(self) -> Vec<ContentHandle> {
        match self {
            ImportRequest::View(handle) | ImportRequest::Send(handle) => vec![handle],
            ImportRequest::SendMultiple(handles) => handles,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ImportRequest::View(_) | ImportRequest::Send(_) => 1,
            ImportRequest::SendMultiple(handles) => handles.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
