// Content resolution: handle -> (display name, byte stream)
//
// A resolver is the only component that understands what a handle points at.
// Resolution is a single attempt; any failure is terminal for that handle.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::handle::ContentHandle;
use crate::outcome::FailureReason;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("content not found: {handle}")]
    NotFound {
        handle: ContentHandle,
        #[source]
        source: io::Error,
    },
    #[error("no display name for {handle}")]
    NoDisplayName { handle: ContentHandle },
}

impl ResolveError {
    pub fn reason(&self) -> FailureReason {
        match self {
            ResolveError::NotFound { .. } => FailureReason::NotFound,
            ResolveError::NoDisplayName { .. } => FailureReason::NoDisplayName,
        }
    }
}

/// A resolved handle, ready to be copied.
pub struct ResolvedSource {
    pub name: String,
    pub reader: Box<dyn Read>,
}

impl std::fmt::Debug for ResolvedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedSource")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Platform access to content handles.
///
/// Implementations must not touch app storage.
pub trait ContentResolver: Send + Sync {
    /// Open a readable stream. An error means the content is missing or
    /// unreadable.
    fn open(&self, handle: &ContentHandle) -> io::Result<Box<dyn Read>>;

    /// Human-readable name of the content, if the platform knows one.
    fn display_name(&self, handle: &ContentHandle) -> Option<String>;
}

/// Resolve a handle into a name and a stream.
///
/// The stream is opened before the name is queried, so a missing resource is
/// reported as `NotFound` even when it also has no name.
pub fn resolve(
    resolver: &dyn ContentResolver,
    handle: &ContentHandle,
) -> Result<ResolvedSource, ResolveError> {
    let reader = resolver
        .open(handle)
        .map_err(|source| ResolveError::NotFound {
            handle: handle.clone(),
            source,
        })?;

    let name = resolver
        .display_name(handle)
        .filter(|name| is_valid_display_name(name))
        .ok_or_else(|| ResolveError::NoDisplayName {
            handle: handle.clone(),
        })?;

    Ok(ResolvedSource { name, reader })
}

/// A usable display name is exactly one normal path component.
///
/// Anything else would either collide on the storage root itself or land
/// outside of it.
pub fn is_valid_display_name(name: &str) -> bool {
    if name.is_empty() || name.contains(['/', '\\', '\0']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

// ---------------------------------------------------------------------------
// Local filesystem resolver
// ---------------------------------------------------------------------------

/// Resolves `file://` URIs and plain local paths.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsResolver;

impl FsResolver {
    fn path_of(handle: &ContentHandle) -> PathBuf {
        let raw = handle.as_str();
        PathBuf::from(raw.strip_prefix("file://").unwrap_or(raw))
    }
}

impl ContentResolver for FsResolver {
    fn open(&self, handle: &ContentHandle) -> io::Result<Box<dyn Read>> {
        let path = Self::path_of(handle);
        let file = File::open(&path)?;
        if !file.metadata()?.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not a regular file: {}", path.display()),
            ));
        }
        Ok(Box::new(file))
    }

    fn display_name(&self, handle: &ContentHandle) -> Option<String> {
        Self::path_of(handle)
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
    }
}

// ---------------------------------------------------------------------------
// In-memory resolver
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct MemoryEntry {
    name: Option<String>,
    bytes: Arc<[u8]>,
}

/// Serves content the host already holds in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryResolver {
    entries: HashMap<ContentHandle, MemoryEntry>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register content under `handle`. `name` of `None` models a provider
    /// that exposes no display name.
    pub fn insert(
        &mut self,
        handle: impl Into<ContentHandle>,
        name: Option<&str>,
        bytes: impl Into<Vec<u8>>,
    ) {
        let bytes: Vec<u8> = bytes.into();
        self.entries.insert(
            handle.into(),
            MemoryEntry {
                name: name.map(str::to_string),
                bytes: bytes.into(),
            },
        );
    }
}

impl ContentResolver for MemoryResolver {
    fn open(&self, handle: &ContentHandle) -> io::Result<Box<dyn Read>> {
        let entry = self.entries.get(handle).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no content for {handle}"))
        })?;
        Ok(Box::new(Cursor::new(entry.bytes.clone())))
    }

    fn display_name(&self, handle: &ContentHandle) -> Option<String> {
        self.entries.get(handle).and_then(|entry| entry.name.clone())
    }
}
