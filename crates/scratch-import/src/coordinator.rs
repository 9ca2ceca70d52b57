// Import coordinator
//
// Drives every handle of a batch through resolve -> conflict check ->
// (confirm) -> copy and turns each into exactly one ImportOutcome. Items are
// processed one at a time, in input order, and never affect each other.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::{ConflictStrategy, ImportConfig};
use crate::copy::copy_to_file;
use crate::handle::{ContentHandle, ImportRequest};
use crate::outcome::{FailureReason, ImportOutcome};
use crate::resolver::{ContentResolver, ResolvedSource, is_valid_display_name, resolve};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConflictDecision {
    Overwrite,
    Cancel,
}

/// Where a resolved handle will be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportTarget {
    pub display_name: String,
    pub destination: PathBuf,
}

/// Host capability that asks the user whether to replace an existing file.
///
/// Called synchronously; the item being imported waits for the answer.
pub trait OverwritePrompt {
    fn confirm(&mut self, target: &ImportTarget) -> ConflictDecision;
}

impl<F> OverwritePrompt for F
where
    F: FnMut(&ImportTarget) -> ConflictDecision,
{
    fn confirm(&mut self, target: &ImportTarget) -> ConflictDecision {
        self(target)
    }
}

/// Answers every prompt the same way without asking anyone.
#[derive(Debug, Clone, Copy)]
pub struct FixedDecision(pub ConflictDecision);

impl OverwritePrompt for FixedDecision {
    fn confirm(&mut self, _target: &ImportTarget) -> ConflictDecision {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Importer
// ---------------------------------------------------------------------------

pub struct Importer<R> {
    resolver: R,
    config: ImportConfig,
}

impl<R: ContentResolver> Importer<R> {
    /// Create an importer writing into `config.storage_root`, creating the
    /// directory if needed.
    pub fn new(resolver: R, config: ImportConfig) -> Result<Self> {
        config.validate()?;
        std::fs::create_dir_all(&config.storage_root).with_context(|| {
            format!("failed to create storage root {}", config.storage_root.display())
        })?;
        Ok(Self { resolver, config })
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Destination for `display_name`, or `None` if the name would not land
    /// directly under the storage root.
    pub fn target(&self, display_name: &str) -> Option<ImportTarget> {
        if !is_valid_display_name(display_name) {
            return None;
        }
        Some(ImportTarget {
            display_name: display_name.to_string(),
            destination: self.config.storage_root.join(display_name),
        })
    }

    /// Import everything a host request carried.
    pub fn import_request(
        &self,
        request: ImportRequest,
        prompt: &mut dyn OverwritePrompt,
    ) -> Vec<ImportOutcome> {
        self.import_batch(&request.into_handles(), prompt)
    }

    /// Import `handles` in order. The result has one outcome per handle, at
    /// the same index.
    pub fn import_batch(
        &self,
        handles: &[ContentHandle],
        prompt: &mut dyn OverwritePrompt,
    ) -> Vec<ImportOutcome> {
        let mut batch = BatchState::default();
        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            outcomes.push(self.import_item(handle, prompt, &mut batch));
        }

        let imported = outcomes.iter().filter(|o| o.is_success()).count();
        log::info!("Imported {}/{} item(s)", imported, outcomes.len());
        outcomes
    }

    /// Import a single handle.
    pub fn import_one(&self, handle: &ContentHandle, prompt: &mut dyn OverwritePrompt) -> ImportOutcome {
        self.import_item(handle, prompt, &mut BatchState::default())
    }

    fn import_item(
        &self,
        handle: &ContentHandle,
        prompt: &mut dyn OverwritePrompt,
        batch: &mut BatchState,
    ) -> ImportOutcome {
        log::info!("Received import handle: {}", handle);

        let ResolvedSource { name, mut reader } = match resolve(&self.resolver, handle) {
            Ok(source) => source,
            Err(e) => {
                log::warn!("Failed to resolve {}: {}", handle, e);
                return ImportOutcome::failed(e.reason());
            }
        };

        let Some(target) = self.target(&name) else {
            return ImportOutcome::failed(FailureReason::NoDisplayName);
        };
        // A dangling symlink still occupies the name
        if std::fs::symlink_metadata(&target.destination).is_ok() {
            match self.decide(&target, prompt, batch) {
                ConflictDecision::Cancel => {
                    log::info!("Import of {} cancelled", name);
                    return ImportOutcome::Cancelled;
                }
                ConflictDecision::Overwrite => log::info!("Overwriting file {}", name),
            }
        }

        match copy_to_file(
            &mut *reader,
            &target.destination,
            self.config.chunk_size,
            self.config.on_copy_failure,
        ) {
            Ok(bytes) => {
                log::info!("Imported {} ({} bytes)", target.destination.display(), bytes);
                ImportOutcome::Success {
                    name,
                    path: target.destination,
                }
            }
            Err(e) => {
                log::error!("I/O error importing {}: {}", name, e);
                ImportOutcome::failed(FailureReason::IoError)
            }
        }
    }

    fn decide(
        &self,
        target: &ImportTarget,
        prompt: &mut dyn OverwritePrompt,
        batch: &mut BatchState,
    ) -> ConflictDecision {
        match self.config.conflict_strategy {
            ConflictStrategy::PerItem => prompt.confirm(target),
            ConflictStrategy::ApplyToAll => *batch
                .remembered
                .get_or_insert_with(|| prompt.confirm(target)),
        }
    }
}

/// Per-batch memory, reset for every `import_batch` call.
#[derive(Debug, Default)]
struct BatchState {
    remembered: Option<ConflictDecision>,
}
