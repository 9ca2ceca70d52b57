// scratch-import: Project import pipeline for Scratch Everywhere
//
// Takes content handles handed over by the platform (share sheet, document
// picker, multi-select share), resolves each to a name and a byte stream, and
// copies it into the app's project directory. Existing files are only
// replaced after the host confirms.

pub mod config;
pub mod coordinator;
pub mod copy;
pub mod handle;
pub mod outcome;
pub mod resolver;
pub mod storage;

pub use config::{ConflictStrategy, CopyFailurePolicy, ImportConfig};
pub use coordinator::{ConflictDecision, FixedDecision, ImportTarget, Importer, OverwritePrompt};
pub use handle::{ContentHandle, ImportRequest};
pub use outcome::{FailureReason, ImportOutcome};
pub use resolver::{ContentResolver, FsResolver, MemoryResolver, ResolveError, ResolvedSource, resolve};
pub use storage::{ProjectEntry, ProjectKind, list_projects};
