//! Checkpoint Export Seams
//!
//! Traits implemented by the reporting layer. The core treats rendering and
//! uploading as black boxes: a sink turns a snapshot into an artifact file,
//! an uploader ships that file to remote storage. Both run synchronously on
//! the worker thread that crossed a checkpoint boundary.

use crate::outcome::Buckets;
use std::path::{Path, PathBuf};

/// Error raised by a report sink or uploader at a checkpoint.
///
/// Checkpoint failures are logged and never abort the run, so a boxed error
/// at this seam keeps the reporting layer free to use its own error types.
pub type CheckpointError = Box<dyn std::error::Error + Send + Sync>;

/// Presentation options passed to a report sink.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Base name of the artifact file, without extension.
    pub file_name: String,
    /// Report headline.
    pub header: String,
    /// Free-form description shown under the headline.
    pub description: String,
}

/// Renders a snapshot of accumulated results into an artifact file.
///
/// Invoked with a full snapshot at each checkpoint; must be safe to call
/// repeatedly and from any worker thread. Rendering the same snapshot twice
/// produces equivalent artifacts.
pub trait ReportSink: Send + Sync {
    /// Render `snapshot` and return the path of the written artifact.
    fn render(&self, snapshot: &Buckets, options: &ReportOptions) -> Result<PathBuf, CheckpointError>;
}

/// Uploads an artifact file to remote storage.
///
/// The destination bucket and region are fixed when the uploader is
/// constructed; `key` names the remote object.
pub trait ArtifactUploader: Send + Sync {
    /// Upload the file at `artifact` under the given destination key.
    fn upload(&self, artifact: &Path, key: &str) -> Result<(), CheckpointError>;
}
