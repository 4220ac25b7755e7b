//! Artifact Upload
//!
//! Ships a checkpoint artifact to S3-compatible object storage with a plain
//! HTTP PUT against the virtual-hosted bucket endpoint. The bucket and
//! region are fixed at construction; the destination key names the object.
//! The bucket must accept unsigned writes (or sit behind a gateway that
//! signs them).

use loadwave_core::{ArtifactUploader, CheckpointError};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors from uploading an artifact.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The artifact file could not be read.
    #[error("failed to read artifact {path}: {source}")]
    ReadArtifact {
        /// Path of the unreadable artifact.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The HTTP request itself failed.
    #[error("upload request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Remote storage answered with a non-success status.
    #[error("remote storage returned status {status}")]
    Status {
        /// The rejected response status.
        status: StatusCode,
    },
}

/// Uploads artifacts to `https://<bucket>.s3.<region>.amazonaws.com/<key>`.
pub struct HttpUploader {
    client: Client,
    bucket: String,
    region: String,
}

impl HttpUploader {
    /// Create an uploader bound to a bucket and region.
    pub fn new(bucket: impl Into<String>, region: impl Into<String>) -> Result<Self, UploadError> {
        let client = Client::builder().timeout(UPLOAD_TIMEOUT).build()?;
        Ok(Self {
            client,
            bucket: bucket.into(),
            region: region.into(),
        })
    }

    fn object_url(&self, key: &str) -> String {
        format!(
            "https://{}.s3.{}.amazonaws.com/{}",
            self.bucket, self.region, key
        )
    }
}

impl ArtifactUploader for HttpUploader {
    fn upload(&self, artifact: &Path, key: &str) -> Result<(), CheckpointError> {
        let body = std::fs::read(artifact).map_err(|source| UploadError::ReadArtifact {
            path: artifact.to_path_buf(),
            source,
        })?;

        let response = self
            .client
            .put(self.object_url(key))
            .header(CONTENT_TYPE, "text/html")
            .body(body)
            .send()
            .map_err(UploadError::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Status { status }.into());
        }
        Ok(())
    }
}
