//! Fatal failures of a single hook invocation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Every way a hook run can abort before (or while) uploading.
///
/// A failed local delete after a successful upload is deliberately absent:
/// it is reported through [`crate::hook::LocalCleanup::Failed`] instead.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("invalid number of arguments: expected {expected}, got {actual}")]
    ArgumentCount { expected: usize, actual: usize },

    #[error("S3 bucket name not specified, set {variable}")]
    MissingBucket { variable: &'static str },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to open log file {}: {source}", .path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("computed object key {key:?} is not usable")]
    InvalidObjectKey { key: String },

    #[error("failed to upload s3://{bucket}/{key}: {source}")]
    Upload {
        bucket: String,
        key: String,
        #[source]
        source: crate::upload::UploadError,
    },
}

impl HookError {
    /// Process exit status for this failure.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::ArgumentCount { .. }
            | Self::MissingBucket { .. }
            | Self::InvalidConfig(_)
            | Self::OpenFile { .. }
            | Self::InvalidObjectKey { .. }
            | Self::Upload { .. } => 1,
        }
    }

    /// Short machine-readable tag, logged as `kind` on the error event.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ArgumentCount { .. } => "argument_count",
            Self::MissingBucket { .. } => "missing_bucket",
            Self::InvalidConfig(_) => "invalid_config",
            Self::OpenFile { .. } => "open_file",
            Self::InvalidObjectKey { .. } => "invalid_object_key",
            Self::Upload { .. } => "upload",
        }
    }
}
