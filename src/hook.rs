//! The post-rotation pipeline: open → derive key → upload → optional delete.

use std::path::Path;

use tokio::fs::File;
use tracing::{error, info};

use crate::config::HookConfig;
use crate::error::HookError;
use crate::invocation::Invocation;
use crate::object_key::{is_usable, object_key};
use crate::upload::{UploadReceipt, UploadRequest, Uploader};

/// What happened to the local file after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalCleanup {
    /// Deletion is not enabled; the file was left in place.
    Kept,
    Deleted,
    /// Deletion was attempted and failed. The run still counts as a success.
    Failed(String),
}

#[derive(Debug)]
pub struct HookOutcome {
    pub receipt: UploadReceipt,
    pub cleanup: LocalCleanup,
}

/// Uploads the rotated file described by `invocation` and, when configured,
/// removes it afterwards.
///
/// The open handle is moved into the uploader, so it is already closed by the
/// time the delete runs.
pub async fn upload_rotated_file<U>(
    config: &HookConfig,
    invocation: &Invocation,
    uploader: &U,
) -> Result<HookOutcome, HookError>
where
    U: Uploader + ?Sized,
{
    let path = &invocation.log_file_path;
    let open_failed = |source: std::io::Error| {
        let err = HookError::OpenFile {
            path: path.clone(),
            source,
        };
        error!(kind = err.kind(), error = %err, "Failed to open log file");
        err
    };
    let file = File::open(path).await.map_err(open_failed)?;
    let size = file.metadata().await.map_err(open_failed)?.len();

    let key = object_key(config.key_mode, &config.key_prefix, &invocation.log_file_name);
    if !is_usable(&key) {
        let err = HookError::InvalidObjectKey { key };
        error!(kind = err.kind(), error = %err, "Computed object key is not usable");
        return Err(err);
    }

    info!(key = %key, size, "Uploading file to S3");
    let request = UploadRequest {
        bucket: config.bucket.clone(),
        key: key.clone(),
        file,
        size,
    };
    let receipt = match uploader.upload(request).await {
        Ok(receipt) => receipt,
        Err(source) => {
            let err = HookError::Upload {
                bucket: config.bucket.clone(),
                key,
                source,
            };
            error!(kind = err.kind(), error = %err, "Failed to upload file to S3");
            return Err(err);
        }
    };
    info!(
        key = %receipt.key,
        e_tag = receipt.e_tag.as_deref().unwrap_or(""),
        parts = receipt.parts,
        "File uploaded successfully"
    );

    let cleanup = if config.delete_on_success {
        remove_local(path).await
    } else {
        LocalCleanup::Kept
    };

    Ok(HookOutcome { receipt, cleanup })
}

async fn remove_local(path: &Path) -> LocalCleanup {
    info!(path = %path.display(), "Deleting local log file");
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            info!("Local log file deleted successfully");
            LocalCleanup::Deleted
        }
        Err(e) => {
            error!(error = %e, path = %path.display(), "Failed to delete local log file");
            LocalCleanup::Failed(e.to_string())
        }
    }
}
