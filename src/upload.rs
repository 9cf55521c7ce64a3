//! # upload: object-store seam for the hook
//!
//! The hook only needs one thing from storage: take an open file and put it
//! under a bucket/key. That contract is the [`Uploader`] trait.
//!
//! - [`s3::S3Uploader`] is the production implementation on top of `aws-sdk-s3`.
//! - `MockUploader` is generated by `mockall` for tests; it is exported with the
//!   default `test-export-mocks` feature so integration tests can use it too.

use async_trait::async_trait;

pub mod s3;

/// Boxed error returned by uploader implementations.
pub type UploadError = Box<dyn std::error::Error + Send + Sync>;

/// A single file to store.
///
/// The uploader takes ownership of the handle, so the file is closed once
/// `upload` returns whichever way it went.
#[derive(Debug)]
pub struct UploadRequest {
    pub bucket: String,
    pub key: String,
    pub file: tokio::fs::File,
    /// Size of the file in bytes at open time.
    pub size: u64,
}

/// What the store reported back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub key: String,
    pub e_tag: Option<String>,
    /// 1 for a plain PUT, otherwise the number of multipart parts.
    pub parts: usize,
}

/// Stores files in an object bucket.
#[cfg_attr(any(test, feature = "test-export-mocks"), mockall::automock)]
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Upload the whole file to `req.bucket`/`req.key`.
    async fn upload(&self, req: UploadRequest) -> Result<UploadReceipt, UploadError>;
}
