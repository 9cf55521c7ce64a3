//! `aws-sdk-s3` backed [`Uploader`].
//!
//! Credentials and region come from the SDK's default provider chain
//! (environment, shared profile, container/instance metadata). A custom
//! endpoint and path-style addressing can be layered on top for
//! S3-compatible stores such as MinIO.
//!
//! Files that fit in one part go out as a single streamed `PutObject`.
//! Bigger files are sent as a sequential multipart upload, which is aborted if
//! any step fails so no orphaned parts are left behind.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use aws_sdk_s3::Client;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};

use super::{UploadError, UploadReceipt, UploadRequest, Uploader};
use crate::config::HookConfig;

/// Smallest part S3 accepts (except for the last one).
pub const MIN_PART_SIZE: u64 = 5 * 1024 * 1024;

/// Upper bound on parts in one multipart upload.
pub const MAX_PARTS: u64 = 10_000;

/// Part size for a file of `size` bytes.
///
/// Stays at [`MIN_PART_SIZE`] unless that would need more than
/// [`MAX_PARTS`] parts.
pub fn part_size_for(size: u64) -> u64 {
    if size / MIN_PART_SIZE >= MAX_PARTS {
        size / MAX_PARTS + 1
    } else {
        MIN_PART_SIZE
    }
}

/// A failed S3 request.
///
/// The SDK's own `Display` only names the failure category ("dispatch
/// failure", "service error"), so the whole cause chain is rendered into
/// `detail` when the error is caught.
#[derive(Debug, Error)]
#[error("{operation} failed: {detail}")]
pub struct S3CallError {
    pub operation: &'static str,
    pub detail: String,
}

fn call_failed<E>(operation: &'static str) -> impl FnOnce(E) -> UploadError
where
    E: std::error::Error,
{
    move |err: E| -> UploadError {
        Box::new(S3CallError {
            operation,
            detail: DisplayErrorContext(&err).to_string(),
        })
    }
}

/// S3 client settings: `shared` plus the hook's endpoint and addressing overrides.
pub fn client_config(shared: &SdkConfig, config: &HookConfig) -> aws_sdk_s3::Config {
    let mut builder =
        aws_sdk_s3::config::Builder::from(shared).force_path_style(config.use_path_style);
    if let Some(endpoint) = &config.endpoint_url {
        builder = builder.endpoint_url(endpoint);
    }
    builder.build()
}

pub struct S3Uploader {
    client: Client,
}

impl S3Uploader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from the default AWS chain plus the hook's endpoint overrides.
    pub async fn from_config(config: &HookConfig) -> Self {
        let shared = aws_config::load_defaults(BehaviorVersion::latest()).await;

        let region = shared
            .region()
            .map(|r| r.to_string())
            .unwrap_or_else(|| "unset".to_owned());
        info!(
            region = %region,
            s3_endpoint_url = config.endpoint_url.as_deref().unwrap_or("default"),
            s3_use_path_style = config.use_path_style,
            "Initialized S3 client"
        );
        Self::new(Client::from_conf(client_config(&shared, config)))
    }

    async fn put_single(&self, req: UploadRequest) -> Result<UploadReceipt, UploadError> {
        let UploadRequest {
            bucket,
            key,
            file,
            size,
        } = req;
        debug!(bucket = %bucket, key = %key, size, "Streaming object with PutObject");

        let body = ByteStream::read_from()
            .file(file)
            .build()
            .await
            .map_err(call_failed("reading log file"))?;
        let output = self
            .client
            .put_object()
            .bucket(&bucket)
            .key(&key)
            .body(body)
            .send()
            .await
            .map_err(call_failed("PutObject"))?;

        Ok(UploadReceipt {
            key,
            e_tag: output.e_tag().map(str::to_owned),
            parts: 1,
        })
    }

    async fn put_multipart(
        &self,
        req: UploadRequest,
        part_size: u64,
    ) -> Result<UploadReceipt, UploadError> {
        let UploadRequest {
            bucket,
            key,
            mut file,
            size,
        } = req;

        let create = self
            .client
            .create_multipart_upload()
            .bucket(&bucket)
            .key(&key)
            .send()
            .await
            .map_err(call_failed("CreateMultipartUpload"))?;
        let upload_id = create
            .upload_id()
            .ok_or("CreateMultipartUpload returned no upload id")?
            .to_owned();
        info!(key = %key, upload_id = %upload_id, size, part_size, "Started multipart upload");

        match self
            .send_parts_and_complete(&bucket, &key, &upload_id, &mut file, size, part_size)
            .await
        {
            Ok(receipt) => Ok(receipt),
            Err(e) => {
                warn!(error = %e, upload_id = %upload_id, "Multipart upload failed, aborting");
                if let Err(abort_err) = self
                    .client
                    .abort_multipart_upload()
                    .bucket(&bucket)
                    .key(&key)
                    .upload_id(&upload_id)
                    .send()
                    .await
                {
                    warn!(
                        error = %DisplayErrorContext(&abort_err),
                        upload_id = %upload_id,
                        "Abort of multipart upload failed"
                    );
                }
                Err(e)
            }
        }
    }

    async fn send_parts_and_complete(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        file: &mut tokio::fs::File,
        size: u64,
        part_size: u64,
    ) -> Result<UploadReceipt, UploadError> {
        let mut parts = Vec::new();
        let mut part_number: i32 = 1;
        let mut uploaded: u64 = 0;

        while uploaded < size {
            let chunk_len = (size - uploaded).min(part_size);
            let mut buf = vec![0u8; usize::try_from(chunk_len)?];
            file.read_exact(&mut buf).await?;

            let output = self
                .client
                .upload_part()
                .bucket(bucket)
                .key(key)
                .upload_id(upload_id)
                .part_number(part_number)
                .body(ByteStream::from(buf))
                .send()
                .await
                .map_err(call_failed("UploadPart"))?;

            parts.push(
                CompletedPart::builder()
                    .set_e_tag(output.e_tag().map(str::to_owned))
                    .part_number(part_number)
                    .build(),
            );

            uploaded += chunk_len;
            info!(
                part_number,
                uploaded_bytes = uploaded,
                total_bytes = size,
                "Uploaded part"
            );
            part_number += 1;
        }

        let part_count = parts.len();
        let completed = CompletedMultipartUpload::builder()
            .set_parts(Some(parts))
            .build();
        let output = self
            .client
            .complete_multipart_upload()
            .bucket(bucket)
            .key(key)
            .upload_id(upload_id)
            .multipart_upload(completed)
            .send()
            .await
            .map_err(call_failed("CompleteMultipartUpload"))?;

        Ok(UploadReceipt {
            key: key.to_owned(),
            e_tag: output.e_tag().map(str::to_owned),
            parts: part_count,
        })
    }
}

#[async_trait]
impl Uploader for S3Uploader {
    async fn upload(&self, req: UploadRequest) -> Result<UploadReceipt, UploadError> {
        let part_size = part_size_for(req.size);
        if req.size <= part_size {
            self.put_single(req).await
        } else {
            self.put_multipart(req, part_size).await
        }
    }
}
