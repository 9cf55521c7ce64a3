//! Round trips against a real bucket.
//!
//! Ignored by default. Run with `cargo test -- --ignored` after exporting
//! `DNSC_LOGFILE_S3_BUCKET` (plus endpoint/path-style settings for MinIO) and
//! the usual AWS credentials.

use std::io::Write;

use aws_config::BehaviorVersion;
use log_bucket::config::HookConfig;
use log_bucket::load_config::load_config_from_env;
use log_bucket::upload::s3::{client_config, S3Uploader, MIN_PART_SIZE};
use log_bucket::upload::{UploadRequest, Uploader};
use tempfile::NamedTempFile;

fn live_config() -> HookConfig {
    dotenvy::dotenv().ok();
    load_config_from_env().expect("DNSC_LOGFILE_S3_BUCKET must be set for live tests")
}

async fn raw_client(config: &HookConfig) -> aws_sdk_s3::Client {
    let shared = aws_config::load_defaults(BehaviorVersion::latest()).await;
    aws_sdk_s3::Client::from_conf(client_config(&shared, config))
}

async fn upload_temp_file(config: &HookConfig, len: usize) -> (String, usize) {
    let mut file = NamedTempFile::new().expect("temp file");
    let line = b"2024-05-01T00:00:00Z query example.org A\n";
    let mut written = 0;
    while written < len {
        file.write_all(line).unwrap();
        written += line.len();
    }
    file.flush().unwrap();

    let key = format!("log-bucket-tests/{}.log", uuid::Uuid::new_v4());
    let handle = tokio::fs::File::open(file.path()).await.unwrap();
    let size = handle.metadata().await.unwrap().len();

    let uploader = S3Uploader::from_config(config).await;
    let receipt = uploader
        .upload(UploadRequest {
            bucket: config.bucket.clone(),
            key: key.clone(),
            file: handle,
            size,
        })
        .await
        .expect("upload should succeed");
    assert_eq!(receipt.key, key);
    (key, receipt.parts)
}

#[tokio::test]
#[ignore = "needs a reachable S3-compatible bucket"]
async fn test_single_put_round_trip() {
    let config = live_config();
    let client = raw_client(&config).await;

    let (key, parts) = upload_temp_file(&config, 4096).await;
    assert_eq!(parts, 1);

    let head = client
        .head_object()
        .bucket(&config.bucket)
        .key(&key)
        .send()
        .await
        .expect("object should exist");
    assert!(head.content_length().unwrap_or_default() >= 4096);

    client
        .delete_object()
        .bucket(&config.bucket)
        .key(&key)
        .send()
        .await
        .unwrap_or_else(|e| panic!("failed to clean up {key}: {e}"));
}

#[tokio::test]
#[ignore = "needs a reachable S3-compatible bucket"]
async fn test_multipart_round_trip() {
    let config = live_config();
    let client = raw_client(&config).await;

    let len = (MIN_PART_SIZE * 2 + 1024) as usize;
    let (key, parts) = upload_temp_file(&config, len).await;
    assert_eq!(parts, 3);

    let head = client
        .head_object()
        .bucket(&config.bucket)
        .key(&key)
        .send()
        .await
        .expect("object should exist");
    assert!(head.content_length().unwrap_or_default() as usize >= len);

    client
        .delete_object()
        .bucket(&config.bucket)
        .key(&key)
        .send()
        .await
        .unwrap_or_else(|e| panic!("failed to clean up {key}: {e}"));
}
