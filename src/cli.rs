//! Command-line surface of the hook.
//!
//! The rotation tool calls us as
//! `log-bucket <log_file_path> <log_file_dir> <log_file_name>`; all other
//! settings come from the environment (see [`crate::config`]). Argument count
//! is validated here rather than by clap so a mismatch is reported as one
//! structured error record with both counts. Clap's `--help` and `--version`
//! flags are switched off for the same reason: `log-bucket --help` is a
//! one-argument invocation like any other.

use std::ffi::OsString;

use clap::Parser;
use tracing::{error, field, info_span, Instrument, Span};

use crate::error::HookError;
use crate::hook::{upload_rotated_file, HookOutcome};
use crate::invocation::Invocation;
use crate::load_config::load_config_from_env;
use crate::upload::s3::S3Uploader;

/// Upload a rotated log file to an S3-compatible bucket.
#[derive(Debug, Parser)]
#[clap(
    name = "log-bucket",
    version,
    about = "Upload a rotated log file to an S3-compatible bucket and optionally delete it",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// LOG_FILE_PATH LOG_FILE_DIR LOG_FILE_NAME (or destination key in direct key mode)
    #[clap(value_name = "ARGS", allow_hyphen_values = true, trailing_var_arg = true)]
    pub args: Vec<OsString>,
}

/// Async entrypoint shared by `main()` and the integration tests.
pub async fn run(cli: Cli) -> Result<HookOutcome, HookError> {
    let invocation = match Invocation::try_from(cli.args) {
        Ok(invocation) => invocation,
        Err(e) => {
            if let HookError::ArgumentCount { expected, actual } = &e {
                error!(
                    kind = e.kind(),
                    expected,
                    got = actual,
                    "invalid number of arguments"
                );
            }
            return Err(e);
        }
    };

    let span = info_span!(
        "postrotate",
        log_file_path = %invocation.log_file_path.display(),
        log_file_dir = %invocation.log_file_dir,
        log_file_name = %invocation.log_file_name,
        s3_bucket = field::Empty,
        s3_key_prefix = field::Empty,
        s3_endpoint_url = field::Empty,
        s3_use_path_style = field::Empty,
        delete_on_success = field::Empty,
    );

    async move {
        let config = load_config_from_env()?;

        let span = Span::current();
        span.record("s3_bucket", config.bucket.as_str());
        span.record("s3_key_prefix", config.key_prefix.as_str());
        span.record(
            "s3_endpoint_url",
            config.endpoint_url.as_deref().unwrap_or(""),
        );
        span.record("s3_use_path_style", config.use_path_style);
        span.record("delete_on_success", config.delete_on_success);

        let uploader = S3Uploader::from_config(&config).await;
        upload_rotated_file(&config, &invocation, &uploader).await
    }
    .instrument(span)
    .await
}
