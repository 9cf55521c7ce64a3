use std::fmt;
use std::str::FromStr;

use tracing::{debug, info};

pub const ENV_BUCKET: &str = "DNSC_LOGFILE_S3_BUCKET";
pub const ENV_KEY_PREFIX: &str = "DNSC_LOGFILE_S3_KEY_PREFIX";
pub const ENV_ENDPOINT_URL: &str = "DNSC_LOGFILE_S3_ENDPOINT_URL";
pub const ENV_USE_PATH_STYLE: &str = "DNSC_LOGFILE_S3_USE_PATH_STYLE";
pub const ENV_DELETE_ON_SUCCESS: &str = "DNSC_LOGFILE_DELETE_ON_SUCCESS";
pub const ENV_KEY_MODE: &str = "DNSC_LOGFILE_S3_KEY_MODE";

/// How the third positional argument becomes an object key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyMode {
    /// Argument is a bare file name, joined under the key prefix.
    #[default]
    Prefixed,
    /// Argument is the destination key, used verbatim.
    Direct,
}

impl FromStr for KeyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "prefixed" => Ok(KeyMode::Prefixed),
            "direct" => Ok(KeyMode::Direct),
            other => Err(format!(
                "{ENV_KEY_MODE} must be \"prefixed\" or \"direct\", got {other:?}"
            )),
        }
    }
}

impl fmt::Display for KeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMode::Prefixed => f.write_str("prefixed"),
            KeyMode::Direct => f.write_str("direct"),
        }
    }
}

/// Settings for one hook run, read once from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookConfig {
    pub bucket: String,
    pub key_prefix: String,
    /// Custom endpoint for S3-compatible stores; `None` keeps the SDK default.
    pub endpoint_url: Option<String>,
    pub use_path_style: bool,
    pub delete_on_success: bool,
    pub key_mode: KeyMode,
}

impl HookConfig {
    /// Config with only a bucket set and every toggle off.
    pub fn for_bucket(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key_prefix: String::new(),
            endpoint_url: None,
            use_path_style: false,
            delete_on_success: false,
            key_mode: KeyMode::Prefixed,
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            s3_bucket = %self.bucket,
            s3_key_prefix = %self.key_prefix,
            s3_endpoint_url = self.endpoint_url.as_deref().unwrap_or(""),
            s3_use_path_style = self.use_path_style,
            delete_on_success = self.delete_on_success,
            key_mode = %self.key_mode,
            "Loaded hook configuration"
        );
        debug!(?self, "Hook configuration (full debug)");
    }
}
