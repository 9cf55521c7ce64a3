//! Builds a [`HookConfig`] from environment variables.
//!
//! String settings (bucket, prefix, endpoint) go through shell-style
//! expansion against the same lookup, so a unit file can say
//! `DNSC_LOGFILE_S3_KEY_PREFIX=logs/$HOSTNAME`. The rules are those of Go's
//! `os.ExpandEnv`, which existing deployments of this hook were written
//! against (see [`expand_vars`]). Boolean toggles are compared verbatim
//! against `"true"`; anything else means off.
//!
//! The loader is parameterised over a lookup function so tests can feed a
//! plain map instead of mutating the process environment.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::{error, info, warn};

use crate::config::{
    HookConfig, KeyMode, ENV_BUCKET, ENV_DELETE_ON_SUCCESS, ENV_ENDPOINT_URL, ENV_KEY_MODE,
    ENV_KEY_PREFIX, ENV_USE_PATH_STYLE,
};
use crate::error::HookError;

fn variable_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$(?:\{([^}]*)\}|\{|([*#$@!?\-0-9])|([A-Za-z_][A-Za-z0-9_]*))")
            .expect("variable pattern is a valid regex")
    })
}

/// Replaces variable references with the looked-up value.
///
/// - `$NAME` takes the longest run of letters, digits and `_`.
/// - `${NAME}` takes everything up to the first `}`.
/// - `$` followed by one of `*#$@!?-` or a digit names that single character,
///   so `$1x` is `$1` followed by `x`.
/// - `${}` and an unterminated `${` are dropped.
/// - Any other `$`, including a trailing one, is kept as is.
///
/// Unknown names expand to the empty string.
pub fn expand_vars<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    variable_pattern()
        .replace_all(input, |caps: &Captures<'_>| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .map_or("", |m| m.as_str());
            if name.is_empty() {
                return String::new();
            }
            lookup(name).unwrap_or_default()
        })
        .into_owned()
}

/// Loads the hook configuration through `lookup`.
///
/// Fails with [`HookError::MissingBucket`] when the bucket expands to an empty
/// string, and with [`HookError::InvalidConfig`] on an unknown key mode or an
/// endpoint that is not an http(s) URL.
pub fn load_config<F>(lookup: F) -> Result<HookConfig, HookError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = |name: &str| lookup(name).unwrap_or_default();
    let expanded = |name: &str| expand_vars(&raw(name), &lookup);

    let bucket = expanded(ENV_BUCKET);
    if bucket.is_empty() {
        let err = HookError::MissingBucket {
            variable: ENV_BUCKET,
        };
        error!(
            kind = err.kind(),
            variable = ENV_BUCKET,
            "S3 bucket name not specified. Please set the environment variable."
        );
        return Err(err);
    }

    let key_prefix = expanded(ENV_KEY_PREFIX);

    let endpoint_url = match expanded(ENV_ENDPOINT_URL) {
        url if url.is_empty() => None,
        url if url.starts_with("http://") || url.starts_with("https://") => Some(url),
        url => {
            let err = HookError::InvalidConfig(format!(
                "{ENV_ENDPOINT_URL} must start with http:// or https://, got {url:?}"
            ));
            error!(
                kind = err.kind(),
                variable = ENV_ENDPOINT_URL,
                endpoint = %url,
                "Endpoint URL must use http or https"
            );
            return Err(err);
        }
    };

    let key_mode = raw(ENV_KEY_MODE).parse::<KeyMode>().map_err(|msg| {
        let err = HookError::InvalidConfig(msg);
        error!(
            kind = err.kind(),
            variable = ENV_KEY_MODE,
            error = %err,
            "Unsupported key mode"
        );
        err
    })?;

    if key_mode == KeyMode::Direct && !key_prefix.is_empty() {
        warn!(
            s3_key_prefix = %key_prefix,
            "Key prefix is ignored in direct key mode"
        );
    }

    let config = HookConfig {
        bucket,
        key_prefix,
        endpoint_url,
        use_path_style: raw(ENV_USE_PATH_STYLE) == "true",
        delete_on_success: raw(ENV_DELETE_ON_SUCCESS) == "true",
        key_mode,
    };
    config.trace_loaded();
    Ok(config)
}

/// [`load_config`] bound to the process environment.
pub fn load_config_from_env() -> Result<HookConfig, HookError> {
    info!("Loading configuration from environment");
    load_config(|name| std::env::var(name).ok())
}
