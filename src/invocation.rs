//! The three positional arguments handed over by the rotation tool.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::HookError;

/// Number of positional arguments a hook invocation must carry.
pub const EXPECTED_ARGS: usize = 3;

/// One rotation event.
///
/// `log_file_dir` is carried for logging only; the path already locates the
/// file. `log_file_name` is either the bare file name (joined with the key
/// prefix) or the full destination key, depending on the configured
/// [`crate::config::KeyMode`].
///
/// The path is kept as raw OS bytes so any file the rotation tool names can be
/// opened. Directory and name end up in log records and the object key, which
/// are UTF-8, so invalid sequences there are replaced with U+FFFD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub log_file_path: PathBuf,
    pub log_file_dir: String,
    pub log_file_name: String,
}

impl Invocation {
    /// Builds an invocation from the positional arguments, program name excluded.
    pub fn from_args<I, S>(args: I) -> Result<Self, HookError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let [path, dir, name]: [OsString; EXPECTED_ARGS] =
            args.try_into().map_err(|rest: Vec<OsString>| HookError::ArgumentCount {
                expected: EXPECTED_ARGS,
                actual: rest.len(),
            })?;

        Ok(Self {
            log_file_path: PathBuf::from(path),
            log_file_dir: dir.to_string_lossy().into_owned(),
            log_file_name: name.to_string_lossy().into_owned(),
        })
    }
}

impl TryFrom<Vec<OsString>> for Invocation {
    type Error = HookError;

    fn try_from(args: Vec<OsString>) -> Result<Self, Self::Error> {
        Self::from_args(args)
    }
}
