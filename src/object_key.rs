//! Object key derivation.

use crate::config::KeyMode;

/// Object key for `name` under the configured mode.
pub fn object_key(mode: KeyMode, prefix: &str, name: &str) -> String {
    match mode {
        KeyMode::Prefixed => join_key(prefix, name),
        KeyMode::Direct => name.to_owned(),
    }
}

/// Joins `prefix` and `name` with `/` and cleans the result lexically.
///
/// Empty elements are skipped, so an empty prefix yields the cleaned name.
pub fn join_key(prefix: &str, name: &str) -> String {
    let joined = [prefix, name]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/");
    if joined.is_empty() {
        return joined;
    }
    clean(&joined)
}

/// Slash-path cleaning: collapses separators, drops `.`, resolves `..`.
fn clean(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                // `..` at the root stays at the root
                _ if rooted => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let body = segments.join("/");
    match (rooted, body.is_empty()) {
        (true, _) => format!("/{body}"),
        (false, true) => ".".to_owned(),
        (false, false) => body,
    }
}

/// Whether `key` can name an object.
pub fn is_usable(key: &str) -> bool {
    !key.is_empty() && key != "." && key != "/"
}
