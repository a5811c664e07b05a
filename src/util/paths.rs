//! Path normalization helpers.
//!
//! Module paths in manifests and computed module maps always use forward
//! slashes, regardless of the host platform's separator.

use std::path::Path;

/// Render a path with forward slashes only.
pub fn to_forward_slashes(path: &Path) -> String {
    let raw = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        raw.into_owned()
    } else {
        raw.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

/// Join two forward-slash path fragments, dropping redundant separators.
pub fn join_slash(prefix: &str, rest: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let rest = rest.trim_start_matches("./").trim_start_matches('/');
    if prefix.is_empty() || prefix == "." {
        rest.to_string()
    } else {
        format!("{prefix}/{rest}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_slash() {
        assert_eq!(join_slash("pkg", "lib/entry"), "pkg/lib/entry");
        assert_eq!(join_slash("pkg/", "lib/entry"), "pkg/lib/entry");
        assert_eq!(join_slash(".", "lib/entry"), "lib/entry");
        assert_eq!(join_slash("", "lib/entry"), "lib/entry");
        assert_eq!(join_slash("pkg", "./lib/entry"), "pkg/lib/entry");
    }

    #[test]
    fn test_to_forward_slashes_is_identity_on_unix_paths() {
        assert_eq!(to_forward_slashes(Path::new("a/b/c")), "a/b/c");
    }
}
