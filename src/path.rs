//! Path normalization shared by the writer (on `create_file`) and the
//! `@hash` prefix recognized by the reader (on `open_file`).

/// Normalizes a writer-supplied path: backslashes become forward slashes,
/// runs of separators collapse to one, and a leading/trailing separator is
/// dropped. The result never starts or ends with `/`.
pub fn normalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut last_was_sep = true; // treat a leading separator as already-seen
    for ch in path.chars() {
        let ch = if ch == '\\' { '/' } else { ch };
        if ch == '/' {
            if last_was_sep {
                continue;
            }
            last_was_sep = true;
            out.push('/');
        } else {
            last_was_sep = false;
            out.push(ch);
        }
    }
    if out.ends_with('/') {
        out.pop();
    }
    out
}

/// Splits a normalized path into its directory segments and final name.
/// `"a/b/c.txt"` yields `(["a", "b"], "c.txt")`. A bare filename with no
/// separator yields `([], "c.txt")`.
pub fn split_segments(normalized: &str) -> (Vec<&str>, &str) {
    if normalized.is_empty() {
        return (Vec::new(), "");
    }
    let mut parts: Vec<&str> = normalized.split('/').collect();
    let name = parts.pop().unwrap_or("");
    (parts, name)
}

/// Recognizes and parses the `@<40-hex>` content-hash addressing prefix.
/// Returns `None` both when the prefix is absent and when it is malformed
/// (wrong length or non-hex characters) — in either case the caller must
/// not fall back to scanning.
pub fn parse_hash_prefixed(path: &str) -> Option<[u8; 20]> {
    let rest = path.strip_prefix('@')?;
    crate::hash::parse_hex_hash(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_duplicate_separators() {
        assert_eq!(normalize("a//b///c.txt"), "a/b/c.txt");
    }

    #[test]
    fn normalize_folds_backslashes() {
        assert_eq!(normalize("a\\b\\c.txt"), "a/b/c.txt");
    }

    #[test]
    fn normalize_drops_leading_and_trailing_separators() {
        assert_eq!(normalize("/a/b/"), "a/b");
    }

    #[test]
    fn split_segments_bare_name() {
        let (dirs, name) = split_segments("c.txt");
        assert!(dirs.is_empty());
        assert_eq!(name, "c.txt");
    }

    #[test]
    fn split_segments_nested() {
        let (dirs, name) = split_segments("a/b/c.txt");
        assert_eq!(dirs, vec!["a", "b"]);
        assert_eq!(name, "c.txt");
    }

    #[test]
    fn hash_prefix_requires_at_and_valid_hex() {
        assert!(parse_hash_prefixed("plain/path").is_none());
        assert!(parse_hash_prefixed("@nothex").is_none());
        assert!(parse_hash_prefixed("@aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d").is_some());
    }
}
