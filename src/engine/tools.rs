//! Path and filter utilities

use std::path::{Path, PathBuf};

/// Path string as stored in the ledger: forward slashes on every platform.
pub fn path_to_db_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Check if a file should be excluded based on OS-specific junk files.
pub fn is_os_junk_file(path: &Path) -> bool {
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        match name {
            // macOS
            ".DS_Store" | ".AppleDouble" | ".LSOverride" => true,
            // Windows
            "Thumbs.db" | "ehthumbs.db" | "Desktop.ini" | "$RECYCLE.BIN" => true,
            // Linux
            ".directory" => true,
            // macOS resource fork files start with ._
            _ => name.starts_with("._"),
        }
    } else {
        false
    }
}

/// Returns true if the path should be considered by the scan (not excluded).
/// The store DB itself (and its `-wal`/`-shm` siblings) is never ingested.
pub fn should_include_in_walk(
    path: &Path,
    root: &Path,
    db_canonical: &Option<PathBuf>,
    exclude_patterns: &[String],
) -> bool {
    if path == root {
        return false;
    }
    if let Some(db) = db_canonical {
        if path == db.as_path() {
            return false;
        }
        if let (Some(name), Some(db_name)) = (
            path.file_name().and_then(|n| n.to_str()),
            db.file_name().and_then(|n| n.to_str()),
        ) && path.parent() == db.parent()
            && (name == format!("{db_name}-wal") || name == format!("{db_name}-shm"))
        {
            return false;
        }
    }
    if is_os_junk_file(path) {
        return false;
    }
    if exclude_patterns.is_empty() {
        return true;
    }
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return true,
    };
    let path_str = path.to_str().unwrap_or("");
    for pattern in exclude_patterns {
        if glob_match(pattern, name) || glob_match(pattern, path_str) {
            return false;
        }
    }
    true
}

/// Minimal glob matching: `*` matches any run of characters (including none),
/// `?` exactly one. A leading `!` is stripped (negation is the caller's job).
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern = pattern.strip_prefix('!').unwrap_or(pattern);
    match_glob(pattern.as_bytes(), text.as_bytes())
}

fn match_glob(pattern: &[u8], text: &[u8]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        // A star absorbs any prefix of the text, so try every split point.
        Some((&b'*', rest)) => (0..=text.len()).any(|skip| match_glob(rest, &text[skip..])),
        Some((&b'?', rest)) => match text.split_first() {
            Some((_, text_rest)) => match_glob(rest, text_rest),
            None => false,
        },
        Some((&lit, rest)) => match text.split_first() {
            Some((&first, text_rest)) if first == lit => match_glob(rest, text_rest),
            _ => false,
        },
    }
}
