// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recursive discovery of PDF files under a scan root.

use std::fs;
use std::path::{Path, PathBuf};

use layerscope_core::error::Result;
use tracing::{debug, warn};

/// A PDF found under the scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    /// `path` relative to the root, used as the file's identifier.
    pub relative_path: String,
}

/// Every `.pdf` file (extension matched case-insensitively) below `root`,
/// sorted by relative path.
///
/// Only a failure to read `root` itself is an error; unreadable
/// subdirectories are logged and skipped.
pub fn discover_pdfs(root: &Path) -> Result<Vec<DiscoveredFile>> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    let mut first = true;

    while let Some(dir) = pending.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if first => return Err(err.into()),
            Err(err) => {
                warn!(dir = %dir.display(), %err, "Skipping unreadable directory");
                continue;
            }
        };
        first = false;

        for entry in entries.flatten() {
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                pending.push(path);
            } else if is_pdf(&path) && path.is_file() {
                found.push(DiscoveredFile {
                    relative_path: relative_to(root, &path),
                    path,
                });
            }
        }
    }

    found.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    debug!(root = %root.display(), count = found.len(), "PDF discovery complete");
    Ok(found)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn relative_to(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_pdfs_recursively_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("nested/deeper")).unwrap();
        for name in ["b.pdf", "nested/A.PDF", "nested/deeper/c.Pdf", "notes.txt", "pdf"] {
            fs::write(root.join(name), b"%PDF-1.4").unwrap();
        }

        let found = discover_pdfs(root).unwrap();
        let relative: Vec<&str> = found.iter().map(|f| f.relative_path.as_str()).collect();
        let expected: Vec<String> = ["b.pdf", "nested/A.PDF", "nested/deeper/c.Pdf"]
            .iter()
            .map(|name| Path::new(name).display().to_string())
            .collect();
        assert_eq!(relative, expected);
        assert!(found.iter().all(|f| f.path.starts_with(root)));
    }

    #[test]
    fn directories_named_like_pdfs_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("folder.pdf")).unwrap();
        assert!(discover_pdfs(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        assert!(discover_pdfs(Path::new("/nonexistent/layerscope-root")).is_err());
    }
}
