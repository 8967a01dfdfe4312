//! File collection for audit passes.
//!
//! Enumerates `*.html` in the site root plus each configured subdirectory,
//! dropping backup artifacts and explicitly excluded paths. Ordering is
//! lexicographic on the root-relative path so reports are reproducible.

use glob::glob;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

const BACKUP_MARKERS: [&str; 3] = [".bak", ".backup", ".orig"];

#[derive(Debug, Clone)]
/// One candidate file with its precomputed root-relative path.
pub struct PageFile {
    pub path: PathBuf,
    /// Relative to the site root, `/`-separated.
    pub rel: String,
    /// First path segment when the file lives in a subdirectory.
    pub subdir: Option<String>,
}

fn is_backup(name: &str) -> bool {
    name.ends_with('~') || BACKUP_MARKERS.iter().any(|m| name.contains(m))
}

/// Collect candidate pages from the root and each subdirectory.
///
/// A missing subdirectory contributes zero files and is not an error.
pub fn collect_pages(root: &Path, subdirs: &[String], exclude: &[String]) -> Vec<PageFile> {
    let mut patterns: Vec<PathBuf> = vec![root.join("*.html")];
    for sub in subdirs {
        patterns.push(root.join(sub).join("*.html"));
    }

    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut out: Vec<PageFile> = Vec::new();
    for pat in patterns {
        let entries = match glob(&pat.to_string_lossy()) {
            Ok(e) => e,
            Err(_) => continue,
        };
        for path in entries.flatten() {
            if !path.is_file() {
                continue;
            }
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            if is_backup(&name) {
                continue;
            }
            let rel = pathdiff::diff_paths(&path, root)
                .unwrap_or_else(|| path.clone())
                .to_string_lossy()
                .replace('\\', "/");
            if exclude.iter().any(|e| e == &rel) {
                continue;
            }
            if !seen.insert(rel.clone()) {
                continue;
            }
            let subdir = rel.split_once('/').map(|(s, _)| s.to_string());
            out.push(PageFile { path, rel, subdir });
        }
    }
    out.sort_by(|a, b| a.rel.cmp(&b.rel));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn subdirs() -> Vec<String> {
        vec!["locations".to_string(), "card".to_string()]
    }

    #[test]
    fn test_collects_root_and_subdirs_sorted() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("locations")).unwrap();
        fs::write(root.join("index.html"), "<html></html>").unwrap();
        fs::write(root.join("contact.html"), "<html></html>").unwrap();
        fs::write(root.join("locations/ottawa-county.html"), "<html></html>").unwrap();

        let pages = collect_pages(root, &subdirs(), &[]);
        let rels: Vec<&str> = pages.iter().map(|p| p.rel.as_str()).collect();
        assert_eq!(
            rels,
            vec!["contact.html", "index.html", "locations/ottawa-county.html"]
        );
        assert_eq!(pages[2].subdir.as_deref(), Some("locations"));
        assert!(pages[0].subdir.is_none());
    }

    #[test]
    fn test_skips_backups_and_excluded() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("index.html"), "<html></html>").unwrap();
        fs::write(root.join("index.html.bak"), "<html></html>").unwrap();
        fs::write(root.join("contact.backup.html"), "<html></html>").unwrap();
        fs::write(root.join("404.html"), "<html></html>").unwrap();

        let pages = collect_pages(root, &subdirs(), &["404.html".to_string()]);
        let rels: Vec<&str> = pages.iter().map(|p| p.rel.as_str()).collect();
        assert_eq!(rels, vec!["index.html"]);
    }

    #[test]
    fn test_missing_subdir_contributes_nothing() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("index.html"), "<html></html>").unwrap();

        let pages = collect_pages(root, &subdirs(), &[]);
        assert_eq!(pages.len(), 1);
    }
}
