//! Sitemap completeness check.
//!
//! Compares `sitemap.xml` `<loc>` entries under the configured domain with
//! the clean URLs expected from the HTML files actually on disk.

use crate::collect;
use crate::config::Effective;
use crate::models::{Finding, Report, Severity, Stats};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::sync::LazyLock;

static LOC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<loc>([^<]+)</loc>").expect("loc regex"));

/// Clean URL path for a page, as a sitemap is expected to list it.
/// The homepage maps to the empty path.
fn clean_url(rel: &str) -> String {
    if rel == "index.html" {
        return String::new();
    }
    rel.strip_suffix(".html").unwrap_or(rel).to_string()
}

/// Run the sitemap check. `eff.domain` must be set (the caller gates this).
pub fn run_sitemap(eff: &Effective) -> Report {
    let domain = eff.domain.as_deref().unwrap_or_default();
    let path = eff.site_root.join("sitemap.xml");
    let content = match fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) => {
            let findings = vec![Finding {
                file: "sitemap.xml".to_string(),
                rule: "read-file".to_string(),
                severity: Severity::Error,
                message: format!("Could not read sitemap.xml: {}", e),
            }];
            return Report::from_findings(findings, 0, Stats::default());
        }
    };

    let mut sitemap_urls: BTreeSet<String> = BTreeSet::new();
    for cap in LOC_RE.captures_iter(&content) {
        let url = cap[1].trim();
        // Entries outside the configured domain are not ours to judge
        if let Some(rest) = url.strip_prefix(domain) {
            sitemap_urls.insert(rest.trim_matches('/').to_string());
        }
    }

    let files = collect::collect_pages(&eff.site_root, &eff.subdirs, &eff.exclude);
    let mut expected: BTreeMap<String, String> = BTreeMap::new();
    for f in &files {
        expected.insert(clean_url(&f.rel), f.rel.clone());
    }

    let mut findings = Vec::new();
    for (url, rel) in &expected {
        if !sitemap_urls.contains(url) {
            findings.push(Finding {
                file: rel.clone(),
                rule: "missing-from-sitemap".to_string(),
                severity: Severity::High,
                message: format!("Missing from sitemap: {}/{}", domain, url),
            });
        }
    }
    for url in &sitemap_urls {
        if !expected.contains_key(url) {
            findings.push(Finding {
                file: "sitemap.xml".to_string(),
                rule: "stale-sitemap-entry".to_string(),
                severity: Severity::Medium,
                message: format!("Sitemap entry has no backing file: {}/{}", domain, url),
            });
        }
    }

    Report::from_findings(findings, files.len(), Stats::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::resolve_effective;
    use tempfile::tempdir;

    #[test]
    fn test_complete_sitemap_passes() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("locations")).unwrap();
        fs::write(root.join("index.html"), "x").unwrap();
        fs::write(root.join("contact.html"), "x").unwrap();
        fs::write(root.join("locations/kent-county.html"), "x").unwrap();
        fs::write(
            root.join("sitemap.xml"),
            r#"<?xml version="1.0"?>
<urlset>
  <url><loc>https://www.example.com/</loc></url>
  <url><loc>https://www.example.com/contact</loc></url>
  <url><loc>https://www.example.com/locations/kent-county</loc></url>
</urlset>"#,
        )
        .unwrap();

        let eff = resolve_effective(root.to_str(), Some("https://www.example.com"), None);
        let report = run_sitemap(&eff);
        assert!(report.findings.is_empty());
        assert_eq!(report.summary.files, 3);
    }

    #[test]
    fn test_missing_and_stale_entries() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("index.html"), "x").unwrap();
        fs::write(root.join("contact.html"), "x").unwrap();
        fs::write(
            root.join("sitemap.xml"),
            r#"<urlset>
  <url><loc>https://www.example.com/</loc></url>
  <url><loc>https://www.example.com/removed-page</loc></url>
</urlset>"#,
        )
        .unwrap();

        let eff = resolve_effective(root.to_str(), Some("https://www.example.com"), None);
        let report = run_sitemap(&eff);
        assert!(report
            .findings
            .iter()
            .any(|f| f.rule == "missing-from-sitemap" && f.file == "contact.html"));
        assert!(report
            .findings
            .iter()
            .any(|f| f.rule == "stale-sitemap-entry" && f.message.contains("removed-page")));
    }

    #[test]
    fn test_absent_sitemap_is_an_error_finding() {
        let dir = tempdir().unwrap();
        let eff = resolve_effective(dir.path().to_str(), Some("https://www.example.com"), None);
        let report = run_sitemap(&eff);
        assert_eq!(report.summary.errors, 1);
        assert_eq!(report.findings[0].rule, "read-file");
    }
}
