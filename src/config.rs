//! Configuration discovery and effective settings resolution.
//!
//! Sitecheck reads `sitecheck.toml|yaml|yml` from the site root (or closest
//! ancestor) and merges it with CLI flags to produce an `Effective` config.
//! Defaults:
//! - `subdirs`: `["locations", "card"]`
//! - `assets`: `["images", "css", "js"]`
//! - `error_pages`: `["404.html", "500.html"]`
//! - `exclude`: empty
//! - `output`: `human`
//! - `[seo]` length targets: title 30–70, description 120–170
//!
//! Overrides precedence: CLI > config file > defaults.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, Clone)]
/// Length targets for titles and meta descriptions under `[seo]`.
pub struct SeoCfg {
    pub title_min: Option<usize>,
    pub title_max: Option<usize>,
    pub description_min: Option<usize>,
    pub description_max: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Schema-markup expectations under `[schema]`.
pub struct SchemaCfg {
    /// Map of relative page path to required schema.org types,
    /// e.g. `[schema.expect] "faq.html" = ["FAQPage"]`.
    #[serde(default)]
    pub expect: Option<BTreeMap<String, Vec<String>>>,
    /// Subdirectories whose pages must carry `BreadcrumbList` when they
    /// declare any schema at all.
    #[serde(default)]
    pub breadcrumb_subdirs: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `sitecheck.toml|yaml`.
pub struct SitecheckConfig {
    pub domain: Option<String>,
    pub output: Option<String>,
    pub subdirs: Option<Vec<String>>,
    /// Shared asset directories checked by the path-consistency rule.
    pub assets: Option<Vec<String>>,
    /// Pages exempt from skip-link and metadata advisories.
    pub error_pages: Option<Vec<String>>,
    /// Relative paths dropped from collection entirely.
    pub exclude: Option<Vec<String>>,
    /// Deny-list of deprecated link targets, mapped to a replacement hint.
    #[serde(default)]
    pub stale_links: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub seo: Option<SeoCfg>,
    #[serde(default)]
    pub schema: Option<SchemaCfg>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub site_root: PathBuf,
    pub domain: Option<String>,
    pub output: String,
    pub subdirs: Vec<String>,
    pub assets: Vec<String>,
    pub error_pages: Vec<String>,
    pub exclude: Vec<String>,
    pub stale_links: BTreeMap<String, String>,
    pub schema_expect: BTreeMap<String, Vec<String>>,
    pub breadcrumb_subdirs: Vec<String>,
    pub title_len: (usize, usize),
    pub description_len: (usize, usize),
}

/// Walk upward from `start` to detect the site root.
///
/// Stops when a `sitecheck.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_site_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if cur.join("sitecheck.toml").exists()
            || cur.join("sitecheck.yaml").exists()
            || cur.join("sitecheck.yml").exists()
        {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `SitecheckConfig` from `sitecheck.toml` or `sitecheck.yaml|yml` if present.
pub fn load_config(root: &Path) -> Option<SitecheckConfig> {
    let toml_path = root.join("sitecheck.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).ok()?;
        let cfg: SitecheckConfig = toml::from_str(&s).ok()?;
        return Some(cfg);
    }
    for yml in ["sitecheck.yaml", "sitecheck.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).ok()?;
            let cfg: SitecheckConfig = serde_yaml::from_str(&s).ok()?;
            return Some(cfg);
        }
    }
    None
}

/// Deny-list entries carried over from the last navigation migration.
fn default_stale_links() -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    map.insert(
        "resources.html".to_string(),
        "superseded by faq.html, blog.html and your-rights.html".to_string(),
    );
    map.insert(
        "local-resources.html".to_string(),
        "renamed to community-resources.html".to_string(),
    );
    map
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_site_root: Option<&str>,
    cli_domain: Option<&str>,
    cli_output: Option<&str>,
) -> Effective {
    let start = PathBuf::from(cli_site_root.unwrap_or("."));
    let site_root = detect_site_root(&start);
    let cfg = load_config(&site_root).unwrap_or_default();

    let domain = cli_domain
        .map(|s| s.to_string())
        .or(cfg.domain)
        .map(|d| d.trim_end_matches('/').to_string())
        .filter(|d| !d.is_empty());

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    let subdirs = cfg
        .subdirs
        .unwrap_or_else(|| vec!["locations".to_string(), "card".to_string()]);
    let assets = cfg.assets.unwrap_or_else(|| {
        vec!["images".to_string(), "css".to_string(), "js".to_string()]
    });
    let error_pages = cfg
        .error_pages
        .unwrap_or_else(|| vec!["404.html".to_string(), "500.html".to_string()]);
    let exclude = cfg.exclude.unwrap_or_default();
    let stale_links = cfg.stale_links.unwrap_or_else(default_stale_links);

    let seo = cfg.seo.unwrap_or_default();
    let title_len = (seo.title_min.unwrap_or(30), seo.title_max.unwrap_or(70));
    let description_len = (
        seo.description_min.unwrap_or(120),
        seo.description_max.unwrap_or(170),
    );

    let schema = cfg.schema.unwrap_or_default();
    let schema_expect = schema.expect.unwrap_or_default();
    let breadcrumb_subdirs = schema
        .breadcrumb_subdirs
        .unwrap_or_else(|| vec!["locations".to_string()]);

    Effective {
        site_root,
        domain,
        output,
        subdirs,
        assets,
        error_pages,
        exclude,
        stale_links,
        schema_expect,
        breadcrumb_subdirs,
        title_len,
        description_len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("sitecheck.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
domain = "https://www.example.com/"
output = "json"
subdirs = ["locations"]
[seo]
title_max = 65
    "#
        )
        .unwrap();

        // Resolve using explicit site_root to avoid global CWD races
        let eff = resolve_effective(root.to_str(), None, None);
        // Trailing slash on the domain is normalized away
        assert_eq!(eff.domain.as_deref(), Some("https://www.example.com"));
        assert_eq!(eff.output, "json");
        assert_eq!(eff.subdirs, vec!["locations".to_string()]);
        assert_eq!(eff.title_len, (30, 65));
        assert_eq!(eff.description_len, (120, 170));
    }

    #[test]
    fn test_load_yaml_and_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("sitecheck.yaml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
domain: https://www.example.com
error_pages:
  - 404.html
            "#
        )
        .unwrap();

        let eff = resolve_effective(root.to_str(), None, None);
        assert_eq!(eff.domain.as_deref(), Some("https://www.example.com"));
        assert_eq!(eff.output, "human");
        assert_eq!(eff.error_pages, vec!["404.html".to_string()]);
        // Defaults apply where the file is silent
        assert_eq!(
            eff.subdirs,
            vec!["locations".to_string(), "card".to_string()]
        );
        assert!(eff.stale_links.contains_key("resources.html"));
    }

    #[test]
    fn test_cli_precedence_over_config() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("sitecheck.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
domain = "https://config.example.com"
output = "json"
            "#
        )
        .unwrap();

        let eff = resolve_effective(root.to_str(), Some("https://cli.example.com"), Some("human"));
        assert_eq!(eff.domain.as_deref(), Some("https://cli.example.com"));
        assert_eq!(eff.output, "human");
    }

    #[test]
    fn test_schema_expectations_loaded() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("sitecheck.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
[schema]
breadcrumb_subdirs = ["locations"]
[schema.expect]
"faq.html" = ["FAQPage"]
"your-rights.html" = ["Article"]
            "#
        )
        .unwrap();

        let eff = resolve_effective(root.to_str(), None, None);
        assert_eq!(
            eff.schema_expect.get("faq.html"),
            Some(&vec!["FAQPage".to_string()])
        );
        assert_eq!(eff.breadcrumb_subdirs, vec!["locations".to_string()]);
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let eff = resolve_effective(dir.path().to_str(), None, None);
        assert!(eff.domain.is_none());
        assert_eq!(eff.output, "human");
        assert_eq!(eff.assets.len(), 3);
        assert_eq!(eff.exclude.len(), 0);
    }
}
