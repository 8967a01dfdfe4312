//! Per-file structural and accessibility rules.
//!
//! Each rule is independent, runs over the file's raw text, and emits zero or
//! more findings. The checks are regex heuristics, not a parse: they can
//! misfire on commented-out or templated markup. Tag balance in particular
//! only counts opening/closing pairs for a fixed set of container elements.

use crate::models::{Finding, Severity};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::LazyLock;

/// Container elements covered by the tag-balance heuristic.
const BALANCED_ELEMENTS: [&str; 8] = [
    "div", "section", "main", "header", "footer", "nav", "ul", "ol",
];

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<h([1-6])[^>]*>").expect("heading regex"));

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href=["']([^"']+\.html)["']"#).expect("link regex"));

static ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"id=["']([^"']+)["']"#).expect("id regex"));

static IMG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<img[^>]+>").expect("img regex"));

static PARENT_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:href|src)=["'](\.\./[^"']+)["']"#).expect("parent ref regex")
});

static TAG_COUNT_RES: LazyLock<Vec<(&'static str, Regex, Regex)>> = LazyLock::new(|| {
    BALANCED_ELEMENTS
        .iter()
        .map(|elem| {
            let open = Regex::new(&format!(r"(?i)<{}[\s>]", elem)).expect("open tag regex");
            let close = Regex::new(&format!(r"(?i)</{}>", elem)).expect("close tag regex");
            (*elem, open, close)
        })
        .collect()
});

/// Context a rule needs beyond the file's own text.
pub struct RuleCtx<'a> {
    pub root: &'a Path,
    /// Root-relative path, `/`-separated.
    pub rel: &'a str,
    /// First path segment when the file lives in a subdirectory.
    pub subdir: Option<&'a str>,
    pub is_error_page: bool,
    pub subdirs: &'a [String],
    pub assets: &'a [String],
    pub stale_links: &'a BTreeMap<String, String>,
}

impl RuleCtx<'_> {
    fn finding(&self, rule: &str, severity: Severity, message: String) -> Finding {
        Finding {
            file: self.rel.to_string(),
            rule: rule.to_string(),
            severity,
            message,
        }
    }
}

/// Run the full rule battery against one file's content.
pub fn run_rules(ctx: &RuleCtx, content: &str) -> Vec<Finding> {
    let mut findings = Vec::new();
    check_heading_hierarchy(ctx, content, &mut findings);
    check_internal_links(ctx, content, &mut findings);
    check_stale_links(ctx, content, &mut findings);
    check_duplicate_ids(ctx, content, &mut findings);
    check_missing_alt_text(ctx, content, &mut findings);
    check_tag_balance(ctx, content, &mut findings);
    check_landmarks(ctx, content, &mut findings);
    check_path_consistency(ctx, content, &mut findings);
    findings
}

/// Exactly one `<h1>` per page; levels must not jump by more than one step.
fn check_heading_hierarchy(ctx: &RuleCtx, content: &str, findings: &mut Vec<Finding>) {
    let levels: Vec<u8> = HEADING_RE
        .captures_iter(content)
        .map(|c| c[1].as_bytes()[0] - b'0')
        .collect();

    let h1_count = levels.iter().filter(|&&l| l == 1).count();
    if h1_count == 0 {
        findings.push(ctx.finding(
            "missing-h1",
            Severity::Critical,
            "No <h1> heading found".to_string(),
        ));
    } else if h1_count > 1 {
        findings.push(ctx.finding(
            "multiple-h1",
            Severity::Critical,
            format!("Multiple <h1> headings ({} found)", h1_count),
        ));
    }

    for pair in levels.windows(2) {
        if pair[1] > pair[0] + 1 {
            findings.push(ctx.finding(
                "skipped-heading-level",
                Severity::High,
                format!("Skipped heading level (h{} to h{})", pair[0], pair[1]),
            ));
        }
    }
}

/// Every same-site `.html` link must resolve to an existing file.
///
/// Subdirectory files resolve `../x` against the root and bare names against
/// their own subdirectory; root files resolve against the root.
fn check_internal_links(ctx: &RuleCtx, content: &str, findings: &mut Vec<Finding>) {
    let mut links: BTreeSet<&str> = BTreeSet::new();
    for cap in LINK_RE.captures_iter(content) {
        links.insert(cap.get(1).map(|m| m.as_str()).unwrap_or_default());
    }

    for link in links {
        if link.starts_with("http") || link.starts_with('#') {
            continue;
        }
        let target = match ctx.subdir {
            Some(sub) => match link.strip_prefix("../") {
                Some(rest) => ctx.root.join(rest),
                None => ctx.root.join(sub).join(link),
            },
            None => ctx.root.join(link.trim_start_matches('/')),
        };
        if !target.exists() {
            findings.push(ctx.finding(
                "broken-link",
                Severity::Critical,
                format!("Broken link -> {}", link),
            ));
        }
    }
}

/// Deny-listed link targets left over from navigation migrations.
fn check_stale_links(ctx: &RuleCtx, content: &str, findings: &mut Vec<Finding>) {
    for (target, note) in ctx.stale_links {
        let hit = content.contains(&format!("href=\"{}\"", target))
            || content.contains(&format!("href='{}'", target));
        if hit {
            findings.push(ctx.finding(
                "old-navigation-link",
                Severity::High,
                format!("Old navigation link -> {} ({})", target, note),
            ));
        }
    }
}

fn check_duplicate_ids(ctx: &RuleCtx, content: &str, findings: &mut Vec<Finding>) {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for cap in ID_RE.captures_iter(content) {
        *counts
            .entry(cap.get(1).map(|m| m.as_str()).unwrap_or_default())
            .or_insert(0) += 1;
    }
    for (id, count) in counts {
        if count > 1 {
            findings.push(ctx.finding(
                "duplicate-id",
                Severity::High,
                format!("Duplicate id '{}' used {} times", id, count),
            ));
        }
    }
}

/// One finding per file, not per image.
fn check_missing_alt_text(ctx: &RuleCtx, content: &str, findings: &mut Vec<Finding>) {
    for img in IMG_RE.find_iter(content) {
        if !img.as_str().contains("alt=") {
            findings.push(ctx.finding(
                "missing-alt-text",
                Severity::High,
                "Image missing alt text".to_string(),
            ));
            break;
        }
    }
}

/// Opening/closing counts must match for the fixed container set.
fn check_tag_balance(ctx: &RuleCtx, content: &str, findings: &mut Vec<Finding>) {
    for (elem, open_re, close_re) in TAG_COUNT_RES.iter() {
        let opening = open_re.find_iter(content).count();
        let closing = close_re.find_iter(content).count();
        if opening != closing {
            findings.push(ctx.finding(
                "unclosed-tag",
                Severity::Critical,
                format!(
                    "Unclosed <{}> tag (found {} opening, {} closing)",
                    elem, opening, closing
                ),
            ));
        }
    }
}

fn check_landmarks(ctx: &RuleCtx, content: &str, findings: &mut Vec<Finding>) {
    if !content.contains("<main") {
        findings.push(ctx.finding(
            "missing-main-landmark",
            Severity::Medium,
            "Missing <main> landmark element".to_string(),
        ));
    }
    if !content.contains("skip-link") && !ctx.is_error_page {
        findings.push(ctx.finding(
            "missing-skip-link",
            Severity::Medium,
            "Missing skip-to-content link".to_string(),
        ));
    }
}

/// Subdirectory files must reach shared assets via `../`; root files must not
/// use `../` except into a known subdirectory.
fn check_path_consistency(ctx: &RuleCtx, content: &str, findings: &mut Vec<Finding>) {
    if ctx.subdir.is_some() {
        for asset in ctx.assets {
            let hit = ["href", "src"].iter().any(|attr| {
                content.contains(&format!("{}=\"{}/", attr, asset))
                    || content.contains(&format!("{}='{}/", attr, asset))
            });
            if hit {
                findings.push(ctx.finding(
                    "incorrect-relative-path",
                    Severity::Critical,
                    format!(
                        "Subdirectory file references '{}/' without '../'",
                        asset
                    ),
                ));
            }
        }
    } else {
        let bad = PARENT_REF_RE.captures_iter(content).find_map(|cap| {
            let path = cap.get(1).map(|m| m.as_str()).unwrap_or_default();
            let first = path
                .trim_start_matches("../")
                .split('/')
                .next()
                .unwrap_or_default();
            if ctx.subdirs.iter().any(|s| s == first) {
                None
            } else {
                Some(path.to_string())
            }
        });
        if let Some(path) = bad {
            findings.push(ctx.finding(
                "incorrect-relative-path",
                Severity::Critical,
                format!("Root file uses parent-relative path '{}'", path),
            ));
        }
    }
}
