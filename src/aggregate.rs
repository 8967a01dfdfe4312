//! Cross-file aggregation.
//!
//! Consumes the full PageRecord set after the per-file passes: duplicate
//! titles and descriptions, canonical-URL correctness, Open Graph
//! completeness, length advisories, and schema expectations. Returns the
//! final `Report` so nothing accumulates in shared state.

use crate::config::Effective;
use crate::models::page::PageRecord;
use crate::models::{Finding, Report, Severity, Stats};
use crate::schema;
use std::collections::BTreeMap;

const REQUIRED_OG: [&str; 5] = ["og:title", "og:description", "og:url", "og:image", "og:type"];

/// Expected canonical URL for a root-relative page path.
///
/// Homepage maps to the bare domain with a trailing slash; everything else
/// maps to the extensionless clean URL.
pub fn expected_canonical(domain: &str, rel: &str) -> String {
    let domain = domain.trim_end_matches('/');
    if rel == "index.html" {
        return format!("{}/", domain);
    }
    format!("{}/{}", domain, rel.strip_suffix(".html").unwrap_or(rel))
}

/// Fold per-file findings and the record set into the final report.
pub fn aggregate(
    mut findings: Vec<Finding>,
    records: &[PageRecord],
    files: usize,
    eff: &Effective,
) -> Report {
    check_duplicates(records, &mut findings);
    check_metadata(records, eff, &mut findings);
    findings.extend(schema::check_expectations(
        records,
        &eff.schema_expect,
        &eff.breadcrumb_subdirs,
    ));

    let stats = Stats {
        pages: records.len(),
        titles: records.iter().filter(|r| r.title.is_some()).count(),
        descriptions: records
            .iter()
            .filter(|r| r.meta_description.is_some())
            .count(),
        canonicals: records.iter().filter(|r| r.canonical.is_some()).count(),
        schema: records.iter().filter(|r| r.has_schema).count(),
        social_complete: records.iter().filter(|r| r.social_complete()).count(),
    };

    Report::from_findings(findings, files, stats)
}

/// Identical titles or descriptions shared across two or more pages.
fn check_duplicates(records: &[PageRecord], findings: &mut Vec<Finding>) {
    let mut titles: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    let mut descriptions: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for record in records {
        if let Some(title) = record.title.as_deref() {
            titles.entry(title).or_default().push(&record.path);
        }
        if let Some(desc) = record.meta_description.as_deref() {
            descriptions.entry(desc).or_default().push(&record.path);
        }
    }

    for (title, pages) in titles {
        if pages.len() > 1 {
            findings.push(Finding {
                file: pages[0].to_string(),
                rule: "duplicate-title".to_string(),
                severity: Severity::High,
                message: format!(
                    "Duplicate title '{}' used on {} pages: {}",
                    title,
                    pages.len(),
                    pages.join(", ")
                ),
            });
        }
    }
    for (_, pages) in descriptions {
        if pages.len() > 1 {
            findings.push(Finding {
                file: pages[0].to_string(),
                rule: "duplicate-description".to_string(),
                severity: Severity::High,
                message: format!(
                    "Duplicate meta description on {} pages: {}",
                    pages.len(),
                    pages.join(", ")
                ),
            });
        }
    }
}

/// Per-record metadata advisories plus the canonical-URL check.
///
/// Declared error pages are exempt from the advisories; canonical mismatches
/// still apply wherever a canonical is declared.
fn check_metadata(records: &[PageRecord], eff: &Effective, findings: &mut Vec<Finding>) {
    let (title_min, title_max) = eff.title_len;
    let (desc_min, desc_max) = eff.description_len;

    for record in records {
        let name = record
            .path
            .rsplit('/')
            .next()
            .unwrap_or(record.path.as_str());
        let is_error_page = eff.error_pages.iter().any(|e| e == name);

        if let (Some(canonical), Some(domain)) = (record.canonical.as_deref(), eff.domain.as_deref())
        {
            let expected = expected_canonical(domain, &record.path);
            if canonical != expected {
                findings.push(Finding {
                    file: record.path.clone(),
                    rule: "incorrect-canonical".to_string(),
                    severity: Severity::High,
                    message: format!(
                        "Incorrect canonical URL - found: {}, expected: {}",
                        canonical, expected
                    ),
                });
            }
        }

        if is_error_page {
            continue;
        }

        if record.title.is_none() {
            findings.push(advisory(record, "missing-title", "Missing <title> tag"));
        }
        if record.meta_description.is_none() {
            findings.push(advisory(
                record,
                "missing-description",
                "Missing meta description",
            ));
        }
        if record.canonical.is_none() {
            findings.push(advisory(record, "missing-canonical", "Missing canonical URL"));
        }

        if record.title_length > 0 {
            if record.title_length < title_min {
                findings.push(advisory_owned(
                    record,
                    "title-length",
                    format!(
                        "Title too short ({} chars, target {}-{})",
                        record.title_length, title_min, title_max
                    ),
                ));
            } else if record.title_length > title_max {
                findings.push(advisory_owned(
                    record,
                    "title-length",
                    format!(
                        "Title too long ({} chars, target {}-{})",
                        record.title_length, title_min, title_max
                    ),
                ));
            }
        }
        if record.meta_length > 0 {
            if record.meta_length < desc_min {
                findings.push(advisory_owned(
                    record,
                    "description-length",
                    format!(
                        "Meta description too short ({} chars, target {}-{})",
                        record.meta_length, desc_min, desc_max
                    ),
                ));
            } else if record.meta_length > desc_max {
                findings.push(advisory_owned(
                    record,
                    "description-length",
                    format!(
                        "Meta description too long ({} chars, target {}-{})",
                        record.meta_length, desc_min, desc_max
                    ),
                ));
            }
        }

        if !record.og_tags.is_empty() {
            let missing: Vec<&str> = REQUIRED_OG
                .iter()
                .filter(|p| !record.og_tags.contains_key(**p))
                .copied()
                .collect();
            if !missing.is_empty() {
                findings.push(Finding {
                    file: record.path.clone(),
                    rule: "incomplete-open-graph".to_string(),
                    severity: Severity::High,
                    message: format!("Incomplete Open Graph tags - missing: {}", missing.join(", ")),
                });
            }
        }
    }
}

fn advisory(record: &PageRecord, rule: &str, message: &str) -> Finding {
    advisory_owned(record, rule, message.to_string())
}

fn advisory_owned(record: &PageRecord, rule: &str, message: String) -> Finding {
    Finding {
        file: record.path.clone(),
        rule: rule.to_string(),
        severity: Severity::Medium,
        message,
    }
}
