//! Audit runner: Collect → Analyze (per file) → Aggregate → Report.
//!
//! Per-file analyses are mutually independent and fan out with rayon; the
//! report restores deterministic ordering by sorting, so output never
//! depends on scheduling.

use crate::aggregate;
use crate::collect::{self, PageFile};
use crate::config::Effective;
use crate::extract;
use crate::models::page::PageRecord;
use crate::models::{Finding, Report, Severity};
use crate::rules::{self, RuleCtx};
use crate::schema;
use rayon::prelude::*;
use std::fs;

/// The report plus the per-file analysis set for the optional dump.
pub struct AuditResult {
    pub report: Report,
    pub pages: Vec<PageRecord>,
}

/// Run the full audit over the configured site root.
///
/// A file that cannot be read yields a single `error` finding and the run
/// continues; the contract is to always produce a report, even if partial.
pub fn run_audit(eff: &Effective) -> AuditResult {
    let files = collect::collect_pages(&eff.site_root, &eff.subdirs, &eff.exclude);

    let per_file: Vec<(Option<PageRecord>, Vec<Finding>)> = files
        .par_iter()
        .map(|page| analyze_file(eff, page))
        .collect();

    let mut findings: Vec<Finding> = Vec::new();
    let mut records: Vec<PageRecord> = Vec::new();
    for (record, mut file_findings) in per_file {
        findings.append(&mut file_findings);
        if let Some(record) = record {
            records.push(record);
        }
    }

    let report = aggregate::aggregate(findings, &records, files.len(), eff);
    AuditResult {
        report,
        pages: records,
    }
}

fn analyze_file(eff: &Effective, page: &PageFile) -> (Option<PageRecord>, Vec<Finding>) {
    let content = match fs::read_to_string(&page.path) {
        Ok(s) => s,
        Err(e) => {
            return (
                None,
                vec![Finding {
                    file: page.rel.clone(),
                    rule: "read-file".to_string(),
                    severity: Severity::Error,
                    message: format!("Could not read file: {}", e),
                }],
            );
        }
    };

    let name = page.rel.rsplit('/').next().unwrap_or(page.rel.as_str());
    let ctx = RuleCtx {
        root: &eff.site_root,
        rel: &page.rel,
        subdir: page.subdir.as_deref(),
        is_error_page: eff.error_pages.iter().any(|e| e == name),
        subdirs: &eff.subdirs,
        assets: &eff.assets,
        stale_links: &eff.stale_links,
    };

    let mut findings = rules::run_rules(&ctx, &content);
    let extracted = extract::extract_page(&page.rel, &content);
    findings.extend(schema::check_blocks(
        &page.rel,
        &extracted.json_ld,
        extracted.invalid_json_ld,
    ));
    (Some(extracted.record), findings)
}
