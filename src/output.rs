//! Output rendering for audit and sitemap reports.
//!
//! Supports `human` (default) and `json` outputs. Findings arrive pre-sorted
//! by severity band, so the human form prints them flat with a tag per line;
//! the JSON form serializes the whole report (plus the per-file dump when
//! requested).

use crate::models::page::PageRecord;
use crate::models::{Report, Severity};
use crate::utils::percent;
use owo_colors::OwoColorize;
use serde_json::Value as JsonVal;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

fn severity_tag(severity: Severity, color: bool) -> String {
    let tag = format!("⟦{}⟧", severity.label());
    if !color {
        return tag;
    }
    match severity {
        Severity::Critical => tag.red().bold().to_string(),
        Severity::High => tag.yellow().bold().to_string(),
        Severity::Medium => tag.blue().bold().to_string(),
        Severity::Error => tag.magenta().bold().to_string(),
    }
}

fn severity_icon(severity: Severity, color: bool) -> String {
    let icon = match severity {
        Severity::Critical => "✖",
        Severity::High => "▲",
        Severity::Medium => "◆",
        Severity::Error => "⚠",
    };
    if !color {
        return icon.to_string();
    }
    match severity {
        Severity::Critical => icon.red().to_string(),
        Severity::High => icon.yellow().to_string(),
        Severity::Medium => icon.blue().to_string(),
        Severity::Error => icon.magenta().to_string(),
    }
}

/// Print a report in the requested format.
///
/// `pages` is the optional per-file analysis dump; it only affects the JSON
/// form.
pub fn print_report(report: &Report, pages: Option<&[PageRecord]>, output: &str) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_report_json(report, pages)).unwrap()
        ),
        _ => {
            let color = use_colors(output);
            if report.findings.is_empty() {
                let line = format!("All checks passed ({} files).", report.summary.files);
                if color {
                    println!("{}", line.green().bold());
                } else {
                    println!("{}", line);
                }
            }
            for f in &report.findings {
                let file = if color {
                    f.file.clone().bold().to_string()
                } else {
                    f.file.clone()
                };
                println!(
                    "{} {} {} ❲{}❳ — {}",
                    severity_icon(f.severity, color),
                    severity_tag(f.severity, color),
                    file,
                    f.rule,
                    f.message
                );
            }
            let summary = format!(
                "— Summary — critical={} high={} medium={} errors={} files={}",
                report.summary.critical,
                report.summary.high,
                report.summary.medium,
                report.summary.errors,
                report.summary.files
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
            if report.stats.pages > 0 {
                print_coverage(report, color);
            }
        }
    }
}

fn print_coverage(report: &Report, color: bool) {
    let stats = &report.stats;
    let header = "— Coverage —";
    if color {
        println!("{}", header.bold());
    } else {
        println!("{}", header);
    }
    let rows = [
        ("Title tags", stats.titles),
        ("Meta descriptions", stats.descriptions),
        ("Canonical URLs", stats.canonicals),
        ("Schema markup", stats.schema),
        ("Open Graph (4+ tags)", stats.social_complete),
    ];
    for (label, count) in rows {
        println!(
            "  {:<22}{}/{} ({:.1}%)",
            format!("{}:", label),
            count,
            stats.pages,
            percent(count, stats.pages)
        );
    }
}

/// Compose the report JSON object (pure) for testing/snapshot purposes.
pub fn compose_report_json(report: &Report, pages: Option<&[PageRecord]>) -> JsonVal {
    let mut out = serde_json::to_value(report).unwrap();
    if let Some(pages) = pages {
        out["pages"] = serde_json::to_value(pages).unwrap();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Finding, Stats};

    fn sample_report() -> Report {
        Report::from_findings(
            vec![
                Finding {
                    file: "a.html".into(),
                    rule: "missing-h1".into(),
                    severity: Severity::Critical,
                    message: "No <h1> heading found".into(),
                },
                Finding {
                    file: "b.html".into(),
                    rule: "duplicate-id".into(),
                    severity: Severity::High,
                    message: "Duplicate id 'nav' used 2 times".into(),
                },
            ],
            2,
            Stats {
                pages: 2,
                titles: 2,
                descriptions: 1,
                canonicals: 1,
                schema: 0,
                social_complete: 0,
            },
        )
    }

    #[test]
    fn test_compose_report_json_shape() {
        let out = compose_report_json(&sample_report(), None);
        assert_eq!(out["summary"]["critical"], 1);
        assert_eq!(out["summary"]["high"], 1);
        assert_eq!(out["findings"][0]["rule"], "missing-h1");
        assert_eq!(out["findings"][0]["severity"], "critical");
        assert_eq!(out["stats"]["titles"], 2);
        assert!(out.get("pages").is_none());
    }

    #[test]
    fn test_compose_report_json_with_dump() {
        let pages = vec![PageRecord {
            path: "a.html".into(),
            title: Some("A".into()),
            title_length: 1,
            ..PageRecord::default()
        }];
        let out = compose_report_json(&sample_report(), Some(&pages));
        assert_eq!(out["pages"][0]["path"], "a.html");
        assert_eq!(out["pages"][0]["title_length"], 1);
    }
}
