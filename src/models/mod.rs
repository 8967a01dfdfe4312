//! Shared data models for audit findings, summaries, and reports.

pub mod page;

use serde::Serialize;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
/// Severity bands, declared in report order (critical prints first).
///
/// `Error` marks a file that could not be analyzed at all (I/O or encoding
/// failure); it never aborts the run.
pub enum Severity {
    Critical,
    High,
    Medium,
    Error,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Error => "error",
        }
    }
}

#[derive(Serialize, Clone, Debug)]
/// A single audit finding with severity and location.
pub struct Finding {
    pub file: String,
    pub rule: String,
    pub severity: Severity,
    pub message: String,
}

#[derive(Serialize, Default)]
/// Aggregated finding counts used by printers.
pub struct Summary {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub errors: usize,
    pub files: usize,
}

#[derive(Serialize, Default)]
/// Per-category metadata coverage across the whole file set.
pub struct Stats {
    pub pages: usize,
    pub titles: usize,
    pub descriptions: usize,
    pub canonicals: usize,
    pub schema: usize,
    pub social_complete: usize,
}

#[derive(Serialize)]
/// Audit results container returned by the aggregation step.
pub struct Report {
    pub findings: Vec<Finding>,
    pub summary: Summary,
    pub stats: Stats,
}

impl Report {
    /// Build a report from unordered findings.
    ///
    /// Findings are sorted by severity band, then file path, then message, so
    /// two runs over identical content render byte-identical reports no
    /// matter how the per-file analyses were scheduled.
    pub fn from_findings(mut findings: Vec<Finding>, files: usize, stats: Stats) -> Report {
        findings.sort_by(|a, b| {
            a.severity
                .cmp(&b.severity)
                .then_with(|| a.file.cmp(&b.file))
                .then_with(|| a.message.cmp(&b.message))
        });
        let mut summary = Summary {
            files,
            ..Summary::default()
        };
        for f in &findings {
            match f.severity {
                Severity::Critical => summary.critical += 1,
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Error => summary.errors += 1,
            }
        }
        Report {
            findings,
            summary,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_orders_by_severity_then_file_then_message() {
        let findings = vec![
            Finding {
                file: "b.html".into(),
                rule: "missing-main-landmark".into(),
                severity: Severity::Medium,
                message: "Missing <main> landmark element".into(),
            },
            Finding {
                file: "a.html".into(),
                rule: "broken-link".into(),
                severity: Severity::Critical,
                message: "Broken link -> gone.html".into(),
            },
            Finding {
                file: "a.html".into(),
                rule: "missing-h1".into(),
                severity: Severity::Critical,
                message: "No <h1> heading found".into(),
            },
        ];
        let report = Report::from_findings(findings, 2, Stats::default());
        assert_eq!(report.findings[0].rule, "broken-link");
        assert_eq!(report.findings[1].rule, "missing-h1");
        assert_eq!(report.findings[2].rule, "missing-main-landmark");
        assert_eq!(report.summary.critical, 2);
        assert_eq!(report.summary.medium, 1);
        assert_eq!(report.summary.files, 2);
    }
}
