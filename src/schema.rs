//! Schema-markup validation.
//!
//! Two layers: shape validation of JSON-LD blocks a page actually declares
//! (FAQPage / Article / BlogPosting), and expectation checks driven by the
//! `[schema]` configuration (required types per page, BreadcrumbList on
//! subdirectory pages).

use crate::models::page::PageRecord;
use crate::models::{Finding, Severity};
use serde_json::Value as Json;
use std::collections::BTreeMap;

fn finding(file: &str, rule: &str, severity: Severity, message: String) -> Finding {
    Finding {
        file: file.to_string(),
        rule: rule.to_string(),
        severity,
        message,
    }
}

fn field_present(obj: &Json, field: &str) -> bool {
    match obj.get(field) {
        None | Some(Json::Null) => false,
        Some(Json::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Validate the JSON-LD blocks found on one page.
pub fn check_blocks(rel: &str, blocks: &[Json], invalid: usize) -> Vec<Finding> {
    let mut findings = Vec::new();
    if invalid > 0 {
        findings.push(finding(
            rel,
            "invalid-schema-json",
            Severity::High,
            format!("{} JSON-LD block(s) failed to parse as JSON", invalid),
        ));
    }
    for block in blocks {
        let items: Vec<&Json> = match block {
            Json::Array(arr) => arr.iter().collect(),
            other => vec![other],
        };
        for item in items {
            match item.get("@type").and_then(Json::as_str) {
                Some("FAQPage") => validate_faq(rel, item, &mut findings),
                Some(kind @ ("Article" | "BlogPosting")) => {
                    validate_article(rel, kind, item, &mut findings)
                }
                _ => {}
            }
        }
    }
    findings
}

/// FAQPage needs a `mainEntity` list of Question items, each carrying a name
/// and an accepted Answer with text.
fn validate_faq(rel: &str, schema: &Json, findings: &mut Vec<Finding>) {
    let questions = match schema.get("mainEntity") {
        Some(Json::Array(items)) if !items.is_empty() => items,
        Some(Json::Array(_)) | None => {
            findings.push(finding(
                rel,
                "schema-shape",
                Severity::High,
                "FAQPage schema has no 'mainEntity' questions".to_string(),
            ));
            return;
        }
        Some(_) => {
            findings.push(finding(
                rel,
                "schema-shape",
                Severity::High,
                "FAQPage 'mainEntity' should be a list".to_string(),
            ));
            return;
        }
    };

    for (i, question) in questions.iter().enumerate() {
        let n = i + 1;
        if question.get("@type").and_then(Json::as_str) != Some("Question") {
            findings.push(finding(
                rel,
                "schema-shape",
                Severity::High,
                format!("FAQPage question {}: expected @type 'Question'", n),
            ));
        }
        if !field_present(question, "name") {
            findings.push(finding(
                rel,
                "schema-shape",
                Severity::High,
                format!("FAQPage question {}: missing 'name'", n),
            ));
        }
        let answer = question.get("acceptedAnswer").cloned().unwrap_or(Json::Null);
        if answer.get("@type").and_then(Json::as_str) != Some("Answer") {
            findings.push(finding(
                rel,
                "schema-shape",
                Severity::High,
                format!("FAQPage question {}: answer should have @type 'Answer'", n),
            ));
        }
        if !field_present(&answer, "text") {
            findings.push(finding(
                rel,
                "schema-shape",
                Severity::High,
                format!("FAQPage question {}: answer missing 'text'", n),
            ));
        }
    }
}

fn validate_article(rel: &str, kind: &str, schema: &Json, findings: &mut Vec<Finding>) {
    for field in ["headline", "author", "datePublished"] {
        if !field_present(schema, field) {
            findings.push(finding(
                rel,
                "schema-shape",
                Severity::High,
                format!("{} schema missing required field '{}'", kind, field),
            ));
        }
    }
}

/// Expectation checks over the whole record set.
pub fn check_expectations(
    records: &[PageRecord],
    expect: &BTreeMap<String, Vec<String>>,
    breadcrumb_subdirs: &[String],
) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (page, types) in expect {
        let Some(record) = records.iter().find(|r| &r.path == page) else {
            continue;
        };
        if !record.has_schema {
            findings.push(finding(
                page,
                "missing-schema",
                Severity::Medium,
                format!("Missing schema markup (expected: {})", types.join(", ")),
            ));
            continue;
        }
        for expected in types {
            if !record.schema_types.contains(expected) {
                findings.push(finding(
                    page,
                    "schema-type-mismatch",
                    Severity::High,
                    format!(
                        "Missing '{}' schema (found: {})",
                        expected,
                        record.schema_types.join(", ")
                    ),
                ));
            }
        }
    }

    for record in records {
        let in_breadcrumb_subdir = breadcrumb_subdirs
            .iter()
            .any(|sub| record.path.starts_with(&format!("{}/", sub)));
        if in_breadcrumb_subdir
            && record.has_schema
            && !record.schema_types.iter().any(|t| t == "BreadcrumbList")
        {
            findings.push(finding(
                &record.path,
                "schema-type-mismatch",
                Severity::High,
                "Missing BreadcrumbList schema".to_string(),
            ));
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_faq_block_passes() {
        let block = json!({
            "@type": "FAQPage",
            "mainEntity": [{
                "@type": "Question",
                "name": "Can I appeal?",
                "acceptedAnswer": {"@type": "Answer", "text": "Yes."}
            }]
        });
        assert!(check_blocks("faq.html", &[block], 0).is_empty());
    }

    #[test]
    fn test_faq_missing_answer_text() {
        let block = json!({
            "@type": "FAQPage",
            "mainEntity": [{
                "@type": "Question",
                "name": "Can I appeal?",
                "acceptedAnswer": {"@type": "Answer"}
            }]
        });
        let findings = check_blocks("faq.html", &[block], 0);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("answer missing 'text'"));
    }

    #[test]
    fn test_article_required_fields() {
        let block = json!({"@type": "Article", "headline": "Your Rights"});
        let findings = check_blocks("your-rights.html", &[block], 0);
        let missing: Vec<&str> = findings.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(findings.len(), 2);
        assert!(missing.iter().any(|m| m.contains("'author'")));
        assert!(missing.iter().any(|m| m.contains("'datePublished'")));
    }

    #[test]
    fn test_invalid_block_count_reported() {
        let findings = check_blocks("broken.html", &[], 2);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, "invalid-schema-json");
    }

    #[test]
    fn test_expectations_and_breadcrumbs() {
        let records = vec![
            PageRecord {
                path: "faq.html".into(),
                has_schema: true,
                schema_types: vec!["WebPage".into()],
                ..PageRecord::default()
            },
            PageRecord {
                path: "blog.html".into(),
                has_schema: false,
                ..PageRecord::default()
            },
            PageRecord {
                path: "locations/kent-county.html".into(),
                has_schema: true,
                schema_types: vec!["LegalService".into()],
                ..PageRecord::default()
            },
        ];
        let mut expect = BTreeMap::new();
        expect.insert("faq.html".to_string(), vec!["FAQPage".to_string()]);
        expect.insert("blog.html".to_string(), vec!["BlogPosting".to_string()]);
        expect.insert("absent.html".to_string(), vec!["Article".to_string()]);

        let findings = check_expectations(&records, &expect, &["locations".to_string()]);
        assert_eq!(findings.len(), 3);
        assert!(findings
            .iter()
            .any(|f| f.file == "faq.html" && f.rule == "schema-type-mismatch"));
        assert!(findings
            .iter()
            .any(|f| f.file == "blog.html" && f.rule == "missing-schema"));
        assert!(findings
            .iter()
            .any(|f| f.file == "locations/kent-county.html"
                && f.message.contains("BreadcrumbList")));
    }
}
