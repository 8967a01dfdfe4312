//! Per-page metadata extraction.
//!
//! Title, meta description, canonical URL, and Open Graph tags come from a
//! parsed document via CSS selectors. JSON-LD blocks are pulled out of the
//! raw text because the schema payload lives in script bodies; microdata
//! (`itemscope`/`itemtype`) is a fallback when no JSON-LD parses.

use crate::models::page::PageRecord;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value as Json;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("title selector"));

static META_DESCRIPTION_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta[name='description']").expect("description selector"));

static CANONICAL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("link[rel='canonical']").expect("canonical selector"));

static OG_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property^="og:"]"#).expect("og selector"));

// Script bodies span lines; (?is) keeps the match lazy across them.
static JSON_LD_DOUBLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]*type\s*=\s*"application/ld\+json"[^>]*>(.*?)</script>"#)
        .expect("json-ld regex")
});

static JSON_LD_SINGLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script[^>]*type\s*=\s*'application/ld\+json'[^>]*>(.*?)</script>")
        .expect("json-ld regex")
});

static ITEMTYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"itemtype="https?://schema\.org/(\w+)""#).expect("itemtype regex")
});

/// Extraction result: the serializable record plus the parsed JSON-LD blocks
/// kept around for shape validation.
pub struct ExtractedPage {
    pub record: PageRecord,
    pub json_ld: Vec<Json>,
    pub invalid_json_ld: usize,
}

/// Pull all JSON-LD script bodies out of raw HTML.
///
/// Returns the blocks that parsed plus a count of blocks that did not.
pub fn extract_json_ld(html: &str) -> (Vec<Json>, usize) {
    let mut blocks = Vec::new();
    let mut invalid = 0usize;
    for re in [&*JSON_LD_DOUBLE_RE, &*JSON_LD_SINGLE_RE] {
        for cap in re.captures_iter(html) {
            let body = cap[1].trim();
            if body.is_empty() {
                continue;
            }
            match serde_json::from_str::<Json>(body) {
                Ok(v) => blocks.push(v),
                Err(_) => invalid += 1,
            }
        }
    }
    (blocks, invalid)
}

fn collect_types(value: &Json, types: &mut Vec<String>) {
    match value {
        Json::Object(obj) => match obj.get("@type") {
            Some(Json::String(t)) => types.push(t.clone()),
            Some(Json::Array(arr)) => {
                for t in arr {
                    if let Some(s) = t.as_str() {
                        types.push(s.to_string());
                    }
                }
            }
            _ => {}
        },
        Json::Array(items) => {
            for item in items {
                collect_types(item, types);
            }
        }
        _ => {}
    }
}

/// Build the `PageRecord` for one file's content.
pub fn extract_page(rel: &str, html: &str) -> ExtractedPage {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty());

    let meta_description = document
        .select(&META_DESCRIPTION_SELECTOR)
        .next()
        .and_then(|e| e.value().attr("content"))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    let canonical = document
        .select(&CANONICAL_SELECTOR)
        .next()
        .and_then(|e| e.value().attr("href"))
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty());

    let mut og_tags: BTreeMap<String, String> = BTreeMap::new();
    for element in document.select(&OG_SELECTOR) {
        if let (Some(property), Some(content)) = (
            element.value().attr("property"),
            element.value().attr("content"),
        ) {
            og_tags.insert(property.to_string(), content.to_string());
        }
    }

    let (json_ld, invalid_json_ld) = extract_json_ld(html);
    let mut schema_types: Vec<String> = Vec::new();
    for block in &json_ld {
        collect_types(block, &mut schema_types);
    }
    let mut has_schema = !json_ld.is_empty();
    if !has_schema && html.contains("itemscope") && html.contains("itemtype") {
        has_schema = true;
        for cap in ITEMTYPE_RE.captures_iter(html) {
            schema_types.push(cap[1].to_string());
        }
    }
    schema_types.sort();
    schema_types.dedup();

    let record = PageRecord {
        path: rel.to_string(),
        title_length: title.as_deref().map(str::len).unwrap_or(0),
        title,
        meta_length: meta_description.as_deref().map(str::len).unwrap_or(0),
        meta_description,
        canonical,
        og_tags,
        has_schema,
        schema_types,
    };

    ExtractedPage {
        record,
        json_ld,
        invalid_json_ld,
    }
}
