//! Per-page metadata summary built by the extraction pass.

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize, Clone, Debug, Default)]
/// In-memory summary of one file's extracted metadata.
///
/// Created fresh per run from file content and discarded after the report is
/// emitted; `--dump` serializes the full set for downstream tooling.
pub struct PageRecord {
    /// Path relative to the site root, `/`-separated.
    pub path: String,
    pub title: Option<String>,
    pub title_length: usize,
    pub meta_description: Option<String>,
    pub meta_length: usize,
    pub canonical: Option<String>,
    /// `og:*` properties in document order is not needed; keyed map keeps the
    /// dump stable.
    pub og_tags: BTreeMap<String, String>,
    pub has_schema: bool,
    pub schema_types: Vec<String>,
}

impl PageRecord {
    /// True when a page declares at least the core social-preview tag set.
    pub fn social_complete(&self) -> bool {
        self.og_tags.len() >= 4
    }
}
