//! Sitecheck core library.
//!
//! This crate exposes programmatic APIs for auditing a static HTML site:
//! structural and accessibility rules per file, cross-file metadata
//! aggregation, and sitemap completeness.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `collect`: Candidate file enumeration with deterministic ordering.
//! - `extract`: Per-page metadata extraction into `PageRecord`s.
//! - `rules`: Per-file structural rule battery.
//! - `schema`: JSON-LD shape and expectation validation.
//! - `aggregate`: Cross-file checks and report assembly.
//! - `audit`: The Collect → Analyze → Aggregate → Report pipeline.
//! - `sitemap`: Sitemap completeness check.
//! - `models`: Data models for findings, reports, and page records.
//! - `output`: Human/JSON printers.
//! - `utils`: Supporting helpers.

pub mod aggregate;
pub mod audit;
pub mod cli;
pub mod collect;
pub mod config;
pub mod extract;
pub mod models;
pub mod output;
pub mod rules;
pub mod schema;
pub mod sitemap;
pub mod utils;
