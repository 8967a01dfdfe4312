//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sitecheck",
    version,
    about = "Static-site structure & metadata auditor",
    long_about = "Sitecheck — a small, fast CLI that audits a static HTML site for structural defects, accessibility gaps, and SEO metadata problems.\n\nConfiguration precedence: CLI > sitecheck.toml > defaults.",
    after_help = "Examples:\n  sitecheck audit\n  sitecheck audit --site-root ./public --output json --dump\n  sitecheck audit --check\n  sitecheck sitemap --domain https://www.example.com",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(
        about = "Show version",
        long_about = "Print the current sitecheck version."
    )]
    Version,
    /// Audit HTML structure and metadata
    #[command(
        about = "Run the full audit",
        long_about = "Collect the site's HTML files, run the per-file rule battery (headings, links, ids, alt text, tag balance, landmarks, paths), aggregate cross-file checks (duplicate titles/descriptions, canonical URLs, Open Graph, schema markup), and print a severity-grouped report.\n\nExit status reflects completion; pass --check to fail on critical findings.",
        after_help = "Examples:\n  sitecheck audit\n  sitecheck audit --output json\n  sitecheck audit --check --domain https://www.example.com"
    )]
    Audit {
        #[arg(long, help = "Site root directory (default: current dir)")]
        site_root: Option<String>,
        #[arg(long, help = "Canonical site domain, e.g. https://www.example.com")]
        domain: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Exit non-zero when critical findings exist")]
        check: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Include the per-file analysis dump in JSON output")]
        dump: bool,
    },
    /// Check sitemap completeness
    #[command(
        about = "Check sitemap.xml completeness",
        long_about = "Compare sitemap.xml <loc> entries against the HTML files actually present. Requires a configured site domain.",
        after_help = "Examples:\n  sitecheck sitemap --domain https://www.example.com\n  sitecheck sitemap --output json --check"
    )]
    Sitemap {
        #[arg(long, help = "Site root directory (default: current dir)")]
        site_root: Option<String>,
        #[arg(long, help = "Canonical site domain, e.g. https://www.example.com")]
        domain: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Exit non-zero when any finding exists")]
        check: bool,
    },
}
