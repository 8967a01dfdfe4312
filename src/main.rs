//! Sitecheck CLI binary entry point.
//! Delegates to modules for audit/sitemap and prints results.

mod aggregate;
mod audit;
mod cli;
mod collect;
mod config;
mod extract;
mod models;
mod output;
mod rules;
mod schema;
mod sitemap;
mod utils;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Audit {
            site_root,
            domain,
            output,
            check,
            dump,
        } => {
            let eff = config::resolve_effective(
                site_root.as_deref(),
                domain.as_deref(),
                output.as_deref(),
            );
            // Friendly note if no sitecheck config was found
            if eff.output != "json" && config::load_config(&eff.site_root).is_none() {
                eprintln!(
                    "{} {}",
                    utils::note_prefix(),
                    "No sitecheck.toml found; using defaults."
                );
            }
            if eff.output != "json" && eff.domain.is_none() {
                eprintln!(
                    "{} {}",
                    utils::note_prefix(),
                    "No site domain configured; canonical URL checks are skipped."
                );
            }
            if eff.output != "json" {
                eprintln!(
                    "{} {}",
                    utils::info_prefix(),
                    format!("Auditing site at {}", eff.site_root.to_string_lossy())
                );
            }
            let result = audit::run_audit(&eff);
            output::print_report(
                &result.report,
                if dump { Some(&result.pages) } else { None },
                &eff.output,
            );
            // Informational by default; --check turns critical findings into
            // a build gate.
            if check && result.report.summary.critical > 0 {
                std::process::exit(1);
            }
        }
        Commands::Sitemap {
            site_root,
            domain,
            output,
            check,
        } => {
            let eff = config::resolve_effective(
                site_root.as_deref(),
                domain.as_deref(),
                output.as_deref(),
            );
            if eff.domain.is_none() {
                eprintln!(
                    "{} {}",
                    utils::error_prefix(),
                    "Domain is not configured. Pass --domain or add sitecheck.toml."
                );
                std::process::exit(2);
            }
            if eff.output != "json" && config::load_config(&eff.site_root).is_none() {
                eprintln!(
                    "{} {}",
                    utils::note_prefix(),
                    "No sitecheck.toml found; using defaults."
                );
            }
            let report = sitemap::run_sitemap(&eff);
            output::print_report(&report, None, &eff.output);
            if check && !report.findings.is_empty() {
                std::process::exit(1);
            }
        }
    }
}
