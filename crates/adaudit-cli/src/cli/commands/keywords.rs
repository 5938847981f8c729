//! `adaudit keywords` – positive keyword counts for an ad group snapshot.

use anyhow::{Context, Result};
use adaudit_core::analysis::{self, PositiveKeyword};
use adaudit_core::snapshot;
use std::path::Path;

use crate::cli::output::write_csv;

const EXAMPLES_SHOWN: usize = 20;

pub fn run_keywords(snapshot_path: &Path, to_csv: Option<&Path>) -> Result<()> {
    let snap = snapshot::read_ad_group(snapshot_path).context("loading ad group snapshot")?;
    let report = analysis::positive_keyword_report(&snap.keywords);

    println!(
        "Positive keywords in {}: {}\n",
        snap.ad_group.label(),
        report.total
    );
    if !report.by_match_type.is_empty() {
        println!("By match type:");
        for (mt, n) in &report.by_match_type {
            println!("  {:<12} {}", mt, n);
        }
        println!();
    }
    if !report.by_status.is_empty() {
        println!("By status:");
        for (st, n) in &report.by_status {
            println!("  {:<12} {}", st, n);
        }
        println!();
    }
    for kw in report.keywords.iter().take(EXAMPLES_SHOWN) {
        let bid = kw
            .cpc_bid
            .map(|b| format!(" | bid ${b:.2}"))
            .unwrap_or_default();
        println!("[{}] {}: {}{}", kw.status, kw.match_type, kw.text, bid);
    }
    if report.total > EXAMPLES_SHOWN {
        println!("... (+{} more)", report.total - EXAMPLES_SHOWN);
    }

    if let Some(path) = to_csv {
        write_csv(
            path,
            &PositiveKeyword::COLUMNS,
            report.keywords.iter().map(PositiveKeyword::row),
        )?;
        println!("\nWrote CSV → {}", path.display());
    }
    Ok(())
}
