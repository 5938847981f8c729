//! `adaudit rsas` – list the responsive search ads of an ad group snapshot.

use adaudit_core::analysis;
use adaudit_core::snapshot;
use anyhow::{Context, Result};
use std::path::Path;

pub fn run_rsas(snapshot_path: &Path) -> Result<()> {
    let snap = snapshot::read_ad_group(snapshot_path).context("loading ad group snapshot")?;
    let listing = analysis::rsa_listing(&snap.ads);

    println!(
        "Found {} RSA(s) in {}\n",
        listing.len(),
        snap.ad_group.label()
    );
    for (i, rsa) in listing.iter().enumerate() {
        println!("RSA {} (id={}, status={}):", i + 1, rsa.ad_id, rsa.status);
        if let Some(url) = &rsa.final_url {
            println!("  Final URL: {}", url);
        }
        println!("  Headlines: {}", rsa.headlines.join(" | "));
        println!("  Descriptions: {}", rsa.descriptions.join(" | "));
        println!();
    }
    Ok(())
}
