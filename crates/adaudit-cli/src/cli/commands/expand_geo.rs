//! `adaudit expand-geo` – seed keywords × US geo modifiers → bulk upload CSV.

use anyhow::{Context, Result};
use clap::Args;
use adaudit_core::geo::{self, BulkSheet, GeoOptions};
use std::fs;
use std::path::PathBuf;

use crate::cli::output::write_csv;

#[derive(Debug, Args)]
pub struct ExpandGeoArgs {
    /// Plain text file with one seed keyword per line.
    pub input: PathBuf,

    /// CSV file to write.
    pub output: PathBuf,

    #[arg(long)]
    pub campaign: String,

    #[arg(long)]
    pub ad_group: String,

    #[arg(long, default_value = "Add")]
    pub action: String,

    #[arg(long, default_value = "Enabled")]
    pub status: String,

    #[arg(long = "match", default_value = "Exact match", value_name = "MATCH")]
    pub match_type: String,

    /// Leave out state names (and therefore abbreviations).
    #[arg(long)]
    pub no_states: bool,

    /// Leave out state postal abbreviations.
    #[arg(long)]
    pub no_abbrev: bool,

    /// Add major metro areas.
    #[arg(long)]
    pub metros: bool,

    /// Extra geo name such as a target county. Repeatable.
    #[arg(long = "county", value_name = "NAME")]
    pub counties: Vec<String>,
}

impl ExpandGeoArgs {
    pub(crate) fn options(&self) -> GeoOptions {
        GeoOptions {
            states: !self.no_states,
            abbreviations: !self.no_abbrev,
            metros: self.metros,
            counties: self.counties.clone(),
        }
    }
}

pub fn run_expand_geo(args: &ExpandGeoArgs) -> Result<()> {
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("reading seeds {}", args.input.display()))?;
    let seeds: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let expanded = geo::expand_keywords(&seeds, &args.options());
    tracing::info!(seeds = seeds.len(), keywords = expanded.len(), "geo expansion");

    let sheet = BulkSheet {
        action: args.action.clone(),
        status: args.status.clone(),
        campaign: args.campaign.clone(),
        ad_group: args.ad_group.clone(),
        match_type: args.match_type.clone(),
    };
    write_csv(
        &args.output,
        &BulkSheet::COLUMNS,
        expanded.iter().map(|kw| sheet.row(kw)),
    )?;
    println!(
        "Expanded {} seed(s) into {} keyword(s) → {}",
        seeds.len(),
        expanded.len(),
        args.output.display()
    );
    Ok(())
}
