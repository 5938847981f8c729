//! CLI for the adaudit ad creative auditor.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use adaudit_core::config;
use std::path::PathBuf;

use commands::{
    run_audit, run_expand_geo, run_keywords, run_rebuild_etas, run_recover, run_rsas, AuditArgs,
    ExpandGeoArgs, RebuildArgs, RecoverArgs,
};

/// Top-level CLI for adaudit.
#[derive(Debug, Parser)]
#[command(name = "adaudit")]
#[command(about = "adaudit: ad URL/UTM auditor and idempotent asset copier", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of ~/.config/adaudit/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Audit final URLs and UTM tagging of an ads snapshot.
    Audit(AuditArgs),

    /// Copy keywords and responsive search ads from one ad group snapshot to another.
    Recover(RecoverArgs),

    /// Rebuild legacy expanded text ads as responsive search ads.
    RebuildEtas(RebuildArgs),

    /// Summarize the positive keywords of an ad group snapshot.
    Keywords {
        /// Ad group snapshot (JSON).
        #[arg(long, value_name = "FILE")]
        snapshot: PathBuf,
        /// Also write the keyword list as CSV.
        #[arg(long, value_name = "FILE")]
        to_csv: Option<PathBuf>,
    },

    /// List the responsive search ads of an ad group snapshot.
    Rsas {
        /// Ad group snapshot (JSON).
        #[arg(long, value_name = "FILE")]
        snapshot: PathBuf,
    },

    /// Expand seed keywords with US geo modifiers into a bulk upload CSV.
    ExpandGeo(ExpandGeoArgs),
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Audit(args) => run_audit(&cfg, &args).await?,
            CliCommand::Recover(args) => run_recover(&cfg, &args)?,
            CliCommand::RebuildEtas(args) => run_rebuild_etas(&cfg, &args)?,
            CliCommand::Keywords { snapshot, to_csv } => {
                run_keywords(&snapshot, to_csv.as_deref())?
            }
            CliCommand::Rsas { snapshot } => run_rsas(&snapshot)?,
            CliCommand::ExpandGeo(args) => run_expand_geo(&args)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
