//! `adaudit recover` – copy missing keywords and responsive search ads into
//! a destination ad group.

use anyhow::{Context, Result};
use clap::Args;
use adaudit_core::config::AuditConfig;
use adaudit_core::model::AdGroupSnapshot;
use adaudit_core::reconcile::{
    self, KeywordPlan, PadMode, ReconcileConfig, RsaPlan, RunMode,
};
use adaudit_core::snapshot;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cli::output::write_json;

/// Flags shared by every copy-style command.
#[derive(Debug, Args)]
pub struct CopyFlags {
    /// Source ad group snapshot (JSON).
    #[arg(long, value_name = "FILE")]
    pub source: PathBuf,

    /// Destination ad group snapshot (JSON).
    #[arg(long, value_name = "FILE")]
    pub dest: PathBuf,

    /// Classify and count only; build no operations.
    #[arg(long)]
    pub dry_run: bool,

    /// Create new positives and ads paused.
    #[arg(long)]
    pub pause_on_create: bool,

    /// Do not skip items that already exist (or were already staged).
    #[arg(long)]
    pub no_dedupe: bool,

    /// Copy text assets without pinning them to a slot.
    #[arg(long)]
    pub no_pin: bool,

    /// Under-filled creatives: skip, or pad with generic assets.
    #[arg(long, value_name = "MODE")]
    pub pad_mode: Option<PadMode>,

    /// Write the plan (summaries, outcomes, operations) as JSON.
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

impl CopyFlags {
    pub(crate) fn mode(&self) -> RunMode {
        if self.dry_run {
            RunMode::Preview
        } else {
            RunMode::Execute
        }
    }

    /// Layers these flags over the configured reconcile settings.
    pub(crate) fn apply(&self, base: &ReconcileConfig) -> ReconcileConfig {
        let mut cfg = base.clone();
        cfg.pause_on_create |= self.pause_on_create;
        if self.no_dedupe {
            cfg.dedupe = false;
        }
        if self.no_pin {
            cfg.pin = false;
        }
        if let Some(mode) = self.pad_mode {
            cfg.pad_mode = mode;
        }
        cfg
    }

    pub(crate) fn load(&self) -> Result<(AdGroupSnapshot, AdGroupSnapshot)> {
        let source = snapshot::read_ad_group(&self.source).context("loading source ad group")?;
        let dest = snapshot::read_ad_group(&self.dest).context("loading destination ad group")?;
        Ok((source, dest))
    }
}

#[derive(Debug, Args)]
pub struct RecoverArgs {
    #[command(flatten)]
    pub common: CopyFlags,

    /// Force every copied keyword to EXACT match.
    #[arg(long)]
    pub only_exact: bool,

    /// Copy negative keywords too.
    #[arg(long)]
    pub copy_negatives: bool,
}

#[derive(Debug, Serialize)]
struct RecoverReport<'a> {
    source: String,
    destination: String,
    preview: bool,
    keywords: &'a KeywordPlan,
    ads: &'a RsaPlan,
}

pub(crate) fn print_rsa_summary(plan: &RsaPlan, preview: bool) {
    let s = &plan.summary;
    let verb = if preview { "would create" } else { "to create" };
    println!(
        "RSAs: {} considered, {} {verb}, {} already present, {} incomplete ({} padded)",
        s.considered, s.staged, s.skipped_duplicate, s.skipped_incomplete, s.padded
    );
}

pub(crate) fn write_report<T: Serialize>(out: Option<&Path>, report: &T) -> Result<()> {
    if let Some(path) = out {
        write_json(path, report)?;
        println!("Wrote plan → {}", path.display());
    }
    Ok(())
}

pub fn run_recover(cfg: &AuditConfig, args: &RecoverArgs) -> Result<()> {
    let mut rc = args.common.apply(&cfg.reconcile);
    rc.only_exact |= args.only_exact;
    rc.copy_negatives |= args.copy_negatives;
    let mode = args.common.mode();
    let (source, dest) = args.common.load()?;

    println!(
        "Source: {}\nDestination: {}",
        source.ad_group.label(),
        dest.ad_group.label()
    );

    let keywords = reconcile::reconcile_keywords(
        &source.keywords,
        &reconcile::destination_keyword_keys(&dest.keywords),
        &dest.ad_group,
        &rc,
        mode,
    );
    let ads = reconcile::reconcile_rsas(
        reconcile::rsa_candidates(&source.ads, rc.pin),
        &reconcile::destination_fingerprints(&dest.ads),
        &dest.ad_group,
        &rc,
        mode,
    );

    let preview = mode == RunMode::Preview;
    let k = &keywords.summary;
    println!(
        "Keywords: {} considered, {} {}, {} already present, {} negatives skipped",
        k.considered,
        k.staged,
        if preview { "would create" } else { "to create" },
        k.skipped_duplicate,
        k.skipped_negative
    );
    print_rsa_summary(&ads, preview);

    write_report(
        args.common.out.as_deref(),
        &RecoverReport {
            source: source.ad_group.resource_name(),
            destination: dest.ad_group.resource_name(),
            preview,
            keywords: &keywords,
            ads: &ads,
        },
    )
}
