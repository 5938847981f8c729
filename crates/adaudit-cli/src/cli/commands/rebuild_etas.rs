//! `adaudit rebuild-etas` – recreate legacy expanded text ads as responsive
//! search ads in the destination ad group.

use anyhow::Result;
use clap::Args;
use adaudit_core::config::AuditConfig;
use adaudit_core::reconcile::{self, RsaPlan, RunMode};
use serde::Serialize;

use super::recover::{print_rsa_summary, write_report, CopyFlags};

#[derive(Debug, Args)]
pub struct RebuildArgs {
    #[command(flatten)]
    pub common: CopyFlags,
}

#[derive(Debug, Serialize)]
struct RebuildReport<'a> {
    source: String,
    destination: String,
    preview: bool,
    ads: &'a RsaPlan,
}

pub fn run_rebuild_etas(cfg: &AuditConfig, args: &RebuildArgs) -> Result<()> {
    let rc = args.common.apply(&cfg.reconcile);
    let mode = args.common.mode();
    let (source, dest) = args.common.load()?;

    let candidates = reconcile::eta_candidates(&source.ads, rc.pin);
    println!(
        "Found {} expanded text ad(s) in {}",
        candidates.len(),
        source.ad_group.label()
    );
    let plan = reconcile::reconcile_rsas(
        candidates,
        &reconcile::destination_fingerprints(&dest.ads),
        &dest.ad_group,
        &rc,
        mode,
    );
    let preview = mode == RunMode::Preview;
    print_rsa_summary(&plan, preview);

    write_report(
        args.common.out.as_deref(),
        &RebuildReport {
            source: source.ad_group.resource_name(),
            destination: dest.ad_group.resource_name(),
            preview,
            ads: &plan,
        },
    )
}
