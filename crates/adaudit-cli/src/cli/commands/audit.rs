//! `adaudit audit` – findings and ad/URL crosswalk for an ads snapshot.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use adaudit_core::config::AuditConfig;
use adaudit_core::findings::{self, AuditContext, Finding, Severity, UrlMapRow};
use adaudit_core::probe::{self, CurlProber, ProbeConfig, ProbeResults, ProbeTarget};
use adaudit_core::snapshot;
use adaudit_core::utm::{self, CasePolicy, UtmPolicy};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::cli::output::{write_csv, write_json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

#[derive(Debug, Args)]
pub struct AuditArgs {
    /// Ads snapshot (JSON array of ads, or an ad group snapshot).
    #[arg(long, value_name = "FILE")]
    pub ads: PathBuf,

    /// Output directory.
    #[arg(long, default_value = "./out", value_name = "DIR")]
    pub out: PathBuf,

    /// Probe final URLs via HTTP.
    #[arg(long)]
    pub check_http: bool,

    /// HTTP probe timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Maximum HTTP probes in flight.
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Required UTM keys (replaces the configured list).
    #[arg(long, num_args = 0.., value_name = "KEY")]
    pub utm_required: Option<Vec<String>>,

    /// Exact UTM expectation, e.g. utm_medium=cpc. Repeatable.
    #[arg(long, value_name = "KEY=VALUE")]
    pub utm_expect: Vec<String>,

    /// Pattern UTM expectation, e.g. utm_campaign=/spring_.*/. Repeatable.
    #[arg(long, value_name = "KEY=/PATTERN/")]
    pub utm_match: Vec<String>,

    /// Case every UTM value must use: none, lower or upper.
    #[arg(long, value_name = "CASE")]
    pub utm_case: Option<CasePolicy>,

    /// Skip UTM checks for URLs carrying gclid (auto-tagging).
    #[arg(long)]
    pub allow_autotag_only: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,
}

/// Layers command-line UTM flags over the configured policy. Malformed
/// expectations are reported and skipped.
pub(crate) fn effective_policy(base: &UtmPolicy, args: &AuditArgs) -> UtmPolicy {
    let mut policy = base.clone();
    if let Some(required) = &args.utm_required {
        policy.required = required.clone();
    }
    for item in &args.utm_expect {
        match utm::parse_exact_expectation(item) {
            Ok((key, value)) => {
                policy.expect_exact.insert(key, value);
            }
            Err(e) => tracing::warn!("ignoring --utm-expect: {e}"),
        }
    }
    for item in &args.utm_match {
        match utm::parse_pattern_expectation(item) {
            Ok((key, pattern)) => {
                policy.expect_regex.insert(key, pattern);
            }
            Err(e) => tracing::warn!("ignoring --utm-match: {e}"),
        }
    }
    if let Some(case) = args.utm_case {
        policy.case = case;
    }
    if args.allow_autotag_only {
        policy.allow_autotag_only = true;
    }
    policy
}

pub(crate) fn effective_probe(base: &ProbeConfig, args: &AuditArgs) -> ProbeConfig {
    let mut probe = base.clone();
    probe.enabled |= args.check_http;
    if let Some(t) = args.timeout {
        probe.timeout_secs = t;
    }
    if let Some(n) = args.concurrency {
        probe.concurrency = n;
    }
    probe
}

pub async fn run_audit(cfg: &AuditConfig, args: &AuditArgs) -> Result<()> {
    let ads = snapshot::read_ads(&args.ads)?;
    eprintln!("Auditing {} ad(s) from {}", ads.len(), args.ads.display());

    let policy = effective_policy(&cfg.utm, args).compile();
    for rejected in policy.rejected() {
        eprintln!("  skipped rule: {rejected}");
    }

    let probe_cfg = effective_probe(&cfg.probe, args);
    let probes: Option<ProbeResults> = if probe_cfg.enabled {
        let targets = ProbeTarget::from_ads(&ads);
        eprintln!(
            "Probing {} URL(s) ({}s timeout, {} at a time) ...",
            targets.len(),
            probe_cfg.timeout().as_secs(),
            probe_cfg.concurrency.max(1)
        );
        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_on_signal = Arc::clone(&cancel);
        let signal_task = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupt received, not starting further probes");
                cancel_on_signal.store(true, Ordering::Relaxed);
            }
        });
        let results =
            probe::probe_all(Arc::new(CurlProber), targets, &probe_cfg, cancel).await;
        signal_task.abort();
        Some(results)
    } else {
        None
    };

    let ctx = AuditContext {
        policy: &policy,
        probes: probes.as_ref(),
    };
    let found = findings::audit_ads(&ads, &ctx);
    let url_map = findings::crosswalk(&ads);

    fs::create_dir_all(&args.out)
        .with_context(|| format!("creating output dir {}", args.out.display()))?;
    match args.format {
        OutputFormat::Csv => {
            write_csv(
                &args.out.join("findings.csv"),
                &Finding::COLUMNS,
                found.iter().map(Finding::row),
            )?;
            write_csv(
                &args.out.join("ad_url_map.csv"),
                &UrlMapRow::COLUMNS,
                url_map.iter().map(UrlMapRow::row),
            )?;
        }
        OutputFormat::Json => {
            write_json(&args.out.join("findings.json"), &found)?;
            write_json(&args.out.join("ad_url_map.json"), &url_map)?;
        }
    }

    let count = |s: Severity| found.iter().filter(|f| f.severity == s).count();
    eprintln!(
        "  findings: {} (error {}, warn {}, info {})",
        found.len(),
        count(Severity::Error),
        count(Severity::Warn),
        count(Severity::Info)
    );
    eprintln!("Done. Files in: {}", args.out.display());
    Ok(())
}
