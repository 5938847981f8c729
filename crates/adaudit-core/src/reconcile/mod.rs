//! Additive reconciliation of keywords and responsive search ads.
//!
//! Given source records and the identities already present at the
//! destination, compute what to create so the destination ends up with every
//! source asset. The result only ever contains create operations; existing
//! destination state is never updated or removed, and re-running against the
//! updated destination stages nothing new.
//!
//! Each source record ends in exactly one [`Classification`]. A preview run
//! classifies exactly like an execute run but materializes no operations.

mod keywords;
mod pad;
mod rsa;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use keywords::{
    destination_keyword_keys, reconcile_keywords, KeywordCreateOp, KeywordKey, KeywordOutcome,
    KeywordPlan, KeywordSummary,
};
pub use pad::{default_fallback_descriptions, default_fallback_headlines, MIN_DESCRIPTIONS, MIN_HEADLINES};
pub use rsa::{
    destination_fingerprints, eta_candidates, reconcile_rsas, rsa_candidates, RsaCandidate,
    RsaCreateOp, RsaOutcome, RsaPlan, RsaSummary,
};

/// How to treat a creative below the RSA minimums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PadMode {
    /// Skip it as incomplete.
    #[default]
    Skip,
    /// Top it up from the fallback asset library.
    Generic,
}

impl PadMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PadMode::Skip => "skip",
            PadMode::Generic => "generic",
        }
    }
}

impl fmt::Display for PadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PadMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(PadMode::Skip),
            "generic" => Ok(PadMode::Generic),
            other => Err(format!("unknown pad mode '{other}' (expected skip or generic)")),
        }
    }
}

/// Reconciliation settings (`[reconcile]` section of config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    pub pad_mode: PadMode,
    /// Pin rebuilt legacy-ad parts to their original slots.
    pub pin: bool,
    /// Skip identities already at the destination or already staged this run.
    pub dedupe: bool,
    /// Copy negative keywords too.
    pub copy_negatives: bool,
    /// Force every copied keyword to EXACT match.
    pub only_exact: bool,
    /// Create positives and ads paused instead of enabled.
    pub pause_on_create: bool,
    /// Filler headlines used by `pad_mode = "generic"`, in order of preference.
    pub fallback_headlines: Vec<String>,
    /// Filler descriptions used by `pad_mode = "generic"`, in order of preference.
    pub fallback_descriptions: Vec<String>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            pad_mode: PadMode::Skip,
            pin: true,
            dedupe: true,
            copy_negatives: false,
            only_exact: false,
            pause_on_create: false,
            fallback_headlines: default_fallback_headlines(),
            fallback_descriptions: default_fallback_descriptions(),
        }
    }
}

/// Whether a run materializes operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Dry run: classify and count only.
    Preview,
    Execute,
}

/// Final state of one source record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    /// Missing content, or below minimums after padding and de-duplication.
    SkippedIncomplete,
    /// Identity already at the destination or staged earlier in this run.
    SkippedDuplicate,
    /// Negative keyword left behind because negatives were not requested.
    SkippedNegative,
    StagedForCreation,
}

impl Classification {
    pub fn as_str(self) -> &'static str {
        match self {
            Classification::SkippedIncomplete => "skipped-incomplete",
            Classification::SkippedDuplicate => "skipped-duplicate",
            Classification::SkippedNegative => "skipped-negative",
            Classification::StagedForCreation => "staged-for-creation",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
