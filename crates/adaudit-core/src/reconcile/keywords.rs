//! Keyword reconciliation keyed by [`KeywordKey`].

use std::collections::HashSet;

use serde::Serialize;

use crate::model::{AdGroupRef, KeywordRecord, MatchType, Status};

use super::{Classification, ReconcileConfig, RunMode};

/// Identity of a keyword: case-insensitive on text, sensitive to match type
/// and the negative flag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct KeywordKey {
    text: String,
    match_type: MatchType,
    negative: bool,
}

impl KeywordKey {
    pub fn new(text: &str, match_type: MatchType, negative: bool) -> Self {
        Self {
            text: text.trim().to_lowercase(),
            match_type,
            negative,
        }
    }

    pub fn of(kw: &KeywordRecord) -> Self {
        Self::new(&kw.text, kw.match_type, kw.negative)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn match_type(&self) -> MatchType {
        self.match_type
    }

    pub fn negative(&self) -> bool {
        self.negative
    }
}

/// Keys of every keyword already in a destination collection, negatives included.
pub fn destination_keyword_keys(keywords: &[KeywordRecord]) -> HashSet<KeywordKey> {
    keywords.iter().map(KeywordKey::of).collect()
}

/// One keyword criterion to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordCreateOp {
    /// Target ad group resource name.
    pub ad_group: String,
    pub text: String,
    pub match_type: MatchType,
    pub negative: bool,
    /// Set for positives only; negatives carry no serving status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KeywordSummary {
    pub considered: usize,
    pub skipped_negative: usize,
    pub skipped_incomplete: usize,
    pub skipped_duplicate: usize,
    pub staged: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordOutcome {
    pub text: String,
    pub match_type: MatchType,
    pub negative: bool,
    pub classification: Classification,
}

/// Result of one keyword pass; `operations` is empty in preview mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeywordPlan {
    pub summary: KeywordSummary,
    pub outcomes: Vec<KeywordOutcome>,
    pub operations: Vec<KeywordCreateOp>,
}

/// Classifies source keywords against `destination` and, in execute mode,
/// builds create operations for `target`.
///
/// The match type is forced to EXACT before the key is computed when
/// `cfg.only_exact` is set, so variants that collapse onto the same key are
/// staged once. With `cfg.dedupe` off, neither the destination set nor
/// earlier keywords of this run are consulted.
pub fn reconcile_keywords(
    source: &[KeywordRecord],
    destination: &HashSet<KeywordKey>,
    target: &AdGroupRef,
    cfg: &ReconcileConfig,
    mode: RunMode,
) -> KeywordPlan {
    let mut summary = KeywordSummary::default();
    let mut outcomes = Vec::with_capacity(source.len());
    let mut seen: HashSet<KeywordKey> = HashSet::new();
    let mut staged: Vec<(String, MatchType, bool)> = Vec::new();

    for kw in source {
        summary.considered += 1;
        let text = kw.text.trim();
        let match_type = if cfg.only_exact {
            MatchType::Exact
        } else {
            kw.match_type
        };

        let classification = if kw.negative && !cfg.copy_negatives {
            Classification::SkippedNegative
        } else if text.is_empty() {
            Classification::SkippedIncomplete
        } else if match_type == MatchType::Unknown {
            tracing::warn!(keyword = text, "unrecognized match type, keyword not copied");
            Classification::SkippedIncomplete
        } else {
            let key = KeywordKey::new(text, match_type, kw.negative);
            if cfg.dedupe && (destination.contains(&key) || !seen.insert(key)) {
                Classification::SkippedDuplicate
            } else {
                staged.push((text.to_string(), match_type, kw.negative));
                Classification::StagedForCreation
            }
        };

        match classification {
            Classification::SkippedNegative => summary.skipped_negative += 1,
            Classification::SkippedIncomplete => summary.skipped_incomplete += 1,
            Classification::SkippedDuplicate => summary.skipped_duplicate += 1,
            Classification::StagedForCreation => summary.staged += 1,
        }
        tracing::debug!(
            keyword = text,
            match_type = %match_type,
            negative = kw.negative,
            %classification,
            "keyword"
        );
        outcomes.push(KeywordOutcome {
            text: text.to_string(),
            match_type,
            negative: kw.negative,
            classification,
        });
    }

    let operations = match mode {
        RunMode::Preview => Vec::new(),
        RunMode::Execute => {
            let ad_group = target.resource_name();
            let positive_status = if cfg.pause_on_create {
                Status::Paused
            } else {
                Status::Enabled
            };
            staged
                .into_iter()
                .map(|(text, match_type, negative)| KeywordCreateOp {
                    ad_group: ad_group.clone(),
                    text,
                    match_type,
                    negative,
                    status: (!negative).then_some(positive_status),
                })
                .collect()
        }
    };

    tracing::info!(
        ad_group = %target.label(),
        considered = summary.considered,
        staged = summary.staged,
        duplicates = summary.skipped_duplicate,
        negatives_skipped = summary.skipped_negative,
        preview = matches!(mode, RunMode::Preview),
        "keyword reconciliation complete"
    );

    KeywordPlan {
        summary,
        outcomes,
        operations,
    }
}
