//! Responsive search ad reconciliation.
//!
//! Candidates come from existing responsive search ads (copy) or from legacy
//! expanded text ads (rebuild). Every candidate runs through the same rules:
//! content present, minimums met (after optional padding), assets
//! de-duplicated, fingerprint not already known.

use std::collections::HashSet;

use serde::Serialize;

use crate::fingerprint::Fingerprint;
use crate::model::{non_empty, AdGroupRef, AdRecord, Creative, PinnedField, Status, TextAsset};

use super::pad::{dedup_assets, distinct_count, pad_to_minimum, MIN_DESCRIPTIONS, MIN_HEADLINES};
use super::{Classification, PadMode, ReconcileConfig, RunMode};

/// Creative content to be considered for creation at the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaCandidate {
    pub source_ad_id: String,
    pub headlines: Vec<TextAsset>,
    pub descriptions: Vec<TextAsset>,
    pub final_urls: Vec<String>,
    pub path1: Option<String>,
    pub path2: Option<String>,
}

impl RsaCandidate {
    /// Copy of an existing responsive search ad. Source pins are kept only
    /// when `pin` is set.
    pub fn from_rsa(ad: &AdRecord, pin: bool) -> Option<Self> {
        let Creative::ResponsiveSearchAd(rsa) = &ad.creative else {
            return None;
        };
        let keep = |assets: &[TextAsset]| -> Vec<TextAsset> {
            assets
                .iter()
                .filter(|a| !a.text.trim().is_empty())
                .map(|a| TextAsset {
                    text: a.text.trim().to_string(),
                    pinned_field: if pin { a.pinned_field } else { None },
                })
                .collect()
        };
        Some(Self {
            source_ad_id: ad.ad_id.clone(),
            headlines: keep(&rsa.headlines),
            descriptions: keep(&rsa.descriptions),
            final_urls: clean_urls(&ad.final_urls),
            path1: trimmed(rsa.path1.as_deref()),
            path2: trimmed(rsa.path2.as_deref()),
        })
    }

    /// Rebuild of a legacy expanded text ad. Headline parts 1-3 and
    /// descriptions 1-2 become assets, pinned to their original slot when
    /// `pin` is set. Empty slots are left out.
    pub fn from_eta(ad: &AdRecord, pin: bool) -> Option<Self> {
        let Creative::ExpandedTextAd(eta) = &ad.creative else {
            return None;
        };
        let slot = |text: Option<&str>, field: PinnedField| {
            trimmed(text).map(|t| TextAsset {
                text: t,
                pinned_field: pin.then_some(field),
            })
        };
        let headlines = [
            slot(eta.headline_part1.as_deref(), PinnedField::Headline1),
            slot(eta.headline_part2.as_deref(), PinnedField::Headline2),
            slot(eta.headline_part3.as_deref(), PinnedField::Headline3),
        ];
        let descriptions = [
            slot(eta.description.as_deref(), PinnedField::Description1),
            slot(eta.description2.as_deref(), PinnedField::Description2),
        ];
        Some(Self {
            source_ad_id: ad.ad_id.clone(),
            headlines: headlines.into_iter().flatten().collect(),
            descriptions: descriptions.into_iter().flatten().collect(),
            final_urls: clean_urls(&ad.final_urls),
            path1: trimmed(eta.path1.as_deref()),
            path2: trimmed(eta.path2.as_deref()),
        })
    }

    fn fingerprint(&self) -> Fingerprint {
        Fingerprint::from_assets(
            &self.headlines,
            &self.descriptions,
            &self.final_urls,
            self.path1.as_deref(),
            self.path2.as_deref(),
        )
    }
}

fn trimmed(s: Option<&str>) -> Option<String> {
    non_empty(s).map(|s| s.trim().to_string())
}

fn clean_urls(urls: &[String]) -> Vec<String> {
    urls.iter()
        .map(|u| u.trim())
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .collect()
}

/// Candidates from every responsive search ad in `ads`; other ad types are ignored.
pub fn rsa_candidates(ads: &[AdRecord], pin: bool) -> Vec<RsaCandidate> {
    ads.iter()
        .filter_map(|ad| RsaCandidate::from_rsa(ad, pin))
        .collect()
}

/// Candidates from every legacy expanded text ad in `ads`; other ad types are ignored.
pub fn eta_candidates(ads: &[AdRecord], pin: bool) -> Vec<RsaCandidate> {
    ads.iter()
        .filter_map(|ad| RsaCandidate::from_eta(ad, pin))
        .collect()
}

/// Fingerprints of the responsive search ads already in a destination
/// collection. Removed ads still count.
pub fn destination_fingerprints(ads: &[AdRecord]) -> HashSet<Fingerprint> {
    ads.iter().filter_map(Fingerprint::of_ad).collect()
}

/// One responsive search ad to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RsaCreateOp {
    /// Target ad group resource name.
    pub ad_group: String,
    pub status: Status,
    pub source_ad_id: String,
    pub headlines: Vec<TextAsset>,
    pub descriptions: Vec<TextAsset>,
    pub final_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path2: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RsaSummary {
    pub considered: usize,
    pub skipped_incomplete: usize,
    pub skipped_duplicate: usize,
    pub staged: usize,
    /// Creatives that received at least one fallback asset.
    pub padded: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RsaOutcome {
    pub source_ad_id: String,
    pub classification: Classification,
}

/// Result of one reconciliation pass.
///
/// `operations` is empty in preview mode; everything else is identical
/// between preview and execute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RsaPlan {
    pub summary: RsaSummary,
    pub outcomes: Vec<RsaOutcome>,
    pub operations: Vec<RsaCreateOp>,
}

/// Classifies every candidate against `destination` and, in execute mode,
/// builds create operations targeting `target`.
///
/// When `cfg.dedupe` is set, a fingerprint staged earlier in the same pass
/// also counts as a duplicate. Operations are only built once the whole pass
/// is finished.
pub fn reconcile_rsas(
    candidates: Vec<RsaCandidate>,
    destination: &HashSet<Fingerprint>,
    target: &AdGroupRef,
    cfg: &ReconcileConfig,
    mode: RunMode,
) -> RsaPlan {
    let mut summary = RsaSummary::default();
    let mut outcomes = Vec::with_capacity(candidates.len());
    let mut staged_fps: HashSet<Fingerprint> = HashSet::new();
    let mut staged = Vec::new();

    for candidate in candidates {
        summary.considered += 1;
        let source_ad_id = candidate.source_ad_id.clone();
        let (classification, padded) =
            classify(candidate, destination, &mut staged_fps, cfg, &mut staged);
        if padded {
            summary.padded += 1;
        }
        match classification {
            Classification::SkippedIncomplete => summary.skipped_incomplete += 1,
            Classification::SkippedDuplicate => summary.skipped_duplicate += 1,
            Classification::StagedForCreation => summary.staged += 1,
            Classification::SkippedNegative => {}
        }
        tracing::debug!(ad_id = %source_ad_id, %classification, "rsa candidate");
        outcomes.push(RsaOutcome {
            source_ad_id,
            classification,
        });
    }

    let operations = match mode {
        RunMode::Preview => Vec::new(),
        RunMode::Execute => {
            let ad_group = target.resource_name();
            let status = if cfg.pause_on_create {
                Status::Paused
            } else {
                Status::Enabled
            };
            staged
                .into_iter()
                .map(|c: RsaCandidate| RsaCreateOp {
                    ad_group: ad_group.clone(),
                    status,
                    source_ad_id: c.source_ad_id,
                    headlines: c.headlines,
                    descriptions: c.descriptions,
                    final_urls: c.final_urls,
                    path1: c.path1,
                    path2: c.path2,
                })
                .collect()
        }
    };

    tracing::info!(
        ad_group = %target.label(),
        considered = summary.considered,
        staged = summary.staged,
        duplicates = summary.skipped_duplicate,
        incomplete = summary.skipped_incomplete,
        padded = summary.padded,
        preview = matches!(mode, RunMode::Preview),
        "rsa reconciliation complete"
    );

    RsaPlan {
        summary,
        outcomes,
        operations,
    }
}

fn classify(
    mut c: RsaCandidate,
    destination: &HashSet<Fingerprint>,
    staged_fps: &mut HashSet<Fingerprint>,
    cfg: &ReconcileConfig,
    staged: &mut Vec<RsaCandidate>,
) -> (Classification, bool) {
    if c.headlines.is_empty() || c.descriptions.is_empty() || c.final_urls.is_empty() {
        return (Classification::SkippedIncomplete, false);
    }

    let mut padded = false;
    let short = distinct_count(&c.headlines) < MIN_HEADLINES
        || distinct_count(&c.descriptions) < MIN_DESCRIPTIONS;
    if short {
        match cfg.pad_mode {
            PadMode::Skip => return (Classification::SkippedIncomplete, false),
            PadMode::Generic => {
                let h = pad_to_minimum(&mut c.headlines, &cfg.fallback_headlines, MIN_HEADLINES);
                let d = pad_to_minimum(
                    &mut c.descriptions,
                    &cfg.fallback_descriptions,
                    MIN_DESCRIPTIONS,
                );
                padded = h + d > 0;
            }
        }
    }

    c.headlines = dedup_assets(c.headlines);
    c.descriptions = dedup_assets(c.descriptions);

    if c.headlines.len() < MIN_HEADLINES || c.descriptions.len() < MIN_DESCRIPTIONS {
        return (Classification::SkippedIncomplete, padded);
    }

    if cfg.dedupe {
        let fp = c.fingerprint();
        if destination.contains(&fp) || !staged_fps.insert(fp) {
            return (Classification::SkippedDuplicate, padded);
        }
    }

    staged.push(c);
    (Classification::StagedForCreation, padded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EtaCreative, RsaCreative};

    fn target() -> AdGroupRef {
        AdGroupRef {
            customer_id: "111".into(),
            ad_group_id: "222".into(),
            ..Default::default()
        }
    }

    fn rsa_ad(id: &str, headlines: &[&str], descriptions: &[&str], urls: &[&str]) -> AdRecord {
        AdRecord {
            ad_id: id.into(),
            final_urls: urls.iter().map(|s| s.to_string()).collect(),
            creative: Creative::ResponsiveSearchAd(RsaCreative {
                headlines: headlines.iter().map(|t| TextAsset::new(*t)).collect(),
                descriptions: descriptions.iter().map(|t| TextAsset::new(*t)).collect(),
                path1: None,
                path2: None,
            }),
            ..Default::default()
        }
    }

    fn full(id: &str) -> AdRecord {
        rsa_ad(
            id,
            &[&format!("{id} One"), "Two", "Three"],
            &["D1", "D2"],
            &["https://x.com/"],
        )
    }

    fn run(ads: &[AdRecord], dest: &HashSet<Fingerprint>, cfg: &ReconcileConfig) -> RsaPlan {
        reconcile_rsas(rsa_candidates(ads, cfg.pin), dest, &target(), cfg, RunMode::Execute)
    }

    fn classes(plan: &RsaPlan) -> Vec<Classification> {
        plan.outcomes.iter().map(|o| o.classification).collect()
    }

    #[test]
    fn missing_content_is_incomplete() {
        let ads = [
            rsa_ad("1", &[], &["D1", "D2"], &["https://x.com/"]),
            rsa_ad("2", &["A", "B", "C"], &[], &["https://x.com/"]),
            rsa_ad("3", &["A", "B", "C"], &["D1", "D2"], &[]),
        ];
        let cfg = ReconcileConfig {
            pad_mode: PadMode::Generic,
            ..Default::default()
        };
        let plan = run(&ads, &HashSet::new(), &cfg);
        assert_eq!(plan.summary.skipped_incomplete, 3);
        assert!(plan.operations.is_empty());
    }

    #[test]
    fn under_filled_skip_vs_generic() {
        let ad = rsa_ad("1", &["Only"], &["Desc"], &["https://x.com/"]);

        let skip = run(std::slice::from_ref(&ad), &HashSet::new(), &ReconcileConfig::default());
        assert_eq!(classes(&skip), vec![Classification::SkippedIncomplete]);

        let cfg = ReconcileConfig {
            pad_mode: PadMode::Generic,
            ..Default::default()
        };
        let generic = run(&[ad], &HashSet::new(), &cfg);
        assert_eq!(classes(&generic), vec![Classification::StagedForCreation]);
        assert_eq!(generic.summary.padded, 1);
        let op = &generic.operations[0];
        assert_eq!(op.headlines.len(), 3);
        assert_eq!(op.descriptions.len(), 2);
        assert_eq!(op.headlines[0].text, "Only");
        assert_eq!(op.headlines[1].text, "Accredited Online School");
    }

    #[test]
    fn repeated_assets_count_once_towards_minimum() {
        let ad = rsa_ad("1", &["A", "A", "B"], &["D1", "D2"], &["https://x.com/"]);
        let skip = run(std::slice::from_ref(&ad), &HashSet::new(), &ReconcileConfig::default());
        assert_eq!(classes(&skip), vec![Classification::SkippedIncomplete]);

        let cfg = ReconcileConfig {
            pad_mode: PadMode::Generic,
            ..Default::default()
        };
        let plan = run(&[ad], &HashSet::new(), &cfg);
        let op = &plan.operations[0];
        let texts: Vec<_> = op.headlines.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(texts, vec!["A", "B", "Accredited Online School"]);
    }

    #[test]
    fn exhausted_library_is_incomplete() {
        let cfg = ReconcileConfig {
            pad_mode: PadMode::Generic,
            fallback_headlines: vec!["Only One Filler".into()],
            ..Default::default()
        };
        let ad = rsa_ad("1", &["A"], &["D1", "D2"], &["https://x.com/"]);
        let plan = run(&[ad], &HashSet::new(), &cfg);
        assert_eq!(classes(&plan), vec![Classification::SkippedIncomplete]);
        assert_eq!(plan.summary.padded, 1);
    }

    #[test]
    fn existing_fingerprint_is_duplicate() {
        let dest = destination_fingerprints(&[rsa_ad(
            "99",
            &["Three", "1 One", "Two"],
            &["D2", "D1"],
            &["https://x.com/"],
        )]);
        let plan = run(&[full("1"), full("2")], &dest, &ReconcileConfig::default());
        assert_eq!(
            classes(&plan),
            vec![Classification::SkippedDuplicate, Classification::StagedForCreation]
        );
        assert_eq!(plan.operations.len(), 1);
        assert_eq!(plan.operations[0].source_ad_id, "2");
    }

    #[test]
    fn same_creative_twice_in_one_run_is_staged_once() {
        let plan = run(&[full("1"), full("1")], &HashSet::new(), &ReconcileConfig::default());
        assert_eq!(
            classes(&plan),
            vec![Classification::StagedForCreation, Classification::SkippedDuplicate]
        );
    }

    #[test]
    fn dedupe_off_stages_everything_complete() {
        let dest = destination_fingerprints(&[full("1")]);
        let cfg = ReconcileConfig {
            dedupe: false,
            ..Default::default()
        };
        let plan = run(&[full("1"), full("1")], &dest, &cfg);
        assert_eq!(plan.summary.staged, 2);
    }

    #[test]
    fn second_run_against_union_stages_nothing() {
        let cfg = ReconcileConfig {
            pad_mode: PadMode::Generic,
            ..Default::default()
        };
        let source = vec![
            full("1"),
            full("2"),
            rsa_ad("3", &["Short"], &["Desc"], &["https://x.com/s"]),
        ];
        let mut dest_ads = vec![full("1")];
        let first = run(&source, &destination_fingerprints(&dest_ads), &cfg);
        assert_eq!(first.summary.staged, 2);

        for op in &first.operations {
            dest_ads.push(AdRecord {
                ad_id: format!("new-{}", op.source_ad_id),
                final_urls: op.final_urls.clone(),
                creative: Creative::ResponsiveSearchAd(RsaCreative {
                    headlines: op.headlines.clone(),
                    descriptions: op.descriptions.clone(),
                    path1: op.path1.clone(),
                    path2: op.path2.clone(),
                }),
                ..Default::default()
            });
        }
        let second = run(&source, &destination_fingerprints(&dest_ads), &cfg);
        assert_eq!(second.summary.staged, 0);
        assert_eq!(second.summary.skipped_duplicate, 3);
    }

    #[test]
    fn preview_classifies_identically_without_operations() {
        let cfg = ReconcileConfig::default();
        let ads = [full("1"), full("1"), rsa_ad("2", &["A"], &["D"], &["https://x.com/"])];
        let exec = run(&ads, &HashSet::new(), &cfg);
        let preview = reconcile_rsas(
            rsa_candidates(&ads, true),
            &HashSet::new(),
            &target(),
            &cfg,
            RunMode::Preview,
        );
        assert_eq!(preview.summary, exec.summary);
        assert_eq!(preview.outcomes, exec.outcomes);
        assert!(preview.operations.is_empty());
        assert_eq!(exec.operations.len(), 1);
    }

    #[test]
    fn operations_carry_target_and_status() {
        let cfg = ReconcileConfig {
            pause_on_create: true,
            ..Default::default()
        };
        let plan = run(&[full("1")], &HashSet::new(), &cfg);
        assert_eq!(plan.operations[0].ad_group, "customers/111/adGroups/222");
        assert_eq!(plan.operations[0].status, Status::Paused);

        let plan = run(&[full("1")], &HashSet::new(), &ReconcileConfig::default());
        assert_eq!(plan.operations[0].status, Status::Enabled);
    }

    fn eta_ad() -> AdRecord {
        AdRecord {
            ad_id: "7".into(),
            final_urls: vec!["https://x.com/eta".into()],
            creative: Creative::ExpandedTextAd(EtaCreative {
                headline_part1: Some("Part One".into()),
                headline_part2: Some("Part Two".into()),
                headline_part3: Some("".into()),
                description: Some("First description".into()),
                description2: None,
                path1: Some("online".into()),
                path2: None,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn eta_rebuild_pins_slots_and_pads_unpinned() {
        let cfg = ReconcileConfig {
            pad_mode: PadMode::Generic,
            ..Default::default()
        };
        let plan = reconcile_rsas(
            eta_candidates(&[eta_ad()], true),
            &HashSet::new(),
            &target(),
            &cfg,
            RunMode::Execute,
        );
        let op = &plan.operations[0];
        assert_eq!(op.headlines[0].pinned_field, Some(PinnedField::Headline1));
        assert_eq!(op.headlines[1].pinned_field, Some(PinnedField::Headline2));
        assert_eq!(op.headlines[2].pinned_field, None);
        assert_eq!(op.descriptions[0].pinned_field, Some(PinnedField::Description1));
        assert_eq!(op.descriptions[1].pinned_field, None);
        assert_eq!(op.path1.as_deref(), Some("online"));
    }

    #[test]
    fn eta_rebuild_without_pins() {
        let c = RsaCandidate::from_eta(&eta_ad(), false).unwrap();
        assert!(c.headlines.iter().all(|a| a.pinned_field.is_none()));
        assert_eq!(c.headlines.len(), 2);
        assert_eq!(c.descriptions.len(), 1);
    }

    #[test]
    fn rsa_copy_drops_source_pins_unless_pinning() {
        let mut ad = full("1");
        if let Creative::ResponsiveSearchAd(rsa) = &mut ad.creative {
            rsa.headlines[0].pinned_field = Some(PinnedField::Headline1);
            rsa.descriptions[0].pinned_field = Some(PinnedField::Description1);
        }
        let unpinned = RsaCandidate::from_rsa(&ad, false).unwrap();
        assert!(unpinned.headlines.iter().all(|a| a.pinned_field.is_none()));
        assert!(unpinned.descriptions.iter().all(|a| a.pinned_field.is_none()));

        let pinned = RsaCandidate::from_rsa(&ad, true).unwrap();
        assert_eq!(pinned.headlines[0].pinned_field, Some(PinnedField::Headline1));
        assert_eq!(pinned.descriptions[0].pinned_field, Some(PinnedField::Description1));
    }

    #[test]
    fn candidate_builders_ignore_other_types() {
        let ads = [eta_ad(), full("1"), AdRecord::default()];
        assert_eq!(rsa_candidates(&ads, true).len(), 1);
        assert_eq!(eta_candidates(&ads, true).len(), 1);
    }
}
