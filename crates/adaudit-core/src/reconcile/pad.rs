//! RSA minimums and the fallback filler library.

use std::collections::HashSet;

use crate::model::TextAsset;

/// A responsive search ad needs at least this many distinct headlines.
pub const MIN_HEADLINES: usize = 3;
/// A responsive search ad needs at least this many distinct descriptions.
pub const MIN_DESCRIPTIONS: usize = 2;

const FALLBACK_HEADLINES: [&str; 6] = [
    "Accredited Online School",
    "Flexible, Self-Paced Program",
    "Enroll Online Today",
    "Tuition Options Available",
    "Trusted Since 2009",
    "Start Any Time",
];

const FALLBACK_DESCRIPTIONS: [&str; 4] = [
    "Finish at your pace with 100% online classes.",
    "Individualized support. Transfer credits accepted.",
    "Fully online. Enroll in minutes. Talk to Admissions.",
    "Accredited curriculum with flexible scheduling.",
];

pub fn default_fallback_headlines() -> Vec<String> {
    FALLBACK_HEADLINES.iter().map(|s| s.to_string()).collect()
}

pub fn default_fallback_descriptions() -> Vec<String> {
    FALLBACK_DESCRIPTIONS.iter().map(|s| s.to_string()).collect()
}

/// Number of distinct non-blank trimmed texts.
pub(crate) fn distinct_count(assets: &[TextAsset]) -> usize {
    assets
        .iter()
        .map(|a| a.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<HashSet<_>>()
        .len()
}

/// Appends unpinned fallback assets until `assets` has `min` distinct texts
/// or the library runs out. A fallback whose text is already present is
/// passed over. Returns how many assets were added.
pub(crate) fn pad_to_minimum(assets: &mut Vec<TextAsset>, library: &[String], min: usize) -> usize {
    let mut present: HashSet<String> = assets
        .iter()
        .map(|a| a.text.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    let mut added = 0;
    for filler in library {
        if present.len() >= min {
            break;
        }
        let text = filler.trim();
        if text.is_empty() || present.contains(text) {
            continue;
        }
        present.insert(text.to_string());
        assets.push(TextAsset::new(text));
        added += 1;
    }
    added
}

/// Drops blank texts and later repeats of the same trimmed text, keeping the
/// first occurrence (and its pin).
pub(crate) fn dedup_assets(assets: Vec<TextAsset>) -> Vec<TextAsset> {
    let mut seen = HashSet::new();
    assets
        .into_iter()
        .filter(|a| {
            let t = a.text.trim();
            !t.is_empty() && seen.insert(t.to_string())
        })
        .collect()
}
