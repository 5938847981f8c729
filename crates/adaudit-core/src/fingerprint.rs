//! Content identity for responsive search ad creatives.
//!
//! A [`Fingerprint`] is the only identity used to decide whether a creative
//! already exists at the destination. It is built from trimmed, de-duplicated
//! and sorted texts and URLs, so two creatives with the same assets compare
//! equal no matter what order the source returned them in.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::{AdRecord, Creative, TextAsset};

/// Canonical identity of a creative.
///
/// Equality, ordering and hashing are all derived from the canonical fields,
/// so the type can key both `HashSet`s and `BTreeSet`s.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Fingerprint {
    headlines: Vec<String>,
    descriptions: Vec<String>,
    final_urls: Vec<String>,
    path1: Option<String>,
    path2: Option<String>,
}

impl Fingerprint {
    /// Builds the canonical identity.
    ///
    /// Texts are trimmed; blank texts are dropped; exact duplicates collapse;
    /// the remainder is sorted. Paths that are empty after trimming are
    /// treated as absent.
    pub fn new<H, D, U>(
        headlines: H,
        descriptions: D,
        final_urls: U,
        path1: Option<&str>,
        path2: Option<&str>,
    ) -> Self
    where
        H: IntoIterator,
        H::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
        U: IntoIterator,
        U::Item: AsRef<str>,
    {
        Self {
            headlines: canonical(headlines),
            descriptions: canonical(descriptions),
            final_urls: canonical(final_urls),
            path1: canonical_path(path1),
            path2: canonical_path(path2),
        }
    }

    /// Fingerprint of a creative given as text assets.
    pub fn from_assets(
        headlines: &[TextAsset],
        descriptions: &[TextAsset],
        final_urls: &[String],
        path1: Option<&str>,
        path2: Option<&str>,
    ) -> Self {
        Self::new(
            headlines.iter().map(|a| a.text.as_str()),
            descriptions.iter().map(|a| a.text.as_str()),
            final_urls,
            path1,
            path2,
        )
    }

    /// Fingerprint of an existing responsive search ad; `None` for other ad types.
    pub fn of_ad(ad: &AdRecord) -> Option<Self> {
        match &ad.creative {
            Creative::ResponsiveSearchAd(rsa) => Some(Self::from_assets(
                &rsa.headlines,
                &rsa.descriptions,
                &ad.final_urls,
                rsa.path1.as_deref(),
                rsa.path2.as_deref(),
            )),
            _ => None,
        }
    }

    pub fn headlines(&self) -> &[String] {
        &self.headlines
    }

    pub fn descriptions(&self) -> &[String] {
        &self.descriptions
    }

    pub fn final_urls(&self) -> &[String] {
        &self.final_urls
    }

    pub fn path1(&self) -> Option<&str> {
        self.path1.as_deref()
    }

    pub fn path2(&self) -> Option<&str> {
        self.path2.as_deref()
    }
}

fn canonical<I>(items: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| s.as_ref().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn canonical_path(path: Option<&str>) -> Option<String> {
    path.map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}
