//! Ad, creative and keyword records as supplied by the caller.
//!
//! Records are read from JSON snapshots and are immutable once read. Each ad
//! type carries only the fields it actually has: a responsive search ad has
//! asset lists, a legacy expanded text ad has fixed slots.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Serving status of an ad, ad group or keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    Enabled,
    Paused,
    Removed,
    #[serde(other)]
    Unknown,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Enabled => "ENABLED",
            Status::Paused => "PAUSED",
            Status::Removed => "REMOVED",
            Status::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Slot a text asset is pinned to within a responsive search ad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinnedField {
    #[serde(rename = "HEADLINE_1")]
    Headline1,
    #[serde(rename = "HEADLINE_2")]
    Headline2,
    #[serde(rename = "HEADLINE_3")]
    Headline3,
    #[serde(rename = "DESCRIPTION_1")]
    Description1,
    #[serde(rename = "DESCRIPTION_2")]
    Description2,
}

/// One headline or description text, optionally pinned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextAsset {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned_field: Option<PinnedField>,
}

impl TextAsset {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pinned_field: None,
        }
    }

    pub fn pinned(text: impl Into<String>, field: PinnedField) -> Self {
        Self {
            text: text.into(),
            pinned_field: Some(field),
        }
    }
}

/// Responsive search ad body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaCreative {
    #[serde(default)]
    pub headlines: Vec<TextAsset>,
    #[serde(default)]
    pub descriptions: Vec<TextAsset>,
    #[serde(default)]
    pub path1: Option<String>,
    #[serde(default)]
    pub path2: Option<String>,
}

/// Legacy expanded text ad body with fixed slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtaCreative {
    #[serde(default)]
    pub headline_part1: Option<String>,
    #[serde(default)]
    pub headline_part2: Option<String>,
    #[serde(default)]
    pub headline_part3: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub description2: Option<String>,
    #[serde(default)]
    pub path1: Option<String>,
    #[serde(default)]
    pub path2: Option<String>,
}

/// Ad body, tagged by ad type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Creative {
    ResponsiveSearchAd(RsaCreative),
    ExpandedTextAd(EtaCreative),
    /// Any other ad type; only its URL fields are audited.
    #[default]
    #[serde(other)]
    Other,
}

impl Creative {
    pub fn type_name(&self) -> &'static str {
        match self {
            Creative::ResponsiveSearchAd(_) => "RESPONSIVE_SEARCH_AD",
            Creative::ExpandedTextAd(_) => "EXPANDED_TEXT_AD",
            Creative::Other => "OTHER",
        }
    }
}

/// One ad with its URL fields and creative body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdRecord {
    #[serde(default, deserialize_with = "id_string")]
    pub campaign_id: String,
    #[serde(default, deserialize_with = "id_string")]
    pub ad_group_id: String,
    #[serde(deserialize_with = "id_string")]
    pub ad_id: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub final_urls: Vec<String>,
    #[serde(default)]
    pub final_mobile_urls: Vec<String>,
    #[serde(default)]
    pub display_url: Option<String>,
    #[serde(default)]
    pub tracking_url_template: Option<String>,
    #[serde(default)]
    pub url_custom_parameters: BTreeMap<String, String>,
    #[serde(default)]
    pub creative: Creative,
}

impl AdRecord {
    /// Display URL, treating an empty string as absent.
    pub fn display_url(&self) -> Option<&str> {
        non_empty(self.display_url.as_deref())
    }

    /// Tracking template, treating an empty string as absent.
    pub fn tracking_template(&self) -> Option<&str> {
        non_empty(self.tracking_url_template.as_deref())
    }
}

/// Resource ids arrive as JSON strings or numbers depending on the exporter.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

impl From<RawId> for String {
    fn from(id: RawId) -> Self {
        match id {
            RawId::Text(s) => s,
            RawId::Unsigned(n) => n.to_string(),
            RawId::Signed(n) => n.to_string(),
        }
    }
}

fn id_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    RawId::deserialize(d).map(String::from)
}

fn opt_id_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(d)?.map(String::from))
}

pub(crate) fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

/// Keyword match type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchType {
    Exact,
    Phrase,
    Broad,
    /// A match type this tool does not know; never copied.
    #[serde(other)]
    Unknown,
}

impl MatchType {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchType::Exact => "EXACT",
            MatchType::Phrase => "PHRASE",
            MatchType::Broad => "BROAD",
            MatchType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One keyword criterion of an ad group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRecord {
    #[serde(default, deserialize_with = "opt_id_string")]
    pub criterion_id: Option<String>,
    pub text: String,
    pub match_type: MatchType,
    #[serde(default)]
    pub negative: bool,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub cpc_bid_micros: Option<i64>,
}

/// Reference to an ad group, used as the target collection of operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdGroupRef {
    #[serde(deserialize_with = "id_string")]
    pub customer_id: String,
    #[serde(deserialize_with = "id_string")]
    pub ad_group_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub campaign_name: Option<String>,
    #[serde(default)]
    pub status: Option<Status>,
}

impl AdGroupRef {
    /// API resource name: `customers/{customer_id}/adGroups/{ad_group_id}`.
    pub fn resource_name(&self) -> String {
        format!(
            "customers/{}/adGroups/{}",
            self.customer_id, self.ad_group_id
        )
    }

    /// Human-friendly label for log and console output.
    pub fn label(&self) -> String {
        let name = self
            .name
            .clone()
            .unwrap_or_else(|| format!("ad_group:{}", self.ad_group_id));
        match &self.campaign_name {
            Some(campaign) => format!("{name} in campaign '{campaign}'"),
            None => name,
        }
    }
}

/// Everything the caller fetched for one ad group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdGroupSnapshot {
    pub ad_group: AdGroupRef,
    #[serde(default)]
    pub keywords: Vec<KeywordRecord>,
    #[serde(default)]
    pub ads: Vec<AdRecord>,
}
