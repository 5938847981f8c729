//! Ad → URL lookup rows, one per URL an ad points at.

use std::fmt;

use serde::Serialize;

use crate::model::AdRecord;
use crate::url_model;

/// Which ad field a URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UrlSource {
    #[serde(rename = "ad.final_urls")]
    FinalUrl,
    #[serde(rename = "ad.final_mobile_urls")]
    FinalMobileUrl,
}

impl UrlSource {
    pub fn as_str(self) -> &'static str {
        match self {
            UrlSource::FinalUrl => "ad.final_urls",
            UrlSource::FinalMobileUrl => "ad.final_mobile_urls",
        }
    }
}

impl fmt::Display for UrlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlMapRow {
    pub ad_id: String,
    pub campaign_id: String,
    pub ad_group_id: String,
    pub url: String,
    pub url_no_query: String,
    pub source: UrlSource,
}

impl UrlMapRow {
    pub const COLUMNS: [&'static str; 6] = [
        "ad_id",
        "campaign_id",
        "ad_group_id",
        "url",
        "url_no_query",
        "source",
    ];

    pub fn row(&self) -> [&str; 6] {
        [
            self.ad_id.as_str(),
            self.campaign_id.as_str(),
            self.ad_group_id.as_str(),
            self.url.as_str(),
            self.url_no_query.as_str(),
            self.source.as_str(),
        ]
    }
}

/// Final URLs first, then mobile URLs, for each ad in order.
pub fn crosswalk(ads: &[AdRecord]) -> Vec<UrlMapRow> {
    let mut rows = Vec::new();
    for ad in ads {
        let urls = ad
            .final_urls
            .iter()
            .map(|u| (u, UrlSource::FinalUrl))
            .chain(
                ad.final_mobile_urls
                    .iter()
                    .map(|u| (u, UrlSource::FinalMobileUrl)),
            );
        for (url, source) in urls {
            rows.push(UrlMapRow {
                ad_id: ad.ad_id.clone(),
                campaign_id: ad.campaign_id.clone(),
                ad_group_id: ad.ad_group_id.clone(),
                url: url.clone(),
                url_no_query: url_model::strip_query(url).to_string(),
                source,
            });
        }
    }
    rows
}
