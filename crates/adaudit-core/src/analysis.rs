//! Read-only summaries of an ad group snapshot: positive keywords and the
//! responsive search ads it carries.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{AdRecord, Creative, KeywordRecord, MatchType, Status};

/// One positive keyword as listed in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositiveKeyword {
    pub criterion_id: Option<String>,
    pub text: String,
    pub match_type: MatchType,
    pub status: Status,
    /// Max CPC in currency units; absent when unset or zero.
    pub cpc_bid: Option<f64>,
}

impl PositiveKeyword {
    pub const COLUMNS: [&'static str; 5] = ["id", "text", "match_type", "status", "cpc_bid"];

    pub fn row(&self) -> [String; 5] {
        [
            self.criterion_id.clone().unwrap_or_default(),
            self.text.clone(),
            self.match_type.to_string(),
            self.status.to_string(),
            self.cpc_bid.map(|b| format!("{b}")).unwrap_or_default(),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeywordReport {
    pub total: usize,
    /// Counts keyed by match type name, sorted by name.
    pub by_match_type: BTreeMap<String, usize>,
    /// Counts keyed by status name, sorted by name.
    pub by_status: BTreeMap<String, usize>,
    /// Positive keywords in snapshot order.
    pub keywords: Vec<PositiveKeyword>,
}

/// Counts the positive keywords of `keywords`; negatives are ignored.
pub fn positive_keyword_report(keywords: &[KeywordRecord]) -> KeywordReport {
    let mut report = KeywordReport::default();
    for kw in keywords.iter().filter(|k| !k.negative) {
        *report
            .by_match_type
            .entry(kw.match_type.to_string())
            .or_default() += 1;
        *report.by_status.entry(kw.status.to_string()).or_default() += 1;
        report.keywords.push(PositiveKeyword {
            criterion_id: kw.criterion_id.clone(),
            text: kw.text.clone(),
            match_type: kw.match_type,
            status: kw.status,
            cpc_bid: kw
                .cpc_bid_micros
                .filter(|&m| m != 0)
                .map(|m| m as f64 / 1_000_000.0),
        });
    }
    report.total = report.keywords.len();
    report
}

/// Headlines and descriptions shown per ad in an RSA listing.
pub const RSA_HEADLINES_SHOWN: usize = 3;
pub const RSA_DESCRIPTIONS_SHOWN: usize = 2;

/// Short view of one responsive search ad.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RsaListing {
    pub ad_id: String,
    pub status: Status,
    pub final_url: Option<String>,
    pub headlines: Vec<String>,
    pub descriptions: Vec<String>,
}

/// Lists the responsive search ads of `ads` with their first final URL and
/// leading non-blank headlines and descriptions. Other ad types are skipped.
pub fn rsa_listing(ads: &[AdRecord]) -> Vec<RsaListing> {
    ads.iter()
        .filter_map(|ad| match &ad.creative {
            Creative::ResponsiveSearchAd(rsa) => Some(RsaListing {
                ad_id: ad.ad_id.clone(),
                status: ad.status,
                final_url: ad.final_urls.first().cloned(),
                headlines: leading_texts(
                    rsa.headlines.iter().map(|a| a.text.as_str()),
                    RSA_HEADLINES_SHOWN,
                ),
                descriptions: leading_texts(
                    rsa.descriptions.iter().map(|a| a.text.as_str()),
                    RSA_DESCRIPTIONS_SHOWN,
                ),
            }),
            _ => None,
        })
        .collect()
}

fn leading_texts<'a>(texts: impl Iterator<Item = &'a str>, n: usize) -> Vec<String> {
    texts
        .take(n)
        .filter(|t| !t.trim().is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(text: &str, mt: MatchType, status: Status, negative: bool, bid: Option<i64>) -> KeywordRecord {
        KeywordRecord {
            criterion_id: Some(format!("id-{text}")),
            text: text.into(),
            match_type: mt,
            negative,
            status,
            cpc_bid_micros: bid,
        }
    }

    #[test]
    fn counts_positives_by_match_and_status() {
        let report = positive_keyword_report(&[
            kw("a", MatchType::Phrase, Status::Enabled, false, Some(1_500_000)),
            kw("b", MatchType::Exact, Status::Paused, false, None),
            kw("c", MatchType::Exact, Status::Enabled, false, Some(0)),
            kw("d", MatchType::Broad, Status::Enabled, true, None),
        ]);
        assert_eq!(report.total, 3);
        let mt: Vec<_> = report.by_match_type.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(mt, vec![("EXACT", 2), ("PHRASE", 1)]);
        assert_eq!(report.by_status.get("ENABLED"), Some(&2));
        assert_eq!(report.by_status.get("PAUSED"), Some(&1));
        assert_eq!(report.keywords[0].cpc_bid, Some(1.5));
        assert_eq!(report.keywords[2].cpc_bid, None);
        assert_eq!(
            report.keywords[0].row(),
            ["id-a", "a", "PHRASE", "ENABLED", "1.5"].map(String::from)
        );
    }

    #[test]
    fn empty_snapshot() {
        let report = positive_keyword_report(&[]);
        assert_eq!(report.total, 0);
        assert!(report.by_match_type.is_empty());
    }

    #[test]
    fn rsa_listing_skip_other_types() {
        use crate::model::{EtaCreative, RsaCreative, TextAsset};

        let rsa = AdRecord {
            ad_id: "7".into(),
            status: Status::Paused,
            final_urls: vec!["https://a.example/".into(), "https://b.example/".into()],
            creative: Creative::ResponsiveSearchAd(RsaCreative {
                headlines: ["H1", "", "H3", "H4"].map(TextAsset::new).to_vec(),
                descriptions: ["D1", "D2", "D3"].map(TextAsset::new).to_vec(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let eta = AdRecord {
            ad_id: "8".into(),
            creative: Creative::ExpandedTextAd(EtaCreative::default()),
            ..Default::default()
        };
        let out = rsa_listing(&[rsa, eta]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].ad_id, "7");
        assert_eq!(out[0].status, Status::Paused);
        assert_eq!(out[0].final_url.as_deref(), Some("https://a.example/"));
        assert_eq!(out[0].headlines, vec!["H1", "H3"]);
        assert_eq!(out[0].descriptions, vec!["D1", "D2"]);
    }
}
