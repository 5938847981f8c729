//! Geo-modified keyword expansion for bulk upload sheets.
//!
//! Each seed keyword is combined with US states, their postal abbreviations,
//! and optionally metro areas and caller-supplied counties, in three forms:
//! `"{kw} in {geo}"`, `"{kw} {geo}"` and `"{geo} {kw}"`. The seed itself is
//! kept. Output is whitespace-collapsed, de-duplicated and sorted.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// US states with their postal abbreviations.
pub const STATES: [(&str, &str); 50] = [
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
];

pub const METROS: [&str; 39] = [
    "Atlanta",
    "Austin",
    "Baltimore",
    "Boston",
    "Charlotte",
    "Chicago",
    "Cincinnati",
    "Cleveland",
    "Columbus",
    "Dallas",
    "Denver",
    "Detroit",
    "Houston",
    "Indianapolis",
    "Jacksonville",
    "Kansas City",
    "Las Vegas",
    "Los Angeles",
    "Miami",
    "Minneapolis",
    "Nashville",
    "New Orleans",
    "New York",
    "Orlando",
    "Philadelphia",
    "Phoenix",
    "Pittsburgh",
    "Portland",
    "Raleigh",
    "Sacramento",
    "Salt Lake City",
    "San Antonio",
    "San Diego",
    "San Francisco",
    "San Jose",
    "Seattle",
    "St Louis",
    "Tampa",
    "Washington",
];

/// Which geo lists to combine with each seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoOptions {
    pub states: bool,
    /// Postal abbreviations; only applied together with `states`.
    pub abbreviations: bool,
    pub metros: bool,
    /// Extra geo names such as target counties.
    pub counties: Vec<String>,
}

impl Default for GeoOptions {
    fn default() -> Self {
        Self {
            states: true,
            abbreviations: true,
            metros: false,
            counties: Vec::new(),
        }
    }
}

fn collapse(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn push_variants(out: &mut BTreeSet<String>, kw: &str, geo: &str) {
    out.insert(collapse(&format!("{kw} in {geo}")));
    out.insert(collapse(&format!("{kw} {geo}")));
    out.insert(collapse(&format!("{geo} {kw}")));
}

/// Expands `seeds` into a sorted, de-duplicated keyword list. Blank seeds are ignored.
pub fn expand_keywords<S: AsRef<str>>(seeds: &[S], opts: &GeoOptions) -> Vec<String> {
    let mut out = BTreeSet::new();
    for seed in seeds {
        let kw = collapse(seed.as_ref());
        if kw.is_empty() {
            continue;
        }
        if opts.states {
            for (state, abbrev) in STATES {
                push_variants(&mut out, &kw, state);
                if opts.abbreviations {
                    push_variants(&mut out, &kw, abbrev);
                }
            }
        }
        if opts.metros {
            for metro in METROS {
                push_variants(&mut out, &kw, metro);
            }
        }
        for county in &opts.counties {
            push_variants(&mut out, &kw, county);
        }
        out.insert(kw);
    }
    out.into_iter().collect()
}

/// Fixed columns of every bulk-upload row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkSheet {
    pub action: String,
    pub status: String,
    pub campaign: String,
    pub ad_group: String,
    pub match_type: String,
}

impl BulkSheet {
    pub const COLUMNS: [&'static str; 6] = [
        "Action",
        "Keyword status",
        "Campaign",
        "Ad group",
        "Keyword",
        "Match type",
    ];

    pub fn row<'a>(&'a self, keyword: &'a str) -> [&'a str; 6] {
        [
            self.action.as_str(),
            self.status.as_str(),
            self.campaign.as_str(),
            self.ad_group.as_str(),
            keyword,
            self.match_type.as_str(),
        ]
    }
}
