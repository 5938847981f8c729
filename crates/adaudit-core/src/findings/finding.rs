//! Finding record and severity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue categories emitted by the audit. Consumers group on these strings.
pub mod issue {
    pub const NO_FINAL_URLS: &str = "No final_urls set";
    pub const DOMAIN_MISMATCH: &str = "Domain mismatch";
    pub const NON_HTTPS: &str = "Non-HTTPS final URL";
    pub const NO_MOBILE_URLS: &str = "No final_mobile_urls";
    pub const TRACKING_TEMPLATE: &str = "Tracking template missing {lpurl}";
    pub const UTM_MISSING: &str = "UTM missing";
    pub const UTM_EMPTY: &str = "UTM empty value";
    pub const UTM_DUPLICATE: &str = "UTM duplicate parameter";
    pub const UTM_CASE: &str = "UTM case policy";
    pub const UTM_EXACT: &str = "UTM mismatch (exact)";
    pub const UTM_PATTERN: &str = "UTM mismatch (pattern)";
    pub const HTTP_FAILED: &str = "HTTP check failed";
    pub const HTTP_NON_2XX: &str = "HTTP non-2xx";
}

/// One recorded policy or structural violation for an ad.
///
/// Findings have no identity beyond their fields and are never deduplicated:
/// the same issue on two URLs of one ad is two findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub ad_id: String,
    pub severity: Severity,
    pub issue: String,
    pub detail: String,
}

impl Finding {
    pub fn new(
        ad_id: impl Into<String>,
        severity: Severity,
        issue: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            ad_id: ad_id.into(),
            severity,
            issue: issue.into(),
            detail: detail.into(),
        }
    }

    /// Column names of the tabular form, in order.
    pub const COLUMNS: [&'static str; 4] = ["ad_id", "severity", "issue", "detail"];

    /// Row values matching [`Finding::COLUMNS`].
    pub fn row(&self) -> [&str; 4] {
        [
            self.ad_id.as_str(),
            self.severity.as_str(),
            self.issue.as_str(),
            self.detail.as_str(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_info_warn_error() {
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
    }

    #[test]
    fn row_matches_columns() {
        let f = Finding::new("42", Severity::Warn, issue::UTM_MISSING, "detail");
        assert_eq!(Finding::COLUMNS, ["ad_id", "severity", "issue", "detail"]);
        assert_eq!(f.row(), ["42", "warn", "UTM missing", "detail"]);
    }

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Error).unwrap();
        assert_eq!(json, "\"error\"");
    }
}
