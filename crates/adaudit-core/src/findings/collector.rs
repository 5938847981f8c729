//! Per-ad audit: structural checks plus UTM evaluation for every final URL.

use crate::model::AdRecord;
use crate::probe::ProbeResults;
use crate::url_model;
use crate::utm::{self, CompiledPolicy};

use super::finding::{issue, Finding, Severity};

/// Placeholder a tracking template is expected to contain (matched case-insensitively).
pub const LANDING_PAGE_TOKEN: &str = "{lpurl";

/// Read-only inputs shared by every ad in a batch.
#[derive(Debug, Clone, Copy)]
pub struct AuditContext<'a> {
    pub policy: &'a CompiledPolicy,
    /// Probe outcomes, when HTTP probing ran for this batch.
    pub probes: Option<&'a ProbeResults>,
}

/// Accumulates findings in emission order.
///
/// Nothing is deduplicated or re-sorted; consumers may sort by severity.
#[derive(Debug, Clone, Default)]
pub struct FindingsCollector {
    findings: Vec<Finding>,
}

impl FindingsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn extend<I: IntoIterator<Item = Finding>>(&mut self, findings: I) {
        self.findings.extend(findings);
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Audits one ad. `ad_index` is the ad's position in the batch and is only
    /// used to look up probe outcomes.
    pub fn audit_ad(&mut self, ad_index: usize, ad: &AdRecord, ctx: &AuditContext<'_>) {
        let ad_id = ad.ad_id.as_str();
        let final_urls = &ad.final_urls;

        if final_urls.is_empty() {
            self.push(Finding::new(ad_id, Severity::Error, issue::NO_FINAL_URLS, ""));
        }

        if let Some(display_host) = ad.display_url().and_then(url_model::host_of) {
            for url in final_urls {
                let Some(host) = url_model::host_of(url) else {
                    continue;
                };
                if host != display_host {
                    self.push(Finding::new(
                        ad_id,
                        Severity::Warn,
                        issue::DOMAIN_MISMATCH,
                        format!("display={display_host} final={host} ({url})"),
                    ));
                }
            }
        }

        for (url_index, url) in final_urls.iter().enumerate() {
            match url_model::normalize(url) {
                Some(normalized) => {
                    if !normalized.is_https() {
                        self.push(Finding::new(
                            ad_id,
                            Severity::Warn,
                            issue::NON_HTTPS,
                            url.as_str(),
                        ));
                    }
                    self.extend(utm::evaluate(ad_id, url, &normalized.params, ctx.policy));
                }
                None => {
                    tracing::debug!(ad_id, url = %url, "final URL did not normalize, checks skipped");
                }
            }

            if let Some(outcome) = ctx.probes.and_then(|p| p.get(ad_index, url_index)) {
                if let Some(finding) = outcome.finding(ad_id, url) {
                    self.push(finding);
                }
            }
        }

        if !final_urls.is_empty() && ad.final_mobile_urls.is_empty() {
            self.push(Finding::new(
                ad_id,
                Severity::Info,
                issue::NO_MOBILE_URLS,
                "Consider mobile-specific URLs if site differs",
            ));
        }

        if let Some(template) = ad.tracking_template() {
            if !template.to_lowercase().contains(LANDING_PAGE_TOKEN) {
                self.push(Finding::new(
                    ad_id,
                    Severity::Warn,
                    issue::TRACKING_TEMPLATE,
                    template,
                ));
            }
        }
    }

    pub fn finish(self) -> Vec<Finding> {
        self.findings
    }
}

/// Audits every ad in order and returns all findings.
pub fn audit_ads(ads: &[AdRecord], ctx: &AuditContext<'_>) -> Vec<Finding> {
    let mut collector = FindingsCollector::new();
    for (ad_index, ad) in ads.iter().enumerate() {
        collector.audit_ad(ad_index, ad, ctx);
    }
    tracing::info!(ads = ads.len(), findings = collector.len(), "audit complete");
    collector.finish()
}
