//! Per-URL UTM rule evaluation.

use crate::findings::{issue, Finding, Severity};
use crate::url_model::QueryParams;

use super::policy::CompiledPolicy;

/// Query keys with this prefix are UTM parameters.
pub const UTM_PREFIX: &str = "utm_";

/// Auto-tagging click identifier; its presence can exempt a URL from UTM rules.
pub const AUTOTAG_KEY: &str = "gclid";

/// Evaluates `policy` against one final URL of an ad.
///
/// Rules run in a fixed order: autotag exemption, required keys, empty and
/// duplicate values, case policy, exact expectations, pattern expectations.
/// Exact and pattern expectations only look at the first value of a repeated
/// key; the repeat itself is reported as a duplicate.
pub fn evaluate(
    ad_id: &str,
    url: &str,
    params: &QueryParams,
    policy: &CompiledPolicy,
) -> Vec<Finding> {
    let mut out = Vec::new();

    if policy.allow_autotag_only && params.contains_key(AUTOTAG_KEY) {
        tracing::debug!(ad_id, url, "gclid present, UTM rules skipped");
        return out;
    }

    let missing: Vec<&str> = policy
        .required
        .iter()
        .map(String::as_str)
        .filter(|k| !params.contains_key(k))
        .collect();
    if !missing.is_empty() {
        out.push(Finding::new(
            ad_id,
            Severity::Warn,
            issue::UTM_MISSING,
            format!("{} missing {}", url, missing.join(",")),
        ));
    }

    for (key, values) in params.iter().filter(|(k, _)| k.starts_with(UTM_PREFIX)) {
        if values.iter().any(String::is_empty) {
            out.push(Finding::new(
                ad_id,
                Severity::Warn,
                issue::UTM_EMPTY,
                format!("{url} {key}="),
            ));
        }
        if values.len() > 1 {
            out.push(Finding::new(
                ad_id,
                Severity::Info,
                issue::UTM_DUPLICATE,
                format!("{} {} has {} values", url, key, values.len()),
            ));
        }
        if !values.iter().all(|v| policy.case.accepts(v)) {
            out.push(Finding::new(
                ad_id,
                Severity::Info,
                issue::UTM_CASE,
                format!("{} {} not {}", url, key, policy.case),
            ));
        }
    }

    for (key, expected) in &policy.expect_exact {
        if let Some(value) = params.first(key) {
            if value != expected {
                out.push(Finding::new(
                    ad_id,
                    Severity::Warn,
                    issue::UTM_EXACT,
                    format!("{url} {key}='{value}' != '{expected}'"),
                ));
            }
        }
    }

    for rule in &policy.patterns {
        if let Some(value) = params.first(&rule.key) {
            if !rule.is_match(value) {
                out.push(Finding::new(
                    ad_id,
                    Severity::Warn,
                    issue::UTM_PATTERN,
                    format!("{} {}='{}' !~ /{}/", url, rule.key, value, rule.source),
                ));
            }
        }
    }

    out
}
