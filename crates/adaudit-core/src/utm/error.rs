//! Errors raised while building a UTM policy.

/// A policy input that cannot be turned into a rule.
///
/// These never abort an audit: the offending rule is logged and skipped.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PolicyError {
    #[error("invalid pattern for {key}: {source}")]
    InvalidPattern {
        key: String,
        #[source]
        source: regex::Error,
    },
    #[error("expected key=value, got '{0}'")]
    MalformedExpectation(String),
    #[error("unknown case policy '{0}' (expected none, lower or upper)")]
    UnknownCase(String),
}
