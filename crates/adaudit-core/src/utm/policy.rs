//! UTM policy configuration and its compiled form.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::PolicyError;

/// Required keys when the config does not say otherwise.
pub const DEFAULT_REQUIRED: [&str; 3] = ["utm_source", "utm_medium", "utm_campaign"];

/// Case every UTM value must be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CasePolicy {
    #[default]
    None,
    Lower,
    Upper,
}

impl CasePolicy {
    /// True when `value` already satisfies the policy.
    pub fn accepts(self, value: &str) -> bool {
        match self {
            CasePolicy::None => true,
            CasePolicy::Lower => value == value.to_lowercase(),
            CasePolicy::Upper => value == value.to_uppercase(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CasePolicy::None => "none",
            CasePolicy::Lower => "lower",
            CasePolicy::Upper => "upper",
        }
    }
}

impl fmt::Display for CasePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CasePolicy {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(CasePolicy::None),
            "lower" => Ok(CasePolicy::Lower),
            "upper" => Ok(CasePolicy::Upper),
            other => Err(PolicyError::UnknownCase(other.to_string())),
        }
    }
}

/// UTM tagging policy (`[utm]` section of config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UtmPolicy {
    /// Keys every final URL must carry. Reported together when missing.
    pub required: Vec<String>,
    /// key → exact value the first occurrence must equal.
    pub expect_exact: BTreeMap<String, String>,
    /// key → pattern the first occurrence must fully match.
    pub expect_regex: BTreeMap<String, String>,
    pub case: CasePolicy,
    /// Skip UTM rules for URLs that carry `gclid` (auto-tagging).
    pub allow_autotag_only: bool,
}

impl Default for UtmPolicy {
    fn default() -> Self {
        Self {
            required: DEFAULT_REQUIRED.iter().map(|s| s.to_string()).collect(),
            expect_exact: BTreeMap::new(),
            expect_regex: BTreeMap::new(),
            case: CasePolicy::None,
            allow_autotag_only: false,
        }
    }
}

impl UtmPolicy {
    /// Compiles pattern expectations once per run.
    ///
    /// A pattern that fails to compile is logged and dropped; every other
    /// rule of the policy stays in force.
    pub fn compile(&self) -> CompiledPolicy {
        let mut patterns = Vec::with_capacity(self.expect_regex.len());
        let mut rejected = Vec::new();
        for (key, pattern) in &self.expect_regex {
            match compile_anchored(key, pattern) {
                Ok(re) => patterns.push(PatternRule {
                    key: key.clone(),
                    source: pattern.clone(),
                    regex: re,
                }),
                Err(err) => {
                    tracing::warn!(key = %key, pattern = %pattern, "skipping UTM pattern rule: {err}");
                    rejected.push(err);
                }
            }
        }
        CompiledPolicy {
            required: self.required.clone(),
            expect_exact: self.expect_exact.clone(),
            patterns,
            case: self.case,
            allow_autotag_only: self.allow_autotag_only,
            rejected,
        }
    }
}

fn compile_anchored(key: &str, pattern: &str) -> Result<Regex, PolicyError> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|source| PolicyError::InvalidPattern {
        key: key.to_string(),
        source,
    })
}

/// A compiled `key must match pattern` expectation.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub key: String,
    /// Pattern as configured, for finding details.
    pub source: String,
    pub regex: Regex,
}

impl PatternRule {
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

/// A [`UtmPolicy`] ready for evaluation.
#[derive(Debug, Clone)]
pub struct CompiledPolicy {
    pub required: Vec<String>,
    pub expect_exact: BTreeMap<String, String>,
    pub patterns: Vec<PatternRule>,
    pub case: CasePolicy,
    pub allow_autotag_only: bool,
    rejected: Vec<PolicyError>,
}

impl CompiledPolicy {
    /// Rules dropped at compile time.
    pub fn rejected(&self) -> &[PolicyError] {
        &self.rejected
    }
}

/// Parses a `key=value` exact expectation.
pub fn parse_exact_expectation(item: &str) -> Result<(String, String), PolicyError> {
    let (key, value) = split_expectation(item)?;
    Ok((key, value.trim().to_string()))
}

/// Parses a `key=/pattern/` expectation; the surrounding slashes are optional.
pub fn parse_pattern_expectation(item: &str) -> Result<(String, String), PolicyError> {
    let (key, value) = split_expectation(item)?;
    let value = value.trim();
    let pattern = if value.len() >= 2 && value.starts_with('/') && value.ends_with('/') {
        &value[1..value.len() - 1]
    } else {
        value
    };
    Ok((key, pattern.to_string()))
}

fn split_expectation(item: &str) -> Result<(String, &str), PolicyError> {
    let (key, value) = item
        .split_once('=')
        .ok_or_else(|| PolicyError::MalformedExpectation(item.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(PolicyError::MalformedExpectation(item.to_string()));
    }
    Ok((key.to_string(), value))
}
