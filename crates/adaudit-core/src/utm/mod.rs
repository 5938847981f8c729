//! UTM tagging policy.
//!
//! A [`UtmPolicy`] is plain configuration; [`UtmPolicy::compile`] turns it
//! into a [`CompiledPolicy`] once per run, and [`evaluate`] applies it to the
//! query parameters of one final URL.

mod error;
mod evaluate;
mod policy;

pub use error::PolicyError;
pub use evaluate::{evaluate, AUTOTAG_KEY, UTM_PREFIX};
pub use policy::{
    parse_exact_expectation, parse_pattern_expectation, CasePolicy, CompiledPolicy, PatternRule,
    UtmPolicy, DEFAULT_REQUIRED,
};
