//! Audit findings.
//!
//! The collector walks ads in order and records one [`Finding`] per
//! violation: structural checks (missing or insecure URLs, display-domain
//! mismatch, tracking template, mobile URLs), UTM rules per final URL, and
//! probe outcomes when HTTP probing ran.

mod collector;
mod crosswalk;
mod finding;

pub use collector::{audit_ads, AuditContext, FindingsCollector, LANDING_PAGE_TOKEN};
pub use crosswalk::{crosswalk, UrlMapRow, UrlSource};
pub use finding::{issue, Finding, Severity};
