//! CLI command handlers, one file per command.

mod audit;
mod expand_geo;
mod keywords;
mod rebuild_etas;
mod recover;
mod rsas;

pub use audit::{run_audit, AuditArgs, OutputFormat};
pub use expand_geo::{run_expand_geo, ExpandGeoArgs};
pub use keywords::run_keywords;
pub use rebuild_etas::{run_rebuild_etas, RebuildArgs};
pub use recover::{run_recover, CopyFlags, RecoverArgs};
pub use rsas::run_rsas;

#[cfg(test)]
pub(crate) use audit::{effective_policy, effective_probe};
