pub mod config;
pub mod logging;

pub mod analysis;
pub mod findings;
pub mod fingerprint;
pub mod geo;
pub mod model;
pub mod probe;
pub mod reconcile;
pub mod snapshot;
pub mod url_model;
pub mod utm;
