use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::probe::ProbeConfig;
use crate::reconcile::ReconcileConfig;
use crate::utm::UtmPolicy;

/// Global configuration loaded from `~/.config/adaudit/config.toml`.
///
/// Every section is optional; missing sections and keys take their defaults.
/// Command-line flags override what is loaded here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// UTM tagging policy applied to every final URL.
    pub utm: UtmPolicy,
    /// Optional HTTP reachability probing (off by default).
    pub probe: ProbeConfig,
    /// Keyword and responsive search ad copying.
    pub reconcile: ReconcileConfig,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("adaudit")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<AuditConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = AuditConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)
            .with_context(|| format!("writing default config to {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit file.
pub fn load_from_path(path: &Path) -> Result<AuditConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: AuditConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}
