//! Reading caller-supplied JSON snapshots.
//!
//! An ads file is either a bare array of ad records or an ad-group snapshot
//! object with an `ads` array. Reconciliation inputs are full ad-group
//! snapshots (target reference, keywords and ads).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::model::{AdGroupSnapshot, AdRecord};

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("reading snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("snapshot {0} has no ad group identifiers")]
    MissingAdGroup(PathBuf),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AdsFile {
    Bare(Vec<AdRecord>),
    Wrapped { ads: Vec<AdRecord> },
}

fn read(path: &Path) -> Result<String, SnapshotError> {
    fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses an ads document from a string.
pub fn parse_ads(data: &str) -> Result<Vec<AdRecord>, serde_json::Error> {
    let file: AdsFile = serde_json::from_str(data)?;
    Ok(match file {
        AdsFile::Bare(ads) => ads,
        AdsFile::Wrapped { ads } => ads,
    })
}

/// Reads the ads to audit from `path`.
pub fn read_ads(path: &Path) -> Result<Vec<AdRecord>, SnapshotError> {
    let data = read(path)?;
    let ads = parse_ads(&data).map_err(|source| SnapshotError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), ads = ads.len(), "read ads snapshot");
    Ok(ads)
}

/// Reads a full ad-group snapshot. The ad group must carry both its customer
/// id and ad group id, since operations are addressed by them.
pub fn read_ad_group(path: &Path) -> Result<AdGroupSnapshot, SnapshotError> {
    let data = read(path)?;
    let snapshot: AdGroupSnapshot =
        serde_json::from_str(&data).map_err(|source| SnapshotError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    if snapshot.ad_group.customer_id.trim().is_empty()
        || snapshot.ad_group.ad_group_id.trim().is_empty()
    {
        return Err(SnapshotError::MissingAdGroup(path.to_path_buf()));
    }
    tracing::debug!(
        path = %path.display(),
        ad_group = %snapshot.ad_group.label(),
        keywords = snapshot.keywords.len(),
        ads = snapshot.ads.len(),
        "read ad group snapshot"
    );
    Ok(snapshot)
}
