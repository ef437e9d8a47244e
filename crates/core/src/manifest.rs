//! Store manifest written alongside the data tables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata describing the last snapshot written to the store.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreManifest {
    /// Timestamp of the last successful save.
    pub updated_at: Option<DateTime<Utc>>,
    /// Number of catalog items in the snapshot.
    #[serde(default)]
    pub item_count: usize,
    /// Number of registered members in the snapshot.
    #[serde(default)]
    pub member_count: usize,
}

impl StoreManifest {
    /// Manifest describing a snapshot written now.
    pub fn current(item_count: usize, member_count: usize) -> Self {
        Self {
            updated_at: Some(Utc::now()),
            item_count,
            member_count,
        }
    }

    /// Load the manifest from the given path, returning `None` if it does
    /// not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        let manifest = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse manifest {}", path.display()))?;
        Ok(manifest)
    }

    /// Persist the manifest, creating parent directories if needed.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create manifest directory {}", parent.display())
            })?;
        }

        let serialized =
            serde_json::to_string_pretty(self).context("failed to serialize store manifest")?;
        fs::write(path, serialized)
            .with_context(|| format!("failed to write manifest {}", path.display()))
    }
}

/// Helper to compute the manifest path inside a data directory.
pub fn manifest_path(data_root: impl AsRef<Path>) -> PathBuf {
    data_root.as_ref().join(".swapthreads-manifest.json")
}
