//! Persistence for the catalog and membership tables.

use std::{
    cell::RefCell,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::{
    manifest::{self, StoreManifest},
    models::{ClothingItem, SwapMember},
};

/// File name of the items table inside the data root.
pub const ITEMS_FILE: &str = "items.json";
/// File name of the members table inside the data root.
pub const USERS_FILE: &str = "users.json";

/// In-memory snapshot of both tables.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Items currently available to borrow, in insertion order.
    pub catalog: Vec<ClothingItem>,
    /// Registered members, in registration order.
    pub members: Vec<SwapMember>,
}

/// Storage backend for the exchange state.
///
/// `save` replaces the whole snapshot; callers re-save after every
/// mutation and never issue partial writes.
pub trait ExchangeStore {
    /// Read both tables. Absence of a table means "empty collection".
    fn load(&self) -> Result<Snapshot>;

    /// Overwrite both tables with the given snapshot.
    fn save(&self, catalog: &[ClothingItem], members: &[SwapMember]) -> Result<()>;
}

/// Store backed by two pretty-printed JSON array files plus a sidecar
/// manifest, all under one data directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Create a store rooted at the provided directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the items table.
    pub fn items_path(&self) -> PathBuf {
        self.root.join(ITEMS_FILE)
    }

    /// Path of the members table.
    pub fn users_path(&self) -> PathBuf {
        self.root.join(USERS_FILE)
    }

    fn read_array(path: &Path) -> Result<Vec<Value>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let records = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(records)
    }

    /// Stage the document in the same directory, then swap it into place,
    /// so a concurrent reader sees either the old table or the new one.
    fn write_array(&self, path: &Path, records: &[Value]) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create {}", self.root.display()))?;

        let mut staged = NamedTempFile::new_in(&self.root)
            .with_context(|| format!("failed to stage write under {}", self.root.display()))?;
        staged.write_all(&to_pretty_document(records)?)?;
        staged
            .persist(path)
            .with_context(|| format!("failed to replace {}", path.display()))?;
        Ok(())
    }
}

impl ExchangeStore for JsonStore {
    fn load(&self) -> Result<Snapshot> {
        let mut snapshot = Snapshot::default();

        for record in Self::read_array(&self.items_path())? {
            match ClothingItem::from_value(&record) {
                Some(item) => snapshot.catalog.push(item),
                None => warn!("skipping unreadable item record: {record}"),
            }
        }

        for record in Self::read_array(&self.users_path())? {
            match serde_json::from_value::<SwapMember>(record) {
                Ok(member) => snapshot.members.push(member),
                Err(err) => warn!("skipping unreadable member record: {err}"),
            }
        }

        info!(
            items = snapshot.catalog.len(),
            members = snapshot.members.len(),
            "store loaded"
        );
        Ok(snapshot)
    }

    fn save(&self, catalog: &[ClothingItem], members: &[SwapMember]) -> Result<()> {
        let items = catalog
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .context("failed to serialize catalog")?;
        let users = members
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .context("failed to serialize members")?;

        self.write_array(&self.items_path(), &items)?;
        self.write_array(&self.users_path(), &users)?;

        StoreManifest::current(catalog.len(), members.len())
            .persist(manifest::manifest_path(&self.root))
    }
}

/// Volatile store used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RefCell<Snapshot>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a snapshot.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            state: RefCell::new(snapshot),
        }
    }

    /// Copy of the currently saved snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.state.borrow().clone()
    }
}

impl ExchangeStore for MemoryStore {
    fn load(&self) -> Result<Snapshot> {
        Ok(self.snapshot())
    }

    fn save(&self, catalog: &[ClothingItem], members: &[SwapMember]) -> Result<()> {
        *self.state.borrow_mut() = Snapshot {
            catalog: catalog.to_vec(),
            members: members.to_vec(),
        };
        Ok(())
    }
}

// The tables are edited by hand now and then; keep the 4-space layout
// they have always used instead of serde_json's 2-space default.
fn to_pretty_document(records: &[Value]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records
        .serialize(&mut ser)
        .context("failed to render store document")?;
    Ok(buf)
}
