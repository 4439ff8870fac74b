//! Record store boundary.
//!
//! The engines never own persistence; they read a collection from a
//! [`RecordStore`] and hand back records to add or update. Two stores ship
//! here: [`MemoryStore`] for in-process use and [`JsonFileStore`], which keeps
//! the collection and its change log in one JSON document.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::equipment::{Equipment, EquipmentRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("equipment {0} not found")]
    NotFound(String),
    #[error("failed to read store {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to write store {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("store {path} is not valid JSON: {source}")]
    Decode {
        path: String,
        source: serde_json::Error,
    },
    #[error("failed to encode store: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One field change recorded after an edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    /// RFC 3339 timestamp.
    pub at: String,
    pub equipment_id: String,
    pub field: String,
    pub old: String,
    pub new: String,
}

impl ChangeEntry {
    pub fn now(
        equipment_id: impl Into<String>,
        field: impl Into<String>,
        old: impl Into<String>,
        new: impl Into<String>,
    ) -> Self {
        Self {
            at: chrono::Utc::now().to_rfc3339(),
            equipment_id: equipment_id.into(),
            field: field.into(),
            old: old.into(),
            new: new.into(),
        }
    }
}

/// List/add/update/delete by opaque id. No transactional guarantees.
pub trait RecordStore {
    fn list(&self) -> Vec<Equipment>;
    fn get(&self, id: &str) -> Option<Equipment>;
    /// Store a new record under a fresh id and return it.
    fn add(&mut self, record: EquipmentRecord) -> Result<Equipment, StoreError>;
    fn update(&mut self, item: Equipment) -> Result<(), StoreError>;
    fn delete(&mut self, id: &str) -> Result<Equipment, StoreError>;
    fn record_change(&mut self, entry: ChangeEntry) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    pub equipment: Vec<Equipment>,
    #[serde(default)]
    pub changes: Vec<ChangeEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = EquipmentRecord>,
    {
        let mut store = Self::new();
        for record in records {
            store.equipment.push(Equipment::new(new_id(), record));
        }
        store
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl RecordStore for MemoryStore {
    fn list(&self) -> Vec<Equipment> {
        self.equipment.clone()
    }

    fn get(&self, id: &str) -> Option<Equipment> {
        self.equipment.iter().find(|e| e.id == id).cloned()
    }

    fn add(&mut self, record: EquipmentRecord) -> Result<Equipment, StoreError> {
        let item = Equipment::new(new_id(), record);
        self.equipment.push(item.clone());
        Ok(item)
    }

    fn update(&mut self, item: Equipment) -> Result<(), StoreError> {
        let slot = self
            .equipment
            .iter_mut()
            .find(|e| e.id == item.id)
            .ok_or_else(|| StoreError::NotFound(item.id.clone()))?;
        *slot = item;
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<Equipment, StoreError> {
        let pos = self
            .equipment
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(self.equipment.remove(pos))
    }

    fn record_change(&mut self, entry: ChangeEntry) -> Result<(), StoreError> {
        self.changes.push(entry);
        Ok(())
    }
}

/// A [`MemoryStore`] loaded from and saved to a JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open `path`, starting empty when the file does not exist yet.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let inner = if path.exists() {
            let raw = fs::read_to_string(path).map_err(|source| StoreError::Read {
                path: path.display().to_string(),
                source,
            })?;
            if raw.trim().is_empty() {
                MemoryStore::new()
            } else {
                serde_json::from_str(&raw).map_err(|source| StoreError::Decode {
                    path: path.display().to_string(),
                    source,
                })?
            }
        } else {
            MemoryStore::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            inner,
        })
    }

    pub fn changes(&self) -> &[ChangeEntry] {
        &self.inner.changes
    }

    /// Write the collection and change log back to disk.
    pub fn save(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.inner)?;
        fs::write(&self.path, json).map_err(|source| StoreError::Write {
            path: self.path.display().to_string(),
            source,
        })
    }
}

impl RecordStore for JsonFileStore {
    fn list(&self) -> Vec<Equipment> {
        self.inner.list()
    }

    fn get(&self, id: &str) -> Option<Equipment> {
        self.inner.get(id)
    }

    fn add(&mut self, record: EquipmentRecord) -> Result<Equipment, StoreError> {
        self.inner.add(record)
    }

    fn update(&mut self, item: Equipment) -> Result<(), StoreError> {
        self.inner.update(item)
    }

    fn delete(&mut self, id: &str) -> Result<Equipment, StoreError> {
        self.inner.delete(id)
    }

    fn record_change(&mut self, entry: ChangeEntry) -> Result<(), StoreError> {
        self.inner.record_change(entry)
    }
}
