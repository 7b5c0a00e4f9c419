//! Persistence of the whole ledger state as one JSON document

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{CoreError, CoreResult};
use crate::models::LedgerData;

/// Storage reference type
pub type StorageRef = Arc<dyn StateStorage>;

/// Backend holding the persisted ledger state
pub trait StateStorage: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> CoreResult<Option<LedgerData>>;

    /// Replace the stored state
    fn save(&self, data: &LedgerData) -> CoreResult<()>;

    /// Human-readable location for logs
    fn describe(&self) -> String;
}

/// JSON file written through a temp file and rename
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
    pretty: bool,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            path: path.into(),
            pretty,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn storage_error(&self, message: impl ToString) -> CoreError {
        CoreError::StorageError {
            path: self.path.display().to_string(),
            message: message.to_string(),
        }
    }
}

impl StateStorage for JsonFileStorage {
    fn load(&self) -> CoreResult<Option<LedgerData>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).map_err(|e| self.storage_error(e))?;
        let data = serde_json::from_str(&content).map_err(|e| self.storage_error(e))?;
        log::debug!(target: "wealthweb::storage", "loaded state from {}", self.path.display());
        Ok(Some(data))
    }

    fn save(&self, data: &LedgerData) -> CoreResult<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.storage_error(e))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp).map_err(|e| self.storage_error(e))?;
        file.write_all(json.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| self.storage_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.storage_error(e))?;

        log::debug!(target: "wealthweb::storage", "saved {} bytes to {}", json.len(), self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-process storage holding the serialized document
#[derive(Debug, Default)]
pub struct MemoryStorage {
    document: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored JSON, if any
    pub fn document(&self) -> Option<String> {
        self.document.lock().ok().and_then(|doc| doc.clone())
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self) -> CoreResult<Option<LedgerData>> {
        match self.document() {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, data: &LedgerData) -> CoreResult<()> {
        let json = serde_json::to_string(data)?;
        let mut doc = self.document.lock().map_err(|e| CoreError::StorageError {
            path: "memory".to_string(),
            message: e.to_string(),
        })?;
        *doc = Some(json);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
