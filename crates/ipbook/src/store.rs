//! Persistence layer for ipbook.
//!
//! The inventory lives in one flat JSON file. Every save replaces the
//! whole collection: pending date stamps are resolved to the current
//! server date, the array is pretty-printed, and the file is written
//! atomically. The last writer wins; there is deliberately no locking or
//! conflict detection.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::IpRecord;

/// Resolve every pending date stamp in the collection to `today`.
pub fn stamp_records(records: &mut [IpRecord], today: NaiveDate) {
    for record in records {
        record.date_used = record.date_used.map(|stamp| stamp.resolve(today));
        record.release_date = record.release_date.map(|stamp| stamp.resolve(today));
        record.last_edited = record.last_edited.resolve(today);
    }
}

/// Whole-collection persistence for the record set.
///
/// `save` accepts the full record list, stamps pending dates with the
/// current server date, and returns the updated list. No partial updates,
/// no merge.
#[async_trait]
pub trait Store: Send + Sync + std::fmt::Debug {
    /// Load the full record set.
    async fn load(&self) -> Result<Vec<IpRecord>>;

    /// Replace the full record set, returning it with dates stamped.
    async fn save(&self, records: Vec<IpRecord>) -> Result<Vec<IpRecord>>;
}

/// Counts derived from the record set plus the backing file size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryStats {
    /// Total number of tracked addresses.
    pub total: usize,
    /// Addresses currently allocated.
    pub used: usize,
    /// Addresses currently free.
    pub free: usize,
    /// Size of the backing file in bytes (0 when absent).
    pub file_size_bytes: u64,
}

/// File-backed store over one flat JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    pretty: bool,
}

impl FileStore {
    /// Open a store at the given path, creating parent directories.
    ///
    /// The file itself is not created until the first save; loading a
    /// missing file yields an empty inventory.
    ///
    /// # Errors
    ///
    /// Returns an error if a parent directory cannot be created.
    pub fn open(path: impl AsRef<Path>, pretty: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        debug!("inventory file at {}", path.display());
        Ok(Self { path, pretty })
    }

    /// Path to the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Compute inventory statistics from the current file contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn stats(&self) -> Result<InventoryStats> {
        let records = self.read_records()?;
        let used = records.iter().filter(|r| r.used).count();
        let file_size_bytes = std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0);
        Ok(InventoryStats {
            total: records.len(),
            used,
            free: records.len() - used,
            file_size_bytes,
        })
    }

    fn read_records(&self) -> Result<Vec<IpRecord>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("no inventory file yet, starting empty");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(Error::StoreRead {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_str(&raw).map_err(|source| Error::StoreParse {
            path: self.path.clone(),
            source,
        })
    }

    fn write_records(&self, records: &[IpRecord]) -> Result<()> {
        let payload = if self.pretty {
            serde_json::to_string_pretty(records)?
        } else {
            serde_json::to_string(records)?
        };

        // Write a sibling temp file, then rename over the target so a
        // failed write never truncates the inventory.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, payload).map_err(|source| Error::StoreWrite {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| Error::StoreWrite {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}

#[async_trait]
impl Store for FileStore {
    async fn load(&self) -> Result<Vec<IpRecord>> {
        self.read_records()
    }

    async fn save(&self, mut records: Vec<IpRecord>) -> Result<Vec<IpRecord>> {
        stamp_records(&mut records, Local::now().date_naive());
        self.write_records(&records)?;
        info!(count = records.len(), "inventory saved");
        Ok(records)
    }
}

/// In-memory store for tests.
///
/// Stamps saves exactly like [`FileStore`] and can be told to fail them,
/// so callers can exercise write-failure paths.
#[derive(Debug, Default)]
pub struct MemStore {
    records: Mutex<Vec<IpRecord>>,
    fail_saves: Mutex<bool>,
}

impl MemStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with records.
    #[must_use]
    pub fn with_records(records: Vec<IpRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            fail_saves: Mutex::new(false),
        }
    }

    /// Make every subsequent save fail with a write error.
    pub fn fail_saves(&self, fail: bool) {
        *self.fail_saves.lock().expect("fail flag lock") = fail;
    }
}

#[async_trait]
impl Store for MemStore {
    async fn load(&self) -> Result<Vec<IpRecord>> {
        Ok(self.records.lock().expect("record lock").clone())
    }

    async fn save(&self, mut records: Vec<IpRecord>) -> Result<Vec<IpRecord>> {
        if *self.fail_saves.lock().expect("fail flag lock") {
            return Err(Error::StoreWrite {
                path: PathBuf::from(":memory:"),
                source: std::io::Error::other("simulated write failure"),
            });
        }
        stamp_records(&mut records, Local::now().date_naive());
        *self.records.lock().expect("record lock") = records.clone();
        Ok(records)
    }
}
