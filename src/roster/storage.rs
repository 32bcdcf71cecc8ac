//! Roster storage interface and implementations
//!
//! This module defines the interface for persisting player records, with a
//! JSON-file implementation for production and an in-memory one for tests
//! and throwaway runs.

use crate::error::{DrawError, Result};
use crate::metrics::MetricsCollector;
use crate::roster::document::RosterDocument;
use crate::types::{Player, PlayerId};
use anyhow::Context;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

/// Trait for roster storage operations
///
/// Lookups by id that match nothing return `None` / `false` rather than an
/// error, so callers can tell "no such player" apart from storage failures.
#[cfg_attr(test, mockall::automock)]
pub trait RosterStorage: Send + Sync {
    /// Every rostered player, in insertion order
    fn get_all(&self) -> Result<Vec<Player>>;

    /// Create a new active player
    fn add(&self, name: &str, rating: f64) -> Result<Player>;

    /// Replace a player's name and rating
    fn update(&self, id: PlayerId, name: &str, rating: f64) -> Result<Option<Player>>;

    /// Remove a player
    fn delete(&self, id: PlayerId) -> Result<bool>;

    /// Flip a player's active flag
    fn toggle_active(&self, id: PlayerId) -> Result<Option<Player>>;

    /// Players that take part in draws
    fn active_players(&self) -> Result<Vec<Player>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|player| player.active)
            .collect())
    }
}

/// JSON-file roster storage
///
/// Every operation runs load, modify and save as one critical section under
/// a single store-wide mutex. Missing, empty or malformed files are replaced
/// by an empty roster (`last_id = 0`, no players) and the previous contents
/// are discarded; each reset is logged at WARN and counted.
pub struct JsonFileRosterStore {
    path: PathBuf,
    lock: Mutex<()>,
    metrics_collector: Option<Arc<MetricsCollector>>,
}

impl JsonFileRosterStore {
    /// Open (creating if needed) the roster file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            path: path.into(),
            lock: Mutex::new(()),
            metrics_collector: None,
        };
        store.ensure_file_exists()?;
        Ok(store)
    }

    /// Open the roster file and report operations to `metrics_collector`
    pub fn with_metrics(
        path: impl Into<PathBuf>,
        metrics_collector: Arc<MetricsCollector>,
    ) -> Result<Self> {
        let mut store = Self::new(path)?;
        store.metrics_collector = Some(metrics_collector);
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_file_exists(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create roster directory {}", parent.display())
                })?;
            }
        }

        if !self.path.exists() {
            info!("Creating empty roster at {}", self.path.display());
            self.save(&RosterDocument::default())?;
        }

        Ok(())
    }

    fn acquire(&self) -> Result<MutexGuard<'_, ()>> {
        self.lock.lock().map_err(|_| {
            DrawError::InternalError {
                message: "Failed to acquire roster lock".to_string(),
            }
            .into()
        })
    }

    /// Read the roster, resetting unreadable storage to an empty baseline.
    ///
    /// Callers must hold the store lock.
    fn load(&self) -> Result<RosterDocument> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return self.recover("roster file is missing");
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                return self.recover("roster file is not valid UTF-8");
            }
            Err(e) => {
                error!("Failed to read roster {}: {}", self.path.display(), e);
                return Err(DrawError::StorageError {
                    message: format!("Failed to read {}: {}", self.path.display(), e),
                }
                .into());
            }
        };

        if raw.trim().is_empty() {
            return self.recover("roster file is empty");
        }

        match serde_json::from_str::<RosterDocument>(&raw) {
            Ok(document) => Ok(document),
            Err(e) => self.recover(&format!("roster file is malformed ({})", e)),
        }
    }

    fn recover(&self, reason: &str) -> Result<RosterDocument> {
        warn!(
            "Resetting roster {} to empty: {}; previous contents are discarded",
            self.path.display(),
            reason
        );
        if let Some(metrics) = &self.metrics_collector {
            metrics.record_store_recovery();
        }

        let document = RosterDocument::default();
        self.save(&document)?;
        Ok(document)
    }

    fn save(&self, document: &RosterDocument) -> Result<()> {
        let json = serde_json::to_string_pretty(document).map_err(|e| DrawError::StorageError {
            message: format!("Failed to serialize roster: {}", e),
        })?;

        self.write_atomically(json.as_bytes()).map_err(|e| {
            error!("Failed to write roster {}: {}", self.path.display(), e);
            DrawError::StorageError {
                message: format!("Failed to write {}: {}", self.path.display(), e),
            }
            .into()
        })
    }

    /// Write to a sibling temp file and rename it over the roster, so a
    /// failed write never leaves a truncated roster behind.
    fn write_atomically(&self, contents: &[u8]) -> std::io::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(contents)?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Run `op` against the loaded roster inside the critical section.
    ///
    /// The document is written back only when `op` reports a change.
    fn transact<T, F>(&self, operation: &str, op: F) -> Result<T>
    where
        F: FnOnce(&mut RosterDocument) -> (T, bool),
    {
        let result: Result<T> = (|| {
            let _guard = self.acquire()?;
            let mut document = self.load()?;
            let (value, changed) = op(&mut document);
            if changed {
                self.save(&document)?;
            }
            Ok(value)
        })();

        if let Some(metrics) = &self.metrics_collector {
            metrics.record_store_operation(operation, result.is_ok());
        }
        result
    }
}

impl RosterStorage for JsonFileRosterStore {
    fn get_all(&self) -> Result<Vec<Player>> {
        self.transact("get_all", |document| (document.players.clone(), false))
    }

    fn add(&self, name: &str, rating: f64) -> Result<Player> {
        let player = self.transact("add", |document| (document.add(name, rating), true))?;
        info!(
            "Added player {} '{}' (rating {:.1})",
            player.id, player.name, player.rating
        );
        Ok(player)
    }

    fn update(&self, id: PlayerId, name: &str, rating: f64) -> Result<Option<Player>> {
        let updated = self.transact("update", |document| {
            let updated = document.update(id, name, rating);
            let changed = updated.is_some();
            (updated, changed)
        })?;

        match &updated {
            Some(player) => info!(
                "Updated player {} to '{}' (rating {:.1})",
                player.id, player.name, player.rating
            ),
            None => debug!("Update skipped: player {} not found", id),
        }
        Ok(updated)
    }

    fn delete(&self, id: PlayerId) -> Result<bool> {
        let removed = self.transact("delete", |document| {
            let removed = document.delete(id);
            (removed, removed)
        })?;

        if removed {
            info!("Deleted player {}", id);
        } else {
            debug!("Delete skipped: player {} not found", id);
        }
        Ok(removed)
    }

    fn toggle_active(&self, id: PlayerId) -> Result<Option<Player>> {
        let toggled = self.transact("toggle_active", |document| {
            let toggled = document.toggle_active(id);
            let changed = toggled.is_some();
            (toggled, changed)
        })?;

        if let Some(player) = &toggled {
            let state = if player.active { "active" } else { "inactive" };
            info!("Player {} is now {}", player.id, state);
        }
        Ok(toggled)
    }
}

/// In-memory roster storage implementation
#[derive(Debug, Default)]
pub struct InMemoryRosterStore {
    document: Mutex<RosterDocument>,
}

impl InMemoryRosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing document (for testing)
    pub fn with_document(document: RosterDocument) -> Self {
        Self {
            document: Mutex::new(document),
        }
    }

    fn acquire(&self) -> Result<MutexGuard<'_, RosterDocument>> {
        self.document.lock().map_err(|_| {
            DrawError::InternalError {
                message: "Failed to acquire roster lock".to_string(),
            }
            .into()
        })
    }
}

impl RosterStorage for InMemoryRosterStore {
    fn get_all(&self) -> Result<Vec<Player>> {
        Ok(self.acquire()?.players.clone())
    }

    fn add(&self, name: &str, rating: f64) -> Result<Player> {
        Ok(self.acquire()?.add(name, rating))
    }

    fn update(&self, id: PlayerId, name: &str, rating: f64) -> Result<Option<Player>> {
        Ok(self.acquire()?.update(id, name, rating))
    }

    fn delete(&self, id: PlayerId) -> Result<bool> {
        Ok(self.acquire()?.delete(id))
    }

    fn toggle_active(&self, id: PlayerId) -> Result<Option<Player>> {
        Ok(self.acquire()?.toggle_active(id))
    }
}
