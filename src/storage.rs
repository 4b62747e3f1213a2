//! Durable storage for tm.
//!
//! State lives in two independent slots inside one data directory:
//!
//! ```text
//! <data-dir>/
//!   tasks.json    # the ordered task collection (JSON array, store order)
//!   darkMode      # stringified boolean theme preference
//! ```
//!
//! Writes are write-through: every mutation flushes synchronously under a
//! file lock with an atomic temp+rename. Loads fail open: a missing or
//! unparsable slot degrades to the empty/default value instead of erroring,
//! since in-memory state is authoritative for the session.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{Error, Result};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::task::TaskList;

/// File name of the task collection slot
pub const TASKS_SLOT: &str = "tasks.json";

/// File name of the theme preference slot
pub const DARK_MODE_SLOT: &str = "darkMode";

/// Storage manager for the tm data directory
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    /// Create a storage manager rooted at an explicit directory
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Resolve the data directory: explicit override first, then the
    /// platform data dir for `tm`.
    pub fn resolve(override_dir: Option<PathBuf>) -> Result<Self> {
        if let Some(dir) = override_dir {
            return Ok(Self::new(dir));
        }
        let dirs = ProjectDirs::from("", "", "tm").ok_or_else(|| {
            Error::OperationFailed("could not determine a data directory for tm".to_string())
        })?;
        Ok(Self::new(dirs.data_dir().to_path_buf()))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path to the task collection slot
    pub fn tasks_file(&self) -> PathBuf {
        self.data_dir.join(TASKS_SLOT)
    }

    /// Path to the theme preference slot
    pub fn dark_mode_file(&self) -> PathBuf {
        self.data_dir.join(DARK_MODE_SLOT)
    }

    /// Create the data directory if missing
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    // =========================================================================
    // Task collection slot
    // =========================================================================

    /// Load the task collection.
    ///
    /// Never raises: a missing slot yields an empty list, and malformed
    /// content (bad JSON, duplicate ids) is logged and discarded.
    pub fn load_tasks(&self) -> TaskList {
        let path = self.tasks_file();
        if !path.exists() {
            return TaskList::new();
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "failed to read tasks slot, starting empty");
                return TaskList::new();
            }
        };

        let tasks: Vec<crate::task::Task> = match serde_json::from_str(&content) {
            Ok(tasks) => tasks,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "unparsable tasks slot, starting empty");
                return TaskList::new();
            }
        };

        match TaskList::from_vec(tasks) {
            Ok(list) => list,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "invalid tasks slot, starting empty");
                TaskList::new()
            }
        }
    }

    /// Write the task collection (locked, atomic).
    pub fn save_tasks(&self, tasks: &TaskList) -> Result<()> {
        let path = self.tasks_file();
        let lock_path = path.with_extension("lock");
        let _lock = FileLock::acquire(&lock_path, DEFAULT_LOCK_TIMEOUT_MS)?;
        let json = serde_json::to_string_pretty(tasks)?;
        lock::write_atomic(&path, json.as_bytes())
    }

    // =========================================================================
    // Theme preference slot
    // =========================================================================

    /// Load the theme preference; anything other than the literal string
    /// `true` (including a missing slot) reads as light mode.
    pub fn load_dark_mode(&self) -> bool {
        let path = self.dark_mode_file();
        match fs::read_to_string(&path) {
            Ok(content) => content.trim() == "true",
            Err(err) => {
                if path.exists() {
                    tracing::warn!(path = %path.display(), %err, "failed to read theme slot");
                }
                false
            }
        }
    }

    /// Write the theme preference (locked, atomic).
    pub fn save_dark_mode(&self, dark: bool) -> Result<()> {
        let path = self.dark_mode_file();
        let lock_path = path.with_extension("lock");
        let _lock = FileLock::acquire(&lock_path, DEFAULT_LOCK_TIMEOUT_MS)?;
        let value = if dark { "true" } else { "false" };
        lock::write_atomic(&path, value.as_bytes())
    }
}
