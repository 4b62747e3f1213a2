use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tm::storage::Storage;
use tm::store::TaskStore;

/// A throwaway data directory backing one test's store.
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn storage(&self) -> Storage {
        Storage::new(self.dir.path().to_path_buf())
    }

    pub fn store(&self) -> TaskStore {
        TaskStore::open(self.storage())
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.storage().tasks_file()
    }

    pub fn read_tasks_raw(&self) -> String {
        std::fs::read_to_string(self.tasks_file()).expect("failed to read tasks slot")
    }
}
