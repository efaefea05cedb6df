use std::path::{Path, PathBuf};

/// Configuration for a [`Database`](crate::Database).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding one file per table.
    pub data_dir: PathBuf,

    /// Whether full-file rewrites are flushed with `sync_all` before the
    /// temp file is renamed over the table.
    pub sync_writes: bool,

    /// Whether opening the database creates a missing data directory.
    /// When `false`, a missing directory is a `NotFound` error.
    pub create_dir: bool,
}

impl StoreConfig {
    /// Creates a configuration rooted at `data_dir`.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            sync_writes: true,
            create_dir: false,
        }
    }

    /// Sets whether rewrites are synced to disk.
    pub fn with_sync_writes(mut self, sync: bool) -> Self {
        self.sync_writes = sync;
        self
    }

    /// Sets whether a missing data directory is created on open.
    pub fn with_create_dir(mut self, create: bool) -> Self {
        self.create_dir = create;
        self
    }

    /// Resolves the file path of a table.
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.data_dir.join(table)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new("./data")
    }
}
