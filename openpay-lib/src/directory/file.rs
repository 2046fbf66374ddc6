//! JSON-file backed directory.
//!
//! Each call takes an advisory lock (`fs2`) on a sidecar `<file>.lock`, does
//! its work and drops the lock handle, which releases the lock on every exit
//! path. Nothing is cached between calls, so several processes (the CLI and
//! the server) can share one file.
//!
//! Writes go to `<file>.tmp` and are renamed over the store, so a failed write
//! leaves the previous contents in place.

use fs2::FileExt;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::table::AliasTable;
use super::AliasDirectory;
use crate::models::AliasRecord;
use crate::{OpenpayError, Result};

/// Alias directory persisted as a single JSON document.
#[derive(Clone, Debug)]
pub struct FileAliasDirectory {
    path: PathBuf,
}

impl FileAliasDirectory {
    /// Create a directory backed by `path`. The file is created on first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".");
        name.push(suffix);
        PathBuf::from(name)
    }

    /// Run `f` against a snapshot of the table under a shared lock.
    fn read<T>(&self, f: impl FnOnce(&AliasTable) -> Result<T>) -> Result<T> {
        if !self.path.exists() {
            return f(&AliasTable::default());
        }

        let _lock = self.lock(LockMode::Shared)?;
        let table = self.load()?;
        f(&table)
    }

    /// Run `f` against the table under an exclusive lock, persisting on success.
    ///
    /// While the store does not exist, `f` is first tried against an empty
    /// table so that a rejected change creates neither the file nor its
    /// parent directories.
    fn write<T>(&self, f: impl Fn(&mut AliasTable) -> Result<T>) -> Result<T> {
        if !self.path.exists() {
            f(&mut AliasTable::default())?;
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| self.storage_error("create", e))?;
                }
            }
        }

        let _lock = self.lock(LockMode::Exclusive)?;
        let mut table = self.load()?;
        let value = f(&mut table)?;
        self.store(&table)?;
        Ok(value)
    }

    fn lock(&self, mode: LockMode) -> Result<LockGuard> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.sibling("lock"))
            .map_err(|e| self.storage_error("open lock for", e))?;
        LockGuard::acquire(file, mode).map_err(|e| self.storage_error("lock", e))
    }

    fn load(&self) -> Result<AliasTable> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(AliasTable::default()),
            Err(e) => return Err(self.storage_error("read", e)),
        };

        if contents.trim().is_empty() {
            return Ok(AliasTable::default());
        }
        serde_json::from_str(&contents).map_err(|e| self.storage_error("parse", e))
    }

    fn store(&self, table: &AliasTable) -> Result<()> {
        let json =
            serde_json::to_string_pretty(table).map_err(|e| self.storage_error("serialize", e))?;

        let temp = self.sibling("tmp");
        let written = File::create(&temp).and_then(|mut file| {
            file.write_all(json.as_bytes())?;
            file.sync_all()
        });
        if let Err(e) = written {
            let _ = std::fs::remove_file(&temp);
            return Err(self.storage_error("write", e));
        }

        std::fs::rename(&temp, &self.path).map_err(|e| self.storage_error("replace", e))
    }

    fn storage_error(&self, action: &str, err: impl std::fmt::Display) -> OpenpayError {
        tracing::error!(
            path = %self.path.display(),
            action,
            error = %err,
            "directory storage failure"
        );
        OpenpayError::Storage(format!(
            "failed to {} {}: {}",
            action,
            self.path.display(),
            err
        ))
    }
}

impl AliasDirectory for FileAliasDirectory {
    fn lookup(&self, alias: &str) -> Result<String> {
        tracing::debug!(alias, "directory lookup");
        self.read(|table| table.lookup(alias))
    }

    fn get(&self, alias: &str) -> Result<AliasRecord> {
        self.read(|table| table.get(alias))
    }

    fn insert(&self, alias: &str, wallet_url: &str) -> Result<AliasRecord> {
        tracing::debug!(alias, wallet_url, "directory insert");
        self.write(|table| table.insert(alias, wallet_url))
    }

    fn update(&self, alias: &str, wallet_url: &str) -> Result<()> {
        tracing::debug!(alias, wallet_url, "directory update");
        self.write(|table| table.update(alias, wallet_url))
    }

    fn delete(&self, alias: &str) -> Result<()> {
        tracing::debug!(alias, "directory delete");
        self.write(|table| table.delete(alias))
    }

    fn list_all(&self) -> Result<Vec<AliasRecord>> {
        self.read(|table| Ok(table.list_all()))
    }

    fn initialize(&self, seed: &[(&str, &str)]) -> Result<usize> {
        let inserted = self.write(|table| Ok(table.initialize(seed)))?;
        tracing::info!(inserted, total = seed.len(), "directory initialized");
        Ok(inserted)
    }
}

#[derive(Clone, Copy)]
enum LockMode {
    Shared,
    Exclusive,
}

/// Lock file handle holding an advisory lock until dropped.
struct LockGuard {
    file: File,
}

impl LockGuard {
    fn acquire(file: File, mode: LockMode) -> std::io::Result<Self> {
        match mode {
            LockMode::Shared => FileExt::lock_shared(&file)?,
            LockMode::Exclusive => FileExt::lock_exclusive(&file)?,
        }
        Ok(Self { file })
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
