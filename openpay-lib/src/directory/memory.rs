use std::sync::RwLock;

use super::table::AliasTable;
use super::AliasDirectory;
use crate::models::AliasRecord;
use crate::Result;

/// In-process alias directory.
///
/// Nothing is persisted. Tests and embedders that build their own
/// `WalletResolver` use it in place of the file store.
#[derive(Debug, Default)]
pub struct MemoryAliasDirectory {
    table: RwLock<AliasTable>,
}

impl MemoryAliasDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory pre-loaded with `seed`.
    pub fn with_records(seed: &[(&str, &str)]) -> Self {
        let mut table = AliasTable::default();
        table.initialize(seed);
        Self {
            table: RwLock::new(table),
        }
    }
}

impl AliasDirectory for MemoryAliasDirectory {
    fn lookup(&self, alias: &str) -> Result<String> {
        let table = self.table.read().unwrap_or_else(|e| e.into_inner());
        table.lookup(alias)
    }

    fn get(&self, alias: &str) -> Result<AliasRecord> {
        let table = self.table.read().unwrap_or_else(|e| e.into_inner());
        table.get(alias)
    }

    fn insert(&self, alias: &str, wallet_url: &str) -> Result<AliasRecord> {
        let mut table = self.table.write().unwrap_or_else(|e| e.into_inner());
        table.insert(alias, wallet_url)
    }

    fn update(&self, alias: &str, wallet_url: &str) -> Result<()> {
        let mut table = self.table.write().unwrap_or_else(|e| e.into_inner());
        table.update(alias, wallet_url)
    }

    fn delete(&self, alias: &str) -> Result<()> {
        let mut table = self.table.write().unwrap_or_else(|e| e.into_inner());
        table.delete(alias)
    }

    fn list_all(&self) -> Result<Vec<AliasRecord>> {
        let table = self.table.read().unwrap_or_else(|e| e.into_inner());
        Ok(table.list_all())
    }

    fn initialize(&self, seed: &[(&str, &str)]) -> Result<usize> {
        let mut table = self.table.write().unwrap_or_else(|e| e.into_inner());
        Ok(table.initialize(seed))
    }
}
