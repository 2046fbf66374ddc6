use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::AliasRecord;
use crate::{OpenpayError, Result};

/// In-memory image of the directory, shared by both stores.
///
/// `records` is keyed by alias, so iteration order is alias ascending.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub(crate) struct AliasTable {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    records: BTreeMap<String, AliasRecord>,
}

impl AliasTable {
    pub(crate) fn lookup(&self, alias: &str) -> Result<String> {
        self.get(alias).map(|record| record.wallet_url)
    }

    pub(crate) fn get(&self, alias: &str) -> Result<AliasRecord> {
        self.records
            .get(alias)
            .cloned()
            .ok_or_else(|| OpenpayError::AliasNotFound(alias.to_string()))
    }

    pub(crate) fn insert(&mut self, alias: &str, wallet_url: &str) -> Result<AliasRecord> {
        if self.records.contains_key(alias) {
            return Err(OpenpayError::AlreadyExists(alias.to_string()));
        }

        // ids start at 1 and are never handed out twice
        let id = self.next_id.max(self.max_id()) + 1;
        self.next_id = id;

        let record = AliasRecord {
            id,
            alias: alias.to_string(),
            wallet_url: wallet_url.to_string(),
        };
        self.records.insert(alias.to_string(), record.clone());
        Ok(record)
    }

    pub(crate) fn update(&mut self, alias: &str, wallet_url: &str) -> Result<()> {
        let record = self
            .records
            .get_mut(alias)
            .ok_or_else(|| OpenpayError::AliasNotFound(alias.to_string()))?;
        record.wallet_url = wallet_url.to_string();
        Ok(())
    }

    pub(crate) fn delete(&mut self, alias: &str) -> Result<()> {
        self.records
            .remove(alias)
            .map(|_| ())
            .ok_or_else(|| OpenpayError::AliasNotFound(alias.to_string()))
    }

    pub(crate) fn list_all(&self) -> Vec<AliasRecord> {
        self.records.values().cloned().collect()
    }

    pub(crate) fn initialize(&mut self, seed: &[(&str, &str)]) -> usize {
        let mut inserted = 0;
        for (alias, wallet_url) in seed {
            if self.insert(alias, wallet_url).is_ok() {
                inserted += 1;
            }
        }
        inserted
    }

    fn max_id(&self) -> u64 {
        self.records.values().map(|r| r.id).max().unwrap_or(0)
    }
}
