//! Alias directory: the local mapping from alias to wallet URL.
//!
//! [`AliasDirectory`] is the storage seam. [`FileAliasDirectory`] persists to
//! a JSON document guarded by an advisory file lock; [`MemoryAliasDirectory`]
//! keeps everything in process for tests and throwaway runs.
//!
//! # Example
//!
//! ```
//! use openpay_lib::directory::{AliasDirectory, MemoryAliasDirectory};
//!
//! let directory = MemoryAliasDirectory::new();
//! directory.insert("alice_wallet", "https://example.test/alice").unwrap();
//! assert_eq!(directory.lookup("alice_wallet").unwrap(), "https://example.test/alice");
//! assert!(directory.insert("alice_wallet", "https://elsewhere.test").is_err());
//! ```

mod file;
mod memory;
mod table;

pub use file::FileAliasDirectory;
pub use memory::MemoryAliasDirectory;

use std::sync::Arc;

use crate::models::AliasRecord;
use crate::{OpenpayError, Result};

/// Records loaded by `initialize` when no custom seed is given.
pub const DEFAULT_SEED: &[(&str, &str)] = &[
    ("humberto_wallet", "https://ilp.interledger-test.dev/183dbd98"),
    ("alice_wallet", "https://ilp.interledger-test.dev/alice-wallet-id"),
    ("bob_store", "https://ilp.interledger-test.dev/bob-store-id"),
    (
        "charlie_savings",
        "https://ilp.interledger-test.dev/charlie-savings-id",
    ),
];

/// Storage operations over the alias directory.
///
/// Aliases are compared exactly (case-sensitive). Implementations must leave
/// the store unchanged when an operation returns an error.
pub trait AliasDirectory: Send + Sync {
    /// Wallet URL for `alias`, or [`OpenpayError::AliasNotFound`].
    fn lookup(&self, alias: &str) -> Result<String>;

    /// Full record for `alias`, or [`OpenpayError::AliasNotFound`].
    fn get(&self, alias: &str) -> Result<AliasRecord>;

    /// Add a new alias; [`OpenpayError::AlreadyExists`] if it is taken.
    fn insert(&self, alias: &str, wallet_url: &str) -> Result<AliasRecord>;

    /// Point an existing alias at a new URL.
    fn update(&self, alias: &str, wallet_url: &str) -> Result<()>;

    /// Remove an alias.
    fn delete(&self, alias: &str) -> Result<()>;

    /// Every record, ordered by alias ascending.
    fn list_all(&self) -> Result<Vec<AliasRecord>>;

    /// Insert each seed record whose alias is not present yet.
    ///
    /// Existing aliases are skipped silently and never overwritten. Returns
    /// the number of records inserted.
    fn initialize(&self, seed: &[(&str, &str)]) -> Result<usize>;
}

/// Run a directory operation on the tokio blocking pool.
///
/// File stores wait on advisory locks that other processes may hold, so async
/// callers must not run them on a runtime worker.
pub async fn run_blocking<T, F>(directory: Arc<dyn AliasDirectory>, op: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn AliasDirectory) -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || op(directory.as_ref()))
        .await
        .map_err(|e| OpenpayError::storage(format!("directory task failed: {}", e)))?
}

/// Reject empty or padded aliases.
pub fn validate_alias(alias: &str) -> Result<()> {
    if alias.is_empty() {
        return Err(OpenpayError::validation("alias must not be empty"));
    }
    if alias.trim() != alias {
        return Err(OpenpayError::validation(format!(
            "alias '{}' has leading or trailing whitespace",
            alias
        )));
    }
    Ok(())
}

/// Require an absolute http(s) URL.
pub fn validate_wallet_url(url: &str) -> Result<()> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| OpenpayError::validation(format!("invalid wallet url '{}': {}", url, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(OpenpayError::validation(format!(
            "wallet url must use http or https, got '{}'",
            other
        ))),
    }
}
