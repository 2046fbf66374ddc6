use std::sync::Arc;

use openpay_lib::directory::{self, FileAliasDirectory};
use openpay_lib::{AliasDirectory, OpenpayConfig, Result, WalletResolver};

/// Shared, immutable context handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    resolver: WalletResolver,
}

impl AppState {
    pub fn new(resolver: WalletResolver) -> Self {
        Self { resolver }
    }

    /// File-backed directory and resolver built from `config`.
    pub fn from_config(config: &OpenpayConfig) -> Result<Self> {
        let directory: Arc<dyn AliasDirectory> =
            Arc::new(FileAliasDirectory::new(&config.directory_path));
        Ok(Self::new(WalletResolver::from_config(directory, config)?))
    }

    pub fn resolver(&self) -> &WalletResolver {
        &self.resolver
    }

    /// Run `op` against the directory on the blocking pool.
    pub async fn with_directory<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn AliasDirectory) -> Result<T> + Send + 'static,
    {
        directory::run_blocking(Arc::clone(self.resolver.directory()), op)
            .await
    }
}
