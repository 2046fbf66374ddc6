//! Resolve command - look up an alias and fetch its wallet document

use anyhow::Result;
use openpay_lib::{AliasDirectory, OpenpayConfig, WalletResolver};
use std::sync::Arc;

use crate::ui;

pub async fn run(config: &OpenpayConfig, alias: &str, verbose: bool) -> Result<()> {
    let directory: Arc<dyn AliasDirectory> = Arc::new(super::open_directory(config));
    let resolver = WalletResolver::from_config(directory, config)?;

    let spinner = ui::spinner(&format!("Resolving '{}'...", alias));
    let result = resolver.resolve(alias).await;
    spinner.finish_and_clear();
    let wallet = result?;

    ui::header(&format!("Wallet for '{}'", wallet.public_name));
    ui::wallet(&wallet);

    if verbose {
        println!();
        ui::json(&serde_json::to_value(&wallet)?);
    }
    Ok(())
}
