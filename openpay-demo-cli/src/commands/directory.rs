//! Directory commands - init, add, del, mod

use anyhow::Result;
use openpay_lib::directory::{validate_alias, validate_wallet_url, DEFAULT_SEED};
use openpay_lib::{AliasDirectory, OpenpayConfig};

use crate::ui;

pub async fn init(config: &OpenpayConfig, verbose: bool) -> Result<()> {
    let directory = super::open_directory(config);
    let added = directory.initialize(DEFAULT_SEED)?;

    if added == 0 {
        ui::info("Directory already initialized, nothing added");
    } else {
        ui::success(&format!("Directory initialized: {} record(s) added", added));
    }
    if verbose {
        ui::key_value("File", &directory.path().display().to_string());
    }
    Ok(())
}

pub async fn add(config: &OpenpayConfig, alias: &str, url: &str, verbose: bool) -> Result<()> {
    validate_alias(alias)?;
    validate_wallet_url(url)?;

    let directory = super::open_directory(config);
    let record = directory.insert(alias, url)?;

    ui::success(&format!("Added '{}' -> {}", record.alias, record.wallet_url));
    if verbose {
        ui::key_value("Id", &record.id.to_string());
    }
    Ok(())
}

pub async fn delete(config: &OpenpayConfig, alias: &str, _verbose: bool) -> Result<()> {
    let directory = super::open_directory(config);
    directory.delete(alias)?;
    ui::success(&format!("Deleted '{}'", alias));
    Ok(())
}

pub async fn modify(config: &OpenpayConfig, alias: &str, url: &str, verbose: bool) -> Result<()> {
    validate_wallet_url(url)?;

    let directory = super::open_directory(config);
    if verbose {
        if let Ok(previous) = directory.lookup(alias) {
            ui::key_value("Previous URL", &previous);
        }
    }
    directory.update(alias, url)?;
    ui::success(&format!("Updated '{}' -> {}", alias, url));
    Ok(())
}
