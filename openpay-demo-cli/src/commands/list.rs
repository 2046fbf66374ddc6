//! List command - show every alias in the directory

use anyhow::Result;
use openpay_lib::{AliasDirectory, OpenpayConfig};

use crate::ui;

pub async fn run(config: &OpenpayConfig, verbose: bool) -> Result<()> {
    let directory = super::open_directory(config);
    let records = directory.list_all()?;

    if records.is_empty() {
        ui::info("Directory is empty");
        ui::info("Run 'openpay init' to load the default aliases");
        return Ok(());
    }

    ui::header("Wallet Directory");
    ui::alias_table(&records);

    if verbose {
        ui::key_value("File", &directory.path().display().to_string());
    }
    ui::info(&format!("{} alias(es)", records.len()));
    Ok(())
}
