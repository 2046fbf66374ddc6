//! Status command - poll an outgoing payment once

use anyhow::Result;
use openpay_lib::orchestrator::{CounterpartApi, HttpCounterpart};
use openpay_lib::OpenpayConfig;

use crate::ui;

pub async fn run(config: &OpenpayConfig, id: &str, verbose: bool) -> Result<()> {
    let counterpart = HttpCounterpart::new(config.counterpart.clone())?;
    if verbose {
        ui::key_value("Counterpart", counterpart.base_url());
    }

    let spinner = ui::spinner("Fetching payment status...");
    let result = counterpart.outgoing_status(id).await;
    spinner.finish_and_clear();

    ui::header(&format!("Outgoing payment {}", id));
    ui::json(&result?);
    Ok(())
}
