//! Pay command - interactive payment against the counterpart service
//!
//! Walks discovery, incoming payment, quote and grant, waits for the operator
//! to approve the grant in a browser, then executes and polls status once.

use anyhow::{bail, Result};
use openpay_lib::orchestrator::PaymentSession;
use openpay_lib::OpenpayConfig;
use serde_json::Value;
use std::time::Duration;

use crate::ui;

const STATUS_POLL_DELAY: Duration = Duration::from_secs(2);

pub async fn run(config: &OpenpayConfig, yes: bool, verbose: bool) -> Result<()> {
    if !yes && !ui::is_interactive() {
        bail!("not attached to a terminal; pass --yes to skip the approval prompt");
    }

    let mut session = PaymentSession::connect(&config.counterpart)?;
    ui::header("Interactive Payment");
    ui::key_value("Counterpart", &config.counterpart.base_url);
    if verbose {
        ui::key_value(
            "Grant expiry",
            &format!("{}s", config.counterpart.grant_expiry_secs),
        );
    }

    ui::step(1, "Wallet discovery");
    show(session.discover().await?);

    ui::step(2, "Incoming payment");
    show(session.create_incoming().await?);

    ui::step(3, "Quote");
    show(session.create_quote().await?);

    ui::step(4, "Grant request");
    let grant = session.start_grant().await?;
    show(serde_json::to_value(&grant)?);
    ui::approval_link(&grant.redirect);

    if !yes && !ui::confirm("Approved the grant?", true)? {
        ui::warning("Payment cancelled before execution");
        return Ok(());
    }
    session.confirm_grant(None)?;

    ui::step(5, "Execute payment");
    let outgoing = session.execute().await?;
    show(serde_json::to_value(&outgoing)?);

    match outgoing.id.as_deref() {
        Some(id) => {
            ui::step(6, "Payment status");
            tokio::time::sleep(STATUS_POLL_DELAY).await;
            show(session.poll_status().await?);
            ui::success(&format!("Payment {} executed", id));
        }
        None => ui::warning("Counterpart returned no payment id; skipping status poll"),
    }

    Ok(())
}

fn show(value: Value) {
    ui::json(&value);
}
