//! Terminal output for the `openpay` binary.
//!
//! Everything a command reports goes to stdout, failures included. Stderr is
//! left to tracing.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use openpay_lib::{AliasRecord, WalletDescriptor};
use serde_json::Value;
use std::time::Duration;

const RULE_WIDTH: usize = 60;
const NAME_COLUMN: &str = "PUBLIC NAME";

pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Report a failed command.
pub fn error(message: &str) {
    println!("{} {}", "✗".red().bold(), message);
}

pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

pub fn warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

pub fn header(text: &str) {
    println!("\n{}", text.bold().underline());
}

pub fn key_value(key: &str, value: &str) {
    println!("  {}: {}", key.cyan(), value);
}

fn rule() {
    println!("{}", "─".repeat(RULE_WIDTH).dimmed());
}

/// Directory records as a `PUBLIC NAME | WALLET URL` table, in the order given.
pub fn alias_table(records: &[AliasRecord]) {
    let width = records
        .iter()
        .map(|r| r.alias.chars().count())
        .max()
        .unwrap_or(0)
        .max(NAME_COLUMN.len());

    let heading = format!("{:<width$} | WALLET URL", NAME_COLUMN, width = width);
    println!("{}", heading.bold());
    rule();
    for record in records {
        println!("{:<width$} | {}", record.alias, record.wallet_url, width = width);
    }
    rule();
}

/// Fields of a resolved wallet. Fields the remote left out are not printed.
pub fn wallet(wallet: &WalletDescriptor) {
    key_value("Wallet URL", &wallet.wallet_url);

    let optional = [
        ("Asset", wallet.asset_code.clone()),
        ("Scale", wallet.asset_scale.map(|s| s.to_string())),
        ("Auth server", wallet.auth_server.clone()),
        ("Resource server", wallet.resource_server.clone()),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            key_value(label, &value);
        }
    }
}

/// Numbered heading for one stage of the payment flow.
pub fn step(number: u8, title: &str) {
    header(&format!("{}) {}", number, title));
}

/// Grant redirect the operator must open, framed so it stands out.
pub fn approval_link(url: &str) {
    rule();
    info("Open this URL in a browser and approve the payment:");
    println!("  {}", url.underline());
    rule();
}

pub fn json(value: &Value) {
    if let Ok(pretty) = serde_json::to_string_pretty(value) {
        println!("{}", pretty);
    }
}

/// Spinner shown while a remote call is in flight.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn confirm(prompt: &str, default: bool) -> anyhow::Result<bool> {
    Ok(dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// True when a person is at the terminal to answer prompts.
pub fn is_interactive() -> bool {
    console::user_attended()
}
