//! Wallet resolution: alias -> directory -> remote wallet address document.
//!
//! The resolver performs exactly one outbound GET per wallet, bounded by the
//! client timeout. There is no retry and no fallback data; every failure
//! surfaces as a typed error.

use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use std::sync::Arc;
use std::time::Duration;

use crate::config::OpenpayConfig;
use crate::directory::{self, validate_wallet_url, AliasDirectory};
use crate::models::{SendReceipt, SendRequest, WalletAddress, WalletDescriptor};
use crate::{OpenpayError, Result};

/// Resolves aliases into wallet descriptors.
#[derive(Clone)]
pub struct WalletResolver {
    directory: Arc<dyn AliasDirectory>,
    client: Client,
    timeout: Duration,
}

impl std::fmt::Debug for WalletResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletResolver")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl WalletResolver {
    /// Create a resolver with the given per-request timeout.
    pub fn new(directory: Arc<dyn AliasDirectory>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OpenpayError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            directory,
            client,
            timeout,
        })
    }

    /// Create a resolver using the configured resolver timeout.
    pub fn from_config(directory: Arc<dyn AliasDirectory>, config: &OpenpayConfig) -> Result<Self> {
        Self::new(directory, config.resolver_timeout())
    }

    /// The directory this resolver reads from.
    pub fn directory(&self) -> &Arc<dyn AliasDirectory> {
        &self.directory
    }

    /// Resolve `alias` through the directory and fetch its wallet document.
    pub async fn resolve(&self, alias: &str) -> Result<WalletDescriptor> {
        let wallet_url = {
            let alias = alias.to_string();
            directory::run_blocking(Arc::clone(&self.directory), move |d| d.lookup(&alias))
                .await?
        };
        tracing::debug!(alias, %wallet_url, "resolving wallet");

        let remote = self.fetch_address(&wallet_url).await?;
        Ok(WalletDescriptor::from_parts(alias, wallet_url, remote))
    }

    /// Fetch a wallet document by URL, without a directory lookup.
    ///
    /// The returned descriptor carries the remote `publicName` when present.
    pub async fn fetch(&self, wallet_url: &str) -> Result<WalletDescriptor> {
        validate_wallet_url(wallet_url)?;
        let remote = self.fetch_address(wallet_url).await?;
        let public_name = remote.public_name.clone().unwrap_or_default();
        Ok(WalletDescriptor::from_parts(public_name, wallet_url, remote))
    }

    /// Resolve the sender (and optional recipient) of a payment.
    ///
    /// Input is validated before the directory is consulted. The receipt
    /// only reports that the payment was initiated.
    pub async fn send(&self, request: &SendRequest) -> Result<SendReceipt> {
        if !request.amount.is_finite() || request.amount <= 0.0 {
            return Err(OpenpayError::validation(
                "amount must be a finite number greater than zero",
            ));
        }
        if request.sender.is_empty() {
            return Err(OpenpayError::validation("sender alias must not be empty"));
        }
        if let Some(url) = &request.recipient_wallet_url {
            validate_wallet_url(url)?;
        }

        let sender = self.resolve(&request.sender).await?;
        let recipient = match &request.recipient_wallet_url {
            Some(url) => Some(self.fetch(url).await?),
            None => None,
        };

        let amount_in_base_units = sender.to_base_units(request.amount);
        tracing::info!(
            sender = %request.sender,
            amount = request.amount,
            recipient = recipient.as_ref().map(|r| r.wallet_url.as_str()),
            "payment initiated"
        );

        Ok(SendReceipt {
            status: "initiated".to_string(),
            sender,
            recipient,
            amount: request.amount,
            amount_in_base_units,
        })
    }

    async fn fetch_address(&self, wallet_url: &str) -> Result<WalletAddress> {
        let response = self
            .client
            .get(wallet_url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.fetch_error(wallet_url, self.describe_reqwest_error(&e)))?;

        let response = Self::check_status(response)
            .await
            .map_err(|reason| self.fetch_error(wallet_url, reason))?;

        response
            .json::<WalletAddress>()
            .await
            .map_err(|e| self.fetch_error(wallet_url, format!("malformed wallet document: {}", e)))
    }

    async fn check_status(response: Response) -> std::result::Result<Response, String> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        if body.is_empty() {
            Err(format!("HTTP {}", status))
        } else {
            Err(format!("HTTP {}: {}", status, body))
        }
    }

    fn describe_reqwest_error(&self, e: &reqwest::Error) -> String {
        if e.is_timeout() {
            format!("timed out after {}s", self.timeout.as_secs())
        } else if e.is_connect() {
            format!("connection failed: {}", e)
        } else {
            e.to_string()
        }
    }

    fn fetch_error(&self, wallet_url: &str, reason: impl std::fmt::Display) -> OpenpayError {
        tracing::warn!(%wallet_url, %reason, "wallet fetch failed");
        OpenpayError::fetch_failed(wallet_url, reason)
    }
}
