//! Client for the counterpart payment service.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

use super::state::FailureKind;
use crate::config::CounterpartConfig;
use crate::{OpenpayError, Result};

/// Response of `GET /pay/start`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantStart {
    /// URL the payer opens to approve the grant
    pub redirect: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continue_token: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of `POST /pay/execute`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExecuteResponse {
    /// Outgoing payment identifier, used for status polls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Remote operations the payment session drives.
///
/// Each method maps to one request against the counterpart service.
/// Implementations report failures with the error of the matching step
/// (`Discovery`, `IncomingPayment`, ...).
#[async_trait]
pub trait CounterpartApi: Send + Sync {
    /// `GET /wallet-info`
    async fn wallet_info(&self) -> Result<Value>;

    /// `POST /incoming`
    async fn create_incoming(&self) -> Result<Value>;

    /// `POST /quote`
    async fn create_quote(&self) -> Result<Value>;

    /// `GET /pay/start`
    async fn start_grant(&self) -> Result<GrantStart>;

    /// `POST /pay/execute`
    async fn execute(&self) -> Result<ExecuteResponse>;

    /// `GET /outgoing/status?id=...`
    async fn outgoing_status(&self, id: &str) -> Result<Value>;
}

/// HTTP implementation of [`CounterpartApi`] over `reqwest`.
#[derive(Clone, Debug)]
pub struct HttpCounterpart {
    client: Client,
    config: CounterpartConfig,
}

impl HttpCounterpart {
    /// Create a client after validating `config`.
    pub fn new(config: CounterpartConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .build()
            .map_err(|e| OpenpayError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Base URL of the counterpart service.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.request_timeout_secs)
    }

    /// Send `request` and decode a 2xx JSON body; every failure goes through `fail`.
    async fn call<T, F>(&self, request: RequestBuilder, timeout: Duration, fail: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: Fn(String) -> OpenpayError + Send + Sync,
    {
        let response = request.timeout(timeout).send().await.map_err(|e| {
            if e.is_timeout() {
                fail(format!("timed out after {}s", timeout.as_secs()))
            } else {
                fail(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(fail(format!("HTTP {}: {}", status, body)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| fail(format!("unexpected response body: {}", e)))
    }

    async fn step<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        timeout: Duration,
        kind: FailureKind,
    ) -> Result<T> {
        self.call(request, timeout, move |reason| kind.error(reason))
            .await
    }
}

#[async_trait]
impl CounterpartApi for HttpCounterpart {
    async fn wallet_info(&self) -> Result<Value> {
        let request = self.client.get(self.url("wallet-info"));
        let timeout = Duration::from_secs(self.config.discovery_timeout_secs);
        self.step(request, timeout, FailureKind::Discovery).await
    }

    async fn create_incoming(&self) -> Result<Value> {
        let request = self.client.post(self.url("incoming"));
        self.step(request, self.request_timeout(), FailureKind::IncomingPayment)
            .await
    }

    async fn create_quote(&self) -> Result<Value> {
        let request = self.client.post(self.url("quote"));
        self.step(request, self.request_timeout(), FailureKind::Quote)
            .await
    }

    async fn start_grant(&self) -> Result<GrantStart> {
        let request = self.client.get(self.url("pay/start"));
        self.step(request, self.request_timeout(), FailureKind::Grant)
            .await
    }

    async fn execute(&self) -> Result<ExecuteResponse> {
        let request = self.client.post(self.url("pay/execute"));
        let timeout = Duration::from_secs(self.config.execute_timeout_secs);
        self.step(request, timeout, FailureKind::Execution).await
    }

    async fn outgoing_status(&self, id: &str) -> Result<Value> {
        let request = self
            .client
            .get(self.url("outgoing/status"))
            .query(&[("id", id)]);

        // Status polls never fail the session, so they carry their own error.
        self.call(request, self.request_timeout(), OpenpayError::Status)
            .await
    }
}
