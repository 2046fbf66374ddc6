//! Request handlers.
//!
//! Every handler validates its input before it touches the directory, so a
//! 400 response never has side effects. Directory calls run on the blocking
//! pool through [`AppState::with_directory`].

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use openpay_lib::directory::{validate_alias, validate_wallet_url};
use openpay_lib::SendRequest;

use crate::error::ApiError;
use crate::state::AppState;

type ApiResult<T> = Result<T, ApiError>;

fn success(data: impl serde::Serialize) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

fn success_with_message(message: String, data: impl serde::Serialize) -> Json<Value> {
    Json(json!({ "success": true, "message": message, "data": data }))
}

/// Unwrap a JSON body, turning extractor rejections into a 400 body.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload.map(|Json(value)| value).map_err(ApiError::from)
}

fn required(value: Option<String>, field: &str) -> ApiResult<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::bad_request(format!("{} is required", field))),
    }
}

/// `GET /api/health`
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "OpenPay alias directory is running",
    }))
}

/// `GET /api/user/{alias}`
pub async fn get_user(
    State(state): State<AppState>,
    Path(alias): Path<String>,
) -> ApiResult<Json<Value>> {
    let wallet = state.resolver().resolve(&alias).await?;
    Ok(success(wallet))
}

#[derive(Debug, Deserialize)]
pub struct SendBody {
    user_id: Option<String>,
    sender_public_name: Option<String>,
    amount: Option<f64>,
    recipient_wallet_url: Option<String>,
}

/// `POST /api/send`
pub async fn send(
    State(state): State<AppState>,
    payload: Result<Json<SendBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let payload = body(payload)?;

    // user_id wins when both names are present
    let sender = payload
        .user_id
        .filter(|s| !s.is_empty())
        .or(payload.sender_public_name.filter(|s| !s.is_empty()))
        .ok_or_else(|| ApiError::bad_request("user_id or sender_public_name is required"))?;
    let amount = payload
        .amount
        .ok_or_else(|| ApiError::bad_request("amount is required"))?;

    let mut request = SendRequest::new(sender, amount);
    if let Some(url) = payload.recipient_wallet_url {
        request = request.with_recipient(url);
    }

    let receipt = state.resolver().send(&request).await?;
    Ok(success(receipt))
}

/// `GET /api/wallets-db`
pub async fn list_wallets(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let wallets = state.with_directory(|d| d.list_all()).await?;
    let count = wallets.len();
    Ok(success(json!({ "wallets": wallets, "count": count })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBody {
    public_name: Option<String>,
    wallet_url: Option<String>,
}

impl WalletBody {
    fn validated(self) -> ApiResult<(String, String)> {
        let alias = required(self.public_name, "publicName")?;
        let wallet_url = required(self.wallet_url, "walletUrl")?;
        validate_alias(&alias)?;
        validate_wallet_url(&wallet_url)?;
        Ok((alias, wallet_url))
    }
}

/// `POST /api/wallets-db/add`
pub async fn add_wallet(
    State(state): State<AppState>,
    payload: Result<Json<WalletBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let (alias, wallet_url) = body(payload)?.validated()?;
    let record = {
        let (alias, wallet_url) = (alias.clone(), wallet_url.clone());
        state
            .with_directory(move |d| d.insert(&alias, &wallet_url))
            .await?
    };
    tracing::info!(alias = %alias, "wallet added");
    Ok((
        StatusCode::CREATED,
        success_with_message(format!("wallet '{}' added", alias), record),
    ))
}

/// `PUT /api/wallets-db/update`
pub async fn update_wallet(
    State(state): State<AppState>,
    payload: Result<Json<WalletBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let (alias, wallet_url) = body(payload)?.validated()?;
    {
        let (alias, wallet_url) = (alias.clone(), wallet_url.clone());
        state
            .with_directory(move |d| d.update(&alias, &wallet_url))
            .await?;
    }
    tracing::info!(alias = %alias, "wallet updated");
    Ok(success_with_message(
        format!("wallet '{}' updated", alias),
        json!({ "publicName": alias, "walletUrl": wallet_url }),
    ))
}

/// `DELETE /api/wallets-db/delete/{alias}`
pub async fn delete_wallet(
    State(state): State<AppState>,
    Path(alias): Path<String>,
) -> ApiResult<Json<Value>> {
    {
        let alias = alias.clone();
        state.with_directory(move |d| d.delete(&alias)).await?;
    }
    tracing::info!(alias = %alias, "wallet deleted");
    Ok(success_with_message(
        format!("wallet '{}' deleted", alias),
        json!({ "publicName": alias }),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveBody {
    public_name: Option<String>,
}

/// `POST /api/resolve-user`: directory only, no remote call.
pub async fn resolve_user(
    State(state): State<AppState>,
    payload: Result<Json<ResolveBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let alias = required(body(payload)?.public_name, "publicName")?;
    let wallet_url = {
        let alias = alias.clone();
        state.with_directory(move |d| d.lookup(&alias)).await?
    };
    Ok(success(json!({ "publicName": alias, "walletUrl": wallet_url })))
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::not_found("no such route")
}
