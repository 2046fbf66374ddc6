//! Error types for OpenPay operations.
//!
//! Every fallible operation in this crate returns [`OpenpayError`]. Each
//! variant maps to a stable [`OpenpayErrorCode`] so that the HTTP facade and
//! the CLI can react to the error family without matching on messages.

use thiserror::Error;

/// Numeric error codes, grouped by family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum OpenpayErrorCode {
    /// Alias is not present in the directory
    AliasNotFound = 4000,
    /// Alias is already present in the directory
    AlreadyExists = 4001,
    /// Request or input failed validation
    Validation = 5000,
    /// Remote wallet document could not be fetched or parsed
    WalletFetchFailed = 2000,
    /// Self-discovery against the counterpart failed
    Discovery = 6000,
    /// Incoming payment creation failed
    IncomingPayment = 6001,
    /// Quote creation failed
    Quote = 6002,
    /// Interactive grant request failed
    Grant = 6003,
    /// Execute called before the grant was confirmed
    GrantNotConfirmed = 6004,
    /// Grant confirmation arrived after the configured bound
    GrantExpired = 6005,
    /// Outgoing payment execution failed
    Execution = 6006,
    /// Outgoing payment status poll failed
    Status = 6007,
    /// Orchestrator step called from the wrong state
    InvalidTransition = 6100,
    /// Directory storage failure
    Storage = 7000,
    /// Invalid configuration
    Config = 9000,
}

/// Comprehensive error type for OpenPay operations.
#[derive(Debug, Error)]
pub enum OpenpayError {
    /// The alias has no directory entry.
    #[error("alias not found: {0}")]
    AliasNotFound(String),

    /// The alias already has a directory entry.
    #[error("alias already exists: {0}")]
    AlreadyExists(String),

    /// Input failed validation before any side effect happened.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The remote wallet endpoint could not be read.
    #[error("failed to fetch wallet {endpoint}: {reason}")]
    WalletFetchFailed {
        /// Wallet URL that was requested
        endpoint: String,
        /// Underlying cause
        reason: String,
    },

    /// Wallet self-discovery on the counterpart failed.
    #[error("wallet discovery failed: {0}")]
    Discovery(String),

    /// Incoming payment creation failed.
    #[error("incoming payment creation failed: {0}")]
    IncomingPayment(String),

    /// Quote creation failed.
    #[error("quote creation failed: {0}")]
    Quote(String),

    /// Interactive grant request failed.
    #[error("grant request failed: {0}")]
    Grant(String),

    /// Execute was invoked before the grant was confirmed.
    #[error("grant has not been confirmed")]
    GrantNotConfirmed,

    /// Grant confirmation arrived too late.
    #[error("grant expired after {waited_secs}s (limit {limit_secs}s)")]
    GrantExpired {
        /// Seconds elapsed since the grant was requested
        waited_secs: u64,
        /// Configured bound
        limit_secs: u64,
    },

    /// Outgoing payment execution failed.
    #[error("payment execution failed: {0}")]
    Execution(String),

    /// Status poll failed.
    #[error("status poll failed: {0}")]
    Status(String),

    /// A session step was invoked out of order.
    #[error("cannot {step} while session is {state}")]
    InvalidTransition {
        /// Step that was attempted
        step: &'static str,
        /// State the session was in
        state: String,
    },

    /// Directory storage failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl OpenpayError {
    /// Get the error code for this error.
    pub fn code(&self) -> OpenpayErrorCode {
        match self {
            Self::AliasNotFound(_) => OpenpayErrorCode::AliasNotFound,
            Self::AlreadyExists(_) => OpenpayErrorCode::AlreadyExists,
            Self::Validation(_) => OpenpayErrorCode::Validation,
            Self::WalletFetchFailed { .. } => OpenpayErrorCode::WalletFetchFailed,
            Self::Discovery(_) => OpenpayErrorCode::Discovery,
            Self::IncomingPayment(_) => OpenpayErrorCode::IncomingPayment,
            Self::Quote(_) => OpenpayErrorCode::Quote,
            Self::Grant(_) => OpenpayErrorCode::Grant,
            Self::GrantNotConfirmed => OpenpayErrorCode::GrantNotConfirmed,
            Self::GrantExpired { .. } => OpenpayErrorCode::GrantExpired,
            Self::Execution(_) => OpenpayErrorCode::Execution,
            Self::Status(_) => OpenpayErrorCode::Status,
            Self::InvalidTransition { .. } => OpenpayErrorCode::InvalidTransition,
            Self::Storage(_) => OpenpayErrorCode::Storage,
            Self::Config(_) => OpenpayErrorCode::Config,
        }
    }

    /// Returns true for the not-found family.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::AliasNotFound(_))
    }

    /// Create a storage error from any displayable cause.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }

    /// Create a validation error.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }

    /// Create a wallet fetch error.
    pub fn fetch_failed(endpoint: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::WalletFetchFailed {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<std::io::Error> for OpenpayError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
