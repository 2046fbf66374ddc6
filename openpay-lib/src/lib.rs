//! OpenPay library.
//!
//! Maps human-readable aliases to Open Payments wallet URLs and drives the
//! interactive payment sequence against a counterpart service.
//!
//! # Components
//!
//! - **Directory**: persistent alias -> wallet URL store ([`directory`])
//! - **Resolver**: alias -> remote wallet document ([`WalletResolver`])
//! - **Orchestrator**: stateful payment session ([`orchestrator`])
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use openpay_lib::directory::{FileAliasDirectory, DEFAULT_SEED, AliasDirectory};
//! use openpay_lib::{OpenpayConfig, WalletResolver};
//!
//! let config = OpenpayConfig::default();
//! let directory = Arc::new(FileAliasDirectory::new(&config.directory_path));
//! directory.initialize(DEFAULT_SEED)?;
//!
//! let resolver = WalletResolver::from_config(directory, &config)?;
//! let wallet = resolver.resolve("alice_wallet").await?;
//! println!("{} uses {:?}", wallet.public_name, wallet.asset_code);
//! ```

pub mod config;
pub mod directory;
pub mod errors;
pub mod models;
pub mod orchestrator;
pub mod resolver;

pub use config::{CounterpartConfig, OpenpayConfig};
pub use directory::AliasDirectory;
pub use errors::{OpenpayError, OpenpayErrorCode};
pub use models::{AliasRecord, SendReceipt, SendRequest, WalletAddress, WalletDescriptor};
pub use resolver::WalletResolver;

/// Common result alias for OpenPay operations.
pub type Result<T> = std::result::Result<T, OpenpayError>;
