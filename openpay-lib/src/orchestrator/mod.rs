//! Interactive payment orchestration.
//!
//! A [`PaymentSession`] walks the Open Payments sequence against a
//! counterpart service: discovery, incoming payment, quote, interactive
//! grant, execution and status. The grant step returns a redirect URL and
//! the session waits for an explicit [`PaymentSession::confirm_grant`]
//! call instead of blocking.
//!
//! ```rust,ignore
//! use openpay_lib::config::CounterpartConfig;
//! use openpay_lib::orchestrator::PaymentSession;
//!
//! let mut session = PaymentSession::connect(&CounterpartConfig::default())?;
//! session.discover().await?;
//! session.create_incoming().await?;
//! session.create_quote().await?;
//! let grant = session.start_grant().await?;
//! println!("approve at {}", grant.redirect);
//! session.confirm_grant(None)?;
//! let outgoing = session.execute().await?;
//! ```

mod counterpart;
mod session;
mod state;

pub use counterpart::{CounterpartApi, ExecuteResponse, GrantStart, HttpCounterpart};
pub use session::PaymentSession;
pub use state::{FailureKind, SessionState};
