use serde_json::Value;
use std::time::{Duration, Instant};

use super::counterpart::{CounterpartApi, ExecuteResponse, GrantStart, HttpCounterpart};
use super::state::{FailureKind, SessionState};
use crate::config::CounterpartConfig;
use crate::{OpenpayError, Result};

/// One attempt at an interactive payment.
///
/// Steps must be called in order. A failed remote call ends the session;
/// start a new one to retry.
pub struct PaymentSession<C> {
    counterpart: C,
    state: SessionState,
    grant_expiry: Duration,
    grant_requested_at: Option<Instant>,
    wallet_info: Option<Value>,
    incoming: Option<Value>,
    quote: Option<Value>,
    grant: Option<GrantStart>,
    outgoing: Option<ExecuteResponse>,
}

impl PaymentSession<HttpCounterpart> {
    /// Session against the HTTP counterpart described by `config`.
    pub fn connect(config: &CounterpartConfig) -> Result<Self> {
        let grant_expiry = config.grant_expiry();
        Ok(Self::new(HttpCounterpart::new(config.clone())?, grant_expiry))
    }
}

impl<C: CounterpartApi> PaymentSession<C> {
    pub fn new(counterpart: C, grant_expiry: Duration) -> Self {
        Self {
            counterpart,
            state: SessionState::Initial,
            grant_expiry,
            grant_requested_at: None,
            wallet_info: None,
            incoming: None,
            quote: None,
            grant: None,
            outgoing: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn counterpart(&self) -> &C {
        &self.counterpart
    }

    pub fn wallet_info(&self) -> Option<&Value> {
        self.wallet_info.as_ref()
    }

    pub fn incoming_payment(&self) -> Option<&Value> {
        self.incoming.as_ref()
    }

    pub fn quote(&self) -> Option<&Value> {
        self.quote.as_ref()
    }

    /// Pending or confirmed grant, once started.
    pub fn grant(&self) -> Option<&GrantStart> {
        self.grant.as_ref()
    }

    /// Identifier of the outgoing payment, once executed.
    pub fn outgoing_id(&self) -> Option<&str> {
        self.outgoing.as_ref().and_then(|o| o.id.as_deref())
    }

    /// Self-discovery of the sending wallet.
    pub async fn discover(&mut self) -> Result<Value> {
        self.require("discover", SessionState::Initial)?;
        let result = self.counterpart.wallet_info().await;
        let info = self.advance(
            "discover",
            FailureKind::Discovery,
            SessionState::Discovered,
            result,
        )?;
        self.wallet_info = Some(info.clone());
        Ok(info)
    }

    /// Create the incoming payment on the receiving side.
    pub async fn create_incoming(&mut self) -> Result<Value> {
        self.require("create incoming payment", SessionState::Discovered)?;
        let result = self.counterpart.create_incoming().await;
        let incoming = self.advance(
            "create incoming payment",
            FailureKind::IncomingPayment,
            SessionState::IncomingCreated,
            result,
        )?;
        self.incoming = Some(incoming.clone());
        Ok(incoming)
    }

    pub async fn create_quote(&mut self) -> Result<Value> {
        self.require("create quote", SessionState::IncomingCreated)?;
        let result = self.counterpart.create_quote().await;
        let quote = self.advance(
            "create quote",
            FailureKind::Quote,
            SessionState::Quoted,
            result,
        )?;
        self.quote = Some(quote.clone());
        Ok(quote)
    }

    /// Request the interactive grant and return the approval redirect.
    ///
    /// Returns immediately; approval is signalled later through
    /// [`confirm_grant`](Self::confirm_grant).
    pub async fn start_grant(&mut self) -> Result<GrantStart> {
        self.require("start grant", SessionState::Quoted)?;
        let result = self.counterpart.start_grant().await;
        let grant = self.advance(
            "start grant",
            FailureKind::Grant,
            SessionState::GrantPending,
            result,
        )?;
        self.grant_requested_at = Some(Instant::now());
        self.grant = Some(grant.clone());
        Ok(grant)
    }

    /// Record that the payer approved the grant.
    ///
    /// When the counterpart issued a continue token, a supplied `token` must
    /// match it. Confirmation after the expiry bound expires the session.
    pub fn confirm_grant(&mut self, token: Option<&str>) -> Result<()> {
        self.require("confirm grant", SessionState::GrantPending)?;

        let expected = self.grant.as_ref().and_then(|g| g.continue_token.as_deref());
        if let (Some(expected), Some(token)) = (expected, token) {
            if expected != token {
                return Err(OpenpayError::validation(
                    "continue token does not match the pending grant",
                ));
            }
        }

        let waited = self
            .grant_requested_at
            .map(|at| at.elapsed())
            .unwrap_or_default();
        if waited >= self.grant_expiry {
            self.transition("confirm grant", SessionState::Expired);
            return Err(OpenpayError::GrantExpired {
                waited_secs: waited.as_secs(),
                limit_secs: self.grant_expiry.as_secs(),
            });
        }

        self.transition("confirm grant", SessionState::GrantConfirmed);
        Ok(())
    }

    /// Execute the outgoing payment. Requires a confirmed grant.
    pub async fn execute(&mut self) -> Result<ExecuteResponse> {
        match self.state {
            SessionState::GrantConfirmed => {}
            SessionState::Executed | SessionState::Failed(_) => {
                return Err(self.invalid("execute"));
            }
            _ => return Err(OpenpayError::GrantNotConfirmed),
        }

        let result = self.counterpart.execute().await;
        let outgoing = self.advance(
            "execute",
            FailureKind::Execution,
            SessionState::Executed,
            result,
        )?;
        self.outgoing = Some(outgoing.clone());
        Ok(outgoing)
    }

    /// Current status of the outgoing payment. Never changes the session.
    pub async fn poll_status(&self) -> Result<Value> {
        let id = match self.outgoing_id() {
            Some(id) if self.state.is_terminal() => id,
            _ => return Err(self.invalid("poll status")),
        };
        tracing::debug!(id, "polling outgoing payment status");
        self.counterpart.outgoing_status(id).await
    }

    fn require(&self, step: &'static str, expected: SessionState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(self.invalid(step))
        }
    }

    fn invalid(&self, step: &'static str) -> OpenpayError {
        OpenpayError::InvalidTransition {
            step,
            state: self.state.to_string(),
        }
    }

    fn advance<T>(
        &mut self,
        step: &'static str,
        kind: FailureKind,
        next: SessionState,
        result: Result<T>,
    ) -> Result<T> {
        match result {
            Ok(value) => {
                self.transition(step, next);
                Ok(value)
            }
            Err(err) => {
                let err = match FailureKind::of(&err) {
                    Some(k) if k == kind => err,
                    _ => kind.error(err.to_string()),
                };
                tracing::warn!(step, error = %err, "session step failed");
                self.transition(step, SessionState::Failed(kind));
                Err(err)
            }
        }
    }

    fn transition(&mut self, step: &'static str, to: SessionState) {
        tracing::info!(step, from = %self.state, to = %to, "session transition");
        self.state = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Scripted counterpart that counts calls and can fail one step.
    #[derive(Default, Clone)]
    struct MockCounterpart {
        calls: Arc<AtomicUsize>,
        fail_on: Option<FailureKind>,
        continue_token: Option<String>,
    }

    impl MockCounterpart {
        fn failing(kind: FailureKind) -> Self {
            Self {
                fail_on: Some(kind),
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn step(&self, kind: FailureKind) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on == Some(kind) {
                return Err(kind.error("HTTP 500: boom"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl CounterpartApi for MockCounterpart {
        async fn wallet_info(&self) -> Result<Value> {
            self.step(FailureKind::Discovery)?;
            Ok(json!({"assetCode": "USD", "assetScale": 2}))
        }

        async fn create_incoming(&self) -> Result<Value> {
            self.step(FailureKind::IncomingPayment)?;
            Ok(json!({"id": "incoming-1"}))
        }

        async fn create_quote(&self) -> Result<Value> {
            self.step(FailureKind::Quote)?;
            Ok(json!({"id": "quote-1"}))
        }

        async fn start_grant(&self) -> Result<GrantStart> {
            self.step(FailureKind::Grant)?;
            Ok(GrantStart {
                redirect: "https://auth.example.test/interact".to_string(),
                continue_token: self.continue_token.clone(),
                extra: Default::default(),
            })
        }

        async fn execute(&self) -> Result<ExecuteResponse> {
            self.step(FailureKind::Execution)?;
            Ok(ExecuteResponse {
                id: Some("outgoing-1".to_string()),
                extra: Default::default(),
            })
        }

        async fn outgoing_status(&self, id: &str) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!({"id": id, "failed": false}))
        }
    }

    const EXPIRY: Duration = Duration::from_secs(600);

    async fn pending_session(counterpart: MockCounterpart) -> PaymentSession<MockCounterpart> {
        let mut session = PaymentSession::new(counterpart, EXPIRY);
        session.discover().await.unwrap();
        session.create_incoming().await.unwrap();
        session.create_quote().await.unwrap();
        session.start_grant().await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_full_sequence() {
        let mut session = pending_session(MockCounterpart::default()).await;
        assert_eq!(session.state(), SessionState::GrantPending);
        assert_eq!(session.wallet_info().unwrap()["assetCode"], "USD");
        assert_eq!(session.quote().unwrap()["id"], "quote-1");
        assert!(session.grant().is_some());
        assert_eq!(session.incoming_payment().unwrap()["id"], "incoming-1");

        session.confirm_grant(None).unwrap();
        let outgoing = session.execute().await.unwrap();
        assert_eq!(outgoing.id.as_deref(), Some("outgoing-1"));
        assert_eq!(session.state(), SessionState::Executed);

        for _ in 0..2 {
            let status = session.poll_status().await.unwrap();
            assert_eq!(status["id"], "outgoing-1");
        }
        assert_eq!(session.state(), SessionState::Executed);
    }

    #[tokio::test]
    async fn test_out_of_order_step_is_rejected_without_call() {
        let counterpart = MockCounterpart::default();
        let mut session = PaymentSession::new(counterpart.clone(), EXPIRY);

        let err = session.create_quote().await.unwrap_err();
        assert!(matches!(err, OpenpayError::InvalidTransition { step: "create quote", .. }));
        assert_eq!(session.state(), SessionState::Initial);
        assert_eq!(counterpart.calls(), 0);
    }

    #[tokio::test]
    async fn test_execute_before_confirmation() {
        let counterpart = MockCounterpart::default();
        let mut session = PaymentSession::new(counterpart.clone(), EXPIRY);
        assert!(matches!(
            session.execute().await,
            Err(OpenpayError::GrantNotConfirmed)
        ));
        assert_eq!(session.state(), SessionState::Initial);

        let mut session = pending_session(counterpart.clone()).await;
        let calls = counterpart.calls();
        assert!(matches!(
            session.execute().await,
            Err(OpenpayError::GrantNotConfirmed)
        ));
        assert_eq!(session.state(), SessionState::GrantPending);
        assert_eq!(counterpart.calls(), calls);
    }

    #[tokio::test]
    async fn test_confirmation_after_expiry() {
        let mut session = PaymentSession::new(MockCounterpart::default(), Duration::ZERO);
        session.discover().await.unwrap();
        session.create_incoming().await.unwrap();
        session.create_quote().await.unwrap();
        session.start_grant().await.unwrap();

        let err = session.confirm_grant(None).unwrap_err();
        assert!(matches!(err, OpenpayError::GrantExpired { limit_secs: 0, .. }));
        assert_eq!(session.state(), SessionState::Expired);
        assert!(matches!(
            session.execute().await,
            Err(OpenpayError::GrantNotConfirmed)
        ));
        assert_eq!(session.state(), SessionState::Expired);
    }

    #[tokio::test]
    async fn test_failed_call_ends_session() {
        let counterpart = MockCounterpart::failing(FailureKind::Quote);
        let mut session = PaymentSession::new(counterpart.clone(), EXPIRY);
        session.discover().await.unwrap();
        session.create_incoming().await.unwrap();

        let err = session.create_quote().await.unwrap_err();
        assert!(matches!(err, OpenpayError::Quote(_)));
        assert_eq!(session.state(), SessionState::Failed(FailureKind::Quote));

        let calls = counterpart.calls();
        assert!(matches!(
            session.start_grant().await,
            Err(OpenpayError::InvalidTransition { .. })
        ));
        assert!(matches!(
            session.execute().await,
            Err(OpenpayError::InvalidTransition { .. })
        ));
        assert!(matches!(
            session.poll_status().await,
            Err(OpenpayError::InvalidTransition { .. })
        ));
        assert_eq!(counterpart.calls(), calls);
    }

    #[tokio::test]
    async fn test_continue_token_must_match() {
        let counterpart = MockCounterpart {
            continue_token: Some("tok-1".to_string()),
            ..MockCounterpart::default()
        };
        let mut session = pending_session(counterpart).await;

        let err = session.confirm_grant(Some("tok-2")).unwrap_err();
        assert!(matches!(err, OpenpayError::Validation(_)));
        assert_eq!(session.state(), SessionState::GrantPending);

        session.confirm_grant(Some("tok-1")).unwrap();
        assert_eq!(session.state(), SessionState::GrantConfirmed);
    }

    #[tokio::test]
    async fn test_poll_before_execute_is_rejected() {
        let session = pending_session(MockCounterpart::default()).await;
        assert!(matches!(
            session.poll_status().await,
            Err(OpenpayError::InvalidTransition { step: "poll status", .. })
        ));
    }
}
