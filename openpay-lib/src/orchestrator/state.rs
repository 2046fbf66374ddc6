use std::fmt;

use crate::OpenpayError;

/// Step whose remote call failed and ended the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Discovery,
    IncomingPayment,
    Quote,
    Grant,
    Execution,
}

impl FailureKind {
    /// The failure kind an error belongs to, if any.
    pub fn of(err: &OpenpayError) -> Option<Self> {
        match err {
            OpenpayError::Discovery(_) => Some(Self::Discovery),
            OpenpayError::IncomingPayment(_) => Some(Self::IncomingPayment),
            OpenpayError::Quote(_) => Some(Self::Quote),
            OpenpayError::Grant(_) => Some(Self::Grant),
            OpenpayError::Execution(_) => Some(Self::Execution),
            _ => None,
        }
    }

    /// Build the error of this kind.
    pub fn error(self, reason: impl Into<String>) -> OpenpayError {
        let reason = reason.into();
        match self {
            Self::Discovery => OpenpayError::Discovery(reason),
            Self::IncomingPayment => OpenpayError::IncomingPayment(reason),
            Self::Quote => OpenpayError::Quote(reason),
            Self::Grant => OpenpayError::Grant(reason),
            Self::Execution => OpenpayError::Execution(reason),
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Discovery => "discovery",
            Self::IncomingPayment => "incoming payment",
            Self::Quote => "quote",
            Self::Grant => "grant",
            Self::Execution => "execution",
        };
        f.write_str(name)
    }
}

/// Lifecycle of a payment session.
///
/// ```text
/// Initial -> Discovered -> IncomingCreated -> Quoted -> GrantPending
///         -> GrantConfirmed -> Executed
/// GrantPending -> Expired
/// any non-terminal -> Failed(kind)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Initial,
    Discovered,
    IncomingCreated,
    Quoted,
    GrantPending,
    GrantConfirmed,
    Executed,
    Expired,
    Failed(FailureKind),
}

impl SessionState {
    /// True once no further step can move the session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Executed | Self::Expired | Self::Failed(_))
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initial => f.write_str("Initial"),
            Self::Discovered => f.write_str("Discovered"),
            Self::IncomingCreated => f.write_str("IncomingCreated"),
            Self::Quoted => f.write_str("Quoted"),
            Self::GrantPending => f.write_str("GrantPending"),
            Self::GrantConfirmed => f.write_str("GrantConfirmed"),
            Self::Executed => f.write_str("Executed"),
            Self::Expired => f.write_str("Expired"),
            Self::Failed(kind) => write!(f, "Failed({})", kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!SessionState::Initial.is_terminal());
        assert!(!SessionState::GrantPending.is_terminal());
        assert!(SessionState::Executed.is_terminal());
        assert!(SessionState::Expired.is_terminal());
        assert!(SessionState::Failed(FailureKind::Quote).is_terminal());
    }

    #[test]
    fn test_failure_kind_roundtrip() {
        for kind in [
            FailureKind::Discovery,
            FailureKind::IncomingPayment,
            FailureKind::Quote,
            FailureKind::Grant,
            FailureKind::Execution,
        ] {
            assert_eq!(FailureKind::of(&kind.error("boom")), Some(kind));
        }
        assert_eq!(FailureKind::of(&OpenpayError::GrantNotConfirmed), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            SessionState::Failed(FailureKind::IncomingPayment).to_string(),
            "Failed(incoming payment)"
        );
    }
}
