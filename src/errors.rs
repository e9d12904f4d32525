//! Typed error taxonomy for the sync clients.
//!
//! Three classes of failure matter to callers and are kept distinct:
//! - `Validation` — rejected client-side, before any network I/O
//! - `Request` — the backend answered with a non-2xx status; its body
//!   is surfaced verbatim
//! - `Stale` — a completion superseded by a newer request in the same
//!   slot; committed state is never touched by one of these

use thiserror::Error;

/// Errors from the control and ticket sync clients.
///
/// No variant is fatal: every failure path leaves the committed
/// channel state exactly as it was before the operation started.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Input failed a client-side gate; no request was issued.
    #[error("{0}")]
    Validation(String),

    /// The backend rejected the request. The message shown to users is
    /// the server body, unmodified.
    #[error("{body}")]
    Request { status: u16, body: String },

    /// The request never completed at the HTTP layer.
    #[error("request could not be delivered: {0}")]
    Transport(#[source] reqwest::Error),

    /// A newer request in the same slot finished first; this response
    /// was discarded without being applied.
    #[error("response superseded by a newer request in the same slot")]
    Stale,

    /// A control command for this channel is still in flight.
    #[error("a control command is already in flight for channel {0}")]
    CommandInFlight(String),

    #[error("JSON payload could not be encoded or decoded: {0}")]
    Json(#[from] serde_json::Error),
}

impl SyncError {
    pub fn validation(reason: impl Into<String>) -> Self {
        SyncError::Validation(reason.into())
    }

    /// True for errors a form should render as a local input problem
    /// rather than a failed request.
    pub fn is_validation(&self) -> bool {
        matches!(self, SyncError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_displays_server_body_verbatim() {
        let err = SyncError::Request {
            status: 403,
            body: "Not authorized to access card".to_string(),
        };
        assert_eq!(err.to_string(), "Not authorized to access card");
    }

    #[test]
    fn validation_error_is_distinguishable() {
        let err = SyncError::validation("comment must not be empty");
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "comment must not be empty");

        let err = SyncError::Request {
            status: 400,
            body: "bad".into(),
        };
        assert!(!err.is_validation());
    }

    #[test]
    fn command_in_flight_carries_channel() {
        let err = SyncError::CommandInFlight("chan-1".to_string());
        match &err {
            SyncError::CommandInFlight(id) => assert_eq!(id, "chan-1"),
            _ => panic!("Expected CommandInFlight variant"),
        }
        assert!(err.to_string().contains("chan-1"));
    }

    #[test]
    fn stale_is_matchable() {
        assert!(matches!(SyncError::Stale, SyncError::Stale));
        assert!(!SyncError::Stale.is_validation());
    }

    #[test]
    fn json_error_converts() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err: SyncError = parse_err.into();
        assert!(matches!(err, SyncError::Json(_)));
    }

    #[test]
    fn all_variants_implement_std_error() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        assert_std_error(&SyncError::Stale);
        assert_std_error(&SyncError::validation("x"));
    }
}
