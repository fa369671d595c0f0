//! Typed error hierarchy for the table store client.
//!
//! Every store operation returns `Result<_, StoreError>` so callers decide
//! per call whether to surface, retry, or fold the failure into board
//! state. Nothing is stashed in a global error slot.

use thiserror::Error;

/// Errors from the hosted table store (REST calls and realtime channel).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The request never produced a usable response (DNS, TLS, timeout,
    /// connection refused).
    #[error("Store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with a non-success status. `message` carries the
    /// response body when one was readable.
    #[error("Store rejected {operation} on {table}: {status} {message}")]
    Rejected {
        operation: &'static str,
        table: String,
        status: u16,
        message: String,
    },

    /// A row came back that does not decode into the expected shape.
    #[error("Malformed row from {table}: {source}")]
    MalformedRow {
        table: String,
        #[source]
        source: serde_json::Error,
    },

    /// The realtime channel could not be opened or died mid-stream.
    #[error("Realtime channel failed: {0}")]
    Channel(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_failure() -> serde_json::Error {
        serde_json::from_str::<crate::model::Task>("{}").unwrap_err()
    }

    #[test]
    fn rejected_carries_operation_and_table() {
        let err = StoreError::Rejected {
            operation: "insert",
            table: "tasks".to_string(),
            status: 401,
            message: "JWT expired".to_string(),
        };
        match &err {
            StoreError::Rejected { operation, status, .. } => {
                assert_eq!(*operation, "insert");
                assert_eq!(*status, 401);
            }
            _ => panic!("Expected Rejected variant"),
        }
        let text = err.to_string();
        assert!(text.contains("tasks"));
        assert!(text.contains("401"));
        assert!(text.contains("JWT expired"));
    }

    #[test]
    fn malformed_row_keeps_decode_source() {
        use std::error::Error as _;
        let err = StoreError::MalformedRow {
            table: "tasks".to_string(),
            source: decode_failure(),
        };
        assert!(err.to_string().contains("tasks"));
        assert!(err.source().is_some());
    }

    #[test]
    fn channel_error_is_matchable() {
        let err = StoreError::Channel("join refused".to_string());
        assert!(matches!(err, StoreError::Channel(_)));
        assert!(err.to_string().contains("join refused"));
    }

    #[test]
    fn variants_are_distinct() {
        let rejected = StoreError::Rejected {
            operation: "delete",
            table: "tasks".to_string(),
            status: 403,
            message: String::new(),
        };
        let channel = StoreError::Channel("closed".to_string());
        assert!(matches!(rejected, StoreError::Rejected { .. }));
        assert!(!matches!(channel, StoreError::Rejected { .. }));
    }

    #[test]
    fn store_error_implements_std_error_trait() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        let err = StoreError::Channel("x".to_string());
        assert_std_error(&err);
        let err = StoreError::MalformedRow {
            table: "tasks".to_string(),
            source: decode_failure(),
        };
        assert_std_error(&err);
    }
}
