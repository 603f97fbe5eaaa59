use thiserror::Error;

use crate::entities::GraphqlError;
use crate::use_cases::Attempt;

/// Failures reported by an HTTP transport
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Network error: {message}")]
    Network {
        message: String,
        is_timeout: bool,
        is_connect: bool,
    },

    #[error("HTTP status {status} with body: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(String),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Network { is_timeout: true, .. })
    }
}

/// Errors that can occur while composing or executing an operation
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration conflict: {0}")]
    ConfigurationConflict(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Transport error on {attempt} attempt: {source}")]
    Transport {
        attempt: Attempt,
        #[source]
        source: TransportError,
    },

    #[error("GraphQL errors on {attempt} attempt: {}", join_messages(.errors))]
    Graphql {
        attempt: Attempt,
        errors: Vec<GraphqlError>,
    },

    #[error("Persisted query not found on {attempt} attempt")]
    PersistedQueryNotFound { attempt: Attempt },

    #[error("Persisted queries not supported by the server ({attempt} attempt)")]
    PersistedQueriesNotSupported { attempt: Attempt },

    #[error("Operation cancelled during {attempt} attempt")]
    Cancelled { attempt: Attempt },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// The attempt that produced the error, for errors raised on the wire
    pub fn attempt(&self) -> Option<Attempt> {
        match self {
            ClientError::Transport { attempt, .. }
            | ClientError::Graphql { attempt, .. }
            | ClientError::PersistedQueryNotFound { attempt }
            | ClientError::PersistedQueriesNotSupported { attempt }
            | ClientError::Cancelled { attempt } => Some(*attempt),
            _ => None,
        }
    }
}

fn join_messages(errors: &[GraphqlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display() {
        let error = ClientError::Transport {
            attempt: Attempt::Fallback,
            source: TransportError::HttpStatus {
                status: 502,
                body: "bad gateway".to_string(),
            },
        };
        assert_eq!(
            error.to_string(),
            "Transport error on fallback attempt: HTTP status 502 with body: bad gateway"
        );
        assert_eq!(error.attempt(), Some(Attempt::Fallback));
    }

    #[test]
    fn test_graphql_error_display_joins_messages() {
        let error = ClientError::Graphql {
            attempt: Attempt::Single,
            errors: vec![GraphqlError::new("first"), GraphqlError::new("second")],
        };
        assert_eq!(error.to_string(), "GraphQL errors on single attempt: first; second");
    }

    #[test]
    fn test_configuration_conflict_has_no_attempt() {
        let error = ClientError::ConfigurationConflict("nothing to send".to_string());
        assert_eq!(error.attempt(), None);
    }

    #[test]
    fn test_transport_error_is_timeout() {
        let error = TransportError::Network {
            message: "timed out".to_string(),
            is_timeout: true,
            is_connect: false,
        };
        assert!(error.is_timeout());
        assert!(!TransportError::Decode("x".to_string()).is_timeout());
    }
}
