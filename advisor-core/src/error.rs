//! Error taxonomy shared by catalog access and the orchestrator

use crate::model::Engine;

/// Where a failed operation was headed, used in user-facing messages
pub const CATALOG_ORIGIN: &str = "catalog";

/// Errors surfaced to the user
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdvisorError {
    /// Precondition not met; never reaches the network
    #[error("{0}")]
    Validation(String),
    /// Transport-level failure (unreachable, timeout, connection reset)
    #[error("{origin}: network error: {message}")]
    Network { origin: String, message: String },
    /// Non-2xx response or a payload that does not match the contract
    #[error("{origin}: server error (HTTP {status}): {detail}")]
    Server {
        origin: String,
        status: u16,
        detail: String,
    },
}

impl AdvisorError {
    pub fn no_hero_selected() -> Self {
        AdvisorError::Validation("no hero selected".to_string())
    }

    pub fn network(origin: impl Into<String>, message: impl Into<String>) -> Self {
        AdvisorError::Network {
            origin: origin.into(),
            message: message.into(),
        }
    }

    pub fn server(origin: impl Into<String>, status: u16, detail: impl Into<String>) -> Self {
        AdvisorError::Server {
            origin: origin.into(),
            status,
            detail: detail.into(),
        }
    }

    /// Only transport failures are worth retrying as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AdvisorError::Network { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            AdvisorError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Engine name as it appears in error origins
pub fn engine_origin(engine: Engine) -> String {
    format!("{} engine", engine.as_str())
}

/// A 2xx body that does not decode into the engine contract
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("missing required field: {0}")]
    MissingField(String),
}

impl PayloadError {
    /// Malformed payloads are server errors, never silently defaulted.
    pub fn into_server_error(self, engine: Engine, status: u16) -> AdvisorError {
        AdvisorError::server(engine_origin(engine), status, self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_only_network() {
        assert!(AdvisorError::network("catalog", "connection refused").is_retryable());
        assert!(!AdvisorError::server("catalog", 500, "boom").is_retryable());
        assert!(!AdvisorError::no_hero_selected().is_retryable());
    }

    #[test]
    fn test_messages_name_origin() {
        let err = AdvisorError::network(engine_origin(Engine::Ai), "timed out");
        assert_eq!(err.to_string(), "ai engine: network error: timed out");

        let err = AdvisorError::server(engine_origin(Engine::RuleBased), 404, "Hero not found");
        assert_eq!(
            err.to_string(),
            "rule-based engine: server error (HTTP 404): Hero not found"
        );
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_payload_error_becomes_server_error() {
        let err = PayloadError::MissingField("recommended_skills[0].score".into())
            .into_server_error(Engine::RuleBased, 200);
        match err {
            AdvisorError::Server { origin, status, detail } => {
                assert_eq!(origin, "rule-based engine");
                assert_eq!(status, 200);
                assert!(detail.contains("recommended_skills[0].score"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
