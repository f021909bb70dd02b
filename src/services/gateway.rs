//! Remote collection seams.
//!
//! The controller talks to the remote user collection only through
//! [`RecordGateway`], and the sign-in screen only through [`AuthGateway`].
//! Both are implemented over HTTP in [`super::http_gateway`].

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Page, RecordId, RecordPatch};

/// Failure of any remote call.
///
/// Callers in the list controller treat every variant the same way; the
/// variants exist for logging and for the sign-in flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),
    /// The server rejected the credentials or token.
    #[error("unauthorized (status {0})")]
    Unauthorized(u16),
    /// Any other non-2xx response.
    #[error("unexpected status {0}")]
    Status(u16),
    /// The response body did not have the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Maps a non-success HTTP status to an error.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => GatewayError::Unauthorized(status),
            _ => GatewayError::Status(status),
        }
    }

    /// Returns whether the session should be considered expired.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, GatewayError::Unauthorized(_))
    }
}

/// Result type for gateway calls.
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Fetch/update/delete access to the remote user collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordGateway: Send + Sync {
    /// Fetches one page of records (1-based).
    async fn fetch_page(&self, page: u32) -> GatewayResult<Page>;

    /// Replaces the editable fields of a record.
    async fn update_record(&self, id: RecordId, patch: RecordPatch) -> GatewayResult<()>;

    /// Deletes a record.
    async fn delete_record(&self, id: RecordId) -> GatewayResult<()>;
}

/// Credential exchange.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchanges credentials for a bearer token.
    async fn login(&self, email: &str, password: &str) -> GatewayResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(GatewayError::from_status(401), GatewayError::Unauthorized(401));
        assert_eq!(GatewayError::from_status(403), GatewayError::Unauthorized(403));
        assert_eq!(GatewayError::from_status(500), GatewayError::Status(500));
        assert!(GatewayError::from_status(401).is_unauthorized());
        assert!(!GatewayError::Network("reset".into()).is_unauthorized());
    }

    #[test]
    fn error_messages() {
        assert_eq!(GatewayError::Status(404).to_string(), "unexpected status 404");
        assert_eq!(
            GatewayError::Network("connection refused".into()).to_string(),
            "network error: connection refused"
        );
    }
}
