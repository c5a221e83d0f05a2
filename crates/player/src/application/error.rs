//! Service layer error types

use thiserror::Error;
use theatre_domain::DomainError;
use theatre_shared::ProtocolError;

use crate::ports::outbound::ApiError;

/// Errors that can occur in service operations. None of them is fatal; the
/// client reports them and keeps its prior state.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ServiceError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The backend refused the action.
    #[error("{0}")]
    Rejected(String),

    #[error("{0}")]
    Validation(String),

    /// Another action is still in flight.
    #[error("A request is already in progress")]
    Busy,

    #[error("No game loaded")]
    NoGameState,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Failures where the backend never saw the request.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Busy | Self::NoGameState | Self::Domain(_) | Self::Protocol(_)
        )
    }
}

/// Unpacks a transport envelope into a service result.
pub trait ParseResponse<T> {
    fn parse(self) -> Result<T, ServiceError>;
}

impl<T> ParseResponse<T> for crate::application::api::ApiResponse<T> {
    fn parse(self) -> Result<T, ServiceError> {
        self.into_result().map_err(ServiceError::from)
    }
}
