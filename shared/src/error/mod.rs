use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors surfaced to callers of the callable endpoints.
///
/// The payload of every variant is safe to return to the client; transport
/// and configuration causes are logged where they occur and never stored here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Callable error code, as understood by the mobile client.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::InvalidArgument(_) => "invalid-argument",
            ServiceError::Unauthenticated(_) => "unauthenticated",
            ServiceError::Internal(_) => "internal",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::InvalidArgument(_) => 400,
            ServiceError::Unauthenticated(_) => 401,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Message returned to the caller.
    pub fn message(&self) -> &str {
        match self {
            ServiceError::InvalidArgument(msg)
            | ServiceError::Unauthenticated(msg)
            | ServiceError::Internal(msg) => msg,
        }
    }
}
