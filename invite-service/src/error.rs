use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use splitwise_shared::{error::ServiceError, models::ErrorResponse};

/// Wrapper so shared errors can be returned straight from axum handlers.
#[derive(Debug)]
pub struct AppError(pub ServiceError);

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        AppError(err)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match &self.0 {
            ServiceError::Internal(msg) => log::error!("Returning internal error: {}", msg),
            other => log::warn!("Returning error response: status={}, {}", status, other),
        }

        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}
