use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    Json,
};
use std::sync::Arc;

use splitwise_shared::{
    auth::CallerId,
    error::ServiceError,
    mail::MailTransport,
    models::{CallableBody, HealthResponse, InviteResult},
};

use crate::{dispatcher::InviteDispatcher, error::Result};

// POST /sendInviteEmail - Email an invitation to a friend of the caller
pub async fn send_invite_email<T: MailTransport + ?Sized>(
    State(dispatcher): State<Arc<InviteDispatcher<T>>>,
    Extension(caller): Extension<CallerId>,
    payload: std::result::Result<Json<CallableBody>, JsonRejection>,
) -> Result<Json<InviteResult>> {
    let Json(body) = payload.map_err(|rejection| {
        log::warn!("Rejected invite body from {}: {}", caller.0, rejection.body_text());
        ServiceError::InvalidArgument("Request body must be a JSON object".into())
    })?;

    log::info!("Invite requested by caller {}", caller.0);
    let result = dispatcher.send_invite(body.into_request()).await?;

    Ok(Json(result))
}

// GET /health - Liveness probe, no auth
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
