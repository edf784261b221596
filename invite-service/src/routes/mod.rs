use axum::{
    extract::Request,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::InviteConfig;
use crate::dispatcher::InviteDispatcher;
use crate::handlers::invite_handlers::{health, send_invite_email};
use crate::mail::SmtpMailTransport;
use splitwise_shared::auth::auth_middleware;
use splitwise_shared::mail::MailTransport;

/// Creates a router that delivers through the configured SMTP relay
pub fn create_router(config: InviteConfig) -> Result<Router, handlebars::TemplateError> {
    log::info!(
        "Creating router with SMTP transport {}:{} ({:?})",
        config.smtp_host,
        config.smtp_port,
        config.smtp_tls
    );

    let transport = Arc::new(SmtpMailTransport::new(&config));

    // Check if we should remove the base path prefix
    let remove_base_path = std::env::var("REMOVE_BASE_PATH")
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false);

    let prefix = if remove_base_path { "" } else { "/Prod" };
    log::info!("Using API route prefix: {:?}", prefix);

    create_router_with_transport(config, transport, prefix)
}

/// Creates a router with a given transport implementation
pub fn create_router_with_transport<T>(
    config: InviteConfig,
    transport: Arc<T>,
    prefix: &str,
) -> Result<Router, handlebars::TemplateError>
where
    T: MailTransport + ?Sized,
{
    let dispatcher = Arc::new(InviteDispatcher::new(Arc::new(config), transport)?);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    async fn logging_middleware(
        req: Request,
        next: axum::middleware::Next,
    ) -> impl axum::response::IntoResponse {
        log::info!(
            "Router received request: method={}, uri={}",
            req.method(),
            req.uri()
        );
        next.run(req).await
    }

    let api_routes = Router::new()
        .route("/sendInviteEmail", post(send_invite_email::<T>))
        .route("/health", get(health))
        .route_layer(middleware::from_fn(auth_middleware))
        .with_state(dispatcher);

    let router = if prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(prefix, api_routes)
    };

    Ok(router
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
        .fallback(|req: Request| async move {
            log::warn!("No route matched for: {} {}", req.method(), req.uri());
            (
                axum::http::StatusCode::NOT_FOUND,
                "The requested resource was not found".to_string(),
            )
        }))
}
