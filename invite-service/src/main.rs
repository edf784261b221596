mod config;
mod dispatcher;
mod error;
mod handlers;
mod mail;
mod routes;
mod template;

use axum::{body::Body, extract::Request, response::Response, Router};
use http_body_util::BodyExt;
use lambda_http::{
    run, service_fn, Body as LambdaBody, Error, Request as LambdaRequest,
    Response as LambdaResponse,
};
use log::{debug, error, info, trace};
use std::net::SocketAddr;
use tower::ServiceExt;

use crate::config::InviteConfig;

const DEFAULT_LOCAL_PORT: u16 = 3001;

// The Lambda handler function
async fn function_handler(
    app: Router,
    event: LambdaRequest,
) -> Result<LambdaResponse<LambdaBody>, Error> {
    info!(
        "Received Lambda request: method={:?}, path={:?}",
        event.method(),
        event.uri().path()
    );

    let (parts, body) = event.into_parts();
    let body = match body {
        LambdaBody::Empty => Body::empty(),
        // Bodies carry recipient addresses, so only their size is logged
        LambdaBody::Text(text) => {
            debug!("Request body (text): {} bytes", text.len());
            Body::from(text)
        }
        LambdaBody::Binary(data) => {
            debug!("Request body (binary): {} bytes", data.len());
            Body::from(data)
        }
    };

    let http_request = Request::from_parts(parts, body);

    let response = match app.oneshot(http_request).await {
        Ok(response) => {
            info!("Received response from Axum: status={}", response.status());
            response
        }
        Err(err) => {
            error!("Error from Axum router: {:?}", err);
            return Err(Error::from(err.to_string()));
        }
    };

    response_to_lambda(response).await
}

// Convert the Axum response to a format suitable for Lambda
async fn response_to_lambda(response: Response) -> Result<LambdaResponse<LambdaBody>, Error> {
    let (parts, body) = response.into_parts();

    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            error!("Failed to read response body: {:?}", err);
            return Err(Error::from(err));
        }
    };

    let builder = parts
        .headers
        .iter()
        .fold(LambdaResponse::builder().status(parts.status), |builder, (name, value)| {
            trace!("Adding response header: {}={:?}", name, value);
            builder.header(name, value)
        });

    let lambda_response = if bytes.is_empty() {
        builder.body(LambdaBody::Empty)?
    } else {
        match String::from_utf8(bytes.to_vec()) {
            Ok(s) => builder.body(LambdaBody::Text(s))?,
            Err(_) => builder.body(LambdaBody::Binary(bytes.to_vec()))?,
        }
    };

    info!("Returning Lambda response: status={}", lambda_response.status());
    Ok(lambda_response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Logging initialized with env_logger");

    // Fail fast: a dispatcher without credentials can never deliver
    let config = InviteConfig::from_env()?;
    info!("Loaded mail configuration: {:?}", config);

    let app = routes::create_router(config)?;

    if let Ok(function_name) = std::env::var("AWS_LAMBDA_FUNCTION_NAME") {
        info!(
            "Running in AWS Lambda environment: {} (version: {})",
            function_name,
            std::env::var("AWS_LAMBDA_FUNCTION_VERSION").unwrap_or_else(|_| "unknown".into())
        );
        run(service_fn(|event| function_handler(app.clone(), event))).await?;
    } else {
        info!("Starting service in non-Lambda environment");
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_LOCAL_PORT);
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        info!("listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app.into_make_service()).await?;
    }

    info!("Service finished");
    Ok(())
}
