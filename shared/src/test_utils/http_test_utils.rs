use axum::body::to_bytes;
use serde_json::Value;

/// Parse the JSON body of an Axum response for assertions.
pub async fn response_to_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read a plain-text body, used for the auth and fallback responses.
pub async fn response_to_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
