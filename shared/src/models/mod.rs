use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Play Store listing used when the caller does not supply a download link.
pub const DEFAULT_APP_DOWNLOAD_LINK: &str = "https://play.google.com/store";

pub const EMAIL_SENT_MESSAGE: &str = "Email sent successfully";

// Request DTOs

// All fields are optional at the wire level so that a missing field is
// reported as invalid-argument by validation rather than as a JSON rejection.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct InviteRequest {
    #[serde(rename = "recipientEmail", default)]
    pub recipient_email: Option<String>,
    #[serde(rename = "recipientName", default)]
    pub recipient_name: Option<String>,
    #[serde(rename = "senderName", default)]
    pub sender_name: Option<String>,
    #[serde(
        rename = "appDownloadLink",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub app_download_link: Option<String>,
}

/// Body accepted by the callable endpoint: either the bare request or the
/// `{"data": ...}` envelope sent by callable-function clients.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum CallableBody {
    Envelope { data: InviteRequest },
    Bare(InviteRequest),
}

impl CallableBody {
    pub fn into_request(self) -> InviteRequest {
        match self {
            CallableBody::Envelope { data } => data,
            CallableBody::Bare(request) => request,
        }
    }
}

// Response DTOs

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InviteResult {
    pub success: bool,
    pub message: String,
}

impl InviteResult {
    pub fn sent() -> Self {
        Self {
            success: true,
            message: EMAIL_SENT_MESSAGE.to_string(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

impl From<&ServiceError> for ErrorResponse {
    fn from(err: &ServiceError) -> Self {
        ErrorResponse {
            error: ErrorBody {
                code: err.code().to_string(),
                message: err.message().to_string(),
            },
        }
    }
}

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_body_parses() {
        let body: CallableBody = serde_json::from_value(json!({
            "recipientEmail": "a@b.com",
            "recipientName": "Ann",
            "senderName": "Bob"
        }))
        .unwrap();

        let request = body.into_request();
        assert_eq!(request.recipient_email.as_deref(), Some("a@b.com"));
        assert_eq!(request.recipient_name.as_deref(), Some("Ann"));
        assert_eq!(request.sender_name.as_deref(), Some("Bob"));
        assert!(request.app_download_link.is_none());
    }

    #[test]
    fn test_envelope_body_parses() {
        let body: CallableBody = serde_json::from_value(json!({
            "data": {
                "recipientEmail": "a@b.com",
                "recipientName": "Ann",
                "senderName": "Bob",
                "appDownloadLink": "https://example.com/app"
            }
        }))
        .unwrap();

        let request = body.into_request();
        assert_eq!(request.recipient_email.as_deref(), Some("a@b.com"));
        assert_eq!(
            request.app_download_link.as_deref(),
            Some("https://example.com/app")
        );
    }

    #[test]
    fn test_missing_fields_still_parse() {
        let body: CallableBody = serde_json::from_value(json!({})).unwrap();
        assert_eq!(body.into_request(), InviteRequest::default());
    }

    #[test]
    fn test_error_response_shape() {
        let err = ServiceError::InvalidArgument("Missing required parameters".into());
        let value = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(
            value,
            json!({
                "error": {
                    "code": "invalid-argument",
                    "message": "Missing required parameters"
                }
            })
        );
    }
}
