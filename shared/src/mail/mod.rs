use async_trait::async_trait;
use thiserror::Error;

/// A fully rendered email ready to be handed to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from_name: String,
    pub from_address: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Smtp(String),

    #[error("send timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// MailTransport trait defining the interface for mail delivery implementations
#[async_trait]
pub trait MailTransport: Send + Sync + 'static {
    /// Delivers a single email
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}
