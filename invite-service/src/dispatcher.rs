use std::sync::Arc;

use lettre::Address;
use log::{error, info, warn};

use splitwise_shared::{
    error::{Result, ServiceError},
    mail::{MailError, MailTransport, OutgoingEmail},
    models::{InviteRequest, InviteResult},
};

use crate::config::InviteConfig;
use crate::template::{InviteTemplate, APP_NAME};

pub const MISSING_PARAMETERS: &str = "Missing required parameters";
pub const SEND_FAILED: &str = "Failed to send email";

const MAX_EMAIL_LEN: usize = 254;
const MAX_NAME_LEN: usize = 100;
const MAX_LINK_LEN: usize = 2048;

/// Input that passed validation; names and email are trimmed.
#[derive(Debug, PartialEq, Eq)]
struct ValidInvite {
    recipient_email: String,
    recipient_name: String,
    sender_name: String,
    download_link: Option<String>,
}

fn required(field: &Option<String>) -> Result<String> {
    match field.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(ServiceError::InvalidArgument(MISSING_PARAMETERS.into())),
    }
}

fn check_len(value: &str, max: usize, field: &str) -> Result<()> {
    if value.chars().count() > max {
        return Err(ServiceError::InvalidArgument(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Masks the local part so logs never carry a full recipient address.
fn redact_email(address: &str) -> String {
    match address.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", first, domain)
        }
        None => "***".to_string(),
    }
}

// The link is embedded verbatim into an href attribute
fn valid_link(link: &str) -> bool {
    (link.starts_with("https://") || link.starts_with("http://"))
        && !link
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '"' | '<' | '>'))
}

fn validate(request: &InviteRequest) -> Result<ValidInvite> {
    let recipient_email = required(&request.recipient_email)?;
    let recipient_name = required(&request.recipient_name)?;
    let sender_name = required(&request.sender_name)?;

    check_len(&recipient_email, MAX_EMAIL_LEN, "recipientEmail")?;
    check_len(&recipient_name, MAX_NAME_LEN, "recipientName")?;
    check_len(&sender_name, MAX_NAME_LEN, "senderName")?;

    if recipient_email.parse::<Address>().is_err() {
        return Err(ServiceError::InvalidArgument(
            "Invalid recipient email address".into(),
        ));
    }

    // An empty link falls back to the default, same as an absent one
    let download_link = match request.app_download_link.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(link) => {
            check_len(link, MAX_LINK_LEN, "appDownloadLink")?;
            if !valid_link(link) {
                return Err(ServiceError::InvalidArgument(
                    "Invalid app download link".into(),
                ));
            }
            Some(link.to_string())
        }
    };

    Ok(ValidInvite {
        recipient_email,
        recipient_name,
        sender_name,
        download_link,
    })
}

/// Validates invite requests, renders the invite email and hands it to the
/// mail transport exactly once.
pub struct InviteDispatcher<T: MailTransport + ?Sized> {
    config: Arc<InviteConfig>,
    template: InviteTemplate,
    transport: Arc<T>,
}

impl<T: MailTransport + ?Sized> InviteDispatcher<T> {
    pub fn new(
        config: Arc<InviteConfig>,
        transport: Arc<T>,
    ) -> std::result::Result<Self, handlebars::TemplateError> {
        Ok(Self {
            config,
            template: InviteTemplate::new()?,
            transport,
        })
    }

    pub async fn send_invite(&self, request: InviteRequest) -> Result<InviteResult> {
        let invite = validate(&request).map_err(|err| {
            warn!("Rejected invite request: {}", err);
            err
        })?;

        let download_link = invite
            .download_link
            .as_deref()
            .unwrap_or(&self.config.default_download_link);

        let rendered = self
            .template
            .render(&invite.recipient_name, &invite.sender_name, download_link)
            .map_err(|err| {
                error!("Error rendering invite email: {}", err);
                ServiceError::Internal(SEND_FAILED.into())
            })?;

        let email = OutgoingEmail {
            from_name: APP_NAME.to_string(),
            from_address: self.config.email_user.clone(),
            to: invite.recipient_email,
            subject: rendered.subject,
            html_body: rendered.html_body,
            text_body: rendered.text_body,
        };

        let timeout = self.config.send_timeout;
        let outcome = match tokio::time::timeout(timeout, self.transport.send(&email)).await {
            Ok(result) => result,
            Err(_) => Err(MailError::Timeout(timeout)),
        };

        match outcome {
            Ok(()) => {
                info!("Invite email sent to {}", redact_email(&email.to));
                Ok(InviteResult::sent())
            }
            Err(err) => {
                error!("Error sending email to {}: {}", redact_email(&email.to), err);
                Err(ServiceError::Internal(SEND_FAILED.into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitwise_shared::models::DEFAULT_APP_DOWNLOAD_LINK;
    use splitwise_shared::test_utils::mock_mail_transport::MockMailTransport;
    use splitwise_shared::test_utils::test_logging::init_test_logging;
    use std::time::Duration;

    fn request(email: &str, recipient: &str, sender: &str) -> InviteRequest {
        InviteRequest {
            recipient_email: Some(email.to_string()),
            recipient_name: Some(recipient.to_string()),
            sender_name: Some(sender.to_string()),
            app_download_link: None,
        }
    }

    fn dispatcher(transport: Arc<MockMailTransport>) -> InviteDispatcher<MockMailTransport> {
        init_test_logging();
        let config = InviteConfig::new("invites@example.com", "app-password");
        InviteDispatcher::new(Arc::new(config), transport).unwrap()
    }

    #[tokio::test]
    async fn test_send_invite_default_link() {
        let transport = Arc::new(MockMailTransport::new());
        let dispatcher = dispatcher(transport.clone());

        let result = dispatcher
            .send_invite(request("a@b.com", "Ann", "Bob"))
            .await
            .unwrap();

        assert_eq!(
            result,
            InviteResult {
                success: true,
                message: "Email sent successfully".to_string()
            }
        );

        let sent = transport.sent_emails();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@b.com");
        assert_eq!(sent[0].subject, "Bob invited you to Splitwise Clone!");
        assert_eq!(sent[0].from_name, "Splitwise Clone");
        assert_eq!(sent[0].from_address, "invites@example.com");
        assert!(sent[0]
            .html_body
            .contains(&format!(r#"href="{}""#, DEFAULT_APP_DOWNLOAD_LINK)));
    }

    #[tokio::test]
    async fn test_send_invite_custom_link() {
        let transport = Arc::new(MockMailTransport::new());
        let dispatcher = dispatcher(transport.clone());

        let mut req = request("a@b.com", "Ann", "Bob");
        req.app_download_link = Some("https://example.com/get?ref=bob&src=email".into());
        dispatcher.send_invite(req).await.unwrap();

        let sent = transport.sent_emails();
        assert!(sent[0]
            .html_body
            .contains(r#"href="https://example.com/get?ref=bob&src=email""#));
    }

    #[tokio::test]
    async fn test_empty_link_uses_default() {
        let transport = Arc::new(MockMailTransport::new());
        let dispatcher = dispatcher(transport.clone());

        let mut req = request("a@b.com", "Ann", "Bob");
        req.app_download_link = Some(String::new());
        dispatcher.send_invite(req).await.unwrap();

        assert!(transport.sent_emails()[0]
            .html_body
            .contains(&format!(r#"href="{}""#, DEFAULT_APP_DOWNLOAD_LINK)));
    }

    #[tokio::test]
    async fn test_missing_fields_are_invalid_argument() {
        let transport = Arc::new(MockMailTransport::new());
        let dispatcher = dispatcher(transport.clone());

        let complete = request("a@b.com", "Ann", "Bob");
        let mut cases = Vec::new();
        for blank in [None, Some(String::new()), Some("   ".to_string())] {
            let mut r = complete.clone();
            r.recipient_email = blank.clone();
            cases.push(r);
            let mut r = complete.clone();
            r.recipient_name = blank.clone();
            cases.push(r);
            let mut r = complete.clone();
            r.sender_name = blank;
            cases.push(r);
        }

        for case in cases {
            let err = dispatcher.send_invite(case).await.unwrap_err();
            assert_eq!(
                err,
                ServiceError::InvalidArgument(MISSING_PARAMETERS.into())
            );
        }

        assert_eq!(transport.send_attempts(), 0);
    }

    #[tokio::test]
    async fn test_rejects_malformed_input() {
        let transport = Arc::new(MockMailTransport::new());
        let dispatcher = dispatcher(transport.clone());

        let bad_email = request("not-an-email", "Ann", "Bob");
        let long_name = request("a@b.com", &"A".repeat(MAX_NAME_LEN + 1), "Bob");
        let mut bad_link = request("a@b.com", "Ann", "Bob");
        bad_link.app_download_link = Some(r#"javascript:alert("x")"#.into());
        let mut quoted_link = request("a@b.com", "Ann", "Bob");
        quoted_link.app_download_link = Some(r#"https://x.com/" onclick="evil"#.into());

        for case in [bad_email, long_name, bad_link, quoted_link] {
            let err = dispatcher.send_invite(case).await.unwrap_err();
            assert_eq!(err.code(), "invalid-argument");
        }

        assert_eq!(transport.send_attempts(), 0);
    }

    #[test]
    fn test_redact_email() {
        assert_eq!(redact_email("ann.smith@example.com"), "a***@example.com");
        assert_eq!(redact_email("@example.com"), "***@example.com");
        assert_eq!(redact_email("no-at-sign"), "***");
    }

    #[tokio::test]
    async fn test_length_caps() {
        let transport = Arc::new(MockMailTransport::new());
        let dispatcher = dispatcher(transport.clone());

        // 249 + "@b.com" is 255 characters, one over the cap
        let long_email = format!("{}@b.com", "a".repeat(MAX_EMAIL_LEN - 5));
        let err = dispatcher
            .send_invite(request(&long_email, "Ann", "Bob"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ServiceError::InvalidArgument("recipientEmail must be at most 254 characters".into())
        );

        let mut long_link = request("a@b.com", "Ann", "Bob");
        let prefix = "https://example.com/";
        long_link.app_download_link =
            Some(format!("{}{}", prefix, "a".repeat(MAX_LINK_LEN + 1 - prefix.len())));
        let err = dispatcher.send_invite(long_link).await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::InvalidArgument("appDownloadLink must be at most 2048 characters".into())
        );

        let long_sender = request("a@b.com", "Ann", &"B".repeat(MAX_NAME_LEN + 1));
        let err = dispatcher.send_invite(long_sender).await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::InvalidArgument("senderName must be at most 100 characters".into())
        );

        assert_eq!(transport.send_attempts(), 0);
    }

    #[tokio::test]
    async fn test_values_at_the_caps_are_accepted() {
        let transport = Arc::new(MockMailTransport::new());
        let dispatcher = dispatcher(transport.clone());

        let recipient = "A".repeat(MAX_NAME_LEN);
        let sender = "B".repeat(MAX_NAME_LEN);
        let mut req = request("a@b.com", &recipient, &sender);
        let prefix = "https://example.com/";
        let link = format!("{}{}", prefix, "a".repeat(MAX_LINK_LEN - prefix.len()));
        req.app_download_link = Some(link.clone());

        dispatcher.send_invite(req).await.unwrap();

        let sent = transport.sent_emails();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, format!("{} invited you to Splitwise Clone!", sender));
        assert!(sent[0].html_body.contains(&format!("<p>Hi {},</p>", recipient)));
        assert!(sent[0].html_body.contains(&format!(r#"href="{}""#, link)));
    }

    #[tokio::test]
    async fn test_trims_fields() {
        let transport = Arc::new(MockMailTransport::new());
        let dispatcher = dispatcher(transport.clone());

        dispatcher
            .send_invite(request("  a@b.com ", " Ann ", " Bob"))
            .await
            .unwrap();

        let sent = transport.sent_emails();
        assert_eq!(sent[0].to, "a@b.com");
        assert_eq!(sent[0].subject, "Bob invited you to Splitwise Clone!");
    }

    #[tokio::test]
    async fn test_transport_failure_is_internal() {
        let transport = Arc::new(MockMailTransport::new_error());
        let dispatcher = dispatcher(transport.clone());

        let err = dispatcher
            .send_invite(request("a@b.com", "Ann", "Bob"))
            .await
            .unwrap_err();

        assert_eq!(err, ServiceError::Internal(SEND_FAILED.into()));
        assert!(!err.message().contains("535"));
        assert_eq!(transport.send_attempts(), 1);
    }

    #[tokio::test]
    async fn test_transport_timeout_is_internal() {
        init_test_logging();
        let transport = Arc::new(MockMailTransport::new_with_delay(Duration::from_secs(5)));
        let mut config = InviteConfig::new("invites@example.com", "app-password");
        config.send_timeout = Duration::from_millis(50);
        let dispatcher = InviteDispatcher::new(Arc::new(config), transport.clone()).unwrap();

        let err = dispatcher
            .send_invite(request("a@b.com", "Ann", "Bob"))
            .await
            .unwrap_err();

        assert_eq!(err, ServiceError::Internal(SEND_FAILED.into()));
        assert!(transport.sent_emails().is_empty());
    }
}
