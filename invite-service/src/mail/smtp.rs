use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use log::debug;

use splitwise_shared::mail::{MailError, MailTransport, OutgoingEmail};

use crate::config::{InviteConfig, SmtpTls};

/// Authenticated SMTP relay transport backed by lettre.
///
/// A new lettre transport is built for every message and the session is
/// closed with QUIT before `send` returns, so nothing outlives an invocation.
pub struct SmtpMailTransport {
    host: String,
    port: u16,
    tls: SmtpTls,
    credentials: Credentials,
    timeout: std::time::Duration,
}

impl SmtpMailTransport {
    pub fn new(config: &InviteConfig) -> Self {
        Self {
            host: config.smtp_host.clone(),
            port: config.smtp_port,
            tls: config.smtp_tls,
            credentials: Credentials::new(
                config.email_user.clone(),
                config.email_password.clone(),
            ),
            timeout: config.send_timeout,
        }
    }

    fn build_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let builder = match self.tls {
            SmtpTls::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)
                .map_err(|e| MailError::Smtp(e.to_string()))?,
            SmtpTls::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
                .map_err(|e| MailError::Smtp(e.to_string()))?,
            SmtpTls::Plaintext => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.host),
        };

        Ok(builder
            .port(self.port)
            .credentials(self.credentials.clone())
            .timeout(Some(self.timeout))
            .build())
    }
}

pub fn build_message(email: &OutgoingEmail) -> Result<Message, MailError> {
    let from_address: Address = email
        .from_address
        .parse()
        .map_err(|_| MailError::InvalidAddress(email.from_address.clone()))?;
    let to_address: Address = email
        .to
        .parse()
        .map_err(|_| MailError::InvalidAddress(email.to.clone()))?;

    Message::builder()
        .from(Mailbox::new(Some(email.from_name.clone()), from_address))
        .to(Mailbox::new(None, to_address))
        .subject(email.subject.clone())
        .multipart(MultiPart::alternative_plain_html(
            email.text_body.clone(),
            email.html_body.clone(),
        ))
        .map_err(|e| MailError::Build(e.to_string()))
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let message = build_message(email)?;
        let transport = self.build_transport()?;

        debug!("Sending email via {}:{}", self.host, self.port);
        let response = transport
            .send(message)
            .await
            .map_err(|e| MailError::Smtp(e.to_string()))?;
        debug!("SMTP relay accepted message: code={}", response.code());

        Ok(())
    }
}
