use std::fmt;
use std::time::Duration;

use splitwise_shared::models::DEFAULT_APP_DOWNLOAD_LINK;
use thiserror::Error;

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
/// Implicit-TLS submission port; other ports default to STARTTLS unless `SMTP_TLS` is set.
pub const DEFAULT_SMTP_PORT: u16 = 465;
pub const DEFAULT_SEND_TIMEOUT_SECS: u64 = 10;

/// How the SMTP session is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpTls {
    /// TLS from the first byte (SMTPS).
    Implicit,
    /// Plain connect, then a mandatory STARTTLS upgrade.
    StartTls,
    /// No encryption at all; only for local relays and tests.
    Plaintext,
}

impl SmtpTls {
    pub fn for_port(port: u16) -> Self {
        if port == DEFAULT_SMTP_PORT {
            SmtpTls::Implicit
        } else {
            SmtpTls::StartTls
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tls" | "implicit" => Some(SmtpTls::Implicit),
            "starttls" => Some(SmtpTls::StartTls),
            "none" => Some(SmtpTls::Plaintext),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required config: {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Process-wide mail settings, resolved once at startup and shared by every
/// invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct InviteConfig {
    pub email_user: String,
    pub email_password: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_tls: SmtpTls,
    pub send_timeout: Duration,
    pub default_download_link: String,
}

impl InviteConfig {
    pub fn new(email_user: impl Into<String>, email_password: impl Into<String>) -> Self {
        Self {
            email_user: email_user.into(),
            email_password: email_password.into(),
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            smtp_tls: SmtpTls::Implicit,
            send_timeout: Duration::from_secs(DEFAULT_SEND_TIMEOUT_SECS),
            default_download_link: DEFAULT_APP_DOWNLOAD_LINK.to_string(),
        }
    }

    /// Reads `EMAIL_USER`, `EMAIL_PASSWORD`, `SMTP_HOST`, `SMTP_PORT`,
    /// `SMTP_TLS`, `EMAIL_SEND_TIMEOUT_SECS` and `DEFAULT_APP_DOWNLOAD_LINK`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let email_user = get("EMAIL_USER").ok_or(ConfigError::Missing("EMAIL_USER"))?;
        let email_password =
            get("EMAIL_PASSWORD").ok_or(ConfigError::Missing("EMAIL_PASSWORD"))?;

        let mut config = Self::new(email_user, email_password);

        if let Some(host) = get("SMTP_HOST") {
            config.smtp_host = host;
        }

        if let Some(port) = get("SMTP_PORT") {
            config.smtp_port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "SMTP_PORT",
                value: port.clone(),
            })?;
        }

        config.smtp_tls = match get("SMTP_TLS") {
            Some(mode) => SmtpTls::parse(&mode).ok_or(ConfigError::Invalid {
                key: "SMTP_TLS",
                value: mode.clone(),
            })?,
            None => SmtpTls::for_port(config.smtp_port),
        };

        if let Some(secs) = get("EMAIL_SEND_TIMEOUT_SECS") {
            let parsed: u64 = secs.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "EMAIL_SEND_TIMEOUT_SECS",
                value: secs.clone(),
            })?;
            if parsed == 0 {
                return Err(ConfigError::Invalid {
                    key: "EMAIL_SEND_TIMEOUT_SECS",
                    value: secs,
                });
            }
            config.send_timeout = Duration::from_secs(parsed);
        }

        if let Some(link) = get("DEFAULT_APP_DOWNLOAD_LINK") {
            if !(link.starts_with("https://") || link.starts_with("http://")) {
                return Err(ConfigError::Invalid {
                    key: "DEFAULT_APP_DOWNLOAD_LINK",
                    value: link,
                });
            }
            config.default_download_link = link;
        }

        Ok(config)
    }
}

impl fmt::Debug for InviteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InviteConfig")
            .field("email_user", &self.email_user)
            .field("email_password", &"<redacted>")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_tls", &self.smtp_tls)
            .field("send_timeout", &self.send_timeout)
            .field("default_download_link", &self.default_download_link)
            .finish()
    }
}
