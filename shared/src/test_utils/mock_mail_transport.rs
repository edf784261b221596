use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::mail::{MailError, MailTransport, OutgoingEmail};

/// Mock implementation of MailTransport for testing
pub struct MockMailTransport {
    sent: Mutex<Vec<OutgoingEmail>>,
    attempts: Mutex<usize>,
    error_mode: bool,
    delay: Option<Duration>,
}

impl MockMailTransport {
    /// Create a new MockMailTransport that accepts every message
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            attempts: Mutex::new(0),
            error_mode: false,
            delay: None,
        }
    }

    /// Create a new MockMailTransport in error mode where every send fails
    pub fn new_error() -> Self {
        Self {
            error_mode: true,
            ..Self::new()
        }
    }

    /// Create a new MockMailTransport that sleeps before accepting a message
    pub fn new_with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new()
        }
    }

    /// Messages accepted so far
    pub fn sent_emails(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of send calls, successful or not
    pub fn send_attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

impl Default for MockMailTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MailTransport for MockMailTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        *self.attempts.lock().unwrap() += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.error_mode {
            return Err(MailError::Smtp(
                "535 5.7.8 Username and Password not accepted".into(),
            ));
        }

        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}
