//! Account notifications.
//!
//! Registration hands the welcome message to a [`Notifier`]. Delivery is
//! best-effort: the account service bounds each send with a timeout and only
//! logs failures. The default [`LogNotifier`] records that a message was sent
//! without writing its body anywhere.

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

/// Outbound message.
#[derive(Clone)]
pub struct Message {
    pub recipient_name: String,
    pub recipient_email: String,
    pub subject: String,
    pub body: String,
}

// Body holds the generated password.
impl std::fmt::Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Message")
            .field("recipient_name", &self.recipient_name)
            .field("recipient_email", &self.recipient_email)
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

/// Delivery abstraction used by the account service.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a message or return an error.
    async fn send(&self, message: &Message) -> Result<()>;
}

/// Sender that logs the envelope instead of delivering mail.
#[derive(Clone, Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &Message) -> Result<()> {
        info!(
            to_name = %message.recipient_name,
            to_email = %message.recipient_email,
            subject = %message.subject,
            "notification send stub"
        );
        Ok(())
    }
}

/// Welcome message carrying the generated password.
pub fn welcome_message(name: &str, email: &str, password: &str) -> Message {
    Message {
        recipient_name: name.to_string(),
        recipient_email: email.to_string(),
        subject: "Welcome to the blog!".to_string(),
        body: format!("Your password is <strong>{password}</strong>"),
    }
}
