//! SMTP delivery through lettre.
//!
//! The transport is built once at startup and shared by every request. Each
//! send is bounded twice: lettre's socket timeout covers the individual SMTP
//! commands, and an outer `tokio::time::timeout` caps the whole exchange so a
//! stalled relay can never keep a webhook request open.

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, info};

use super::types::{MailError, Mailer, OutboundEmail};
use crate::Config;

/// Mailer backed by an authenticated STARTTLS relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    timeout: Duration,
}

impl SmtpMailer {
    /// Build the relay transport from configuration.
    ///
    /// Fails with [`MailError::NotConfigured`] when credentials are missing,
    /// or with [`MailError::InvalidAddress`] when the sender is malformed.
    pub fn from_config(config: &Config) -> Result<Self, MailError> {
        let (username, password) = match (&config.smtp_username, &config.smtp_password) {
            (Some(user), Some(pass)) => (user.clone(), pass.clone()),
            _ => return Err(MailError::NotConfigured),
        };

        let from = sender_mailbox(&config.from_name, &config.from_address)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(Credentials::new(username, password))
            .timeout(Some(config.smtp_timeout))
            .build();

        info!(
            host = %config.smtp_host,
            port = config.smtp_port,
            from = %from,
            timeout_ms = config.smtp_timeout.as_millis() as u64,
            "smtp_mailer_created"
        );

        Ok(Self {
            transport,
            from,
            timeout: config.smtp_timeout,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutboundEmail) -> Result<String, MailError> {
        let (message, message_id) = compose(&self.from, &email)?;

        debug!(to = %email.to, subject = %email.subject, "smtp_sending");

        match tokio::time::timeout(self.timeout, self.transport.send(message)).await {
            Ok(Ok(response)) => {
                debug!(to = %email.to, code = %response.code(), "smtp_accepted");
                Ok(message_id)
            }
            Ok(Err(e)) => Err(MailError::Transport(e)),
            Err(_) => Err(MailError::Timeout(self.timeout)),
        }
    }
}

/// Parse the configured sender into a display-named mailbox.
fn sender_mailbox(name: &str, address: &str) -> Result<Mailbox, MailError> {
    let parsed = parse_mailbox(address)?;
    let name = if name.trim().is_empty() {
        None
    } else {
        Some(name.to_string())
    };
    Ok(Mailbox::new(name, parsed.email))
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|source| MailError::InvalidAddress {
            address: address.to_string(),
            source,
        })
}

/// Build the MIME message and its Message-ID.
fn compose(from: &Mailbox, email: &OutboundEmail) -> Result<(Message, String), MailError> {
    let to = parse_mailbox(&email.to)?;
    let message_id = generate_message_id(from.email.domain());

    let message = Message::builder()
        .from(from.clone())
        .to(to)
        .subject(email.subject.as_str())
        .message_id(Some(message_id.clone()))
        .header(ContentType::TEXT_HTML)
        .body(email.html.clone())?;

    Ok((message, message_id))
}

fn generate_message_id(domain: &str) -> String {
    let token: [u8; 16] = rand::random();
    format!("<{}@{}>", hex::encode(token), domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_email(to: &str) -> OutboundEmail {
        OutboundEmail {
            to: to.to_string(),
            subject: "Order Confirmation: R v Smith".to_string(),
            html: "<p>Thanks</p>".to_string(),
        }
    }

    #[test]
    fn test_sender_mailbox_has_display_name() {
        let from =
            sender_mailbox("VideoPlus Court Transcription", "orders@example.com").unwrap();

        assert_eq!(from.name.as_deref(), Some("VideoPlus Court Transcription"));
        assert_eq!(from.email.to_string(), "orders@example.com");
    }

    #[test]
    fn test_sender_mailbox_rejects_garbage() {
        let result = sender_mailbox("Name", "not an address");

        assert!(matches!(result, Err(MailError::InvalidAddress { .. })));
    }

    #[test]
    fn test_compose_html_message() {
        let from = sender_mailbox("VideoPlus", "orders@example.com").unwrap();

        let (message, message_id) = compose(&from, &sample_email("client@example.com")).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(message_id.starts_with('<'));
        assert!(message_id.ends_with("@example.com>"));
        assert!(raw.contains("To: client@example.com"));
        assert!(raw.contains("text/html"));
        assert!(raw.contains(&message_id));
    }

    #[test]
    fn test_compose_rejects_bad_recipient() {
        let from = sender_mailbox("VideoPlus", "orders@example.com").unwrap();

        let result = compose(&from, &sample_email("true"));

        assert!(matches!(result, Err(MailError::InvalidAddress { .. })));
    }

    #[test]
    fn test_message_ids_are_unique() {
        assert_ne!(
            generate_message_id("example.com"),
            generate_message_id("example.com")
        );
    }

    #[test]
    fn test_from_config_requires_credentials() {
        let config = Config::for_tests();

        assert!(matches!(
            SmtpMailer::from_config(&config),
            Err(MailError::NotConfigured)
        ));
    }
}
