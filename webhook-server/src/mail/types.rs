//! Outbound message and delivery error types.

use std::time::Duration;

use async_trait::async_trait;
use lettre::address::AddressError;

/// A single HTML email to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// HTML body
    pub html: String,
}

/// Why a delivery did not happen.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid address {address:?}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: AddressError,
    },

    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("SMTP delivery timed out after {0:?}")]
    Timeout(Duration),

    #[error("SMTP credentials are not configured")]
    NotConfigured,
}

impl MailError {
    /// Timeouts usually mean the host blocks outbound SMTP.
    pub fn is_timeout(&self) -> bool {
        match self {
            MailError::Timeout(_) => true,
            MailError::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }
}

/// Outbound email collaborator.
///
/// Returns the delivery identifier (Message-ID) on success.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutboundEmail) -> Result<String, MailError>;
}

/// Mailer used when no SMTP credentials are configured. Every send fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredMailer;

#[async_trait]
impl Mailer for UnconfiguredMailer {
    async fn send(&self, _email: OutboundEmail) -> Result<String, MailError> {
        Err(MailError::NotConfigured)
    }
}
