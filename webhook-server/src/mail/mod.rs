//! Outbound email: message types, the `Mailer` seam, SMTP delivery and
//! the HTML templates.

pub mod smtp;
pub mod templates;
pub mod types;

pub use smtp::SmtpMailer;
pub use types::{MailError, Mailer, OutboundEmail, UnconfiguredMailer};
