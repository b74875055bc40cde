//! VideoPlus webhook - voice agent function calls to transactional email.
//!
//! A voice agent posts `{ name, args }` to the webhook when it decides a
//! server-side function should run. The service normalizes the arguments,
//! runs one of a fixed set of behaviors and replies with a sentence for the
//! agent to speak back to the caller.
//!
//! ## Architecture
//!
//! ```text
//! POST /retell-webhook → FunctionCall → Dispatcher → Mailer (SMTP) → { result }
//! ```

pub mod call;
pub mod config;
pub mod error;
pub mod mail;
pub mod web;

// Re-export commonly used types
pub use call::{normalize_args, Args, Dispatcher, Function, FunctionCall};
pub use config::Config;
pub use error::WebhookError;
pub use mail::{MailError, Mailer, OutboundEmail, SmtpMailer, UnconfiguredMailer};
pub use web::{router, AppState};
