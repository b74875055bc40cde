//! Configuration module for environment variable parsing.
//!
//! All settings are read once at startup and handed to the dispatcher and
//! the mailer as an explicit value.

use std::env;
use std::fmt;
use std::time::Duration;

use tracing::warn;

/// Default sender display name for outbound mail.
pub const DEFAULT_FROM_NAME: &str = "VideoPlus Court Transcription";

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Address that receives order alerts and support tickets
    pub admin_email: String,

    /// Link sent by `send_website_link`
    pub website_url: String,

    /// Maximum accepted request body in bytes
    pub body_limit_bytes: usize,

    // =========================================================================
    // SMTP
    // =========================================================================

    /// SMTP relay host (STARTTLS)
    pub smtp_host: String,

    /// SMTP relay port
    pub smtp_port: u16,

    /// SMTP login, `None` disables delivery
    pub smtp_username: Option<String>,

    /// SMTP password
    pub smtp_password: Option<String>,

    /// Sender address
    pub from_address: String,

    /// Sender display name
    pub from_name: String,

    /// Bounded wait for a single delivery
    pub smtp_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let admin_email =
            env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@videoplus.example".to_string());

        let smtp_username =
            non_empty_var("SMTP_USERNAME").or_else(|| non_empty_var("GMAIL_USER"));

        let smtp_password =
            non_empty_var("SMTP_PASSWORD").or_else(|| non_empty_var("GMAIL_APP_PASSWORD"));

        let from_address = non_empty_var("MAIL_FROM")
            .or_else(|| smtp_username.clone())
            .unwrap_or_else(|| admin_email.clone());

        Config {
            port: parse_var("PORT", 8080),

            website_url: env::var("WEBSITE_URL")
                .unwrap_or_else(|_| "https://myvponline.com".to_string()),

            body_limit_bytes: parse_var("BODY_LIMIT_BYTES", 50 * 1024 * 1024),

            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),

            smtp_port: parse_var("SMTP_PORT", 587),

            from_name: env::var("MAIL_FROM_NAME")
                .unwrap_or_else(|_| DEFAULT_FROM_NAME.to_string()),

            smtp_timeout: Duration::from_millis(parse_var("SMTP_TIMEOUT_MS", 10_000)),

            admin_email,
            smtp_username,
            smtp_password,
            from_address,
        }
    }

    /// Whether enough SMTP settings are present to attempt delivery.
    pub fn smtp_configured(&self) -> bool {
        self.smtp_username.is_some() && self.smtp_password.is_some()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("admin_email", &self.admin_email)
            .field("website_url", &self.website_url)
            .field("body_limit_bytes", &self.body_limit_bytes)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &self.smtp_password.as_ref().map(|_| "<redacted>"))
            .field("from_address", &self.from_address)
            .field("from_name", &self.from_name)
            .field("smtp_timeout", &self.smtp_timeout)
            .finish()
    }
}

/// Parse a variable, falling back to `default` when unset or invalid.
fn parse_var<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + Copy + fmt::Display,
{
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(
                env_var = name,
                value = %raw,
                default = %default,
                "Invalid value, using default"
            );
            default
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
impl Config {
    /// Fixed configuration for unit tests, independent of the environment.
    pub(crate) fn for_tests() -> Self {
        Config {
            port: 8080,
            admin_email: "admin@example.com".to_string(),
            website_url: "https://myvponline.com".to_string(),
            body_limit_bytes: 1024 * 1024,
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
            from_address: "orders@example.com".to_string(),
            from_name: DEFAULT_FROM_NAME.to_string(),
            smtp_timeout: Duration::from_secs(10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_valid() {
        env::set_var("TEST_PARSE_PORT", "9090");
        let result: u16 = parse_var("TEST_PARSE_PORT", 8080);
        assert_eq!(result, 9090);
        env::remove_var("TEST_PARSE_PORT");
    }

    #[test]
    fn test_parse_var_invalid_uses_default() {
        env::set_var("TEST_PARSE_BAD", "eighty");
        let result: u16 = parse_var("TEST_PARSE_BAD", 8080);
        assert_eq!(result, 8080);
        env::remove_var("TEST_PARSE_BAD");
    }

    #[test]
    fn test_parse_var_default() {
        let result: u64 = parse_var("NONEXISTENT_VAR", 10_000);
        assert_eq!(result, 10_000);
    }

    #[test]
    fn test_non_empty_var_blank_is_none() {
        env::set_var("TEST_BLANK_VAR", "   ");
        assert_eq!(non_empty_var("TEST_BLANK_VAR"), None);
        env::remove_var("TEST_BLANK_VAR");
    }

    #[test]
    fn test_debug_redacts_password() {
        let mut config = Config::for_tests();
        config.smtp_username = Some("user@example.com".to_string());
        config.smtp_password = Some("hunter2".to_string());

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
        assert!(config.smtp_configured());
    }
}
