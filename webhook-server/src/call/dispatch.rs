//! Function dispatch.
//!
//! Every recognized function produces a sentence for the voice agent to
//! speak. Email deliveries are awaited and their outcome inspected, but a
//! failed delivery only changes the wording of the reply, never the status
//! of the request.

use std::sync::Arc;

use tracing::{error, info, warn};

use super::args::{text, Args};
use super::function::Function;
use crate::error::WebhookError;
use crate::mail::{templates, MailError, Mailer, OutboundEmail};
use crate::Config;

pub const ORDER_RECEIVED: &str = "Order has been received and processed.";
pub const ORDER_RECEIVED_FALLBACK: &str = "Order has been received. We'll process it shortly.";
pub const EMAIL_REQUIRED: &str = "Email address is required to send the link.";
pub const LINK_SENT: &str = "I have sent the website link to your email.";
pub const TICKET_CREATED: &str = "I've created a support ticket. Our team has been notified.";
pub const TICKET_LOGGED: &str =
    "I've logged your support request. Our team will be in touch soon.";
pub const FAREWELL: &str = "Goodbye.";
pub const UNKNOWN_FUNCTION: &str = "Function execution failed.";

/// Outcome of one delivery attempt. Delivery identifier on success.
pub type Delivery = Result<String, MailError>;

/// Settings the behaviors need from configuration.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub admin_email: String,
    pub website_url: String,
}

impl From<&Config> for DispatchSettings {
    fn from(config: &Config) -> Self {
        Self {
            admin_email: config.admin_email.clone(),
            website_url: config.website_url.clone(),
        }
    }
}

/// Maps function names to behaviors.
#[derive(Clone)]
pub struct Dispatcher {
    mailer: Arc<dyn Mailer>,
    settings: DispatchSettings,
}

impl Dispatcher {
    pub fn new(mailer: Arc<dyn Mailer>, settings: DispatchSettings) -> Self {
        Self { mailer, settings }
    }

    /// Run the named function and return the reply for the caller.
    ///
    /// Only a missing or empty `name` is an error. Unknown names and failed
    /// deliveries still produce a reply.
    pub async fn dispatch(
        &self,
        name: Option<&str>,
        args: &Args,
    ) -> Result<String, WebhookError> {
        let name = match name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(WebhookError::MissingName),
        };

        let Some(function) = Function::from_name(name) else {
            warn!(function = %name, "webhook_unknown_function");
            return Ok(UNKNOWN_FUNCTION.to_string());
        };

        let reply = match function {
            Function::SubmitVideoplusOrder => self.submit_order(args).await,
            Function::SendWebsiteLink => self.send_website_link(args).await,
            Function::SendSupportTicket => self.send_support_ticket(args).await,
            Function::EndCall => FAREWELL.to_string(),
        };

        info!(function = %function, reply = %reply, "webhook_function_complete");

        Ok(reply)
    }

    async fn submit_order(&self, args: &Args) -> String {
        let customer = text(args, "ordering_party_email");

        let confirmation = match &customer {
            Some(to) => Some(
                self.deliver(
                    Function::SubmitVideoplusOrder,
                    templates::order_confirmation(to, args),
                )
                .await,
            ),
            None => None,
        };

        let alert = self
            .deliver(
                Function::SubmitVideoplusOrder,
                templates::order_alert(&self.settings.admin_email, args),
            )
            .await;

        let all_delivered = alert.is_ok() && confirmation.map_or(true, |c| c.is_ok());

        match (all_delivered, customer) {
            (true, Some(to)) => format!("I have emailed the order confirmation to {}.", to),
            (true, None) => ORDER_RECEIVED.to_string(),
            (false, _) => ORDER_RECEIVED_FALLBACK.to_string(),
        }
    }

    async fn send_website_link(&self, args: &Args) -> String {
        let Some(to) = text(args, "email") else {
            return EMAIL_REQUIRED.to_string();
        };

        let url = &self.settings.website_url;
        match self
            .deliver(Function::SendWebsiteLink, templates::website_link(&to, url))
            .await
        {
            Ok(_) => LINK_SENT.to_string(),
            Err(_) => format!(
                "I encountered an issue sending the email, but here's the link: {}",
                url
            ),
        }
    }

    async fn send_support_ticket(&self, args: &Args) -> String {
        let ticket = templates::support_ticket(&self.settings.admin_email, args);

        match self.deliver(Function::SendSupportTicket, ticket).await {
            Ok(_) => TICKET_CREATED.to_string(),
            Err(_) => TICKET_LOGGED.to_string(),
        }
    }

    /// Send one email and log the outcome. The caller decides what a failure
    /// means for the reply; it never propagates further.
    async fn deliver(&self, function: Function, email: OutboundEmail) -> Delivery {
        let to = email.to.clone();
        let outcome = self.mailer.send(email).await;

        match &outcome {
            Ok(message_id) => {
                info!(function = %function, to = %to, message_id = %message_id, "email_sent");
            }
            Err(e) => {
                error!(function = %function, to = %to, error = %e, "email_send_failed");
                if e.is_timeout() {
                    warn!(
                        to = %to,
                        hint = "host may be blocking outbound SMTP, consider an HTTP email API",
                        "smtp_timeout_hint"
                    );
                }
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::testing::RecordingMailer;
    use serde_json::{json, Value};

    const ADMIN: &str = "admin@example.com";

    fn dispatcher(mailer: Arc<RecordingMailer>) -> Dispatcher {
        Dispatcher::new(
            mailer,
            DispatchSettings {
                admin_email: ADMIN.to_string(),
                website_url: "https://myvponline.com".to_string(),
            },
        )
    }

    fn args(value: Value) -> Args {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn test_missing_name_is_rejected_without_sending() {
        let mailer = Arc::new(RecordingMailer::new());
        let dispatcher = dispatcher(mailer.clone());

        let none = dispatcher.dispatch(None, &Args::new()).await;
        let empty = dispatcher.dispatch(Some(""), &Args::new()).await;

        assert!(matches!(none, Err(WebhookError::MissingName)));
        assert!(matches!(empty, Err(WebhookError::MissingName)));
        assert!(mailer.attempts().is_empty());
    }

    #[tokio::test]
    async fn test_end_call_says_goodbye() {
        let mailer = Arc::new(RecordingMailer::new());

        let reply = dispatcher(mailer.clone())
            .dispatch(Some("end_call"), &args(json!({ "email": "a@example.com" })))
            .await
            .unwrap();

        assert_eq!(reply, FAREWELL);
        assert!(mailer.attempts().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_function_falls_back() {
        let mailer = Arc::new(RecordingMailer::new());

        let reply = dispatcher(mailer.clone())
            .dispatch(Some("transfer_call"), &Args::new())
            .await
            .unwrap();

        assert_eq!(reply, UNKNOWN_FUNCTION);
        assert!(mailer.attempts().is_empty());
    }

    #[tokio::test]
    async fn test_order_with_customer_email_sends_two() {
        let mailer = Arc::new(RecordingMailer::new());

        let reply = dispatcher(mailer.clone())
            .dispatch(
                Some("submit_videoplus_order"),
                &args(json!({
                    "ordering_party_email": "client@example.com",
                    "style_of_cause": "R v Smith"
                })),
            )
            .await
            .unwrap();

        assert_eq!(
            reply,
            "I have emailed the order confirmation to client@example.com."
        );

        let attempts = mailer.attempts();
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].to, "client@example.com");
        assert_eq!(attempts[0].subject, "Order Confirmation: R v Smith");
        assert_eq!(attempts[1].to, ADMIN);
        assert_eq!(attempts[1].subject, "NEW ORDER: R v Smith");
    }

    #[tokio::test]
    async fn test_order_without_customer_email_alerts_admin_only() {
        let mailer = Arc::new(RecordingMailer::new());

        let reply = dispatcher(mailer.clone())
            .dispatch(
                Some("submit_videoplus_order"),
                &args(json!({ "ordering_party_email": "" })),
            )
            .await
            .unwrap();

        assert_eq!(reply, ORDER_RECEIVED);
        let attempts = mailer.attempts();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].to, ADMIN);
    }

    #[tokio::test]
    async fn test_order_failure_still_replies() {
        let mailer = Arc::new(RecordingMailer::failing());

        let reply = dispatcher(mailer.clone())
            .dispatch(
                Some("submit_videoplus_order"),
                &args(json!({ "ordering_party_email": "client@example.com" })),
            )
            .await
            .unwrap();

        assert_eq!(reply, ORDER_RECEIVED_FALLBACK);
        assert_eq!(mailer.attempts().len(), 2);
    }

    #[tokio::test]
    async fn test_order_admin_alert_sent_even_if_confirmation_fails() {
        let mailer = Arc::new(RecordingMailer::failing_for("client@example.com"));

        let reply = dispatcher(mailer.clone())
            .dispatch(
                Some("submit_videoplus_order"),
                &args(json!({ "ordering_party_email": "client@example.com" })),
            )
            .await
            .unwrap();

        assert_eq!(reply, ORDER_RECEIVED_FALLBACK);
        let attempts = mailer.attempts();
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[1].to, ADMIN);
    }

    #[tokio::test]
    async fn test_website_link_requires_email() {
        let mailer = Arc::new(RecordingMailer::new());

        let reply = dispatcher(mailer.clone())
            .dispatch(Some("send_website_link"), &Args::new())
            .await
            .unwrap();

        assert_eq!(reply, EMAIL_REQUIRED);
        assert!(mailer.attempts().is_empty());
    }

    #[tokio::test]
    async fn test_website_link_sent() {
        let mailer = Arc::new(RecordingMailer::new());

        let reply = dispatcher(mailer.clone())
            .dispatch(
                Some("send_website_link"),
                &args(json!({ "email": "caller@example.com" })),
            )
            .await
            .unwrap();

        assert_eq!(reply, LINK_SENT);
        assert_eq!(mailer.attempts()[0].to, "caller@example.com");
    }

    #[tokio::test]
    async fn test_website_link_failure_includes_link() {
        let mailer = Arc::new(RecordingMailer::failing());

        let reply = dispatcher(mailer)
            .dispatch(
                Some("send_website_link"),
                &args(json!({ "email": "caller@example.com" })),
            )
            .await
            .unwrap();

        assert!(reply.contains("https://myvponline.com"));
    }

    #[tokio::test]
    async fn test_support_ticket_always_goes_to_admin() {
        let mailer = Arc::new(RecordingMailer::new());

        let reply = dispatcher(mailer.clone())
            .dispatch(Some("send_support_ticket"), &Args::new())
            .await
            .unwrap();

        assert_eq!(reply, TICKET_CREATED);
        let attempts = mailer.attempts();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].to, ADMIN);
        assert_eq!(attempts[0].subject, "URGENT SUPPORT TICKET: Unknown User");
    }

    #[tokio::test]
    async fn test_support_ticket_failure_still_confirms() {
        let mailer = Arc::new(RecordingMailer::failing());

        let reply = dispatcher(mailer)
            .dispatch(
                Some("send_support_ticket"),
                &args(json!({ "user_name": "Sam" })),
            )
            .await
            .unwrap();

        assert_eq!(reply, TICKET_LOGGED);
    }
}
