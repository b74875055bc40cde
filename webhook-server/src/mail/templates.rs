//! HTML bodies and subjects for every email the webhook sends.

use std::fmt::Write;

use super::types::OutboundEmail;
use crate::call::{text, Args};

const NOT_PROVIDED: &str = r#"<span style="color:#999;">(Not provided)</span>"#;

const ORDER_FALLBACK_TITLE: &str = "New Order";

/// Who an order email is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAudience {
    Customer,
    Admin,
}

/// Labelled fields of the order form, grouped by section.
const ORDER_SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Ordering Party",
        &[
            ("Name:", "ordering_party_name"),
            ("Email:", "ordering_party_email"),
            ("Phone:", "ordering_party_phone"),
            ("Relationship to Case:", "ordering_party_relationship"),
            ("Returning Customer:", "returning_customer"),
        ],
    ),
    (
        "⚖️ Case Information",
        &[
            ("Style of Cause (Case Name):", "style_of_cause"),
            ("File Number:", "court_file_number"),
            ("Location:", "court_location"),
            ("Court Type:", "court_type"),
            ("Judge / Justice:", "judge_name"),
            ("Courtroom Number:", "courtroom_number"),
            ("Proceeding Dates:", "proceeding_dates"),
        ],
    ),
    (
        "Case Characteristics",
        &[
            ("Is Appeal?", "is_appeal"),
            ("Appeal Type:", "appeal_type"),
            ("Is Legal Aid?", "is_legal_aid"),
        ],
    ),
    (
        "Transcript Request",
        &[
            ("Content Type:", "content_type"),
            ("Description (if excerpts):", "content_description"),
        ],
    ),
    (
        "Delivery & Options",
        &[
            ("Due Date:", "due_date"),
            ("Expedited Service:", "expedited_service"),
            ("Delivery Format:", "delivery_format"),
            ("Quote Required?", "quote_required"),
            ("Email Completed Form?", "email_completed_form"),
        ],
    ),
];

/// Confirmation sent to the ordering party.
pub fn order_confirmation(to: &str, args: &Args) -> OutboundEmail {
    OutboundEmail {
        to: to.to_string(),
        subject: format!("Order Confirmation: {}", order_title(args)),
        html: order_summary(args, OrderAudience::Customer),
    }
}

/// Alert sent to the admin for every order.
pub fn order_alert(admin_email: &str, args: &Args) -> OutboundEmail {
    OutboundEmail {
        to: admin_email.to_string(),
        subject: format!("NEW ORDER: {}", order_title(args)),
        html: order_summary(args, OrderAudience::Admin),
    }
}

/// The website link email.
pub fn website_link(to: &str, url: &str) -> OutboundEmail {
    OutboundEmail {
        to: to.to_string(),
        subject: "Here is the link you requested".to_string(),
        html: format!(
            concat!(
                "<p>Hi there,</p>",
                r#"<p>Here is the link to our website: <a href="{}">Click Here</a></p>"#
            ),
            html_escape(url)
        ),
    }
}

/// Support ticket forwarded to the admin.
pub fn support_ticket(admin_email: &str, args: &Args) -> OutboundEmail {
    let user_name = text(args, "user_name");
    let user_email = text(args, "user_email");
    let issue = text(args, "issue_details");

    let html = format!(
        "<h2>New Support Request</h2>\n\
         <p><strong>User:</strong> {} ({})</p>\n\
         <p><strong>Issue:</strong> {}</p>",
        html_escape(user_name.as_deref().unwrap_or("Unknown")),
        html_escape(user_email.as_deref().unwrap_or("No email")),
        html_escape(issue.as_deref().unwrap_or("No details provided")),
    );

    OutboundEmail {
        to: admin_email.to_string(),
        subject: format!(
            "URGENT SUPPORT TICKET: {}",
            user_name.as_deref().unwrap_or("Unknown User")
        ),
        html,
    }
}

fn order_title(args: &Args) -> String {
    text(args, "style_of_cause").unwrap_or_else(|| ORDER_FALLBACK_TITLE.to_string())
}

/// Render the full order form as an HTML table per section.
pub fn order_summary(args: &Args, audience: OrderAudience) -> String {
    let heading = match audience {
        OrderAudience::Customer => "Your Transcript Order",
        OrderAudience::Admin => "New Transcript Order",
    };

    let mut html = String::with_capacity(4096);
    html.push_str(
        r#"<div style="font-family: Arial, sans-serif; color: #333; line-height: 1.5;">"#,
    );
    let _ = write!(
        html,
        r#"<h2 style="background-color: #d35400; color: white; padding: 10px;">{}</h2>"#,
        heading
    );

    if audience == OrderAudience::Customer {
        html.push_str(
            "<p>Thank you for your order. Here is a copy of the details we received.</p>",
        );
    }

    for (title, rows) in ORDER_SECTIONS {
        let _ = write!(
            html,
            r#"<h3 style="border-bottom: 2px solid #ddd; padding-bottom: 5px;">{}</h3>"#,
            title
        );
        html.push_str(r#"<table style="width: 100%; margin-bottom: 15px;">"#);

        for (index, (label, key)) in rows.iter().enumerate() {
            let label_style = if index == 0 {
                r#" style="width: 180px;""#
            } else {
                ""
            };
            let _ = write!(
                html,
                "<tr><td{}><strong>{}</strong></td>{}</tr>",
                label_style,
                label,
                value_cell(args, key)
            );
        }

        html.push_str("</table>");
    }

    html.push_str(concat!(
        r#"<p style="font-size: 12px; color: #777; margin-top: 20px;">"#,
        "Generated automatically by Retell AI Webhook.</p>"
    ));
    html.push_str("</div>");
    html
}

fn value_cell(args: &Args, key: &str) -> String {
    let value = display_value(args, key);
    match key {
        "due_date" => format!("<td><strong>{}</strong></td>", value),
        "expedited_service" => {
            let color = if text(args, key).as_deref() == Some("yes") {
                "red"
            } else {
                "inherit"
            };
            format!(r#"<td style="color: {}; font-weight: bold;">{}</td>"#, color, value)
        }
        _ => format!("<td>{}</td>", value),
    }
}

fn display_value(args: &Args, key: &str) -> String {
    text(args, key)
        .map(|v| html_escape(&v))
        .unwrap_or_else(|| NOT_PROVIDED.to_string())
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
