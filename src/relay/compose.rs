//! Builds the notification email for an accepted submission.

use chrono::{DateTime, Utc};

use crate::domain::{EmailAddress, OutgoingEmail};

pub const SENDER: &str = "Portfolio Contact <onboarding@resend.dev>";
pub const SUBJECT: &str = "New Portfolio Contact Form Submission";
const PHONE_NOT_PROVIDED: &str = "Not provided";

/// A relay request that passed the required-field and email checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub email: EmailAddress,
    pub phone: Option<String>,
    pub project_idea: String,
}

/// Digits only; falls back to the input when it has no digits at all.
pub fn format_phone(phone: Option<&str>) -> String {
    let Some(phone) = phone.filter(|value| !value.is_empty()) else {
        return PHONE_NOT_PROVIDED.to_owned();
    };
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        phone.to_owned()
    } else {
        digits
    }
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape user text and turn its line breaks into `<br>`.
fn to_html_paragraph(text: &str) -> String {
    escape_html(&text.replace("\r\n", "\n")).replace('\n', "<br>")
}

pub fn compose_email(
    submission: &ContactSubmission,
    recipient: EmailAddress,
    submitted_at: &str,
) -> OutgoingEmail {
    let html = format!(
        "<h2>New Contact Form Submission</h2>\n\
         <p><strong>From:</strong> {from}</p>\n\
         <p><strong>Phone:</strong> {phone}</p>\n\
         <p><strong>Project Idea:</strong></p>\n\
         <p>{idea}</p>\n\
         <p><strong>Submitted:</strong> {submitted_at}</p>",
        from = escape_html(submission.email.as_str()),
        phone = escape_html(&format_phone(submission.phone.as_deref())),
        idea = to_html_paragraph(&submission.project_idea),
    );

    OutgoingEmail {
        from: SENDER.to_owned(),
        to: recipient,
        subject: SUBJECT.to_owned(),
        html,
    }
}
