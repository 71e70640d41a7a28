use serde::Deserialize;

use crate::domain::{OutgoingEmail, SentEmail};
use crate::transport::TransportError;

#[derive(Debug, Clone, Deserialize)]
struct SendEmailJsonResponse {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorJsonResponse {
    #[serde(default)]
    message: Option<String>,
}

pub fn encode_send_email_json(email: &OutgoingEmail) -> serde_json::Value {
    serde_json::json!({
        "from": email.from,
        "to": email.to.as_str(),
        "subject": email.subject,
        "html": email.html,
    })
}

pub fn decode_send_email_json_response(json: &str) -> Result<SentEmail, TransportError> {
    let parsed: SendEmailJsonResponse = serde_json::from_str(json)?;
    Ok(SentEmail { id: parsed.id })
}

/// Pull the human-readable `message` out of a Resend error body, if there is one.
pub fn decode_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorJsonResponse>(body)
        .ok()
        .and_then(|parsed| parsed.message)
        .filter(|message| !message.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use crate::domain::EmailAddress;

    use super::*;

    #[test]
    fn encode_uses_resend_field_names() {
        let email = OutgoingEmail {
            from: "Portfolio Contact <onboarding@resend.dev>".to_owned(),
            to: EmailAddress::parse("me@example.com").unwrap(),
            subject: "Hello".to_owned(),
            html: "<p>hi</p>".to_owned(),
        };
        assert_eq!(
            encode_send_email_json(&email),
            serde_json::json!({
                "from": "Portfolio Contact <onboarding@resend.dev>",
                "to": "me@example.com",
                "subject": "Hello",
                "html": "<p>hi</p>"
            })
        );
    }

    #[test]
    fn decode_success_and_error_bodies() {
        let sent = decode_send_email_json_response(r#"{"id":"49a3999c-0ce1"}"#).unwrap();
        assert_eq!(sent.id.as_deref(), Some("49a3999c-0ce1"));

        assert!(decode_send_email_json_response("not json").is_err());

        let body = r#"{"statusCode":422,"name":"validation_error","message":"Invalid `to` field."}"#;
        assert_eq!(
            decode_error_message(body).as_deref(),
            Some("Invalid `to` field.")
        );
        assert_eq!(decode_error_message("Bad Gateway"), None);
        assert_eq!(decode_error_message(r#"{"message":"  "}"#), None);
    }
}
