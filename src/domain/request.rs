use serde::{Deserialize, Serialize};

use crate::domain::form::FormData;
use crate::domain::value::EmailAddress;

/// JSON payload accepted by the relay endpoint.
///
/// Every field is optional on the wire; presence and format are checked by the
/// relay so that a missing field yields a field error rather than a parse error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_idea: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recaptcha_token: Option<String>,
}

impl RelayRequest {
    /// Build the wire payload from the values held by the form.
    ///
    /// Privacy consent is a client-side gate and is not sent.
    pub fn from_form(data: &FormData) -> Self {
        Self {
            email: Some(data.email.clone()),
            phone: non_empty(&data.phone),
            project_idea: Some(data.project_idea.clone()),
            recaptcha_token: data.recaptcha_token.as_deref().and_then(non_empty),
        }
    }
}

/// Transactional email handed to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: EmailAddress,
    pub subject: String,
    pub html: String,
}

fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}
