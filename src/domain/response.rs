use serde::{Deserialize, Serialize};

/// JSON body returned by the relay endpoint.
///
/// Absent members are omitted on the wire, so an error body serializes to
/// exactly `{"error":"..."}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelayResponseBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl RelayResponseBody {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: Some(true),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// `success:false` body used when the provider call failed.
    pub fn failure(error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: Some(false),
            error: Some(error.into()),
            details,
            ..Self::default()
        }
    }

    pub fn with_details(mut self, details: Option<String>) -> Self {
        self.details = details;
        self
    }

    pub fn is_success(&self) -> bool {
        self.success == Some(true)
    }
}

/// Result of a reCAPTCHA `siteverify` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeVerification {
    pub success: bool,
    /// Only present for score-based (v3) keys.
    pub score: Option<f64>,
    pub action: Option<String>,
    pub hostname: Option<String>,
    pub error_codes: Vec<String>,
}

/// Resend acknowledgement for an accepted email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub id: Option<String>,
}
