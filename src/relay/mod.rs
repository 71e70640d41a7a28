//! Submission relay: the stateless request handler behind the contact form.
//!
//! One invocation runs the full pipeline: method check, JSON parse, required
//! fields, email format, optional reCAPTCHA verification, then delivery through
//! Resend (or a logged no-op in development/test when no API key is set).

use std::net::IpAddr;
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::client::{
    HttpTransport, ProviderError, RecaptchaVerifier, ReqwestTransport, ResendMailer,
};
use crate::config::{Environment, RelayConfig};
use crate::domain::{
    ChallengeToken, EmailAddress, RelayRequest, RelayResponseBody, SentEmail, ValidationError,
};

mod compose;
pub mod http;

pub use compose::{ContactSubmission, SENDER, SUBJECT, compose_email, format_phone};

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const ACCEPTED_METHOD: &str = "POST";

pub const MESSAGE_SENT: &str = "Email sent successfully";
pub const MESSAGE_DEMO: &str = "Email would be sent (demo mode)";

/// Incoming invocation as handed over by the hosting platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayHttpRequest {
    pub method: String,
    pub body: Option<String>,
    pub remote_ip: Option<IpAddr>,
}

impl RelayHttpRequest {
    pub fn new(method: impl Into<String>, body: Option<String>) -> Self {
        Self {
            method: method.into(),
            body,
            remote_ip: None,
        }
    }

    pub fn post(body: impl Into<String>) -> Self {
        Self::new(ACCEPTED_METHOD, Some(body.into()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelayHttpResponse {
    pub status: u16,
    pub body: RelayResponseBody,
}

impl RelayHttpResponse {
    fn ok(body: RelayResponseBody) -> Self {
        Self { status: 200, body }
    }

    /// Every relay response is JSON.
    pub fn content_type(&self) -> &'static str {
        CONTENT_TYPE_JSON
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.body)
    }
}

/// Why the relay refused or failed a submission.
///
/// The `Display` text is the public `error` string of the response body.
#[derive(Debug, thiserror::Error)]
pub enum RelayRejection {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Invalid JSON in request body")]
    InvalidJson(#[source] Option<serde_json::Error>),

    #[error("Missing required fields: email and projectIdea")]
    MissingFields,

    #[error("Invalid email format")]
    InvalidEmail(#[source] ValidationError),

    #[error("reCAPTCHA token is required")]
    MissingChallengeToken,

    #[error("reCAPTCHA verification failed")]
    ChallengeFailed(#[source] ProviderError),

    #[error("Email service not configured")]
    NotConfigured,

    #[error("Failed to send email")]
    SendFailed(#[source] ProviderError),
}

impl RelayRejection {
    pub fn status(&self) -> u16 {
        match self {
            Self::MethodNotAllowed => 405,
            Self::InvalidJson(_)
            | Self::MissingFields
            | Self::InvalidEmail(_)
            | Self::MissingChallengeToken
            | Self::ChallengeFailed(_) => 400,
            Self::NotConfigured | Self::SendFailed(_) => 500,
        }
    }

    /// Render the response; provider detail is only attached where the
    /// environment allows it.
    pub fn into_response(self, environment: &Environment) -> RelayHttpResponse {
        let status = self.status();
        let details = |err: &ProviderError| {
            environment
                .exposes_details()
                .then(|| err.to_string())
        };
        let body = match &self {
            Self::ChallengeFailed(err) => {
                RelayResponseBody::error(self.to_string()).with_details(details(err))
            }
            Self::SendFailed(err) => RelayResponseBody::failure(self.to_string(), details(err)),
            _ => RelayResponseBody::error(self.to_string()),
        };
        RelayHttpResponse { status, body }
    }
}

enum Delivery {
    Sent(SentEmail),
    Demo,
}

#[derive(Clone)]
/// Stateless contact submission handler.
///
/// Safe to share between concurrent invocations; it holds configuration and
/// provider clients only.
pub struct SubmissionRelay {
    config: RelayConfig,
    verifier: Option<RecaptchaVerifier>,
    mailer: Option<ResendMailer>,
}

impl SubmissionRelay {
    /// Create a relay that talks to the real providers.
    pub fn new(config: RelayConfig) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    /// Create a relay whose provider clients share `http`.
    pub fn with_transport(config: RelayConfig, http: Arc<dyn HttpTransport>) -> Self {
        let verifier = config.recaptcha_secret.clone().map(|secret| {
            RecaptchaVerifier::with_transport(secret, http.clone()).threshold(config.score_threshold)
        });
        let mailer = config
            .resend_api_key
            .clone()
            .map(|key| ResendMailer::with_transport(key, http.clone()));
        Self {
            config,
            verifier,
            mailer,
        }
    }

    /// Override the reCAPTCHA `siteverify` URL.
    pub fn siteverify_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.verifier = self.verifier.map(|verifier| verifier.endpoint(endpoint));
        self
    }

    /// Override the Resend `emails` URL.
    pub fn resend_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.mailer = self.mailer.map(|mailer| mailer.endpoint(endpoint));
        self
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Handle one invocation. Never fails: every outcome is a JSON response.
    pub async fn handle(&self, request: RelayHttpRequest) -> RelayHttpResponse {
        match self.process(request).await {
            Ok(Delivery::Sent(sent)) => {
                info!(id = ?sent.id, "contact email sent");
                RelayHttpResponse::ok(RelayResponseBody::success(MESSAGE_SENT))
            }
            Ok(Delivery::Demo) => RelayHttpResponse::ok(RelayResponseBody::success(MESSAGE_DEMO)),
            Err(rejection) => {
                match &rejection {
                    RelayRejection::SendFailed(err) => {
                        error!(
                            error = %err,
                            api_key_set = self.config.resend_api_key.is_some(),
                            "email sending failed"
                        );
                    }
                    RelayRejection::ChallengeFailed(err) => {
                        warn!(error = %err, "reCAPTCHA verification error");
                    }
                    RelayRejection::NotConfigured => {
                        error!(environment = ?self.config.environment, "email service not configured");
                    }
                    other => warn!(status = other.status(), reason = %other, "submission rejected"),
                }
                rejection.into_response(&self.config.environment)
            }
        }
    }

    async fn process(&self, request: RelayHttpRequest) -> Result<Delivery, RelayRejection> {
        if request.method != ACCEPTED_METHOD {
            return Err(RelayRejection::MethodNotAllowed);
        }

        let payload = parse_body(request.body.as_deref())?;
        let submission = check_fields(&payload)?;

        if let Some(verifier) = &self.verifier {
            let token = payload
                .recaptcha_token
                .as_deref()
                .and_then(|value| ChallengeToken::new(value).ok())
                .ok_or(RelayRejection::MissingChallengeToken)?;
            verifier
                .verify(&token, request.remote_ip)
                .await
                .map_err(RelayRejection::ChallengeFailed)?;
        }

        let submitted_at = compose::format_timestamp(Utc::now());

        let Some(mailer) = &self.mailer else {
            warn!("Resend not fully configured, API key missing");
            if !self.config.environment.allows_demo_relay() {
                return Err(RelayRejection::NotConfigured);
            }
            info!(
                email = %submission.email,
                phone = %format_phone(submission.phone.as_deref()),
                project_idea = %submission.project_idea,
                submitted_at = %submitted_at,
                "demo mode, email not sent"
            );
            return Ok(Delivery::Demo);
        };

        let recipient = self.config.contact_email.clone().ok_or_else(|| {
            RelayRejection::SendFailed(ProviderError::Validation(ValidationError::Empty {
                field: "to",
            }))
        })?;

        let email = compose_email(&submission, recipient, &submitted_at);
        let sent = mailer
            .send(&email)
            .await
            .map_err(RelayRejection::SendFailed)?;
        Ok(Delivery::Sent(sent))
    }
}

/// Parse the body into a request; the body must be a JSON object whose known
/// members are strings (or null).
fn parse_body(body: Option<&str>) -> Result<RelayRequest, RelayRejection> {
    let body = body.ok_or(RelayRejection::InvalidJson(None))?;
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|err| RelayRejection::InvalidJson(Some(err)))?;
    if !value.is_object() {
        return Err(RelayRejection::InvalidJson(None));
    }
    RelayRequest::deserialize(value).map_err(|err| RelayRejection::InvalidJson(Some(err)))
}

fn check_fields(payload: &RelayRequest) -> Result<ContactSubmission, RelayRejection> {
    let email = payload.email.as_deref().filter(|value| !value.is_empty());
    let project_idea = payload.project_idea.as_deref().filter(|value| !value.is_empty());
    let (Some(email), Some(project_idea)) = (email, project_idea) else {
        return Err(RelayRejection::MissingFields);
    };

    let email = EmailAddress::parse(email).map_err(RelayRejection::InvalidEmail)?;

    Ok(ContactSubmission {
        email,
        phone: payload.phone.clone(),
        project_idea: project_idea.to_owned(),
    })
}
