//! Client layer: HTTP plumbing and the provider clients built on it.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::ValidationError;

mod recaptcha;
mod resend;

#[cfg(test)]
pub(crate) mod fake;

pub use recaptcha::{DEFAULT_SITEVERIFY_ENDPOINT, RecaptchaVerifier};
pub use resend::{DEFAULT_RESEND_ENDPOINT, ResendMailer};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
pub type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// Body for error reporting; `None` when blank.
    fn into_error_body(self) -> Option<String> {
        if self.body.trim().is_empty() {
            None
        } else {
            Some(self.body)
        }
    }
}

/// Outbound HTTP used by every client in this crate.
///
/// The production implementation is [`ReqwestTransport`]; tests substitute a fake.
pub trait HttpTransport: Send + Sync {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, BoxError>>;

    fn post_json<'a>(
        &'a self,
        url: &'a str,
        bearer_token: Option<&'a str>,
        body: serde_json::Value,
    ) -> BoxFuture<'a, Result<HttpResponse, BoxError>>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::default()
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for ReqwestTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, BoxError>> {
        Box::pin(async move {
            let response = self.client.post(url).form(&params).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }

    fn post_json<'a>(
        &'a self,
        url: &'a str,
        bearer_token: Option<&'a str>,
        body: serde_json::Value,
    ) -> BoxFuture<'a, Result<HttpResponse, BoxError>> {
        Box::pin(async move {
            let mut request = self.client.post(url).json(&body);
            if let Some(token) = bearer_token {
                request = request.bearer_auth(token);
            }
            let response = request.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, Clone, Default)]
/// Builder for [`ReqwestTransport`].
///
/// Use this when you need a request timeout or a custom user-agent.
pub struct ReqwestTransportBuilder {
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ReqwestTransportBuilder {
    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<ReqwestTransport, ProviderError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| ProviderError::Transport(Box::new(err)))?;
        Ok(ReqwestTransport { client })
    }

    /// Build and wrap for sharing between clients.
    pub fn build_shared(self) -> Result<Arc<dyn HttpTransport>, ProviderError> {
        Ok(Arc::new(self.build()?))
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by the provider clients.
///
/// This error preserves:
/// - HTTP-level failures (non-2xx status or transport failures),
/// - provider-level rejections,
/// - validation/parse failures.
pub enum ProviderError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// Non-successful HTTP status code returned by the provider.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// The provider answered with an error message.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// reCAPTCHA reported `success: false`.
    #[error("reCAPTCHA verification failed: {}", error_codes.join(", "))]
    ChallengeRejected { error_codes: Vec<String> },

    /// reCAPTCHA v3 score is under the configured threshold.
    #[error("reCAPTCHA score too low - possible bot activity ({score} < {threshold})")]
    ScoreTooLow { score: f64, threshold: f64 },

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] BoxError),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl ProviderError {
    fn from_status(response: HttpResponse) -> Self {
        Self::HttpStatus {
            status: response.status,
            body: response.into_error_body(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_success_range() {
        let ok = HttpResponse {
            status: 204,
            body: String::new(),
        };
        assert!(ok.is_success());

        let redirect = HttpResponse {
            status: 302,
            body: String::new(),
        };
        assert!(!redirect.is_success());
    }

    #[test]
    fn blank_error_bodies_become_none() {
        let err = ProviderError::from_status(HttpResponse {
            status: 503,
            body: "  ".to_owned(),
        });
        assert!(matches!(
            err,
            ProviderError::HttpStatus {
                status: 503,
                body: None
            }
        ));
    }

    #[test]
    fn error_messages_are_human_readable() {
        let err = ProviderError::ChallengeRejected {
            error_codes: vec!["invalid-input-response".to_owned(), "timeout".to_owned()],
        };
        assert_eq!(
            err.to_string(),
            "reCAPTCHA verification failed: invalid-input-response, timeout"
        );

        let err = ProviderError::ScoreTooLow {
            score: 0.1,
            threshold: 0.5,
        };
        assert!(err.to_string().starts_with("reCAPTCHA score too low"));
    }

    #[test]
    fn builder_applies_options() {
        let transport = ReqwestTransport::builder()
            .timeout(Duration::from_secs(5))
            .user_agent("contact-relay-test")
            .build();
        assert!(transport.is_ok());
    }
}
