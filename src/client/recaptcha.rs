use std::net::IpAddr;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::client::{HttpTransport, ProviderError, ReqwestTransport};
use crate::domain::{ChallengeToken, ChallengeVerification, RecaptchaSecret, ScoreThreshold};

pub const DEFAULT_SITEVERIFY_ENDPOINT: &str = "https://www.google.com/recaptcha/api/siteverify";

#[derive(Clone)]
/// Server-side reCAPTCHA token verification (`siteverify`).
///
/// Accepts a token when Google reports `success: true` and, for score-based
/// keys, the score reaches the configured threshold.
pub struct RecaptchaVerifier {
    secret: RecaptchaSecret,
    threshold: ScoreThreshold,
    endpoint: String,
    http: Arc<dyn HttpTransport>,
}

impl RecaptchaVerifier {
    pub fn new(secret: RecaptchaSecret) -> Self {
        Self::with_transport(secret, Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(secret: RecaptchaSecret, http: Arc<dyn HttpTransport>) -> Self {
        Self {
            secret,
            threshold: ScoreThreshold::DEFAULT,
            endpoint: DEFAULT_SITEVERIFY_ENDPOINT.to_owned(),
            http,
        }
    }

    /// Override the minimum accepted v3 score.
    pub fn threshold(mut self, threshold: ScoreThreshold) -> Self {
        self.threshold = threshold;
        self
    }

    /// Override the `siteverify` URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Verify a widget response token.
    ///
    /// Errors:
    /// - [`ProviderError::Transport`] / [`ProviderError::HttpStatus`] when Google is unreachable,
    /// - [`ProviderError::ChallengeRejected`] for `success: false`,
    /// - [`ProviderError::ScoreTooLow`] when the v3 score is under the threshold.
    pub async fn verify(
        &self,
        token: &ChallengeToken,
        remote_ip: Option<IpAddr>,
    ) -> Result<ChallengeVerification, ProviderError> {
        let params = crate::transport::encode_siteverify_form(&self.secret, token, remote_ip);

        let response = self
            .http
            .post_form(&self.endpoint, params)
            .await
            .map_err(ProviderError::Transport)?;

        if !response.is_success() {
            return Err(ProviderError::from_status(response));
        }

        let verification = crate::transport::decode_siteverify_json_response(&response.body)
            .map_err(|err| ProviderError::Parse(Box::new(err)))?;

        if !verification.success {
            warn!(error_codes = ?verification.error_codes, "reCAPTCHA rejected token");
            return Err(ProviderError::ChallengeRejected {
                error_codes: verification.error_codes,
            });
        }

        if let Some(score) = verification.score {
            if !self.threshold.accepts(score) {
                warn!(score, threshold = self.threshold.value(), "reCAPTCHA score too low");
                return Err(ProviderError::ScoreTooLow {
                    score,
                    threshold: self.threshold.value(),
                });
            }
        }

        debug!(score = ?verification.score, action = ?verification.action, "reCAPTCHA token accepted");
        Ok(verification)
    }
}
