use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::client::{HttpTransport, ProviderError, ReqwestTransport};
use crate::domain::{ApiKey, OutgoingEmail, SentEmail};

pub const DEFAULT_RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

#[derive(Clone)]
/// Resend transactional email client (`POST /emails`).
pub struct ResendMailer {
    api_key: ApiKey,
    endpoint: String,
    http: Arc<dyn HttpTransport>,
}

impl ResendMailer {
    pub fn new(api_key: ApiKey) -> Self {
        Self::with_transport(api_key, Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(api_key: ApiKey, http: Arc<dyn HttpTransport>) -> Self {
        Self {
            api_key,
            endpoint: DEFAULT_RESEND_ENDPOINT.to_owned(),
            http,
        }
    }

    /// Override the Resend `emails` URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Send one email. Single attempt, no retry.
    ///
    /// Errors:
    /// - [`ProviderError::Api`] for non-2xx responses that carry a Resend error message,
    /// - [`ProviderError::HttpStatus`] for other non-2xx responses,
    /// - [`ProviderError::Transport`] / [`ProviderError::Parse`] otherwise.
    pub async fn send(&self, email: &OutgoingEmail) -> Result<SentEmail, ProviderError> {
        info!(to = %email.to, subject = %email.subject, "sending email via Resend");

        let body = crate::transport::encode_send_email_json(email);
        let response = self
            .http
            .post_json(&self.endpoint, Some(self.api_key.as_str()), body)
            .await
            .map_err(ProviderError::Transport)?;

        if !response.is_success() {
            warn!(status = response.status, body = %response.body, "Resend rejected email");
            return Err(match crate::transport::decode_error_message(&response.body) {
                Some(message) => ProviderError::Api {
                    status: response.status,
                    message,
                },
                None => ProviderError::from_status(response),
            });
        }

        let sent = crate::transport::decode_send_email_json_response(&response.body)
            .map_err(|err| ProviderError::Parse(Box::new(err)))?;
        debug!(id = ?sent.id, "Resend accepted email");
        Ok(sent)
    }
}
