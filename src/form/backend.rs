use std::sync::Arc;

use tracing::debug;
use url::Url;

use crate::client::{BoxError, BoxFuture, HttpTransport, ReqwestTransport};
use crate::domain::{RelayRequest, RelayResponseBody};
use crate::relay::{RelayHttpRequest, SubmissionRelay};

/// Where a valid submission is delivered when the form is not in demo mode.
pub trait SubmissionBackend: Send + Sync {
    fn submit<'a>(&'a self, request: &'a RelayRequest) -> BoxFuture<'a, Result<(), SubmitError>>;
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The relay could not be reached.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// The relay answered, but did not accept the submission.
    #[error("relay rejected submission with status {status}: {}", error.as_deref().unwrap_or("no error message"))]
    Rejected { status: u16, error: Option<String> },

    #[error("could not encode submission: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("could not parse relay response: {0}")]
    Parse(#[source] serde_json::Error),
}

#[derive(Clone)]
/// Posts the submission to a deployed relay endpoint.
pub struct HttpRelayBackend {
    url: Url,
    http: Arc<dyn HttpTransport>,
}

impl HttpRelayBackend {
    pub fn new(url: Url) -> Self {
        Self::with_transport(url, Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(url: Url, http: Arc<dyn HttpTransport>) -> Self {
        Self { url, http }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl SubmissionBackend for HttpRelayBackend {
    fn submit<'a>(&'a self, request: &'a RelayRequest) -> BoxFuture<'a, Result<(), SubmitError>> {
        Box::pin(async move {
            let body = serde_json::to_value(request).map_err(SubmitError::Encode)?;
            let response = self
                .http
                .post_json(self.url.as_str(), None, body)
                .await
                .map_err(SubmitError::Transport)?;

            if !response.is_success() {
                let error = serde_json::from_str::<RelayResponseBody>(&response.body)
                    .ok()
                    .and_then(|body| body.error);
                return Err(SubmitError::Rejected {
                    status: response.status,
                    error,
                });
            }

            let body: RelayResponseBody =
                serde_json::from_str(&response.body).map_err(SubmitError::Parse)?;
            if !body.is_success() {
                return Err(SubmitError::Rejected {
                    status: response.status,
                    error: body.error,
                });
            }
            debug!(message = ?body.message, "relay accepted submission");
            Ok(())
        })
    }
}

#[derive(Clone)]
/// Hands the submission straight to a [`SubmissionRelay`] in this process.
pub struct InProcessRelayBackend {
    relay: Arc<SubmissionRelay>,
}

impl InProcessRelayBackend {
    pub fn new(relay: Arc<SubmissionRelay>) -> Self {
        Self { relay }
    }
}

impl SubmissionBackend for InProcessRelayBackend {
    fn submit<'a>(&'a self, request: &'a RelayRequest) -> BoxFuture<'a, Result<(), SubmitError>> {
        Box::pin(async move {
            let body = serde_json::to_string(request).map_err(SubmitError::Encode)?;
            let response = self.relay.handle(RelayHttpRequest::post(body)).await;
            if (200..=299).contains(&response.status) && response.body.is_success() {
                Ok(())
            } else {
                Err(SubmitError::Rejected {
                    status: response.status,
                    error: response.body.error,
                })
            }
        })
    }
}
