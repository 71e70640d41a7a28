//! Contact form validation, client state machine and email relay.
//!
//! The crate is layered like a small API client: a domain layer of strong
//! types and validators shared by both sides, a transport layer for the
//! provider wire formats, and a client layer for the reCAPTCHA and Resend
//! calls. On top sit the [`relay`] handler (server side) and the [`form`]
//! state machine (browser side), both configured through [`config`].
//!
//! ```rust,no_run
//! use contact_relay::{RelayConfig, RelayHttpRequest, SubmissionRelay};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), contact_relay::ConfigError> {
//!     let relay = SubmissionRelay::new(RelayConfig::from_env()?);
//!     let body = r#"{"email":"jane@example.com","projectIdea":"A portfolio website"}"#;
//!     let response = relay.handle(RelayHttpRequest::post(body)).await;
//!     println!("{} {:?}", response.status, response.body);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod domain;
pub mod form;
pub mod relay;
mod transport;

pub use client::{ProviderError, RecaptchaVerifier, ReqwestTransport, ResendMailer};
pub use config::{ClientConfig, ConfigError, Environment, RelayConfig, SubmissionMode};
pub use domain::{
    ChallengePolicy, EmailAddress, ErrorMap, Field, FormData, Messages, PhoneNumber,
    ProjectIdea, RelayRequest, RelayResponseBody, ScoreThreshold, ValidationError,
    is_form_valid, validate_contact_form,
};
pub use form::{
    ContactFormState, FieldState, FieldValue, HttpRelayBackend, InProcessRelayBackend,
    SubmissionBackend, SubmitError, SubmitPhase,
};
pub use relay::{RelayHttpRequest, RelayHttpResponse, RelayRejection, SubmissionRelay};
