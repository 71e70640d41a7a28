//! Domain layer: strong types, field validators and wire payloads (no I/O).

mod form;
mod messages;
mod request;
mod response;
mod validation;
mod value;

pub use form::{
    ChallengePolicy, ErrorMap, Field, FormData, is_form_valid, validate_consent,
    validate_contact_form, validate_email, validate_field, validate_phone, validate_project_idea,
};
pub use messages::Messages;
pub use request::{OutgoingEmail, RelayRequest};
pub use response::{ChallengeVerification, RelayResponseBody, SentEmail};
pub use validation::ValidationError;
pub use value::{
    ApiKey, ChallengeToken, EmailAddress, PhoneNumber, ProjectIdea, RecaptchaSecret,
    ScoreThreshold,
};
