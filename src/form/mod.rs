//! Client-side contact form state machine.
//!
//! [`ContactFormState`] owns the values, per-field errors, focus and the
//! submission outcome. A rendering layer feeds it input events and reads the
//! queries back; it never touches the process environment or the network
//! directly. Deployment settings arrive through [`ClientConfig`] and delivery
//! goes through a [`SubmissionBackend`].

use tracing::{debug, info, warn};

use crate::config::{ClientConfig, SubmissionMode};
use crate::domain::{
    ErrorMap, Field, FormData, Messages, PhoneNumber, RelayRequest, is_form_valid,
    validate_contact_form, validate_field,
};

mod backend;

pub use backend::{HttpRelayBackend, InProcessRelayBackend, SubmissionBackend, SubmitError};

/// New value reported by an input control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Checked(bool),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Checked(value)
    }
}

/// How a single field should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Untouched,
    /// Focused and not (yet) valid; any error text is withheld until blur.
    Typing,
    Valid,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone)]
pub struct ContactFormState {
    config: ClientConfig,
    messages: Messages,
    data: FormData,
    errors: ErrorMap,
    focused: Option<Field>,
    phase: SubmitPhase,
    submit_message: Option<String>,
    widget_generation: u64,
}

impl ContactFormState {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_messages(config, Messages::default())
    }

    pub fn with_messages(config: ClientConfig, messages: Messages) -> Self {
        Self {
            config,
            messages,
            data: FormData::default(),
            errors: ErrorMap::new(),
            focused: None,
            phase: SubmitPhase::Idle,
            submit_message: None,
            widget_generation: 0,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn form_data(&self) -> &FormData {
        &self.data
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn focused_field(&self) -> Option<Field> {
        self.focused
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == SubmitPhase::Submitting
    }

    pub fn submit_message(&self) -> Option<&str> {
        self.submit_message.as_deref()
    }

    /// Bumped every time the anti-spam widget must be reset.
    pub fn widget_generation(&self) -> u64 {
        self.widget_generation
    }

    /// Whether the current values would pass a full validation.
    pub fn is_valid(&self) -> bool {
        is_form_valid(&self.validate_all())
    }

    /// Error text to display for `field`; hidden while the field is focused.
    pub fn visible_error(&self, field: Field) -> Option<&str> {
        if self.focused == Some(field) {
            return None;
        }
        self.errors.get(field)
    }

    /// Presentation state from the error map, focus and the current value.
    ///
    /// A recorded error wins (shown as `Typing` while focused); otherwise the
    /// field is `Valid` only when it holds a value that passes validation.
    pub fn field_state(&self, field: Field) -> FieldState {
        let focused = self.focused == Some(field);
        if self.errors.contains(field) {
            return if focused {
                FieldState::Typing
            } else {
                FieldState::Error
            };
        }
        let valid = self.has_value(field) && self.validate(field).is_none();
        match (focused, valid) {
            (_, true) => FieldState::Valid,
            (true, false) => FieldState::Typing,
            (false, false) => FieldState::Untouched,
        }
    }

    pub fn on_change(&mut self, field: Field, value: impl Into<FieldValue>) {
        match (field, value.into()) {
            (Field::PrivacyConsent, FieldValue::Checked(checked)) => {
                self.data.privacy_consent = checked;
                if checked {
                    self.errors.remove(field);
                } else {
                    self.errors
                        .insert(field, self.messages.consent_required.clone());
                }
            }
            (Field::RecaptchaToken, FieldValue::Text(token)) => {
                self.on_challenge_response(Some(token));
            }
            (Field::Email | Field::Phone | Field::ProjectIdea, FieldValue::Text(text)) => {
                if !text.is_empty() {
                    self.errors.remove(field);
                }
                *self.text_slot(field) = text;
            }
            (field, value) => {
                warn!(%field, ?value, "ignoring value of the wrong kind");
            }
        }
    }

    pub fn on_focus(&mut self, field: Field) {
        self.focused = Some(field);
    }

    pub fn on_blur(&mut self, field: Field) {
        if let Some(message) = self.validate(field) {
            self.errors.insert(field, message);
        }
        if self.focused == Some(field) {
            self.focused = None;
        }
    }

    /// Widget callback; `None` when the token expired.
    pub fn on_challenge_response(&mut self, token: Option<String>) {
        let token = token.filter(|value| !value.is_empty());
        if token.is_some() {
            self.errors.remove(Field::RecaptchaToken);
        }
        self.data.recaptcha_token = token;
    }

    /// Replace the error map with the outcome of a full validation pass.
    pub fn on_validate_all(&mut self) -> bool {
        self.errors = self.validate_all();
        is_form_valid(&self.errors)
    }

    /// Validate and deliver the form.
    ///
    /// Does nothing while a submission is already in flight. Backend failures
    /// are reported through [`submit_message`](Self::submit_message), never
    /// returned.
    pub async fn on_submit(&mut self, backend: &dyn SubmissionBackend) -> SubmitPhase {
        if self.is_submitting() {
            debug!("submit ignored, already submitting");
            return self.phase;
        }
        self.phase = SubmitPhase::Submitting;
        self.submit_message = None;

        if !self.on_validate_all() {
            debug!(errors = self.errors.len(), "submission blocked by validation");
            self.phase = SubmitPhase::Idle;
            return self.phase;
        }

        let request = RelayRequest::from_form(&self.data);
        let outcome = match self.config.submission_mode() {
            SubmissionMode::Demo => {
                info!(
                    delay = ?self.config.demo_delay,
                    email = ?request.email,
                    phone = %display_phone(&self.data.phone),
                    "demo mode, simulating submission"
                );
                tokio::time::sleep(self.config.demo_delay).await;
                Ok(())
            }
            SubmissionMode::Relay => backend.submit(&request).await,
        };

        match outcome {
            Ok(()) => {
                info!("contact form submitted");
                self.reset();
                self.phase = SubmitPhase::Succeeded;
                self.submit_message = Some(self.messages.success_submit.clone());
            }
            Err(err) => {
                warn!(error = %err, "contact form submission failed");
                self.phase = SubmitPhase::Failed;
                self.submit_message = Some(self.messages.error_submit.clone());
            }
        }
        self.phase
    }

    fn reset(&mut self) {
        self.data = FormData::default();
        self.errors.clear();
        self.focused = None;
        self.widget_generation += 1;
    }

    fn validate(&self, field: Field) -> Option<String> {
        validate_field(
            field,
            &self.data,
            &self.messages,
            self.config.challenge_policy(),
        )
    }

    fn validate_all(&self) -> ErrorMap {
        validate_contact_form(&self.data, &self.messages, self.config.challenge_policy())
    }

    fn has_value(&self, field: Field) -> bool {
        match field {
            Field::Email => !self.data.email.is_empty(),
            Field::Phone => !self.data.phone.is_empty(),
            Field::ProjectIdea => !self.data.project_idea.is_empty(),
            Field::PrivacyConsent => self.data.privacy_consent,
            Field::RecaptchaToken => self.data.recaptcha_token.is_some(),
        }
    }

    fn text_slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Phone => &mut self.data.phone,
            Field::ProjectIdea => &mut self.data.project_idea,
            _ => &mut self.data.email,
        }
    }
}

/// International rendering of a valid phone number; anything else is returned
/// unchanged.
pub fn display_phone(phone: &str) -> String {
    PhoneNumber::parse(None, phone)
        .map(|number| number.international())
        .unwrap_or_else(|_| phone.to_owned())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use url::Url;

    use crate::client::BoxFuture;
    use crate::config::Environment;

    use super::*;

    #[derive(Default)]
    struct RecordingBackend {
        fail: bool,
        calls: Mutex<Vec<RelayRequest>>,
    }

    impl SubmissionBackend for RecordingBackend {
        fn submit<'a>(
            &'a self,
            request: &'a RelayRequest,
        ) -> BoxFuture<'a, Result<(), SubmitError>> {
            Box::pin(async move {
                self.calls.lock().unwrap().push(request.clone());
                if self.fail {
                    Err(SubmitError::Rejected {
                        status: 500,
                        error: Some("Failed to send email".to_owned()),
                    })
                } else {
                    Ok(())
                }
            })
        }
    }

    fn relay_config() -> ClientConfig {
        ClientConfig {
            environment: Environment::Production,
            recaptcha_site_key: Some("site-key".to_owned()),
            relay_url: Some(Url::parse("https://site.example/.netlify/functions/send-email").unwrap()),
            ..ClientConfig::default()
        }
    }

    fn demo_config() -> ClientConfig {
        ClientConfig {
            environment: Environment::Test,
            demo_delay: Duration::ZERO,
            ..ClientConfig::default()
        }
    }

    fn fill(form: &mut ContactFormState) {
        form.on_change(Field::Email, "jane@example.com");
        form.on_change(Field::Phone, "+79123456789");
        form.on_change(Field::ProjectIdea, "A portfolio website");
        form.on_change(Field::PrivacyConsent, true);
        form.on_challenge_response(Some("tok-1".to_owned()));
    }

    #[test]
    fn blur_shows_error_and_focus_hides_it() {
        let mut form = ContactFormState::new(demo_config());
        assert_eq!(form.field_state(Field::Email), FieldState::Untouched);

        form.on_focus(Field::Email);
        form.on_change(Field::Email, "jane@");
        assert_eq!(form.field_state(Field::Email), FieldState::Typing);
        assert_eq!(form.visible_error(Field::Email), None);

        form.on_blur(Field::Email);
        assert_eq!(form.focused_field(), None);
        assert_eq!(form.field_state(Field::Email), FieldState::Error);
        assert_eq!(
            form.visible_error(Field::Email),
            Some("Please provide a valid email")
        );

        form.on_focus(Field::Email);
        assert_eq!(form.visible_error(Field::Email), None);
        assert!(form.errors().contains(Field::Email));
    }

    #[test]
    fn typing_clears_errors_optimistically() {
        let mut form = ContactFormState::new(demo_config());
        form.on_blur(Field::Email);
        form.on_blur(Field::Phone);
        assert!(form.errors().contains(Field::Email));
        assert!(form.errors().contains(Field::Phone));

        form.on_change(Field::Email, "j");
        assert!(!form.errors().contains(Field::Email));

        form.on_change(Field::Phone, "+7");
        assert!(!form.errors().contains(Field::Phone));

        form.on_blur(Field::Email);
        assert!(form.errors().contains(Field::Email));
        form.on_blur(Field::Phone);
        assert!(form.errors().contains(Field::Phone));
    }

    #[test]
    fn valid_blur_marks_field_valid() {
        let mut form = ContactFormState::new(demo_config());
        form.on_focus(Field::ProjectIdea);
        form.on_change(Field::ProjectIdea, "A portfolio website");
        form.on_blur(Field::ProjectIdea);
        assert_eq!(form.field_state(Field::ProjectIdea), FieldState::Valid);
        assert_eq!(form.visible_error(Field::ProjectIdea), None);
    }

    #[test]
    fn focused_field_with_valid_value_is_valid() {
        let mut form = ContactFormState::new(demo_config());
        form.on_focus(Field::Email);
        form.on_change(Field::Email, "jane");
        assert_eq!(form.field_state(Field::Email), FieldState::Typing);

        form.on_change(Field::Email, "jane@example.com");
        assert_eq!(form.field_state(Field::Email), FieldState::Valid);
    }

    #[test]
    fn unfocused_invalid_value_is_not_valid() {
        let mut form = ContactFormState::new(demo_config());
        form.on_focus(Field::Email);
        form.on_change(Field::Email, "jane@example.com");
        form.on_blur(Field::Email);
        assert_eq!(form.field_state(Field::Email), FieldState::Valid);

        form.on_change(Field::Email, "x");
        assert!(!form.errors().contains(Field::Email));
        assert_eq!(form.field_state(Field::Email), FieldState::Untouched);

        form.on_blur(Field::Email);
        assert_eq!(form.field_state(Field::Email), FieldState::Error);
    }

    #[test]
    fn focused_field_with_error_is_typing() {
        let mut form = ContactFormState::new(demo_config());
        form.on_change(Field::Phone, "+7912");
        form.on_blur(Field::Phone);
        assert_eq!(form.field_state(Field::Phone), FieldState::Error);

        form.on_focus(Field::Phone);
        assert_eq!(form.field_state(Field::Phone), FieldState::Typing);
    }

    #[test]
    fn consent_state_follows_checkbox() {
        let mut form = ContactFormState::new(demo_config());
        assert_eq!(form.field_state(Field::PrivacyConsent), FieldState::Untouched);
        form.on_change(Field::PrivacyConsent, true);
        assert_eq!(form.field_state(Field::PrivacyConsent), FieldState::Valid);
        form.on_change(Field::PrivacyConsent, false);
        assert_eq!(form.field_state(Field::PrivacyConsent), FieldState::Error);
    }

    #[test]
    fn phone_is_displayed_in_international_form() {
        let shown = display_phone("+79123456789");
        assert!(shown.starts_with("+7 912"), "got {shown}");
        assert_ne!(shown, "+79123456789");

        assert_eq!(display_phone("+7912"), "+7912");
        assert_eq!(display_phone(""), "");
    }

    #[test]
    fn unchecking_consent_sets_error_immediately() {
        let mut form = ContactFormState::new(demo_config());
        form.on_change(Field::PrivacyConsent, true);
        assert!(!form.errors().contains(Field::PrivacyConsent));

        form.on_change(Field::PrivacyConsent, false);
        assert_eq!(
            form.errors().get(Field::PrivacyConsent),
            Some("Privacy consent is required")
        );

        form.on_change(Field::PrivacyConsent, true);
        assert!(!form.errors().contains(Field::PrivacyConsent));
    }

    #[test]
    fn wrong_value_kind_is_ignored() {
        let mut form = ContactFormState::new(demo_config());
        form.on_change(Field::Email, true);
        form.on_change(Field::PrivacyConsent, "yes");
        assert_eq!(form.form_data(), &FormData::default());
    }

    #[test]
    fn challenge_response_clears_token_error() {
        let mut form = ContactFormState::new(relay_config());
        form.on_validate_all();
        assert_eq!(
            form.errors().get(Field::RecaptchaToken),
            Some("Verification is required")
        );

        form.on_challenge_response(Some("tok-1".to_owned()));
        assert!(!form.errors().contains(Field::RecaptchaToken));
        assert_eq!(form.form_data().recaptcha_token.as_deref(), Some("tok-1"));

        form.on_challenge_response(None);
        assert_eq!(form.form_data().recaptcha_token, None);
    }

    #[test]
    fn validate_all_reports_every_field() {
        let mut form = ContactFormState::new(relay_config());
        assert!(!form.on_validate_all());
        assert_eq!(form.errors().len(), Field::ALL.len());

        fill(&mut form);
        assert!(form.is_valid());
        assert!(form.on_validate_all());
        assert!(form.errors().is_empty());
    }

    #[tokio::test]
    async fn invalid_submit_does_not_call_backend() {
        let backend = RecordingBackend::default();
        let mut form = ContactFormState::new(relay_config());
        form.on_change(Field::Email, "jane@example.com");

        let phase = form.on_submit(&backend).await;
        assert_eq!(phase, SubmitPhase::Idle);
        assert!(backend.calls.lock().unwrap().is_empty());
        assert!(form.errors().contains(Field::ProjectIdea));
        assert_eq!(form.form_data().email, "jane@example.com");
        assert_eq!(form.submit_message(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn demo_submit_succeeds_and_resets() {
        let backend = RecordingBackend::default();
        let config = ClientConfig {
            demo_delay: Duration::from_millis(1500),
            ..demo_config()
        };
        let mut form = ContactFormState::new(config);
        fill(&mut form);

        let phase = form.on_submit(&backend).await;
        assert_eq!(phase, SubmitPhase::Succeeded);
        assert!(backend.calls.lock().unwrap().is_empty());
        assert_eq!(form.form_data(), &FormData::default());
        assert!(form.errors().is_empty());
        assert_eq!(form.widget_generation(), 1);
        assert_eq!(
            form.submit_message(),
            Some("Thank you! Your message has been sent successfully.")
        );
        assert_eq!(form.field_state(Field::Email), FieldState::Untouched);
    }

    #[tokio::test]
    async fn relay_submit_sends_payload() {
        let backend = RecordingBackend::default();
        let mut form = ContactFormState::new(relay_config());
        fill(&mut form);

        assert_eq!(form.on_submit(&backend).await, SubmitPhase::Succeeded);
        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].email.as_deref(), Some("jane@example.com"));
        assert_eq!(calls[0].phone.as_deref(), Some("+79123456789"));
        assert_eq!(calls[0].recaptcha_token.as_deref(), Some("tok-1"));
    }

    #[tokio::test]
    async fn failed_submit_keeps_form() {
        let backend = RecordingBackend {
            fail: true,
            ..RecordingBackend::default()
        };
        let mut form = ContactFormState::new(relay_config());
        fill(&mut form);
        let before = form.form_data().clone();

        assert_eq!(form.on_submit(&backend).await, SubmitPhase::Failed);
        assert_eq!(form.form_data(), &before);
        assert_eq!(form.widget_generation(), 0);
        assert_eq!(
            form.submit_message(),
            Some("Sorry, something went wrong. Please try again later.")
        );

        let backend = RecordingBackend::default();
        assert_eq!(form.on_submit(&backend).await, SubmitPhase::Succeeded);
    }

    #[tokio::test]
    async fn forced_demo_skips_backend() {
        let backend = RecordingBackend::default();
        let config = ClientConfig {
            force_demo: true,
            demo_delay: Duration::ZERO,
            ..relay_config()
        };
        let mut form = ContactFormState::new(config);
        fill(&mut form);

        assert_eq!(form.on_submit(&backend).await, SubmitPhase::Succeeded);
        assert!(backend.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn in_process_relay_round_trip() {
        use crate::client::fake::FakeTransport;
        use crate::config::RelayConfig;
        use crate::relay::SubmissionRelay;

        let relay = SubmissionRelay::with_transport(
            RelayConfig {
                environment: Environment::Development,
                ..RelayConfig::default()
            },
            Arc::new(FakeTransport::new()),
        );
        let backend = InProcessRelayBackend::new(Arc::new(relay));
        let mut form = ContactFormState::new(relay_config());
        fill(&mut form);

        assert_eq!(form.on_submit(&backend).await, SubmitPhase::Succeeded);
        assert_eq!(form.form_data().recaptcha_token, None);
    }
}
