//! Contact form fields, the per-field validators and the form-level aggregator.
//!
//! The same functions back the client state machine and the relay handler.

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::messages::Messages;
use crate::domain::validation::ValidationError;
use crate::domain::value::{ChallengeToken, EmailAddress, PhoneNumber, ProjectIdea};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Email,
    Phone,
    ProjectIdea,
    PrivacyConsent,
    RecaptchaToken,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Email,
        Field::Phone,
        Field::ProjectIdea,
        Field::PrivacyConsent,
        Field::RecaptchaToken,
    ];

    /// Form/wire name of the field.
    pub fn name(self) -> &'static str {
        match self {
            Self::Email => EmailAddress::FIELD,
            Self::Phone => PhoneNumber::FIELD,
            Self::ProjectIdea => ProjectIdea::FIELD,
            Self::PrivacyConsent => "privacyConsent",
            Self::RecaptchaToken => ChallengeToken::FIELD,
        }
    }

    /// Look a field up by its form name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Values currently held by the contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pub email: String,
    pub phone: String,
    pub project_idea: String,
    pub privacy_consent: bool,
    /// `None` until the anti-spam widget reports a response.
    pub recaptcha_token: Option<String>,
}

/// Whether the form must carry an anti-spam token to be valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChallengePolicy {
    Required,
    #[default]
    Optional,
}

/// Field → message map of current validation failures.
///
/// Invariant: a field has an entry iff its value fails validation; an empty map
/// means the form is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap(BTreeMap<Field, String>);

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: Field) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl FromIterator<(Field, String)> for ErrorMap {
    fn from_iter<I: IntoIterator<Item = (Field, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

pub fn validate_email(value: &str, messages: &Messages) -> Option<String> {
    EmailAddress::parse(value)
        .err()
        .map(|err| messages.describe(&err))
}

/// Validate an international (`+`-prefixed) phone number against the region metadata.
pub fn validate_phone(value: &str, messages: &Messages) -> Option<String> {
    PhoneNumber::parse(None, value)
        .err()
        .map(|err| messages.describe(&err))
}

pub fn validate_project_idea(value: &str, messages: &Messages) -> Option<String> {
    ProjectIdea::new(value)
        .err()
        .map(|err| messages.describe(&err))
}

pub fn validate_consent(checked: bool, messages: &Messages) -> Option<String> {
    if checked {
        return None;
    }
    Some(messages.describe(&ValidationError::ConsentRequired {
        field: Field::PrivacyConsent.name(),
    }))
}

/// Validate a single field of `data`.
pub fn validate_field(
    field: Field,
    data: &FormData,
    messages: &Messages,
    policy: ChallengePolicy,
) -> Option<String> {
    match field {
        Field::Email => validate_email(&data.email, messages),
        Field::Phone => validate_phone(&data.phone, messages),
        Field::ProjectIdea => validate_project_idea(&data.project_idea, messages),
        Field::PrivacyConsent => validate_consent(data.privacy_consent, messages),
        Field::RecaptchaToken => {
            if policy == ChallengePolicy::Optional {
                return None;
            }
            let token = data.recaptcha_token.as_deref().unwrap_or_default();
            ChallengeToken::new(token)
                .err()
                .map(|err| messages.describe(&err))
        }
    }
}

/// Run every field validator over `data`.
pub fn validate_contact_form(
    data: &FormData,
    messages: &Messages,
    policy: ChallengePolicy,
) -> ErrorMap {
    Field::ALL
        .into_iter()
        .filter_map(|field| {
            validate_field(field, data, messages, policy).map(|message| (field, message))
        })
        .collect()
}

pub fn is_form_valid(errors: &ErrorMap) -> bool {
    errors.is_empty()
}
