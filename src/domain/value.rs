use std::fmt;
use std::sync::LazyLock;

use phonenumber::country;
use regex::Regex;

use crate::domain::validation::ValidationError;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Email address accepted by the contact form (`email`).
///
/// Invariant: matches `local@domain.tld` with no whitespace and a single `@`
/// on each side of the domain dot. The value is stored exactly as provided.
pub struct EmailAddress(String);

impl EmailAddress {
    /// Form field name (`email`).
    pub const FIELD: &'static str = "email";

    /// Create a validated [`EmailAddress`].
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if !EMAIL_RE.is_match(&value) {
            return Err(ValidationError::InvalidEmail { input: value });
        }
        Ok(Self(value))
    }

    /// Borrow the validated address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number that is valid for its region.
///
/// Equality and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    /// Form field name (`phone`).
    pub const FIELD: &'static str = "phone";

    /// Parse a phone number and check it against the region metadata.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix.
    /// The contact form always passes `None`, so input must be dial-prefixed (`+...`).
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        // A number can parse (right shape, known country code) and still be
        // impossible for its region.
        if !phonenumber::is_valid(&parsed) {
            return Err(ValidationError::InvalidPhoneNumber { input: raw });
        }

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164, parsed })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// Human-readable international form, e.g. `+7 912 345-67-89`.
    pub fn international(&self) -> String {
        phonenumber::format(&self.parsed)
            .mode(phonenumber::Mode::International)
            .to_string()
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Free-text project description (`projectIdea`).
///
/// Invariant: not blank and at least [`ProjectIdea::MIN_CHARS`] characters long.
/// The original value (including whitespace) is preserved.
pub struct ProjectIdea(String);

impl ProjectIdea {
    /// Form field name (`projectIdea`).
    pub const FIELD: &'static str = "projectIdea";

    /// Minimum description length, counted in characters.
    pub const MIN_CHARS: usize = 12;

    /// Create a validated [`ProjectIdea`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let actual = value.chars().count();
        if actual < Self::MIN_CHARS {
            return Err(ValidationError::TooShort {
                field: Self::FIELD,
                min: Self::MIN_CHARS,
                actual,
            });
        }
        Ok(Self(value))
    }

    /// Borrow the description as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Opaque reCAPTCHA response produced by the widget (`recaptchaToken`).
///
/// Invariant: non-empty after trimming. `Debug` never prints the token.
pub struct ChallengeToken(String);

impl ChallengeToken {
    /// Form field name (`recaptchaToken`).
    pub const FIELD: &'static str = "recaptchaToken";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ChallengeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChallengeToken(..)")
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Resend API key.
///
/// Invariant: non-empty after trimming. `Debug` never prints the key.
pub struct ApiKey(String);

impl ApiKey {
    pub const FIELD: &'static str = "api_key";

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(..)")
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// reCAPTCHA server-side secret (`secret`).
///
/// Invariant: non-empty after trimming. `Debug` never prints the secret.
pub struct RecaptchaSecret(String);

impl RecaptchaSecret {
    /// Form field name used by `siteverify` (`secret`).
    pub const FIELD: &'static str = "secret";

    /// Create a validated [`RecaptchaSecret`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated secret.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RecaptchaSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RecaptchaSecret(..)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
/// Minimum reCAPTCHA v3 score accepted by the relay.
///
/// Invariant: `0.0..=1.0`.
pub struct ScoreThreshold(f64);

impl ScoreThreshold {
    /// Threshold applied when the deployment does not configure one.
    pub const DEFAULT: Self = Self(0.5);

    pub fn new(value: f64) -> Option<Self> {
        (0.0..=1.0).contains(&value).then_some(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether `score` passes this threshold.
    pub fn accepts(self, score: f64) -> bool {
        score >= self.0
    }
}

impl Default for ScoreThreshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}
