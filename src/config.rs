//! Deployment configuration, injected into the relay and the form state machine.
//!
//! Nothing else in the crate reads the process environment; `from_env` is the
//! only place that does, and `from_lookup` lets tests supply their own source.

use std::time::Duration;

use url::Url;

use crate::domain::{ApiKey, ChallengePolicy, EmailAddress, RecaptchaSecret, ScoreThreshold};

pub const NODE_ENV: &str = "NODE_ENV";
pub const CI: &str = "CI";
pub const RESEND_API_KEY: &str = "REACT_APP_RESEND_API_KEY";
pub const CONTACT_EMAIL: &str = "REACT_APP_CONTACT_EMAIL";
pub const RECAPTCHA_SECRET_KEY: &str = "REACT_APP_RECAPTCHA_SECRET_KEY";
pub const RECAPTCHA_SCORE_THRESHOLD: &str = "RECAPTCHA_SCORE_THRESHOLD";
pub const RECAPTCHA_SITE_KEY: &str = "REACT_APP_RECAPTCHA_SITE_KEY";
pub const FORCE_DEMO_MODE: &str = "REACT_APP_FORCE_DEMO_MODE";
pub const CONTACT_RELAY_URL: &str = "REACT_APP_CONTACT_RELAY_URL";

/// Artificial latency of a simulated submission.
pub const DEFAULT_DEMO_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Runtime environment name (`NODE_ENV`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    Test,
    /// Also used when no environment name is set.
    #[default]
    Production,
    Other(String),
}

impl Environment {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Self::Development,
            "test" => Self::Test,
            "production" | "prod" | "" => Self::Production,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Whether a missing email provider may be replaced by a logged no-op.
    pub fn allows_demo_relay(&self) -> bool {
        matches!(self, Self::Development | Self::Test)
    }

    /// Whether error responses may carry diagnostic `details`.
    pub fn exposes_details(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Server-side settings of the submission relay.
#[derive(Debug, Clone, Default)]
pub struct RelayConfig {
    pub environment: Environment,
    /// `None` disables delivery (demo in development/test, 500 elsewhere).
    pub resend_api_key: Option<ApiKey>,
    pub contact_email: Option<EmailAddress>,
    /// `None` skips anti-spam verification entirely.
    pub recaptcha_secret: Option<RecaptchaSecret>,
    pub score_threshold: ScoreThreshold,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key/value source.
    ///
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let environment = get(NODE_ENV)
            .map(|value| Environment::parse(&value))
            .unwrap_or_default();

        let contact_email = get(CONTACT_EMAIL)
            .map(|value| {
                EmailAddress::parse(value.trim()).map_err(|err| ConfigError::InvalidValue {
                    key: CONTACT_EMAIL,
                    reason: err.to_string(),
                })
            })
            .transpose()?;

        let score_threshold = match get(RECAPTCHA_SCORE_THRESHOLD) {
            Some(raw) => parse_threshold(&raw)?,
            None => ScoreThreshold::DEFAULT,
        };

        Ok(Self {
            environment,
            resend_api_key: get(RESEND_API_KEY).and_then(|value| ApiKey::new(value).ok()),
            contact_email,
            recaptcha_secret: get(RECAPTCHA_SECRET_KEY)
                .and_then(|value| RecaptchaSecret::new(value).ok()),
            score_threshold,
        })
    }
}

fn parse_threshold(raw: &str) -> Result<ScoreThreshold, ConfigError> {
    let value: f64 = raw.trim().parse().map_err(|err: std::num::ParseFloatError| {
        ConfigError::InvalidValue {
            key: RECAPTCHA_SCORE_THRESHOLD,
            reason: err.to_string(),
        }
    })?;
    ScoreThreshold::new(value).ok_or_else(|| ConfigError::InvalidValue {
        key: RECAPTCHA_SCORE_THRESHOLD,
        reason: format!("{value} is outside 0.0..=1.0"),
    })
}

/// How a valid submission leaves the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionMode {
    /// Simulate success locally; nothing is sent.
    Demo,
    /// Call the relay endpoint.
    Relay,
}

/// Client-side settings of the contact form.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub environment: Environment,
    /// `CI` flag; a CI run is treated like the test environment.
    pub ci: bool,
    pub recaptcha_site_key: Option<String>,
    pub force_demo: bool,
    pub relay_url: Option<Url>,
    pub demo_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            ci: false,
            recaptcha_site_key: None,
            force_demo: false,
            relay_url: None,
            demo_delay: DEFAULT_DEMO_DELAY,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let relay_url = get(CONTACT_RELAY_URL)
            .map(|raw| {
                Url::parse(raw.trim()).map_err(|err| ConfigError::InvalidValue {
                    key: CONTACT_RELAY_URL,
                    reason: err.to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            environment: get(NODE_ENV)
                .map(|value| Environment::parse(&value))
                .unwrap_or_default(),
            ci: get(CI).is_some_and(|value| is_truthy(&value)),
            recaptcha_site_key: get(RECAPTCHA_SITE_KEY).map(|value| value.trim().to_owned()),
            force_demo: get(FORCE_DEMO_MODE).is_some_and(|value| is_truthy(&value)),
            relay_url,
            demo_delay: DEFAULT_DEMO_DELAY,
        })
    }

    /// A token is required when a widget is configured or the site runs in production.
    pub fn challenge_policy(&self) -> ChallengePolicy {
        if self.recaptcha_site_key.is_some() || self.environment.is_production() {
            ChallengePolicy::Required
        } else {
            ChallengePolicy::Optional
        }
    }

    /// Resolve demo vs. relay submission; the first matching rule wins.
    pub fn submission_mode(&self) -> SubmissionMode {
        if self.force_demo {
            return SubmissionMode::Demo;
        }
        if self.ci || self.environment == Environment::Test {
            return SubmissionMode::Demo;
        }
        if self.relay_url.is_none() {
            return SubmissionMode::Demo;
        }
        SubmissionMode::Relay
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
