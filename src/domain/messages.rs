use crate::domain::validation::ValidationError;

/// User-facing strings for validation and submit feedback.
///
/// [`Messages::default`] is the English locale shipped with the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    pub email_required: String,
    pub email_invalid: String,
    pub phone_required: String,
    pub phone_invalid: String,
    pub project_required: String,
    pub project_too_short: String,
    pub consent_required: String,
    pub verification_required: String,
    pub success_submit: String,
    pub error_submit: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            email_required: "Email is required".to_owned(),
            email_invalid: "Please provide a valid email".to_owned(),
            phone_required: "Phone number is required".to_owned(),
            phone_invalid: "Please provide a valid phone number".to_owned(),
            project_required: "Project description is required".to_owned(),
            project_too_short: "Please provide more details (minimum 12 characters)".to_owned(),
            consent_required: "Privacy consent is required".to_owned(),
            verification_required: "Verification is required".to_owned(),
            success_submit: "Thank you! Your message has been sent successfully.".to_owned(),
            error_submit: "Sorry, something went wrong. Please try again later.".to_owned(),
        }
    }
}

impl Messages {
    /// Map a validation failure to the message shown next to its field.
    pub fn describe(&self, err: &ValidationError) -> String {
        let text = match err {
            ValidationError::Empty { field } => match *field {
                "email" => &self.email_required,
                "phone" => &self.phone_required,
                "projectIdea" => &self.project_required,
                "privacyConsent" => &self.consent_required,
                "recaptchaToken" => &self.verification_required,
                other => return format!("{other} is required"),
            },
            ValidationError::InvalidEmail { .. } => &self.email_invalid,
            ValidationError::InvalidPhoneNumber { .. } => &self.phone_invalid,
            ValidationError::TooShort { .. } => &self.project_too_short,
            ValidationError::ConsentRequired { .. } => &self.consent_required,
        };
        text.clone()
    }
}
