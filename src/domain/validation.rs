use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidEmail { input: String },
    InvalidPhoneNumber { input: String },
    TooShort {
        field: &'static str,
        min: usize,
        actual: usize,
    },
    ConsentRequired { field: &'static str },
}

impl ValidationError {
    /// Name of the form field this error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field }
            | Self::TooShort { field, .. }
            | Self::ConsentRequired { field } => field,
            Self::InvalidEmail { .. } => "email",
            Self::InvalidPhoneNumber { .. } => "phone",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidEmail { input } => write!(f, "invalid email address: {input}"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::TooShort { field, min, actual } => {
                write!(f, "{field} is too short: {actual} characters (min {min})")
            }
            Self::ConsentRequired { field } => write!(f, "{field} must be accepted"),
        }
    }
}

impl std::error::Error for ValidationError {}
