use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail, ValidationError};

/// Signup form submitted to `POST /register`.
///
/// Only presence and email syntax are enforced; `password` and
/// `confirm_password` are not compared against each other.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationInput {
    #[serde(default)]
    #[validate(length(min = 1, message = "Enter your firstname"))]
    pub username: String,

    #[serde(default)]
    #[validate(
        length(min = 1, message = "Enter an email"),
        custom(function = "validate_email_format")
    )]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Enter a password"))]
    pub password: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Confirm your password"))]
    pub confirm_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

// (struct field, wire name) in reporting order
const FIELD_ORDER: [(&str, &str); 4] = [
    ("username", "username"),
    ("email", "email"),
    ("password", "password"),
    ("confirm_password", "confirmPassword"),
];

// Empty input is left to the presence rule so an empty email reports once.
fn validate_email_format(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() || email.to_string().validate_email() {
        return Ok(());
    }
    Err(ValidationError::new("email").with_message(Cow::Borrowed("Email is not valid")))
}

/// Runs every field rule and returns all violations, ordered by field and
/// then by rule.
pub fn validate(input: &RegistrationInput) -> Result<(), Vec<FieldError>> {
    let errors = match input.validate() {
        Ok(()) => return Ok(()),
        Err(errors) => errors,
    };

    let by_field = errors.field_errors();
    let collected: Vec<FieldError> = FIELD_ORDER
        .iter()
        .filter_map(|(field, wire)| by_field.get(*field).map(|errs| (*wire, errs)))
        .flat_map(|(wire, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                FieldError::new(wire, message)
            })
        })
        .collect();

    Err(collected)
}
