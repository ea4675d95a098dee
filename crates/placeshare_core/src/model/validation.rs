//! Input validation for place payloads.
//!
//! These checks run before the place service is called; the service itself
//! assumes its inputs already passed them.

use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const MIN_DESCRIPTION_LEN: usize = 5;

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Non-empty list of field errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Returns `Ok(())` for an empty list, otherwise wraps the errors.
    pub fn check(errors: Vec<FieldError>) -> Result<(), Self> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self(errors))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for err in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{} {}", err.field, err.message)?;
            first = false;
        }
        Ok(())
    }
}

impl Error for ValidationErrors {}

/// Validates the caller-supplied fields of a new place.
pub fn validate_new_place(
    title: &str,
    description: &str,
    address: &str,
) -> Result<(), ValidationErrors> {
    let mut errors = text_field_errors(title, description);
    if address.trim().is_empty() {
        errors.push(FieldError::new("address", "must not be blank"));
    }
    ValidationErrors::check(errors)
}

/// Validates the editable fields of an existing place.
pub fn validate_place_update(title: &str, description: &str) -> Result<(), ValidationErrors> {
    ValidationErrors::check(text_field_errors(title, description))
}

fn text_field_errors(title: &str, description: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if title.trim().is_empty() {
        errors.push(FieldError::new("title", "must not be blank"));
    }
    if description.trim().chars().count() < MIN_DESCRIPTION_LEN {
        errors.push(FieldError::new(
            "description",
            format!("must be at least {MIN_DESCRIPTION_LEN} characters"),
        ));
    }
    errors
}
