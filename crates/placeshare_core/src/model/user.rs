//! User domain model.
//!
//! # Responsibility
//! - Define the persisted `User` record and its creation input.
//!
//! # Invariants
//! - `email` is unique, compared case-insensitively by the store.
//! - `password` input is at least 6 characters; the stored form is an
//!   Argon2id PHC string and is never serialized.
//! - Every id in `places` references a place whose `creator` is this user.

use crate::model::place::PlaceId;
use crate::model::validation::{FieldError, ValidationErrors};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::Serialize;

/// Stable identifier of a user.
pub type UserId = uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Canonical user record with its ordered place back-references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Argon2id PHC string, never the raw input.
    #[serde(skip_serializing)]
    pub password: String,
    pub image: String,
    /// Back-references in insertion order.
    pub places: Vec<PlaceId>,
}

/// Caller input for registering a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub image: String,
}

impl NewUser {
    /// Checks required fields, email shape and password length.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "must not be blank"));
        }
        if !self.email.contains('@') {
            errors.push(FieldError::new("email", "must be a valid email address"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(FieldError::new(
                "password",
                format!("must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        if self.image.trim().is_empty() {
            errors.push(FieldError::new("image", "must not be blank"));
        }
        ValidationErrors::check(errors)
    }
}

/// Hashes a raw password into an Argon2id PHC string with a random salt.
pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| format!("password hashing failed: {err}"))
}

/// Checks a raw password against a stored PHC string.
///
/// A malformed stored value never verifies.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
