//! Entity store contracts and the SQLite implementation.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for users and places.
//! - Isolate SQLite query details from service orchestration.
//! - Hand out explicit write units for multi-entity writes.
//!
//! # Invariants
//! - Write paths validate records before SQL mutations.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - A `PlaceWriteUnit` that is dropped without `commit` rolls back.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::place::PlaceId;
use crate::model::user::UserId;
use crate::model::validation::ValidationErrors;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod place_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from entity store operations.
#[derive(Debug)]
pub enum RepoError {
    /// Record failed validation before persistence.
    Validation(ValidationErrors),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Target place does not exist.
    PlaceNotFound(PlaceId),
    /// Target user does not exist.
    UserNotFound(UserId),
    /// A unique constraint rejected the write.
    Conflict(String),
    /// Expected back-reference from user to place is missing.
    MissingBackReference { user: UserId, place: PlaceId },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Persisted data cannot be converted to a valid record.
    InvalidData(String),
    /// The password could not be hashed.
    PasswordHash(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::PlaceNotFound(id) => write!(f, "place not found: {id}"),
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::Conflict(message) => write!(f, "conflict: {message}"),
            Self::MissingBackReference { user, place } => {
                write!(f, "user {user} has no back-reference to place {place}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "entity store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::PasswordHash(message) => write!(f, "{message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for RepoError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// SQLite-backed entity store holding users, places and back-references.
///
/// Borrows a migrated connection; implements both `UserRepository` and
/// `PlaceRepository`.
pub struct SqliteEntityStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntityStore<'conn> {
    /// Wraps a connection that has been opened through `db::open_db*`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}
