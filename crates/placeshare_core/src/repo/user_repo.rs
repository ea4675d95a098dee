//! User repository contract and SQLite implementation.
//!
//! # Invariants
//! - `places` is always loaded in back-reference insertion order.
//! - The populated place list is read inside one snapshot with the user row.
//! - A back-reference to a missing place is `InvalidData`, never skipped.

use crate::model::place::Place;
use crate::model::user::{hash_password, NewUser, User, UserId};
use crate::repo::place_repo::{parse_place_row, PLACE_COLUMNS};
use crate::repo::{parse_uuid, RepoError, RepoResult, SqliteEntityStore};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Transaction, TransactionBehavior};
use uuid::Uuid;

/// A user together with the places its back-references resolve to.
#[derive(Debug, Clone, PartialEq)]
pub struct UserWithPlaces {
    pub user: User,
    pub places: Vec<Place>,
}

/// Repository interface for user lookups.
pub trait UserRepository {
    /// Persists a new user with an empty place list and a hashed password.
    fn create_user(&self, user: &NewUser) -> RepoResult<User>;
    /// Loads one user with back-reference ids.
    fn find_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Loads one user and resolves its back-references into full places.
    fn find_user_with_places(&self, id: UserId) -> RepoResult<Option<UserWithPlaces>>;
}

impl UserRepository for SqliteEntityStore<'_> {
    fn create_user(&self, user: &NewUser) -> RepoResult<User> {
        user.validate()?;
        let password = hash_password(&user.password).map_err(RepoError::PasswordHash)?;

        let id = Uuid::new_v4();
        let inserted = self.conn.execute(
            "INSERT INTO users (uuid, name, email, password, image)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                id.to_string(),
                user.name.as_str(),
                user.email.as_str(),
                password.as_str(),
                user.image.as_str(),
            ],
        );

        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation
                    && err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                return Err(RepoError::Conflict(format!(
                    "email `{}` is already registered",
                    user.email
                )));
            }
            Err(err) => return Err(err.into()),
        }

        Ok(User {
            id,
            name: user.name.clone(),
            email: user.email.clone(),
            password,
            image: user.image.clone(),
            places: Vec::new(),
        })
    }

    fn find_user(&self, id: UserId) -> RepoResult<Option<User>> {
        load_user(self.conn, id)
    }

    fn find_user_with_places(&self, id: UserId) -> RepoResult<Option<UserWithPlaces>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
        let Some(user) = load_user(&tx, id)? else {
            return Ok(None);
        };

        let mut stmt = tx.prepare(&format!(
            "SELECT up.place_uuid AS ref_uuid, {PLACE_COLUMNS}
             FROM user_places up
             LEFT JOIN places p ON p.uuid = up.place_uuid
             WHERE up.user_uuid = ?1
             ORDER BY up.position ASC;"
        ))?;
        let mut rows = stmt.query([id.to_string()])?;
        let mut places = Vec::new();
        while let Some(row) = rows.next()? {
            if row.get::<_, Option<String>>("uuid")?.is_none() {
                let dangling: String = row.get("ref_uuid")?;
                return Err(RepoError::InvalidData(format!(
                    "user {id} references missing place {dangling}"
                )));
            }
            places.push(parse_place_row(row)?);
        }
        drop(rows);
        drop(stmt);
        tx.commit()?;

        Ok(Some(UserWithPlaces { user, places }))
    }
}

/// Loads a user row plus its ordered back-reference ids.
pub(crate) fn load_user(conn: &Connection, id: UserId) -> RepoResult<Option<User>> {
    let row = conn
        .query_row(
            "SELECT uuid, name, email, password, image FROM users WHERE uuid = ?1;",
            [id.to_string()],
            |row| {
                Ok((
                    row.get::<_, String>("uuid")?,
                    row.get::<_, String>("name")?,
                    row.get::<_, String>("email")?,
                    row.get::<_, String>("password")?,
                    row.get::<_, String>("image")?,
                ))
            },
        )
        .optional()?;

    let Some((uuid_text, name, email, password, image)) = row else {
        return Ok(None);
    };

    let mut stmt = conn.prepare(
        "SELECT place_uuid FROM user_places WHERE user_uuid = ?1 ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([uuid_text.as_str()])?;
    let mut places = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        places.push(parse_uuid(&value, "user_places.place_uuid")?);
    }

    Ok(Some(User {
        id: parse_uuid(&uuid_text, "users.uuid")?,
        name,
        email,
        password,
        image,
        places,
    }))
}
