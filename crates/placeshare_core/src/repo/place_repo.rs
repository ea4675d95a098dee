//! Place repository contract, write unit and SQLite implementation.
//!
//! # Responsibility
//! - Provide single-place reads, the creator join, and title/description
//!   saves.
//! - Provide `PlaceWriteUnit`, the explicit transaction handle used to keep
//!   `places` and `user_places` in step.
//!
//! # Invariants
//! - Write units start with `BEGIN IMMEDIATE`, so conflicting writers are
//!   serialized by SQLite rather than by in-process locks.
//! - Nothing written through a unit is visible to other connections before
//!   `commit`; dropping the unit rolls every write back.

use crate::model::place::{Coordinates, Place, PlaceId, PlaceWithCreator};
use crate::model::user::UserId;
use crate::repo::user_repo::load_user;
use crate::repo::{parse_uuid, RepoError, RepoResult, SqliteEntityStore};
use log::debug;
use rusqlite::{params, OptionalExtension, Row, Transaction, TransactionBehavior};

pub(crate) const PLACE_COLUMNS: &str = "p.uuid AS uuid,
    p.title AS title,
    p.description AS description,
    p.address AS address,
    p.lat AS lat,
    p.lng AS lng,
    p.image AS image,
    p.creator_uuid AS creator_uuid";

/// Repository interface for place persistence.
pub trait PlaceRepository {
    /// Transaction handle returned by `begin_unit`.
    type Unit: PlaceWriteUnit;

    /// Loads one place by id.
    fn find_place(&self, id: PlaceId) -> RepoResult<Option<Place>>;
    /// Loads one place and resolves its creator.
    fn find_place_with_creator(&self, id: PlaceId) -> RepoResult<Option<PlaceWithCreator>>;
    /// Persists title/description of an existing place outside any unit.
    fn save_place(&self, place: &Place) -> RepoResult<()>;
    /// Opens a write unit spanning places and user back-references.
    fn begin_unit(&self) -> RepoResult<Self::Unit>;
}

/// Explicit transaction handle for multi-entity place writes.
///
/// Every method runs inside the same transaction. Only `commit` makes the
/// writes durable; dropping the unit aborts them.
pub trait PlaceWriteUnit {
    /// Inserts a new place row.
    fn insert_place(&self, place: &Place) -> RepoResult<()>;
    /// Appends `place` to the end of `user`'s back-reference list.
    fn link_place(&self, user: UserId, place: PlaceId) -> RepoResult<()>;
    /// Removes `place` from `user`'s back-reference list.
    fn unlink_place(&self, user: UserId, place: PlaceId) -> RepoResult<()>;
    /// Deletes a place row.
    fn delete_place(&self, place: PlaceId) -> RepoResult<()>;
    /// Commits every write made through this unit.
    fn commit(self) -> RepoResult<()>;
}

/// SQLite write unit backed by an immediate transaction.
pub struct SqliteWriteUnit<'conn> {
    tx: Transaction<'conn>,
}

impl<'conn> PlaceRepository for SqliteEntityStore<'conn> {
    type Unit = SqliteWriteUnit<'conn>;

    fn find_place(&self, id: PlaceId) -> RepoResult<Option<Place>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PLACE_COLUMNS} FROM places p WHERE p.uuid = ?1;"
        ))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_place_row(row)?));
        }

        Ok(None)
    }

    fn find_place_with_creator(&self, id: PlaceId) -> RepoResult<Option<PlaceWithCreator>> {
        let Some(place) = self.find_place(id)? else {
            return Ok(None);
        };
        // The creator column carries a foreign key, so a missing user here
        // means the database was edited behind the store's back.
        let creator = load_user(self.conn, place.creator)?.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "place {} references missing creator {}",
                place.id, place.creator
            ))
        })?;
        Ok(Some(PlaceWithCreator { place, creator }))
    }

    fn save_place(&self, place: &Place) -> RepoResult<()> {
        place.validate()?;

        let changed = self.conn.execute(
            "UPDATE places
             SET title = ?2,
                 description = ?3,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![
                place.id.to_string(),
                place.title.as_str(),
                place.description.as_str(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::PlaceNotFound(place.id));
        }
        Ok(())
    }

    fn begin_unit(&self) -> RepoResult<SqliteWriteUnit<'conn>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        debug!("event=write_unit_begin module=repo status=ok");
        Ok(SqliteWriteUnit { tx })
    }
}

impl PlaceWriteUnit for SqliteWriteUnit<'_> {
    fn insert_place(&self, place: &Place) -> RepoResult<()> {
        place.validate()?;

        self.tx.execute(
            "INSERT INTO places (
                uuid,
                title,
                description,
                address,
                lat,
                lng,
                image,
                creator_uuid
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                place.id.to_string(),
                place.title.as_str(),
                place.description.as_str(),
                place.address.as_str(),
                place.location.lat,
                place.location.lng,
                place.image.as_str(),
                place.creator.to_string(),
            ],
        )?;
        Ok(())
    }

    fn link_place(&self, user: UserId, place: PlaceId) -> RepoResult<()> {
        let user_exists = self
            .tx
            .query_row(
                "SELECT 1 FROM users WHERE uuid = ?1;",
                [user.to_string()],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        if user_exists.is_none() {
            return Err(RepoError::UserNotFound(user));
        }

        self.tx.execute(
            "INSERT INTO user_places (user_uuid, place_uuid, position)
             SELECT ?1, ?2, COALESCE(MAX(position) + 1, 0)
             FROM user_places
             WHERE user_uuid = ?1;",
            params![user.to_string(), place.to_string()],
        )?;
        Ok(())
    }

    fn unlink_place(&self, user: UserId, place: PlaceId) -> RepoResult<()> {
        let changed = self.tx.execute(
            "DELETE FROM user_places WHERE user_uuid = ?1 AND place_uuid = ?2;",
            params![user.to_string(), place.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::MissingBackReference { user, place });
        }
        Ok(())
    }

    fn delete_place(&self, place: PlaceId) -> RepoResult<()> {
        let changed = self
            .tx
            .execute("DELETE FROM places WHERE uuid = ?1;", [place.to_string()])?;
        if changed == 0 {
            return Err(RepoError::PlaceNotFound(place));
        }
        Ok(())
    }

    fn commit(self) -> RepoResult<()> {
        self.tx.commit()?;
        debug!("event=write_unit_commit module=repo status=ok");
        Ok(())
    }
}

pub(crate) fn parse_place_row(row: &Row<'_>) -> RepoResult<Place> {
    let uuid_text: String = row.get("uuid")?;
    let creator_text: String = row.get("creator_uuid")?;

    let place = Place {
        id: parse_uuid(&uuid_text, "places.uuid")?,
        title: row.get("title")?,
        description: row.get("description")?,
        address: row.get("address")?,
        location: Coordinates {
            lat: row.get("lat")?,
            lng: row.get("lng")?,
        },
        image: row.get("image")?,
        creator: parse_uuid(&creator_text, "places.creator_uuid")?,
    };
    place.validate().map_err(|err| {
        RepoError::InvalidData(format!("place {} failed validation: {err}", place.id))
    })?;
    Ok(place)
}
