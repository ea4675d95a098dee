//! Place domain model.
//!
//! # Responsibility
//! - Define the persisted `Place` record and its create/update inputs.
//! - Provide the geocoded location shape.
//!
//! # Invariants
//! - `id` is generated once and never reused.
//! - `creator` always points at an existing user whose `places` list
//!   contains `id`.
//! - `location` is derived from `address` at creation time and is never
//!   rewritten by updates.

use crate::model::user::UserId;
use crate::model::validation::{validate_new_place, validate_place_update, ValidationErrors};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a place.
pub type PlaceId = Uuid;

/// Image assigned to every new place until uploads exist.
pub const DEFAULT_PLACE_IMAGE: &str =
    "https://external-preview.redd.it/rAu9SdsqxWCmiA3NKT75q_zAz2lvXYPoXp6MTORGe9c.jpg";

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Canonical place record.
///
/// Serializes ids as strings, which is the shape HTTP clients receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: PlaceId,
    pub title: String,
    pub description: String,
    pub address: String,
    pub location: Coordinates,
    pub image: String,
    /// Owning user. Set at creation and never changed.
    pub creator: UserId,
}

impl Place {
    /// Builds a new place with a generated id and the default image.
    pub fn new(draft: &NewPlace, location: Coordinates) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            address: draft.address.clone(),
            location,
            image: DEFAULT_PLACE_IMAGE.to_string(),
            creator: draft.creator,
        }
    }

    /// Overwrites the user-editable text fields.
    ///
    /// `creator`, `address` and `location` stay untouched.
    pub fn apply_update(&mut self, update: &PlaceUpdate) {
        self.title = update.title.clone();
        self.description = update.description.clone();
    }

    /// Checks the text fields persisted for this place.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate_new_place(&self.title, &self.description, &self.address)
    }
}

/// Caller input for creating a place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlace {
    pub title: String,
    pub description: String,
    pub address: String,
    pub creator: UserId,
}

impl NewPlace {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate_new_place(&self.title, &self.description, &self.address)
    }
}

/// Caller input for editing a place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceUpdate {
    pub title: String,
    pub description: String,
}

impl PlaceUpdate {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate_place_update(&self.title, &self.description)
    }
}

/// A place together with its fully loaded creator.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceWithCreator {
    pub place: Place,
    pub creator: crate::model::user::User,
}
