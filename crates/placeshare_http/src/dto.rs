//! Request and response bodies for the place API.

use crate::error::ApiError;
use placeshare_core::model::validation::{validate_new_place, validate_place_update};
use placeshare_core::{NewPlace, Place, PlaceUpdate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `POST /api/places` body.
///
/// Missing fields deserialize as empty strings so they fail validation with
/// a field error instead of a body parse error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreatePlaceRequest {
    pub title: String,
    pub description: String,
    pub address: String,
    pub creator: String,
}

impl CreatePlaceRequest {
    /// Validates fields, then resolves `creator` to a user id.
    ///
    /// An unparseable creator is reported like a creator that does not exist.
    pub fn into_new_place(self) -> Result<NewPlace, ApiError> {
        validate_new_place(&self.title, &self.description, &self.address)
            .map_err(|errors| ApiError::invalid_input(errors.into_vec()))?;
        let creator = parse_id(&self.creator)
            .ok_or_else(|| ApiError::unprocessable("Provided Creator ID does not exist"))?;

        Ok(NewPlace {
            title: self.title,
            description: self.description,
            address: self.address,
            creator,
        })
    }
}

/// `PATCH /api/places/{pid}` body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdatePlaceRequest {
    pub title: String,
    pub description: String,
}

impl UpdatePlaceRequest {
    pub fn into_update(self) -> Result<PlaceUpdate, ApiError> {
        validate_place_update(&self.title, &self.description)
            .map_err(|errors| ApiError::invalid_input(errors.into_vec()))?;
        Ok(PlaceUpdate {
            title: self.title,
            description: self.description,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct PlaceEnvelope {
    pub place: Place,
}

#[derive(Debug, Serialize)]
pub struct PlacesEnvelope {
    pub places: Vec<Place>,
}

/// Parses a path or body id; `None` for anything that is not a UUID.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
