//! Place use-case service.
//!
//! # Responsibility
//! - Provide read-one, read-by-owner, create, update and delete for places.
//! - Keep `places` and each user's back-reference list in step.
//!
//! # Invariants
//! - A place exists if and only if exactly one back-reference to it exists
//!   in its creator's `places` list.
//! - Create and delete perform both writes through one `PlaceWriteUnit`;
//!   any failure before `commit` drops the unit and rolls both back.
//! - Update touches title/description only and never the relationship.
//! - Logging is observational and never changes control flow.

use crate::geocode::{GeocodeError, Geocoder};
use crate::model::place::{NewPlace, Place, PlaceId, PlaceUpdate};
use crate::model::user::UserId;
use crate::model::validation::ValidationErrors;
use crate::repo::place_repo::{PlaceRepository, PlaceWriteUnit};
use crate::repo::user_repo::UserRepository;
use crate::repo::{RepoError, RepoResult};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by place service operations.
pub type ServiceResult<T> = Result<T, PlaceServiceError>;

/// The five place operations, used for log events and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOperation {
    Get,
    ListByOwner,
    Create,
    Update,
    Delete,
}

impl PlaceOperation {
    /// Stable `event=` name for log lines.
    pub fn event_name(self) -> &'static str {
        match self {
            Self::Get => "place_get",
            Self::ListByOwner => "place_list_by_owner",
            Self::Create => "place_create",
            Self::Update => "place_update",
            Self::Delete => "place_delete",
        }
    }
}

impl Display for PlaceOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.event_name())
    }
}

/// What a `NotFound` failure was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundTarget {
    Place(PlaceId),
    User(UserId),
    /// The user exists but owns no places.
    PlacesForUser(UserId),
}

/// Errors from place service operations.
#[derive(Debug)]
pub enum PlaceServiceError {
    NotFound(NotFoundTarget),
    /// Input is well-formed but references something unusable.
    UnprocessableEntity(String),
    /// Input failed field validation.
    ValidationFailed(ValidationErrors),
    /// The entity store failed; nothing from this call was committed.
    StoreUnavailable {
        operation: PlaceOperation,
        source: RepoError,
    },
    /// The address could not be resolved.
    GeocodeError(GeocodeError),
}

impl Display for PlaceServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(NotFoundTarget::Place(id)) => write!(f, "place not found: {id}"),
            Self::NotFound(NotFoundTarget::User(id)) => write!(f, "user not found: {id}"),
            Self::NotFound(NotFoundTarget::PlacesForUser(id)) => {
                write!(f, "user {id} has no places")
            }
            Self::UnprocessableEntity(message) => write!(f, "{message}"),
            Self::ValidationFailed(err) => write!(f, "validation failed: {err}"),
            Self::StoreUnavailable { operation, source } => {
                write!(f, "{operation} failed: store unavailable: {source}")
            }
            Self::GeocodeError(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PlaceServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ValidationFailed(err) => Some(err),
            Self::StoreUnavailable { source, .. } => Some(source),
            Self::GeocodeError(err) => Some(err),
            _ => None,
        }
    }
}

/// Place service over an entity store and a geocoder.
pub struct PlaceService<S, G> {
    store: S,
    geocoder: G,
}

impl<S, G> PlaceService<S, G>
where
    S: PlaceRepository + UserRepository,
    G: Geocoder,
{
    pub fn new(store: S, geocoder: G) -> Self {
        Self { store, geocoder }
    }

    /// Loads one place by id.
    pub fn get_place(&self, place_id: PlaceId) -> ServiceResult<Place> {
        let op = PlaceOperation::Get;
        let place = self
            .store
            .find_place(place_id)
            .map_err(|err| store_failure(op, err))?
            .ok_or_else(|| not_found(op, NotFoundTarget::Place(place_id)))?;

        info!("event={op} module=place_service status=ok place_id={place_id}");
        Ok(place)
    }

    /// Lists every place owned by `user_id`, in back-reference order.
    ///
    /// A missing user and a user without places are reported as distinct
    /// `NotFound` targets.
    pub fn list_places_by_owner(&self, user_id: UserId) -> ServiceResult<Vec<Place>> {
        let op = PlaceOperation::ListByOwner;
        let owner = self
            .store
            .find_user_with_places(user_id)
            .map_err(|err| store_failure(op, err))?
            .ok_or_else(|| not_found(op, NotFoundTarget::User(user_id)))?;

        if owner.places.is_empty() {
            return Err(not_found(op, NotFoundTarget::PlacesForUser(user_id)));
        }

        info!(
            "event={op} module=place_service status=ok user_id={user_id} count={}",
            owner.places.len()
        );
        Ok(owner.places)
    }

    /// Creates a place and links it into its creator's place list.
    ///
    /// # Contract
    /// - `draft` has already passed `NewPlace::validate`.
    /// - A missing creator fails with `UnprocessableEntity` before any write.
    /// - The place row and the back-reference commit together or not at all.
    pub fn create_place(&self, draft: &NewPlace) -> ServiceResult<Place> {
        let op = PlaceOperation::Create;
        let creator = self
            .store
            .find_user(draft.creator)
            .map_err(|err| store_failure(op, err))?;
        if creator.is_none() {
            warn!(
                "event={op} module=place_service status=rejected error_code=creator_missing creator_id={}",
                draft.creator
            );
            return Err(PlaceServiceError::UnprocessableEntity(
                "Provided Creator ID does not exist".to_string(),
            ));
        }

        let location = self.geocoder.resolve(&draft.address).map_err(|err| {
            warn!("event={op} module=place_service status=rejected error_code=geocode_failed error={err}");
            PlaceServiceError::GeocodeError(err)
        })?;

        let place = Place::new(draft, location);
        self.write_linked_place(&place)
            .map_err(|err| store_failure(op, err))?;

        info!(
            "event={op} module=place_service status=ok place_id={} creator_id={}",
            place.id, place.creator
        );
        Ok(place)
    }

    /// Overwrites title and description of an existing place.
    ///
    /// # Contract
    /// - `update` has already passed `PlaceUpdate::validate`.
    /// - Lookup failures surface as `StoreUnavailable`, not `NotFound`.
    /// - Single-entity write; no write unit is opened.
    pub fn update_place(&self, place_id: PlaceId, update: &PlaceUpdate) -> ServiceResult<Place> {
        let op = PlaceOperation::Update;
        let mut place = self
            .store
            .find_place(place_id)
            .map_err(|err| store_failure(op, err))?
            .ok_or_else(|| not_found(op, NotFoundTarget::Place(place_id)))?;

        place.apply_update(update);
        match self.store.save_place(&place) {
            Ok(()) => {}
            Err(RepoError::PlaceNotFound(id)) => {
                return Err(not_found(op, NotFoundTarget::Place(id)));
            }
            Err(RepoError::Validation(err)) => {
                return Err(PlaceServiceError::ValidationFailed(err));
            }
            Err(err) => return Err(store_failure(op, err)),
        }

        info!("event={op} module=place_service status=ok place_id={place_id}");
        Ok(place)
    }

    /// Deletes a place and unlinks it from its creator's place list.
    ///
    /// # Contract
    /// - Lookup failures surface as `StoreUnavailable`, not `NotFound`.
    /// - The back-reference removal and the row deletion commit together or
    ///   not at all.
    pub fn delete_place(&self, place_id: PlaceId) -> ServiceResult<()> {
        let op = PlaceOperation::Delete;
        let target = self
            .store
            .find_place_with_creator(place_id)
            .map_err(|err| store_failure(op, err))?
            .ok_or_else(|| not_found(op, NotFoundTarget::Place(place_id)))?;

        self.remove_linked_place(target.creator.id, target.place.id)
            .map_err(|err| store_failure(op, err))?;

        info!(
            "event={op} module=place_service status=ok place_id={place_id} creator_id={}",
            target.creator.id
        );
        Ok(())
    }

    fn write_linked_place(&self, place: &Place) -> RepoResult<()> {
        let unit = self.store.begin_unit()?;
        unit.insert_place(place)?;
        unit.link_place(place.creator, place.id)?;
        unit.commit()
    }

    fn remove_linked_place(&self, creator: UserId, place: PlaceId) -> RepoResult<()> {
        let unit = self.store.begin_unit()?;
        unit.unlink_place(creator, place)?;
        unit.delete_place(place)?;
        unit.commit()
    }
}

fn store_failure(operation: PlaceOperation, source: RepoError) -> PlaceServiceError {
    error!(
        "event={operation} module=place_service status=error error_code=store_unavailable error={source}"
    );
    PlaceServiceError::StoreUnavailable { operation, source }
}

fn not_found(operation: PlaceOperation, target: NotFoundTarget) -> PlaceServiceError {
    let err = PlaceServiceError::NotFound(target);
    warn!("event={operation} module=place_service status=not_found error={err}");
    err
}
