//! Core domain logic for PlaceShare.
//! This crate is the single source of truth for the user/place invariants.

pub mod db;
pub mod geocode;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use geocode::{GeocodeError, Geocoder, StaticGeocoder, STATIC_LOCATION};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::place::{
    Coordinates, NewPlace, Place, PlaceId, PlaceUpdate, PlaceWithCreator, DEFAULT_PLACE_IMAGE,
};
pub use model::user::{hash_password, verify_password, NewUser, User, UserId};
pub use model::validation::{FieldError, ValidationErrors};
pub use repo::place_repo::{PlaceRepository, PlaceWriteUnit, SqliteWriteUnit};
pub use repo::user_repo::{UserRepository, UserWithPlaces};
pub use repo::{RepoError, RepoResult, SqliteEntityStore};
pub use service::place_service::{
    NotFoundTarget, PlaceOperation, PlaceService, PlaceServiceError, ServiceResult,
};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
