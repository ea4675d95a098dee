//! Address-to-coordinate resolution.
//!
//! The place service depends on the `Geocoder` trait only; geocoding runs
//! before any write unit opens, so a lookup failure never touches the store.

use crate::model::place::Coordinates;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from address resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodeError {
    /// No coordinates are known for the address.
    NoMatch(String),
    /// The lookup backend could not be reached.
    Unavailable(String),
}

impl Display for GeocodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoMatch(address) => write!(f, "no coordinates found for address `{address}`"),
            Self::Unavailable(message) => write!(f, "geocoder unavailable: {message}"),
        }
    }
}

impl Error for GeocodeError {}

/// Resolves a postal address to coordinates.
pub trait Geocoder {
    fn resolve(&self, address: &str) -> Result<Coordinates, GeocodeError>;
}

/// Fixed location returned by `StaticGeocoder`.
pub const STATIC_LOCATION: Coordinates = Coordinates {
    lat: 40.748_447_4,
    lng: -73.987_151_6,
};

/// Deterministic geocoder that maps every non-blank address to
/// `STATIC_LOCATION`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticGeocoder;

impl Geocoder for StaticGeocoder {
    fn resolve(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        if address.trim().is_empty() {
            return Err(GeocodeError::NoMatch(address.to_string()));
        }
        Ok(STATIC_LOCATION)
    }
}
