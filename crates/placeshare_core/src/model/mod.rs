//! Domain model for users and the places they own.
//!
//! # Responsibility
//! - Define canonical records shared by repositories, services and adapters.
//! - Keep caller-side input validation next to the shapes it validates.
//!
//! # Invariants
//! - Every record is identified by a stable UUID v4.
//! - `Place::creator` and `User::places` mirror each other; only the
//!   transactional write paths in `service::place_service` may change either.

pub mod place;
pub mod user;
pub mod validation;
