//! HTTP request handlers for the place API.
//!
//! # Responsibility
//! - Map HTTP requests onto `PlaceService` calls.
//! - Run input pre-validation before the service sees a payload.
//! - Translate service errors into status codes and JSON bodies.
//!
//! # Invariants
//! - Handlers hold no in-process state beyond the database path.
//! - Blocking SQLite work runs on actix's blocking pool.

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::configure;
pub use state::AppState;
