//! Per-app handler state and the blocking service bridge.

use crate::error::{ApiError, ApiResult};
use actix_web::web;
use log::error;
use placeshare_core::db::open_db;
use placeshare_core::{PlaceService, PlaceServiceError, SqliteEntityStore, StaticGeocoder};
use std::path::{Path, PathBuf};

/// Service type every handler runs against.
pub type SqlitePlaceService<'conn> = PlaceService<SqliteEntityStore<'conn>, StaticGeocoder>;

/// Shared, immutable handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    db_path: PathBuf,
}

impl AppState {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Runs `call` against a fresh connection on the blocking pool.
    ///
    /// Each call opens its own connection; SQLite serializes conflicting
    /// writers.
    pub async fn run<T, F>(&self, call: F) -> ApiResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&SqlitePlaceService<'_>) -> Result<T, PlaceServiceError> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        web::block(move || {
            let conn = open_db(&db_path).map_err(|err| {
                error!("event=request_db_open module=http status=error error={err}");
                ApiError::internal("Database unavailable. Please try again later")
            })?;
            let store = SqliteEntityStore::try_new(&conn).map_err(|err| {
                error!("event=request_store_init module=http status=error error={err}");
                ApiError::internal("Database unavailable. Please try again later")
            })?;
            let service = PlaceService::new(store, StaticGeocoder);
            call(&service).map_err(ApiError::from)
        })
        .await
        .map_err(|err| {
            error!("event=request_blocking module=http status=error error={err}");
            ApiError::internal("Request could not be completed. Please try again later")
        })?
    }
}
