//! HTTP mapping for place service errors.
//!
//! Keeps `PlaceServiceError` HTTP-agnostic while giving handlers one error
//! type that renders as `{"message": ..., "errors": [...]}`.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use placeshare_core::{FieldError, NotFoundTarget, PlaceOperation, PlaceServiceError};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error returned by every handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    errors: Vec<FieldError>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldError]>,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// 422 carrying per-field validation failures.
    pub fn invalid_input(errors: Vec<FieldError>) -> Self {
        Self {
            errors,
            ..Self::unprocessable("Invalid inputs passed, please check your data.")
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn field_errors(&self) -> &[FieldError] {
        &self.errors
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.message)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(ErrorBody {
            message: &self.message,
            errors: (!self.errors.is_empty()).then_some(self.errors.as_slice()),
        })
    }
}

impl From<PlaceServiceError> for ApiError {
    fn from(value: PlaceServiceError) -> Self {
        match value {
            PlaceServiceError::NotFound(NotFoundTarget::Place(_)) => {
                Self::not_found("Could not find a place for the provided pid.")
            }
            PlaceServiceError::NotFound(NotFoundTarget::User(_)) => {
                Self::not_found("Could not find a user for the provided uid.")
            }
            PlaceServiceError::NotFound(NotFoundTarget::PlacesForUser(_)) => {
                Self::not_found("Could not find a place for the provided uid.")
            }
            PlaceServiceError::UnprocessableEntity(message) => Self::unprocessable(message),
            PlaceServiceError::ValidationFailed(errors) => Self::invalid_input(errors.into_vec()),
            // Store details stay in the logs.
            PlaceServiceError::StoreUnavailable { operation, .. } => {
                Self::internal(store_failure_message(operation))
            }
            PlaceServiceError::GeocodeError(_) => {
                Self::unprocessable("Could not find location for the specified address.")
            }
        }
    }
}

fn store_failure_message(operation: PlaceOperation) -> &'static str {
    match operation {
        PlaceOperation::Get | PlaceOperation::ListByOwner => {
            "Retrieving place unsuccessful. Please try again later"
        }
        PlaceOperation::Create => "Creating place unsuccessful. Please try again later",
        PlaceOperation::Update => "Updating place unsuccessful. Please try again later",
        PlaceOperation::Delete => "Deleting place unsuccessful. Please try again later",
    }
}
