//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Unauthorized and not-found answers of the mocked API are ordinary record
//! outputs, not errors; this type covers repository failures only.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] pnmock_core::Error),
}

impl From<pnmock_core::Error> for ApiError {
  fn from(e: pnmock_core::Error) -> Self {
    match e {
      pnmock_core::Error::NoRecordsUpdated { .. } => ApiError::NotFound(e.to_string()),
      pnmock_core::Error::MissingStreamId => ApiError::BadRequest(e.to_string()),
      other => ApiError::Store(other),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store operation failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
