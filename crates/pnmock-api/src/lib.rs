//! JSON REST API emulating the notification platform.
//!
//! Exposes an axum [`Router`] backed by any
//! [`pnmock_core::store::RecordRepository`]. Every handler follows the same
//! shape: read the log, build the record describing this call with a core
//! factory, persist it, answer with the record's output.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(pnmock_api::api_router(store.clone(), env))
//! ```

pub mod audit;
pub mod error;
pub mod notifications;
pub mod records;
pub mod streams;

use std::sync::Arc;

use axum::{
  Json, Router,
  http::{HeaderMap, StatusCode},
  middleware,
  response::{IntoResponse, Response},
  routing::{get, post, put},
};
use pnmock_core::{DomainEnv, store::RecordRepository};
use serde::Serialize;

pub use error::ApiError;

/// Header carrying the caller's API key.
pub const API_KEY_HEADER: &str = "x-api-key";

// ─── State ───────────────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store: Arc<S>,
  pub env:   DomainEnv,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store: self.store.clone(),
      env:   self.env.clone(),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the API router for `store`.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, env: DomainEnv) -> Router<()>
where
  S: RecordRepository + 'static,
{
  let state = ApiState { store, env };

  Router::new()
    // Notifications
    .route("/delivery/v2.3/requests", post(notifications::send::<S>))
    .route(
      "/delivery/v2.3/notifications/sent/{iun}",
      get(notifications::detail::<S>),
    )
    .route(
      "/delivery/v2.3/notifications/{iun}/cancel",
      put(notifications::cancel::<S>),
    )
    // Streams
    .route(
      "/delivery-progresses/v2.3/streams",
      get(streams::list::<S>).post(streams::create::<S>),
    )
    .route(
      "/delivery-progresses/v2.3/streams/{stream_id}",
      put(streams::replace::<S>).delete(streams::delete::<S>),
    )
    // Diagnostics
    .route("/records", get(records::list::<S>))
    .layer(middleware::from_fn_with_state(
      state.clone(),
      audit::record_exchange::<S>,
    ))
    .with_state(state)
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// The API key sent with the request; empty if absent, which the
/// authorization check rejects.
pub(crate) fn api_key(headers: &HeaderMap) -> String {
  headers
    .get(API_KEY_HEADER)
    .and_then(|v| v.to_str().ok())
    .unwrap_or_default()
    .to_owned()
}

/// Answer with a record's status code and returned body.
pub(crate) fn reply<T: Serialize>(status_code: u16, returned: &T) -> Response {
  (status(status_code), Json(returned)).into_response()
}

/// Answer with a record's status code and no body.
pub(crate) fn reply_empty(status_code: u16) -> Response {
  status(status_code).into_response()
}

fn status(code: u16) -> StatusCode {
  StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

#[cfg(test)]
mod tests;
