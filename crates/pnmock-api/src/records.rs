//! `GET /records`: dump the whole record log, in insertion order.

use axum::{Json, extract::State};
use pnmock_core::{record::Record, store::RecordRepository};

use crate::{ApiError, ApiState};

pub async fn list<S>(State(state): State<ApiState<S>>) -> Result<Json<Vec<Record>>, ApiError>
where
  S: RecordRepository,
{
  Ok(Json(state.store.list().await?))
}
