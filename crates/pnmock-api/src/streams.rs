//! Handlers for the event-stream endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/delivery-progresses/v2.3/streams` | Live streams |
//! | `POST`   | `/delivery-progresses/v2.3/streams` | Body: [`StreamCreationRequest`]; 201 |
//! | `PUT`    | `/delivery-progresses/v2.3/streams/{stream_id}` | Update-only; 404 if unknown |
//! | `DELETE` | `/delivery-progresses/v2.3/streams/{stream_id}` | 204 or 404 |

use axum::{
  Json,
  extract::{Path, State},
  http::HeaderMap,
  response::Response,
};
use pnmock_core::{
  auth::authorize_api_key,
  record::{CreateStreamInput, CreateStreamOutput, DeleteStreamInput, DeleteStreamOutput},
  store::RecordRepository,
  stream::{
    StreamCreationRequest, live_streams, make_create_stream_record,
    make_delete_stream_record, make_replace_stream_record,
  },
};
use uuid::Uuid;

use crate::{ApiError, ApiState, api_key, reply, reply_empty};

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /delivery-progresses/v2.3/streams`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  headers: HeaderMap,
) -> Result<Response, ApiError>
where
  S: RecordRepository,
{
  if let Err(body) = authorize_api_key(&state.env, &api_key(&headers)) {
    return Ok(reply(403, &body));
  }
  let records = state.store.list().await?;
  Ok(reply(200, &live_streams(&records)))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /delivery-progresses/v2.3/streams`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  headers: HeaderMap,
  Json(request): Json<StreamCreationRequest>,
) -> Result<Response, ApiError>
where
  S: RecordRepository,
{
  let record = make_create_stream_record(&state.env, CreateStreamInput {
    api_key: api_key(&headers),
    request,
  });
  let response = stream_response(&record.output);

  state.store.update_stream_record(record).await?;
  Ok(response)
}

// ─── Replace ─────────────────────────────────────────────────────────────────

/// `PUT /delivery-progresses/v2.3/streams/{stream_id}`
///
/// Replacing a stream that does not exist is a `404`; nothing is recorded.
pub async fn replace<S>(
  State(state): State<ApiState<S>>,
  headers: HeaderMap,
  Path(stream_id): Path<Uuid>,
  Json(request): Json<StreamCreationRequest>,
) -> Result<Response, ApiError>
where
  S: RecordRepository,
{
  let record = make_replace_stream_record(
    &state.env,
    CreateStreamInput {
      api_key: api_key(&headers),
      request,
    },
    stream_id,
  );
  let response = stream_response(&record.output);

  match record.output {
    CreateStreamOutput::Created { .. } => {
      state
        .store
        .update_stream_record_returning_only_the_one_updated_stream(record)
        .await?;
    }
    CreateStreamOutput::Unauthorized { .. } => {
      state.store.insert(record.into()).await?;
    }
  }
  Ok(response)
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /delivery-progresses/v2.3/streams/{stream_id}`
///
/// A rejected or unknown delete is recorded and leaves every stream in place.
pub async fn delete<S>(
  State(state): State<ApiState<S>>,
  headers: HeaderMap,
  Path(stream_id): Path<Uuid>,
) -> Result<Response, ApiError>
where
  S: RecordRepository,
{
  let records = state.store.list().await?;
  let record = make_delete_stream_record(
    &state.env,
    DeleteStreamInput {
      api_key: api_key(&headers),
      stream_id,
    },
    &records,
  );

  let status_code = record.output.status_code();
  let response = match &record.output {
    DeleteStreamOutput::Unauthorized { returned } => reply(status_code, returned),
    DeleteStreamOutput::Deleted | DeleteStreamOutput::NotFound => reply_empty(status_code),
  };

  // Only an authorized delete of a live stream touches its records.
  match record.output {
    DeleteStreamOutput::Deleted => {
      state.store.remove_stream_record(record).await?;
    }
    DeleteStreamOutput::Unauthorized { .. } | DeleteStreamOutput::NotFound => {
      state.store.insert(record.into()).await?;
    }
  }
  Ok(response)
}

fn stream_response(output: &CreateStreamOutput) -> Response {
  match output {
    CreateStreamOutput::Created { returned } => reply(output.status_code(), returned),
    CreateStreamOutput::Unauthorized { returned } => reply(output.status_code(), returned),
  }
}
