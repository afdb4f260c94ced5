//! Handlers for the notification endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/delivery/v2.3/requests` | Body: [`NewNotificationRequest`]; 202 |
//! | `GET`  | `/delivery/v2.3/notifications/sent/{iun}` | 200, 403 or 404 |
//! | `PUT`  | `/delivery/v2.3/notifications/{iun}/cancel` | 202, 403 or 404 |

use axum::{
  Json,
  extract::{Path, State},
  http::HeaderMap,
  response::Response,
};
use pnmock_core::{
  cancel::make_cancel_notification_record,
  detail::make_get_notification_detail_record,
  notification::NewNotificationRequest,
  record::{
    CancelNotificationInput, CancelNotificationOutput, GetNotificationDetailInput,
    GetNotificationDetailOutput, NewNotificationInput, NewNotificationOutput,
  },
  send::make_new_notification_record,
  store::RecordRepository,
};

use crate::{ApiError, ApiState, api_key, reply, reply_empty};

// ─── Send ────────────────────────────────────────────────────────────────────

/// `POST /delivery/v2.3/requests`
pub async fn send<S>(
  State(state): State<ApiState<S>>,
  headers: HeaderMap,
  Json(request): Json<NewNotificationRequest>,
) -> Result<Response, ApiError>
where
  S: RecordRepository,
{
  let record = make_new_notification_record(&state.env, NewNotificationInput {
    api_key: api_key(&headers),
    request,
  });

  let response = match &record.output {
    NewNotificationOutput::Accepted { iun, returned } => {
      tracing::info!(%iun, "notification accepted");
      reply(record.output.status_code(), returned)
    }
    NewNotificationOutput::Unauthorized { returned } => {
      reply(record.output.status_code(), returned)
    }
  };

  state.store.insert(record.into()).await?;
  Ok(response)
}

// ─── Detail ──────────────────────────────────────────────────────────────────

/// `GET /delivery/v2.3/notifications/sent/{iun}`
pub async fn detail<S>(
  State(state): State<ApiState<S>>,
  headers: HeaderMap,
  Path(iun): Path<String>,
) -> Result<Response, ApiError>
where
  S: RecordRepository,
{
  let records = state.store.list().await?;
  let record = make_get_notification_detail_record(
    &state.env,
    GetNotificationDetailInput {
      api_key: api_key(&headers),
      iun,
    },
    &records,
  );

  let status_code = record.output.status_code();
  let response = match &record.output {
    GetNotificationDetailOutput::Found { returned } => reply(status_code, returned),
    GetNotificationDetailOutput::Unauthorized { returned } => reply(status_code, returned),
    GetNotificationDetailOutput::NotFound => reply_empty(status_code),
  };

  state.store.insert(record.into()).await?;
  Ok(response)
}

// ─── Cancel ──────────────────────────────────────────────────────────────────

/// `PUT /delivery/v2.3/notifications/{iun}/cancel`
pub async fn cancel<S>(
  State(state): State<ApiState<S>>,
  headers: HeaderMap,
  Path(iun): Path<String>,
) -> Result<Response, ApiError>
where
  S: RecordRepository,
{
  let records = state.store.list().await?;
  let record = make_cancel_notification_record(
    &state.env,
    CancelNotificationInput {
      api_key: api_key(&headers),
      iun,
    },
    &records,
  );

  let status_code = record.output.status_code();
  let response = match &record.output {
    CancelNotificationOutput::Accepted { returned } => reply(status_code, returned),
    CancelNotificationOutput::Unauthorized { returned } => reply(status_code, returned),
    CancelNotificationOutput::NotFound => reply_empty(status_code),
  };

  state.store.remove_notification_record(record).await?;
  Ok(response)
}
