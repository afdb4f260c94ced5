//! Middleware that records every HTTP exchange as a `RequestResponseRecord`.

use axum::{
  extract::{Request, State},
  middleware::Next,
  response::Response,
};
use pnmock_core::{
  record::{ExchangeRequest, ExchangeResponse, Record, RequestResponseRecord},
  store::RecordRepository,
};

use crate::ApiState;

pub async fn record_exchange<S>(
  State(state): State<ApiState<S>>,
  request: Request,
  next: Next,
) -> Response
where
  S: RecordRepository,
{
  let input = ExchangeRequest {
    method: request.method().to_string(),
    path:   request.uri().path().to_owned(),
  };

  let response = next.run(request).await;

  let record = Record::from(RequestResponseRecord {
    input,
    output: ExchangeResponse {
      status_code: response.status().as_u16(),
    },
    logged_at: state.env.now(),
  });
  // Failing to audit never fails the request.
  if let Err(e) = state.store.insert(record).await {
    tracing::warn!(error = %e, "could not record exchange");
  }
  response
}
