//! Event streams: types, the stream identity predicate, and the record
//! factories for stream operations.
//!
//! At most one `CreateStreamRecord` is live per stream id. Every repository
//! operation that supersedes or removes a stream filters the log with
//! [`matches_stream`] and nothing else.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  DomainEnv,
  auth::authorize_api_key,
  record::{
    CreateStreamInput, CreateStreamOutput, CreateStreamRecord,
    DeleteStreamInput, DeleteStreamOutput, DeleteStreamRecord, Record,
  },
};

// ─── Types ───────────────────────────────────────────────────────────────────

/// What a stream delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StreamEventType {
  Status,
  Timeline,
}

/// Body of a create or replace request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamCreationRequest {
  pub title:         String,
  pub event_type:    StreamEventType,
  /// Statuses or timeline categories to deliver; empty means all.
  #[serde(default)]
  pub filter_values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamMetadataResponse {
  pub stream_id:       Uuid,
  pub title:           String,
  pub event_type:      StreamEventType,
  pub filter_values:   Vec<String>,
  pub activation_date: DateTime<Utc>,
}

impl StreamMetadataResponse {
  fn new(stream_id: Uuid, request: &StreamCreationRequest, at: DateTime<Utc>) -> Self {
    Self {
      stream_id,
      title: request.title.clone(),
      event_type: request.event_type,
      filter_values: request.filter_values.clone(),
      activation_date: at,
    }
  }
}

// ─── Identity predicate ──────────────────────────────────────────────────────

/// Keep-predicate for stream operations.
///
/// `true` for every record that is not a `CreateStreamRecord`, and for every
/// `CreateStreamRecord` whose returned stream id differs from `stream_id`
/// (a rejected creation has no id and is always kept).
pub fn matches_stream(stream_id: Uuid, record: &Record) -> bool {
  record
    .as_create_stream()
    .and_then(CreateStreamRecord::stream_id)
    .is_none_or(|id| id != stream_id)
}

/// The metadata of every live stream, in creation order. If the log holds more
/// than one creation for an id, the latest one wins.
pub fn live_streams(records: &[Record]) -> Vec<StreamMetadataResponse> {
  let mut streams: Vec<StreamMetadataResponse> = Vec::new();
  for stream in records
    .iter()
    .filter_map(Record::as_create_stream)
    .filter_map(CreateStreamRecord::stream)
  {
    match streams.iter_mut().find(|s| s.stream_id == stream.stream_id) {
      Some(existing) => *existing = stream.clone(),
      None => streams.push(stream.clone()),
    }
  }
  streams
}

// ─── Record factories ────────────────────────────────────────────────────────

/// Build the record for a "create stream" call. A fresh stream id is assigned.
pub fn make_create_stream_record(
  env: &DomainEnv,
  input: CreateStreamInput,
) -> CreateStreamRecord {
  build_create_stream_record(env, input, Uuid::new_v4())
}

/// Build the record for a "replace stream" call: the same shape as a creation,
/// but keeping `stream_id`. Whether such a stream exists is checked by the
/// repository when the record is applied.
pub fn make_replace_stream_record(
  env: &DomainEnv,
  input: CreateStreamInput,
  stream_id: Uuid,
) -> CreateStreamRecord {
  build_create_stream_record(env, input, stream_id)
}

fn build_create_stream_record(
  env: &DomainEnv,
  input: CreateStreamInput,
  stream_id: Uuid,
) -> CreateStreamRecord {
  let now = env.now();
  let output = match authorize_api_key(env, &input.api_key) {
    Ok(()) => CreateStreamOutput::Created {
      returned: StreamMetadataResponse::new(stream_id, &input.request, now),
    },
    Err(returned) => CreateStreamOutput::Unauthorized { returned },
  };
  CreateStreamRecord {
    input,
    output,
    logged_at: now,
  }
}

/// Build the record for a "delete stream" call: `204` if a live stream with
/// the requested id exists in `records`, `404` otherwise.
pub fn make_delete_stream_record(
  env: &DomainEnv,
  input: DeleteStreamInput,
  records: &[Record],
) -> DeleteStreamRecord {
  let output = match authorize_api_key(env, &input.api_key) {
    Err(returned) => DeleteStreamOutput::Unauthorized { returned },
    Ok(()) if records.iter().any(|r| !matches_stream(input.stream_id, r)) => {
      DeleteStreamOutput::Deleted
    }
    Ok(()) => DeleteStreamOutput::NotFound,
  };
  DeleteStreamRecord {
    input,
    output,
    logged_at: env.now(),
  }
}
