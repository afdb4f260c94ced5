//! Record types, the unit of the append-only interaction log.
//!
//! Every completed call against the mocked API is captured as a record
//! carrying its input, its output and the time it was logged. Records are
//! never mutated after they are appended; current entity state is derived
//! from them by [`crate::snapshot`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Result,
  notification::{
    FullSentNotification, NewNotificationRequest, NewNotificationResponse,
    RequestStatus,
  },
  stream::{StreamCreationRequest, StreamMetadataResponse},
};

// ─── Shared bodies ───────────────────────────────────────────────────────────

/// Body returned alongside a `403`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnauthorizedMessageBody {
  pub message: String,
}

impl Default for UnauthorizedMessageBody {
  fn default() -> Self {
    Self {
      message: "User is not authorized to access this resource".to_owned(),
    }
  }
}

// ─── New notification ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotificationInput {
  pub api_key: String,
  pub request: NewNotificationRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NewNotificationOutput {
  /// `202`; `iun` is the identifier assigned to the new notification.
  Accepted {
    iun:      String,
    returned: NewNotificationResponse,
  },
  /// `403`
  Unauthorized { returned: UnauthorizedMessageBody },
}

impl NewNotificationOutput {
  pub fn status_code(&self) -> u16 {
    match self {
      Self::Accepted { .. } => 202,
      Self::Unauthorized { .. } => 403,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotificationRecord {
  pub input:     NewNotificationInput,
  pub output:    NewNotificationOutput,
  pub logged_at: DateTime<Utc>,
}

// ─── Notification detail ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetNotificationDetailInput {
  pub api_key: String,
  pub iun:     String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GetNotificationDetailOutput {
  /// `200`
  Found { returned: Box<FullSentNotification> },
  /// `403`
  Unauthorized { returned: UnauthorizedMessageBody },
  /// `404`, no body.
  NotFound,
}

impl GetNotificationDetailOutput {
  pub fn status_code(&self) -> u16 {
    match self {
      Self::Found { .. } => 200,
      Self::Unauthorized { .. } => 403,
      Self::NotFound => 404,
    }
  }

  /// The notification returned with a `200`, if any.
  pub fn notification(&self) -> Option<&FullSentNotification> {
    match self {
      Self::Found { returned } => Some(returned.as_ref()),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetNotificationDetailRecord {
  pub input:     GetNotificationDetailInput,
  pub output:    GetNotificationDetailOutput,
  pub logged_at: DateTime<Utc>,
}

// ─── Cancel notification ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelNotificationInput {
  pub api_key: String,
  pub iun:     String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CancelNotificationOutput {
  /// `202`
  Accepted { returned: RequestStatus },
  /// `403`
  Unauthorized { returned: UnauthorizedMessageBody },
  /// `404`, no body.
  NotFound,
}

impl CancelNotificationOutput {
  pub fn status_code(&self) -> u16 {
    match self {
      Self::Accepted { .. } => 202,
      Self::Unauthorized { .. } => 403,
      Self::NotFound => 404,
    }
  }
}

/// A request to cancel a notification. An accepted one makes every later
/// projection of `input.iun` report `CANCELLED`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelNotificationRecord {
  pub input:     CancelNotificationInput,
  pub output:    CancelNotificationOutput,
  pub logged_at: DateTime<Utc>,
}

impl CancelNotificationRecord {
  /// The iun this record cancels, if the cancellation was accepted.
  pub fn cancelled_iun(&self) -> Option<&str> {
    match self.output {
      CancelNotificationOutput::Accepted { .. } => Some(&self.input.iun),
      _ => None,
    }
  }
}

// ─── Streams ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStreamInput {
  pub api_key: String,
  pub request: StreamCreationRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CreateStreamOutput {
  /// `201`
  Created { returned: StreamMetadataResponse },
  /// `403`
  Unauthorized { returned: UnauthorizedMessageBody },
}

impl CreateStreamOutput {
  pub fn status_code(&self) -> u16 {
    match self {
      Self::Created { .. } => 201,
      Self::Unauthorized { .. } => 403,
    }
  }
}

/// Creation (or replacement) of an event stream. Identified by the stream id
/// inside its returned metadata; a rejected creation has no identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStreamRecord {
  pub input:     CreateStreamInput,
  pub output:    CreateStreamOutput,
  pub logged_at: DateTime<Utc>,
}

impl CreateStreamRecord {
  pub fn stream(&self) -> Option<&StreamMetadataResponse> {
    match &self.output {
      CreateStreamOutput::Created { returned } => Some(returned),
      CreateStreamOutput::Unauthorized { .. } => None,
    }
  }

  pub fn stream_id(&self) -> Option<Uuid> {
    self.stream().map(|s| s.stream_id)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteStreamInput {
  pub api_key:   String,
  pub stream_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeleteStreamOutput {
  /// `204`
  Deleted,
  /// `403`
  Unauthorized { returned: UnauthorizedMessageBody },
  /// `404`
  NotFound,
}

impl DeleteStreamOutput {
  pub fn status_code(&self) -> u16 {
    match self {
      Self::Deleted => 204,
      Self::Unauthorized { .. } => 403,
      Self::NotFound => 404,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteStreamRecord {
  pub input:     DeleteStreamInput,
  pub output:    DeleteStreamOutput,
  pub logged_at: DateTime<Utc>,
}

// ─── Raw exchanges ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRequest {
  pub method: String,
  pub path:   String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeResponse {
  pub status_code: u16,
}

/// Catch-all record of a raw HTTP exchange. Never rendered in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestResponseRecord {
  pub input:     ExchangeRequest,
  pub output:    ExchangeResponse,
  pub logged_at: DateTime<Utc>,
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// An entry of the interaction log. The variant name doubles as the `type`
/// tag on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Record {
  #[serde(rename = "NewNotificationRecord")]
  NewNotification(NewNotificationRecord),
  #[serde(rename = "GetNotificationDetailRecord")]
  GetNotificationDetail(GetNotificationDetailRecord),
  #[serde(rename = "CancelNotificationRecord")]
  CancelNotification(CancelNotificationRecord),
  #[serde(rename = "CreateStreamRecord")]
  CreateStream(CreateStreamRecord),
  #[serde(rename = "DeleteStreamRecord")]
  DeleteStream(DeleteStreamRecord),
  #[serde(rename = "RequestResponseRecord")]
  RequestResponse(RequestResponseRecord),
}

impl Record {
  /// The `type` tag this record serialises with.
  pub fn discriminant(&self) -> &'static str {
    match self {
      Self::NewNotification(_) => "NewNotificationRecord",
      Self::GetNotificationDetail(_) => "GetNotificationDetailRecord",
      Self::CancelNotification(_) => "CancelNotificationRecord",
      Self::CreateStream(_) => "CreateStreamRecord",
      Self::DeleteStream(_) => "DeleteStreamRecord",
      Self::RequestResponse(_) => "RequestResponseRecord",
    }
  }

  pub fn logged_at(&self) -> DateTime<Utc> {
    match self {
      Self::NewNotification(r) => r.logged_at,
      Self::GetNotificationDetail(r) => r.logged_at,
      Self::CancelNotification(r) => r.logged_at,
      Self::CreateStream(r) => r.logged_at,
      Self::DeleteStream(r) => r.logged_at,
      Self::RequestResponse(r) => r.logged_at,
    }
  }

  pub fn as_create_stream(&self) -> Option<&CreateStreamRecord> {
    match self {
      Self::CreateStream(r) => Some(r),
      _ => None,
    }
  }
}

macro_rules! impl_from_record {
  ($($variant:ident($ty:ty)),* $(,)?) => {
    $(
      impl From<$ty> for Record {
        fn from(r: $ty) -> Self { Self::$variant(r) }
      }
    )*
  };
}

impl_from_record!(
  NewNotification(NewNotificationRecord),
  GetNotificationDetail(GetNotificationDetailRecord),
  CancelNotification(CancelNotificationRecord),
  CreateStream(CreateStreamRecord),
  DeleteStream(DeleteStreamRecord),
  RequestResponse(RequestResponseRecord),
);

/// Parse a JSON array of records, e.g. a seed snapshot for a fresh store.
pub fn parse_records(json: &str) -> Result<Vec<Record>> {
  Ok(serde_json::from_str(json)?)
}
