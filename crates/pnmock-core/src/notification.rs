//! Notification types as they appear on the wire.
//!
//! [`FullSentNotification`] is the projected entity: it is never stored as
//! such, only derived from the record log by the snapshot projector.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Status ──────────────────────────────────────────────────────────────────

/// The lifecycle status of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationStatus {
  InValidation,
  Accepted,
  Refused,
  Delivering,
  Delivered,
  Viewed,
  EffectiveDate,
  Paid,
  Unreachable,
  Cancelled,
}

impl NotificationStatus {
  /// Whether the mock models a move from `self` to `next`.
  ///
  /// Only `ACCEPTED → CANCELLED` is modelled.
  pub fn can_transition_to(self, next: Self) -> bool {
    matches!((self, next), (Self::Accepted, Self::Cancelled))
  }
}

/// One entry of `notificationStatusHistory`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationStatusHistoryElement {
  pub status:                   NotificationStatus,
  pub active_from:              DateTime<Utc>,
  /// Ids of the timeline elements that caused this status.
  pub related_timeline_elements: Vec<String>,
}

// ─── Timeline ────────────────────────────────────────────────────────────────

/// Timeline categories. The mock produces the first three; any other
/// platform category, e.g. from a seeded detail record, is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimelineElementCategory {
  RequestAccepted,
  NotificationCancellationRequest,
  NotificationCancelled,
  #[serde(untagged)]
  Other(String),
}

impl TimelineElementCategory {
  /// The wire name, also used as the prefix of element ids.
  pub fn as_str(&self) -> &str {
    match self {
      Self::RequestAccepted => "REQUEST_ACCEPTED",
      Self::NotificationCancellationRequest => "NOTIFICATION_CANCELLATION_REQUEST",
      Self::NotificationCancelled => "NOTIFICATION_CANCELLED",
      Self::Other(name) => name.as_str(),
    }
  }

  /// The entity-scoped element id, `<CATEGORY>.IUN_<iun>`.
  pub fn element_id(&self, iun: &str) -> String {
    format!("{}.IUN_{iun}", self.as_str())
  }
}

/// Reference to a legal fact attached to a timeline element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalFactsId {
  pub key:      String,
  pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineElement {
  pub element_id:      String,
  pub timestamp:       DateTime<Utc>,
  pub category:        TimelineElementCategory,
  /// Category-specific payload; opaque to the mock.
  pub details:         serde_json::Value,
  #[serde(default)]
  pub legal_facts_ids: Vec<LegalFactsId>,
}

// ─── Request ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecipientType {
  /// Natural person.
  PF,
  /// Legal person.
  PG,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecipient {
  pub recipient_type:   RecipientType,
  pub tax_id:           String,
  pub denomination:     String,
  pub digital_domicile: Option<serde_json::Value>,
  pub physical_address: Option<serde_json::Value>,
}

/// Body of a "send notification" request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotificationRequest {
  pub pa_protocol_number:          String,
  pub subject:                     String,
  #[serde(rename = "abstract")]
  pub abstract_:                   Option<String>,
  pub recipients:                  Vec<NotificationRecipient>,
  #[serde(default)]
  pub documents:                   Vec<serde_json::Value>,
  pub notification_fee_policy:     String,
  pub physical_communication_type: String,
  pub group:                       Option<String>,
  pub idempotence_token:           Option<String>,
  pub taxonomy_code:               Option<String>,
}

/// Body of the `202` answer to a "send notification" request.
///
/// `notificationRequestId` is the base64 encoding of the assigned iun.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotificationResponse {
  pub notification_request_id: String,
  pub pa_protocol_number:      String,
  pub idempotence_token:       Option<String>,
}

/// Generic acknowledgement body, e.g. for an accepted cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestStatus {
  pub status:  String,
  #[serde(default)]
  pub details: Vec<String>,
}

impl RequestStatus {
  pub fn ok() -> Self {
    Self {
      status:  "OK".to_owned(),
      details: Vec::new(),
    }
  }
}

// ─── FullSentNotification ────────────────────────────────────────────────────

/// The current, public view of a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullSentNotification {
  pub iun:                         String,
  pub sent_at:                     DateTime<Utc>,
  pub sender_pa_id:                String,
  pub pa_protocol_number:          String,
  pub subject:                     String,
  #[serde(rename = "abstract")]
  pub abstract_:                   Option<String>,
  pub recipients:                  Vec<NotificationRecipient>,
  #[serde(default)]
  pub documents:                   Vec<serde_json::Value>,
  pub documents_available:         bool,
  pub notification_fee_policy:     String,
  pub physical_communication_type: String,
  pub group:                       Option<String>,
  pub idempotence_token:           Option<String>,
  pub taxonomy_code:               Option<String>,
  pub notification_status:         NotificationStatus,
  pub notification_status_history: Vec<NotificationStatusHistoryElement>,
  pub timeline:                    Vec<TimelineElement>,
  /// Set once the notification has been cancelled.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub cancelled_iun:               Option<String>,
}

impl FullSentNotification {
  /// A freshly sent notification: `ACCEPTED`, empty history and timeline.
  pub fn from_request(
    request: &NewNotificationRequest,
    iun: &str,
    sender_pa_id: &str,
    sent_at: DateTime<Utc>,
  ) -> Self {
    Self {
      iun: iun.to_owned(),
      sent_at,
      sender_pa_id: sender_pa_id.to_owned(),
      pa_protocol_number: request.pa_protocol_number.clone(),
      subject: request.subject.clone(),
      abstract_: request.abstract_.clone(),
      recipients: request.recipients.clone(),
      documents: request.documents.clone(),
      documents_available: true,
      notification_fee_policy: request.notification_fee_policy.clone(),
      physical_communication_type: request.physical_communication_type.clone(),
      group: request.group.clone(),
      idempotence_token: request.idempotence_token.clone(),
      taxonomy_code: request.taxonomy_code.clone(),
      notification_status: NotificationStatus::Accepted,
      notification_status_history: Vec::new(),
      timeline: Vec::new(),
      cancelled_iun: None,
    }
  }

  pub fn has_timeline_element(&self, element_id: &str) -> bool {
    self.timeline.iter().any(|e| e.element_id == element_id)
  }
}
