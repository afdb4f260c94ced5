//! Timeline helpers: the updater applied when a notification changes status,
//! and the fixed pair of entries that mark a cancellation.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::{
  DomainEnv,
  notification::{
    FullSentNotification, NotificationStatus, NotificationStatusHistoryElement,
    TimelineElement, TimelineElementCategory,
  },
};

/// Fixed id carried by every mocked cancellation request.
pub const CANCELLATION_REQUEST_ID: &str = "90e3f130-cb23-4b6b-a0aa-858de7ffb3a0";

/// Move `notification` to `status` as of `at`, appending the timeline element
/// that records the transition and the matching history entry.
///
/// `at` is the time of the record that caused the transition, never the
/// clock, so replaying the same log yields the same timeline.
///
/// Statuses without a timeline category of their own only update the status
/// and history. Cancellation does not go through here; see
/// [`cancellation_elements`].
pub fn update_timeline(
  mut notification: FullSentNotification,
  status: NotificationStatus,
  at: DateTime<Utc>,
) -> FullSentNotification {
  let category = match status {
    NotificationStatus::Accepted => Some(TimelineElementCategory::RequestAccepted),
    _ => None,
  };

  let mut related = Vec::new();
  if let Some(category) = category {
    let element_id = category.element_id(&notification.iun);
    if !notification.has_timeline_element(&element_id) {
      notification.timeline.push(TimelineElement {
        element_id: element_id.clone(),
        timestamp: at,
        category,
        details: json!({ "recIndex": 0 }),
        legal_facts_ids: Vec::new(),
      });
    }
    related.push(element_id);
  }

  notification.notification_status = status;
  notification
    .notification_status_history
    .push(NotificationStatusHistoryElement {
      status,
      active_from: at,
      related_timeline_elements: related,
    });
  notification
}

/// The two entries a cancelled notification's timeline ends with: the
/// cancellation request, then the confirmed cancellation.
pub fn cancellation_elements(env: &DomainEnv, iun: &str) -> [TimelineElement; 2] {
  let now = env.now();
  [
    TimelineElement {
      element_id:      TimelineElementCategory::NotificationCancellationRequest
        .element_id(iun),
      timestamp:       now,
      category:        TimelineElementCategory::NotificationCancellationRequest,
      details:         json!({ "cancellationRequestId": CANCELLATION_REQUEST_ID }),
      legal_facts_ids: Vec::new(),
    },
    TimelineElement {
      element_id:      TimelineElementCategory::NotificationCancelled.element_id(iun),
      timestamp:       now,
      category:        TimelineElementCategory::NotificationCancelled,
      details:         json!({
        "notificationCost": 100,
        "notRefinedRecipientIndexes": [0]
      }),
      legal_facts_ids: Vec::new(),
    },
  ]
}
