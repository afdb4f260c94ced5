//! The snapshot projector. Folds the record log into the current state of
//! every notification.
//!
//! Nothing here is stored. Each call replays the whole log, so the result is
//! a pure function of the records and the environment's clock.
//!
//! Cancellation is sticky: once any record reflects the cancellation of an
//! iun (an accepted `CancelNotificationRecord`, or a detail record that
//! already returned the notification as `CANCELLED`), every projection of that
//! iun reports it cancelled.

use std::collections::HashSet;

use thiserror::Error;

use crate::{
  DomainEnv,
  notification::{
    FullSentNotification, NotificationStatus, NotificationStatusHistoryElement,
    TimelineElementCategory,
  },
  record::{
    GetNotificationDetailOutput, NewNotificationOutput, NewNotificationRecord,
    Record,
  },
  timeline::{cancellation_elements, update_timeline},
};

/// Why a record that would have produced a notification did not.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
  #[error(
    "notification request {pa_protocol_number:?} was rejected with status {status_code}"
  )]
  Rejected {
    pa_protocol_number: String,
    status_code:        u16,
  },
}

/// One entry per distinct iun in first-seen order, interleaved with one
/// failure per rejected send request.
pub type Snapshot = Vec<Result<FullSentNotification, SnapshotError>>;

/// Project `records` into the current state of every notification.
pub fn compute_snapshot(env: &DomainEnv, records: &[Record]) -> Snapshot {
  let cancelled = cancelled_iuns(records);
  let mut seen = HashSet::new();

  records
    .iter()
    .filter_map(|record| reduce(env, record, &mut seen))
    .map(|entry| {
      entry
        .map(|n| apply_cancellation(env, n, &cancelled))
        .map(|n| exact_full_sent_notification(env, n))
    })
    .collect()
}

/// Every iun whose cancellation is reflected somewhere in the log.
pub fn cancelled_iuns(records: &[Record]) -> HashSet<&str> {
  records
    .iter()
    .filter_map(|record| match record {
      Record::CancelNotification(r) => r.cancelled_iun(),
      Record::GetNotificationDetail(r) => r
        .output
        .notification()
        .filter(|n| n.notification_status == NotificationStatus::Cancelled)
        .map(|n| n.iun.as_str()),
      Record::NewNotification(_)
      | Record::CreateStream(_)
      | Record::DeleteStream(_)
      | Record::RequestResponse(_) => None,
    })
    .collect()
}

/// The contribution of a single record: a new notification the first time an
/// iun is seen, a failure for a rejected send, nothing otherwise.
fn reduce(
  env: &DomainEnv,
  record: &Record,
  seen: &mut HashSet<String>,
) -> Option<Result<FullSentNotification, SnapshotError>> {
  match record {
    Record::NewNotification(r) => match &r.output {
      NewNotificationOutput::Accepted { iun, .. } => seen
        .insert(iun.clone())
        .then(|| Ok(make_full_sent_notification(env, r, iun))),
      rejected @ NewNotificationOutput::Unauthorized { .. } => {
        Some(Err(SnapshotError::Rejected {
          pa_protocol_number: r.input.request.pa_protocol_number.clone(),
          status_code:        rejected.status_code(),
        }))
      }
    },
    // A notification observed through an earlier detail call is tracked even
    // when the log holds no send for it, e.g. in a seeded snapshot.
    Record::GetNotificationDetail(r) => match &r.output {
      GetNotificationDetailOutput::Found { returned } => seen
        .insert(returned.iun.clone())
        .then(|| Ok(returned.as_ref().clone())),
      GetNotificationDetailOutput::Unauthorized { .. }
      | GetNotificationDetailOutput::NotFound => None,
    },
    Record::CancelNotification(_)
    | Record::CreateStream(_)
    | Record::DeleteStream(_)
    | Record::RequestResponse(_) => None,
  }
}

/// The notification an accepted send creates: `ACCEPTED`, sent when the send
/// was logged, with its acceptance on the timeline.
fn make_full_sent_notification(
  env: &DomainEnv,
  record: &NewNotificationRecord,
  iun: &str,
) -> FullSentNotification {
  let notification = FullSentNotification::from_request(
    &record.input.request,
    iun,
    &env.sender_pa_id,
    record.logged_at,
  );
  update_timeline(notification, NotificationStatus::Accepted, record.logged_at)
}

/// Mark `notification` cancelled if its iun is in `cancelled` and it is not
/// cancelled yet.
fn apply_cancellation(
  env: &DomainEnv,
  mut notification: FullSentNotification,
  cancelled: &HashSet<&str>,
) -> FullSentNotification {
  let status = notification.notification_status;
  if !cancelled.contains(notification.iun.as_str())
    || !status.can_transition_to(NotificationStatus::Cancelled)
  {
    return notification;
  }

  notification.notification_status = NotificationStatus::Cancelled;
  notification.cancelled_iun = Some(notification.iun.clone());
  notification
    .notification_status_history
    .push(NotificationStatusHistoryElement {
      status:                    NotificationStatus::Cancelled,
      active_from:               env.now(),
      related_timeline_elements: vec![
        TimelineElementCategory::NotificationCancelled.element_id(&notification.iun),
      ],
    });
  notification
}

/// Shape a projected notification for the public API.
///
/// Status, `sentAt` and history are kept exactly as projected. A cancelled
/// notification's timeline ends with the cancellation request and the
/// confirmed cancellation; each is appended only if missing, so a notification
/// seeded from an earlier cancelled response is not extended twice.
pub fn exact_full_sent_notification(
  env: &DomainEnv,
  mut notification: FullSentNotification,
) -> FullSentNotification {
  if notification.notification_status == NotificationStatus::Cancelled {
    for element in cancellation_elements(env, &notification.iun) {
      if !notification.has_timeline_element(&element.element_id) {
        notification.timeline.push(element);
      }
    }
  }
  notification
}
