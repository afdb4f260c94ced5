//! The "cancel notification" command.

use crate::{
  DomainEnv,
  auth::authorize_api_key,
  notification::RequestStatus,
  record::{
    CancelNotificationInput, CancelNotificationOutput, CancelNotificationRecord,
    Record,
  },
  snapshot::compute_snapshot,
};

/// Build the record of a cancellation request.
///
/// The cancellation is accepted (`202`) when `input.iun` projects to a
/// notification, `404` otherwise. Once the accepted record is in the log the
/// projector reports the notification as `CANCELLED`.
pub fn make_cancel_notification_record(
  env: &DomainEnv,
  input: CancelNotificationInput,
  records: &[Record],
) -> CancelNotificationRecord {
  let output = match authorize_api_key(env, &input.api_key) {
    Err(returned) => CancelNotificationOutput::Unauthorized { returned },
    Ok(()) => {
      let exists = compute_snapshot(env, records)
        .iter()
        .filter_map(|entry| entry.as_ref().ok())
        .any(|n| n.iun == input.iun);
      if exists {
        CancelNotificationOutput::Accepted {
          returned: RequestStatus::ok(),
        }
      } else {
        CancelNotificationOutput::NotFound
      }
    }
  };

  CancelNotificationRecord {
    input,
    output,
    logged_at: env.now(),
  }
}
