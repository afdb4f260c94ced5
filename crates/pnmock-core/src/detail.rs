//! The "get notification detail" query.

use crate::{
  DomainEnv,
  auth::authorize_api_key,
  record::{
    GetNotificationDetailInput, GetNotificationDetailOutput,
    GetNotificationDetailRecord, Record,
  },
  snapshot::compute_snapshot,
};

/// Answer a detail query against `records`.
///
/// - `403` if the API key is rejected; the log is not consulted.
/// - `200` with the first projected notification whose iun matches.
/// - `404` otherwise.
///
/// The returned record describes this call; persisting it is the caller's
/// job.
pub fn make_get_notification_detail_record(
  env: &DomainEnv,
  input: GetNotificationDetailInput,
  records: &[Record],
) -> GetNotificationDetailRecord {
  let output = match authorize_api_key(env, &input.api_key) {
    Err(returned) => GetNotificationDetailOutput::Unauthorized { returned },
    Ok(()) => compute_snapshot(env, records)
      .into_iter()
      .filter_map(Result::ok)
      .find(|n| n.iun == input.iun)
      .map_or(GetNotificationDetailOutput::NotFound, |n| {
        GetNotificationDetailOutput::Found {
          returned: Box::new(n),
        }
      }),
  };

  GetNotificationDetailRecord {
    input,
    output,
    logged_at: env.now(),
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;
  use crate::{
    env::DEFAULT_API_KEY,
    notification::NewNotificationRequest,
    record::NewNotificationInput,
    send::make_new_notification_record,
  };

  fn sent(env: &DomainEnv) -> (String, Record) {
    let record = make_new_notification_record(env, NewNotificationInput {
      api_key: DEFAULT_API_KEY.into(),
      request: NewNotificationRequest {
        pa_protocol_number:          "P-1".into(),
        subject:                     "subject".into(),
        abstract_:                   None,
        recipients:                  Vec::new(),
        documents:                   Vec::new(),
        notification_fee_policy:     "FLAT_RATE".into(),
        physical_communication_type: "REGISTERED_LETTER_890".into(),
        group:                       None,
        idempotence_token:           None,
        taxonomy_code:               None,
      },
    });
    let iun = match &record.output {
      crate::record::NewNotificationOutput::Accepted { iun, .. } => iun.clone(),
      other => panic!("unexpected output {other:?}"),
    };
    (iun, record.into())
  }

  fn query(api_key: &str, iun: &str) -> GetNotificationDetailInput {
    GetNotificationDetailInput {
      api_key: api_key.into(),
      iun:     iun.into(),
    }
  }

  #[test]
  fn found_returns_the_projected_notification() {
    let env = DomainEnv::fixed(Utc::now());
    let (iun, record) = sent(&env);

    let detail = make_get_notification_detail_record(&env, query(DEFAULT_API_KEY, &iun), &[record]);
    assert_eq!(detail.output.status_code(), 200);
    assert_eq!(detail.output.notification().unwrap().iun, iun);
  }

  #[test]
  fn invalid_key_is_unauthorized_regardless_of_the_log() {
    let env = DomainEnv::fixed(Utc::now());
    let (iun, record) = sent(&env);

    let detail = make_get_notification_detail_record(&env, query("nope", &iun), &[record]);
    assert_eq!(detail.output.status_code(), 403);
    assert!(detail.output.notification().is_none());
  }

  #[test]
  fn unknown_iun_is_not_found() {
    let env = DomainEnv::fixed(Utc::now());
    let (_, record) = sent(&env);

    let detail =
      make_get_notification_detail_record(&env, query(DEFAULT_API_KEY, "MISSING"), &[record]);
    assert_eq!(detail.output, GetNotificationDetailOutput::NotFound);
  }
}
