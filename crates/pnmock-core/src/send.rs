//! The "send notification" command and iun generation.

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  DomainEnv,
  auth::authorize_api_key,
  notification::NewNotificationResponse,
  record::{NewNotificationInput, NewNotificationOutput, NewNotificationRecord},
};

/// Letters the platform uses in iuns.
const IUN_ALPHABET: &[u8] = b"ADEGHJKLMNPQRUVWXYZ";

/// Generate an iun of the form `XXXX-XXXX-XXXX-YYYYMM-X-N`.
pub fn generate_iun(now: DateTime<Utc>) -> String {
  let bytes = Uuid::new_v4().into_bytes();
  let letter = |b: u8| char::from(IUN_ALPHABET[usize::from(b) % IUN_ALPHABET.len()]);
  let group = |range: std::ops::Range<usize>| -> String {
    bytes[range].iter().copied().map(letter).collect()
  };

  format!(
    "{}-{}-{}-{}-{}-{}",
    group(0..4),
    group(4..8),
    group(8..12),
    now.format("%Y%m"),
    letter(bytes[12]),
    bytes[13] % 10,
  )
}

/// Build the record of a send request. An authorized request is always
/// accepted and assigned a fresh iun; `notificationRequestId` is the base64
/// encoding of that iun.
pub fn make_new_notification_record(
  env: &DomainEnv,
  input: NewNotificationInput,
) -> NewNotificationRecord {
  let now = env.now();
  let output = match authorize_api_key(env, &input.api_key) {
    Err(returned) => NewNotificationOutput::Unauthorized { returned },
    Ok(()) => {
      let iun = generate_iun(now);
      NewNotificationOutput::Accepted {
        returned: NewNotificationResponse {
          notification_request_id: B64.encode(&iun),
          pa_protocol_number:      input.request.pa_protocol_number.clone(),
          idempotence_token:       input.request.idempotence_token.clone(),
        },
        iun,
      }
    }
  };

  NewNotificationRecord {
    input,
    output,
    logged_at: now,
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn iun_has_the_platform_shape() {
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let iun = generate_iun(now);
    let parts: Vec<&str> = iun.split('-').collect();

    assert_eq!(parts.len(), 6);
    assert!(parts[..3].iter().all(|p| p.len() == 4));
    assert_eq!(parts[3], "202403");
    assert!(IUN_ALPHABET.contains(&parts[4].as_bytes()[0]));
    assert!(parts[5].parse::<u8>().unwrap() < 10);
  }

  #[test]
  fn iuns_are_unique() {
    let now = Utc::now();
    assert_ne!(generate_iun(now), generate_iun(now));
  }
}
