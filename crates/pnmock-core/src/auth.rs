//! API-key authorization check.

use crate::{DomainEnv, record::UnauthorizedMessageBody};

/// Accept `api_key` only if it equals the key configured on `env`.
///
/// A rejection is an ordinary value, turned into a `403` record output by the
/// caller.
pub fn authorize_api_key(
  env: &DomainEnv,
  api_key: &str,
) -> Result<(), UnauthorizedMessageBody> {
  if api_key == env.api_key {
    Ok(())
  } else {
    Err(UnauthorizedMessageBody::default())
  }
}
