//! The domain environment threaded through every record factory.
//!
//! Holds the collaborators the core consumes but does not own: the time
//! source, the accepted API key, and the identity of the sending
//! administration.

use std::sync::Arc;

use chrono::{DateTime, Utc};

// ─── Time source ─────────────────────────────────────────────────────────────

/// Source of "now" for everything the core timestamps.
pub trait Clock: Send + Sync + 'static {
  fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> { Utc::now() }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> { self.0 }
}

// ─── DomainEnv ───────────────────────────────────────────────────────────────

/// The API key accepted when none is configured.
pub const DEFAULT_API_KEY: &str = "key-value";

/// The sender id stamped on notifications when none is configured.
pub const DEFAULT_SENDER_PA_ID: &str = "aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa";

/// Collaborators injected into the record factories and the projector.
#[derive(Clone)]
pub struct DomainEnv {
  /// The only API key the authorization check accepts.
  pub api_key:      String,
  /// Written into `senderPaId` of every projected notification.
  pub sender_pa_id: String,
  pub clock:        Arc<dyn Clock>,
}

impl DomainEnv {
  pub fn new(
    api_key: impl Into<String>,
    sender_pa_id: impl Into<String>,
    clock: Arc<dyn Clock>,
  ) -> Self {
    Self {
      api_key: api_key.into(),
      sender_pa_id: sender_pa_id.into(),
      clock,
    }
  }

  /// An environment with the default key and sender, frozen at `now`.
  pub fn fixed(now: DateTime<Utc>) -> Self {
    Self::new(DEFAULT_API_KEY, DEFAULT_SENDER_PA_ID, Arc::new(FixedClock(now)))
  }

  pub fn now(&self) -> DateTime<Utc> { self.clock.now() }
}

impl Default for DomainEnv {
  fn default() -> Self {
    Self::new(DEFAULT_API_KEY, DEFAULT_SENDER_PA_ID, Arc::new(SystemClock))
  }
}

impl std::fmt::Debug for DomainEnv {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("DomainEnv")
      .field("sender_pa_id", &self.sender_pa_id)
      .field("now", &self.now())
      .finish_non_exhaustive()
  }
}
