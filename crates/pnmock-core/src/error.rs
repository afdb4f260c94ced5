//! Error types for `pnmock-core`.
//!
//! Unauthorized and not-found answers are record outputs, not errors. The
//! only repository failure is [`Error::NoRecordsUpdated`].

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// An update-only stream operation found no existing stream to replace.
  #[error("no records were updated: stream {stream_id} does not exist")]
  NoRecordsUpdated { stream_id: Uuid },

  /// The record carries no stream id (its creation was rejected).
  #[error("record does not identify a stream")]
  MissingStreamId,

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
