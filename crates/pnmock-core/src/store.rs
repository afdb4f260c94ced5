//! The `RecordRepository` trait.
//!
//! The trait is implemented by storage backends (e.g. `pnmock-store-memory`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  Result,
  record::{
    CancelNotificationRecord, CreateStreamRecord, DeleteStreamRecord, Record,
  },
};

/// Abstraction over the record log.
///
/// Each method is atomic with respect to the others: a backend serialises
/// every read-modify-write of the log behind a single lock. Only
/// [`update_stream_record_returning_only_the_one_updated_stream`] can fail,
/// with [`crate::Error::NoRecordsUpdated`] or [`crate::Error::MissingStreamId`].
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
///
/// [`update_stream_record_returning_only_the_one_updated_stream`]:
///   RecordRepository::update_stream_record_returning_only_the_one_updated_stream
pub trait RecordRepository: Send + Sync {
  // ── Log ───────────────────────────────────────────────────────────────

  /// Append `record` to the end of the log and return it.
  fn insert(
    &self,
    record: Record,
  ) -> impl Future<Output = Result<Record>> + Send + '_;

  /// The whole log, in insertion order.
  fn list(&self) -> impl Future<Output = Result<Vec<Record>>> + Send + '_;

  // ── Streams ───────────────────────────────────────────────────────────

  /// Drop every creation of `record.input.stream_id` and return the log.
  fn remove_stream_record(
    &self,
    record: DeleteStreamRecord,
  ) -> impl Future<Output = Result<Vec<Record>>> + Send + '_;

  /// Upsert: drop every creation sharing `record`'s stream id, append
  /// `record`, and return the log.
  fn update_stream_record(
    &self,
    record: CreateStreamRecord,
  ) -> impl Future<Output = Result<Vec<Record>>> + Send + '_;

  /// Update-only: like [`RecordRepository::update_stream_record`], but fails
  /// and leaves the log untouched when no creation was dropped.
  fn update_stream_record_returning_only_the_one_updated_stream(
    &self,
    record: CreateStreamRecord,
  ) -> impl Future<Output = Result<CreateStreamRecord>> + Send + '_;

  // ── Notifications ─────────────────────────────────────────────────────

  /// Append a cancellation record and return it. Earlier records are left
  /// untouched; the cancelled view is derived by the snapshot projector.
  fn remove_notification_record(
    &self,
    record: CancelNotificationRecord,
  ) -> impl Future<Output = Result<CancelNotificationRecord>> + Send + '_;
}
