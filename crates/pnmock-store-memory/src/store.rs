//! [`MemoryStore`]: the in-memory implementation of [`RecordRepository`].

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::Span;

use pnmock_core::{
  Error, Result,
  record::{CancelNotificationRecord, CreateStreamRecord, DeleteStreamRecord, Record},
  store::RecordRepository,
  stream::matches_stream,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// The record log, held in memory.
///
/// Clones share the same log.
#[derive(Clone)]
pub struct MemoryStore {
  records: Arc<RwLock<Vec<Record>>>,
  /// Parent of every diagnostic event the store emits.
  span:    Span,
}

impl MemoryStore {
  /// An empty store.
  pub fn new() -> Self { Self::with_records(Vec::new()) }

  /// A store pre-populated with `records`, e.g. a seed snapshot.
  pub fn with_records(records: Vec<Record>) -> Self {
    Self {
      records: Arc::new(RwLock::new(records)),
      span:    tracing::info_span!("record_store"),
    }
  }

  /// Replace the span the store logs under.
  pub fn with_span(mut self, span: Span) -> Self {
    self.span = span;
    self
  }

  /// Emit the diagnostic line for a record entering the log.
  fn log_record(&self, record: &Record) {
    if let Record::RequestResponse(_) = record {
      tracing::debug!(
        parent: &self.span,
        "a RequestResponseRecord was recorded; its payload is not shown"
      );
      return;
    }

    match serde_json::to_string(record) {
      Ok(json) => tracing::debug!(
        parent: &self.span,
        kind = record.discriminant(),
        record = %json,
        "record item"
      ),
      Err(e) => tracing::warn!(
        parent: &self.span,
        kind = record.discriminant(),
        error = %e,
        "record item could not be rendered"
      ),
    }
  }
}

impl Default for MemoryStore {
  fn default() -> Self { Self::new() }
}

/// Keep only the records that do not belong to `record`'s stream, then append
/// `record`. Returns how many records were dropped.
fn replace_stream(log: &mut Vec<Record>, record: CreateStreamRecord) -> usize {
  let before = log.len();
  if let Some(stream_id) = record.stream_id() {
    log.retain(|r| matches_stream(stream_id, r));
  }
  let removed = before - log.len();
  log.push(record.into());
  removed
}

// ─── RecordRepository impl ───────────────────────────────────────────────────

impl RecordRepository for MemoryStore {
  async fn insert(&self, record: Record) -> Result<Record> {
    self.records.write().await.push(record.clone());
    self.log_record(&record);
    Ok(record)
  }

  async fn list(&self) -> Result<Vec<Record>> {
    Ok(self.records.read().await.clone())
  }

  async fn remove_stream_record(&self, record: DeleteStreamRecord) -> Result<Vec<Record>> {
    let stream_id = record.input.stream_id;
    let mut log = self.records.write().await;
    let before = log.len();
    log.retain(|r| matches_stream(stream_id, r));

    tracing::debug!(
      parent: &self.span,
      %stream_id,
      removed = before - log.len(),
      "stream removed"
    );
    Ok(log.clone())
  }

  async fn update_stream_record(&self, record: CreateStreamRecord) -> Result<Vec<Record>> {
    let stream_id = record.stream_id();
    let mut log = self.records.write().await;
    let removed = replace_stream(&mut log, record);

    tracing::debug!(parent: &self.span, ?stream_id, removed, "stream upserted");
    Ok(log.clone())
  }

  async fn update_stream_record_returning_only_the_one_updated_stream(
    &self,
    record: CreateStreamRecord,
  ) -> Result<CreateStreamRecord> {
    let stream_id = record.stream_id().ok_or(Error::MissingStreamId)?;
    let mut log = self.records.write().await;

    if log.iter().all(|r| matches_stream(stream_id, r)) {
      tracing::debug!(parent: &self.span, %stream_id, "no stream to update");
      return Err(Error::NoRecordsUpdated { stream_id });
    }

    let removed = replace_stream(&mut log, record.clone());
    tracing::debug!(parent: &self.span, %stream_id, removed, "stream updated");
    Ok(record)
  }

  async fn remove_notification_record(
    &self,
    record: CancelNotificationRecord,
  ) -> Result<CancelNotificationRecord> {
    let mut log = self.records.write().await;
    log.push(record.clone().into());

    for item in log.iter().filter(|r| !matches!(r, Record::RequestResponse(_))) {
      tracing::debug!(
        parent: &self.span,
        kind = item.discriminant(),
        logged_at = %item.logged_at(),
        "item store"
      );
    }
    tracing::info!(
      parent: &self.span,
      iun = %record.input.iun,
      status_code = record.output.status_code(),
      "notification cancellation recorded"
    );
    Ok(record)
  }
}
