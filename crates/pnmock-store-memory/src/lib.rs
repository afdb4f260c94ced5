//! In-memory backend for the pnmock record log.
//!
//! The log is a plain `Vec` behind a single [`tokio::sync::RwLock`]; nothing
//! outlives the process.

mod store;

pub use store::MemoryStore;
