//! Core types and trait definitions for the pnmock notification-platform mock.
//!
//! The mock is event-sourced: every interaction with the emulated API becomes
//! a [`record::Record`] appended to a log, and the visible state of each
//! notification is recomputed from that log on every read by
//! [`snapshot::compute_snapshot`].
//!
//! This crate has no HTTP or storage dependencies.

// Native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod auth;
pub mod cancel;
pub mod detail;
pub mod env;
pub mod error;
pub mod notification;
pub mod record;
pub mod send;
pub mod snapshot;
pub mod store;
pub mod stream;
pub mod timeline;

pub use env::DomainEnv;
pub use error::{Error, Result};
