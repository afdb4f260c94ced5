//! Runtime configuration.

use std::path::PathBuf;

use pnmock_core::env::{DEFAULT_API_KEY, DEFAULT_SENDER_PA_ID};
use serde::Deserialize;

/// Runtime server configuration, deserialised from `config.toml` and
/// `PNMOCK_*` environment variables. Every field has a default, so the
/// server starts with no configuration at all.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:         String,
  pub port:         u16,
  /// The only key the emulated platform accepts.
  pub api_key:      String,
  /// Sender administration stamped on every accepted notification.
  pub sender_pa_id: String,
  /// JSON array of records to start from instead of an empty log.
  pub seed_path:    Option<PathBuf>,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:         "127.0.0.1".to_string(),
      port:         3000,
      api_key:      DEFAULT_API_KEY.to_string(),
      sender_pa_id: DEFAULT_SENDER_PA_ID.to_string(),
      seed_path:    None,
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}
