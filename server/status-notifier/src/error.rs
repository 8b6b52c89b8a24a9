//! Structured error types for the notifier.
//!
//! Every variant is fatal for the run; the pipeline never retries or
//! continues past one.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifierError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  LogInit(#[from] LogInitError),

  #[error(transparent)]
  Fetch(#[from] FetchError),

  #[error(transparent)]
  Write(#[from] WriteError),
}

/// Invalid or missing configuration value.
#[derive(Debug, Error)]
#[error("config: {field}: {reason}")]
pub struct ConfigError {
  pub field: String,
  pub reason: String,
}

impl ConfigError {
  pub fn new(field: &str, reason: impl Into<String>) -> Self {
    Self {
      field: field.to_string(),
      reason: reason.into(),
    }
  }
}

/// Failure to obtain or decode an incident collection.
#[derive(Debug, Error)]
pub enum FetchError {
  #[error("fetch: fixture not found: {}", path.display())]
  NotFound { path: PathBuf },

  #[error("fetch: cannot read {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("fetch: {url}: {reason}")]
  Transport { url: String, reason: String },

  #[error("decode: {label}: {source}")]
  Decode {
    label: String,
    #[source]
    source: serde_json::Error,
  },
}

impl FetchError {
  pub fn transport(url: &str, reason: impl Into<String>) -> Self {
    Self::Transport {
      url: url.to_string(),
      reason: reason.into(),
    }
  }
}

/// Failure to serialize or persist the notification payload.
#[derive(Debug, Error)]
pub enum WriteError {
  #[error("serialize: {0}")]
  Serialize(#[from] serde_json::Error),

  #[error("persist: {}: {source}", path.display())]
  Persist {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// The log directory or the dated log file could not be prepared.
#[derive(Debug, Error)]
pub enum LogInitError {
  #[error("log init: cannot create directory {}: {source}", path.display())]
  CreateDir {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("log init: cannot open {}: {source}", path.display())]
  OpenFile {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}
