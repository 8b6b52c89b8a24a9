//! Log sink: stdout plus a dated, append-only file under the log directory.
//!
//! The subscriber is not installed globally. `LogSink::in_scope` runs a
//! closure with the sink as the current dispatcher, so the pipeline and its
//! components log through the handle they were given.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;
use tracing::Dispatch;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::LogInitError;

/// Separator written at the start and end of every run.
pub fn banner() -> String {
  "*".repeat(70)
}

/// `<log_dir>/log-YYYYMMDD.log`
pub fn log_file_path(log_dir: &Path, date: NaiveDate) -> PathBuf {
  log_dir.join(format!("log-{}.log", date.format("%Y%m%d")))
}

/// Create the log directory if needed and open the day's file for appending.
pub fn open_log_file(log_dir: &Path, date: NaiveDate) -> Result<(PathBuf, File), LogInitError> {
  fs::create_dir_all(log_dir).map_err(|source| LogInitError::CreateDir {
    path: log_dir.to_path_buf(),
    source,
  })?;

  let path = log_file_path(log_dir, date);
  let file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(&path)
    .map_err(|source| LogInitError::OpenFile {
      path: path.clone(),
      source,
    })?;
  Ok((path, file))
}

/// Handle to the combined console + file subscriber.
#[derive(Debug)]
pub struct LogSink {
  dispatch: Dispatch,
  path: PathBuf,
}

impl LogSink {
  /// Path of the file this sink appends to.
  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Run `f` with this sink receiving all `tracing` events on the current thread.
  pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
    tracing::dispatcher::with_default(&self.dispatch, f)
  }
}

/// Prepare the log directory and file, and build the sink.
///
/// Level filter comes from `RUST_LOG`, defaulting to `info`.
pub fn init(log_dir: &Path, date: NaiveDate) -> Result<LogSink, LogInitError> {
  let (path, file) = open_log_file(log_dir, date)?;

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

  let subscriber = tracing_subscriber::registry()
    .with(filter)
    .with(
      fmt::layer()
        .with_writer(std::io::stdout)
        .with_file(true)
        .with_line_number(true),
    )
    .with(
      fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true),
    );

  Ok(LogSink {
    dispatch: Dispatch::new(subscriber),
    path,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
  }

  #[test]
  fn file_name_carries_compact_date() {
    let path = log_file_path(Path::new("./logs/"), day());
    assert!(path.ends_with("log-20240307.log"));
  }

  #[test]
  fn creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("nested").join("logs");
    let sink = init(&log_dir, day()).unwrap();
    assert!(log_dir.is_dir());
    assert!(sink.path().is_file());
  }

  #[test]
  fn events_in_scope_reach_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let sink = init(dir.path(), day()).unwrap();
    sink.in_scope(|| tracing::warn!("no unresolved incidents found"));

    let text = fs::read_to_string(sink.path()).unwrap();
    assert!(text.contains("WARN"));
    assert!(text.contains("no unresolved incidents found"));
  }

  #[test]
  fn same_day_runs_append() {
    let dir = tempfile::tempdir().unwrap();
    init(dir.path(), day()).unwrap().in_scope(|| tracing::warn!("first run"));
    init(dir.path(), day()).unwrap().in_scope(|| tracing::warn!("second run"));

    let text = fs::read_to_string(log_file_path(dir.path(), day())).unwrap();
    assert!(text.contains("first run"));
    assert!(text.contains("second run"));
  }

  #[test]
  fn log_dir_that_is_a_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("logs");
    fs::write(&blocker, "not a directory").unwrap();
    match init(&blocker, day()) {
      Err(LogInitError::CreateDir { path, .. }) => assert_eq!(path, blocker),
      other => panic!("expected CreateDir error, got {:?}", other),
    }
  }
}
