//! One notifier run: fetch both collections, reconcile, write the payload.

use std::path::PathBuf;

use crate::config::Config;
use crate::error::NotifierError;
use crate::logging;
use crate::reconcile;
use crate::source::IncidentSource;
use crate::writer;

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
  pub historical: usize,
  pub unresolved: usize,
  pub notifications: usize,
  pub output_path: PathBuf,
}

/// Execute the pipeline. Any error aborts the run before the payload is written.
///
/// Logs go to whatever dispatcher is current; `main` wraps this in
/// [`logging::LogSink::in_scope`].
pub fn run(config: &Config) -> Result<RunSummary, NotifierError> {
  tracing::info!("{}", logging::banner());
  let source = IncidentSource::from_config(config)?;
  tracing::info!(mode = ?source.mode(), "start process");

  run_with_source(&source, config)
}

/// Pipeline body with an already-built source.
pub fn run_with_source(source: &IncidentSource, config: &Config) -> Result<RunSummary, NotifierError> {
  let historical = source.fetch_historical()?;
  tracing::info!(count = historical.len(), "historical incidents loaded");

  let unresolved = source.fetch_unresolved()?;
  if unresolved.is_empty() {
    tracing::warn!("no unresolved incidents found");
  } else {
    tracing::info!(count = unresolved.len(), "unresolved incidents loaded");
  }

  let (records, stats) = reconcile::reconcile_report(&historical, &unresolved);
  if !stats.duplicate_unresolved_ids.is_empty() {
    tracing::warn!(
      ids = ?stats.duplicate_unresolved_ids,
      "duplicate ids in unresolved incidents; each copy produces its own notification"
    );
  }
  tracing::info!(
    historical = stats.historical,
    unresolved = stats.unresolved,
    matched = stats.matched,
    "reconciled incidents"
  );

  writer::write_payload(&records, &config.output_path)?;
  tracing::info!(path = %config.output_path.display(), "wrote notification payload");

  tracing::info!("end process");
  tracing::info!("{}", logging::banner());

  Ok(RunSummary {
    historical: stats.historical,
    unresolved: stats.unresolved,
    notifications: records.len(),
    output_path: config.output_path.clone(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::FetchError;
  use std::fs;

  fn config_for(fixture_dir: PathBuf, output_path: PathBuf) -> Config {
    Config {
      fixture_dir,
      output_path,
      ..Config::default()
    }
  }

  #[test]
  fn empty_unresolved_still_writes_empty_payload() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
      dir.path().join("all_incidents.json"),
      r#"{"incidents": [{"id": "1"}]}"#,
    )
    .unwrap();
    fs::write(dir.path().join("unresolved_incidents.json"), r#"{"incidents": []}"#).unwrap();
    let out = dir.path().join("notice_message.json");

    let summary = run(&config_for(dir.path().to_path_buf(), out.clone())).unwrap();
    assert_eq!(summary.notifications, 0);
    assert_eq!(summary.historical, 1);
    assert_eq!(fs::read_to_string(&out).unwrap(), "[]");
  }

  #[test]
  fn missing_unresolved_fixture_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("all_incidents.json"), r#"{"incidents": []}"#).unwrap();
    let out = dir.path().join("notice_message.json");

    let err = run(&config_for(dir.path().to_path_buf(), out.clone())).unwrap_err();
    assert!(matches!(err, NotifierError::Fetch(FetchError::NotFound { .. })));
    assert!(!out.exists());
  }

  #[test]
  fn write_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("all_incidents.json"), "{}").unwrap();
    fs::write(dir.path().join("unresolved_incidents.json"), "{}").unwrap();
    let out = dir.path().join("missing").join("notice_message.json");

    let err = run(&config_for(dir.path().to_path_buf(), out)).unwrap_err();
    assert!(matches!(err, NotifierError::Write(_)));
  }
}
