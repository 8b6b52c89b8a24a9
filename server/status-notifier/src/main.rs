//! Binary entrypoint: parse options, open the log sink, run once.
//!
//! Exit codes: 0 on completion (any number of notifications), 1 on a runtime
//! failure, 2 on invalid options.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use status_notifier::config::{DEFAULT_BASE_URL, DEFAULT_FIXTURE_DIR, DEFAULT_LOG_DIR, DEFAULT_OUTPUT_PATH};
use status_notifier::{logging, pipeline, Config, SourceMode};

/// Write a notice for unresolved status-page incidents found in the incident history.
#[derive(Parser, Debug)]
#[command(name = "status-notifier", version)]
struct Args {
  /// Read local fixture files or call the status-page API
  #[arg(long, value_enum, env = "STATUS_NOTIFIER_SOURCE_MODE", default_value_t = SourceMode::Local)]
  source_mode: SourceMode,

  /// Directory with unresolved_incidents.json and all_incidents.json (local mode)
  #[arg(long, env = "STATUS_NOTIFIER_FIXTURE_DIR", default_value = DEFAULT_FIXTURE_DIR)]
  fixture_dir: PathBuf,

  /// Status-page origin (remote mode)
  #[arg(long, env = "STATUS_NOTIFIER_REMOTE_BASE_URL", default_value = DEFAULT_BASE_URL)]
  remote_base_url: String,

  /// Where the notice payload is written; replaced on every run
  #[arg(long, env = "STATUS_NOTIFIER_OUTPUT_PATH", default_value = DEFAULT_OUTPUT_PATH)]
  output_path: PathBuf,

  /// Directory for dated log files
  #[arg(long, env = "STATUS_NOTIFIER_LOG_DIR", default_value = DEFAULT_LOG_DIR)]
  log_dir: PathBuf,
}

fn main() {
  let args = Args::parse();

  let config = match Config::from_parts(
    args.source_mode,
    args.fixture_dir,
    &args.remote_base_url,
    args.output_path,
    args.log_dir,
  ) {
    Ok(c) => c,
    Err(e) => {
      eprintln!("status-notifier: {}", e);
      process::exit(2);
    }
  };

  let today = chrono::Local::now().date_naive();
  let sink = match logging::init(&config.log_dir, today) {
    Ok(s) => s,
    Err(e) => {
      eprintln!("status-notifier: {}", e);
      process::exit(1);
    }
  };

  let outcome = sink.in_scope(|| match pipeline::run(&config) {
    Ok(_) => true,
    Err(e) => {
      tracing::error!("{}", e);
      false
    }
  });

  if !outcome {
    process::exit(1);
  }
}
