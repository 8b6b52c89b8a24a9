//! Run configuration with sane defaults.

use std::path::PathBuf;

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://www.githubstatus.com";
pub const DEFAULT_FIXTURE_DIR: &str = "./sample";
pub const DEFAULT_OUTPUT_PATH: &str = "./notice_message.json";
pub const DEFAULT_LOG_DIR: &str = "./logs/";

/// Where incident collections come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SourceMode {
  /// Read `unresolved_incidents.json` / `all_incidents.json` from the fixture directory.
  #[default]
  Local,
  /// GET the status-page API.
  Remote,
}

/// Settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
  pub source_mode: SourceMode,
  /// Directory holding the fixture files in local mode.
  pub fixture_dir: PathBuf,
  /// Origin the API paths are resolved against in remote mode.
  pub remote_base_url: Url,
  /// Destination of the notification payload; overwritten each run.
  pub output_path: PathBuf,
  /// Directory for `log-YYYYMMDD.log` files.
  pub log_dir: PathBuf,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      source_mode: SourceMode::Local,
      fixture_dir: PathBuf::from(DEFAULT_FIXTURE_DIR),
      remote_base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
      output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
      log_dir: PathBuf::from(DEFAULT_LOG_DIR),
    }
  }
}

impl Config {
  /// Build a validated config from raw option values.
  pub fn from_parts(
    source_mode: SourceMode,
    fixture_dir: PathBuf,
    remote_base_url: &str,
    output_path: PathBuf,
    log_dir: PathBuf,
  ) -> Result<Self, ConfigError> {
    let config = Self {
      source_mode,
      fixture_dir,
      remote_base_url: parse_base_url(remote_base_url)?,
      output_path,
      log_dir,
    };
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.source_mode == SourceMode::Local && self.fixture_dir.as_os_str().is_empty() {
      return Err(ConfigError::new("fixture-dir", "must not be empty in local mode"));
    }
    if self.output_path.as_os_str().is_empty() {
      return Err(ConfigError::new("output-path", "must not be empty"));
    }
    if self.log_dir.as_os_str().is_empty() {
      return Err(ConfigError::new("log-dir", "must not be empty"));
    }
    Ok(())
  }
}

/// Parse the remote origin. Only absolute http(s) URLs are accepted.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
  let url = Url::parse(raw.trim())
    .map_err(|e| ConfigError::new("remote-base-url", format!("invalid URL: {}", e)))?;
  match url.scheme() {
    "http" | "https" => {}
    other => {
      return Err(ConfigError::new(
        "remote-base-url",
        format!("unsupported scheme '{}', expected http or https", other),
      ))
    }
  }
  if url.cannot_be_a_base() {
    return Err(ConfigError::new("remote-base-url", "cannot be used as a base URL"));
  }
  Ok(url)
}
