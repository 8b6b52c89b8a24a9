//! Incident source adapter: local fixture files or the live status-page API.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use url::Url;

use crate::config::{Config, SourceMode};
use crate::error::FetchError;
use crate::types::IncidentCollection;

/// The two collections the notifier reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
  Unresolved,
  Historical,
}

impl Endpoint {
  /// API path, resolved against the configured origin.
  pub fn path(self) -> &'static str {
    match self {
      Self::Unresolved => "/api/v2/incidents/unresolved.json",
      Self::Historical => "/api/v2/incidents.json",
    }
  }

  /// File name inside the fixture directory.
  pub fn fixture_name(self) -> &'static str {
    match self {
      Self::Unresolved => "unresolved_incidents.json",
      Self::Historical => "all_incidents.json",
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Unresolved => "unresolved incidents",
      Self::Historical => "historical incidents",
    }
  }
}

enum Backend {
  Local { fixture_dir: PathBuf },
  Remote { base_url: Url, client: Client },
}

/// Fetches and decodes incident collections in the configured mode.
pub struct IncidentSource {
  backend: Backend,
}

impl IncidentSource {
  pub fn local(fixture_dir: impl Into<PathBuf>) -> Self {
    Self {
      backend: Backend::Local {
        fixture_dir: fixture_dir.into(),
      },
    }
  }

  pub fn remote(base_url: Url) -> Result<Self, FetchError> {
    // No timeout: a hung endpoint blocks the run.
    let client = Client::builder()
      .timeout(None::<Duration>)
      .build()
      .map_err(|e| FetchError::transport(base_url.as_str(), format!("client init: {}", e)))?;
    Ok(Self::with_client(base_url, client))
  }

  /// Remote source using a caller-built HTTP client.
  pub fn with_client(base_url: Url, client: Client) -> Self {
    Self {
      backend: Backend::Remote { base_url, client },
    }
  }

  pub fn from_config(config: &Config) -> Result<Self, FetchError> {
    match config.source_mode {
      SourceMode::Local => Ok(Self::local(&config.fixture_dir)),
      SourceMode::Remote => Self::remote(config.remote_base_url.clone()),
    }
  }

  pub fn mode(&self) -> SourceMode {
    match self.backend {
      Backend::Local { .. } => SourceMode::Local,
      Backend::Remote { .. } => SourceMode::Remote,
    }
  }

  pub fn fetch_unresolved(&self) -> Result<IncidentCollection, FetchError> {
    self.fetch(Endpoint::Unresolved)
  }

  pub fn fetch_historical(&self) -> Result<IncidentCollection, FetchError> {
    self.fetch(Endpoint::Historical)
  }

  pub fn fetch(&self, endpoint: Endpoint) -> Result<IncidentCollection, FetchError> {
    match &self.backend {
      Backend::Local { fixture_dir } => {
        let path = fixture_dir.join(endpoint.fixture_name());
        tracing::debug!(path = %path.display(), "reading {}", endpoint.label());
        let bytes = read_fixture(&path)?;
        decode_collection(&bytes, endpoint.label())
      }
      Backend::Remote { base_url, client } => {
        let url = endpoint_url(base_url, endpoint)?;
        tracing::info!("endpoint: {}", url);
        let bytes = get_json(client, &url)?;
        let collection = decode_collection(&bytes, endpoint.label())?;
        tracing::info!(
          page = %collection.page.name,
          count = collection.len(),
          "fetched {}",
          endpoint.label()
        );
        for incident in &collection.incidents {
          tracing::info!(updates = incident.incident_updates.len(), "ID: {}", incident.id);
        }
        Ok(collection)
      }
    }
  }
}

/// Resolve an endpoint path against the base origin (RFC 3986 reference resolution).
pub fn endpoint_url(base_url: &Url, endpoint: Endpoint) -> Result<Url, FetchError> {
  base_url
    .join(endpoint.path())
    .map_err(|e| {
      FetchError::transport(
        base_url.as_str(),
        format!("cannot resolve {}: {}", endpoint.path(), e),
      )
    })
}

/// Decode a full response body / fixture file into a collection.
pub fn decode_collection(bytes: &[u8], label: &str) -> Result<IncidentCollection, FetchError> {
  serde_json::from_slice(bytes).map_err(|source| FetchError::Decode {
    label: label.to_string(),
    source,
  })
}

fn read_fixture(path: &Path) -> Result<Vec<u8>, FetchError> {
  fs::read(path).map_err(|source| match source.kind() {
    ErrorKind::NotFound => FetchError::NotFound {
      path: path.to_path_buf(),
    },
    _ => FetchError::Read {
      path: path.to_path_buf(),
      source,
    },
  })
}

fn get_json(client: &Client, url: &Url) -> Result<Vec<u8>, FetchError> {
  let response = client
    .get(url.clone())
    .header(ACCEPT, "application/json")
    .header(USER_AGENT, concat!("status-notifier/", env!("CARGO_PKG_VERSION")))
    .send()
    .map_err(|e| FetchError::transport(url.as_str(), e.to_string()))?;

  let status = response.status();
  if !status.is_success() {
    return Err(FetchError::transport(url.as_str(), format!("HTTP {}", status)));
  }

  let body = response
    .bytes()
    .map_err(|e| FetchError::transport(url.as_str(), format!("reading body: {}", e)))?;
  Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn write_fixture(dir: &Path, endpoint: Endpoint, body: &str) {
    fs::write(dir.join(endpoint.fixture_name()), body).unwrap();
  }

  #[test]
  fn endpoint_paths_resolve_against_origin() {
    let base = Url::parse("https://www.githubstatus.com").unwrap();
    assert_eq!(
      endpoint_url(&base, Endpoint::Historical).unwrap().as_str(),
      "https://www.githubstatus.com/api/v2/incidents.json"
    );
    assert_eq!(
      endpoint_url(&base, Endpoint::Unresolved).unwrap().as_str(),
      "https://www.githubstatus.com/api/v2/incidents/unresolved.json"
    );
  }

  #[test]
  fn absolute_path_replaces_base_path() {
    let base = Url::parse("http://127.0.0.1:9000/mirror/").unwrap();
    assert_eq!(
      endpoint_url(&base, Endpoint::Historical).unwrap().as_str(),
      "http://127.0.0.1:9000/api/v2/incidents.json"
    );
  }

  #[test]
  fn local_mode_reads_named_fixture() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(
      dir.path(),
      Endpoint::Unresolved,
      r#"{"page": {"name": "GitHub"}, "incidents": [{"id": "u1", "status": "investigating"}]}"#,
    );
    let source = IncidentSource::local(dir.path());
    assert_eq!(source.mode(), SourceMode::Local);

    let collection = source.fetch_unresolved().unwrap();
    assert_eq!(collection.incidents[0].id, "u1");
    assert_eq!(collection.incidents[0].status, "investigating");
  }

  #[test]
  fn missing_fixture_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let source = IncidentSource::local(dir.path());
    let err = source.fetch_historical().unwrap_err();
    match err {
      FetchError::NotFound { path } => assert!(path.ends_with("all_incidents.json")),
      other => panic!("expected NotFound, got {:?}", other),
    }
  }

  #[test]
  fn malformed_fixture_is_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), Endpoint::Historical, "{\"incidents\": [");
    let err = IncidentSource::local(dir.path()).fetch_historical().unwrap_err();
    assert!(matches!(err, FetchError::Decode { .. }));
    assert!(err.to_string().contains("historical incidents"));
  }

  #[test]
  fn wrong_shape_is_decode_error() {
    let err = decode_collection(br#"{"incidents": {"id": "x"}}"#, "unresolved incidents").unwrap_err();
    assert!(matches!(err, FetchError::Decode { .. }));
  }
}
