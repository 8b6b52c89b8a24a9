//! Core types for the notifier (JSON contracts in both directions).

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Inbound types (JSON contract: what the status page serves)
// ---------------------------------------------------------------------------

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Page header of a Statuspage response. Not used for matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageInfo {
  #[serde(deserialize_with = "null_as_default")]
  pub id: String,
  #[serde(deserialize_with = "null_as_default")]
  pub name: String,
  #[serde(deserialize_with = "null_as_default")]
  pub url: String,
  #[serde(deserialize_with = "null_as_default")]
  pub time_zone: String,
  #[serde(deserialize_with = "null_as_default")]
  pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AffectedComponent {
  #[serde(deserialize_with = "null_as_default")]
  pub name: String,
}

/// One incident. Unknown fields are silently ignored; missing or null
/// fields decode to empty values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct IncidentRecord {
  #[serde(deserialize_with = "null_as_default")]
  pub id: String,
  #[serde(deserialize_with = "null_as_default")]
  pub name: String,
  #[serde(deserialize_with = "null_as_default")]
  pub impact: String,
  #[serde(deserialize_with = "null_as_default")]
  pub status: String,
  #[serde(deserialize_with = "null_as_default")]
  pub created_at: String,
  #[serde(deserialize_with = "null_as_default")]
  pub updated_at: String,
  #[serde(deserialize_with = "null_as_default")]
  pub monitoring_at: String,
  #[serde(deserialize_with = "null_as_default")]
  pub resolved_at: String,
  #[serde(deserialize_with = "null_as_default")]
  pub resolved: bool,
  #[serde(deserialize_with = "null_as_default")]
  pub page_id: String,
  #[serde(deserialize_with = "null_as_default")]
  pub shortlink: String,
  /// Update entries are kept opaque; only their count is logged.
  #[serde(deserialize_with = "null_as_default")]
  pub incident_updates: Vec<serde_json::Value>,
  /// Present on the historical list only.
  #[serde(deserialize_with = "null_as_default")]
  pub affected_components: Vec<AffectedComponent>,
}

impl IncidentRecord {
  pub fn component_names(&self) -> Vec<String> {
    self
      .affected_components
      .iter()
      .map(|c| c.name.clone())
      .collect()
  }
}

/// A decoded `incidents.json` / `incidents/unresolved.json` document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct IncidentCollection {
  #[serde(deserialize_with = "null_as_default")]
  pub page: PageInfo,
  #[serde(deserialize_with = "null_as_default")]
  pub incidents: Vec<IncidentRecord>,
}

impl IncidentCollection {
  pub fn len(&self) -> usize {
    self.incidents.len()
  }

  pub fn is_empty(&self) -> bool {
    self.incidents.is_empty()
  }
}

// ---------------------------------------------------------------------------
// Output types (JSON contract: what we emit)
// ---------------------------------------------------------------------------

/// One entry of the notice payload. Scalar fields are copied verbatim from
/// the unresolved incident; `components` comes from the matched historical one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
  pub id: String,
  pub impact: String,
  pub name: String,
  pub status: String,
  pub created_at: String,
  pub updated_at: String,
  #[serde(default)]
  pub components: Vec<String>,
}

impl NotificationRecord {
  pub fn from_match(historical: &IncidentRecord, unresolved: &IncidentRecord) -> Self {
    Self {
      id: unresolved.id.clone(),
      impact: unresolved.impact.clone(),
      name: unresolved.name.clone(),
      status: unresolved.status.clone(),
      created_at: unresolved.created_at.clone(),
      updated_at: unresolved.updated_at.clone(),
      components: historical.component_names(),
    }
  }
}
