//! Notification payload: indented JSON array, written over any existing file.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::WriteError;
use crate::types::NotificationRecord;

const INDENT: &[u8] = b"    ";

/// Serialize records as a 4-space indented JSON array. Empty input renders `[]`.
pub fn render_payload(records: &[NotificationRecord]) -> Result<Vec<u8>, WriteError> {
  let mut buf = Vec::new();
  let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
  records.serialize(&mut ser)?;
  Ok(buf)
}

/// Render and persist the payload, truncating `destination`.
pub fn write_payload(records: &[NotificationRecord], destination: &Path) -> Result<(), WriteError> {
  let bytes = render_payload(records)?;
  fs::write(destination, bytes).map_err(|source| WriteError::Persist {
    path: destination.to_path_buf(),
    source,
  })
}
