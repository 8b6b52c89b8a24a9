//! Reconciliation: intersect the historical and unresolved collections by id.
//!
//! Output order and multiplicity match a nested scan (historical outer,
//! unresolved inner): every (h, u) pair with equal ids yields one record, in
//! historical order and then unresolved order. Duplicate ids on either side
//! are not collapsed.

use std::collections::HashMap;

use crate::types::{IncidentCollection, IncidentRecord, NotificationRecord};

/// Counters describing one reconciliation, for the run log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileStats {
  pub historical: usize,
  pub unresolved: usize,
  pub matched: usize,
  /// Ids that occur more than once in the unresolved collection.
  pub duplicate_unresolved_ids: Vec<String>,
}

/// Build notification records for every unresolved incident that also
/// appears in the historical collection.
pub fn reconcile(
  historical: &IncidentCollection,
  unresolved: &IncidentCollection,
) -> Vec<NotificationRecord> {
  reconcile_report(historical, unresolved).0
}

/// Same as [`reconcile`], plus counters for logging.
pub fn reconcile_report(
  historical: &IncidentCollection,
  unresolved: &IncidentCollection,
) -> (Vec<NotificationRecord>, ReconcileStats) {
  let index = index_by_id(&unresolved.incidents);

  let mut records = Vec::new();
  for h in &historical.incidents {
    if let Some(matches) = index.get(h.id.as_str()) {
      records.extend(matches.iter().map(|u| NotificationRecord::from_match(h, u)));
    }
  }

  // First-occurrence order keeps the duplicate list deterministic.
  let mut duplicate_unresolved_ids = Vec::new();
  for u in &unresolved.incidents {
    let seen = index.get(u.id.as_str()).map_or(0, |bucket| bucket.len());
    if seen > 1 && !duplicate_unresolved_ids.contains(&u.id) {
      duplicate_unresolved_ids.push(u.id.clone());
    }
  }

  let stats = ReconcileStats {
    historical: historical.len(),
    unresolved: unresolved.len(),
    matched: records.len(),
    duplicate_unresolved_ids,
  };
  (records, stats)
}

/// id -> records with that id, in collection order.
fn index_by_id(incidents: &[IncidentRecord]) -> HashMap<&str, Vec<&IncidentRecord>> {
  let mut index: HashMap<&str, Vec<&IncidentRecord>> = HashMap::with_capacity(incidents.len());
  for incident in incidents {
    index.entry(incident.id.as_str()).or_default().push(incident);
  }
  index
}
