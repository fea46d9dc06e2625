//! Deriving the patient index from the detail map.

use std::collections::HashSet;

use officine_core::patient::{IndexEntry, PatientRecords};

/// A fresh index with one entry per record, in detail-map order.
pub(crate) fn rebuild(records: &PatientRecords) -> Vec<IndexEntry> {
  records.values().map(IndexEntry::of).collect()
}

/// Bring `index` back in line with `records`.
///
/// Entries whose patient still exists keep their position and get their
/// name and phone refreshed; orphans and duplicates are dropped; patients
/// with no entry are appended. Returns whether anything changed.
pub(crate) fn reconcile(index: &mut Vec<IndexEntry>, records: &PatientRecords) -> bool {
  let mut seen = HashSet::with_capacity(records.len());
  let mut next = Vec::with_capacity(records.len());

  for entry in index.iter() {
    if let Some(patient) = records.get(&entry.id)
      && seen.insert(entry.id.as_str())
    {
      next.push(IndexEntry::of(patient));
    }
  }
  for (id, patient) in records {
    if !seen.contains(id.as_str()) {
      next.push(IndexEntry::of(patient));
    }
  }

  let changed = next != *index;
  *index = next;
  changed
}

#[cfg(test)]
mod tests {
  use officine_core::patient::{General, Medical, Patient};

  use super::*;

  fn patient(id: &str, first: &str, phone: &str) -> Patient {
    Patient {
      id:      id.into(),
      general: General {
        first_name:        first.into(),
        last_name:         "Test".into(),
        birth_date:        None,
        phone:             phone.into(),
        primary_physician: None,
        specialists:       Vec::new(),
      },
      medical: Medical::default(),
      visits:  Vec::new(),
    }
  }

  fn records(patients: &[Patient]) -> PatientRecords {
    patients.iter().map(|p| (p.id.clone(), p.clone())).collect()
  }

  fn entry(id: &str, name: &str, phone: &str) -> IndexEntry {
    IndexEntry { id: id.into(), name: name.into(), phone: phone.into() }
  }

  #[test]
  fn rebuild_projects_every_record() {
    let recs = records(&[patient("P-1", "Ali", "06"), patient("P-2", "Sara", "07")]);
    assert_eq!(
      rebuild(&recs),
      [entry("P-1", "Ali Test", "06"), entry("P-2", "Sara Test", "07")]
    );
  }

  #[test]
  fn consistent_index_is_left_alone() {
    let recs = records(&[patient("P-1", "Ali", "06"), patient("P-2", "Sara", "07")]);
    // Insertion order differs from map order and must be preserved.
    let mut index = vec![entry("P-2", "Sara Test", "07"), entry("P-1", "Ali Test", "06")];
    assert!(!reconcile(&mut index, &recs));
    assert_eq!(index[0].id, "P-2");
  }

  #[test]
  fn missing_entries_are_appended_and_orphans_dropped() {
    let recs = records(&[patient("P-1", "Ali", "06"), patient("P-3", "Omar", "05")]);
    let mut index = vec![entry("P-2", "Gone Test", "00"), entry("P-1", "Ali Test", "06")];

    assert!(reconcile(&mut index, &recs));
    assert_eq!(index, [entry("P-1", "Ali Test", "06"), entry("P-3", "Omar Test", "05")]);
  }

  #[test]
  fn stale_names_and_duplicates_are_repaired() {
    let recs = records(&[patient("P-1", "Alia", "061")]);
    let mut index = vec![entry("P-1", "Ali Test", "06"), entry("P-1", "Ali Test", "06")];

    assert!(reconcile(&mut index, &recs));
    assert_eq!(index, [entry("P-1", "Alia Test", "061")]);
  }
}
