//! Patient records and their search-index projection.
//!
//! The full record lives in the detail map, keyed by id. The index entry is a
//! denormalised `{id, name, phone}` copy of the `general` section, always
//! derivable from the record via [`IndexEntry::of`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, blank, visit::Visit};

// ─── Sections ────────────────────────────────────────────────────────────────

/// Identity and contact details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct General {
  pub first_name:        String,
  pub last_name:         String,
  #[serde(default, deserialize_with = "blank::option")]
  pub birth_date:        Option<NaiveDate>,
  #[serde(default)]
  pub phone:             String,
  #[serde(default, deserialize_with = "blank::option")]
  pub primary_physician: Option<String>,
  #[serde(default)]
  pub specialists:       Vec<String>,
}

impl General {
  /// The display name stored in the index: first and last name joined by a
  /// single space.
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }

  pub fn validate(&self) -> Result<()> {
    if self.first_name.trim().is_empty() {
      return Err(Error::Validation("first name is required".into()));
    }
    if self.last_name.trim().is_empty() {
      return Err(Error::Validation("last name is required".into()));
    }
    Ok(())
  }
}

/// Medical history; every list defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Medical {
  pub chronic_conditions: Vec<String>,
  pub allergies:          Vec<String>,
  pub family_history:     Vec<String>,
}

// ─── Patient ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
  pub id:      String,
  pub general: General,
  #[serde(default)]
  pub medical: Medical,
  /// Chronological: new visits are always appended.
  #[serde(default)]
  pub visits:  Vec<Visit>,
}

impl Patient {
  /// Apply a partial update. Each provided section replaces the stored one
  /// wholesale; sections are never merged field by field.
  pub fn apply(&mut self, update: PatientUpdate) {
    if let Some(general) = update.general {
      self.general = general;
    }
    if let Some(medical) = update.medical {
      self.medical = medical;
    }
  }

  pub fn visit(&self, visit_id: &str) -> Option<&Visit> {
    self.visits.iter().find(|v| v.visit_id == visit_id)
  }

  pub fn visit_mut(&mut self, visit_id: &str) -> Option<&mut Visit> {
    self.visits.iter_mut().find(|v| v.visit_id == visit_id)
  }
}

/// The `patients_data` document: patient id → full record.
pub type PatientRecords = BTreeMap<String, Patient>;

/// Input to [`crate::store::FollowUpStore::create_patient`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewPatient {
  pub general: General,
  #[serde(default)]
  pub medical: Medical,
}

/// Input to [`crate::store::FollowUpStore::update_patient`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientUpdate {
  pub general: Option<General>,
  pub medical: Option<Medical>,
}

impl PatientUpdate {
  pub fn validate(&self) -> Result<()> {
    self.general.as_ref().map_or(Ok(()), General::validate)
  }
}

// ─── Index ───────────────────────────────────────────────────────────────────

/// One row of the `patients_index` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
  pub id:    String,
  pub name:  String,
  pub phone: String,
}

impl IndexEntry {
  pub fn of(patient: &Patient) -> Self {
    Self {
      id:    patient.id.clone(),
      name:  patient.general.full_name(),
      phone: patient.general.phone.clone(),
    }
  }

  /// Case-insensitive containment against the name or the phone number.
  /// `needle` must already be lowercased.
  pub fn matches(&self, needle: &str) -> bool {
    self.name.to_lowercase().contains(needle)
      || self.phone.to_lowercase().contains(needle)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ali() -> Patient {
    serde_json::from_value(serde_json::json!({
      "id": "P-1-00000000",
      "general": {
        "firstName": "Ali",
        "lastName": "Ben",
        "birthDate": "1980-01-01",
        "phone": "0600000000"
      },
      "medical": {}
    }))
    .unwrap()
  }

  #[test]
  fn index_entry_joins_first_and_last_name() {
    let entry = IndexEntry::of(&ali());
    assert_eq!(entry.name, "Ali Ben");
    assert_eq!(entry.phone, "0600000000");
    assert_eq!(entry.id, "P-1-00000000");
  }

  #[test]
  fn missing_sections_and_lists_default_to_empty() {
    let p = ali();
    assert!(p.visits.is_empty());
    assert!(p.medical.allergies.is_empty());
    assert!(p.general.specialists.is_empty());
    assert!(p.general.primary_physician.is_none());
  }

  #[test]
  fn update_replaces_whole_sections() {
    let mut p = ali();
    p.medical.allergies = vec!["penicillin".into()];

    p.apply(PatientUpdate {
      general: None,
      medical: Some(Medical {
        chronic_conditions: vec!["diabetes".into()],
        ..Medical::default()
      }),
    });

    assert_eq!(p.medical.chronic_conditions, ["diabetes"]);
    assert!(p.medical.allergies.is_empty(), "sections are not deep-merged");
    assert_eq!(p.general.first_name, "Ali");
  }

  #[test]
  fn search_matches_name_case_insensitively_and_phone() {
    let entry = IndexEntry::of(&ali());
    assert!(entry.matches("ali"));
    assert!(entry.matches("i be"));
    assert!(entry.matches("0600"));
    assert!(!entry.matches("omar"));
  }

  #[test]
  fn blank_names_fail_validation() {
    let mut general = ali().general;
    general.last_name = " ".into();
    assert!(matches!(general.validate(), Err(Error::Validation(_))));
  }
}
