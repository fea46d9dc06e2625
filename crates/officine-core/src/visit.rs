//! Visits and the follow-up questionnaire captured at each one.
//!
//! Every optional field uses [`crate::blank::option`], so the questionnaire
//! can be posted straight from the visit form: untouched inputs (`""`) and
//! missing keys both come out as `None`, missing lists as empty, and missing
//! sections as their all-empty default.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::blank;

// ─── Enumerations ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Adherence {
  Good,
  Medium,
  Poor,
}

/// How the patient organises their medication intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Organization {
  Pillbox,
  Alarm,
  Caregiver,
  Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Smoking {
  #[serde(rename = "none")]
  NonSmoker,
  Occasional,
  Daily,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alcohol {
  #[serde(rename = "none")]
  Abstinent,
  Occasional,
  Regular,
}

/// Shared scale for disease knowledge and treatment understanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Understanding {
  Good,
  Medium,
  Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelfManagement {
  Autonomous,
  NeedsHelp,
}

// ─── Questionnaire sections ──────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabTests {
  #[serde(deserialize_with = "blank::option")]
  pub date:  Option<NaiveDate>,
  #[serde(deserialize_with = "blank::option")]
  pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Medication {
  pub name: String,
  #[serde(deserialize_with = "blank::option")]
  pub dose: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Treatment {
  pub medications:  Vec<Medication>,
  #[serde(deserialize_with = "blank::option")]
  pub duration:     Option<String>,
  #[serde(deserialize_with = "blank::option")]
  pub adherence:    Option<Adherence>,
  pub organization: Vec<Organization>,
  #[serde(deserialize_with = "blank::option")]
  pub side_effects: Option<String>,
}

/// A measurement taken at the counter, e.g. blood sugar in mg/dL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicalTest {
  pub name:  String,
  #[serde(deserialize_with = "blank::option")]
  pub value: Option<String>,
  #[serde(deserialize_with = "blank::option")]
  pub unit:  Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Lifestyle {
  pub diet_recommended: Option<bool>,
  pub exercise:         Option<bool>,
  #[serde(deserialize_with = "blank::option")]
  pub smoking:          Option<Smoking>,
  #[serde(deserialize_with = "blank::option")]
  pub alcohol:          Option<Alcohol>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Evaluation {
  #[serde(deserialize_with = "blank::option")]
  pub disease_knowledge:       Option<Understanding>,
  #[serde(deserialize_with = "blank::option")]
  pub treatment_understanding: Option<Understanding>,
  #[serde(deserialize_with = "blank::option")]
  pub self_management:         Option<SelfManagement>,
}

// ─── Questionnaire ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Questionnaire {
  #[serde(rename = "lastGPVisit", deserialize_with = "blank::option")]
  pub last_gp_visit:         Option<NaiveDate>,
  #[serde(deserialize_with = "blank::option")]
  pub last_specialist_visit: Option<NaiveDate>,
  pub last_lab_tests:        LabTests,
  #[serde(deserialize_with = "blank::option")]
  pub next_appointment:      Option<NaiveDate>,
  pub treatment:             Treatment,
  pub medical_tests:         Vec<MedicalTest>,
  pub lifestyle:             Lifestyle,
  pub evaluation:            Evaluation,
  #[serde(deserialize_with = "blank::option")]
  pub pharmacist_notes:      Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdditionalInfo {
  #[serde(deserialize_with = "blank::option")]
  pub free_text:   Option<String>,
  pub attachments: Vec<String>,
}

// ─── Visit ───────────────────────────────────────────────────────────────────

/// One follow-up visit. Only `questionnaire` may change after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
  pub visit_id:        String,
  /// Server-assigned creation time.
  pub at:              DateTime<Utc>,
  /// Author of the visit. Not checked against the doctor list.
  pub doctor_id:       String,
  #[serde(default)]
  pub questionnaire:   Questionnaire,
  #[serde(default)]
  pub additional_info: AdditionalInfo,
}

/// Input to [`crate::store::FollowUpStore::add_visit`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVisit {
  pub doctor_id:       String,
  #[serde(default)]
  pub questionnaire:   Questionnaire,
  #[serde(default)]
  pub additional_info: AdditionalInfo,
}

#[cfg(test)]
mod tests {
  use super::*;

  /// The body the visit form posts when most inputs are left untouched.
  fn form_body() -> serde_json::Value {
    serde_json::json!({
      "doctorId": "D-1-00000000",
      "questionnaire": {
        "lastGPVisit": "2024-03-02",
        "lastSpecialistVisit": "",
        "lastLabTests": { "date": "", "notes": "" },
        "nextAppointment": "",
        "treatment": {
          "medications": [{ "name": "Metformine", "dose": "850 mg" }],
          "duration": "",
          "adherence": "good",
          "organization": ["pillbox", "alarm"],
          "sideEffects": ""
        },
        "medicalTests": [{ "name": "bloodSugar", "value": "", "unit": "mg/dL" }],
        "lifestyle": {
          "dietRecommended": null,
          "exercise": true,
          "smoking": "none",
          "alcohol": ""
        },
        "evaluation": {
          "diseaseKnowledge": "medium",
          "treatmentUnderstanding": "",
          "selfManagement": "needsHelp"
        },
        "pharmacistNotes": ""
      },
      "additionalInfo": { "freeText": "", "attachments": [] }
    })
  }

  #[test]
  fn form_body_deserializes_with_blank_fields_absent() {
    let visit: NewVisit = serde_json::from_value(form_body()).unwrap();
    let q = &visit.questionnaire;

    assert_eq!(q.last_gp_visit, NaiveDate::from_ymd_opt(2024, 3, 2));
    assert!(q.last_specialist_visit.is_none());
    assert_eq!(q.last_lab_tests, LabTests::default());
    assert_eq!(q.treatment.adherence, Some(Adherence::Good));
    assert_eq!(
      q.treatment.organization,
      [Organization::Pillbox, Organization::Alarm]
    );
    assert_eq!(q.treatment.medications[0].dose.as_deref(), Some("850 mg"));
    assert!(q.medical_tests[0].value.is_none());
    assert_eq!(q.lifestyle.smoking, Some(Smoking::NonSmoker));
    assert!(q.lifestyle.alcohol.is_none());
    assert!(q.lifestyle.diet_recommended.is_none());
    assert_eq!(q.evaluation.self_management, Some(SelfManagement::NeedsHelp));
    assert!(q.pharmacist_notes.is_none());
    assert!(visit.additional_info.free_text.is_none());
  }

  #[test]
  fn empty_questionnaire_defaults_every_section() {
    let visit: NewVisit =
      serde_json::from_value(serde_json::json!({ "doctorId": "D-1" })).unwrap();
    assert_eq!(visit.questionnaire, Questionnaire::default());
    assert_eq!(visit.additional_info, AdditionalInfo::default());
  }

  #[test]
  fn unknown_enum_value_is_rejected() {
    let mut body = form_body();
    body["questionnaire"]["treatment"]["adherence"] = "excellent".into();
    assert!(serde_json::from_value::<NewVisit>(body).is_err());
  }

  #[test]
  fn gp_visit_key_keeps_its_stored_spelling() {
    let q = Questionnaire {
      last_gp_visit: NaiveDate::from_ymd_opt(2024, 1, 15),
      ..Questionnaire::default()
    };
    let json = serde_json::to_value(&q).unwrap();
    assert_eq!(json["lastGPVisit"], "2024-01-15");
    assert_eq!(json["lifestyle"]["smoking"], serde_json::Value::Null);
  }
}
