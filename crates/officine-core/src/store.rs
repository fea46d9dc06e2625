//! The `FollowUpStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `officine-store-json`).
//! The HTTP boundary (`officine-api`) depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::{
  doctor::{Doctor, NewDoctor},
  error::StoreError,
  patient::{IndexEntry, NewPatient, Patient, PatientRecords, PatientUpdate},
  visit::{NewVisit, Questionnaire, Visit},
};

/// Abstraction over an Officine store backend.
///
/// The patient detail map is the source of truth; the patient index is a
/// projection of it that a backend must be able to regenerate at any time
/// (see [`FollowUpStore::rebuild_index`]).
///
/// Missing patients and visits are reported as errors whose
/// [`StoreError::kind`] is [`crate::ErrorKind::NotFound`], never as `Ok`.
pub trait FollowUpStore: Send + Sync {
  type Error: StoreError;

  // ── Doctors ───────────────────────────────────────────────────────────

  /// All doctor records as stored, password hashes included.
  fn list_doctors(
    &self,
  ) -> impl Future<Output = Result<Vec<Doctor>, Self::Error>> + Send + '_;

  /// Persist a new doctor. Fails with a duplicate-email error if any
  /// existing record, active or not, has exactly the same email.
  fn create_doctor(
    &self,
    input: NewDoctor,
  ) -> impl Future<Output = Result<Doctor, Self::Error>> + Send + '_;

  // ── Patients ──────────────────────────────────────────────────────────

  /// Raw read of the search index.
  fn patient_index(
    &self,
  ) -> impl Future<Output = Result<Vec<IndexEntry>, Self::Error>> + Send + '_;

  /// Raw read of the detail map.
  fn patient_records(
    &self,
  ) -> impl Future<Output = Result<PatientRecords, Self::Error>> + Send + '_;

  fn get_patient<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Patient, Self::Error>> + Send + 'a;

  /// Create a patient with no visits, together with its index entry.
  fn create_patient(
    &self,
    input: NewPatient,
  ) -> impl Future<Output = Result<Patient, Self::Error>> + Send + '_;

  /// Replace the provided sections and refresh the index entry.
  fn update_patient<'a>(
    &'a self,
    id: &'a str,
    update: PatientUpdate,
  ) -> impl Future<Output = Result<Patient, Self::Error>> + Send + 'a;

  /// Remove the record and its index entry.
  fn delete_patient<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Case-insensitive containment match over index names and phones.
  ///
  /// Leading and trailing whitespace in `query` is ignored, so `" ali "`
  /// matches like `"ali"`. A blank query returns the whole index.
  fn search_patients<'a>(
    &'a self,
    query: &'a str,
  ) -> impl Future<Output = Result<Vec<IndexEntry>, Self::Error>> + Send + 'a;

  /// Regenerate the index from the detail map and persist it.
  fn rebuild_index(
    &self,
  ) -> impl Future<Output = Result<Vec<IndexEntry>, Self::Error>> + Send + '_;

  // ── Visits ────────────────────────────────────────────────────────────

  /// Append a visit; `visitId` and `at` are set by the store.
  fn add_visit<'a>(
    &'a self,
    patient_id: &'a str,
    input: NewVisit,
  ) -> impl Future<Output = Result<Visit, Self::Error>> + Send + 'a;

  fn get_visit<'a>(
    &'a self,
    patient_id: &'a str,
    visit_id: &'a str,
  ) -> impl Future<Output = Result<Visit, Self::Error>> + Send + 'a;

  /// Replace the questionnaire of a visit, leaving every other field as is.
  fn update_visit<'a>(
    &'a self,
    patient_id: &'a str,
    visit_id: &'a str,
    questionnaire: Questionnaire,
  ) -> impl Future<Output = Result<Visit, Self::Error>> + Send + 'a;

  fn delete_visit<'a>(
    &'a self,
    patient_id: &'a str,
    visit_id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
