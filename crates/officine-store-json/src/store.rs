//! The flat-file implementation of [`FollowUpStore`].

use std::{
  path::{Path, PathBuf},
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
};

use chrono::Utc;
use officine_core::{
  doctor::{Doctor, NewDoctor},
  id::{self, DOCTOR_PREFIX, PATIENT_PREFIX, VISIT_PREFIX},
  patient::{IndexEntry, NewPatient, Patient, PatientRecords, PatientUpdate},
  store::FollowUpStore,
  visit::{NewVisit, Questionnaire, Visit},
};

use crate::{Error, FileStore, Result, index};

type CoreError = officine_core::Error;

// ─── Documents ───────────────────────────────────────────────────────────────

const DOCTORS: &str = "doctors";
const PATIENTS_INDEX: &str = "patients_index";
/// Source of truth for patients. Always locked before [`PATIENTS_INDEX`].
const PATIENTS_DATA: &str = "patients_data";

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Officine store backed by a directory of JSON documents.
///
/// Clones share the same documents and locks.
#[derive(Clone)]
pub struct JsonStore {
  inner: Arc<Inner>,
}

struct Inner {
  files:       FileStore,
  /// Set when an index write failed after its detail-map write succeeded.
  index_stale: AtomicBool,
}

impl JsonStore {
  /// Open (or create) a store rooted at `dir` and reconcile the patient
  /// index against the detail map, repairing any divergence left by an
  /// interrupted write.
  pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
    let store = Self {
      inner: Arc::new(Inner {
        files:       FileStore::new(dir),
        index_stale: AtomicBool::new(false),
      }),
    };
    store.reconcile_index().await?;
    Ok(store)
  }

  pub fn data_dir(&self) -> &Path { self.inner.files.dir() }

  fn files(&self) -> &FileStore { &self.inner.files }

  async fn read_doctors(&self) -> Result<Vec<Doctor>> {
    self.files().read(DOCTORS, Vec::new()).await
  }

  async fn read_records(&self) -> Result<PatientRecords> {
    self.files().read(PATIENTS_DATA, PatientRecords::new()).await
  }

  async fn read_index(&self) -> Result<Vec<IndexEntry>> {
    self.files().read(PATIENTS_INDEX, Vec::new()).await
  }

  /// Re-derive the index from the detail map, keeping its existing order,
  /// and persist it if anything changed.
  ///
  /// An index that no longer parses is discarded and rebuilt from the
  /// records. Any other read failure is returned.
  async fn reconcile_index(&self) -> Result<Vec<IndexEntry>> {
    let _data  = self.files().lock(PATIENTS_DATA).await;
    let _index = self.files().lock(PATIENTS_INDEX).await;

    let records = self.read_records().await?;
    let (mut index, corrupt) = match self.read_index().await {
      Ok(index) => (index, false),
      Err(Error::Malformed { path, source }) => {
        tracing::warn!(
          path = %path.display(),
          error = %source,
          "patient index is malformed; rebuilding from patient records"
        );
        (Vec::new(), true)
      }
      Err(e) => return Err(e),
    };

    if index::reconcile(&mut index, &records) || corrupt {
      tracing::warn!(
        entries = index.len(),
        "patient index diverged from patient records; rewriting"
      );
      self.files().write(PATIENTS_INDEX, &index).await?;
    }
    self.inner.index_stale.store(false, Ordering::SeqCst);
    Ok(index)
  }

  /// Apply `edit` to the index after the detail map has been written.
  ///
  /// Must be called with both patient locks held. The detail map is already
  /// durable at this point, so a failure here does not fail the operation:
  /// the index is flagged stale and rebuilt on the next index read.
  async fn sync_index(&self, edit: impl FnOnce(&mut Vec<IndexEntry>) + Send) {
    let result = async {
      let mut index = self.read_index().await?;
      let before    = index.clone();
      edit(&mut index);
      if index != before {
        self.files().write(PATIENTS_INDEX, &index).await?;
      }
      Ok::<_, Error>(())
    }
    .await;

    if let Err(e) = result {
      tracing::warn!(error = %e, "patient index update failed; marking stale");
      self.inner.index_stale.store(true, Ordering::SeqCst);
    }
  }
}

fn patient_not_found(id: &str) -> CoreError {
  CoreError::PatientNotFound(id.to_owned())
}

fn visit_not_found(patient_id: &str, visit_id: &str) -> CoreError {
  CoreError::VisitNotFound {
    patient_id: patient_id.to_owned(),
    visit_id:   visit_id.to_owned(),
  }
}

// ─── FollowUpStore impl ──────────────────────────────────────────────────────

impl FollowUpStore for JsonStore {
  type Error = crate::Error;

  // ── Doctors ───────────────────────────────────────────────────────────────

  async fn list_doctors(&self) -> Result<Vec<Doctor>> {
    self.read_doctors().await
  }

  async fn create_doctor(&self, input: NewDoctor) -> Result<Doctor> {
    input.validate()?;

    let _guard      = self.files().lock(DOCTORS).await;
    let mut doctors = self.read_doctors().await?;

    if doctors.iter().any(|d| d.email == input.email) {
      return Err(CoreError::DuplicateEmail(input.email).into());
    }

    let doctor = Doctor {
      id:            id::generate_unique(DOCTOR_PREFIX, |c| {
        doctors.iter().any(|d| d.id == c)
      }),
      email:         input.email,
      password_hash: input.password_hash,
      full_name:     input.full_name,
      role:          input.role,
      active:        true,
      created_at:    Utc::now(),
    };

    doctors.push(doctor.clone());
    self.files().write(DOCTORS, &doctors).await?;

    tracing::info!(doctor_id = %doctor.id, "doctor created");
    Ok(doctor)
  }

  // ── Patients ──────────────────────────────────────────────────────────────

  async fn patient_index(&self) -> Result<Vec<IndexEntry>> {
    if self.inner.index_stale.load(Ordering::SeqCst) {
      return self.reconcile_index().await;
    }
    self.read_index().await
  }

  async fn patient_records(&self) -> Result<PatientRecords> {
    self.read_records().await
  }

  async fn get_patient(&self, id: &str) -> Result<Patient> {
    let mut records = self.read_records().await?;
    records
      .remove(id)
      .ok_or_else(|| patient_not_found(id).into())
  }

  async fn create_patient(&self, input: NewPatient) -> Result<Patient> {
    input.general.validate()?;

    let _data  = self.files().lock(PATIENTS_DATA).await;
    let _index = self.files().lock(PATIENTS_INDEX).await;

    let mut records = self.read_records().await?;
    let patient = Patient {
      id:      id::generate_unique(PATIENT_PREFIX, |c| records.contains_key(c)),
      general: input.general,
      medical: input.medical,
      visits:  Vec::new(),
    };

    records.insert(patient.id.clone(), patient.clone());
    self.files().write(PATIENTS_DATA, &records).await?;

    let entry = IndexEntry::of(&patient);
    self.sync_index(move |index| index.push(entry)).await;

    tracing::info!(patient_id = %patient.id, "patient created");
    Ok(patient)
  }

  async fn update_patient(&self, id: &str, update: PatientUpdate) -> Result<Patient> {
    update.validate()?;

    let _data  = self.files().lock(PATIENTS_DATA).await;
    let _index = self.files().lock(PATIENTS_INDEX).await;

    let mut records = self.read_records().await?;
    let patient = {
      let stored = records.get_mut(id).ok_or_else(|| patient_not_found(id))?;
      stored.apply(update);
      stored.clone()
    };
    self.files().write(PATIENTS_DATA, &records).await?;

    let entry = IndexEntry::of(&patient);
    self
      .sync_index(move |index| {
        match index.iter_mut().find(|e| e.id == entry.id) {
          Some(existing) => *existing = entry,
          None => index.push(entry),
        }
      })
      .await;

    tracing::info!(patient_id = %patient.id, "patient updated");
    Ok(patient)
  }

  async fn delete_patient(&self, id: &str) -> Result<()> {
    let _data  = self.files().lock(PATIENTS_DATA).await;
    let _index = self.files().lock(PATIENTS_INDEX).await;

    let mut records = self.read_records().await?;
    if records.remove(id).is_none() {
      return Err(patient_not_found(id).into());
    }
    self.files().write(PATIENTS_DATA, &records).await?;

    self.sync_index(|index| index.retain(|e| e.id != id)).await;

    tracing::info!(patient_id = %id, "patient deleted");
    Ok(())
  }

  async fn search_patients(&self, query: &str) -> Result<Vec<IndexEntry>> {
    let needle = query.trim().to_lowercase();
    let mut index = self.patient_index().await?;
    if !needle.is_empty() {
      index.retain(|entry| entry.matches(&needle));
    }
    Ok(index)
  }

  async fn rebuild_index(&self) -> Result<Vec<IndexEntry>> {
    let _data  = self.files().lock(PATIENTS_DATA).await;
    let _index = self.files().lock(PATIENTS_INDEX).await;

    let records = self.read_records().await?;
    let index   = index::rebuild(&records);
    self.files().write(PATIENTS_INDEX, &index).await?;
    self.inner.index_stale.store(false, Ordering::SeqCst);

    tracing::info!(entries = index.len(), "patient index rebuilt");
    Ok(index)
  }

  // ── Visits ────────────────────────────────────────────────────────────────

  async fn add_visit(&self, patient_id: &str, input: NewVisit) -> Result<Visit> {
    let _data = self.files().lock(PATIENTS_DATA).await;

    let mut records = self.read_records().await?;
    let visit = {
      let patient = records
        .get_mut(patient_id)
        .ok_or_else(|| patient_not_found(patient_id))?;
      let visit = Visit {
        visit_id:        id::generate_unique(VISIT_PREFIX, |c| {
          patient.visit(c).is_some()
        }),
        at:              Utc::now(),
        doctor_id:       input.doctor_id,
        questionnaire:   input.questionnaire,
        additional_info: input.additional_info,
      };
      patient.visits.push(visit.clone());
      visit
    };
    self.files().write(PATIENTS_DATA, &records).await?;

    tracing::info!(patient_id, visit_id = %visit.visit_id, "visit added");
    Ok(visit)
  }

  async fn get_visit(&self, patient_id: &str, visit_id: &str) -> Result<Visit> {
    let patient = self.get_patient(patient_id).await?;
    patient
      .visit(visit_id)
      .cloned()
      .ok_or_else(|| visit_not_found(patient_id, visit_id).into())
  }

  async fn update_visit(
    &self,
    patient_id:    &str,
    visit_id:      &str,
    questionnaire: Questionnaire,
  ) -> Result<Visit> {
    let _data = self.files().lock(PATIENTS_DATA).await;

    let mut records = self.read_records().await?;
    let visit = {
      let visit = records
        .get_mut(patient_id)
        .ok_or_else(|| patient_not_found(patient_id))?
        .visit_mut(visit_id)
        .ok_or_else(|| visit_not_found(patient_id, visit_id))?;
      visit.questionnaire = questionnaire;
      visit.clone()
    };
    self.files().write(PATIENTS_DATA, &records).await?;

    tracing::info!(patient_id, visit_id, "visit updated");
    Ok(visit)
  }

  async fn delete_visit(&self, patient_id: &str, visit_id: &str) -> Result<()> {
    let _data = self.files().lock(PATIENTS_DATA).await;

    let mut records = self.read_records().await?;
    {
      let patient = records
        .get_mut(patient_id)
        .ok_or_else(|| patient_not_found(patient_id))?;
      let position = patient
        .visits
        .iter()
        .position(|v| v.visit_id == visit_id)
        .ok_or_else(|| visit_not_found(patient_id, visit_id))?;
      patient.visits.remove(position);
    }
    self.files().write(PATIENTS_DATA, &records).await?;

    tracing::info!(patient_id, visit_id, "visit deleted");
    Ok(())
  }
}
