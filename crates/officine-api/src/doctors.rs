//! Handler for `GET /doctors` and the redacted doctor representation.

use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use officine_core::{
  doctor::{Doctor, Role},
  store::FollowUpStore,
};
use serde::Serialize;

use crate::error::ApiError;

/// A doctor as seen from outside the process: everything but the password
/// hash. Every handler returning a doctor goes through this type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorView {
  pub id:         String,
  pub email:      String,
  pub full_name:  String,
  pub role:       Role,
  pub active:     bool,
  pub created_at: DateTime<Utc>,
}

impl From<Doctor> for DoctorView {
  fn from(d: Doctor) -> Self {
    DoctorView {
      id:         d.id,
      email:      d.email,
      full_name:  d.full_name,
      role:       d.role,
      active:     d.active,
      created_at: d.created_at,
    }
  }
}

/// `GET /doctors`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<DoctorView>>, ApiError>
where
  S: FollowUpStore,
{
  let doctors = store.list_doctors().await.map_err(ApiError::from_store)?;
  Ok(Json(doctors.into_iter().map(DoctorView::from).collect()))
}
