//! Handlers for `/patients` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/patients` | Optional `?q=`; searches names and phones |
//! | `POST`   | `/patients` | Body: `{"general":{…},"medical":{…}}`; returns 201 |
//! | `GET`    | `/patients/:id` | 404 if not found |
//! | `PUT`    | `/patients/:id` | Body: `{"general"?, "medical"?}`; sections replaced wholesale |
//! | `DELETE` | `/patients/:id` | 204 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use officine_core::{
  patient::{IndexEntry, NewPatient, Patient, PatientUpdate},
  store::FollowUpStore,
};
use serde::Deserialize;

use crate::error::ApiError;

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
  #[serde(default)]
  pub q: String,
}

/// `GET /patients[?q=<text>]`
pub async fn search<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<IndexEntry>>, ApiError>
where
  S: FollowUpStore,
{
  let entries = store
    .search_patients(&params.q)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(entries))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /patients`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<NewPatient>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FollowUpStore,
{
  let Json(body) = body?;
  let patient = store.create_patient(body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(patient)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /patients/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Patient>, ApiError>
where
  S: FollowUpStore,
{
  let patient = store.get_patient(&id).await.map_err(ApiError::from_store)?;
  Ok(Json(patient))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /patients/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  body: Result<Json<PatientUpdate>, JsonRejection>,
) -> Result<Json<Patient>, ApiError>
where
  S: FollowUpStore,
{
  let Json(update) = body?;
  let patient = store
    .update_patient(&id, update)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(patient))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /patients/:id`
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: FollowUpStore,
{
  store.delete_patient(&id).await.map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
