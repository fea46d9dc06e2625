//! Handlers for `/patients/:id/visits` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/patients/:id/visits` | Body: `{"doctorId","questionnaire","additionalInfo"}`; returns 201 |
//! | `GET`    | `/patients/:id/visits/:visit_id` | |
//! | `PUT`    | `/patients/:id/visits/:visit_id` | Body: `{"questionnaire":{…}}`; nothing else changes |
//! | `DELETE` | `/patients/:id/visits/:visit_id` | 204 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use officine_core::{
  store::FollowUpStore,
  visit::{NewVisit, Questionnaire, Visit},
};
use serde::Deserialize;

use crate::error::ApiError;

/// `POST /patients/:id/visits`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Path(patient_id): Path<String>,
  body: Result<Json<NewVisit>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FollowUpStore,
{
  let Json(body) = body?;
  let visit = store
    .add_visit(&patient_id, body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(visit)))
}

/// `GET /patients/:id/visits/:visit_id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path((patient_id, visit_id)): Path<(String, String)>,
) -> Result<Json<Visit>, ApiError>
where
  S: FollowUpStore,
{
  let visit = store
    .get_visit(&patient_id, &visit_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(visit))
}

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub questionnaire: Questionnaire,
}

/// `PUT /patients/:id/visits/:visit_id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path((patient_id, visit_id)): Path<(String, String)>,
  body: Result<Json<UpdateBody>, JsonRejection>,
) -> Result<Json<Visit>, ApiError>
where
  S: FollowUpStore,
{
  let Json(body) = body?;
  let visit = store
    .update_visit(&patient_id, &visit_id, body.questionnaire)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(visit))
}

/// `DELETE /patients/:id/visits/:visit_id`
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  Path((patient_id, visit_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError>
where
  S: FollowUpStore,
{
  store
    .delete_visit(&patient_id, &visit_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
