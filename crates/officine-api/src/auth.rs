//! Handlers for `/auth` endpoints and the argon2 helpers behind them.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/signup` | Body: `{"email","password","fullName"}`; 201, 409 on duplicate email |
//! | `POST` | `/auth/login`  | Body: `{"email","password"}`; 401 on any mismatch |
//!
//! Both return a [`DoctorView`]; the stored hash never leaves this module.

use std::sync::Arc;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use officine_core::{
  doctor::{NewDoctor, Role},
  store::FollowUpStore,
};
use rand_core::OsRng;
use serde::Deserialize;

use crate::{doctors::DoctorView, error::ApiError};

// ─── Password hashing ─────────────────────────────────────────────────────────

/// Hash `password` into an argon2 PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)?
      .to_string(),
  )
}

/// Constant-time check of `password` against a stored PHC string. A hash
/// that does not parse never verifies.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
  PasswordHash::new(password_hash)
    .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
    .is_ok()
}

/// argon2 is deliberately slow; keep it off the async worker threads.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
  F: FnOnce() -> T + Send + 'static,
  T: Send + 'static,
{
  tokio::task::spawn_blocking(f)
    .await
    .map_err(|e| ApiError::Internal(Box::new(e)))
}

// ─── Signup ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupBody {
  pub email:     String,
  pub password:  String,
  pub full_name: String,
}

/// `POST /auth/signup`. Every account created here has the `doctor` role.
pub async fn signup<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<SignupBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FollowUpStore,
{
  let Json(body) = body?;
  if body.password.is_empty() {
    return Err(ApiError::BadRequest("password is required".into()));
  }

  let password = body.password;
  let password_hash = blocking(move || hash_password(&password))
    .await?
    .map_err(|e| ApiError::Internal(e.to_string().into()))?;

  let doctor = store
    .create_doctor(NewDoctor {
      email: body.email,
      password_hash,
      full_name: body.full_name,
      role: Role::Doctor,
    })
    .await
    .map_err(ApiError::from_store)?;

  Ok((StatusCode::CREATED, Json(DoctorView::from(doctor))))
}

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

/// `POST /auth/login`
///
/// Unknown email, inactive account and wrong password all produce the same
/// 401 response.
pub async fn login<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<LoginBody>, JsonRejection>,
) -> Result<Json<DoctorView>, ApiError>
where
  S: FollowUpStore,
{
  let Json(body) = body?;

  let doctor = store
    .list_doctors()
    .await
    .map_err(ApiError::from_store)?
    .into_iter()
    .find(|d| d.email == body.email && d.active)
    .ok_or(ApiError::Unauthorized)?;

  let stored_hash = doctor.password_hash.clone();
  let password    = body.password;
  let valid = blocking(move || verify_password(&password, &stored_hash)).await?;
  if !valid {
    tracing::info!(doctor_id = %doctor.id, "rejected login");
    return Err(ApiError::Unauthorized);
  }

  tracing::info!(doctor_id = %doctor.id, "login");
  Ok(Json(DoctorView::from(doctor)))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_round_trips_through_verify() {
    let hash = hash_password("s3cret").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("s3cret", &hash));
    assert!(!verify_password("wrong", &hash));
  }

  #[test]
  fn hashes_are_salted() {
    assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
  }

  #[test]
  fn garbage_hash_never_verifies() {
    assert!(!verify_password("anything", "not-a-phc-string"));
    assert!(!verify_password("", ""));
  }
}
