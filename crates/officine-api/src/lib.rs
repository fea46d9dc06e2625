//! JSON REST API for Officine.
//!
//! Exposes an axum [`Router`] backed by any
//! [`officine_core::store::FollowUpStore`]. This is the boundary layer: it
//! hashes and verifies passwords, strips password hashes from every doctor
//! it returns, and maps store errors to status codes. TLS and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", officine_api::api_router(store.clone()))
//! ```

pub mod auth;
pub mod doctors;
pub mod error;
pub mod patients;
pub mod visits;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use officine_core::store::FollowUpStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: FollowUpStore + 'static,
{
  Router::new()
    // Accounts
    .route("/auth/signup", post(auth::signup::<S>))
    .route("/auth/login", post(auth::login::<S>))
    .route("/doctors", get(doctors::list::<S>))
    // Patients
    .route("/patients", get(patients::search::<S>).post(patients::create::<S>))
    .route(
      "/patients/{id}",
      get(patients::get_one::<S>)
        .put(patients::update::<S>)
        .delete(patients::remove::<S>),
    )
    // Visits
    .route("/patients/{id}/visits", post(visits::create::<S>))
    .route(
      "/patients/{id}/visits/{visit_id}",
      get(visits::get_one::<S>)
        .put(visits::update::<S>)
        .delete(visits::remove::<S>),
    )
    .with_state(store)
}
