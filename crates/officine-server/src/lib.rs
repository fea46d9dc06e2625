//! HTTP server wiring for Officine.
//!
//! Loads [`ServerConfig`] and mounts [`officine_api::api_router`] under
//! `/api` with request tracing.

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use officine_core::store::FollowUpStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `OFFICINE_*` environment variables (environment wins).
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:     String,
  pub port:     u16,
  /// Directory holding `doctors.json`, `patients_index.json` and
  /// `patients_data.json`. Created on first use.
  pub data_dir: PathBuf,
}

impl ServerConfig {
  /// Layer defaults, the optional TOML file at `path`, and the environment.
  pub fn load(path: impl Into<PathBuf>) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 3000)?
      .set_default("data_dir", "data")?
      .add_source(config::File::from(path.into()).required(false))
      .add_source(config::Environment::with_prefix("OFFICINE"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application router for `store`.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: FollowUpStore + 'static,
{
  Router::new()
    .nest("/api", officine_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}
