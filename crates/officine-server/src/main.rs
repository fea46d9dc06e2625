//! officine-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the JSON
//! flat-file store under `data_dir`, and serves the REST API under `/api`.
//!
//! # Index recovery
//!
//! To regenerate `patients_index.json` from `patients_data.json` and exit:
//!
//! ```
//! cargo run -p officine-server -- --rebuild-index
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use officine_core::store::FollowUpStore as _;
use officine_server::ServerConfig;
use officine_store_json::JsonStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Officine patient follow-up server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Rebuild the patient index from the detail map and exit.
  #[arg(long)]
  rebuild_index: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg =
    ServerConfig::load(&cli.config).context("failed to load server configuration")?;

  let data_dir = expand_tilde(&server_cfg.data_dir);
  let store = JsonStore::open(&data_dir)
    .await
    .with_context(|| format!("failed to open store at {data_dir:?}"))?;

  if cli.rebuild_index {
    let entries = store
      .rebuild_index()
      .await
      .context("failed to rebuild patient index")?;
    tracing::info!(patients = entries.len(), "patient index rebuilt");
    return Ok(());
  }

  let app = officine_server::router(Arc::new(store));
  let address = server_cfg.address();

  tracing::info!(data_dir = %data_dir.display(), "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
