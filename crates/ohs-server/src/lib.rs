//! HTTP server for the compliance tracker.
//!
//! Mounts the JSON API from [`ohs_api`] under `/api` behind HTTP Basic auth
//! and role checks, plus an unauthenticated `/health` probe.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware, routing::get};
use ohs_api::ApiState;
use ohs_core::{auth::UserStore, compliance::Lookahead, store::ComplianceStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::UserConfig;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:         String,
  #[serde(default = "default_port")]
  pub port:         u16,
  pub store_path:   PathBuf,
  /// Fill empty catalogs with the default hazards and trainings on startup.
  #[serde(default = "default_seed")]
  pub seed_catalog: bool,
  #[serde(default)]
  pub lookahead:    Lookahead,
  #[serde(default)]
  pub users:        Vec<UserConfig>,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_seed() -> bool { true }

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application router.
pub fn router<S, U>(api: ApiState<S>, users: Arc<U>) -> Router
where
  S: ComplianceStore + 'static,
  U: UserStore + 'static,
{
  let api = ohs_api::router_with_state(api)
    .layer(middleware::from_fn_with_state(users, auth::guard::<U>));

  Router::new()
    .nest("/api", api)
    .route("/health", get(health))
    .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str { "ok" }

// ─── Integration tests ────────────────────────────────────────────────────────
