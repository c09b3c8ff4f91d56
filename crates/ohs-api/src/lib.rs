//! JSON REST API for the compliance tracker.
//!
//! Exposes an axum [`Router`] backed by any
//! [`ohs_core::store::ComplianceStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", ohs_api::api_router(store.clone(), lookahead))
//! ```

pub mod checks;
pub mod dashboard;
pub mod employees;
pub mod error;
pub mod extract;
pub mod hazards;
pub mod trainings;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use chrono::NaiveDate;
use ohs_core::{compliance::Lookahead, store::ComplianceStore};

pub use error::ApiError;
pub use extract::ApiJson;

/// Shared handler state.
pub struct ApiState<S> {
  pub store:     Arc<S>,
  pub lookahead: Lookahead,
  /// Reference day for status evaluation.
  pub today:     fn() -> NaiveDate,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:     Arc::clone(&self.store),
      lookahead: self.lookahead,
      today:     self.today,
    }
  }
}

impl<S> ApiState<S> {
  /// State evaluating statuses against the local calendar day.
  pub fn new(store: Arc<S>, lookahead: Lookahead) -> Self {
    Self { store, lookahead, today: local_today }
  }
}

fn local_today() -> NaiveDate { chrono::Local::now().date_naive() }

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, lookahead: Lookahead) -> Router<()>
where
  S: ComplianceStore + 'static,
{
  router_with_state(ApiState::new(store, lookahead))
}

/// Like [`api_router`], with full control over the handler state.
pub fn router_with_state<S>(state: ApiState<S>) -> Router<()>
where
  S: ComplianceStore + 'static,
{
  Router::new()
    // Dashboard
    .route("/dashboard", get(dashboard::handler::<S>))
    .route("/filters", get(dashboard::filters::<S>))
    // Employees
    .route("/employees", post(employees::create::<S>))
    .route(
      "/employees/{id}",
      get(employees::get_one::<S>)
        .put(employees::update::<S>)
        .delete(employees::delete::<S>),
    )
    .route(
      "/employees/{id}/checks/{kind}/{assignment_id}",
      put(checks::set::<S>),
    )
    // Catalogs
    .route("/hazards", get(hazards::list::<S>).post(hazards::create::<S>))
    .route(
      "/hazards/{id}",
      get(hazards::get_one::<S>)
        .put(hazards::update::<S>)
        .delete(hazards::delete::<S>),
    )
    .route(
      "/trainings",
      get(trainings::list::<S>).post(trainings::create::<S>),
    )
    .with_state(state)
}
