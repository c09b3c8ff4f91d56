//! Handlers for the compliance dashboard.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/dashboard` | `?search=&position=&section=&status=overdue\|soon` |
//! | `GET`  | `/filters`   | Distinct positions and sections |

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::NaiveDate;
use ohs_core::{
  listing::{self, EmployeeFilter, EmployeeListing, FilterOptions, StatusFilter},
  store::ComplianceStore,
};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
  pub search:   Option<String>,
  pub position: Option<String>,
  pub section:  Option<String>,
  pub status:   Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
  /// The day statuses were evaluated against.
  pub as_of:     NaiveDate,
  pub employees: Vec<EmployeeListing>,
}

/// `GET /dashboard`
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<DashboardParams>,
) -> Result<Json<Dashboard>, ApiError>
where
  S: ComplianceStore,
{
  let status = StatusFilter::parse_optional(params.status.as_deref())?;
  let filter = EmployeeFilter {
    search:   params.search,
    position: params.position,
    section:  params.section,
  }
  .normalized();

  let roster = state.store.roster(&filter).await.map_err(ApiError::store)?;
  let as_of = (state.today)();
  let employees = listing::build(roster, status, &state.lookahead, as_of);
  Ok(Json(Dashboard { as_of, employees }))
}

/// `GET /filters`
pub async fn filters<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<FilterOptions>, ApiError>
where
  S: ComplianceStore,
{
  let options = state.store.filter_options().await.map_err(ApiError::store)?;
  Ok(Json(options))
}
