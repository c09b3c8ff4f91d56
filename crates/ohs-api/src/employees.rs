//! Handlers for `/employees` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/employees` | Body: [`EmployeeForm`] |
//! | `GET`    | `/employees/:id` | Employee with assignments; 404 if not found |
//! | `PUT`    | `/employees/:id` | Full replacement; assignments are reconciled |
//! | `DELETE` | `/employees/:id` | Cascades to assignments and ledger rows |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use ohs_core::{
  EmployeeId,
  employee::{Employee, EmployeeDetail, EmployeeForm},
  store::ComplianceStore,
};

use crate::{ApiState, error::ApiError, extract::ApiJson};

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /employees`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  ApiJson(form): ApiJson<EmployeeForm>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ComplianceStore,
{
  let employee = state
    .store
    .create_employee(form)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(employee)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /employees/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<EmployeeId>,
) -> Result<Json<EmployeeDetail>, ApiError>
where
  S: ComplianceStore,
{
  let detail = state
    .store
    .get_employee(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("employee {id} not found")))?;
  Ok(Json(detail))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /employees/:id`
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<EmployeeId>,
  ApiJson(form): ApiJson<EmployeeForm>,
) -> Result<Json<Employee>, ApiError>
where
  S: ComplianceStore,
{
  let employee = state
    .store
    .update_employee(id, form)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(employee))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /employees/:id`
pub async fn delete<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<EmployeeId>,
) -> Result<StatusCode, ApiError>
where
  S: ComplianceStore,
{
  state
    .store
    .delete_employee(id)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}
