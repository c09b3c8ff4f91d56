//! Handlers for the hazard catalog.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/hazards` | In catalog order |
//! | `POST`   | `/hazards` | Body: `{"name":"Dust","periodicity":12}` |
//! | `GET`    | `/hazards/:id` | 404 if not found |
//! | `PUT`    | `/hazards/:id` | Periodicity propagates to every assignment |
//! | `DELETE` | `/hazards/:id` | `{"outcome":"in_use",...}` while referenced |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use ohs_core::{
  HazardTypeId,
  catalog::{DeleteOutcome, HazardType, HazardTypeForm},
  store::ComplianceStore,
};

use crate::{ApiState, error::ApiError, extract::ApiJson};

/// `GET /hazards`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<HazardType>>, ApiError>
where
  S: ComplianceStore,
{
  let hazards = state
    .store
    .list_hazard_types()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(hazards))
}

/// `POST /hazards`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  ApiJson(form): ApiJson<HazardTypeForm>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ComplianceStore,
{
  let hazard = state
    .store
    .create_hazard_type(form)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(hazard)))
}

/// `GET /hazards/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<HazardTypeId>,
) -> Result<Json<HazardType>, ApiError>
where
  S: ComplianceStore,
{
  let hazard = state
    .store
    .get_hazard_type(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("hazard type {id} not found")))?;
  Ok(Json(hazard))
}

/// `PUT /hazards/:id`
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<HazardTypeId>,
  ApiJson(form): ApiJson<HazardTypeForm>,
) -> Result<Json<HazardType>, ApiError>
where
  S: ComplianceStore,
{
  let hazard = state
    .store
    .update_hazard_type(id, form)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(hazard))
}

/// `DELETE /hazards/:id`
pub async fn delete<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<HazardTypeId>,
) -> Result<Json<DeleteOutcome>, ApiError>
where
  S: ComplianceStore,
{
  let outcome = state
    .store
    .delete_hazard_type(id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(outcome))
}
