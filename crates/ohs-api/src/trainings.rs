//! Handlers for the training catalog. Training types can only be added.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use ohs_core::{
  catalog::{TrainingType, TrainingTypeForm},
  store::ComplianceStore,
};

use crate::{ApiState, error::ApiError, extract::ApiJson};

/// `GET /trainings`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<TrainingType>>, ApiError>
where
  S: ComplianceStore,
{
  let trainings = state
    .store
    .list_training_types()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(trainings))
}

/// `POST /trainings` — body: `{"name":"First aid","default_periodicity":12}`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  ApiJson(form): ApiJson<TrainingTypeForm>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ComplianceStore,
{
  let training = state
    .store
    .create_training_type(form)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(training)))
}
