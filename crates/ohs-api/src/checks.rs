//! Handler for recording a completion against one assignment.
//!
//! `PUT /employees/:id/checks/:kind/:assignment_id` with body
//! `{"date": "2025-01-31", "document_number": "12-A"}`. A blank or absent
//! date clears the record and answers `204 No Content`.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use ohs_core::{
  AssignmentId, EmployeeId,
  ledger::{CheckKind, CompletionInput},
  store::ComplianceStore,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError, extract::ApiJson};

#[derive(Debug, Default, Deserialize)]
pub struct CompletionBody {
  pub date:            Option<String>,
  pub document_number: Option<String>,
}

/// `PUT /employees/:id/checks/:kind/:assignment_id`
pub async fn set<S>(
  State(state): State<ApiState<S>>,
  Path((employee_id, kind, assignment_id)): Path<(EmployeeId, String, AssignmentId)>,
  ApiJson(body): ApiJson<CompletionBody>,
) -> Result<Response, ApiError>
where
  S: ComplianceStore,
{
  let kind: CheckKind = kind.parse()?;
  let input = CompletionInput::parse(
    employee_id,
    kind,
    assignment_id,
    body.date.as_deref(),
    body.document_number.as_deref(),
  )?;

  let record = state
    .store
    .set_completion(input)
    .await
    .map_err(ApiError::store)?;
  Ok(match record {
    Some(record) => Json(record).into_response(),
    None => StatusCode::NO_CONTENT.into_response(),
  })
}
