//! Error types for `ohs-core`.

use thiserror::Error;

use crate::{AssignmentId, EmployeeId, HazardTypeId, TrainingTypeId, ledger::CheckKind};

#[derive(Debug, Error)]
pub enum Error {
  #[error("employee not found: {0}")]
  EmployeeNotFound(EmployeeId),

  #[error("hazard type not found: {0}")]
  HazardTypeNotFound(HazardTypeId),

  #[error("training type not found: {0}")]
  TrainingTypeNotFound(TrainingTypeId),

  #[error("{kind} assignment {id} not found for employee {employee_id}")]
  AssignmentNotFound {
    employee_id: EmployeeId,
    kind:        CheckKind,
    id:          AssignmentId,
  },

  #[error("periodicity must be between 1 and {max} months, got {0}", max = crate::period::MAX_MONTHS)]
  InvalidPeriodicity(i64),

  #[error("invalid date {0:?}: expected YYYY-MM-DD")]
  InvalidDate(String),

  #[error("unknown check kind: {0:?}")]
  InvalidKind(String),

  #[error("unknown status filter: {0:?}")]
  InvalidStatusFilter(String),

  #[error("{0} must not be empty")]
  MissingField(&'static str),
}

impl Error {
  /// Whether this error means the addressed row does not exist.
  pub fn is_not_found(&self) -> bool {
    matches!(
      self,
      Self::EmployeeNotFound(_)
        | Self::HazardTypeNotFound(_)
        | Self::TrainingTypeNotFound(_)
        | Self::AssignmentNotFound { .. }
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
