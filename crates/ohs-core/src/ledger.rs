//! When each assignment was last fulfilled, and under which document.
//!
//! A ledger row is keyed by `(employee, kind, assignment)`. A missing row
//! means the check was never completed. Status is never stored here; see
//! [`crate::compliance`].

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{AssignmentId, EmployeeId, Error, Result};

/// Which family of assignment a ledger row refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
  Training,
  Hazard,
}

impl CheckKind {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Training => "training",
      Self::Hazard => "hazard",
    }
  }
}

impl fmt::Display for CheckKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for CheckKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "training" => Ok(Self::Training),
      "hazard" => Ok(Self::Hazard),
      other => Err(Error::InvalidKind(other.to_owned())),
    }
  }
}

/// A persisted completion fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceRecord {
  pub employee_id:     EmployeeId,
  pub kind:            CheckKind,
  pub assignment_id:   AssignmentId,
  pub last_date:       Option<NaiveDate>,
  pub document_number: Option<String>,
}

/// Input to [`crate::store::ComplianceStore::set_completion`].
///
/// `date: None` deletes the existing record; `Some` upserts it.
#[derive(Debug, Clone)]
pub struct CompletionInput {
  pub employee_id:     EmployeeId,
  pub kind:            CheckKind,
  pub assignment_id:   AssignmentId,
  pub date:            Option<NaiveDate>,
  pub document_number: Option<String>,
}

impl CompletionInput {
  /// Build an input from raw form strings. Blank strings count as absent.
  pub fn parse(
    employee_id: EmployeeId,
    kind: CheckKind,
    assignment_id: AssignmentId,
    date: Option<&str>,
    document_number: Option<&str>,
  ) -> Result<Self> {
    Ok(Self {
      employee_id,
      kind,
      assignment_id,
      date: parse_optional_date(date)?,
      document_number: non_blank(document_number),
    })
  }
}

/// Parse a `YYYY-MM-DD` date; blank or missing input yields `None`.
pub fn parse_optional_date(raw: Option<&str>) -> Result<Option<NaiveDate>> {
  match raw.map(str::trim).filter(|s| !s.is_empty()) {
    None => Ok(None),
    Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
      .map(Some)
      .map_err(|_| Error::InvalidDate(s.to_owned())),
  }
}

pub(crate) fn non_blank(raw: Option<&str>) -> Option<String> {
  raw.map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned)
}
