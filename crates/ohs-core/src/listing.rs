//! The compliance dashboard: which employees to show and the evaluated
//! status of each of their checks.
//!
//! The store supplies a [`RosterEntry`] per employee matching an
//! [`EmployeeFilter`]; [`build`] evaluates every check and applies the
//! optional [`StatusFilter`].

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  AssignmentId, Error, Result,
  compliance::{Lookahead, Status, evaluate},
  employee::Employee,
  ledger::{CheckKind, non_blank},
  period::Periodicity,
};

// ─── Query ───────────────────────────────────────────────────────────────────

/// Employee-level filters; all present fields must match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeFilter {
  /// Case-insensitive substring of the full name.
  pub search:   Option<String>,
  /// Exact position.
  pub position: Option<String>,
  /// Exact section.
  pub section:  Option<String>,
}

impl EmployeeFilter {
  /// Drop blank criteria so that an empty form field means "any".
  pub fn normalized(self) -> Self {
    Self {
      search:   non_blank(self.search.as_deref()),
      position: non_blank(self.position.as_deref()),
      section:  non_blank(self.section.as_deref()),
    }
  }

  pub fn matches_name(&self, full_name: &str) -> bool {
    match &self.search {
      None => true,
      Some(needle) => full_name.to_lowercase().contains(&needle.to_lowercase()),
    }
  }

  pub fn matches(&self, employee: &Employee) -> bool {
    self.matches_name(&employee.full_name)
      && self.position.as_ref().is_none_or(|p| *p == employee.position)
      && self
        .section
        .as_ref()
        .is_none_or(|s| Some(s) == employee.section.as_ref())
  }
}

/// Restrict the dashboard to checks needing attention.
///
/// Checks that were never completed always pass the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
  Overdue,
  Soon,
}

impl StatusFilter {
  /// Parse an optional query value; blank means no filter.
  pub fn parse_optional(raw: Option<&str>) -> Result<Option<Self>> {
    non_blank(raw).map(|s| s.parse()).transpose()
  }

  pub fn admits(self, status: Status) -> bool {
    status == Status::Never
      || matches!(
        (self, status),
        (Self::Overdue, Status::Overdue) | (Self::Soon, Status::Soon)
      )
  }
}

impl FromStr for StatusFilter {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "overdue" => Ok(Self::Overdue),
      "soon" => Ok(Self::Soon),
      other => Err(Error::InvalidStatusFilter(other.to_owned())),
    }
  }
}

/// Distinct non-empty values present in the registry, for filter pickers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
  pub positions: Vec<String>,
  pub sections:  Vec<String>,
}

// ─── Store rows ──────────────────────────────────────────────────────────────

/// One assignment joined with its catalog item and ledger row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedCheck {
  pub kind:            CheckKind,
  pub assignment_id:   AssignmentId,
  /// Id of the hazard type or training type.
  pub item_id:         i64,
  pub name:            String,
  pub periodicity:     Periodicity,
  pub last_date:       Option<NaiveDate>,
  pub document_number: Option<String>,
}

/// An employee with all of their tracked checks, trainings first.
#[derive(Debug, Clone)]
pub struct RosterEntry {
  pub employee: Employee,
  pub checks:   Vec<TrackedCheck>,
}

// ─── Output ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatedCheck {
  pub kind:            CheckKind,
  pub assignment_id:   AssignmentId,
  pub item_id:         i64,
  pub name:            String,
  pub periodicity:     Periodicity,
  pub period_label:    String,
  pub last_date:       Option<NaiveDate>,
  pub next_due:        Option<NaiveDate>,
  pub document_number: Option<String>,
  pub status:          Status,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeListing {
  pub employee: Employee,
  pub checks:   Vec<EvaluatedCheck>,
}

/// Evaluate every check of every roster entry as of `today`.
///
/// Without a status filter every entry is returned with all of its checks.
/// With one, each entry keeps only the checks the filter admits and entries
/// left with no checks are dropped.
pub fn build(
  roster: Vec<RosterEntry>,
  status_filter: Option<StatusFilter>,
  lookahead: &Lookahead,
  today: NaiveDate,
) -> Vec<EmployeeListing> {
  roster
    .into_iter()
    .filter_map(|entry| {
      let checks: Vec<EvaluatedCheck> = entry
        .checks
        .into_iter()
        .map(|check| evaluate_check(check, lookahead, today))
        .filter(|check| status_filter.is_none_or(|f| f.admits(check.status)))
        .collect();

      if status_filter.is_some() && checks.is_empty() {
        None
      } else {
        Some(EmployeeListing { employee: entry.employee, checks })
      }
    })
    .collect()
}

fn evaluate_check(
  check: TrackedCheck,
  lookahead: &Lookahead,
  today: NaiveDate,
) -> EvaluatedCheck {
  let eval = evaluate(
    check.last_date,
    check.periodicity,
    lookahead.days(check.kind),
    today,
  );
  EvaluatedCheck {
    kind:            check.kind,
    assignment_id:   check.assignment_id,
    item_id:         check.item_id,
    name:            check.name,
    periodicity:     check.periodicity,
    period_label:    check.periodicity.to_string(),
    last_date:       check.last_date,
    next_due:        eval.next_due,
    document_number: check.document_number,
    status:          eval.status,
  }
}
