//! Compliance evaluation — derive a due date and a status from a completion
//! record.
//!
//! The due date is the last completion date advanced by the periodicity in
//! calendar months. The day of month is kept where it exists and clamped to
//! the end of the month otherwise, so Jan 31 + 1 month is the last day of
//! February. The due date itself already counts as overdue.
//!
//! Nothing here is persisted: callers evaluate every assignment on every
//! read against the current date.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{ledger::CheckKind, period::Periodicity};

/// Urgency of a single assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
  /// No completion date on record.
  Never,
  /// The due date is today or in the past.
  Overdue,
  /// The due date falls inside the lookahead window.
  Soon,
  Ok,
}

/// How many days ahead of the due date a check is reported as
/// [`Status::Soon`], per check kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lookahead {
  pub training_days: u32,
  pub hazard_days:   u32,
}

impl Default for Lookahead {
  fn default() -> Self {
    Self { training_days: 30, hazard_days: 60 }
  }
}

impl Lookahead {
  pub fn days(&self, kind: CheckKind) -> u32 {
    match kind {
      CheckKind::Training => self.training_days,
      CheckKind::Hazard => self.hazard_days,
    }
  }
}

/// The derived state of one assignment as of a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
  pub next_due: Option<NaiveDate>,
  pub status:   Status,
}

/// `last` advanced by `periodicity` calendar months.
///
/// Returns `None` only when the result would fall outside chrono's
/// representable range.
pub fn next_due_date(last: NaiveDate, periodicity: Periodicity) -> Option<NaiveDate> {
  last.checked_add_months(Months::new(periodicity.months()))
}

pub fn evaluate(
  last: Option<NaiveDate>,
  periodicity: Periodicity,
  lookahead_days: u32,
  today: NaiveDate,
) -> Evaluation {
  let Some(last) = last else {
    return Evaluation { next_due: None, status: Status::Never };
  };

  let next_due = next_due_date(last, periodicity);
  let status = match next_due {
    // Beyond the calendar: never due within any meaningful horizon.
    None => Status::Ok,
    Some(due) if due <= today => Status::Overdue,
    Some(due) => {
      let horizon = today
        .checked_add_days(Days::new(u64::from(lookahead_days)))
        .unwrap_or(NaiveDate::MAX);
      if due <= horizon { Status::Soon } else { Status::Ok }
    }
  };

  Evaluation { next_due, status }
}
