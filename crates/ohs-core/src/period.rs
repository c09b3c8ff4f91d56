//! Periodicity — how many calendar months may pass between two completions of
//! a check.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Upper bound accepted for a periodicity: one hundred years.
pub const MAX_MONTHS: u32 = 1200;

/// A positive number of calendar months.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "u32")]
pub struct Periodicity(u32);

impl Periodicity {
  /// Catalog default for hazard types created without an explicit value.
  pub const DEFAULT: Self = Self(12);

  pub fn new(months: i64) -> Result<Self> {
    if (1..=i64::from(MAX_MONTHS)).contains(&months) {
      Ok(Self(months as u32))
    } else {
      Err(Error::InvalidPeriodicity(months))
    }
  }

  pub fn months(self) -> u32 { self.0 }
}

impl Default for Periodicity {
  fn default() -> Self { Self::DEFAULT }
}

impl TryFrom<i64> for Periodicity {
  type Error = Error;

  fn try_from(months: i64) -> Result<Self> { Self::new(months) }
}

impl From<Periodicity> for u32 {
  fn from(p: Periodicity) -> Self { p.0 }
}

/// Renders whole years as years and everything else as months, e.g.
/// `1 year`, `3 years`, `18 months`.
impl fmt::Display for Periodicity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let (n, unit) = if self.0 % 12 == 0 {
      (self.0 / 12, "year")
    } else {
      (self.0, "month")
    };
    if n == 1 {
      write!(f, "1 {unit}")
    } else {
      write!(f, "{n} {unit}s")
    }
  }
}
