//! Reference lists of hazard types and training types.
//!
//! Hazard periodicity is authoritative: editing it overwrites the
//! periodicity of every assignment referencing the hazard. Training
//! periodicity is only a default offered when a new assignment is created.

use serde::{Deserialize, Serialize};

use crate::{Error, HazardTypeId, Result, TrainingTypeId, period::Periodicity};

// ─── Hazard types ────────────────────────────────────────────────────────────

/// A workplace risk factor requiring a periodic medical examination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardType {
  pub id:          HazardTypeId,
  pub name:        String,
  pub periodicity: Periodicity,
}

/// Input for creating or editing a [`HazardType`].
#[derive(Debug, Clone, Deserialize)]
pub struct HazardTypeForm {
  pub name:        String,
  #[serde(default)]
  pub periodicity: Periodicity,
}

impl HazardTypeForm {
  pub fn new(name: impl Into<String>, periodicity: Periodicity) -> Self {
    Self { name: name.into(), periodicity }
  }

  /// Trim the name and reject blank input.
  pub fn normalized(mut self) -> Result<Self> {
    self.name = required(self.name, "name")?;
    Ok(self)
  }
}

/// Result of a delete request against a hazard type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeleteOutcome {
  Deleted,
  /// Refused: still referenced by this many assignments. Nothing changed.
  InUse { assignments: u64 },
}

// ─── Training types ──────────────────────────────────────────────────────────

/// A category of mandatory periodic instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingType {
  pub id:                  TrainingTypeId,
  pub name:                String,
  pub default_periodicity: Periodicity,
}

/// Input for creating a [`TrainingType`].
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingTypeForm {
  pub name:                String,
  #[serde(default)]
  pub default_periodicity: Periodicity,
}

impl TrainingTypeForm {
  pub fn new(name: impl Into<String>, default_periodicity: Periodicity) -> Self {
    Self { name: name.into(), default_periodicity }
  }

  pub fn normalized(mut self) -> Result<Self> {
    self.name = required(self.name, "name")?;
    Ok(self)
  }
}

// ─── Default catalog ─────────────────────────────────────────────────────────

/// Training types inserted into an empty database: `(name, months)`.
pub const DEFAULT_TRAINING_TYPES: &[(&str, u32)] = &[
  ("Occupational safety", 36),
  ("Electrical safety", 12),
  ("Industrial safety", 12),
];

/// Hazard types inserted into an empty database: `(name, months)`.
pub const DEFAULT_HAZARD_TYPES: &[(&str, u32)] = &[
  ("Noise and vibration", 12),
  ("Chemical substances", 12),
  ("Work at height", 12),
  ("Dust", 12),
  ("Biological factors", 24),
];

pub(crate) fn required(value: String, field: &'static str) -> Result<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    Err(Error::MissingField(field))
  } else {
    Ok(trimmed.to_owned())
  }
}
