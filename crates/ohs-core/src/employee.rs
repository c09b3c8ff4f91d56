//! Employee registry and the assignments linking employees to catalog items.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  AssignmentId, EmployeeId, HazardTypeId, Result, TrainingTypeId,
  catalog::required,
  ledger::non_blank,
  period::Periodicity,
};

/// An employee's identity and attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
  pub id:         EmployeeId,
  pub full_name:  String,
  pub position:   String,
  pub section:    Option<String>,
  pub birth_date: Option<NaiveDate>,
  pub address:    Option<String>,
}

// ─── Assignments ─────────────────────────────────────────────────────────────

/// A hazard that applies to an employee.
///
/// `periodicity` is a snapshot of the catalog value; it converges to the
/// catalog whenever the hazard type is edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardAssignment {
  pub id:             AssignmentId,
  pub employee_id:    EmployeeId,
  pub hazard_type_id: HazardTypeId,
  pub periodicity:    Periodicity,
}

/// A training that applies to an employee.
///
/// `periodicity` is chosen per employee and never follows later changes to
/// the catalog default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingAssignment {
  pub id:               AssignmentId,
  pub employee_id:      EmployeeId,
  pub training_type_id: TrainingTypeId,
  pub periodicity:      Periodicity,
}

/// An employee together with everything assigned to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeDetail {
  pub employee:  Employee,
  pub trainings: Vec<TrainingAssignment>,
  pub hazards:   Vec<HazardAssignment>,
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// A training the employee should have, with an optional per-employee
/// periodicity. When absent the catalog default is used for new
/// assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DesiredTraining {
  pub training_type_id: TrainingTypeId,
  pub periodicity:      Option<Periodicity>,
}

/// Input to [`crate::store::ComplianceStore::create_employee`] and
/// [`crate::store::ComplianceStore::update_employee`].
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeForm {
  pub full_name:  String,
  pub position:   String,
  pub section:    Option<String>,
  pub birth_date: Option<NaiveDate>,
  pub address:    Option<String>,
  #[serde(default)]
  pub trainings:  Vec<DesiredTraining>,
  #[serde(default)]
  pub hazards:    Vec<HazardTypeId>,
}

impl EmployeeForm {
  /// Convenience constructor with no optional attributes and no
  /// assignments.
  pub fn new(full_name: impl Into<String>, position: impl Into<String>) -> Self {
    Self {
      full_name:  full_name.into(),
      position:   position.into(),
      section:    None,
      birth_date: None,
      address:    None,
      trainings:  Vec::new(),
      hazards:    Vec::new(),
    }
  }

  /// Trim text fields, turn blank optional fields into `None`, and reject a
  /// blank name or position.
  pub fn normalized(self) -> Result<Self> {
    Ok(Self {
      full_name:  required(self.full_name, "full_name")?,
      position:   required(self.position, "position")?,
      section:    non_blank(self.section.as_deref()),
      birth_date: self.birth_date,
      address:    non_blank(self.address.as_deref()),
      trainings:  self.trainings,
      hazards:    self.hazards,
    })
  }
}
