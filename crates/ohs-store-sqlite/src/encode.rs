//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` text. Periodicities are stored as
//! integer months. Check kinds are stored as lowercase text.

use chrono::NaiveDate;
use ohs_core::{
  catalog::{HazardType, TrainingType},
  employee::{Employee, HazardAssignment, TrainingAssignment},
  ledger::{CheckKind, ComplianceRecord},
  listing::TrackedCheck,
  period::Periodicity,
};

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(column: &'static str, s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|_| Error::Decode { column, value: s.to_owned() })
}

fn decode_opt_date(column: &'static str, s: Option<String>) -> Result<Option<NaiveDate>> {
  s.as_deref().map(|s| decode_date(column, s)).transpose()
}

// ─── Periodicity ─────────────────────────────────────────────────────────────

pub fn encode_periodicity(p: Periodicity) -> i64 { i64::from(p.months()) }

pub fn decode_periodicity(column: &'static str, months: i64) -> Result<Periodicity> {
  Periodicity::new(months)
    .map_err(|_| Error::Decode { column, value: months.to_string() })
}

// ─── CheckKind ───────────────────────────────────────────────────────────────

pub fn encode_kind(k: CheckKind) -> &'static str { k.as_str() }

pub fn decode_kind(s: &str) -> Result<CheckKind> {
  s.parse()
    .map_err(|_| Error::Decode { column: "kind", value: s.to_owned() })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from an `employees` row.
pub struct RawEmployee {
  pub id:         i64,
  pub full_name:  String,
  pub position:   String,
  pub section:    Option<String>,
  pub birth_date: Option<String>,
  pub address:    Option<String>,
}

impl RawEmployee {
  pub const COLUMNS: &'static str =
    "id, full_name, position, section, birth_date, address";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      full_name:  row.get(1)?,
      position:   row.get(2)?,
      section:    row.get(3)?,
      birth_date: row.get(4)?,
      address:    row.get(5)?,
    })
  }

  pub fn into_employee(self) -> Result<Employee> {
    Ok(Employee {
      id:         self.id,
      full_name:  self.full_name,
      position:   self.position,
      section:    self.section,
      birth_date: decode_opt_date("employees.birth_date", self.birth_date)?,
      address:    self.address,
    })
  }
}

/// Raw values from a `hazard_types` or `training_types` row.
pub struct RawCatalogItem {
  pub id:          i64,
  pub name:        String,
  pub periodicity: i64,
}

impl RawCatalogItem {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { id: row.get(0)?, name: row.get(1)?, periodicity: row.get(2)? })
  }

  pub fn into_hazard_type(self) -> Result<HazardType> {
    Ok(HazardType {
      id:          self.id,
      name:        self.name,
      periodicity: decode_periodicity("hazard_types.periodicity_months", self.periodicity)?,
    })
  }

  pub fn into_training_type(self) -> Result<TrainingType> {
    Ok(TrainingType {
      id:                  self.id,
      name:                self.name,
      default_periodicity: decode_periodicity(
        "training_types.default_periodicity",
        self.periodicity,
      )?,
    })
  }
}

/// Raw values from a `hazard_assignments` or `training_assignments` row:
/// `(id, employee_id, type_id, periodicity_months)`.
pub struct RawAssignment {
  pub id:          i64,
  pub employee_id: i64,
  pub type_id:     i64,
  pub periodicity: i64,
}

impl RawAssignment {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      employee_id: row.get(1)?,
      type_id:     row.get(2)?,
      periodicity: row.get(3)?,
    })
  }

  pub fn into_hazard(self) -> Result<HazardAssignment> {
    Ok(HazardAssignment {
      id:             self.id,
      employee_id:    self.employee_id,
      hazard_type_id: self.type_id,
      periodicity:    decode_periodicity(
        "hazard_assignments.periodicity_months",
        self.periodicity,
      )?,
    })
  }

  pub fn into_training(self) -> Result<TrainingAssignment> {
    Ok(TrainingAssignment {
      id:               self.id,
      employee_id:      self.employee_id,
      training_type_id: self.type_id,
      periodicity:      decode_periodicity(
        "training_assignments.periodicity_months",
        self.periodicity,
      )?,
    })
  }
}

/// An assignment joined with its catalog name and ledger row.
pub struct RawTrackedCheck {
  pub employee_id:     i64,
  pub assignment_id:   i64,
  pub item_id:         i64,
  pub name:            String,
  pub periodicity:     i64,
  pub last_date:       Option<String>,
  pub document_number: Option<String>,
}

impl RawTrackedCheck {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      employee_id:     row.get(0)?,
      assignment_id:   row.get(1)?,
      item_id:         row.get(2)?,
      name:            row.get(3)?,
      periodicity:     row.get(4)?,
      last_date:       row.get(5)?,
      document_number: row.get(6)?,
    })
  }

  pub fn into_check(self, kind: CheckKind) -> Result<TrackedCheck> {
    Ok(TrackedCheck {
      kind,
      assignment_id:   self.assignment_id,
      item_id:         self.item_id,
      name:            self.name,
      periodicity:     decode_periodicity("periodicity_months", self.periodicity)?,
      last_date:       decode_opt_date("compliance_records.last_date", self.last_date)?,
      document_number: self.document_number,
    })
  }
}

/// Raw values from a `compliance_records` row.
pub struct RawRecord {
  pub employee_id:     i64,
  pub kind:            String,
  pub assignment_id:   i64,
  pub last_date:       Option<String>,
  pub document_number: Option<String>,
}

impl RawRecord {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      employee_id:     row.get(0)?,
      kind:            row.get(1)?,
      assignment_id:   row.get(2)?,
      last_date:       row.get(3)?,
      document_number: row.get(4)?,
    })
  }

  pub fn into_record(self) -> Result<ComplianceRecord> {
    Ok(ComplianceRecord {
      employee_id:     self.employee_id,
      kind:            decode_kind(&self.kind)?,
      assignment_id:   self.assignment_id,
      last_date:       decode_opt_date("compliance_records.last_date", self.last_date)?,
      document_number: self.document_number,
    })
  }
}
