//! The `ComplianceStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `ohs-store-sqlite`).
//! Higher layers (`ohs-api`, `ohs-server`) depend on this abstraction, not
//! on any concrete backend.
//!
//! Every write method is atomic: it either applies all of its row changes
//! or none. Not-found and validation failures are reported through the
//! backend error, which wraps a [`crate::Error`].

use std::future::Future;

use crate::{
  EmployeeId, HazardTypeId,
  catalog::{DeleteOutcome, HazardType, HazardTypeForm, TrainingType, TrainingTypeForm},
  employee::{Employee, EmployeeDetail, EmployeeForm},
  ledger::{ComplianceRecord, CompletionInput},
  listing::{EmployeeFilter, FilterOptions, RosterEntry},
};

/// Abstraction over a compliance store backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ComplianceStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Employees ─────────────────────────────────────────────────────────

  /// Insert an employee and all of the submitted assignments.
  ///
  /// Hazard assignments take the catalog periodicity; training assignments
  /// take the submitted periodicity or the catalog default.
  fn create_employee(
    &self,
    form: EmployeeForm,
  ) -> impl Future<Output = Result<Employee, Self::Error>> + Send + '_;

  /// Update an employee's attributes and reconcile their assignments
  /// against the submitted selection (see [`crate::reconcile`]).
  fn update_employee(
    &self,
    id: EmployeeId,
    form: EmployeeForm,
  ) -> impl Future<Output = Result<Employee, Self::Error>> + Send + '_;

  /// Retrieve an employee with their assignments. `None` if not found.
  fn get_employee(
    &self,
    id: EmployeeId,
  ) -> impl Future<Output = Result<Option<EmployeeDetail>, Self::Error>> + Send + '_;

  /// Delete an employee together with all of their assignments and ledger
  /// rows.
  fn delete_employee(
    &self,
    id: EmployeeId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Dashboard ─────────────────────────────────────────────────────────

  /// Employees matching `filter`, each with every assignment joined to its
  /// catalog item and ledger row. Status is left to
  /// [`crate::listing::build`].
  fn roster<'a>(
    &'a self,
    filter: &'a EmployeeFilter,
  ) -> impl Future<Output = Result<Vec<RosterEntry>, Self::Error>> + Send + 'a;

  /// Distinct positions and sections currently in use.
  fn filter_options(
    &self,
  ) -> impl Future<Output = Result<FilterOptions, Self::Error>> + Send + '_;

  // ── Ledger ────────────────────────────────────────────────────────────

  /// Record or clear the completion of one assignment.
  ///
  /// Returns the stored record, or `None` when `input.date` was absent and
  /// the record (if any) was deleted.
  fn set_completion(
    &self,
    input: CompletionInput,
  ) -> impl Future<Output = Result<Option<ComplianceRecord>, Self::Error>> + Send + '_;

  // ── Hazard catalog ────────────────────────────────────────────────────

  fn list_hazard_types(
    &self,
  ) -> impl Future<Output = Result<Vec<HazardType>, Self::Error>> + Send + '_;

  fn get_hazard_type(
    &self,
    id: HazardTypeId,
  ) -> impl Future<Output = Result<Option<HazardType>, Self::Error>> + Send + '_;

  fn create_hazard_type(
    &self,
    form: HazardTypeForm,
  ) -> impl Future<Output = Result<HazardType, Self::Error>> + Send + '_;

  /// Rename a hazard type and set its periodicity, overwriting the
  /// periodicity of every assignment that references it. Ledger rows are
  /// not touched.
  fn update_hazard_type(
    &self,
    id: HazardTypeId,
    form: HazardTypeForm,
  ) -> impl Future<Output = Result<HazardType, Self::Error>> + Send + '_;

  /// Delete a hazard type unless an assignment still references it, in
  /// which case nothing changes and [`DeleteOutcome::InUse`] is returned.
  fn delete_hazard_type(
    &self,
    id: HazardTypeId,
  ) -> impl Future<Output = Result<DeleteOutcome, Self::Error>> + Send + '_;

  // ── Training catalog ──────────────────────────────────────────────────

  fn list_training_types(
    &self,
  ) -> impl Future<Output = Result<Vec<TrainingType>, Self::Error>> + Send + '_;

  /// Training types have no edit or delete path; their defaults only seed
  /// assignments created afterwards.
  fn create_training_type(
    &self,
    form: TrainingTypeForm,
  ) -> impl Future<Output = Result<TrainingType, Self::Error>> + Send + '_;
}
