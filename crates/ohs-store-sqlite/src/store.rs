//! [`SqliteStore`] — the SQLite implementation of [`ComplianceStore`].

use std::{collections::HashMap, path::Path};

use rusqlite::{Connection, OptionalExtension as _, Transaction, params};

use ohs_core::{
  AssignmentId, EmployeeId, HazardTypeId, TrainingTypeId,
  catalog::{
    DEFAULT_HAZARD_TYPES, DEFAULT_TRAINING_TYPES, DeleteOutcome, HazardType,
    HazardTypeForm, TrainingType, TrainingTypeForm,
  },
  employee::{
    Employee, EmployeeDetail, EmployeeForm, HazardAssignment, TrainingAssignment,
  },
  ledger::{CheckKind, ComplianceRecord, CompletionInput},
  listing::{EmployeeFilter, FilterOptions, RosterEntry, TrackedCheck},
  period::Periodicity,
  reconcile::{HazardPlan, TrainingPlan, plan_hazards, plan_trainings},
  store::ComplianceStore,
};

use crate::{
  Error, Result,
  encode::{
    RawAssignment, RawCatalogItem, RawEmployee, RawRecord, RawTrackedCheck,
    decode_periodicity, encode_date, encode_kind, encode_periodicity,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A compliance store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert the default training and hazard catalogs into whichever of the
  /// two tables is empty. Returns `true` if anything was inserted.
  pub async fn seed_default_catalog(&self) -> Result<bool> {
    let seeded = self
      .write(|tx| {
        let mut seeded = false;
        if count(tx, "SELECT COUNT(*) FROM training_types", [])? == 0 {
          for (name, months) in DEFAULT_TRAINING_TYPES {
            tx.execute(
              "INSERT INTO training_types (name, default_periodicity) VALUES (?1, ?2)",
              params![name, months],
            )?;
          }
          seeded = true;
        }
        if count(tx, "SELECT COUNT(*) FROM hazard_types", [])? == 0 {
          for (name, months) in DEFAULT_HAZARD_TYPES {
            tx.execute(
              "INSERT INTO hazard_types (name, periodicity_months) VALUES (?1, ?2)",
              params![name, months],
            )?;
          }
          seeded = true;
        }
        Ok(seeded)
      })
      .await?;

    if seeded {
      tracing::info!("seeded default catalog");
    }
    Ok(seeded)
  }

  /// Run `f` against the connection without a transaction.
  pub(crate) async fn read<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self.conn.call(move |conn| Ok(f(conn))).await?
  }

  /// Run `f` inside a transaction that commits only if `f` succeeds.
  pub(crate) async fn write<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&Transaction<'_>) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let out = f(&tx);
        if out.is_ok() {
          tx.commit()?;
        }
        Ok(out)
      })
      .await?
  }
}

// ─── Row helpers ─────────────────────────────────────────────────────────────

fn count(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> Result<i64> {
  Ok(conn.query_row(sql, params, |r| r.get(0))?)
}

fn fetch_employee(conn: &Connection, id: EmployeeId) -> Result<Option<Employee>> {
  let raw = conn
    .query_row(
      &format!("SELECT {} FROM employees WHERE id = ?1", RawEmployee::COLUMNS),
      params![id],
      RawEmployee::from_row,
    )
    .optional()?;
  raw.map(RawEmployee::into_employee).transpose()
}

fn require_employee(conn: &Connection, id: EmployeeId) -> Result<()> {
  if count(conn, "SELECT COUNT(*) FROM employees WHERE id = ?1", params![id])? == 0 {
    return Err(ohs_core::Error::EmployeeNotFound(id).into());
  }
  Ok(())
}

fn fetch_hazard_assignments(
  conn: &Connection,
  employee_id: EmployeeId,
) -> Result<Vec<HazardAssignment>> {
  let mut stmt = conn.prepare(
    "SELECT id, employee_id, hazard_type_id, periodicity_months
     FROM hazard_assignments WHERE employee_id = ?1 ORDER BY id",
  )?;
  let raws = stmt
    .query_map(params![employee_id], RawAssignment::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawAssignment::into_hazard).collect()
}

fn fetch_training_assignments(
  conn: &Connection,
  employee_id: EmployeeId,
) -> Result<Vec<TrainingAssignment>> {
  let mut stmt = conn.prepare(
    "SELECT id, employee_id, training_type_id, periodicity_months
     FROM training_assignments WHERE employee_id = ?1 ORDER BY id",
  )?;
  let raws = stmt
    .query_map(params![employee_id], RawAssignment::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawAssignment::into_training).collect()
}

fn fetch_hazard_type(conn: &Connection, id: HazardTypeId) -> Result<Option<HazardType>> {
  let raw = conn
    .query_row(
      "SELECT id, name, periodicity_months FROM hazard_types WHERE id = ?1",
      params![id],
      RawCatalogItem::from_row,
    )
    .optional()?;
  raw.map(RawCatalogItem::into_hazard_type).transpose()
}

/// Current catalog periodicity of a hazard type.
fn hazard_periodicity(conn: &Connection, id: HazardTypeId) -> Result<Periodicity> {
  fetch_hazard_type(conn, id)?
    .map(|h| h.periodicity)
    .ok_or_else(|| ohs_core::Error::HazardTypeNotFound(id).into())
}

/// Catalog default periodicity of a training type.
fn training_default(conn: &Connection, id: TrainingTypeId) -> Result<Periodicity> {
  let months: Option<i64> = conn
    .query_row(
      "SELECT default_periodicity FROM training_types WHERE id = ?1",
      params![id],
      |r| r.get(0),
    )
    .optional()?;
  match months {
    Some(m) => decode_periodicity("training_types.default_periodicity", m),
    None => Err(ohs_core::Error::TrainingTypeNotFound(id).into()),
  }
}

fn assignment_table(kind: CheckKind) -> &'static str {
  match kind {
    CheckKind::Training => "training_assignments",
    CheckKind::Hazard => "hazard_assignments",
  }
}

fn delete_record(
  conn: &Connection,
  employee_id: EmployeeId,
  kind: CheckKind,
  assignment_id: AssignmentId,
) -> Result<usize> {
  Ok(conn.execute(
    "DELETE FROM compliance_records
     WHERE employee_id = ?1 AND kind = ?2 AND assignment_id = ?3",
    params![employee_id, encode_kind(kind), assignment_id],
  )?)
}

/// Delete an assignment and its ledger row.
fn delete_assignment(
  conn: &Connection,
  employee_id: EmployeeId,
  kind: CheckKind,
  assignment_id: AssignmentId,
) -> Result<()> {
  delete_record(conn, employee_id, kind, assignment_id)?;
  conn.execute(
    &format!("DELETE FROM {} WHERE id = ?1", assignment_table(kind)),
    params![assignment_id],
  )?;
  Ok(())
}

fn apply_hazard_plan(conn: &Connection, employee_id: EmployeeId, plan: HazardPlan) -> Result<()> {
  for id in plan.remove {
    delete_assignment(conn, employee_id, CheckKind::Hazard, id)?;
  }
  for assignment in plan.retain {
    let p = hazard_periodicity(conn, assignment.hazard_type_id)?;
    conn.execute(
      "UPDATE hazard_assignments SET periodicity_months = ?1 WHERE id = ?2",
      params![encode_periodicity(p), assignment.id],
    )?;
  }
  for hazard_type_id in plan.add {
    let p = hazard_periodicity(conn, hazard_type_id)?;
    conn.execute(
      "INSERT INTO hazard_assignments (employee_id, hazard_type_id, periodicity_months)
       VALUES (?1, ?2, ?3)",
      params![employee_id, hazard_type_id, encode_periodicity(p)],
    )?;
  }
  Ok(())
}

fn apply_training_plan(
  conn: &Connection,
  employee_id: EmployeeId,
  plan: TrainingPlan,
) -> Result<()> {
  for id in plan.remove {
    delete_assignment(conn, employee_id, CheckKind::Training, id)?;
  }
  for (id, p) in plan.update {
    conn.execute(
      "UPDATE training_assignments SET periodicity_months = ?1 WHERE id = ?2",
      params![encode_periodicity(p), id],
    )?;
  }
  for desired in plan.add {
    let default = training_default(conn, desired.training_type_id)?;
    let p = desired.periodicity.unwrap_or(default);
    conn.execute(
      "INSERT INTO training_assignments (employee_id, training_type_id, periodicity_months)
       VALUES (?1, ?2, ?3)",
      params![employee_id, desired.training_type_id, encode_periodicity(p)],
    )?;
  }
  Ok(())
}

/// Every assignment of one kind joined with its catalog row and ledger row,
/// grouped by employee.
fn fetch_tracked_checks(
  conn: &Connection,
  kind: CheckKind,
) -> Result<HashMap<EmployeeId, Vec<TrackedCheck>>> {
  let (table, catalog, type_column) = match kind {
    CheckKind::Training => ("training_assignments", "training_types", "training_type_id"),
    CheckKind::Hazard => ("hazard_assignments", "hazard_types", "hazard_type_id"),
  };
  let sql = format!(
    "SELECT a.employee_id, a.id, c.id, c.name, a.periodicity_months,
            r.last_date, r.document_number
     FROM {table} a
     JOIN {catalog} c ON c.id = a.{type_column}
     LEFT JOIN compliance_records r
       ON r.employee_id = a.employee_id
      AND r.kind = ?1
      AND r.assignment_id = a.id
     ORDER BY a.employee_id, a.id"
  );

  let mut stmt = conn.prepare(&sql)?;
  let raws = stmt
    .query_map(params![encode_kind(kind)], RawTrackedCheck::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut grouped: HashMap<EmployeeId, Vec<TrackedCheck>> = HashMap::new();
  for raw in raws {
    let employee_id = raw.employee_id;
    grouped.entry(employee_id).or_default().push(raw.into_check(kind)?);
  }
  Ok(grouped)
}

fn distinct_column(conn: &Connection, column: &str) -> Result<Vec<String>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT DISTINCT {column} FROM employees
     WHERE {column} IS NOT NULL AND {column} <> ''
     ORDER BY {column}"
  ))?;
  let values = stmt
    .query_map([], |r| r.get(0))?
    .collect::<rusqlite::Result<Vec<String>>>()?;
  Ok(values)
}

// ─── ComplianceStore impl ────────────────────────────────────────────────────

impl ComplianceStore for SqliteStore {
  type Error = Error;

  // ── Employees ─────────────────────────────────────────────────────────────

  async fn create_employee(&self, form: EmployeeForm) -> Result<Employee> {
    let form = form.normalized()?;

    let employee = self
      .write(move |tx| {
        tx.execute(
          "INSERT INTO employees (full_name, position, section, birth_date, address)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          params![
            form.full_name,
            form.position,
            form.section,
            form.birth_date.map(encode_date),
            form.address,
          ],
        )?;
        let id = tx.last_insert_rowid();

        apply_training_plan(tx, id, plan_trainings(&[], &form.trainings))?;
        apply_hazard_plan(tx, id, plan_hazards(&[], &form.hazards))?;

        fetch_employee(tx, id)?.ok_or_else(|| ohs_core::Error::EmployeeNotFound(id).into())
      })
      .await?;

    tracing::info!(employee_id = employee.id, "created employee");
    Ok(employee)
  }

  async fn update_employee(&self, id: EmployeeId, form: EmployeeForm) -> Result<Employee> {
    let form = form.normalized()?;

    let employee = self
      .write(move |tx| {
        let changed = tx.execute(
          "UPDATE employees
           SET full_name = ?1, position = ?2, section = ?3, birth_date = ?4, address = ?5
           WHERE id = ?6",
          params![
            form.full_name,
            form.position,
            form.section,
            form.birth_date.map(encode_date),
            form.address,
            id,
          ],
        )?;
        if changed == 0 {
          return Err(ohs_core::Error::EmployeeNotFound(id).into());
        }

        let trainings = fetch_training_assignments(tx, id)?;
        apply_training_plan(tx, id, plan_trainings(&trainings, &form.trainings))?;

        let hazards = fetch_hazard_assignments(tx, id)?;
        apply_hazard_plan(tx, id, plan_hazards(&hazards, &form.hazards))?;

        fetch_employee(tx, id)?.ok_or_else(|| ohs_core::Error::EmployeeNotFound(id).into())
      })
      .await?;

    tracing::info!(employee_id = id, "updated employee");
    Ok(employee)
  }

  async fn get_employee(&self, id: EmployeeId) -> Result<Option<EmployeeDetail>> {
    self
      .read(move |conn| {
        let Some(employee) = fetch_employee(conn, id)? else {
          return Ok(None);
        };
        Ok(Some(EmployeeDetail {
          employee,
          trainings: fetch_training_assignments(conn, id)?,
          hazards: fetch_hazard_assignments(conn, id)?,
        }))
      })
      .await
  }

  async fn delete_employee(&self, id: EmployeeId) -> Result<()> {
    // Assignments and ledger rows go with the employee via ON DELETE CASCADE.
    self
      .write(move |tx| {
        let deleted = tx.execute("DELETE FROM employees WHERE id = ?1", params![id])?;
        if deleted == 0 {
          return Err(ohs_core::Error::EmployeeNotFound(id).into());
        }
        Ok(())
      })
      .await?;

    tracing::info!(employee_id = id, "deleted employee");
    Ok(())
  }

  // ── Dashboard ─────────────────────────────────────────────────────────────

  async fn roster(&self, filter: &EmployeeFilter) -> Result<Vec<RosterEntry>> {
    let filter = filter.clone().normalized();

    self
      .read(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM employees
           WHERE (?1 IS NULL OR position = ?1)
             AND (?2 IS NULL OR section = ?2)
           ORDER BY full_name COLLATE NOCASE, id",
          RawEmployee::COLUMNS
        ))?;
        let raws = stmt
          .query_map(
            params![filter.position, filter.section],
            RawEmployee::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut trainings = fetch_tracked_checks(conn, CheckKind::Training)?;
        let mut hazards = fetch_tracked_checks(conn, CheckKind::Hazard)?;

        let mut entries = Vec::new();
        for raw in raws {
          // SQL LIKE only folds ASCII case; names are matched here instead.
          if !filter.matches_name(&raw.full_name) {
            continue;
          }
          let employee = raw.into_employee()?;
          let mut checks = trainings.remove(&employee.id).unwrap_or_default();
          checks.extend(hazards.remove(&employee.id).unwrap_or_default());
          entries.push(RosterEntry { employee, checks });
        }
        Ok(entries)
      })
      .await
  }

  async fn filter_options(&self) -> Result<FilterOptions> {
    self
      .read(|conn| {
        Ok(FilterOptions {
          positions: distinct_column(conn, "position")?,
          sections:  distinct_column(conn, "section")?,
        })
      })
      .await
  }

  // ── Ledger ────────────────────────────────────────────────────────────────

  async fn set_completion(&self, input: CompletionInput) -> Result<Option<ComplianceRecord>> {
    let CompletionInput { employee_id, kind, assignment_id, date, document_number } = input;

    let record = self
      .write(move |tx| {
        require_employee(tx, employee_id)?;

        let owned = count(
          tx,
          &format!(
            "SELECT COUNT(*) FROM {} WHERE id = ?1 AND employee_id = ?2",
            assignment_table(kind)
          ),
          params![assignment_id, employee_id],
        )?;
        if owned == 0 {
          return Err(
            ohs_core::Error::AssignmentNotFound { employee_id, kind, id: assignment_id }.into(),
          );
        }

        let Some(date) = date else {
          delete_record(tx, employee_id, kind, assignment_id)?;
          return Ok(None);
        };

        let raw = tx.query_row(
          "INSERT INTO compliance_records
             (employee_id, kind, assignment_id, last_date, document_number)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT (employee_id, kind, assignment_id) DO UPDATE SET
             last_date       = excluded.last_date,
             document_number = excluded.document_number
           RETURNING employee_id, kind, assignment_id, last_date, document_number",
          params![
            employee_id,
            encode_kind(kind),
            assignment_id,
            encode_date(date),
            document_number,
          ],
          RawRecord::from_row,
        )?;
        raw.into_record().map(Some)
      })
      .await?;

    tracing::info!(
      employee_id,
      %kind,
      assignment_id,
      cleared = record.is_none(),
      "set completion"
    );
    Ok(record)
  }

  // ── Hazard catalog ────────────────────────────────────────────────────────

  async fn list_hazard_types(&self) -> Result<Vec<HazardType>> {
    self
      .read(|conn| {
        let mut stmt =
          conn.prepare("SELECT id, name, periodicity_months FROM hazard_types ORDER BY id")?;
        let raws = stmt
          .query_map([], RawCatalogItem::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        raws.into_iter().map(RawCatalogItem::into_hazard_type).collect()
      })
      .await
  }

  async fn get_hazard_type(&self, id: HazardTypeId) -> Result<Option<HazardType>> {
    self.read(move |conn| fetch_hazard_type(conn, id)).await
  }

  async fn create_hazard_type(&self, form: HazardTypeForm) -> Result<HazardType> {
    let form = form.normalized()?;

    let hazard = self
      .write(move |tx| {
        tx.execute(
          "INSERT INTO hazard_types (name, periodicity_months) VALUES (?1, ?2)",
          params![form.name, encode_periodicity(form.periodicity)],
        )?;
        Ok(HazardType {
          id:          tx.last_insert_rowid(),
          name:        form.name,
          periodicity: form.periodicity,
        })
      })
      .await?;

    tracing::info!(hazard_type_id = hazard.id, "created hazard type");
    Ok(hazard)
  }

  async fn update_hazard_type(&self, id: HazardTypeId, form: HazardTypeForm) -> Result<HazardType> {
    let form = form.normalized()?;

    let (hazard, propagated) = self
      .write(move |tx| {
        let changed = tx.execute(
          "UPDATE hazard_types SET name = ?1, periodicity_months = ?2 WHERE id = ?3",
          params![form.name, encode_periodicity(form.periodicity), id],
        )?;
        if changed == 0 {
          return Err(ohs_core::Error::HazardTypeNotFound(id).into());
        }
        let propagated = tx.execute(
          "UPDATE hazard_assignments SET periodicity_months = ?1 WHERE hazard_type_id = ?2",
          params![encode_periodicity(form.periodicity), id],
        )?;
        let hazard = HazardType { id, name: form.name, periodicity: form.periodicity };
        Ok((hazard, propagated))
      })
      .await?;

    tracing::info!(hazard_type_id = id, propagated, "updated hazard type");
    Ok(hazard)
  }

  async fn delete_hazard_type(&self, id: HazardTypeId) -> Result<DeleteOutcome> {
    let outcome = self
      .write(move |tx| {
        if fetch_hazard_type(tx, id)?.is_none() {
          return Err(ohs_core::Error::HazardTypeNotFound(id).into());
        }
        let references = count(
          tx,
          "SELECT COUNT(*) FROM hazard_assignments WHERE hazard_type_id = ?1",
          params![id],
        )?;
        if references > 0 {
          return Ok(DeleteOutcome::InUse { assignments: references as u64 });
        }
        tx.execute("DELETE FROM hazard_types WHERE id = ?1", params![id])?;
        Ok(DeleteOutcome::Deleted)
      })
      .await?;

    match outcome {
      DeleteOutcome::Deleted => tracing::info!(hazard_type_id = id, "deleted hazard type"),
      DeleteOutcome::InUse { assignments } => {
        tracing::warn!(hazard_type_id = id, assignments, "hazard type still in use; not deleted")
      }
    }
    Ok(outcome)
  }

  // ── Training catalog ──────────────────────────────────────────────────────

  async fn list_training_types(&self) -> Result<Vec<TrainingType>> {
    self
      .read(|conn| {
        let mut stmt =
          conn.prepare("SELECT id, name, default_periodicity FROM training_types ORDER BY id")?;
        let raws = stmt
          .query_map([], RawCatalogItem::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        raws.into_iter().map(RawCatalogItem::into_training_type).collect()
      })
      .await
  }

  async fn create_training_type(&self, form: TrainingTypeForm) -> Result<TrainingType> {
    let form = form.normalized()?;

    let training = self
      .write(move |tx| {
        tx.execute(
          "INSERT INTO training_types (name, default_periodicity) VALUES (?1, ?2)",
          params![form.name, encode_periodicity(form.default_periodicity)],
        )?;
        Ok(TrainingType {
          id:                  tx.last_insert_rowid(),
          name:                form.name,
          default_periodicity: form.default_periodicity,
        })
      })
      .await?;

    tracing::info!(training_type_id = training.id, "created training type");
    Ok(training)
  }
}
