//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Months, NaiveDate};
use ohs_core::{
  catalog::{DeleteOutcome, HazardTypeForm, TrainingTypeForm},
  compliance::{Lookahead, Status},
  employee::{DesiredTraining, EmployeeForm},
  ledger::{CheckKind, CompletionInput},
  listing::{self, EmployeeFilter, StatusFilter},
  period::Periodicity,
  store::ComplianceStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn months(n: i64) -> Periodicity { Periodicity::new(n).unwrap() }

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn completion(employee_id: i64, kind: CheckKind, assignment_id: i64, date: Option<NaiveDate>) -> CompletionInput {
  CompletionInput {
    employee_id,
    kind,
    assignment_id,
    date,
    document_number: date.map(|_| "DOC-1".to_owned()),
  }
}

fn core_error(err: &Error) -> &ohs_core::Error {
  match err {
    Error::Core(e) => e,
    other => panic!("expected core error, got {other:?}"),
  }
}

async fn count(s: &SqliteStore, sql: &'static str) -> i64 {
  s.read(move |conn| Ok(conn.query_row(sql, [], |r| r.get(0))?))
    .await
    .unwrap()
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn seed_default_catalog_only_once() {
  let s = store().await;
  assert!(s.seed_default_catalog().await.unwrap());
  assert!(!s.seed_default_catalog().await.unwrap());

  let hazards = s.list_hazard_types().await.unwrap();
  let trainings = s.list_training_types().await.unwrap();
  assert_eq!(hazards.len(), 5);
  assert_eq!(trainings.len(), 3);
  assert_eq!(trainings[0].default_periodicity, months(36));
}

#[tokio::test]
async fn create_and_get_hazard_type() {
  let s = store().await;
  let h = s.create_hazard_type(HazardTypeForm::new(" Noise ", months(12))).await.unwrap();
  assert_eq!(h.name, "Noise");

  let fetched = s.get_hazard_type(h.id).await.unwrap().unwrap();
  assert_eq!(fetched, h);
  assert!(s.get_hazard_type(h.id + 100).await.unwrap().is_none());
}

#[tokio::test]
async fn hazard_edit_propagates_to_assignments_without_touching_ledger() {
  let s = store().await;
  let noise = s.create_hazard_type(HazardTypeForm::new("Noise", months(12))).await.unwrap();
  let dust = s.create_hazard_type(HazardTypeForm::new("Dust", months(12))).await.unwrap();

  let mut form = EmployeeForm::new("Ivanov", "Welder");
  form.hazards = vec![noise.id, dust.id];
  let a = s.create_employee(form.clone()).await.unwrap();
  let b = s.create_employee(EmployeeForm { full_name: "Petrov".into(), ..form }).await.unwrap();

  let a_noise = s.get_employee(a.id).await.unwrap().unwrap().hazards[0].clone();
  s.set_completion(completion(a.id, CheckKind::Hazard, a_noise.id, Some(d(2025, 1, 10))))
    .await
    .unwrap();

  s.update_hazard_type(noise.id, HazardTypeForm::new("Noise (85 dB)", months(24)))
    .await
    .unwrap();

  for id in [a.id, b.id] {
    let detail = s.get_employee(id).await.unwrap().unwrap();
    for h in detail.hazards {
      let expected = if h.hazard_type_id == noise.id { 24 } else { 12 };
      assert_eq!(h.periodicity.months(), expected);
    }
  }

  let roster = s.roster(&EmployeeFilter::default()).await.unwrap();
  let ivanov = roster.iter().find(|e| e.employee.id == a.id).unwrap();
  let check = ivanov.checks.iter().find(|c| c.assignment_id == a_noise.id).unwrap();
  assert_eq!(check.last_date, Some(d(2025, 1, 10)));
  assert_eq!(check.name, "Noise (85 dB)");
  assert_eq!(check.periodicity, months(24));
}

#[tokio::test]
async fn update_missing_hazard_type_is_not_found() {
  let s = store().await;
  let err = s
    .update_hazard_type(42, HazardTypeForm::new("Ghost", months(12)))
    .await
    .unwrap_err();
  assert!(matches!(core_error(&err), ohs_core::Error::HazardTypeNotFound(42)));
}

#[tokio::test]
async fn delete_hazard_type_refused_while_referenced() {
  let s = store().await;
  let noise = s.create_hazard_type(HazardTypeForm::new("Noise", months(12))).await.unwrap();
  let mut form = EmployeeForm::new("Ivanov", "Welder");
  form.hazards = vec![noise.id];
  let emp = s.create_employee(form).await.unwrap();

  let outcome = s.delete_hazard_type(noise.id).await.unwrap();
  assert_eq!(outcome, DeleteOutcome::InUse { assignments: 1 });
  assert!(s.get_hazard_type(noise.id).await.unwrap().is_some());
  assert_eq!(s.get_employee(emp.id).await.unwrap().unwrap().hazards.len(), 1);

  // Once unassigned, it can go.
  s.update_employee(emp.id, EmployeeForm::new("Ivanov", "Welder")).await.unwrap();
  assert_eq!(s.delete_hazard_type(noise.id).await.unwrap(), DeleteOutcome::Deleted);
  assert!(s.get_hazard_type(noise.id).await.unwrap().is_none());

  let err = s.delete_hazard_type(noise.id).await.unwrap_err();
  assert!(core_error(&err).is_not_found());
}

#[tokio::test]
async fn invalid_catalog_input_rejected() {
  let s = store().await;
  let err = s
    .create_training_type(TrainingTypeForm::new("  ", months(12)))
    .await
    .unwrap_err();
  assert!(matches!(core_error(&err), ohs_core::Error::MissingField("name")));
  assert!(s.list_training_types().await.unwrap().is_empty());
}

// ─── Employees ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_employee_seeds_assignment_periodicities() {
  let s = store().await;
  let safety = s
    .create_training_type(TrainingTypeForm::new("Occupational safety", months(36)))
    .await
    .unwrap();
  let electrical = s
    .create_training_type(TrainingTypeForm::new("Electrical safety", months(12)))
    .await
    .unwrap();
  let height = s.create_hazard_type(HazardTypeForm::new("Work at height", months(6))).await.unwrap();

  let mut form = EmployeeForm::new("Ivanov", "Electrician");
  form.section = Some("Shop 2".into());
  form.birth_date = Some(d(1985, 3, 14));
  form.trainings = vec![
    DesiredTraining { training_type_id: safety.id, periodicity: None },
    DesiredTraining { training_type_id: electrical.id, periodicity: Some(months(6)) },
  ];
  form.hazards = vec![height.id];

  let emp = s.create_employee(form).await.unwrap();
  assert_eq!(emp.section.as_deref(), Some("Shop 2"));
  assert_eq!(emp.birth_date, Some(d(1985, 3, 14)));

  let detail = s.get_employee(emp.id).await.unwrap().unwrap();
  let periods: Vec<u32> = detail.trainings.iter().map(|t| t.periodicity.months()).collect();
  assert_eq!(periods, vec![36, 6]);
  assert_eq!(detail.hazards[0].periodicity, months(6));
}

#[tokio::test]
async fn create_employee_with_unknown_hazard_writes_nothing() {
  let s = store().await;
  let mut form = EmployeeForm::new("Ivanov", "Welder");
  form.hazards = vec![999];

  let err = s.create_employee(form).await.unwrap_err();
  assert!(matches!(core_error(&err), ohs_core::Error::HazardTypeNotFound(999)));
  assert_eq!(count(&s, "SELECT COUNT(*) FROM employees").await, 0);
}

#[tokio::test]
async fn update_missing_employee_is_not_found() {
  let s = store().await;
  let err = s.update_employee(7, EmployeeForm::new("Nobody", "None")).await.unwrap_err();
  assert!(matches!(core_error(&err), ohs_core::Error::EmployeeNotFound(7)));
}

#[tokio::test]
async fn removing_hazard_discards_history_and_readding_starts_fresh() {
  let s = store().await;
  let noise = s.create_hazard_type(HazardTypeForm::new("Noise", months(12))).await.unwrap();
  let dust = s.create_hazard_type(HazardTypeForm::new("Dust", months(12))).await.unwrap();

  let mut form = EmployeeForm::new("Ivanov", "Welder");
  form.hazards = vec![noise.id, dust.id];
  let emp = s.create_employee(form.clone()).await.unwrap();
  let detail = s.get_employee(emp.id).await.unwrap().unwrap();
  let (noise_a, dust_a) = (detail.hazards[0].id, detail.hazards[1].id);

  for id in [noise_a, dust_a] {
    s.set_completion(completion(emp.id, CheckKind::Hazard, id, Some(d(2025, 2, 1))))
      .await
      .unwrap();
  }

  // Drop noise, keep dust.
  form.hazards = vec![dust.id];
  s.update_employee(emp.id, form.clone()).await.unwrap();
  assert_eq!(count(&s, "SELECT COUNT(*) FROM compliance_records").await, 1);

  let detail = s.get_employee(emp.id).await.unwrap().unwrap();
  assert_eq!(detail.hazards.len(), 1);
  assert_eq!(detail.hazards[0].id, dust_a, "retained assignment keeps its id");

  // Re-add noise: a new assignment with no history.
  form.hazards = vec![dust.id, noise.id];
  s.update_employee(emp.id, form).await.unwrap();
  let roster = s.roster(&EmployeeFilter::default()).await.unwrap();
  let checks = &roster[0].checks;
  let noise_check = checks.iter().find(|c| c.item_id == noise.id).unwrap();
  let dust_check = checks.iter().find(|c| c.item_id == dust.id).unwrap();
  assert_ne!(noise_check.assignment_id, noise_a);
  assert_eq!(noise_check.last_date, None);
  assert_eq!(dust_check.last_date, Some(d(2025, 2, 1)));
}

#[tokio::test]
async fn retained_hazard_refreshes_from_catalog() {
  let s = store().await;
  let noise = s.create_hazard_type(HazardTypeForm::new("Noise", months(12))).await.unwrap();
  let mut form = EmployeeForm::new("Ivanov", "Welder");
  form.hazards = vec![noise.id];
  let emp = s.create_employee(form.clone()).await.unwrap();

  // Drift the snapshot behind the catalog's back.
  s.write(|tx| {
    tx.execute("UPDATE hazard_assignments SET periodicity_months = 3", [])?;
    Ok(())
  })
  .await
  .unwrap();

  s.update_employee(emp.id, form).await.unwrap();
  let detail = s.get_employee(emp.id).await.unwrap().unwrap();
  assert_eq!(detail.hazards[0].periodicity, months(12));
}

#[tokio::test]
async fn training_edit_preserves_history_of_retained_trainings() {
  let s = store().await;
  let safety = s
    .create_training_type(TrainingTypeForm::new("Occupational safety", months(36)))
    .await
    .unwrap();
  let first_aid = s
    .create_training_type(TrainingTypeForm::new("First aid", months(12)))
    .await
    .unwrap();

  let mut form = EmployeeForm::new("Ivanov", "Welder");
  form.trainings = vec![
    DesiredTraining { training_type_id: safety.id, periodicity: None },
    DesiredTraining { training_type_id: first_aid.id, periodicity: None },
  ];
  let emp = s.create_employee(form.clone()).await.unwrap();
  let detail = s.get_employee(emp.id).await.unwrap().unwrap();
  let (safety_a, aid_a) = (detail.trainings[0].id, detail.trainings[1].id);

  for id in [safety_a, aid_a] {
    s.set_completion(completion(emp.id, CheckKind::Training, id, Some(d(2024, 9, 1))))
      .await
      .unwrap();
  }

  // Keep safety with a new periodicity, drop first aid.
  form.trainings = vec![DesiredTraining { training_type_id: safety.id, periodicity: Some(months(24)) }];
  s.update_employee(emp.id, form).await.unwrap();

  let detail = s.get_employee(emp.id).await.unwrap().unwrap();
  assert_eq!(detail.trainings.len(), 1);
  assert_eq!(detail.trainings[0].id, safety_a);
  assert_eq!(detail.trainings[0].periodicity, months(24));
  // Only the retained training's record is left; nothing is orphaned.
  assert_eq!(count(&s, "SELECT COUNT(*) FROM compliance_records").await, 1);
  let roster = s.roster(&EmployeeFilter::default()).await.unwrap();
  assert_eq!(roster[0].checks[0].last_date, Some(d(2024, 9, 1)));
}

#[tokio::test]
async fn training_default_change_does_not_touch_assignments() {
  let s = store().await;
  let safety = s
    .create_training_type(TrainingTypeForm::new("Occupational safety", months(36)))
    .await
    .unwrap();
  let mut form = EmployeeForm::new("Ivanov", "Welder");
  form.trainings = vec![DesiredTraining { training_type_id: safety.id, periodicity: None }];
  let emp = s.create_employee(form.clone()).await.unwrap();

  s.write(move |tx| {
    tx.execute(
      "UPDATE training_types SET default_periodicity = 12 WHERE id = ?1",
      [safety.id],
    )?;
    Ok(())
  })
  .await
  .unwrap();

  s.update_employee(emp.id, form).await.unwrap();
  let detail = s.get_employee(emp.id).await.unwrap().unwrap();
  assert_eq!(detail.trainings[0].periodicity, months(36));
}

#[tokio::test]
async fn delete_employee_cascades_only_their_rows() {
  let s = store().await;
  s.seed_default_catalog().await.unwrap();
  let hazards = s.list_hazard_types().await.unwrap();
  let trainings = s.list_training_types().await.unwrap();

  let mut form = EmployeeForm::new("Ivanov", "Welder");
  form.hazards = vec![hazards[0].id, hazards[1].id];
  form.trainings = vec![DesiredTraining { training_type_id: trainings[0].id, periodicity: None }];
  let a = s.create_employee(form.clone()).await.unwrap();
  let b = s.create_employee(EmployeeForm { full_name: "Petrov".into(), ..form }).await.unwrap();

  for emp in [a.id, b.id] {
    let detail = s.get_employee(emp).await.unwrap().unwrap();
    s.set_completion(completion(emp, CheckKind::Hazard, detail.hazards[0].id, Some(d(2025, 1, 1))))
      .await
      .unwrap();
    s.set_completion(completion(emp, CheckKind::Training, detail.trainings[0].id, Some(d(2025, 1, 1))))
      .await
      .unwrap();
  }

  s.delete_employee(a.id).await.unwrap();
  assert!(s.get_employee(a.id).await.unwrap().is_none());

  assert_eq!(count(&s, "SELECT COUNT(*) FROM hazard_assignments").await, 2);
  assert_eq!(count(&s, "SELECT COUNT(*) FROM training_assignments").await, 1);
  assert_eq!(count(&s, "SELECT COUNT(*) FROM compliance_records").await, 2);
  let b_rows = s
    .read(move |conn| {
      Ok(conn.query_row(
        "SELECT COUNT(*) FROM compliance_records WHERE employee_id = ?1",
        [b.id],
        |r| r.get::<_, i64>(0),
      )?)
    })
    .await
    .unwrap();
  assert_eq!(b_rows, 2);

  let err = s.delete_employee(a.id).await.unwrap_err();
  assert!(matches!(core_error(&err), ohs_core::Error::EmployeeNotFound(_)));
}

// ─── Ledger ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn set_completion_upserts_and_clears() {
  let s = store().await;
  let noise = s.create_hazard_type(HazardTypeForm::new("Noise", months(12))).await.unwrap();
  let mut form = EmployeeForm::new("Ivanov", "Welder");
  form.hazards = vec![noise.id];
  let emp = s.create_employee(form).await.unwrap();
  let assignment = s.get_employee(emp.id).await.unwrap().unwrap().hazards[0].id;

  let first = s
    .set_completion(completion(emp.id, CheckKind::Hazard, assignment, Some(d(2024, 5, 1))))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(first.last_date, Some(d(2024, 5, 1)));

  let mut input = completion(emp.id, CheckKind::Hazard, assignment, Some(d(2025, 5, 1)));
  input.document_number = Some("MED-77".into());
  let second = s.set_completion(input).await.unwrap().unwrap();
  assert_eq!(second.last_date, Some(d(2025, 5, 1)));
  assert_eq!(second.document_number.as_deref(), Some("MED-77"));
  assert_eq!(count(&s, "SELECT COUNT(*) FROM compliance_records").await, 1);

  let cleared = s
    .set_completion(completion(emp.id, CheckKind::Hazard, assignment, None))
    .await
    .unwrap();
  assert!(cleared.is_none());
  assert_eq!(count(&s, "SELECT COUNT(*) FROM compliance_records").await, 0);

  // Clearing an absent record is a no-op.
  s.set_completion(completion(emp.id, CheckKind::Hazard, assignment, None))
    .await
    .unwrap();
}

#[tokio::test]
async fn set_completion_checks_ownership() {
  let s = store().await;
  let noise = s.create_hazard_type(HazardTypeForm::new("Noise", months(12))).await.unwrap();
  let mut form = EmployeeForm::new("Ivanov", "Welder");
  form.hazards = vec![noise.id];
  let a = s.create_employee(form).await.unwrap();
  let b = s.create_employee(EmployeeForm::new("Petrov", "Driver")).await.unwrap();
  let assignment = s.get_employee(a.id).await.unwrap().unwrap().hazards[0].id;

  // Someone else's assignment.
  let err = s
    .set_completion(completion(b.id, CheckKind::Hazard, assignment, Some(d(2025, 1, 1))))
    .await
    .unwrap_err();
  assert!(matches!(core_error(&err), ohs_core::Error::AssignmentNotFound { .. }));

  // Right id, wrong kind.
  let err = s
    .set_completion(completion(a.id, CheckKind::Training, assignment, Some(d(2025, 1, 1))))
    .await
    .unwrap_err();
  assert!(core_error(&err).is_not_found());

  let err = s
    .set_completion(completion(99, CheckKind::Hazard, assignment, Some(d(2025, 1, 1))))
    .await
    .unwrap_err();
  assert!(matches!(core_error(&err), ohs_core::Error::EmployeeNotFound(99)));
  assert_eq!(count(&s, "SELECT COUNT(*) FROM compliance_records").await, 0);
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn roster_filters_and_options() {
  let s = store().await;
  let mut welder = EmployeeForm::new("Иванов Иван", "Welder");
  welder.section = Some("Shop 1".into());
  s.create_employee(welder).await.unwrap();
  let mut driver = EmployeeForm::new("Petrov Petr", "Driver");
  driver.section = Some("Garage".into());
  s.create_employee(driver).await.unwrap();
  s.create_employee(EmployeeForm::new("Ivanova Anna", "Welder")).await.unwrap();

  let names = |filter: EmployeeFilter| {
    let s = s.clone();
    async move {
      s.roster(&filter)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.employee.full_name)
        .collect::<Vec<_>>()
    }
  };

  assert_eq!(
    names(EmployeeFilter::default()).await,
    vec!["Ivanova Anna", "Petrov Petr", "Иванов Иван"]
  );
  assert_eq!(
    names(EmployeeFilter { search: Some("ИВАН".into()), ..Default::default() }).await,
    vec!["Иванов Иван"]
  );
  assert_eq!(
    names(EmployeeFilter { position: Some("Welder".into()), ..Default::default() }).await,
    vec!["Ivanova Anna", "Иванов Иван"]
  );
  assert_eq!(
    names(EmployeeFilter {
      search:   Some("iv".into()),
      position: Some("Welder".into()),
      section:  Some("".into()),
    })
    .await,
    vec!["Ivanova Anna"]
  );

  let options = s.filter_options().await.unwrap();
  assert_eq!(options.positions, vec!["Driver", "Welder"]);
  assert_eq!(options.sections, vec!["Garage", "Shop 1"]);
}

#[tokio::test]
async fn ivanov_noise_end_to_end() {
  let s = store().await;
  let today = d(2025, 6, 15);
  let lookahead = Lookahead { training_days: 30, hazard_days: 30 };

  let noise = s.create_hazard_type(HazardTypeForm::new("Noise", months(12))).await.unwrap();
  let mut form = EmployeeForm::new("Ivanov", "Welder");
  form.hazards = vec![noise.id];
  let emp = s.create_employee(form).await.unwrap();
  let assignment = s.get_employee(emp.id).await.unwrap().unwrap().hazards[0].id;

  let status = |filter: Option<StatusFilter>| {
    let s = s.clone();
    async move {
      let roster = s.roster(&EmployeeFilter::default()).await.unwrap();
      listing::build(roster, filter, &lookahead, today)
        .into_iter()
        .flat_map(|l| l.checks)
        .map(|c| c.status)
        .collect::<Vec<_>>()
    }
  };

  assert_eq!(status(None).await, vec![Status::Never]);

  let thirteen_ago = today - Months::new(13);
  s.set_completion(completion(emp.id, CheckKind::Hazard, assignment, Some(thirteen_ago)))
    .await
    .unwrap();
  assert_eq!(status(None).await, vec![Status::Overdue]);
  assert_eq!(status(Some(StatusFilter::Overdue)).await, vec![Status::Overdue]);
  assert!(status(Some(StatusFilter::Soon)).await.is_empty());

  // Due in one month: 30 days from 2025-06-15 is 2025-07-15, the due date.
  let eleven_ago = today - Months::new(11);
  s.set_completion(completion(emp.id, CheckKind::Hazard, assignment, Some(eleven_ago)))
    .await
    .unwrap();
  assert_eq!(status(None).await, vec![Status::Soon]);
  assert_eq!(status(Some(StatusFilter::Soon)).await, vec![Status::Soon]);

  // Due in two months: outside the window.
  let ten_ago = today - Months::new(10);
  s.set_completion(completion(emp.id, CheckKind::Hazard, assignment, Some(ten_ago)))
    .await
    .unwrap();
  assert_eq!(status(None).await, vec![Status::Ok]);
  assert!(status(Some(StatusFilter::Overdue)).await.is_empty());
}
