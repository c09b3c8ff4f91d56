//! Planning how an employee's assignments change when the employee is
//! edited.
//!
//! The planners are pure: they diff the current assignments against the
//! submitted selection and the store applies the resulting plan inside one
//! transaction. Retained assignments keep their id, so their ledger rows
//! survive the edit. Removed assignments lose their ledger rows.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
  AssignmentId, HazardTypeId,
  employee::{DesiredTraining, HazardAssignment, TrainingAssignment},
  period::Periodicity,
};

/// Changes to an employee's hazard assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HazardPlan {
  /// Assignments to delete together with their ledger rows.
  pub remove: Vec<AssignmentId>,
  /// Hazard types to assign, seeded from the catalog periodicity.
  pub add:    Vec<HazardTypeId>,
  /// Assignments to keep; their periodicity is refreshed from the catalog.
  pub retain: Vec<HazardAssignment>,
}

/// Changes to an employee's training assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainingPlan {
  /// Assignments to delete together with their ledger rows.
  pub remove: Vec<AssignmentId>,
  /// Trainings to assign; `None` periodicity means the catalog default.
  pub add:    Vec<DesiredTraining>,
  /// Retained assignments whose periodicity was explicitly changed.
  pub update: Vec<(AssignmentId, Periodicity)>,
}

pub fn plan_hazards(current: &[HazardAssignment], desired: &[HazardTypeId]) -> HazardPlan {
  let desired: BTreeSet<HazardTypeId> = desired.iter().copied().collect();
  let mut plan = HazardPlan::default();

  for assignment in current {
    if desired.contains(&assignment.hazard_type_id) {
      plan.retain.push(assignment.clone());
    } else {
      plan.remove.push(assignment.id);
    }
  }

  let held: BTreeSet<HazardTypeId> =
    current.iter().map(|a| a.hazard_type_id).collect();
  plan.add = desired.difference(&held).copied().collect();
  plan
}

/// A training type submitted more than once takes its last submitted
/// periodicity.
pub fn plan_trainings(
  current: &[TrainingAssignment],
  desired: &[DesiredTraining],
) -> TrainingPlan {
  let desired: BTreeMap<_, _> = desired
    .iter()
    .map(|d| (d.training_type_id, d.periodicity))
    .collect();
  let mut plan = TrainingPlan::default();

  for assignment in current {
    match desired.get(&assignment.training_type_id) {
      None => plan.remove.push(assignment.id),
      Some(Some(p)) if *p != assignment.periodicity => {
        plan.update.push((assignment.id, *p));
      }
      Some(_) => {}
    }
  }

  let held: BTreeSet<_> = current.iter().map(|a| a.training_type_id).collect();
  plan.add = desired
    .iter()
    .filter(|(id, _)| !held.contains(*id))
    .map(|(&training_type_id, &periodicity)| DesiredTraining { training_type_id, periodicity })
    .collect();
  plan
}
