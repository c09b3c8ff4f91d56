//! Core types and trait definitions for the occupational-safety compliance
//! tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod auth;
pub mod catalog;
pub mod compliance;
pub mod employee;
pub mod error;
pub mod ledger;
pub mod listing;
pub mod period;
pub mod reconcile;
pub mod store;

pub use error::{Error, Result};

/// Surrogate key of an `employees` row.
pub type EmployeeId = i64;
/// Surrogate key of a `hazard_types` row.
pub type HazardTypeId = i64;
/// Surrogate key of a `training_types` row.
pub type TrainingTypeId = i64;
/// Surrogate key of a `hazard_assignments` or `training_assignments` row.
pub type AssignmentId = i64;
