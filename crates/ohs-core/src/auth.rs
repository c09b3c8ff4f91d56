//! User authentication abstraction.
//!
//! Credentials never live in source. A server injects a [`UserStore`]
//! (configured users, a directory service, ...) and maps the returned
//! [`Role`] onto what the caller may do.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  /// May edit employees, catalogs and completion dates.
  Admin,
  /// Read-only access to the dashboard and catalogs.
  Viewer,
}

impl Role {
  pub fn can_write(self) -> bool { matches!(self, Self::Admin) }
}

pub trait UserStore: Send + Sync {
  /// Check a username/password pair; `None` when either is wrong.
  fn authenticate(&self, username: &str, password: &str) -> Option<Role>;
}
