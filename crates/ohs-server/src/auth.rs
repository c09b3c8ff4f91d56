//! HTTP Basic authentication against configured users, and the role guard
//! applied to every API request.

use std::sync::Arc;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::{self, SaltString},
};
use axum::{
  extract::{Request, State},
  http::{HeaderMap, Method},
  middleware::Next,
  response::Response,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use ohs_core::auth::{Role, UserStore};
use rand_core::OsRng;
use serde::Deserialize;

use crate::error::Error;

/// One account from the `[[users]]` table of the config file.
#[derive(Clone, Deserialize)]
pub struct UserConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  #[serde(default = "default_role")]
  pub role:          Role,
}

fn default_role() -> Role { Role::Viewer }

/// Hash `password` into an argon2id PHC string with a fresh salt.
pub fn hash_password(password: &str) -> Result<String, password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(Argon2::default().hash_password(password.as_bytes(), &salt)?.to_string())
}

/// Users loaded from configuration.
#[derive(Clone)]
pub struct ConfiguredUsers {
  users:      Vec<UserConfig>,
  /// Verified against when the username is unknown, so that a lookup miss
  /// costs as much as a wrong password.
  dummy_hash: Option<String>,
}

impl ConfiguredUsers {
  pub fn new(users: Vec<UserConfig>) -> Self {
    let dummy_hash = hash_password("unknown user").ok();
    Self { users, dummy_hash }
  }

  pub fn is_empty(&self) -> bool { self.users.is_empty() }
}

impl Default for ConfiguredUsers {
  fn default() -> Self { Self::new(Vec::new()) }
}

impl UserStore for ConfiguredUsers {
  fn authenticate(&self, username: &str, password: &str) -> Option<Role> {
    let user = self.users.iter().find(|u| u.username == username);
    let phc = match user {
      Some(user) => user.password_hash.as_str(),
      None => self.dummy_hash.as_deref()?,
    };
    let parsed_hash = PasswordHash::new(phc).ok()?;
    let verified = Argon2::default()
      .verify_password(password.as_bytes(), &parsed_hash)
      .is_ok();
    user.filter(|_| verified).map(|u| u.role)
  }
}

/// Resolve the caller's role from an `Authorization: Basic` header.
pub fn verify_basic<U: UserStore>(headers: &HeaderMap, users: &U) -> Result<Role, Error> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;

  users.authenticate(username, password).ok_or_else(|| {
    tracing::debug!(username, "rejected credentials");
    Error::Unauthorized
  })
}

/// Reads are open to every role; anything else needs [`Role::Admin`].
pub fn authorize(method: &Method, role: Role) -> Result<(), Error> {
  if *method == Method::GET || *method == Method::HEAD || role.can_write() {
    Ok(())
  } else {
    Err(Error::Forbidden)
  }
}

/// Middleware guarding the API routes.
pub async fn guard<U>(
  State(users): State<Arc<U>>,
  req: Request,
  next: Next,
) -> Result<Response, Error>
where
  U: UserStore + 'static,
{
  let role = verify_basic(req.headers(), users.as_ref())?;
  if let Err(e) = authorize(req.method(), role) {
    tracing::warn!(method = %req.method(), uri = %req.uri(), "write refused for viewer");
    return Err(e);
  }
  Ok(next.run(req).await)
}
