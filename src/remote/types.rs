use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier assigned to a user by the remote store.
///
/// The remote may send ids as JSON numbers or strings; both decode to the
/// same string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Tag for a create request in flight.
///
/// Never used as a record id; the canonical set only ever holds ids the
/// server confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PendingId(Uuid);

impl PendingId {
  pub fn new() -> Self {
    Self(Uuid::new_v4())
  }
}

impl Default for PendingId {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Display for PendingId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "pending:{}", self.0)
  }
}

/// A user record as held in the record set and the mirror
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id: UserId,
  pub name: String,
  pub username: String,
  pub email: String,
}

impl User {
  /// Editable body of this record
  pub fn draft(&self) -> UserDraft {
    UserDraft {
      name: self.name.clone(),
      username: self.username.clone(),
      email: self.email.clone(),
    }
  }
}

/// A user without an id, as entered in the form or sent on create
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
  pub name: String,
  pub username: String,
  pub email: String,
}

impl UserDraft {
  pub fn with_id(&self, id: UserId) -> User {
    User {
      id,
      name: self.name.clone(),
      username: self.username.clone(),
      email: self.email.clone(),
    }
  }

  /// Labels of required fields that are empty (whitespace counts as empty)
  pub fn missing_fields(&self) -> Vec<&'static str> {
    [
      ("name", &self.name),
      ("username", &self.username),
      ("email", &self.email),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(label, _)| label)
    .collect()
  }
}
