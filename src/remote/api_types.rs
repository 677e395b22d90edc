//! Serde-deserializable types matching the remote users endpoint.
//!
//! These types are separate from domain types so that loose wire data
//! (numeric ids, missing fields, extra fields) is normalized in one place.

use serde::{Deserialize, Serialize};

use super::types::{User, UserDraft, UserId};

/// An id as it appears on the wire: number or string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ApiId {
  Number(serde_json::Number),
  Text(String),
}

impl From<ApiId> for UserId {
  fn from(id: ApiId) -> Self {
    match id {
      ApiId::Number(n) => UserId::new(n.to_string()),
      ApiId::Text(s) => UserId::new(s),
    }
  }
}

/// A user as returned by the remote. Unknown fields (address, phone, ...) are ignored.
#[derive(Debug, Deserialize)]
pub struct ApiUser {
  pub id: Option<ApiId>,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub username: String,
  #[serde(default)]
  pub email: String,
}

impl ApiUser {
  /// Convert to a domain user, falling back to `fallback_id` when the
  /// response carries no id. Returns None if neither is available.
  pub fn into_user(self, fallback_id: Option<&UserId>) -> Option<User> {
    let id = match self.id {
      Some(id) => UserId::from(id),
      None => fallback_id?.clone(),
    };
    Some(User {
      id,
      name: self.name,
      username: self.username,
      email: self.email,
    })
  }
}

/// Body for POST: the draft, without any id
#[derive(Debug, Serialize)]
pub struct ApiCreateUser<'a> {
  pub name: &'a str,
  pub username: &'a str,
  pub email: &'a str,
}

impl<'a> From<&'a UserDraft> for ApiCreateUser<'a> {
  fn from(draft: &'a UserDraft) -> Self {
    Self {
      name: &draft.name,
      username: &draft.username,
      email: &draft.email,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_numeric_and_string_ids_normalize() {
    let numeric: ApiUser = serde_json::from_str(r#"{"id": 3, "name": "Cid"}"#).unwrap();
    let text: ApiUser = serde_json::from_str(r#"{"id": "3", "name": "Cid"}"#).unwrap();
    assert_eq!(
      numeric.into_user(None).unwrap().id,
      text.into_user(None).unwrap().id
    );
  }

  #[test]
  fn test_extra_fields_ignored() {
    let json = r#"{
      "id": 1,
      "name": "Leanne Graham",
      "username": "Bret",
      "email": "Sincere@april.biz",
      "address": {"street": "Kulas Light", "city": "Gwenborough"},
      "phone": "1-770-736-8031 x56442"
    }"#;
    let user = serde_json::from_str::<ApiUser>(json)
      .unwrap()
      .into_user(None)
      .unwrap();
    assert_eq!(user.id.as_str(), "1");
    assert_eq!(user.username, "Bret");
  }

  #[test]
  fn test_missing_id_uses_fallback() {
    let api: ApiUser = serde_json::from_str(r#"{"name": "Ann"}"#).unwrap();
    let fallback = UserId::new("9");
    assert_eq!(api.into_user(Some(&fallback)).unwrap().id, fallback);
  }

  #[test]
  fn test_missing_id_without_fallback() {
    let api: ApiUser = serde_json::from_str(r#"{"name": "Ann"}"#).unwrap();
    assert!(api.into_user(None).is_none());
  }
}
