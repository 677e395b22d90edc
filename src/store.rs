//! Canonical in-memory record set and its mirror pipeline.
//!
//! Every mutation follows the same order: change the in-memory set, then
//! overwrite the mirror with the whole set. Callers notify the user only
//! after the method returns, so a notice never precedes durable state.

use color_eyre::Result;

use crate::mirror::{MirrorSnapshot, MirrorStorage};
use crate::remote::{User, UserId};

/// Records whose name contains `term`, case-insensitively, in original order.
///
/// Only `name` is matched; an empty term matches everything.
pub fn filter<'a>(records: &'a [User], term: &str) -> Vec<&'a User> {
  if term.is_empty() {
    return records.iter().collect();
  }

  let needle = term.to_lowercase();
  records
    .iter()
    .filter(|user| user.name.to_lowercase().contains(&needle))
    .collect()
}

/// The record set plus the mirror it is persisted to
pub struct UserStore {
  users: Vec<User>,
  mirror: Box<dyn MirrorStorage>,
}

impl UserStore {
  pub fn new(mirror: Box<dyn MirrorStorage>) -> Self {
    Self {
      users: Vec::new(),
      mirror,
    }
  }

  pub fn users(&self) -> &[User] {
    &self.users
  }

  #[cfg(test)]
  pub fn get(&self, id: &UserId) -> Option<&User> {
    self.users.iter().find(|u| &u.id == id)
  }

  /// Replace the whole set with a freshly listed one.
  pub fn replace_all(&mut self, users: Vec<User>) -> Result<()> {
    self.users = users;
    self.persist()
  }

  /// Fold in a record the server confirmed as created.
  ///
  /// Ids stay unique: if the server hands back an id already in the set,
  /// that record is replaced in place instead of appended. Returns false
  /// when an existing record was replaced.
  pub fn apply_created(&mut self, user: User) -> Result<bool> {
    let appended = match self.position(&user.id) {
      Some(idx) => {
        tracing::warn!(id = %user.id, "server reused an existing id on create");
        self.users[idx] = user;
        false
      }
      None => {
        self.users.push(user);
        true
      }
    };
    self.persist()?;
    Ok(appended)
  }

  /// Replace record `id` with the server's response.
  ///
  /// Returns false, without touching the mirror, if `id` is not in the set.
  pub fn apply_updated(&mut self, id: &UserId, user: User) -> Result<bool> {
    let Some(idx) = self.position(id) else {
      return Ok(false);
    };
    self.users[idx] = user;
    self.persist()?;
    Ok(true)
  }

  /// Remove record `id`. Returns false if it was not in the set.
  pub fn apply_deleted(&mut self, id: &UserId) -> Result<bool> {
    let before = self.users.len();
    self.users.retain(|u| &u.id != id);
    if self.users.len() == before {
      return Ok(false);
    }
    self.persist()?;
    Ok(true)
  }

  /// Load the mirror snapshot into memory. The mirror itself is not rewritten.
  pub fn restore_from_mirror(&mut self) -> Result<Option<MirrorSnapshot>> {
    let snapshot = self.mirror.load()?;
    if let Some(snapshot) = &snapshot {
      self.users = snapshot.users.clone();
    }
    Ok(snapshot)
  }

  fn position(&self, id: &UserId) -> Option<usize> {
    self.users.iter().position(|u| &u.id == id)
  }

  fn persist(&self) -> Result<()> {
    self.mirror.save(&self.users)
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use crate::mirror::{NoopMirror, SqliteMirror, DEFAULT_SLOT};
  use color_eyre::eyre::eyre;
  use std::sync::Mutex;

  pub(crate) fn user(id: &str, name: &str) -> User {
    User {
      id: UserId::new(id),
      name: name.to_string(),
      username: name.to_lowercase(),
      email: format!("{}@x.io", name.to_lowercase()),
    }
  }

  fn names(users: &[&User]) -> Vec<String> {
    users.iter().map(|u| u.name.clone()).collect()
  }

  /// Mirror that records every save in memory
  #[derive(Default)]
  struct RecordingMirror {
    saves: Mutex<Vec<Vec<User>>>,
  }

  impl MirrorStorage for RecordingMirror {
    fn save(&self, users: &[User]) -> Result<()> {
      self.saves.lock().unwrap().push(users.to_vec());
      Ok(())
    }

    fn load(&self) -> Result<Option<MirrorSnapshot>> {
      Ok(self.saves.lock().unwrap().last().map(|users| MirrorSnapshot {
        users: users.clone(),
        saved_at: chrono::Utc::now(),
      }))
    }
  }

  /// Mirror whose writes always fail
  pub(crate) struct BrokenMirror;

  impl MirrorStorage for BrokenMirror {
    fn save(&self, _users: &[User]) -> Result<()> {
      Err(eyre!("disk full"))
    }

    fn load(&self) -> Result<Option<MirrorSnapshot>> {
      Ok(None)
    }
  }

  fn seeded_store() -> UserStore {
    let mut store = UserStore::new(Box::new(RecordingMirror::default()));
    store
      .replace_all(vec![user("1", "Ann"), user("2", "Ben")])
      .unwrap();
    store
  }

  fn mirrored(store: &UserStore) -> Vec<User> {
    store.mirror.load().unwrap().unwrap().users
  }

  #[test]
  fn test_filter_empty_term_returns_all_in_order() {
    let records = vec![user("2", "Ben"), user("1", "Ann"), user("3", "Cid")];
    assert_eq!(names(&filter(&records, "")), vec!["Ben", "Ann", "Cid"]);
  }

  #[test]
  fn test_filter_case_insensitive_substring() {
    let records = vec![user("1", "Ann"), user("2", "Ben")];
    let result = filter(&records, "an");
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id.as_str(), "1");
  }

  #[test]
  fn test_filter_upper_case_term() {
    let records = vec![user("1", "Leanne Graham"), user("2", "Ervin Howell")];
    assert_eq!(names(&filter(&records, "GRA")), vec!["Leanne Graham"]);
  }

  #[test]
  fn test_filter_ignores_username_and_email() {
    let mut ann = user("1", "Ann");
    ann.username = "zed".to_string();
    ann.email = "zed@x.io".to_string();
    assert!(filter(&[ann], "zed").is_empty());
  }

  #[test]
  fn test_filter_preserves_order() {
    let records = vec![
      user("1", "Dana"),
      user("2", "Bob"),
      user("3", "Adan"),
      user("4", "Danny"),
    ];
    assert_eq!(names(&filter(&records, "dan")), vec!["Dana", "Adan", "Danny"]);
  }

  #[test]
  fn test_replace_all_saves_mirror() {
    let store = seeded_store();
    assert_eq!(mirrored(&store), store.users());
  }

  #[test]
  fn test_apply_created_appends_and_mirrors() {
    let mut store = seeded_store();
    assert!(store.apply_created(user("3", "Cid")).unwrap());

    assert_eq!(store.users().len(), 3);
    assert_eq!(store.users().last().unwrap().id.as_str(), "3");
    assert_eq!(mirrored(&store), store.users());
  }

  #[test]
  fn test_apply_created_with_existing_id_keeps_ids_unique() {
    let mut store = seeded_store();
    assert!(!store.apply_created(user("2", "Cid")).unwrap());

    assert_eq!(store.users().len(), 2);
    assert_eq!(store.get(&UserId::new("2")).unwrap().name, "Cid");
  }

  #[test]
  fn test_apply_updated_replaces_only_target() {
    let mut store = seeded_store();
    let updated = store
      .apply_updated(&UserId::new("2"), user("2", "Benny"))
      .unwrap();

    assert!(updated);
    assert_eq!(store.users()[0], user("1", "Ann"));
    assert_eq!(store.users()[1], user("2", "Benny"));
    assert_eq!(mirrored(&store), store.users());
  }

  #[test]
  fn test_apply_updated_unknown_id_is_noop() {
    let mut store = seeded_store();
    let updated = store
      .apply_updated(&UserId::new("9"), user("9", "Zed"))
      .unwrap();

    assert!(!updated);
    assert_eq!(store.users().len(), 2);
  }

  #[test]
  fn test_apply_deleted_removes_and_mirrors() {
    let mut store = seeded_store();
    assert!(store.apply_deleted(&UserId::new("1")).unwrap());

    assert!(store.get(&UserId::new("1")).is_none());
    assert_eq!(mirrored(&store), vec![user("2", "Ben")]);
  }

  #[test]
  fn test_apply_deleted_unknown_id() {
    let mut store = seeded_store();
    assert!(!store.apply_deleted(&UserId::new("9")).unwrap());
    assert_eq!(store.users().len(), 2);
  }

  #[test]
  fn test_mirror_failure_keeps_memory_change() {
    let mut store = UserStore::new(Box::new(BrokenMirror));
    assert!(store.apply_created(user("1", "Ann")).is_err());
    assert_eq!(store.users().len(), 1);
  }

  #[test]
  fn test_restore_from_mirror() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("m.db");
    SqliteMirror::open(Some(&path), DEFAULT_SLOT)
      .unwrap()
      .save(&[user("1", "Ann")])
      .unwrap();

    let mut store = UserStore::new(Box::new(
      SqliteMirror::open(Some(&path), DEFAULT_SLOT).unwrap(),
    ));
    let snapshot = store.restore_from_mirror().unwrap();

    assert!(snapshot.is_some());
    assert_eq!(store.users(), &[user("1", "Ann")]);
  }

  #[test]
  fn test_restore_from_empty_mirror() {
    let mut store = UserStore::new(Box::new(NoopMirror));
    assert!(store.restore_from_mirror().unwrap().is_none());
    assert!(store.users().is_empty());
  }
}
