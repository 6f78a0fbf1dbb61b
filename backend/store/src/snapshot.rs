use std::collections::HashMap;

use serde::{Deserialize, Serialize, Serializer};
use tracker_core::{TrackerError, UserRecord};

/// Every user record, in insertion order, with a hash index on `user_id`.
///
/// Serializes as a plain list of records; the index is rebuilt on load.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "Vec<UserRecord>")]
pub struct Snapshot {
    records: Vec<UserRecord>,
    index: HashMap<String, usize>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user_id: &str) -> Option<&UserRecord> {
        self.index.get(user_id).map(|&pos| &self.records[pos])
    }

    pub fn get_mut(&mut self, user_id: &str) -> Option<&mut UserRecord> {
        match self.index.get(user_id) {
            Some(&pos) => Some(&mut self.records[pos]),
            None => None,
        }
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.index.contains_key(user_id)
    }

    /// Insert `record` unless its `user_id` is already present.
    ///
    /// Returns `false` and leaves the snapshot untouched on a duplicate.
    pub fn insert(&mut self, record: UserRecord) -> bool {
        if self.index.contains_key(&record.user_id) {
            return false;
        }
        self.index.insert(record.user_id.clone(), self.records.len());
        self.records.push(record);
        true
    }

    /// Record for `user_id`, inserting the one built by `make` when absent.
    ///
    /// The flag is `true` when a record was created.
    pub fn get_or_insert_with(
        &mut self,
        user_id: &str,
        make: impl FnOnce() -> UserRecord,
    ) -> (&mut UserRecord, bool) {
        let (pos, created) = match self.index.get(user_id) {
            Some(&pos) => (pos, false),
            None => {
                let pos = self.records.len();
                self.records.push(make());
                self.index.insert(user_id.to_string(), pos);
                (pos, true)
            }
        };
        (&mut self.records[pos], created)
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn ids(&self) -> Vec<String> {
        self.records.iter().map(|r| r.user_id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TryFrom<Vec<UserRecord>> for Snapshot {
    type Error = TrackerError;

    fn try_from(records: Vec<UserRecord>) -> Result<Self, Self::Error> {
        let mut snapshot = Snapshot::new();
        for record in records {
            let user_id = record.user_id.clone();
            if !snapshot.insert(record) {
                return Err(TrackerError::Persistence(format!(
                    "duplicate record for user '{user_id}' in persisted snapshot"
                )));
            }
        }
        Ok(snapshot)
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.records.serialize(serializer)
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl Eq for Snapshot {}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::UNKNOWN_INVITER;

    #[test]
    fn test_insert_is_idempotent_per_id() {
        let mut snapshot = Snapshot::new();
        assert!(snapshot.insert(UserRecord::new("a", UNKNOWN_INVITER, "t0")));
        assert!(!snapshot.insert(UserRecord::new("a", "someone", "t9")));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("a").unwrap().created_at, "t0");
    }

    #[test]
    fn test_ids_keep_insertion_order() {
        let mut snapshot = Snapshot::new();
        for id in ["zed", "amy", "kim"] {
            snapshot.insert(UserRecord::new(id, UNKNOWN_INVITER, "t0"));
        }
        assert_eq!(snapshot.ids(), vec!["zed", "amy", "kim"]);
    }

    #[test]
    fn test_get_or_insert_with_reports_creation() {
        let mut snapshot = Snapshot::new();
        let (_, created) =
            snapshot.get_or_insert_with("a", || UserRecord::new("a", UNKNOWN_INVITER, "t0"));
        assert!(created);
        let (record, created) =
            snapshot.get_or_insert_with("a", || UserRecord::new("a", UNKNOWN_INVITER, "t5"));
        assert!(!created);
        assert_eq!(record.created_at, "t0");
    }

    #[test]
    fn test_deserialize_rebuilds_index() {
        let mut snapshot = Snapshot::new();
        snapshot.insert(UserRecord::new("a", UNKNOWN_INVITER, "t0"));
        snapshot.insert(UserRecord::new("b", "a", "t1"));
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.starts_with('['));

        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
        assert_eq!(back.get("b").unwrap().invited_by, "a");
    }

    #[test]
    fn test_deserialize_rejects_duplicate_ids() {
        let json = r#"[
            {"user_id":"a","invited_by":"unknown","created_at":"t0","messages":0,"calls":0},
            {"user_id":"a","invited_by":"unknown","created_at":"t1","messages":0,"calls":0}
        ]"#;
        let result: Result<Snapshot, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
