//! The record store contract and the in-memory reference store.
//!
//! The registry core never talks to a database directly; it goes through
//! [`RecordStore`]. The server crate provides a PostgreSQL implementation,
//! and [`MemoryStore`] here backs tests and embedded use.

use crate::{error::Result, Error, Points, UserId, UserRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::RwLock;

/// Acknowledgment of a successful insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    /// Whether the store acknowledged the write
    pub acknowledged: bool,
    /// The id of the inserted record
    pub inserted_id: UserId,
}

/// Outcome of a combined update (field sets + points increment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    /// Records matched by the filter
    pub matched_count: u64,
    /// Records actually modified
    pub modified_count: u64,
}

/// Abstract store of [`UserRecord`]s.
///
/// Implementations own all concurrency control and must uphold two
/// guarantees the core relies on:
///
/// - `insert` enforces `user_id` uniqueness and fails with
///   [`Error::DuplicateId`] on conflict, so the allocator can treat a
///   conflict as "try another candidate" without a racy pre-check.
/// - `apply_update` performs the field sets and the points increment as one
///   atomic write, so concurrent deltas compose without lost updates.
#[allow(async_fn_in_trait)]
pub trait RecordStore {
    /// Insert a new record, failing with [`Error::DuplicateId`] if the id is
    /// already taken.
    async fn insert(&self, record: UserRecord) -> Result<InsertAck>;

    /// Fetch a record by id. Absence is `Ok(None)`, not an error.
    async fn find(&self, user_id: &str) -> Result<Option<UserRecord>>;

    /// Fetch every record whose id appears in `user_ids`, in no particular
    /// order. Unknown ids are simply not represented in the result.
    async fn find_many(&self, user_ids: &[UserId]) -> Result<Vec<UserRecord>>;

    /// Atomically set `fields` and increment `points` by `delta` on the
    /// record matching `user_id`. Returns zero counts when nothing matched.
    async fn apply_update(
        &self,
        user_id: &str,
        delta: Points,
        fields: &Map<String, Value>,
    ) -> Result<UpdateOutcome>;

    /// Up to `limit` records ordered by points descending. Ties keep the
    /// store's native stable order.
    async fn top_by_points(&self, limit: i64) -> Result<Vec<UserRecord>>;

    /// Every record, no ordering contract.
    async fn all(&self) -> Result<Vec<UserRecord>>;
}

/// Split generic field updates into the parts a store can apply.
///
/// `friendList` updates the dedicated friend-list column when it is a string
/// array (and is rejected otherwise); the id and creation timestamp are
/// immutable, so those keys are dropped; everything else merges into the
/// record's extra fields.
pub fn split_field_updates(
    fields: &Map<String, Value>,
) -> Result<(Option<Vec<UserId>>, Map<String, Value>)> {
    let mut extra = fields.clone();
    extra.remove("userId");
    extra.remove("createdAt");

    let friend_list = match extra.remove("friendList") {
        Some(value) => Some(serde_json::from_value(value.clone()).map_err(|_| {
            Error::InvalidArgument(format!("friendList must be a string array, got {value}"))
        })?),
        None => None,
    };

    Ok((friend_list, extra))
}

/// In-memory [`RecordStore`].
///
/// Keeps records in insertion order, which doubles as the stable tie-break
/// for the ranking view. All operations take the single lock, so insert
/// uniqueness and the combined update are trivially atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<UserRecord>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl RecordStore for MemoryStore {
    async fn insert(&self, record: UserRecord) -> Result<InsertAck> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.user_id == record.user_id) {
            return Err(Error::DuplicateId(record.user_id));
        }
        let inserted_id = record.user_id.clone();
        records.push(record);
        Ok(InsertAck {
            acknowledged: true,
            inserted_id,
        })
    }

    async fn find(&self, user_id: &str) -> Result<Option<UserRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.user_id == user_id).cloned())
    }

    async fn find_many(&self, user_ids: &[UserId]) -> Result<Vec<UserRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| user_ids.contains(&r.user_id))
            .cloned()
            .collect())
    }

    async fn apply_update(
        &self,
        user_id: &str,
        delta: Points,
        fields: &Map<String, Value>,
    ) -> Result<UpdateOutcome> {
        let (friend_list, extra) = split_field_updates(fields)?;

        let mut records = self.records.write().await;
        let Some(record) = records.iter_mut().find(|r| r.user_id == user_id) else {
            return Ok(UpdateOutcome {
                matched_count: 0,
                modified_count: 0,
            });
        };

        record.points += delta;
        if let Some(friend_list) = friend_list {
            record.friend_list = friend_list;
        }
        for (key, value) in extra {
            record.extra.insert(key, value);
        }

        Ok(UpdateOutcome {
            matched_count: 1,
            modified_count: 1,
        })
    }

    async fn top_by_points(&self, limit: i64) -> Result<Vec<UserRecord>> {
        let records = self.records.read().await;
        let mut ranked: Vec<UserRecord> = records.iter().cloned().collect();
        // Stable sort keeps insertion order between equal scores.
        ranked.sort_by(|a, b| b.points.partial_cmp(&a.points).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(limit.max(0) as usize);
        Ok(ranked)
    }

    async fn all(&self) -> Result<Vec<UserRecord>> {
        let records = self.records.read().await;
        Ok(records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn record(user_id: &str, points: Points) -> UserRecord {
        let mut payload = Map::new();
        payload.insert("points".into(), json!(points));
        UserRecord::from_payload(user_id, payload, Utc::now())
    }

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn insert_and_find() {
        let store = MemoryStore::new();
        let ack = store.insert(record("aB3xZ9", 0.0)).await.unwrap();
        assert!(ack.acknowledged);
        assert_eq!(ack.inserted_id, "aB3xZ9");

        let found = store.find("aB3xZ9").await.unwrap().unwrap();
        assert_eq!(found.user_id, "aB3xZ9");
        assert!(store.find("Qw12Er").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn insert_duplicate_conflicts() {
        let store = MemoryStore::new();
        store.insert(record("aB3xZ9", 0.0)).await.unwrap();

        let result = store.insert(record("aB3xZ9", 5.0)).await;
        assert_eq!(result, Err(Error::DuplicateId("aB3xZ9".into())));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn apply_update_increments_and_sets() {
        let store = MemoryStore::new();
        store.insert(record("aB3xZ9", 10.0)).await.unwrap();

        let outcome = store
            .apply_update("aB3xZ9", 5.0, &fields(json!({"name": "Alice"})))
            .await
            .unwrap();
        assert_eq!(outcome.matched_count, 1);
        assert_eq!(outcome.modified_count, 1);

        let found = store.find("aB3xZ9").await.unwrap().unwrap();
        assert_eq!(found.points, 15.0);
        assert_eq!(found.extra.get("name"), Some(&json!("Alice")));
    }

    #[tokio::test]
    async fn apply_update_unknown_id_matches_nothing() {
        let store = MemoryStore::new();
        let outcome = store
            .apply_update("Qw12Er", 5.0, &Map::new())
            .await
            .unwrap();
        assert_eq!(outcome.matched_count, 0);
        assert_eq!(outcome.modified_count, 0);
    }

    #[tokio::test]
    async fn apply_update_replaces_friend_list() {
        let store = MemoryStore::new();
        store.insert(record("aB3xZ9", 0.0)).await.unwrap();

        store
            .apply_update(
                "aB3xZ9",
                0.0,
                &fields(json!({"friendList": ["Qw12Er", "Ty34Ui"]})),
            )
            .await
            .unwrap();

        let found = store.find("aB3xZ9").await.unwrap().unwrap();
        assert_eq!(found.friend_list, vec!["Qw12Er", "Ty34Ui"]);
        assert!(!found.extra.contains_key("friendList"));
    }

    #[tokio::test]
    async fn apply_update_ignores_immutable_keys() {
        let store = MemoryStore::new();
        store.insert(record("aB3xZ9", 0.0)).await.unwrap();

        store
            .apply_update(
                "aB3xZ9",
                0.0,
                &fields(json!({"userId": "forged", "createdAt": "xx", "name": "Alice"})),
            )
            .await
            .unwrap();

        let found = store.find("aB3xZ9").await.unwrap().unwrap();
        assert_eq!(found.user_id, "aB3xZ9");
        assert_eq!(found.extra.get("name"), Some(&json!("Alice")));
        assert!(!found.extra.contains_key("userId"));
    }

    #[tokio::test]
    async fn top_by_points_orders_descending_with_stable_ties() {
        let store = MemoryStore::new();
        for (id, points) in [
            ("u....1", 5.0),
            ("u....2", 100.0),
            ("u....3", 42.0),
            ("u....4", 7.0),
            ("u....5", 100.0),
        ] {
            store.insert(record(id, points)).await.unwrap();
        }

        let top = store.top_by_points(3).await.unwrap();
        let ids: Vec<&str> = top.iter().map(|r| r.user_id.as_str()).collect();
        // Both 100-point records first, in insertion order, then the 42.
        assert_eq!(ids, vec!["u....2", "u....5", "u....3"]);
    }

    #[tokio::test]
    async fn find_many_skips_unknown_ids() {
        let store = MemoryStore::new();
        store.insert(record("aB3xZ9", 0.0)).await.unwrap();

        let found = store
            .find_many(&["aB3xZ9".into(), "Qw12Er".into()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].user_id, "aB3xZ9");
    }

    #[test]
    fn split_rejects_malformed_friend_list() {
        let result = split_field_updates(&fields(json!({"friendList": 42})));
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }
}
