//! The user record type backing the registry.

use crate::{Points, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single player record.
///
/// Only `user_id`, `points`, `friend_list` and `created_at` mean anything to
/// the core; everything else the caller sent at creation time lives in
/// `extra` and is carried around opaquely. The flattened `extra` map keeps
/// the wire shape a single flat JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Unique public identifier, immutable once assigned
    pub user_id: UserId,
    /// Ranking score, mutated only by additive deltas
    #[serde(default)]
    pub points: Points,
    /// Ordered weak references to other user ids (dangling entries tolerated)
    #[serde(default)]
    pub friend_list: Vec<UserId>,
    /// Creation timestamp, immutable
    pub created_at: DateTime<Utc>,
    /// Arbitrary caller-supplied fields, opaque to the core
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Keys the core owns. They are extracted from (or overwritten in) a
/// creation payload and never end up in `extra`.
const RESERVED_KEYS: [&str; 4] = ["userId", "points", "friendList", "createdAt"];

impl UserRecord {
    /// Build a record from an arbitrary creation payload.
    ///
    /// Caller-supplied `userId` and `createdAt` are discarded in favor of the
    /// allocated id and the given timestamp. A numeric `points` value seeds
    /// the initial score; anything else starts at zero. `friendList` is taken
    /// when it parses as a string array.
    pub fn from_payload(
        user_id: impl Into<UserId>,
        mut payload: Map<String, Value>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let points = payload
            .remove("points")
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);

        let friend_list = payload
            .remove("friendList")
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default();

        for key in RESERVED_KEYS {
            payload.remove(key);
        }

        Self {
            user_id: user_id.into(),
            points,
            friend_list,
            created_at,
            extra: payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn from_payload_defaults() {
        let record = UserRecord::from_payload(
            "aB3xZ9",
            payload(json!({"name": "Alice"})),
            Utc::now(),
        );

        assert_eq!(record.user_id, "aB3xZ9");
        assert_eq!(record.points, 0.0);
        assert!(record.friend_list.is_empty());
        assert_eq!(record.extra.get("name"), Some(&json!("Alice")));
    }

    #[test]
    fn from_payload_overwrites_reserved_keys() {
        let record = UserRecord::from_payload(
            "aB3xZ9",
            payload(json!({
                "userId": "forged",
                "createdAt": "1970-01-01T00:00:00Z",
                "name": "Alice"
            })),
            Utc::now(),
        );

        assert_eq!(record.user_id, "aB3xZ9");
        assert!(!record.extra.contains_key("userId"));
        assert!(!record.extra.contains_key("createdAt"));
    }

    #[test]
    fn from_payload_seeds_numeric_points() {
        let record =
            UserRecord::from_payload("aB3xZ9", payload(json!({"points": 42})), Utc::now());
        assert_eq!(record.points, 42.0);

        // A non-numeric seed is dropped, not stored as an extra field
        let record =
            UserRecord::from_payload("aB3xZ9", payload(json!({"points": "many"})), Utc::now());
        assert_eq!(record.points, 0.0);
        assert!(!record.extra.contains_key("points"));
    }

    #[test]
    fn from_payload_takes_friend_list() {
        let record = UserRecord::from_payload(
            "aB3xZ9",
            payload(json!({"friendList": ["Qw12Er", "Ty34Ui"]})),
            Utc::now(),
        );
        assert_eq!(record.friend_list, vec!["Qw12Er", "Ty34Ui"]);

        // Malformed list falls back to empty
        let record = UserRecord::from_payload(
            "aB3xZ9",
            payload(json!({"friendList": "Qw12Er"})),
            Utc::now(),
        );
        assert!(record.friend_list.is_empty());
    }

    #[test]
    fn serializes_flat() {
        let record = UserRecord::from_payload(
            "aB3xZ9",
            payload(json!({"name": "Alice", "level": 3})),
            Utc::now(),
        );

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["userId"], "aB3xZ9");
        assert_eq!(value["points"], 0.0);
        assert_eq!(value["name"], "Alice");
        assert_eq!(value["level"], 3);
        // no nested "extra" object on the wire
        assert!(value.get("extra").is_none());
    }

    #[test]
    fn serialization_roundtrip() {
        let record = UserRecord::from_payload(
            "aB3xZ9",
            payload(json!({"name": "Alice", "friendList": ["Qw12Er"], "points": 7})),
            Utc::now(),
        );

        let json = serde_json::to_string(&record).unwrap();
        let parsed: UserRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, parsed);
    }
}
