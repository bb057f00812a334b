//! Wire-shape tests for the HTTP boundary.
//!
//! These run without a database: they pin down the JSON shapes the endpoints
//! exchange, mirroring what a client sees.

use botgame_engine::{FriendView, InsertAck, UpdateOutcome, UserRecord};
use chrono::Utc;
use serde_json::{json, Map, Value};

fn record(user_id: &str, payload: Value) -> UserRecord {
    UserRecord::from_payload(
        user_id,
        payload.as_object().unwrap().clone(),
        Utc::now(),
    )
}

#[test]
fn user_record_is_a_flat_document() {
    let record = record(
        "aB3xZ9",
        json!({"name": "Alice", "points": 42, "friendList": ["Qw12Er"]}),
    );

    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["userId"], "aB3xZ9");
    assert_eq!(value["points"], 42.0);
    assert_eq!(value["friendList"], json!(["Qw12Er"]));
    assert_eq!(value["name"], "Alice");
    assert!(value.get("extra").is_none());
    assert!(value.get("createdAt").is_some());
}

#[test]
fn create_response_shape() {
    #[derive(serde::Serialize)]
    #[serde(rename_all = "camelCase")]
    struct CreateResponse {
        user_id: String,
        result: InsertAck,
    }

    let response = CreateResponse {
        user_id: "aB3xZ9".to_string(),
        result: InsertAck {
            acknowledged: true,
            inserted_id: "aB3xZ9".to_string(),
        },
    };

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"userId\":\"aB3xZ9\""));
    assert!(json.contains("\"acknowledged\":true"));
    assert!(json.contains("\"insertedId\":\"aB3xZ9\""));
}

#[test]
fn update_outcome_uses_driver_style_counts() {
    let outcome = UpdateOutcome {
        matched_count: 1,
        modified_count: 1,
    };

    let json = serde_json::to_string(&outcome).unwrap();
    assert!(json.contains("\"matchedCount\":1"));
    assert!(json.contains("\"modifiedCount\":1"));
}

#[test]
fn friend_view_embeds_friends_beside_the_record() {
    let mut alice = record("aB3xZ9", json!({"name": "Alice"}));
    alice.friend_list = vec!["Qw12Er".to_string()];
    let bob = record("Qw12Er", json!({"name": "Bob"}));

    let view = FriendView {
        user: alice,
        friends: vec![bob],
    };

    let value = serde_json::to_value(&view).unwrap();
    // The user's own fields stay at the top level, friends nest beside them.
    assert_eq!(value["userId"], "aB3xZ9");
    assert_eq!(value["name"], "Alice");
    assert_eq!(value["friends"][0]["userId"], "Qw12Er");
}

#[test]
fn creation_payload_accepts_arbitrary_fields() {
    // What a game client might actually send
    let payload: Map<String, Value> = json!({
        "name": "Alice",
        "avatar": "https://example.com/a.png",
        "settings": {"sound": true},
        "friendList": []
    })
    .as_object()
    .unwrap()
    .clone();

    let record = UserRecord::from_payload("aB3xZ9", payload, Utc::now());

    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["settings"]["sound"], true);
    assert_eq!(value["avatar"], "https://example.com/a.png");
}

#[test]
fn record_deserializes_from_stored_document() {
    let json = r#"{
        "userId": "aB3xZ9",
        "points": 17.5,
        "friendList": ["Qw12Er"],
        "createdAt": "2026-08-27T12:00:00Z",
        "name": "Alice"
    }"#;

    let record: UserRecord = serde_json::from_str(json).unwrap();
    assert_eq!(record.user_id, "aB3xZ9");
    assert_eq!(record.points, 17.5);
    assert_eq!(record.friend_list, vec!["Qw12Er"]);
    assert_eq!(record.extra.get("name"), Some(&json!("Alice")));
}
