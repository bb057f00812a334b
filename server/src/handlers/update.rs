//! Update handler - applies a points delta plus generic field updates.
//!
//! The PATCH body is one flat JSON object: the `points` key is the numeric
//! delta, every other key is a generic field update. The ledger validates
//! the delta and owns the points write.

use crate::error::Result;
use botgame_engine::{RecordStore, ScoreLedger, UpdateOutcome};
use serde_json::{Map, Value};

/// Split a PATCH body into the points delta and the remaining field updates.
///
/// A missing `points` key becomes `null`, which the ledger rejects as a
/// non-numeric delta before touching the store.
pub fn split_delta(mut body: Map<String, Value>) -> (Value, Map<String, Value>) {
    let delta = body.remove("points").unwrap_or(Value::Null);
    (delta, body)
}

/// Process an update request for one user.
pub async fn handle_update<S: RecordStore>(
    ledger: &ScoreLedger<S>,
    user_id: &str,
    body: Map<String, Value>,
) -> Result<UpdateOutcome> {
    let (delta, field_updates) = split_delta(body);
    let outcome = ledger.apply_delta(user_id, &delta, field_updates).await?;
    tracing::debug!("Updated user {}: {:?}", user_id, outcome);

    Ok(outcome)
}
