//! Score ledger: point deltas and the views over them.

use crate::{error::Result, Error, RecordStore, UpdateOutcome, UserRecord};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Default size of the ranking view.
pub const DEFAULT_RANKING_LIMIT: i64 = 20;

/// Applies relative point changes and serves point-ordered views.
#[derive(Debug)]
pub struct ScoreLedger<S> {
    store: Arc<S>,
}

impl<S> Clone for ScoreLedger<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: RecordStore> ScoreLedger<S> {
    /// Create a ledger over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Apply a relative point change plus generic field updates to one record.
    ///
    /// The delta must be numeric; this is checked before any store access and
    /// a failure has no effect. The delta is the sole writer of `points`: a
    /// stray `points` key among the generic updates is stripped, never
    /// applied. The field sets and the increment go to the store as one
    /// atomic write, so concurrent deltas compose without lost updates.
    pub async fn apply_delta(
        &self,
        user_id: &str,
        delta: &Value,
        mut field_updates: Map<String, Value>,
    ) -> Result<UpdateOutcome> {
        let Some(delta) = delta.as_f64() else {
            return Err(Error::InvalidArgument(format!(
                "points delta is not numeric: {delta}"
            )));
        };

        // Delta wins; a generic points update is dropped.
        field_updates.remove("points");

        let outcome = self.store.apply_update(user_id, delta, &field_updates).await?;
        if outcome.matched_count == 0 {
            return Err(Error::UserNotFound(user_id.to_string()));
        }

        Ok(outcome)
    }

    /// Up to `limit` records (default 20), points descending. Ties keep the
    /// store's stable order.
    pub async fn top_ranked(&self, limit: Option<i64>) -> Result<Vec<UserRecord>> {
        self.store
            .top_by_points(limit.unwrap_or(DEFAULT_RANKING_LIMIT))
            .await
    }

    /// Fetch one record. Absence is `Ok(None)`, not an error.
    pub async fn lookup(&self, user_id: &str) -> Result<Option<UserRecord>> {
        self.store.find(user_id).await
    }

    /// Every record, no ordering contract.
    pub async fn all_records(&self) -> Result<Vec<UserRecord>> {
        self.store.all().await
    }
}
