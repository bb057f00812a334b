//! Friend graph resolution.
//!
//! A record's friend list holds weak references: ids that may or may not
//! point at existing records. Resolution joins the list against the store
//! and embeds whatever actually exists.

use crate::{error::Result, RecordStore, UserRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// A record together with its resolved friends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendView {
    /// The record the friend list belongs to
    #[serde(flatten)]
    pub user: UserRecord,
    /// Resolved friend records, in friend-list order
    pub friends: Vec<UserRecord>,
}

/// Resolves friend lists into embedded records.
#[derive(Debug)]
pub struct FriendGraphView<S> {
    store: Arc<S>,
}

impl<S> Clone for FriendGraphView<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: RecordStore> FriendGraphView<S> {
    /// Create a view over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Resolve the friend list of `user_id`.
    ///
    /// Returns `Ok(None)` when the user itself has no record. Dangling
    /// friend-list entries are silently omitted; duplicate entries resolve
    /// once per distinct matching record.
    pub async fn resolve(&self, user_id: &str) -> Result<Option<FriendView>> {
        let Some(user) = self.store.find(user_id).await? else {
            return Ok(None);
        };

        let found = self.store.find_many(&user.friend_list).await?;
        let mut by_id: HashMap<&str, &UserRecord> =
            found.iter().map(|r| (r.user_id.as_str(), r)).collect();

        let friends = user
            .friend_list
            .iter()
            .filter_map(|id| by_id.remove(id.as_str()).cloned())
            .collect();

        Ok(Some(FriendView { user, friends }))
    }
}
