//! Create handler - allocates an id and persists a new user record.

use crate::error::Result;
use botgame_engine::{IdentityAllocator, InsertAck, RecordStore, UserId};
use serde::Serialize;
use serde_json::{Map, Value};

/// Response for user creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResponse {
    /// The freshly assigned id
    pub user_id: UserId,
    /// The store's insert acknowledgment
    pub result: InsertAck,
}

/// Process a creation request: any JSON object is accepted as the payload.
pub async fn handle_create<S: RecordStore>(
    allocator: &IdentityAllocator<S>,
    payload: Map<String, Value>,
) -> Result<CreateResponse> {
    let (user_id, result) = allocator.allocate(payload).await?;
    tracing::debug!("Created user {}", user_id);

    Ok(CreateResponse { user_id, result })
}
