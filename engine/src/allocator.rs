//! Identifier allocation for new records.
//!
//! Uniqueness lives in the store: `insert` fails with
//! [`Error::DuplicateId`] when a candidate is already taken, and the
//! allocator reacts by drawing a fresh candidate. There is no existence
//! pre-check, so two concurrent allocators can never both claim the same id.

use crate::{
    error::Result,
    ident::{self, ID_LENGTH},
    Error, InsertAck, RecordStore, UserId, UserRecord,
};
use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Allocation policy knobs.
#[derive(Debug, Clone)]
pub struct AllocatorConfig {
    /// Length of generated identifiers
    pub id_length: usize,
    /// How many candidates to try before giving up
    pub max_attempts: u32,
    /// Base backoff between conflicting attempts, doubled per retry
    pub retry_backoff: Duration,
    /// Optional overall deadline for one allocation
    pub deadline: Option<Duration>,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            id_length: ID_LENGTH,
            max_attempts: 8,
            retry_backoff: Duration::from_millis(10),
            deadline: None,
        }
    }
}

/// Allocates collision-free public identifiers and persists new records.
#[derive(Debug)]
pub struct IdentityAllocator<S> {
    store: Arc<S>,
    config: AllocatorConfig,
}

impl<S> Clone for IdentityAllocator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S: RecordStore> IdentityAllocator<S> {
    /// Create an allocator over the given store with default config.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, AllocatorConfig::default())
    }

    /// Create an allocator with an explicit config.
    pub fn with_config(store: Arc<S>, config: AllocatorConfig) -> Self {
        Self { store, config }
    }

    /// Assign a fresh unique id to `payload` and insert it as a new record.
    ///
    /// On success exactly one record exists that did not before; on any
    /// failure none does. Conflicting candidates are retried with
    /// exponential backoff up to `max_attempts`, after which the call fails
    /// with [`Error::IdSpaceExhausted`]. A configured deadline turns an
    /// overrunning retry loop into [`Error::Timeout`] instead.
    pub async fn allocate(&self, payload: Map<String, Value>) -> Result<(UserId, InsertAck)> {
        let started = Instant::now();

        for attempt in 0..self.config.max_attempts {
            if let Some(deadline) = self.config.deadline {
                if started.elapsed() >= deadline {
                    return Err(Error::Timeout);
                }
            }

            let candidate = ident::generate_candidate(self.config.id_length);
            let record = UserRecord::from_payload(candidate.clone(), payload.clone(), Utc::now());

            match self.store.insert(record).await {
                Ok(ack) => return Ok((candidate, ack)),
                Err(Error::DuplicateId(_)) => {
                    let backoff = self.config.retry_backoff * 2u32.saturating_pow(attempt);
                    tokio::time::sleep(backoff).await;
                }
                Err(other) => return Err(other),
            }
        }

        Err(Error::IdSpaceExhausted {
            attempts: self.config.max_attempts,
        })
    }
}
