//! # Botgame Engine
//!
//! Core logic for a game's user/profile registry.
//!
//! This crate owns the parts of the backend with a real correctness
//! contract: unique identifier allocation, atomic score updates, and the
//! ranked views over them. HTTP routing and the PostgreSQL store live in the
//! server crate; everything here goes through the [`RecordStore`] trait.
//!
//! ## Core Concepts
//!
//! ### Records
//!
//! A [`UserRecord`] carries a unique 6-character `user_id`, a `points`
//! score, an ordered `friend_list` of weak references, a creation
//! timestamp, and arbitrary caller-supplied extra fields.
//!
//! ### Identifier allocation
//!
//! [`IdentityAllocator`] draws random candidates from the 62-symbol
//! alphanumeric alphabet and inserts them. Uniqueness is enforced by the
//! store itself; an insert conflict triggers a bounded backoff-and-retry
//! loop, so there is no check-then-insert race between concurrent writers.
//!
//! ### Score ledger
//!
//! [`ScoreLedger`] applies relative point deltas as a single combined store
//! write (generic field sets + increment), making concurrent deltas
//! commute, and serves the points-descending ranking view.
//!
//! ### Friend graph
//!
//! [`FriendGraphView`] joins a record's friend list against the store,
//! embedding the friends that exist and silently omitting dangling entries.
//!
//! ## Quick Start
//!
//! ```rust
//! use botgame_engine::{FriendGraphView, IdentityAllocator, MemoryStore, ScoreLedger};
//! use serde_json::{json, Map};
//! use std::sync::Arc;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let store = Arc::new(MemoryStore::new());
//! let allocator = IdentityAllocator::new(Arc::clone(&store));
//! let ledger = ScoreLedger::new(Arc::clone(&store));
//!
//! // 1. Create a player from an arbitrary payload
//! let payload: Map<String, serde_json::Value> =
//!     json!({"name": "Alice"}).as_object().unwrap().clone();
//! let (user_id, _ack) = allocator.allocate(payload).await.unwrap();
//! assert_eq!(user_id.len(), 6);
//!
//! // 2. Award points atomically
//! ledger.apply_delta(&user_id, &json!(25), Map::new()).await.unwrap();
//!
//! // 3. Query the ranking
//! let top = ledger.top_ranked(None).await.unwrap();
//! assert_eq!(top[0].points, 25.0);
//! # });
//! ```

pub mod allocator;
pub mod error;
pub mod friends;
pub mod ident;
pub mod ledger;
pub mod record;
pub mod store;

// Re-export main types at crate root
pub use allocator::{AllocatorConfig, IdentityAllocator};
pub use error::Error;
pub use friends::{FriendGraphView, FriendView};
pub use ident::{ID_ALPHABET, ID_LENGTH};
pub use ledger::{ScoreLedger, DEFAULT_RANKING_LIMIT};
pub use record::UserRecord;
pub use store::{InsertAck, MemoryStore, RecordStore, UpdateOutcome};

/// Type aliases for clarity
pub type UserId = String;
pub type Points = f64;
