//! Client side of a hierarchical real-time key-value store.
//!
//! [`RealtimeStore`] is the seam the application talks to. [`FirebaseStore`]
//! speaks to a Firebase Realtime Database over REST and server-sent events,
//! [`MemoryStore`] keeps the tree in process.

mod error;
mod firebase;
mod memory;
pub mod path;
pub mod push_id;
mod sse;
mod subscription;
mod traits;
pub mod tree;

pub use error::{StoreError, StoreResult};
pub use firebase::FirebaseStore;
pub use memory::MemoryStore;
pub use subscription::Subscription;
pub use traits::{RealtimeStore, SnapshotCallback};
