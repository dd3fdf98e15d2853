//! Shared mutable state for the Kula exchange.
//!
//! Three cooperating pieces live here:
//!
//! - [`IntentPool`] / [`InMemoryPool`]: the open intents waiting to trade
//! - [`PoolSnapshot`]: the immutable value copy a solver pass works on
//! - [`MatchRegistry`]: the append-only history, and the atomic commit that
//!   moves settled intents out of the pool and into it
//!
//! Plus the [`EventBus`] that fans exchange events out to observers.

pub mod events;
pub mod pool;
pub mod registry;
pub mod snapshot;

pub use events::{EventBus, EventFilter};
pub use pool::{InMemoryPool, IntentPool};
pub use registry::{CommitReceipt, MatchRegistry};
pub use snapshot::PoolSnapshot;
