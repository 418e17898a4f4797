//! Tracks the fenced code blocks of the open document by block id.

pub mod ids;
pub mod scheduler;
pub mod store;

pub use ids::{BLOCK_ID_ATTR, assign_block_ids};
pub use scheduler::{MicrotaskQueue, Scheduler, Task};
pub use store::{LiveNodeRegistry, Listener, RegistrySnapshot, Subscription};
