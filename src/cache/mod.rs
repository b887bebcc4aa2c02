//! Key-value stores with TTL semantics backing the contest cache
//!
//! Every backend implements [`CacheStore`]: `get` reports an absent or
//! expired key as `Ok(None)` and reserves `Err` for a store that is
//! unreachable or holds an unreadable entry. Callers rely on that distinction
//! to decide between refreshing and failing.

mod manager;
mod memory;
mod redis_store;
mod store;

pub use manager::FileStore;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use store::{CacheError, CacheStore};
