//! Event bus adapters.
//!
//! Adapters implement the event publishing port for different environments:
//!
//! - `InMemoryEventBus` - Synchronous, in-process capture for testing
//! - `RedisEventPublisher` - Fire-and-forget Redis pub/sub for production

mod in_memory;
mod redis_publisher;

pub use in_memory::InMemoryEventBus;
pub use redis_publisher::RedisEventPublisher;
