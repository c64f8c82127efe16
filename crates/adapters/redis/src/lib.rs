//! vnm-adapter-redis - Redis 适配器
//!
//! 查询缓存与 pub/sub 事件发布

mod cache;
mod connection;
mod publisher;

pub use cache::*;
pub use connection::*;
pub use publisher::*;
