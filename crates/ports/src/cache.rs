//! 缓存端口
//!
//! 值统一为序列化后的字符串，编解码由调用方负责

use std::time::Duration;

use async_trait::async_trait;
use vnm_errors::AppResult;

#[async_trait]
pub trait CachePort: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// `ttl` 为 `None` 时条目不过期（仍受容量淘汰）
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> AppResult<()>;

    async fn delete(&self, key: &str) -> AppResult<()>;

    /// 删除所有以 `prefix` 开头的键，返回删除数量
    async fn delete_prefix(&self, prefix: &str) -> AppResult<u64>;

    async fn exists(&self, key: &str) -> AppResult<bool>;
}
