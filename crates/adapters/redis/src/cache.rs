//! Redis Cache 实现

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use vnm_errors::{AppError, AppResult};
use vnm_ports::CachePort;

/// Redis Cache
///
/// 所有键都加上命名空间前缀，避免与其他服务冲突
pub struct RedisCache {
    conn: ConnectionManager,
    namespace: String,
}

impl RedisCache {
    pub fn new(conn: ConnectionManager, namespace: impl Into<String>) -> Self {
        Self {
            conn,
            namespace: namespace.into(),
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }
}

const SCAN_BATCH: usize = 200;

fn redis_error(op: &str, e: redis::RedisError) -> AppError {
    AppError::external_service(format!("Redis {} failed: {}", op, e))
}

#[async_trait]
impl CachePort for RedisCache {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.conn.clone();
        conn.get(self.key(key)).await.map_err(|e| redis_error("get", e))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let key = self.key(key);
        match ttl {
            // SETEX 不接受 0 秒
            Some(duration) => conn
                .set_ex(key, value, duration.as_secs().max(1))
                .await
                .map_err(|e| redis_error("set", e)),
            None => conn.set(key, value).await.map_err(|e| redis_error("set", e)),
        }
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        conn.del(self.key(key)).await.map_err(|e| redis_error("delete", e))
    }

    async fn delete_prefix(&self, prefix: &str) -> AppResult<u64> {
        let mut conn = self.conn.clone();
        let pattern = format!("{}*", self.key(prefix));
        let mut cursor: u64 = 0;
        let mut deleted: u64 = 0;

        // SCAN + DEL 分批进行
        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| redis_error("scan", e))?;

            if !keys.is_empty() {
                let removed: u64 = conn.del(&keys).await.map_err(|e| redis_error("delete", e))?;
                deleted += removed;
            }
            if next == 0 {
                return Ok(deleted);
            }
            cursor = next;
        }
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.conn.clone();
        conn.exists(self.key(key))
            .await
            .map_err(|e| redis_error("exists", e))
    }
}
