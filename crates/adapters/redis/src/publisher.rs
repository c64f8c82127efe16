//! Redis pub/sub 事件发布

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use vnm_errors::{AppError, AppResult};
use vnm_ports::EventPublisher;

/// Redis 事件发布器，topic 即频道名
pub struct RedisEventPublisher {
    conn: ConnectionManager,
}

impl RedisEventPublisher {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish_raw(&self, topic: &str, payload: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let receivers: i64 = conn.publish(topic, payload).await.map_err(|e| {
            AppError::external_service(format!("Failed to publish to Redis channel {}: {}", topic, e))
        })?;

        tracing::debug!(channel = %topic, receivers, "Event published to Redis");
        Ok(())
    }
}
