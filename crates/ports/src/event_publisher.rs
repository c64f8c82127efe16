//! Event Publisher trait 定义

use async_trait::async_trait;
use serde::Serialize;
use vnm_errors::{AppError, AppResult};

/// 事件发布者 trait
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// 发布原始 JSON 字符串
    async fn publish_raw(&self, topic: &str, payload: &str) -> AppResult<()>;
}

/// 序列化后发布
pub async fn publish_json<E>(publisher: &dyn EventPublisher, topic: &str, event: &E) -> AppResult<()>
where
    E: Serialize + Sync,
{
    let payload = serde_json::to_string(event)
        .map_err(|e| AppError::internal(format!("Failed to serialize event: {}", e)))?;
    publisher.publish_raw(topic, &payload).await
}
