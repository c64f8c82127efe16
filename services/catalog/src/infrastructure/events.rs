//! 进程内事件发布器

use async_trait::async_trait;
use tokio::sync::RwLock;
use vnm_errors::AppResult;
use vnm_ports::EventPublisher;

/// 只记录日志，未配置 Redis 时使用
pub struct LoggingEventPublisher;

#[async_trait]
impl EventPublisher for LoggingEventPublisher {
    async fn publish_raw(&self, topic: &str, payload: &str) -> AppResult<()> {
        tracing::info!(topic = %topic, payload = %payload, "Event published");
        Ok(())
    }
}

/// 保存所有已发布消息
#[derive(Default)]
pub struct InMemoryEventBus {
    messages: RwLock<Vec<(String, String)>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// (topic, payload)
    pub async fn messages(&self) -> Vec<(String, String)> {
        self.messages.read().await.clone()
    }

    pub async fn payloads(&self, topic: &str) -> Vec<serde_json::Value> {
        self.messages
            .read()
            .await
            .iter()
            .filter(|(t, _)| t == topic)
            .filter_map(|(_, payload)| serde_json::from_str(payload).ok())
            .collect()
    }

    pub async fn clear(&self) {
        self.messages.write().await.clear();
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish_raw(&self, topic: &str, payload: &str) -> AppResult<()> {
        tracing::debug!(topic = %topic, "Event captured");
        self.messages
            .write()
            .await
            .push((topic.to_string(), payload.to_string()));
        Ok(())
    }
}
