//! Domain Event 定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Domain Event trait
pub trait DomainEvent: Send + Sync + Serialize {
    /// 事件类型名称 (e.g. "product.approved")
    fn event_type(&self) -> &'static str;

    /// 聚合类型
    fn aggregate_type(&self) -> &'static str;

    /// 聚合 ID
    fn aggregate_id(&self) -> String;
}

/// 事件信封（包含元数据）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope<E> {
    pub id: Uuid,
    pub event_type: String,
    pub aggregate_type: String,
    pub aggregate_id: String,
    /// 事件数据
    pub data: E,
    pub metadata: EventMetadata,
    /// 发生时间
    pub occurred_at: DateTime<Utc>,
}

impl<E: DomainEvent> EventEnvelope<E> {
    pub fn new(event: E, metadata: EventMetadata) -> Self {
        Self {
            id: Uuid::now_v7(),
            event_type: event.event_type().to_string(),
            aggregate_type: event.aggregate_type().to_string(),
            aggregate_id: event.aggregate_id(),
            data: event,
            metadata,
            occurred_at: Utc::now(),
        }
    }
}

/// 事件元数据
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    /// 触发用户 ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// 关联 ID（请求 ID，用于追踪）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

impl EventMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_correlation(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Archived {
        product_id: i64,
    }

    impl DomainEvent for Archived {
        fn event_type(&self) -> &'static str {
            "product.archived"
        }

        fn aggregate_type(&self) -> &'static str {
            "product"
        }

        fn aggregate_id(&self) -> String {
            self.product_id.to_string()
        }
    }

    #[test]
    fn test_envelope_copies_event_identity() {
        let envelope = EventEnvelope::new(
            Archived { product_id: 42 },
            EventMetadata::new().with_user("7").with_correlation("req-1"),
        );

        assert_eq!(envelope.event_type, "product.archived");
        assert_eq!(envelope.aggregate_type, "product");
        assert_eq!(envelope.aggregate_id, "42");
        assert_eq!(envelope.metadata.user_id.as_deref(), Some("7"));

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["eventType"], "product.archived");
        assert_eq!(json["data"]["product_id"], 42);
        assert_eq!(json["metadata"]["correlationId"], "req-1");
    }
}
