//! 卖家通知实现

use std::sync::Arc;

use async_trait::async_trait;
use vnm_errors::AppResult;
use vnm_ports::{EventPublisher, publish_json};

use crate::domain::product::{VendorNotification, VendorNotifier};

/// 把通知作为消息发到 `{channel}.vendor-notifications`，由下游投递
pub struct EventVendorNotifier {
    publisher: Arc<dyn EventPublisher>,
    topic: String,
}

impl EventVendorNotifier {
    pub fn new(publisher: Arc<dyn EventPublisher>, channel: &str) -> Self {
        Self {
            publisher,
            topic: format!("{}.vendor-notifications", channel),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

#[async_trait]
impl VendorNotifier for EventVendorNotifier {
    async fn notify(&self, notification: VendorNotification) -> AppResult<()> {
        tracing::debug!(
            vendor_id = %notification.vendor_id,
            product_id = %notification.product_id,
            status = %notification.status,
            "Notifying vendor"
        );
        publish_json(self.publisher.as_ref(), &self.topic, &notification).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::ProductStatus;
    use crate::infrastructure::events::InMemoryEventBus;
    use vnm_common::{ProductId, VendorId};

    #[tokio::test]
    async fn test_notification_published_as_camel_case_json() {
        let bus = Arc::new(InMemoryEventBus::new());
        let notifier = EventVendorNotifier::new(bus.clone(), "catalog.events");

        notifier
            .notify(VendorNotification {
                vendor_id: VendorId(101),
                product_id: ProductId(5),
                product_name: "Nón lá".to_string(),
                status: ProductStatus::Rejected,
                message: Some("Thiếu ảnh".to_string()),
            })
            .await
            .unwrap();

        let payloads = bus.payloads("catalog.events.vendor-notifications").await;
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0]["vendorId"], 101);
        assert_eq!(payloads[0]["productName"], "Nón lá");
        assert_eq!(payloads[0]["message"], "Thiếu ảnh");
    }
}
