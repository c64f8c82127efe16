//! 商品领域事件

use serde::Serialize;
use vnm_common::{ProductId, UserId, VendorId};
use vnm_event_core::DomainEvent;

use super::ProductStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProductEvent {
    Created {
        product_id: ProductId,
        vendor_id: VendorId,
        status: ProductStatus,
        by: Option<UserId>,
    },
    StatusChanged {
        product_id: ProductId,
        vendor_id: VendorId,
        from: ProductStatus,
        to: ProductStatus,
        by: UserId,
    },
    Reviewed {
        product_id: ProductId,
        vendor_id: VendorId,
        approved: bool,
        rejection_reason: Option<String>,
        by: UserId,
    },
}

impl ProductEvent {
    pub fn product_id(&self) -> ProductId {
        match self {
            ProductEvent::Created { product_id, .. }
            | ProductEvent::StatusChanged { product_id, .. }
            | ProductEvent::Reviewed { product_id, .. } => *product_id,
        }
    }
}

impl DomainEvent for ProductEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ProductEvent::Created { .. } => "product.created",
            ProductEvent::StatusChanged { .. } => "product.status_changed",
            ProductEvent::Reviewed { .. } => "product.reviewed",
        }
    }

    fn aggregate_type(&self) -> &'static str {
        "product"
    }

    fn aggregate_id(&self) -> String {
        self.product_id().to_string()
    }
}
