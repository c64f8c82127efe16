//! 卖家通知端口

use async_trait::async_trait;
use serde::Serialize;
use vnm_common::{ProductId, VendorId};
use vnm_errors::AppResult;

use super::ProductStatus;

/// 发给卖家的状态通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorNotification {
    pub vendor_id: VendorId,
    pub product_id: ProductId,
    pub product_name: String,
    pub status: ProductStatus,
    pub message: Option<String>,
}

/// 卖家通知（外部协作方）
///
/// 调用方不会因为通知失败回滚状态
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VendorNotifier: Send + Sync {
    async fn notify(&self, notification: VendorNotification) -> AppResult<()>;
}
