//! 商品响应 DTO

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vnm_common::{ProductId, UserId, VendorId};
use vnm_domain_core::{AggregateRoot, Money};

use crate::domain::product::{
    ApprovalDecision, Product, ProductContent, ProductStatus, ProductVariant,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub is_approved: bool,
    pub admin_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub admin_id: UserId,
    pub decided_at: DateTime<Utc>,
}

impl From<&ApprovalDecision> for ReviewResponse {
    fn from(decision: &ApprovalDecision) -> Self {
        Self {
            is_approved: decision.is_approved,
            admin_notes: decision.admin_notes.clone(),
            rejection_reason: decision.rejection_reason.clone(),
            admin_id: decision.admin_id,
            decided_at: decision.decided_at,
        }
    }
}

/// 商品快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: ProductId,
    pub vendor_id: VendorId,
    pub name: String,
    pub slug: String,
    pub status: ProductStatus,
    pub status_code: u8,
    pub prices: Vec<Money>,
    pub variants: Vec<ProductVariant>,
    pub contents: Vec<ProductContent>,
    pub last_review: Option<ReviewResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        let audit = product.audit_info();
        Self {
            id: product.id(),
            vendor_id: product.vendor_id(),
            name: product.name().to_string(),
            slug: product.slug().to_string(),
            status: product.status(),
            status_code: product.status().code(),
            prices: product.prices().to_vec(),
            variants: product.variants().to_vec(),
            contents: product.contents().to_vec(),
            last_review: product.last_review().map(ReviewResponse::from),
            created_at: audit.created_at,
            updated_at: audit.updated_at,
        }
    }
}

/// 列表项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: ProductId,
    pub vendor_id: VendorId,
    pub name: String,
    pub slug: String,
    /// đồng
    pub price_vnd: i64,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id(),
            vendor_id: product.vendor_id(),
            name: product.name().to_string(),
            slug: product.slug().to_string(),
            price_vnd: product.vnd_price().map(|m| m.amount).unwrap_or(0),
        }
    }
}

/// 批量状态更新结果
///
/// 部分失败是正常结果，不是错误
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateProductsResponse {
    pub updated_count: usize,
    pub failed_count: usize,
    pub updated_product_ids: Vec<ProductId>,
    pub failed_product_ids: Vec<ProductId>,
    pub error_messages: Vec<String>,
    pub success_rate: f64,
}

impl BulkUpdateProductsResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, id: ProductId) {
        self.updated_product_ids.push(id);
        self.updated_count += 1;
        self.refresh_rate();
    }

    pub fn record_failure(&mut self, id: ProductId, message: impl Into<String>) {
        self.failed_product_ids.push(id);
        self.error_messages.push(message.into());
        self.failed_count += 1;
        self.refresh_rate();
    }

    pub fn total_count(&self) -> usize {
        self.updated_count + self.failed_count
    }

    fn refresh_rate(&mut self) {
        let total = self.total_count();
        self.success_rate = if total == 0 {
            0.0
        } else {
            self.updated_count as f64 * 100.0 / total as f64
        };
    }
}

/// 单个卖家的税务汇总
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorTaxLine {
    pub vendor_id: VendorId,
    pub active_products: usize,
    pub listing_value: Money,
    pub estimated_vat: Money,
}

/// 在架商品税务报表（VND）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxReport {
    pub currency: String,
    pub vat_rate_percent: u32,
    pub vendors: Vec<VendorTaxLine>,
    pub total_listing_value: Money,
    pub total_estimated_vat: Money,
    pub generated_at: DateTime<Utc>,
}
