//! 商品聚合根

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vnm_common::{AuditInfo, ProductId, UserId, VendorId, slugify};
use vnm_domain_core::{AggregateRoot, Currency, Entity, Money};

use super::{ProductStatus, lifecycle};
use crate::error::{ProductError, TransitionError};

/// 商品规格（SKU）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub sku: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub price_override: Option<Money>,
}

/// 多语言内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductContent {
    /// "vi", "en" ...
    pub language: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// 管理员审核决定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalDecision {
    pub product_id: ProductId,
    pub is_approved: bool,
    pub admin_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub admin_id: UserId,
    pub decided_at: DateTime<Utc>,
}

impl ApprovalDecision {
    pub fn target_status(&self) -> ProductStatus {
        if self.is_approved {
            ProductStatus::Active
        } else {
            ProductStatus::Rejected
        }
    }
}

/// 新建商品的输入
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub vendor_id: VendorId,
    pub name: String,
    /// 为空时由名称生成
    pub slug: Option<String>,
    pub prices: Vec<Money>,
    pub variants: Vec<ProductVariant>,
    pub contents: Vec<ProductContent>,
    pub submit_for_review: bool,
    pub created_by: Option<UserId>,
}

/// 商品
#[derive(Debug, Clone)]
pub struct Product {
    id: ProductId,
    vendor_id: VendorId,
    name: String,
    slug: String,
    status: ProductStatus,
    prices: Vec<Money>,
    variants: Vec<ProductVariant>,
    contents: Vec<ProductContent>,
    last_review: Option<ApprovalDecision>,
    audit_info: AuditInfo,
}

impl Product {
    /// 创建商品，初始状态为 Draft 或 Pending
    pub fn new(id: ProductId, input: NewProduct) -> Result<Self, ProductError> {
        if !input.prices.iter().any(|p| p.currency.is_vnd()) {
            return Err(ProductError::MissingVndPrice);
        }
        let variant_prices = input.variants.iter().filter_map(|v| v.price_override.as_ref());
        if input.prices.iter().chain(variant_prices).any(Money::is_negative) {
            return Err(ProductError::NegativePrice);
        }

        let mut skus = HashSet::new();
        for variant in &input.variants {
            if !skus.insert(variant.sku.trim().to_lowercase()) {
                return Err(ProductError::DuplicateSku(variant.sku.clone()));
            }
        }

        let slug = match input.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => slugify(slug),
            _ => slugify(&input.name),
        };

        Ok(Self {
            id,
            vendor_id: input.vendor_id,
            name: input.name.trim().to_string(),
            slug,
            status: lifecycle::initial_status(input.submit_for_review),
            prices: input.prices,
            variants: input.variants,
            contents: input.contents,
            last_review: None,
            audit_info: AuditInfo::new(input.created_by),
        })
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn vendor_id(&self) -> VendorId {
        self.vendor_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn status(&self) -> ProductStatus {
        self.status
    }

    pub fn prices(&self) -> &[Money] {
        &self.prices
    }

    pub fn variants(&self) -> &[ProductVariant] {
        &self.variants
    }

    pub fn contents(&self) -> &[ProductContent] {
        &self.contents
    }

    pub fn last_review(&self) -> Option<&ApprovalDecision> {
        self.last_review.as_ref()
    }

    pub fn is_owned_by(&self, vendor_id: VendorId) -> bool {
        self.vendor_id == vendor_id
    }

    pub fn price_in(&self, currency: &Currency) -> Option<&Money> {
        self.prices.iter().find(|p| &p.currency == currency)
    }

    pub fn vnd_price(&self) -> Option<&Money> {
        self.price_in(&Currency::vnd())
    }

    /// 在架价值（VND）：各规格价格 × 库存；无规格时按基础价计
    pub fn listing_value_vnd(&self) -> Money {
        let base = self.vnd_price().map(|m| m.amount).unwrap_or(0);
        if self.variants.is_empty() {
            return Money::vnd(base);
        }

        let total = self
            .variants
            .iter()
            .map(|v| {
                let unit = v
                    .price_override
                    .as_ref()
                    .filter(|m| m.currency.is_vnd())
                    .map(|m| m.amount)
                    .unwrap_or(base);
                unit.saturating_mul(v.stock as i64)
            })
            .fold(0i64, i64::saturating_add);
        Money::vnd(total)
    }

    /// 按生命周期迁移状态，返回原状态
    pub fn transition_to(
        &mut self,
        to: ProductStatus,
        actor: UserId,
    ) -> Result<ProductStatus, TransitionError> {
        lifecycle::transition(self.status, to)?;
        let from = self.status;
        self.status = to;
        self.audit_info.update(Some(actor));
        Ok(from)
    }

    /// 记录审核决定：通过 → Active，驳回 → Rejected
    pub fn record_decision(
        &mut self,
        decision: ApprovalDecision,
    ) -> Result<ProductStatus, TransitionError> {
        let from = self.transition_to(decision.target_status(), decision.admin_id)?;
        self.last_review = Some(decision);
        Ok(from)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AggregateRoot for Product {
    fn audit_info(&self) -> &AuditInfo {
        &self.audit_info
    }

    fn audit_info_mut(&mut self) -> &mut AuditInfo {
        &mut self.audit_info
    }
}
