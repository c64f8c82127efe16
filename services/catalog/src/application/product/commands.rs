//! 商品命令定义

use vnm_common::{ProductId, UserId, VendorId};
use vnm_cqrs_core::{Command, Request};
use vnm_domain_core::Money;

use super::dto::{BulkUpdateProductsResponse, ProductResponse};
use crate::domain::product::{ProductContent, ProductStatus, ProductVariant};

/// 卖家创建商品
#[derive(Debug, Clone)]
pub struct CreateProductCommand {
    pub vendor_id: VendorId,
    pub name: String,
    pub slug: Option<String>,
    pub prices: Vec<Money>,
    pub variants: Vec<ProductVariant>,
    pub contents: Vec<ProductContent>,
    /// 直接提交审核（Pending），否则为 Draft
    pub submit_for_review: bool,
}

impl Request for CreateProductCommand {
    const NAME: &'static str = "CreateProduct";
    type Response = ProductResponse;
}

impl Command for CreateProductCommand {}

/// Draft/Rejected → Pending
#[derive(Debug, Clone)]
pub struct SubmitProductCommand {
    pub product_id: ProductId,
}

impl Request for SubmitProductCommand {
    const NAME: &'static str = "SubmitProduct";
    type Response = ProductResponse;
}

impl Command for SubmitProductCommand {}

/// Pending → UnderReview
#[derive(Debug, Clone)]
pub struct StartReviewCommand {
    pub product_id: ProductId,
}

impl Request for StartReviewCommand {
    const NAME: &'static str = "StartReview";
    type Response = ProductResponse;
}

impl Command for StartReviewCommand {}

/// 管理员审核：通过 → Active，驳回 → Rejected
#[derive(Debug, Clone)]
pub struct ApproveProductCommand {
    pub product_id: ProductId,
    pub is_approved: bool,
    pub admin_notes: Option<String>,
    pub rejection_reason: Option<String>,
    /// 若提供，必须与当前登录用户一致
    pub admin_id: Option<UserId>,
}

impl Request for ApproveProductCommand {
    const NAME: &'static str = "ApproveProduct";
    type Response = ProductResponse;
}

impl Command for ApproveProductCommand {}

/// 单个商品的状态迁移（例如卖家下架）
#[derive(Debug, Clone)]
pub struct ChangeProductStatusCommand {
    pub product_id: ProductId,
    pub new_status: ProductStatus,
}

impl Request for ChangeProductStatusCommand {
    const NAME: &'static str = "ChangeProductStatus";
    type Response = ProductResponse;
}

impl Command for ChangeProductStatusCommand {}

/// 批量状态迁移，逐个校验、遇错继续
#[derive(Debug, Clone)]
pub struct BulkUpdateProductsCommand {
    pub product_ids: Vec<ProductId>,
    pub new_status: ProductStatus,
    pub admin_notes: Option<String>,
    pub admin_id: Option<UserId>,
    pub notify_vendors: bool,
}

impl Request for BulkUpdateProductsCommand {
    const NAME: &'static str = "BulkUpdateProducts";
    type Response = BulkUpdateProductsResponse;
}

impl Command for BulkUpdateProductsCommand {}
