//! 商品命令与查询处理器

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use vnm_common::{PagedResult, ProductId, UserId, VendorId};
use vnm_cqrs_core::{RequestContext, RequestHandler};
use vnm_domain_core::Money;
use vnm_errors::{AppError, AppResult};

use super::commands::{
    ApproveProductCommand, BulkUpdateProductsCommand, ChangeProductStatusCommand,
    CreateProductCommand, StartReviewCommand, SubmitProductCommand,
};
use super::dto::{BulkUpdateProductsResponse, ProductResponse, ProductSummary, TaxReport, VendorTaxLine};
use super::queries::{GetProductQuery, GetTaxReportQuery, ListActiveProductsQuery};
use super::service::{ProductLifecycle, ReviewInput, actor};
use crate::domain::authorization::{Requirement, ResourceType};
use crate::domain::product::{NewProduct, Product, ProductEvent, ProductFilter, ProductStatus};
use crate::error::ProductError;

/// 增值税税率
pub const VAT_RATE_PERCENT: u32 = 10;

/// 请求中的 adminId 必须是当前登录用户
fn ensure_acting_admin(claimed: Option<UserId>, ctx: &RequestContext) -> AppResult<()> {
    match claimed {
        Some(admin_id) if ctx.principal.user_id() != Some(admin_id) => Err(AppError::validation(
            format!("adminId {} does not match the authenticated user", admin_id),
        )),
        _ => Ok(()),
    }
}

pub struct CreateProductHandler {
    lifecycle: Arc<ProductLifecycle>,
}

impl CreateProductHandler {
    pub fn new(lifecycle: Arc<ProductLifecycle>) -> Self {
        Self { lifecycle }
    }
}

#[async_trait]
impl RequestHandler<CreateProductCommand> for CreateProductHandler {
    async fn handle(
        &self,
        cmd: CreateProductCommand,
        ctx: &RequestContext,
    ) -> AppResult<ProductResponse> {
        self.lifecycle
            .engine()
            .evaluate(
                &ctx.principal,
                &Requirement::owned_by(ResourceType::Product, cmd.vendor_id),
            )
            .into_result()?;

        let products = self.lifecycle.products();
        let id = products.next_id().await?;
        let product = Product::new(
            id,
            NewProduct {
                vendor_id: cmd.vendor_id,
                name: cmd.name,
                slug: cmd.slug,
                prices: cmd.prices,
                variants: cmd.variants,
                contents: cmd.contents,
                submit_for_review: cmd.submit_for_review,
                created_by: ctx.principal.user_id(),
            },
        )?;

        if products.slug_exists(product.vendor_id(), product.slug()).await? {
            return Err(ProductError::DuplicateSlug {
                vendor_id: product.vendor_id(),
                slug: product.slug().to_string(),
            }
            .into());
        }

        products.save(&product).await?;
        tracing::info!(
            product_id = %product.id(),
            vendor_id = %product.vendor_id(),
            status = %product.status(),
            "Product created"
        );

        self.lifecycle
            .publish(
                ProductEvent::Created {
                    product_id: product.id(),
                    vendor_id: product.vendor_id(),
                    status: product.status(),
                    by: ctx.principal.user_id(),
                },
                ctx,
            )
            .await;

        Ok(ProductResponse::from(&product))
    }
}

pub struct SubmitProductHandler {
    lifecycle: Arc<ProductLifecycle>,
}

impl SubmitProductHandler {
    pub fn new(lifecycle: Arc<ProductLifecycle>) -> Self {
        Self { lifecycle }
    }
}

#[async_trait]
impl RequestHandler<SubmitProductCommand> for SubmitProductHandler {
    async fn handle(
        &self,
        cmd: SubmitProductCommand,
        ctx: &RequestContext,
    ) -> AppResult<ProductResponse> {
        let mut product = self.lifecycle.load(cmd.product_id).await?;
        self.lifecycle
            .change_status(&mut product, ProductStatus::Pending, ctx)
            .await?;
        Ok(ProductResponse::from(&product))
    }
}

pub struct StartReviewHandler {
    lifecycle: Arc<ProductLifecycle>,
}

impl StartReviewHandler {
    pub fn new(lifecycle: Arc<ProductLifecycle>) -> Self {
        Self { lifecycle }
    }
}

#[async_trait]
impl RequestHandler<StartReviewCommand> for StartReviewHandler {
    async fn handle(
        &self,
        cmd: StartReviewCommand,
        ctx: &RequestContext,
    ) -> AppResult<ProductResponse> {
        let mut product = self.lifecycle.load(cmd.product_id).await?;
        self.lifecycle
            .change_status(&mut product, ProductStatus::UnderReview, ctx)
            .await?;
        Ok(ProductResponse::from(&product))
    }
}

pub struct ApproveProductHandler {
    lifecycle: Arc<ProductLifecycle>,
}

impl ApproveProductHandler {
    pub fn new(lifecycle: Arc<ProductLifecycle>) -> Self {
        Self { lifecycle }
    }
}

#[async_trait]
impl RequestHandler<ApproveProductCommand> for ApproveProductHandler {
    async fn handle(
        &self,
        cmd: ApproveProductCommand,
        ctx: &RequestContext,
    ) -> AppResult<ProductResponse> {
        ensure_acting_admin(cmd.admin_id, ctx)?;

        let mut product = self.lifecycle.load(cmd.product_id).await?;
        let message = cmd
            .rejection_reason
            .clone()
            .or_else(|| cmd.admin_notes.clone());
        self.lifecycle
            .review(
                &mut product,
                ReviewInput {
                    is_approved: cmd.is_approved,
                    admin_notes: cmd.admin_notes,
                    rejection_reason: cmd.rejection_reason,
                },
                ctx,
            )
            .await?;

        self.lifecycle.notify_vendor(&product, message).await;
        Ok(ProductResponse::from(&product))
    }
}

pub struct ChangeProductStatusHandler {
    lifecycle: Arc<ProductLifecycle>,
}

impl ChangeProductStatusHandler {
    pub fn new(lifecycle: Arc<ProductLifecycle>) -> Self {
        Self { lifecycle }
    }
}

#[async_trait]
impl RequestHandler<ChangeProductStatusCommand> for ChangeProductStatusHandler {
    async fn handle(
        &self,
        cmd: ChangeProductStatusCommand,
        ctx: &RequestContext,
    ) -> AppResult<ProductResponse> {
        let mut product = self.lifecycle.load(cmd.product_id).await?;
        self.lifecycle
            .move_to(&mut product, cmd.new_status, None, ctx)
            .await?;
        Ok(ProductResponse::from(&product))
    }
}

pub struct BulkUpdateProductsHandler {
    lifecycle: Arc<ProductLifecycle>,
}

impl BulkUpdateProductsHandler {
    pub fn new(lifecycle: Arc<ProductLifecycle>) -> Self {
        Self { lifecycle }
    }

    /// 第二个值为 false 表示商品已处于目标状态，没有任何副作用
    async fn update_one(
        &self,
        id: ProductId,
        cmd: &BulkUpdateProductsCommand,
        ctx: &RequestContext,
    ) -> AppResult<(Product, bool)> {
        let mut product = self.lifecycle.load(id).await?;
        if product.status() == cmd.new_status {
            return Ok((product, false));
        }
        self.lifecycle
            .move_to(&mut product, cmd.new_status, cmd.admin_notes.clone(), ctx)
            .await?;
        Ok((product, true))
    }
}

#[async_trait]
impl RequestHandler<BulkUpdateProductsCommand> for BulkUpdateProductsHandler {
    async fn handle(
        &self,
        cmd: BulkUpdateProductsCommand,
        ctx: &RequestContext,
    ) -> AppResult<BulkUpdateProductsResponse> {
        ensure_acting_admin(cmd.admin_id, ctx)?;
        actor(&ctx.principal)?;

        let mut response = BulkUpdateProductsResponse::new();
        let mut seen = HashSet::new();

        for &id in &cmd.product_ids {
            if !seen.insert(id) {
                continue;
            }
            if ctx.is_cancelled() {
                tracing::warn!(
                    processed = response.total_count(),
                    "Bulk update cancelled between items"
                );
                return Err(AppError::cancelled("Bulk update was cancelled"));
            }

            match self.update_one(id, &cmd, ctx).await {
                Ok((product, changed)) => {
                    response.record_success(id);
                    if changed && cmd.notify_vendors {
                        self.lifecycle
                            .notify_vendor(&product, cmd.admin_notes.clone())
                            .await;
                    }
                }
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => {
                    tracing::warn!(product_id = %id, error = %e, "Bulk item failed");
                    response.record_failure(id, format!("Product {}: {}", id, e));
                }
            }
        }

        tracing::info!(
            target_status = %cmd.new_status,
            updated = response.updated_count,
            failed = response.failed_count,
            success_rate = response.success_rate,
            "Bulk status update finished"
        );
        Ok(response)
    }
}

pub struct GetProductHandler {
    lifecycle: Arc<ProductLifecycle>,
}

impl GetProductHandler {
    pub fn new(lifecycle: Arc<ProductLifecycle>) -> Self {
        Self { lifecycle }
    }
}

#[async_trait]
impl RequestHandler<GetProductQuery> for GetProductHandler {
    async fn handle(&self, query: GetProductQuery, ctx: &RequestContext) -> AppResult<ProductResponse> {
        let product = self.lifecycle.load(query.product_id).await?;

        if !product.status().is_listed() {
            let visible = self
                .lifecycle
                .engine()
                .evaluate(
                    &ctx.principal,
                    &Requirement::owned_by(ResourceType::Product, product.vendor_id()),
                )
                .is_allowed();
            if !visible {
                return Err(ProductError::NotFound(query.product_id).into());
            }
        }

        Ok(ProductResponse::from(&product))
    }
}

pub struct ListActiveProductsHandler {
    lifecycle: Arc<ProductLifecycle>,
}

impl ListActiveProductsHandler {
    pub fn new(lifecycle: Arc<ProductLifecycle>) -> Self {
        Self { lifecycle }
    }
}

#[async_trait]
impl RequestHandler<ListActiveProductsQuery> for ListActiveProductsHandler {
    async fn handle(
        &self,
        query: ListActiveProductsQuery,
        _ctx: &RequestContext,
    ) -> AppResult<PagedResult<ProductSummary>> {
        let filter = ProductFilter {
            status: Some(ProductStatus::Active),
            vendor_id: query.vendor_id,
        };
        let (items, total) = self
            .lifecycle
            .products()
            .list(&filter, &query.pagination)
            .await?;

        Ok(PagedResult::new(
            items.iter().map(ProductSummary::from).collect(),
            total,
            &query.pagination,
        ))
    }
}

pub struct GetTaxReportHandler {
    lifecycle: Arc<ProductLifecycle>,
}

impl GetTaxReportHandler {
    pub fn new(lifecycle: Arc<ProductLifecycle>) -> Self {
        Self { lifecycle }
    }
}

#[async_trait]
impl RequestHandler<GetTaxReportQuery> for GetTaxReportHandler {
    async fn handle(&self, _query: GetTaxReportQuery, _ctx: &RequestContext) -> AppResult<TaxReport> {
        let filter = ProductFilter {
            status: Some(ProductStatus::Active),
            vendor_id: None,
        };
        let products = self.lifecycle.products().find_all(&filter).await?;

        let mut per_vendor: BTreeMap<VendorId, (usize, i64)> = BTreeMap::new();
        for product in &products {
            let entry = per_vendor.entry(product.vendor_id()).or_default();
            entry.0 += 1;
            entry.1 = entry.1.saturating_add(product.listing_value_vnd().amount);
        }

        let vendors: Vec<VendorTaxLine> = per_vendor
            .into_iter()
            .map(|(vendor_id, (count, value))| {
                let listing_value = Money::vnd(value);
                VendorTaxLine {
                    vendor_id,
                    active_products: count,
                    estimated_vat: listing_value.percentage(VAT_RATE_PERCENT),
                    listing_value,
                }
            })
            .collect();

        let total_listing_value = vendors
            .iter()
            .fold(0i64, |acc, line| acc.saturating_add(line.listing_value.amount));
        let total_estimated_vat = vendors
            .iter()
            .fold(0i64, |acc, line| acc.saturating_add(line.estimated_vat.amount));

        Ok(TaxReport {
            currency: "VND".to_string(),
            vat_rate_percent: VAT_RATE_PERCENT,
            vendors,
            total_listing_value: Money::vnd(total_listing_value),
            total_estimated_vat: Money::vnd(total_estimated_vat),
            generated_at: Utc::now(),
        })
    }
}
