//! 商品生命周期应用服务
//!
//! 单个与批量状态迁移共用的步骤：授权、迁移、保存、发布事件、通知卖家

use std::sync::Arc;

use chrono::Utc;
use vnm_auth_core::Principal;
use vnm_common::{ProductId, UserId};
use vnm_cqrs_core::{CachingBehavior, RequestContext};
use vnm_errors::{AppError, AppResult};
use vnm_event_core::{EventEnvelope, EventMetadata};
use vnm_ports::{CachePort, EventPublisher, publish_json};

use crate::domain::authorization::{ApprovalOperation, AuthorizationEngine, Requirement};
use crate::domain::product::{
    ApprovalDecision, Product, ProductEvent, ProductRepository, ProductStatus, VendorNotification,
    VendorNotifier, lifecycle,
};
use super::queries::ListActiveProductsQuery;
use crate::error::ProductError;

/// 审核输入
#[derive(Debug, Clone, Default)]
pub struct ReviewInput {
    pub is_approved: bool,
    pub admin_notes: Option<String>,
    pub rejection_reason: Option<String>,
}

pub struct ProductLifecycle {
    products: Arc<dyn ProductRepository>,
    engine: AuthorizationEngine,
    notifier: Arc<dyn VendorNotifier>,
    publisher: Arc<dyn EventPublisher>,
    topic: String,
    listing_cache: Option<Arc<dyn CachePort>>,
}

impl ProductLifecycle {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        engine: AuthorizationEngine,
        notifier: Arc<dyn VendorNotifier>,
        publisher: Arc<dyn EventPublisher>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            products,
            engine,
            notifier,
            publisher,
            topic: topic.into(),
            listing_cache: None,
        }
    }

    /// 状态变化后清空在架列表缓存
    pub fn with_listing_cache(mut self, cache: Arc<dyn CachePort>) -> Self {
        self.listing_cache = Some(cache);
        self
    }

    pub fn products(&self) -> &Arc<dyn ProductRepository> {
        &self.products
    }

    pub fn engine(&self) -> &AuthorizationEngine {
        &self.engine
    }

    pub async fn load(&self, id: ProductId) -> AppResult<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| ProductError::NotFound(id).into())
    }

    /// 单步迁移：查表、按规则授权、保存
    pub async fn change_status(
        &self,
        product: &mut Product,
        to: ProductStatus,
        ctx: &RequestContext,
    ) -> AppResult<ProductStatus> {
        let actor = actor(&ctx.principal)?;
        let rule = lifecycle::transition(product.status(), to)?;
        self.engine
            .evaluate(&ctx.principal, &rule.authority.requirement(product.vendor_id()))
            .into_result()?;

        let from = product.transition_to(to, actor)?;
        self.products.save(product).await?;
        record_transition(product.id(), from, to);
        self.invalidate_listing().await;

        self.publish(
            ProductEvent::StatusChanged {
                product_id: product.id(),
                vendor_id: product.vendor_id(),
                from,
                to,
                by: actor,
            },
            ctx,
        )
        .await;
        Ok(from)
    }

    /// 审核决定；仍在 Pending 的商品先接手进入 UnderReview
    pub async fn review(
        &self,
        product: &mut Product,
        input: ReviewInput,
        ctx: &RequestContext,
    ) -> AppResult<ProductStatus> {
        let admin_id = actor(&ctx.principal)?;
        self.engine
            .evaluate(
                &ctx.principal,
                &Requirement::approval(ApprovalOperation::ProductApproval),
            )
            .into_result()?;

        if product.status() == ProductStatus::Pending {
            self.change_status(product, ProductStatus::UnderReview, ctx)
                .await?;
        }

        if !input.is_approved && input.rejection_reason.is_none() {
            tracing::warn!(product_id = %product.id(), "Product rejected without a reason");
        }

        let decision = ApprovalDecision {
            product_id: product.id(),
            is_approved: input.is_approved,
            admin_notes: input.admin_notes,
            rejection_reason: input.rejection_reason,
            admin_id,
            decided_at: Utc::now(),
        };
        let to = decision.target_status();
        let rejection_reason = decision.rejection_reason.clone();

        let from = product.record_decision(decision)?;
        self.products.save(product).await?;
        record_transition(product.id(), from, to);
        self.invalidate_listing().await;

        tracing::info!(
            product_id = %product.id(),
            vendor_id = %product.vendor_id(),
            approved = input.is_approved,
            by = %admin_id,
            "Product reviewed"
        );

        self.publish(
            ProductEvent::Reviewed {
                product_id: product.id(),
                vendor_id: product.vendor_id(),
                approved: input.is_approved,
                rejection_reason,
                by: admin_id,
            },
            ctx,
        )
        .await;
        Ok(from)
    }

    /// 迁移到目标状态；待审核商品的上架/驳回走审核流程
    ///
    /// `notes` 同时作为审核备注，驳回时也作为驳回原因
    pub async fn move_to(
        &self,
        product: &mut Product,
        to: ProductStatus,
        notes: Option<String>,
        ctx: &RequestContext,
    ) -> AppResult<ProductStatus> {
        let in_review = matches!(
            product.status(),
            ProductStatus::Pending | ProductStatus::UnderReview
        );
        let is_decision = matches!(to, ProductStatus::Active | ProductStatus::Rejected);

        if in_review && is_decision {
            let is_approved = to == ProductStatus::Active;
            let input = ReviewInput {
                is_approved,
                rejection_reason: if is_approved { None } else { notes.clone() },
                admin_notes: notes,
            };
            self.review(product, input, ctx).await
        } else {
            self.change_status(product, to, ctx).await
        }
    }

    /// 失效失败只记录日志；列表最迟在 TTL 到期后恢复
    async fn invalidate_listing(&self) {
        let Some(cache) = &self.listing_cache else {
            return;
        };
        let prefix = CachingBehavior::key_prefix::<ListActiveProductsQuery>();
        match cache.delete_prefix(&prefix).await {
            Ok(removed) => tracing::debug!(prefix = %prefix, removed, "Listing cache invalidated"),
            Err(e) => tracing::warn!(prefix = %prefix, error = %e, "Listing cache invalidation failed"),
        }
    }

    /// 通知卖家；失败只记录日志，状态不回滚
    pub async fn notify_vendor(&self, product: &Product, message: Option<String>) {
        let notification = VendorNotification {
            vendor_id: product.vendor_id(),
            product_id: product.id(),
            product_name: product.name().to_string(),
            status: product.status(),
            message,
        };
        if let Err(e) = self.notifier.notify(notification).await {
            tracing::warn!(
                product_id = %product.id(),
                vendor_id = %product.vendor_id(),
                error = %e,
                "Vendor notification failed"
            );
        }
    }

    /// 发布领域事件；发布失败不影响已保存的状态
    pub async fn publish(&self, event: ProductEvent, ctx: &RequestContext) {
        let mut metadata = EventMetadata::new().with_correlation(ctx.request_id.to_string());
        if let Some(user_id) = ctx.principal.user_id() {
            metadata = metadata.with_user(user_id.to_string());
        }
        let envelope = EventEnvelope::new(event, metadata);

        if let Err(e) = publish_json(self.publisher.as_ref(), &self.topic, &envelope).await {
            tracing::warn!(
                event_type = %envelope.event_type,
                aggregate_id = %envelope.aggregate_id,
                error = %e,
                "Failed to publish product event"
            );
        }
    }
}

/// 执行者必须是已认证用户
pub fn actor(principal: &Principal) -> AppResult<UserId> {
    principal
        .user_id()
        .ok_or_else(|| AppError::unauthenticated("Authentication required"))
}

fn record_transition(product_id: ProductId, from: ProductStatus, to: ProductStatus) {
    tracing::info!(product_id = %product_id, from = %from, to = %to, "Product status changed");
    metrics::counter!(
        "product_status_transitions_total",
        "from" => from.as_str(),
        "to" => to.as_str()
    )
    .increment(1);
}
