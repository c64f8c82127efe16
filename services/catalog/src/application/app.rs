//! 应用装配
//!
//! 每类请求一条显式管道：日志 → 授权 → 校验 → 缓存（仅可缓存查询）→ handler

use std::sync::Arc;
use std::time::Duration;

use vnm_config::AppConfig;
use vnm_cqrs_core::{
    CachingBehavior, LoggingBehavior, Pipeline, PipelineProvider, Request, RequestContext,
    RequestHandler, ValidationBehavior,
};
use vnm_errors::AppResult;
use vnm_ports::{CachePort, EventPublisher};

use super::access::{
    AccessService, AssignUserRolesCommand, AssignUserRolesHandler, GetUserAccessHandler,
    GetUserAccessQuery, validate_assign_user_roles,
};
use super::authorization::AuthorizationBehavior;
use super::product::{
    ApproveProductCommand, ApproveProductHandler, BulkUpdateProductsCommand,
    BulkUpdateProductsHandler, BulkUpdateValidator, ChangeProductStatusCommand,
    ChangeProductStatusHandler, CreateProductCommand, CreateProductHandler, CreateProductValidator,
    GetProductHandler, GetProductQuery, GetTaxReportHandler, GetTaxReportQuery,
    ListActiveProductsHandler, ListActiveProductsQuery, ProductLifecycle, StartReviewCommand,
    StartReviewHandler, SubmitProductCommand, SubmitProductHandler, validate_approval,
    validate_listing,
};
use crate::domain::access::{Permission, Role, UserRoleRepository};
use crate::domain::authorization::{
    ApprovalOperation, AuthorizationEngine, Requirement, RequirementRegistry, ResourceType,
};
use crate::domain::product::{ProductRepository, VendorNotifier};

/// 运行参数
#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub cache_ttl: Duration,
    pub region: String,
    pub default_currency: String,
    pub supported_currencies: Vec<String>,
    pub enforce_region_claims: bool,
    pub max_batch_size: usize,
    pub event_topic: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(60),
            region: "VN".to_string(),
            default_currency: "VND".to_string(),
            supported_currencies: vec!["VND".to_string(), "USD".to_string()],
            enforce_region_claims: false,
            max_batch_size: 500,
            event_topic: "catalog.events".to_string(),
        }
    }
}

impl CatalogSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        let event_topic = config
            .redis
            .as_ref()
            .map(|r| r.event_channel.clone())
            .unwrap_or_else(|| "catalog.events".to_string());

        Self {
            cache_ttl: Duration::from_secs(config.cache.ttl_secs),
            region: config.marketplace.region.clone(),
            default_currency: config.marketplace.default_currency.clone(),
            supported_currencies: config.marketplace.supported_currencies.clone(),
            enforce_region_claims: config.marketplace.enforce_region_claims,
            max_batch_size: config.bulk.max_batch_size,
            event_topic,
        }
    }
}

/// 外部协作方
#[derive(Clone)]
pub struct CatalogDeps {
    pub products: Arc<dyn ProductRepository>,
    pub user_roles: Arc<dyn UserRoleRepository>,
    pub cache: Arc<dyn CachePort>,
    pub publisher: Arc<dyn EventPublisher>,
    pub notifier: Arc<dyn VendorNotifier>,
}

/// 请求 → 授权要求
pub fn requirement_registry(settings: &CatalogSettings) -> RequirementRegistry {
    let mut create_product = vec![
        Requirement::any_permission([Permission::CreateProducts]),
        Requirement::vendor_ownership(ResourceType::Product),
    ];
    if settings.enforce_region_claims {
        create_product.push(Requirement::marketplace(
            settings.region.clone(),
            settings.default_currency.clone(),
        ));
    }

    RequirementRegistry::new()
        .register::<CreateProductCommand>(create_product)
        .register::<SubmitProductCommand>(vec![Requirement::vendor_ownership(
            ResourceType::Product,
        )])
        .register::<StartReviewCommand>(vec![Requirement::all_roles([Role::Admin])])
        .register::<ApproveProductCommand>(vec![Requirement::approval(
            ApprovalOperation::ProductApproval,
        )])
        .register::<ChangeProductStatusCommand>(vec![Requirement::any_role([
            Role::Admin,
            Role::VendorStaff,
        ])])
        .register::<BulkUpdateProductsCommand>(vec![Requirement::all_roles([Role::Admin])])
        .register::<GetTaxReportQuery>(vec![Requirement::tax_compliance("tax.report")])
        .register::<AssignUserRolesCommand>(vec![Requirement::any_permission([
            Permission::ManageRoles,
        ])])
        .register::<GetUserAccessQuery>(vec![Requirement::authenticated()])
        .public::<GetProductQuery>()
        .public::<ListActiveProductsQuery>()
}

pub struct CatalogApp {
    create_product: Pipeline<CreateProductCommand>,
    submit_product: Pipeline<SubmitProductCommand>,
    start_review: Pipeline<StartReviewCommand>,
    approve_product: Pipeline<ApproveProductCommand>,
    change_status: Pipeline<ChangeProductStatusCommand>,
    bulk_update: Pipeline<BulkUpdateProductsCommand>,
    get_product: Pipeline<GetProductQuery>,
    list_active: Pipeline<ListActiveProductsQuery>,
    tax_report: Pipeline<GetTaxReportQuery>,
    assign_roles: Pipeline<AssignUserRolesCommand>,
    user_access: Pipeline<GetUserAccessQuery>,
    registry: Arc<RequirementRegistry>,
}

struct Builder {
    engine: AuthorizationEngine,
    registry: Arc<RequirementRegistry>,
}

impl Builder {
    /// 日志与授权，所有管道共有
    fn guarded<R, H>(&self, handler: H) -> Pipeline<R>
    where
        R: Request,
        H: RequestHandler<R> + 'static,
    {
        Pipeline::new(Arc::new(handler))
            .with_behavior(Arc::new(LoggingBehavior))
            .with_behavior(Arc::new(AuthorizationBehavior::new(
                self.engine,
                self.registry.clone(),
            )))
    }
}

impl CatalogApp {
    pub fn new(deps: CatalogDeps, settings: CatalogSettings) -> Self {
        let engine = AuthorizationEngine::new();
        let registry = Arc::new(requirement_registry(&settings));
        let builder = Builder {
            engine,
            registry: registry.clone(),
        };

        let lifecycle = Arc::new(
            ProductLifecycle::new(
                deps.products,
                engine,
                deps.notifier,
                deps.publisher,
                settings.event_topic.clone(),
            )
            .with_listing_cache(deps.cache.clone()),
        );
        let access = Arc::new(AccessService::new(deps.user_roles));

        Self {
            create_product: builder
                .guarded(CreateProductHandler::new(lifecycle.clone()))
                .with_behavior(Arc::new(
                    ValidationBehavior::<CreateProductCommand>::new().with(Arc::new(
                        CreateProductValidator::new(&settings.supported_currencies),
                    )),
                )),
            submit_product: builder.guarded(SubmitProductHandler::new(lifecycle.clone())),
            start_review: builder.guarded(StartReviewHandler::new(lifecycle.clone())),
            approve_product: builder
                .guarded(ApproveProductHandler::new(lifecycle.clone()))
                .with_behavior(Arc::new(
                    ValidationBehavior::<ApproveProductCommand>::new()
                        .with(Arc::new(validate_approval)),
                )),
            change_status: builder.guarded(ChangeProductStatusHandler::new(lifecycle.clone())),
            bulk_update: builder
                .guarded(BulkUpdateProductsHandler::new(lifecycle.clone()))
                .with_behavior(Arc::new(
                    ValidationBehavior::<BulkUpdateProductsCommand>::new().with(Arc::new(
                        BulkUpdateValidator::new(settings.max_batch_size),
                    )),
                )),
            get_product: builder.guarded(GetProductHandler::new(lifecycle.clone())),
            list_active: builder
                .guarded(ListActiveProductsHandler::new(lifecycle.clone()))
                .with_behavior(Arc::new(
                    ValidationBehavior::<ListActiveProductsQuery>::new()
                        .with(Arc::new(validate_listing)),
                ))
                .with_behavior(Arc::new(CachingBehavior::new(
                    deps.cache,
                    settings.cache_ttl,
                ))),
            tax_report: builder.guarded(GetTaxReportHandler::new(lifecycle)),
            assign_roles: builder
                .guarded(AssignUserRolesHandler::new(access.clone()))
                .with_behavior(Arc::new(
                    ValidationBehavior::<AssignUserRolesCommand>::new()
                        .with(Arc::new(validate_assign_user_roles)),
                )),
            user_access: builder.guarded(GetUserAccessHandler::new(access, engine)),
            registry,
        }
    }

    /// 调度请求到对应管道
    pub async fn send<R>(&self, request: R, ctx: &RequestContext) -> AppResult<R::Response>
    where
        R: Request,
        Self: PipelineProvider<R>,
    {
        vnm_cqrs_core::send(self, request, ctx).await
    }

    pub fn registry(&self) -> &RequirementRegistry {
        &self.registry
    }
}

macro_rules! provide_pipelines {
    ($($request:ty => $field:ident),* $(,)?) => {
        $(
            impl PipelineProvider<$request> for CatalogApp {
                fn pipeline(&self) -> &Pipeline<$request> {
                    &self.$field
                }
            }
        )*
    };
}

provide_pipelines! {
    CreateProductCommand => create_product,
    SubmitProductCommand => submit_product,
    StartReviewCommand => start_review,
    ApproveProductCommand => approve_product,
    ChangeProductStatusCommand => change_status,
    BulkUpdateProductsCommand => bulk_update,
    GetProductQuery => get_product,
    ListActiveProductsQuery => list_active,
    GetTaxReportQuery => tax_report,
    AssignUserRolesCommand => assign_roles,
    GetUserAccessQuery => user_access,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_request_is_registered() {
        let registry = requirement_registry(&CatalogSettings::default());

        assert_eq!(registry.len(), 11);
        assert!(registry.contains::<CreateProductCommand>());
        assert!(registry.contains::<BulkUpdateProductsCommand>());
        assert!(registry.contains::<GetUserAccessQuery>());
        assert!(registry.requirements_for::<ListActiveProductsQuery>().unwrap().is_empty());
        assert!(registry.requirements_for::<GetProductQuery>().unwrap().is_empty());
    }

    #[test]
    fn test_region_claims_enforced_on_create_when_enabled() {
        let settings = CatalogSettings {
            enforce_region_claims: true,
            ..CatalogSettings::default()
        };
        let registry = requirement_registry(&settings);
        let requirements = registry.requirements_for::<CreateProductCommand>().unwrap();

        assert_eq!(requirements.len(), 3);
        assert_eq!(requirements[2], Requirement::marketplace("VN", "VND"));
    }
}
