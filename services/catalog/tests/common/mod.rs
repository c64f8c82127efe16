//! 集成测试公共装配
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use catalog::application::product::{CreateProductCommand, ProductResponse};
use catalog::application::{CatalogApp, CatalogDeps, CatalogSettings};
use catalog::domain::product::{VendorNotification, VendorNotifier};
use catalog::infrastructure::cache::LocalCache;
use catalog::infrastructure::events::InMemoryEventBus;
use catalog::infrastructure::persistence::{InMemoryProductRepository, InMemoryUserRoleRepository};
use tokio::sync::Mutex;
use vnm_auth_core::{Principal, claim_types};
use vnm_common::{UserId, VendorId};
use vnm_cqrs_core::RequestContext;
use vnm_domain_core::Money;
use vnm_errors::{AppError, AppResult};

pub const EVENT_TOPIC: &str = "catalog.events";

/// 记录所有通知，可配置为总是失败
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<VendorNotification>>,
    pub attempts: AtomicUsize,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VendorNotifier for RecordingNotifier {
    async fn notify(&self, notification: VendorNotification) -> AppResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::external_service("notification gateway unavailable"));
        }
        self.sent.lock().await.push(notification);
        Ok(())
    }
}

pub struct TestCatalog {
    pub app: CatalogApp,
    pub products: Arc<InMemoryProductRepository>,
    pub events: Arc<InMemoryEventBus>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestCatalog {
    pub fn new() -> Self {
        Self::with(RecordingNotifier::default(), CatalogSettings::default())
    }

    pub fn with(notifier: RecordingNotifier, settings: CatalogSettings) -> Self {
        Self::with_user_roles(notifier, settings, InMemoryUserRoleRepository::new())
    }

    pub fn with_user_roles(
        notifier: RecordingNotifier,
        settings: CatalogSettings,
        user_roles: InMemoryUserRoleRepository,
    ) -> Self {
        let products = Arc::new(InMemoryProductRepository::new());
        let events = Arc::new(InMemoryEventBus::new());
        let notifier = Arc::new(notifier);
        let deps = CatalogDeps {
            products: products.clone(),
            user_roles: Arc::new(user_roles),
            cache: Arc::new(LocalCache::new(1_000)),
            publisher: events.clone(),
            notifier: notifier.clone(),
        };
        Self {
            app: CatalogApp::new(deps, settings),
            products,
            events,
            notifier,
        }
    }

    /// 卖家创建商品，返回快照
    pub async fn create(&self, vendor_id: i64, name: &str, submit: bool) -> ProductResponse {
        self.app
            .send(create_command(vendor_id, name, submit), &vendor(vendor_id))
            .await
            .expect("product should be created")
    }
}

pub fn create_command(vendor_id: i64, name: &str, submit: bool) -> CreateProductCommand {
    CreateProductCommand {
        vendor_id: VendorId(vendor_id),
        name: name.to_string(),
        slug: None,
        prices: vec![Money::vnd(250_000)],
        variants: vec![],
        contents: vec![],
        submit_for_review: submit,
    }
}

pub fn admin() -> RequestContext {
    RequestContext::new(admin_principal())
}

pub fn admin_principal() -> Principal {
    Principal::authenticated(UserId(1))
        .with_role("Admin")
        .with_claim(claim_types::PERMISSION, "product.approve")
        .with_claim(claim_types::PERMISSION, "tax.report")
}

/// 管理员但没有审批 claim
pub fn admin_without_claims() -> RequestContext {
    RequestContext::new(Principal::authenticated(UserId(2)).with_role("Admin"))
}

pub fn vendor(vendor_id: i64) -> RequestContext {
    RequestContext::new(vendor_principal(vendor_id))
}

pub fn vendor_principal(vendor_id: i64) -> Principal {
    Principal::authenticated(UserId(100 + vendor_id))
        .with_role("Vendor")
        .with_claim(claim_types::VENDOR_ID, vendor_id.to_string())
}

pub fn customer() -> RequestContext {
    RequestContext::new(Principal::authenticated(UserId(500)).with_role("Customer"))
}
