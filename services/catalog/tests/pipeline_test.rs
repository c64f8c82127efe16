//! 管道行为顺序与横切关注点

mod common;

use catalog::application::access::{AssignUserRolesCommand, GetUserAccessQuery};
use catalog::application::product::{
    ApproveProductCommand, BulkUpdateProductsCommand, ChangeProductStatusCommand,
    GetTaxReportQuery, ListActiveProductsQuery,
};
use catalog::application::{CatalogSettings, requirement_registry};
use catalog::domain::access::{Permission, Role};
use catalog::domain::product::{ProductRepository, ProductStatus};
use catalog::infrastructure::persistence::InMemoryUserRoleRepository;
use common::*;
use tokio_util::sync::CancellationToken;
use vnm_auth_core::{Principal, claim_types};
use vnm_common::{Pagination, ProductId, UserId};
use vnm_cqrs_core::RequestContext;
use vnm_domain_core::{Currency, Money};

#[tokio::test]
async fn test_authorization_runs_before_validation() {
    let catalog = TestCatalog::new();
    let mut invalid = create_command(101, "", false);
    invalid.prices.clear();

    let err = catalog
        .app
        .send(invalid.clone(), &RequestContext::anonymous())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 401);
    assert!(err.field_errors().is_empty());

    let err = catalog.app.send(invalid, &customer()).await.unwrap_err();
    assert_eq!(err.status_code(), 403);
}

#[tokio::test]
async fn test_validation_reports_every_field() {
    let catalog = TestCatalog::new();
    let mut cmd = create_command(101, "  ", false);
    cmd.prices = vec![Money::new(-1, Currency::new("EUR"))];

    let err = catalog.app.send(cmd, &vendor(101)).await.unwrap_err();

    assert_eq!(err.status_code(), 400);
    let fields: Vec<_> = err.field_errors().iter().map(|e| e.field.as_str()).collect();
    assert_eq!(
        fields,
        ["name", "prices", "prices[0].currency", "prices[0].amount"]
    );

    let problem = err.to_problem_details();
    assert_eq!(problem.status, 400);
    assert!(catalog.products.is_empty().await);
}

#[tokio::test]
async fn test_duplicate_slug_per_vendor() {
    let catalog = TestCatalog::new();
    catalog.create(101, "Cà phê Buôn Ma Thuột", false).await;

    let err = catalog
        .app
        .send(create_command(101, "Cà Phê Buôn Ma Thuột", false), &vendor(101))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 409);

    let other = catalog.create(202, "Cà phê Buôn Ma Thuột", false).await;
    assert_eq!(other.slug, "ca-phe-buon-ma-thuot");
}

#[tokio::test]
async fn test_vendor_cannot_create_for_another_vendor() {
    let catalog = TestCatalog::new();
    let err = catalog
        .app
        .send(create_command(202, "Bánh pía", false), &vendor(101))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);
}

#[tokio::test]
async fn test_region_claims_enforced_when_enabled() {
    let settings = CatalogSettings {
        enforce_region_claims: true,
        ..CatalogSettings::default()
    };
    let catalog = TestCatalog::with(RecordingNotifier::default(), settings);

    let err = catalog
        .app
        .send(create_command(101, "Nón lá", false), &vendor(101))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    let regional = RequestContext::new(
        vendor_principal(101)
            .with_claim(claim_types::MARKETPLACE_REGION, "vn")
            .with_claim(claim_types::SUPPORTED_CURRENCIES, "VND,USD"),
    );
    let product = catalog
        .app
        .send(create_command(101, "Nón lá", false), &regional)
        .await
        .unwrap();
    assert_eq!(product.status_code, 0);
}

fn approve(product_id: ProductId) -> ApproveProductCommand {
    ApproveProductCommand {
        product_id,
        is_approved: true,
        admin_notes: None,
        rejection_reason: None,
        admin_id: None,
    }
}

async fn active_total(catalog: &TestCatalog) -> u64 {
    catalog
        .app
        .send(ListActiveProductsQuery::default(), &RequestContext::anonymous())
        .await
        .unwrap()
        .total
}

#[tokio::test]
async fn test_listing_is_served_from_cache() {
    let catalog = TestCatalog::new();
    let first = catalog.create(101, "Bưởi Năm Roi", true).await;
    catalog.app.send(approve(first.id), &admin()).await.unwrap();

    let page = catalog
        .app
        .send(ListActiveProductsQuery::default(), &RequestContext::anonymous())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].price_vnd, 250_000);

    // 绕过应用服务直接改存储：缓存不会察觉
    let second = catalog.create(101, "Xoài cát Hòa Lộc", true).await;
    let mut stored = catalog.products.find_by_id(second.id).await.unwrap().unwrap();
    stored.transition_to(ProductStatus::UnderReview, UserId(1)).unwrap();
    stored.transition_to(ProductStatus::Active, UserId(1)).unwrap();
    catalog.products.save(&stored).await.unwrap();
    assert_eq!(active_total(&catalog).await, 1);

    let other_page = catalog
        .app
        .send(
            ListActiveProductsQuery {
                vendor_id: None,
                pagination: Pagination::new(1, 50),
            },
            &RequestContext::anonymous(),
        )
        .await
        .unwrap();
    assert_eq!(other_page.total, 2);
}

#[tokio::test]
async fn test_status_change_invalidates_listing_cache() {
    let catalog = TestCatalog::new();
    let first = catalog.create(101, "Bưởi Năm Roi", true).await;
    let second = catalog.create(101, "Xoài cát Hòa Lộc", true).await;
    catalog.app.send(approve(first.id), &admin()).await.unwrap();
    assert_eq!(active_total(&catalog).await, 1);

    catalog.app.send(approve(second.id), &admin()).await.unwrap();
    assert_eq!(active_total(&catalog).await, 2);

    catalog
        .app
        .send(
            ChangeProductStatusCommand {
                product_id: first.id,
                new_status: ProductStatus::Inactive,
            },
            &vendor(101),
        )
        .await
        .unwrap();
    assert_eq!(active_total(&catalog).await, 1);

    catalog
        .app
        .send(
            BulkUpdateProductsCommand {
                product_ids: vec![second.id],
                new_status: ProductStatus::Discontinued,
                admin_notes: None,
                admin_id: None,
                notify_vendors: false,
            },
            &admin(),
        )
        .await
        .unwrap();
    assert_eq!(active_total(&catalog).await, 0);
}

#[tokio::test]
async fn test_invalid_listing_rejected_before_cache() {
    let catalog = TestCatalog::new();
    let err = catalog
        .app
        .send(
            ListActiveProductsQuery {
                vendor_id: None,
                pagination: Pagination::new(1, 1_000),
            },
            &RequestContext::anonymous(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert_eq!(err.field_errors()[0].field, "pageSize");
}

#[tokio::test]
async fn test_listing_far_past_last_page_is_empty() {
    let catalog = TestCatalog::new();
    let page = catalog
        .app
        .send(
            ListActiveProductsQuery {
                vendor_id: None,
                pagination: Pagination::new(u32::MAX, Pagination::MAX_PAGE_SIZE),
            },
            &RequestContext::anonymous(),
        )
        .await
        .unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.page, u32::MAX);
}

#[tokio::test]
async fn test_cancelled_request_returns_499() {
    let catalog = TestCatalog::new();
    let token = CancellationToken::new();
    token.cancel();
    let ctx = admin().with_cancellation(token);

    let err = catalog
        .app
        .send(ListActiveProductsQuery::default(), &ctx)
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(err.status_code(), 499);
}

#[tokio::test]
async fn test_tax_report_requires_tax_claim() {
    let catalog = TestCatalog::new();

    let accountant = RequestContext::new(
        Principal::authenticated(UserId(40))
            .with_role("Accountant")
            .with_claim(claim_types::PERMISSION, "tax.report.read"),
    );
    let report = catalog.app.send(GetTaxReportQuery, &accountant).await.unwrap();
    assert_eq!(report.currency, "VND");
    assert!(report.vendors.is_empty());

    let err = catalog
        .app
        .send(GetTaxReportQuery, &admin_without_claims())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);
}

#[tokio::test]
async fn test_assign_roles_and_read_access() {
    let user_roles = InMemoryUserRoleRepository::new().with_roles(UserId(7), ["Customer"]);
    let catalog = TestCatalog::with_user_roles(
        RecordingNotifier::default(),
        CatalogSettings::default(),
        user_roles,
    );

    let access = catalog
        .app
        .send(
            AssignUserRolesCommand {
                user_id: UserId(7),
                roles: vec!["vendor".to_string(), "Customer".to_string()],
            },
            &admin(),
        )
        .await
        .unwrap();
    assert_eq!(access.roles, [Role::VendorStaff, Role::Customer]);
    assert_eq!(access.primary_role, Some(Role::VendorStaff));
    assert!(access.permissions.contains(&Permission::CreateProducts));
    assert!(access.permissions.contains(&Permission::PlaceOrders));

    let own = RequestContext::new(Principal::authenticated(UserId(7)).with_role("Customer"));
    let read = catalog
        .app
        .send(GetUserAccessQuery { user_id: UserId(7) }, &own)
        .await
        .unwrap();
    assert_eq!(read, access);

    let err = catalog
        .app
        .send(GetUserAccessQuery { user_id: UserId(1) }, &own)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);
}

#[tokio::test]
async fn test_assign_roles_rejects_unknown_codes() {
    let catalog = TestCatalog::new();

    let err = catalog
        .app
        .send(
            AssignUserRolesCommand {
                user_id: UserId(7),
                roles: vec!["Admin".to_string(), "wizard".to_string()],
            },
            &admin(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert_eq!(err.field_errors()[0].field, "roles[1]");

    let err = catalog
        .app
        .send(
            AssignUserRolesCommand {
                user_id: UserId(7),
                roles: vec!["Admin".to_string()],
            },
            &vendor(101),
        )
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);
}

#[test]
fn test_every_request_has_requirements() {
    let registry = requirement_registry(&CatalogSettings::default());
    assert_eq!(registry.len(), 11);
    assert!(registry.contains::<ApproveProductCommand>());
    assert!(registry.contains::<AssignUserRolesCommand>());
}
