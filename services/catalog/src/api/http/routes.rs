//! 路由与处理函数
//!
//! 只做 JSON ↔ 命令/查询的转换，业务规则全部在管道中

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use vnm_common::{PagedResult, Pagination, ProductId, UserId, VendorId};
use vnm_domain_core::Money;

use super::AppState;
use super::error::ApiResult;
use super::extract::{Caller, ValidJson};
use crate::application::access::{AssignUserRolesCommand, GetUserAccessQuery, UserAccess};
use crate::application::product::{
    ApproveProductCommand, BulkUpdateProductsCommand, BulkUpdateProductsResponse,
    ChangeProductStatusCommand, CreateProductCommand, GetProductQuery, GetTaxReportQuery,
    ListActiveProductsQuery, ProductResponse, ProductSummary, StartReviewCommand,
    SubmitProductCommand, TaxReport,
};
use crate::domain::product::{ProductContent, ProductStatus, ProductVariant};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/products", post(create_product).get(list_products))
        .route("/api/products/bulk-status", post(bulk_update_status))
        .route("/api/products/{id}", get(get_product))
        .route("/api/products/{id}/submit", post(submit_product))
        .route("/api/products/{id}/review", post(start_review))
        .route("/api/products/{id}/approval", post(approve_product))
        .route("/api/products/{id}/status", put(change_status))
        .route("/api/users/{id}/access", get(user_access))
        .route("/api/users/{id}/roles", put(assign_roles))
        .route("/api/reports/tax", get(tax_report))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub vendor_id: VendorId,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub prices: Vec<Money>,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    #[serde(default)]
    pub contents: Vec<ProductContent>,
    #[serde(default)]
    pub submit_for_review: bool,
}

async fn create_product(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    ValidJson(body): ValidJson<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<ProductResponse>)> {
    let cmd = CreateProductCommand {
        vendor_id: body.vendor_id,
        name: body.name,
        slug: body.slug,
        prices: body.prices,
        variants: body.variants,
        contents: body.contents,
        submit_for_review: body.submit_for_review,
    };
    let product = state.app.send(cmd, &ctx).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsParams {
    pub vendor_id: Option<VendorId>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

async fn list_products(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Query(params): Query<ListProductsParams>,
) -> ApiResult<Json<PagedResult<ProductSummary>>> {
    let defaults = Pagination::default();
    let query = ListActiveProductsQuery {
        vendor_id: params.vendor_id,
        pagination: Pagination::new(
            params.page.unwrap_or(defaults.page),
            params.page_size.unwrap_or(defaults.page_size),
        ),
    };
    Ok(Json(state.app.send(query, &ctx).await?))
}

async fn get_product(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<i64>,
) -> ApiResult<Json<ProductResponse>> {
    let query = GetProductQuery {
        product_id: ProductId(id),
    };
    Ok(Json(state.app.send(query, &ctx).await?))
}

async fn submit_product(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<i64>,
) -> ApiResult<Json<ProductResponse>> {
    let cmd = SubmitProductCommand {
        product_id: ProductId(id),
    };
    Ok(Json(state.app.send(cmd, &ctx).await?))
}

async fn start_review(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<i64>,
) -> ApiResult<Json<ProductResponse>> {
    let cmd = StartReviewCommand {
        product_id: ProductId(id),
    };
    Ok(Json(state.app.send(cmd, &ctx).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequest {
    pub is_approved: bool,
    #[serde(default)]
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub admin_id: Option<UserId>,
}

async fn approve_product(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<i64>,
    ValidJson(body): ValidJson<ApprovalRequest>,
) -> ApiResult<Json<ProductResponse>> {
    let cmd = ApproveProductCommand {
        product_id: ProductId(id),
        is_approved: body.is_approved,
        admin_notes: body.admin_notes,
        rejection_reason: body.rejection_reason,
        admin_id: body.admin_id,
    };
    Ok(Json(state.app.send(cmd, &ctx).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStatusRequest {
    pub new_status: ProductStatus,
}

async fn change_status(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<i64>,
    ValidJson(body): ValidJson<ChangeStatusRequest>,
) -> ApiResult<Json<ProductResponse>> {
    let cmd = ChangeProductStatusCommand {
        product_id: ProductId(id),
        new_status: body.new_status,
    };
    Ok(Json(state.app.send(cmd, &ctx).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkStatusRequest {
    pub product_ids: Vec<ProductId>,
    pub new_status: ProductStatus,
    #[serde(default)]
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub admin_id: Option<UserId>,
    #[serde(default)]
    pub notify_vendors: bool,
}

async fn bulk_update_status(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    ValidJson(body): ValidJson<BulkStatusRequest>,
) -> ApiResult<Json<BulkUpdateProductsResponse>> {
    let cmd = BulkUpdateProductsCommand {
        product_ids: body.product_ids,
        new_status: body.new_status,
        admin_notes: body.admin_notes,
        admin_id: body.admin_id,
        notify_vendors: body.notify_vendors,
    };
    Ok(Json(state.app.send(cmd, &ctx).await?))
}

async fn user_access(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserAccess>> {
    let query = GetUserAccessQuery { user_id: UserId(id) };
    Ok(Json(state.app.send(query, &ctx).await?))
}

#[derive(Debug, Deserialize)]
pub struct AssignRolesRequest {
    pub roles: Vec<String>,
}

async fn assign_roles(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<i64>,
    ValidJson(body): ValidJson<AssignRolesRequest>,
) -> ApiResult<Json<UserAccess>> {
    let cmd = AssignUserRolesCommand {
        user_id: UserId(id),
        roles: body.roles,
    };
    Ok(Json(state.app.send(cmd, &ctx).await?))
}

async fn tax_report(
    State(state): State<AppState>,
    Caller(ctx): Caller,
) -> ApiResult<Json<TaxReport>> {
    Ok(Json(state.app.send(GetTaxReportQuery, &ctx).await?))
}
