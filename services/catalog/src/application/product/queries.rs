//! 商品查询定义

use vnm_common::{PagedResult, Pagination, ProductId, VendorId};
use vnm_cqrs_core::{CacheableQuery, Query, Request};

use super::dto::{ProductResponse, ProductSummary, TaxReport};

/// 单个商品；非 Active 商品只对所属卖家和管理员可见
#[derive(Debug, Clone)]
pub struct GetProductQuery {
    pub product_id: ProductId,
}

impl Request for GetProductQuery {
    const NAME: &'static str = "GetProduct";
    type Response = ProductResponse;
}

impl Query for GetProductQuery {}

/// 在架商品列表（公开，可缓存）
#[derive(Debug, Clone, Default)]
pub struct ListActiveProductsQuery {
    pub vendor_id: Option<VendorId>,
    pub pagination: Pagination,
}

impl Request for ListActiveProductsQuery {
    const NAME: &'static str = "ListActiveProducts";
    type Response = PagedResult<ProductSummary>;
}

impl Query for ListActiveProductsQuery {}

impl CacheableQuery for ListActiveProductsQuery {
    fn cache_key(&self) -> String {
        let vendor = self
            .vendor_id
            .map(|v| v.to_string())
            .unwrap_or_else(|| "all".to_string());
        format!(
            "vendor={}:page={}:size={}",
            vendor, self.pagination.page, self.pagination.page_size
        )
    }
}

/// 税务报表
#[derive(Debug, Clone, Default)]
pub struct GetTaxReportQuery;

impl Request for GetTaxReportQuery {
    const NAME: &'static str = "GetTaxReport";
    type Response = TaxReport;
}

impl Query for GetTaxReportQuery {}

