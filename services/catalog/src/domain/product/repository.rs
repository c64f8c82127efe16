//! 商品仓储接口

use async_trait::async_trait;
use vnm_common::{Pagination, ProductId, VendorId};
use vnm_errors::AppResult;

use super::{Product, ProductStatus};

/// 列表过滤条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub status: Option<ProductStatus>,
    pub vendor_id: Option<VendorId>,
}

/// 商品仓储接口
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 分配新 ID
    async fn next_id(&self) -> AppResult<ProductId>;

    async fn find_by_id(&self, id: ProductId) -> AppResult<Option<Product>>;

    /// 同一卖家下 slug 是否已被占用
    async fn slug_exists(&self, vendor_id: VendorId, slug: &str) -> AppResult<bool>;

    /// 插入或覆盖（last-write-wins）
    async fn save(&self, product: &Product) -> AppResult<()>;

    /// 按 ID 升序分页
    async fn list(
        &self,
        filter: &ProductFilter,
        pagination: &Pagination,
    ) -> AppResult<(Vec<Product>, u64)>;

    /// 不分页，供报表使用
    async fn find_all(&self, filter: &ProductFilter) -> AppResult<Vec<Product>>;
}
