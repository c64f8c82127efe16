//! 内存商品仓储

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use vnm_common::{Pagination, ProductId, VendorId};
use vnm_errors::AppResult;

use crate::domain::product::{Product, ProductFilter, ProductRepository};

/// 以 ID 排序存放；保存是 last-write-wins
pub struct InMemoryProductRepository {
    products: RwLock<BTreeMap<ProductId, Product>>,
    sequence: AtomicI64,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            products: RwLock::new(BTreeMap::new()),
            sequence: AtomicI64::new(0),
        }
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn matches(product: &Product, filter: &ProductFilter) -> bool {
    filter.status.is_none_or(|s| product.status() == s)
        && filter.vendor_id.is_none_or(|v| product.vendor_id() == v)
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn next_id(&self) -> AppResult<ProductId> {
        Ok(ProductId(self.sequence.fetch_add(1, Ordering::SeqCst) + 1))
    }

    async fn find_by_id(&self, id: ProductId) -> AppResult<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn slug_exists(&self, vendor_id: VendorId, slug: &str) -> AppResult<bool> {
        Ok(self
            .products
            .read()
            .await
            .values()
            .any(|p| p.vendor_id() == vendor_id && p.slug() == slug))
    }

    async fn save(&self, product: &Product) -> AppResult<()> {
        self.products
            .write()
            .await
            .insert(product.id(), product.clone());
        Ok(())
    }

    async fn list(
        &self,
        filter: &ProductFilter,
        pagination: &Pagination,
    ) -> AppResult<(Vec<Product>, u64)> {
        let products = self.products.read().await;
        let matching: Vec<&Product> = products.values().filter(|p| matches(p, filter)).collect();
        let total = matching.len() as u64;

        let page = matching
            .into_iter()
            .skip(usize::try_from(pagination.offset()).unwrap_or(usize::MAX))
            .take(pagination.page_size as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn find_all(&self, filter: &ProductFilter) -> AppResult<Vec<Product>> {
        Ok(self
            .products
            .read()
            .await
            .values()
            .filter(|p| matches(p, filter))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::{NewProduct, ProductStatus};
    use vnm_domain_core::Money;

    fn product(id: ProductId, vendor_id: i64, name: &str, submit: bool) -> Product {
        Product::new(
            id,
            NewProduct {
                vendor_id: VendorId(vendor_id),
                name: name.to_string(),
                slug: None,
                prices: vec![Money::vnd(10_000)],
                variants: vec![],
                contents: vec![],
                submit_for_review: submit,
                created_by: None,
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let repo = InMemoryProductRepository::new();
        assert_eq!(repo.next_id().await.unwrap(), ProductId(1));
        assert_eq!(repo.next_id().await.unwrap(), ProductId(2));
    }

    #[tokio::test]
    async fn test_slug_scoped_to_vendor() {
        let repo = InMemoryProductRepository::new();
        repo.save(&product(ProductId(1), 101, "Bánh pía", false))
            .await
            .unwrap();

        assert!(repo.slug_exists(VendorId(101), "banh-pia").await.unwrap());
        assert!(!repo.slug_exists(VendorId(202), "banh-pia").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_filters_and_pages() {
        let repo = InMemoryProductRepository::new();
        for i in 1..=5 {
            let vendor = if i % 2 == 0 { 202 } else { 101 };
            repo.save(&product(ProductId(i), vendor, &format!("Item {}", i), i == 5))
                .await
                .unwrap();
        }

        let filter = ProductFilter {
            status: Some(ProductStatus::Draft),
            vendor_id: Some(VendorId(101)),
        };
        let (page, total) = repo.list(&filter, &Pagination::new(1, 1)).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id(), ProductId(1));

        let (page, _) = repo.list(&filter, &Pagination::new(2, 1)).await.unwrap();
        assert_eq!(page[0].id(), ProductId(3));
    }
}
