use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::ProductResult;
use crate::models::{Product, ProductStatus, UpdateProduct};
use crate::query::ProductQuery;
use crate::stats::CategoryStatRow;

/// Storage for products.
///
/// Images reaching the repository have already passed the image policy.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Matching products in the query's order, paged by its offset/limit
    async fn find(&self, query: &ProductQuery) -> ProductResult<Vec<Product>>;

    async fn find_by_id(&self, id: &str) -> ProductResult<Option<Product>>;

    async fn insert(&self, product: &Product) -> ProductResult<()>;

    /// Applies the present fields and sets `updated_at`. `None` if no
    /// product has this id.
    async fn update(
        &self,
        id: &str,
        update: &UpdateProduct,
        updated_at: DateTime<Utc>,
    ) -> ProductResult<Option<Product>>;

    /// `false` if no product has this id
    async fn delete(&self, id: &str) -> ProductResult<bool>;

    /// Counts all products, or only those with `status`
    async fn count(&self, status: Option<ProductStatus>) -> ProductResult<u64>;

    /// Distinct category labels, sorted
    async fn categories(&self) -> ProductResult<Vec<String>>;

    /// Per-category figures over active products
    async fn category_stats(&self) -> ProductResult<Vec<CategoryStatRow>>;

    async fn exists_by_name(&self, name: &str) -> ProductResult<bool>;
}
