//! In-memory ProductRepository for tests and local runs without MongoDB.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::ProductResult;
use crate::models::{Product, ProductStatus, UpdateProduct};
use crate::query::ProductQuery;
use crate::repository::ProductRepository;
use crate::stats::{aggregate, CategoryStatRow};

/// Products kept in insertion order, which stands in for MongoDB's natural
/// order.
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<Vec<Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(RwLock::new(products)),
        }
    }

    pub async fn snapshot(&self) -> Vec<Product> {
        self.products.read().await.clone()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find(&self, query: &ProductQuery) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await.clone();
        Ok(query.apply(products))
    }

    async fn find_by_id(&self, id: &str) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, product: &Product) -> ProductResult<()> {
        self.products.write().await.push(product.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: &str,
        update: &UpdateProduct,
        updated_at: DateTime<Utc>,
    ) -> ProductResult<Option<Product>> {
        let mut products = self.products.write().await;
        Ok(products.iter_mut().find(|p| p.id == id).map(|product| {
            product.apply_update(update, updated_at);
            product.clone()
        }))
    }

    async fn delete(&self, id: &str) -> ProductResult<bool> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }

    async fn count(&self, status: Option<ProductStatus>) -> ProductResult<u64> {
        let products = self.products.read().await;
        let count = products
            .iter()
            .filter(|p| status.map_or(true, |s| p.status == s))
            .count();
        Ok(count as u64)
    }

    async fn categories(&self) -> ProductResult<Vec<String>> {
        let products = self.products.read().await;
        let mut categories: Vec<String> = products.iter().map(|p| p.category.clone()).collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    async fn category_stats(&self) -> ProductResult<Vec<CategoryStatRow>> {
        Ok(aggregate(&self.products.read().await))
    }

    async fn exists_by_name(&self, name: &str) -> ProductResult<bool> {
        Ok(self.products.read().await.iter().any(|p| p.name == name))
    }
}
