//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::images::ImagePolicy;
use crate::models::{timestamp, CreateProduct, Product, ProductStatus, UpdateProduct};
use crate::query::{ProductListParams, ProductQuery};
use crate::repository::ProductRepository;
use crate::stats::CategoryStats;

/// Catalog operations. Every write runs its images through the
/// [`ImagePolicy`] before touching the repository, so a rejected image never
/// leaves a partial write behind.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    images: ImagePolicy,
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            images: self.images.clone(),
        }
    }
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R, images: ImagePolicy) -> Self {
        Self {
            repository: Arc::new(repository),
            images,
        }
    }

    pub fn from_shared(repository: Arc<R>, images: ImagePolicy) -> Self {
        Self { repository, images }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Public listing: active products only.
    #[instrument(skip(self))]
    pub async fn list_products(&self, params: ProductListParams) -> ProductResult<Vec<Product>> {
        let query = ProductQuery::from_params(params)?;
        self.repository.find(&query).await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &str) -> ProductResult<Product> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    #[instrument(skip(self, input), fields(product_name = %input.name, images = input.images.len()))]
    pub async fn create_product(
        &self,
        mut input: CreateProduct,
        created_by: &str,
    ) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let images = self.images.ingest_all(std::mem::take(&mut input.images)).await?;
        let product = Product::new(input, images, created_by);

        self.repository.insert(&product).await?;
        tracing::info!(product_id = %product.id, created_by, "Product created");
        Ok(product)
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: &str, mut input: UpdateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        if self.repository.find_by_id(id).await?.is_none() {
            return Err(ProductError::NotFound(id.to_string()));
        }

        if let Some(images) = input.images.take() {
            input.images = Some(self.images.ingest_all(images).await?);
        }

        let product = self
            .repository
            .update(id, &input, timestamp::now())
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))?;

        tracing::info!(product_id = %id, "Product updated");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &str) -> ProductResult<()> {
        if !self.repository.delete(id).await? {
            return Err(ProductError::NotFound(id.to_string()));
        }
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn categories(&self) -> ProductResult<Vec<String>> {
        self.repository.categories().await
    }

    #[instrument(skip(self))]
    pub async fn category_stats(&self) -> ProductResult<CategoryStats> {
        let rows = self.repository.category_stats().await?;
        Ok(CategoryStats::from_rows(rows))
    }

    #[instrument(skip(self))]
    pub async fn count_products(&self, status: Option<ProductStatus>) -> ProductResult<u64> {
        self.repository.count(status).await
    }
}
