use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub use database::common::timestamp;

/// Product visibility. Only `Active` products are listed publicly.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
}

/// A catalog entry.
///
/// `images` holds base64 payloads that already passed the image policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// UUID v4, stored in the `id` field
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub stock: i64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub status: ProductStatus,
    /// Id of the admin who created the product
    pub created_by: String,
    #[serde(with = "timestamp")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Builds a new active product. `images` must already be processed.
    pub fn new(input: CreateProduct, images: Vec<String>, created_by: impl Into<String>) -> Self {
        let now = timestamp::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            description: input.description,
            price: input.price,
            category: input.category,
            stock: input.stock,
            images,
            status: ProductStatus::Active,
            created_by: created_by.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }

    /// Applies the present fields and bumps `updated_at`.
    pub fn apply_update(&mut self, update: &UpdateProduct, now: DateTime<Utc>) {
        if let Some(ref name) = update.name {
            self.name = name.clone();
        }
        if let Some(ref description) = update.description {
            self.description = description.clone();
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(ref category) = update.category {
            self.category = category.clone();
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        if let Some(ref images) = update.images {
            self.images = images.clone();
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 5000))]
    pub description: String,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "stock must not be negative"))]
    pub stock: i64,
    /// Base64 payloads, optionally with a `data:` URL prefix
    #[serde(default)]
    pub images: Vec<String>,
}

/// Partial update. Absent fields are left unchanged; `images`, when present,
/// replaces the whole list (an empty list clears it).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: Option<f64>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    #[validate(range(min = 0, message = "stock must not be negative"))]
    pub stock: Option<i64>,
    pub images: Option<Vec<String>>,
    pub status: Option<ProductStatus>,
}

impl UpdateProduct {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
