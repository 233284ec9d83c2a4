//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::mongodb::{ensure_indexes, keys};
use futures_util::TryStreamExt;
use mongodb::{
    bson::{self, doc, Bson, Document},
    options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use tracing::instrument;

use crate::error::ProductResult;
use crate::models::{timestamp, Product, ProductStatus, UpdateProduct};
use crate::query::{ProductQuery, SortOrder};
use crate::repository::ProductRepository;
use crate::stats::CategoryStatRow;

pub const COLLECTION: &str = "products";

pub struct MongoProductRepository {
    collection: Collection<Product>,
}

fn named(keys: Document, name: &str) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().name(name.to_string()).build())
        .build()
}

/// Indexes backing the listing filters, sorts and id lookups.
pub fn product_indexes() -> Vec<IndexModel> {
    vec![
        named(keys(&[("status", 1)]), "idx_status"),
        named(keys(&[("category", 1)]), "idx_category"),
        named(keys(&[("price", 1)]), "idx_price"),
        named(keys(&[("created_at", -1)]), "idx_created_at"),
        named(keys(&[("status", 1), ("category", 1)]), "idx_status_category"),
        named(keys(&[("status", 1), ("price", 1)]), "idx_status_price"),
        named(keys(&[("category", 1), ("price", 1)]), "idx_category_price"),
        named(
            doc! { "name": "text", "description": "text", "category": "text" },
            "idx_text_search",
        ),
        IndexModel::builder()
            .keys(keys(&[("id", 1)]))
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("idx_id_unique".to_string())
                    .build(),
            )
            .build(),
    ]
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<Product>(collection_name);
        Self { collection }
    }

    pub async fn init_indexes(&self) -> ProductResult<Vec<String>> {
        Ok(ensure_indexes(&self.collection, product_indexes()).await?)
    }

    pub fn collection(&self) -> &Collection<Product> {
        &self.collection
    }

    /// Filter document for a listing query. Search terms are matched
    /// literally, case-insensitively.
    pub fn build_filter(query: &ProductQuery) -> Document {
        let mut filter = doc! { "status": query.status().to_string() };

        if let Some(ref category) = query.category {
            filter.insert("category", category.as_str());
        }

        if query.min_price.is_some() || query.max_price.is_some() {
            let mut price = doc! {};
            if let Some(min) = query.min_price {
                price.insert("$gte", min);
            }
            if let Some(max) = query.max_price {
                price.insert("$lte", max);
            }
            filter.insert("price", price);
        }

        if let Some(ref search) = query.search {
            let pattern = regex::escape(search);
            filter.insert(
                "$or",
                ["name", "description", "category"]
                    .iter()
                    .map(|field| {
                        let mut clause = Document::new();
                        clause.insert(*field, doc! { "$regex": pattern.as_str(), "$options": "i" });
                        clause
                    })
                    .collect::<Vec<_>>(),
            );
        }

        filter
    }

    pub fn sort_document(sort: SortOrder) -> Document {
        match sort {
            SortOrder::PriceLow => doc! { "price": 1 },
            SortOrder::PriceHigh => doc! { "price": -1 },
            SortOrder::Name => doc! { "name": 1 },
            SortOrder::Newest => doc! { "created_at": -1 },
            SortOrder::Oldest => doc! { "created_at": 1 },
        }
    }

    /// `$set` document for the fields present in `update`.
    pub fn build_update(update: &UpdateProduct, updated_at: DateTime<Utc>) -> Document {
        let mut set = doc! { "updated_at": timestamp::format(&updated_at) };

        if let Some(ref name) = update.name {
            set.insert("name", name.as_str());
        }
        if let Some(ref description) = update.description {
            set.insert("description", description.as_str());
        }
        if let Some(price) = update.price {
            set.insert("price", price);
        }
        if let Some(ref category) = update.category {
            set.insert("category", category.as_str());
        }
        if let Some(stock) = update.stock {
            set.insert("stock", stock);
        }
        if let Some(ref images) = update.images {
            set.insert(
                "images",
                images.iter().map(|i| Bson::String(i.clone())).collect::<Vec<_>>(),
            );
        }
        if let Some(status) = update.status {
            set.insert("status", status.to_string());
        }

        doc! { "$set": set }
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self))]
    async fn find(&self, query: &ProductQuery) -> ProductResult<Vec<Product>> {
        let options = FindOptions::builder()
            .sort(query.sort.map(Self::sort_document))
            .skip(Some(query.offset).filter(|o| *o > 0))
            .limit(query.limit.and_then(|l| i64::try_from(l).ok()))
            .build();

        let cursor = self
            .collection
            .find(Self::build_filter(query))
            .with_options(options)
            .await?;
        let products: Vec<Product> = cursor.try_collect().await?;

        Ok(products)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> ProductResult<Option<Product>> {
        let product = self.collection.find_one(doc! { "id": id }).await?;
        Ok(product)
    }

    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn insert(&self, product: &Product) -> ProductResult<()> {
        self.collection.insert_one(product).await?;
        tracing::info!(product_id = %product.id, "Product stored");
        Ok(())
    }

    #[instrument(skip(self, update))]
    async fn update(
        &self,
        id: &str,
        update: &UpdateProduct,
        updated_at: DateTime<Utc>,
    ) -> ProductResult<Option<Product>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let product = self
            .collection
            .find_one_and_update(doc! { "id": id }, Self::build_update(update, updated_at))
            .with_options(options)
            .await?;

        Ok(product)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> ProductResult<bool> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn count(&self, status: Option<ProductStatus>) -> ProductResult<u64> {
        let filter = match status {
            Some(status) => doc! { "status": status.to_string() },
            None => doc! {},
        };
        Ok(self.collection.count_documents(filter).await?)
    }

    #[instrument(skip(self))]
    async fn categories(&self) -> ProductResult<Vec<String>> {
        let values = self.collection.distinct("category", doc! {}).await?;
        let mut categories: Vec<String> = values
            .into_iter()
            .filter_map(|v| match v {
                Bson::String(s) => Some(s),
                _ => None,
            })
            .collect();
        categories.sort();
        Ok(categories)
    }

    #[instrument(skip(self))]
    async fn category_stats(&self) -> ProductResult<Vec<CategoryStatRow>> {
        let pipeline = vec![
            doc! { "$match": { "status": ProductStatus::Active.to_string() } },
            doc! {
                "$group": {
                    "_id": "$category",
                    "count": { "$sum": 1 },
                    "min_price": { "$min": "$price" },
                    "max_price": { "$max": "$price" },
                    "avg_price": { "$avg": "$price" },
                }
            },
            doc! { "$sort": { "count": -1, "_id": 1 } },
        ];

        let documents: Vec<Document> = self.collection.aggregate(pipeline).await?.try_collect().await?;
        documents
            .into_iter()
            .map(|d| Ok(bson::from_document::<CategoryStatRow>(d)?))
            .collect()
    }

    #[instrument(skip(self))]
    async fn exists_by_name(&self, name: &str) -> ProductResult<bool> {
        let count = self.collection.count_documents(doc! { "name": name }).await?;
        Ok(count > 0)
    }
}
