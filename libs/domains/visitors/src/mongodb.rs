//! MongoDB implementation of VisitorRepository

use async_trait::async_trait;
use database::mongodb::{ensure_indexes, keys};
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{self, Document, doc},
    options::IndexOptions,
};
use tracing::instrument;

use crate::error::{VisitorError, VisitorResult};
use crate::models::{PageViews, VisitTrack};
use crate::repository::{PAGE_VIEWS_LIMIT, VisitorRepository};

pub const COLLECTION: &str = "visitor_tracks";

pub struct MongoVisitorRepository {
    collection: Collection<VisitTrack>,
}

fn named(keys: Document, name: &str) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().name(name.to_string()).build())
        .build()
}

pub fn visitor_indexes() -> Vec<IndexModel> {
    vec![
        named(keys(&[("timestamp", -1)]), "idx_timestamp"),
        named(keys(&[("user_id", 1)]), "idx_user_id"),
        named(keys(&[("page", 1)]), "idx_page"),
        named(keys(&[("ip_address", 1)]), "idx_ip_address"),
    ]
}

/// `$group` by page, most viewed first
pub fn page_views_pipeline() -> Vec<Document> {
    vec![
        doc! { "$group": { "_id": "$page", "count": { "$sum": 1 } } },
        doc! { "$sort": { "count": -1, "_id": 1 } },
        doc! { "$limit": PAGE_VIEWS_LIMIT as i64 },
    ]
}

impl MongoVisitorRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<VisitTrack>(COLLECTION),
        }
    }

    pub async fn init_indexes(&self) -> VisitorResult<Vec<String>> {
        Ok(ensure_indexes(&self.collection, visitor_indexes()).await?)
    }
}

#[async_trait]
impl VisitorRepository for MongoVisitorRepository {
    #[instrument(skip(self, visit), fields(page = %visit.page))]
    async fn insert(&self, visit: &VisitTrack) -> VisitorResult<()> {
        self.collection.insert_one(visit).await?;
        Ok(())
    }

    async fn count(&self) -> VisitorResult<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    async fn unique_visitors(&self) -> VisitorResult<u64> {
        let ids = self.collection.distinct("visitor_id", doc! {}).await?;
        Ok(ids.len() as u64)
    }

    #[instrument(skip(self))]
    async fn page_views(&self) -> VisitorResult<Vec<PageViews>> {
        let cursor = self.collection.aggregate(page_views_pipeline()).await?;
        let rows: Vec<Document> = cursor.try_collect().await?;
        rows.into_iter()
            .map(|row| bson::from_document::<PageViews>(row).map_err(VisitorError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visitor_indexes() {
        let names: Vec<_> = visitor_indexes()
            .iter()
            .map(|i| i.options.as_ref().and_then(|o| o.name.clone()).unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["idx_timestamp", "idx_user_id", "idx_page", "idx_ip_address"]
        );
        assert_eq!(visitor_indexes()[0].keys, doc! { "timestamp": -1 });
    }

    #[test]
    fn test_page_views_pipeline_sorts_by_count() {
        let pipeline = page_views_pipeline();
        assert_eq!(pipeline[1], doc! { "$sort": { "count": -1, "_id": 1 } });
    }
}
