//! In-memory VisitorRepository for tests and local runs without MongoDB.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::VisitorResult;
use crate::models::{PageViews, VisitTrack};
use crate::repository::{PAGE_VIEWS_LIMIT, VisitorRepository};

#[derive(Clone, Default)]
pub struct InMemoryVisitorRepository {
    visits: Arc<RwLock<Vec<VisitTrack>>>,
}

impl InMemoryVisitorRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> Vec<VisitTrack> {
        self.visits.read().await.clone()
    }
}

#[async_trait]
impl VisitorRepository for InMemoryVisitorRepository {
    async fn insert(&self, visit: &VisitTrack) -> VisitorResult<()> {
        self.visits.write().await.push(visit.clone());
        Ok(())
    }

    async fn count(&self) -> VisitorResult<u64> {
        Ok(self.visits.read().await.len() as u64)
    }

    async fn unique_visitors(&self) -> VisitorResult<u64> {
        let visits = self.visits.read().await;
        let ids: HashSet<&str> = visits.iter().map(|v| v.visitor_id.as_str()).collect();
        Ok(ids.len() as u64)
    }

    async fn page_views(&self) -> VisitorResult<Vec<PageViews>> {
        let visits = self.visits.read().await;
        let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
        for visit in visits.iter() {
            *counts.entry(visit.page.as_str()).or_default() += 1;
        }

        let mut views: Vec<PageViews> = counts
            .into_iter()
            .map(|(page, count)| PageViews {
                page: page.to_string(),
                count,
            })
            .collect();
        views.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.page.cmp(&b.page)));
        views.truncate(PAGE_VIEWS_LIMIT);
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visit(visitor: &str, page: &str) -> VisitTrack {
        VisitTrack::new(visitor, page, "test-agent", "10.0.0.1")
    }

    #[tokio::test]
    async fn test_totals_and_page_views() {
        let repo = InMemoryVisitorRepository::new();
        for (visitor, page) in [
            ("v1", "products"),
            ("v1", "product/abc"),
            ("v2", "products"),
            ("v3", "products"),
        ] {
            repo.insert(&visit(visitor, page)).await.unwrap();
        }

        assert_eq!(repo.count().await.unwrap(), 4);
        assert_eq!(repo.unique_visitors().await.unwrap(), 3);

        let views = repo.page_views().await.unwrap();
        assert_eq!(views[0], PageViews { page: "products".into(), count: 3 });
        assert_eq!(views[1].count, 1);
    }

    #[tokio::test]
    async fn test_empty_store() {
        let repo = InMemoryVisitorRepository::new();
        assert_eq!(repo.unique_visitors().await.unwrap(), 0);
        assert!(repo.page_views().await.unwrap().is_empty());
    }
}
