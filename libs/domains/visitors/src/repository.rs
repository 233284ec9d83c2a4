use async_trait::async_trait;

use crate::error::VisitorResult;
use crate::models::{PageViews, VisitTrack};

/// Most pages reported by [`VisitorRepository::page_views`]
pub const PAGE_VIEWS_LIMIT: usize = 100;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitorRepository: Send + Sync {
    async fn insert(&self, visit: &VisitTrack) -> VisitorResult<()>;

    async fn count(&self) -> VisitorResult<u64>;

    /// Number of distinct visitor ids
    async fn unique_visitors(&self) -> VisitorResult<u64>;

    /// Views grouped by page, most viewed first
    async fn page_views(&self) -> VisitorResult<Vec<PageViews>>;
}
