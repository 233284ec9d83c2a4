use std::sync::Arc;

use crate::error::VisitorResult;
use crate::models::{PageViews, VisitorTotals};
use crate::repository::VisitorRepository;

/// Read side of visitor tracking, used by the admin analytics endpoint.
pub struct VisitorService<R: VisitorRepository> {
    repository: Arc<R>,
}

impl<R: VisitorRepository> Clone for VisitorService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: VisitorRepository> VisitorService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn totals(&self) -> VisitorResult<VisitorTotals> {
        let (total, unique) = tokio::try_join!(
            self.repository.count(),
            self.repository.unique_visitors()
        )?;
        Ok(VisitorTotals { total, unique })
    }

    pub async fn page_views(&self) -> VisitorResult<Vec<PageViews>> {
        self.repository.page_views().await
    }
}
