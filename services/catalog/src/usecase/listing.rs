use cinelog_domain::pagination::Page;

use crate::domain::repository::ListSource;
use crate::domain::types::ListQuery;
use crate::error::CatalogError;

/// Count-first paged listing shared by every list endpoint.
///
/// A zero count short-circuits to an empty page without fetching rows.
pub struct ListUseCase<R> {
    pub repo: R,
}

impl<R> ListUseCase<R> {
    pub async fn execute<F, S>(
        &self,
        query: ListQuery<F, S>,
    ) -> Result<Page<R::Item>, CatalogError>
    where
        R: ListSource<F, S>,
    {
        let window = query.page;
        let count = self.repo.count(&query.filter).await?;
        if count == 0 {
            return Ok(Page::empty(window));
        }
        let data = self.repo.fetch(&query).await?;
        Ok(Page {
            count,
            page: window.page,
            limit: window.limit,
            data,
        })
    }
}
