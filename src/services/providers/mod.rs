/// Catalog client abstraction
///
/// The import pipeline talks to the streaming catalog exclusively through
/// this trait, which keeps the row processor and batch loop testable with a
/// mocked client.
use crate::{
    error::CatalogResult,
    models::{CatalogMatch, ObjectType},
};

pub mod justwatch;

/// Authenticated access to the catalog's search and list mutations
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Resolve a title to its canonical catalog entry.
    ///
    /// Issues a ranked single-result search constrained by object type and,
    /// when given, an exact release-year bound. The highest-ranked result is
    /// trusted as the match. `Ok(None)` means the result set was empty.
    async fn resolve(
        &self,
        name: &str,
        object_type: ObjectType,
        release_year: Option<i32>,
    ) -> CatalogResult<Option<CatalogMatch>>;

    /// Mark a title as watched in the user's seen list
    async fn mark_seen(&self, title_id: &str) -> CatalogResult<()>;

    /// Add a title to the user's want-to-watch list
    async fn mark_watchlist(&self, title_id: &str) -> CatalogResult<()>;
}
