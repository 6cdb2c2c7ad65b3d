//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::entities::ProductRecord;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Offset-based paging request. `page` is zero-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

/// Inbound product payload for save operations.
///
/// The id is advisory: zero requests store-side identity assignment, a
/// non-zero id upserts that row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductDraft {
    pub id: i32,
    pub category: String,
    pub title: String,
    pub sub_title: String,
    pub brand: String,
    pub rating: i32,
    pub short_description: String,
    pub description: String,
}

/// Typed CRUD and query surface over the product table.
#[async_trait]
pub trait ProductsRepo: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<ProductRecord>, RepoError>;

    async fn list(&self, request: PageRequest) -> Result<Vec<ProductRecord>, RepoError>;

    async fn list_by_category(
        &self,
        category: &str,
        request: PageRequest,
    ) -> Result<Vec<ProductRecord>, RepoError>;

    /// Distinct category names, ordered alphabetically.
    async fn distinct_categories(&self) -> Result<Vec<String>, RepoError>;

    /// Insert (id zero) or overwrite (id present) a product, returning the
    /// persisted record with its assigned id.
    async fn upsert(&self, draft: ProductDraft) -> Result<ProductRecord, RepoError>;

    /// Delete by id. Deleting an absent id is a silent no-op.
    async fn delete_by_id(&self, id: i32) -> Result<(), RepoError>;

    async fn health_check(&self) -> Result<(), RepoError>;
}
