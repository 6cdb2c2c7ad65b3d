//! Product aggregation service.
//!
//! Wraps the catalog repository with the cache regions, enriches
//! single-product reads with review data, and evicts on writes. Input
//! validation happens here, before any cache or store access.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::application::repos::{PageRequest, ProductDraft, ProductsRepo, RepoError};
use crate::cache::{CacheTrigger, CatalogCache};
use crate::domain::entities::{ProductRecord, ReviewRecord};
use crate::reviews::ReviewsClient;

/// Paging defaults applied when the caller omits the path segments.
pub const DEFAULT_PAGE: &str = "0";
pub const DEFAULT_SIZE: &str = "10";

const MAX_RATING: i32 = 5;

/// Failure taxonomy surfaced by the aggregation service.
///
/// Review-client failures never appear here; they degrade to a product
/// without reviews inside [`CatalogService::get_by_id`].
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Malformed identifier or paging parameter. The caller's fault; never
    /// reaches the cache or the store.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The entity is genuinely absent.
    #[error("resource not found")]
    NotFound,
    /// The query was well-formed but the requested range is beyond the
    /// available data.
    #[error("no content in requested range")]
    NoContent,
    /// The catalog store raised something unexpected.
    #[error("upstream failure: {0}")]
    Upstream(String),
}

impl From<RepoError> for CatalogError {
    fn from(err: RepoError) -> Self {
        Self::Upstream(err.to_string())
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        // Contract: error responses carry no body.
        let status = match self {
            CatalogError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CatalogError::NotFound => StatusCode::NOT_FOUND,
            CatalogError::NoContent => StatusCode::NO_CONTENT,
            CatalogError::Upstream(_) => StatusCode::EXPECTATION_FAILED,
        };
        status.into_response()
    }
}

/// Response envelope for the single-product read path.
///
/// Reviews are merged into this copy only; the cached [`ProductRecord`] is
/// never mutated, so concurrent readers sharing a cache entry cannot
/// observe another reader's merge.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithReviews {
    #[serde(flatten)]
    pub product: ProductRecord,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reviews: Vec<ReviewRecord>,
}

/// The catalog aggregation service.
pub struct CatalogService {
    repo: Arc<dyn ProductsRepo>,
    reviews: Arc<dyn ReviewsClient>,
    cache: Arc<CatalogCache>,
    trigger: CacheTrigger,
}

impl CatalogService {
    pub fn new(
        repo: Arc<dyn ProductsRepo>,
        reviews: Arc<dyn ReviewsClient>,
        cache: Arc<CatalogCache>,
    ) -> Self {
        let trigger = CacheTrigger::new(cache.clone());
        Self {
            repo,
            reviews,
            cache,
            trigger,
        }
    }

    /// Resolve a product by id and attach its reviews.
    ///
    /// The product comes from the single-product region when cached,
    /// otherwise from the store (populating the region). The review client
    /// is consulted on every call since reviews are never cached alongside
    /// the product.
    pub async fn get_by_id(&self, id: &str) -> Result<ProductWithReviews, CatalogError> {
        let id = parse_product_id(id)?;

        let product = match self.cache.get_product(id) {
            Some(hit) => hit,
            None => {
                let fetched = self
                    .repo
                    .find_by_id(id)
                    .await?
                    .ok_or(CatalogError::NotFound)?;
                self.cache.set_product(fetched.clone());
                fetched
            }
        };

        let reviews = self.fetch_reviews(id).await;
        Ok(ProductWithReviews { product, reviews })
    }

    /// Fetch reviews for a resolved product, degrading to an empty list.
    ///
    /// Empty and failure are equivalent for the response but logged
    /// distinctly.
    async fn fetch_reviews(&self, product_id: i32) -> Vec<ReviewRecord> {
        match self.reviews.reviews_for_product(product_id).await {
            Ok(reviews) if reviews.is_empty() => {
                debug!(
                    target = "vetrina::catalog",
                    product_id, "No reviews for product"
                );
                Vec::new()
            }
            Ok(reviews) => {
                debug!(
                    target = "vetrina::catalog",
                    product_id,
                    count = reviews.len(),
                    "Attached reviews to product"
                );
                reviews
            }
            Err(err) => {
                warn!(
                    target = "vetrina::catalog",
                    product_id,
                    error = %err,
                    "Review lookup degraded, returning product without reviews"
                );
                Vec::new()
            }
        }
    }

    /// Resolve a page of the full catalog.
    pub async fn list_page(&self, page: &str, size: &str) -> Result<Vec<ProductRecord>, CatalogError> {
        let request = parse_page_request(page, size)?;

        if let Some(hit) = self.cache.get_page(request) {
            return Ok(hit);
        }

        let products = self.repo.list(request).await?;
        if products.is_empty() {
            return Err(CatalogError::NoContent);
        }
        self.cache.set_page(request, products.clone());
        Ok(products)
    }

    /// Resolve the distinct category listing.
    pub async fn list_categories(&self) -> Result<Vec<String>, CatalogError> {
        if let Some(hit) = self.cache.get_categories() {
            return Ok(hit);
        }

        let categories = self.repo.distinct_categories().await?;
        if categories.is_empty() {
            return Err(CatalogError::NotFound);
        }
        self.cache.set_categories(categories.clone());
        Ok(categories)
    }

    /// Resolve a page of one category. Always recomputed, never cached.
    pub async fn list_by_category(
        &self,
        category: &str,
        page: &str,
        size: &str,
    ) -> Result<Vec<ProductRecord>, CatalogError> {
        let request = parse_page_request(page, size)?;

        let products = self.repo.list_by_category(category, request).await?;
        if products.is_empty() {
            return Err(CatalogError::NoContent);
        }
        Ok(products)
    }

    /// Persist a product and evict the regions the write could invalidate.
    ///
    /// The payload id is advisory: zero asks the store to assign one, a
    /// non-zero id overwrites that row.
    pub async fn save(&self, draft: ProductDraft) -> Result<ProductRecord, CatalogError> {
        validate_draft(&draft)?;

        let persisted = self.repo.upsert(draft).await?;
        self.trigger.product_saved(persisted.id);
        Ok(persisted)
    }

    /// Delete a product by id. Deleting an absent id succeeds.
    pub async fn delete_by_id(&self, id: &str) -> Result<(), CatalogError> {
        let id = id.parse::<i32>().map_err(|_| {
            CatalogError::InvalidInput(format!("product id `{id}` is not an integer"))
        })?;

        self.repo.delete_by_id(id).await?;
        self.trigger.product_deleted(id);
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), CatalogError> {
        self.repo.health_check().await.map_err(Into::into)
    }
}

fn parse_product_id(raw: &str) -> Result<i32, CatalogError> {
    raw.parse::<i32>()
        .ok()
        .filter(|id| *id >= 0)
        .ok_or_else(|| {
            CatalogError::InvalidInput(format!(
                "product id `{raw}` is not a non-negative integer"
            ))
        })
}

fn parse_page_request(page: &str, size: &str) -> Result<PageRequest, CatalogError> {
    let page = page
        .parse::<u32>()
        .map_err(|_| CatalogError::InvalidInput(format!("page `{page}` is not a valid index")))?;
    let size = size
        .parse::<u32>()
        .ok()
        .filter(|size| *size >= 1)
        .ok_or_else(|| {
            CatalogError::InvalidInput(format!("size `{size}` is not a positive integer"))
        })?;
    Ok(PageRequest::new(page, size))
}

fn validate_draft(draft: &ProductDraft) -> Result<(), CatalogError> {
    if draft.id < 0 {
        return Err(CatalogError::InvalidInput(format!(
            "product id `{}` is negative",
            draft.id
        )));
    }
    if draft.title.trim().is_empty() {
        return Err(CatalogError::InvalidInput("title is empty".to_string()));
    }
    if !(0..=MAX_RATING).contains(&draft.rating) {
        return Err(CatalogError::InvalidInput(format!(
            "rating `{}` is outside 0..={MAX_RATING}",
            draft.rating
        )));
    }
    Ok(())
}
