//! Cache invalidation triggers.
//!
//! Write operations call these after the store commit succeeds, so a stale
//! entry can never outlive the write that invalidated it.

use std::sync::Arc;

use tracing::debug;

use super::store::CatalogCache;

/// Eviction entry points for catalog write operations.
///
/// # Usage
///
/// ```ignore
/// // After a successful upsert:
/// trigger.product_saved(persisted.id);
/// ```
#[derive(Clone)]
pub struct CacheTrigger {
    cache: Arc<CatalogCache>,
}

impl CacheTrigger {
    pub fn new(cache: Arc<CatalogCache>) -> Self {
        Self { cache }
    }

    /// A product was created or updated.
    ///
    /// Clears the single-product region wholesale along with the page and
    /// category regions: an upsert with a non-zero payload id can overwrite
    /// any row, and any save can change page contents and the category
    /// projection.
    pub fn product_saved(&self, id: i32) {
        if !self.cache.config().enabled {
            return;
        }
        self.cache.invalidate_all_products();
        self.cache.invalidate_all_pages();
        self.cache.invalidate_categories();
        debug!(
            target = "vetrina::cache",
            id,
            op = "product_saved",
            "Evicted product, page and category regions"
        );
    }

    /// A product was deleted.
    ///
    /// The deleted id is known exactly, so the single-product region is
    /// evicted by key. Deleting the last product of a category removes that
    /// category from the projection, so the category list goes too.
    pub fn product_deleted(&self, id: i32) {
        if !self.cache.config().enabled {
            return;
        }
        self.cache.invalidate_product(id);
        self.cache.invalidate_all_pages();
        self.cache.invalidate_categories();
        debug!(
            target = "vetrina::cache",
            id,
            op = "product_deleted",
            "Evicted product id, page and category regions"
        );
    }
}
