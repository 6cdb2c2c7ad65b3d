//! Cache storage: the three catalog regions.
//!
//! KV regions use LRU eviction with configurable limits; the category list
//! is a singleton slot. Locks are plain `std::sync::RwLock`s and are never
//! held across an await point — callers clone values out and release the
//! guard before doing anything slow.

use std::sync::RwLock;

use lru::LruCache;
use metrics::counter;

use crate::application::repos::PageRequest;
use crate::domain::entities::ProductRecord;

use super::config::CacheConfig;
use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";

const METRIC_PRODUCT_HIT: &str = "vetrina_cache_product_hit_total";
const METRIC_PRODUCT_MISS: &str = "vetrina_cache_product_miss_total";
const METRIC_PAGE_HIT: &str = "vetrina_cache_page_hit_total";
const METRIC_PAGE_MISS: &str = "vetrina_cache_page_miss_total";
const METRIC_CATEGORY_HIT: &str = "vetrina_cache_category_hit_total";
const METRIC_CATEGORY_MISS: &str = "vetrina_cache_category_miss_total";
const METRIC_EVICT: &str = "vetrina_cache_evict_total";

/// Catalog cache storage.
///
/// Population and lookup are safe under concurrent access; two requests
/// racing to fill the same key may both hit the store, which is acceptable.
/// Region clears happen under a single write-lock acquisition, so an
/// eviction is atomic relative to subsequent lookups.
pub struct CatalogCache {
    config: CacheConfig,

    // KV regions (LRU-bounded)
    products: RwLock<LruCache<i32, ProductRecord>>,
    pages: RwLock<LruCache<PageRequest, Vec<ProductRecord>>>,

    // Singleton region (no eviction needed)
    categories: RwLock<Option<Vec<String>>>,
}

impl CatalogCache {
    /// Create a new catalog cache with the given configuration.
    pub fn new(config: CacheConfig) -> Self {
        let products = LruCache::new(config.product_limit_non_zero());
        let pages = LruCache::new(config.page_limit_non_zero());
        Self {
            config,
            products: RwLock::new(products),
            pages: RwLock::new(pages),
            categories: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // ========================================================================
    // Single-product region
    // ========================================================================

    pub fn get_product(&self, id: i32) -> Option<ProductRecord> {
        if !self.config.enabled {
            return None;
        }
        let hit = rw_write(&self.products, SOURCE, "get_product")
            .get(&id)
            .cloned();
        match hit {
            Some(_) => counter!(METRIC_PRODUCT_HIT).increment(1),
            None => counter!(METRIC_PRODUCT_MISS).increment(1),
        }
        hit
    }

    pub fn set_product(&self, product: ProductRecord) {
        if !self.config.enabled {
            return;
        }
        let evicted = rw_write(&self.products, SOURCE, "set_product")
            .push(product.id, product)
            .is_some();
        if evicted {
            counter!(METRIC_EVICT, "region" => "product").increment(1);
        }
    }

    pub fn invalidate_product(&self, id: i32) {
        rw_write(&self.products, SOURCE, "invalidate_product").pop(&id);
    }

    pub fn invalidate_all_products(&self) {
        rw_write(&self.products, SOURCE, "invalidate_all_products").clear();
    }

    // ========================================================================
    // Product-page region
    // ========================================================================

    pub fn get_page(&self, request: PageRequest) -> Option<Vec<ProductRecord>> {
        if !self.config.enabled {
            return None;
        }
        let hit = rw_write(&self.pages, SOURCE, "get_page")
            .get(&request)
            .cloned();
        match hit {
            Some(_) => counter!(METRIC_PAGE_HIT).increment(1),
            None => counter!(METRIC_PAGE_MISS).increment(1),
        }
        hit
    }

    pub fn set_page(&self, request: PageRequest, products: Vec<ProductRecord>) {
        if !self.config.enabled {
            return;
        }
        let evicted = rw_write(&self.pages, SOURCE, "set_page")
            .push(request, products)
            .is_some();
        if evicted {
            counter!(METRIC_EVICT, "region" => "page").increment(1);
        }
    }

    pub fn invalidate_all_pages(&self) {
        rw_write(&self.pages, SOURCE, "invalidate_all_pages").clear();
    }

    // ========================================================================
    // Category-list region
    // ========================================================================

    pub fn get_categories(&self) -> Option<Vec<String>> {
        if !self.config.enabled {
            return None;
        }
        let hit = rw_read(&self.categories, SOURCE, "get_categories").clone();
        match hit {
            Some(_) => counter!(METRIC_CATEGORY_HIT).increment(1),
            None => counter!(METRIC_CATEGORY_MISS).increment(1),
        }
        hit
    }

    pub fn set_categories(&self, categories: Vec<String>) {
        if !self.config.enabled {
            return;
        }
        *rw_write(&self.categories, SOURCE, "set_categories") = Some(categories);
    }

    pub fn invalidate_categories(&self) {
        *rw_write(&self.categories, SOURCE, "invalidate_categories") = None;
    }

    // ========================================================================
    // Bulk operations
    // ========================================================================

    /// Clear all regions.
    pub fn clear(&self) {
        self.invalidate_all_products();
        self.invalidate_all_pages();
        self.invalidate_categories();
    }
}
