//! Cache configuration.

use std::num::NonZeroUsize;

use serde::Deserialize;

const DEFAULT_PRODUCT_LIMIT: usize = 500;
const DEFAULT_PAGE_LIMIT: usize = 50;

/// Catalog cache configuration from `vetrina.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable the catalog cache regions. When disabled, every read goes to
    /// the store and write-time eviction becomes a no-op.
    pub enabled: bool,
    /// Maximum products in the single-product region.
    pub product_limit: usize,
    /// Maximum pages in the product-page region.
    pub page_limit: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            product_limit: DEFAULT_PRODUCT_LIMIT,
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            product_limit: settings.product_limit,
            page_limit: settings.page_limit,
        }
    }
}

impl CacheConfig {
    /// Returns the product limit as NonZeroUsize, clamping to 1 if zero.
    pub fn product_limit_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.product_limit).unwrap_or(NonZeroUsize::MIN)
    }

    /// Returns the page limit as NonZeroUsize, clamping to 1 if zero.
    pub fn page_limit_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.page_limit).unwrap_or(NonZeroUsize::MIN)
    }
}
