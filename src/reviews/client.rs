//! HTTP review-service client.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use lru::LruCache;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use crate::cache::rw_write;
use crate::config::ReviewsSettings;
use crate::domain::entities::ReviewRecord;
use crate::infra::error::InfraError;

use super::{ReviewsClient, ReviewsError};

const SOURCE: &str = "reviews::client";

/// Review client over `GET {base}/reviews/{productId}/product`.
///
/// Carries its own cache region keyed by product id. The region is strictly
/// private: the catalog cache neither reads nor invalidates it, and only
/// successful non-empty responses populate it. The request timeout bounds
/// how long one slow review service can hold up a product read.
#[derive(Debug)]
pub struct HttpReviewsClient {
    client: Client,
    base: Url,
    cache: RwLock<LruCache<i32, Vec<ReviewRecord>>>,
}

impl HttpReviewsClient {
    pub fn new(settings: &ReviewsSettings) -> Result<Self, InfraError> {
        let base = Url::parse(&settings.base_url).map_err(|err| {
            InfraError::configuration(format!("invalid reviews base url: {err}"))
        })?;
        let client = Client::builder()
            .user_agent(concat!("vetrina/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(settings.timeout_ms.get()))
            .build()
            .map_err(|err| InfraError::configuration(err.to_string()))?;

        Ok(Self {
            client,
            base,
            cache: RwLock::new(LruCache::new(settings.cache_limit_non_zero())),
        })
    }

    fn cached(&self, product_id: i32) -> Option<Vec<ReviewRecord>> {
        rw_write(&self.cache, SOURCE, "cached")
            .get(&product_id)
            .cloned()
    }

    fn store(&self, product_id: i32, reviews: &[ReviewRecord]) {
        rw_write(&self.cache, SOURCE, "store").put(product_id, reviews.to_vec());
    }

    fn reviews_url(&self, product_id: i32) -> Result<Url, ReviewsError> {
        Ok(self.base.join(&format!("reviews/{product_id}/product"))?)
    }
}

#[async_trait]
impl ReviewsClient for HttpReviewsClient {
    async fn reviews_for_product(
        &self,
        product_id: i32,
    ) -> Result<Vec<ReviewRecord>, ReviewsError> {
        if let Some(hit) = self.cached(product_id) {
            debug!(target = "vetrina::reviews", product_id, "Review cache hit");
            return Ok(hit);
        }

        let url = self.reviews_url(product_id)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(ReviewsError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Vec::new());
        }

        let reviews: Vec<ReviewRecord> = serde_json::from_slice(&bytes)
            .map_err(|err| ReviewsError::Decode(err.to_string()))?;
        if !reviews.is_empty() {
            self.store(product_id, &reviews);
        }
        Ok(reviews)
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU64;

    use super::*;

    fn settings(base_url: &str) -> ReviewsSettings {
        ReviewsSettings {
            base_url: base_url.to_string(),
            timeout_ms: NonZeroU64::new(250).expect("non-zero timeout"),
            cache_limit: 16,
        }
    }

    #[test]
    fn builds_the_review_path_from_the_base_url() {
        let client = HttpReviewsClient::new(&settings("http://localhost:8084")).expect("client");
        let url = client.reviews_url(42).expect("url");
        assert_eq!(url.as_str(), "http://localhost:8084/reviews/42/product");
    }

    #[test]
    fn rejects_an_unparseable_base_url() {
        let err = HttpReviewsClient::new(&settings("not a url")).expect_err("invalid base");
        assert!(matches!(err, InfraError::Configuration { .. }));
    }

    #[tokio::test]
    async fn unreachable_service_surfaces_a_transport_error() {
        // Nothing listens on this port; the connect fails fast.
        let client = HttpReviewsClient::new(&settings("http://127.0.0.1:1")).expect("client");
        let err = client
            .reviews_for_product(1)
            .await
            .expect_err("connection refused");
        assert!(matches!(err, ReviewsError::Transport(_)));
    }
}
