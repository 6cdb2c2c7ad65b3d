//! Review service capability.
//!
//! The review service is a remote, independently owned collaborator. It is
//! reached through the narrow [`ReviewsClient`] interface so the aggregation
//! layer never sees transport detail, and so tests can script it.

mod client;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::ReviewRecord;

pub use client::HttpReviewsClient;

#[derive(Debug, Error)]
pub enum ReviewsError {
    #[error("review service request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("review service returned status {0}")]
    Status(u16),
    #[error("review service url could not be built: {0}")]
    Url(#[from] url::ParseError),
    #[error("review service payload could not be decoded: {0}")]
    Decode(String),
}

/// Fetch the reviews for one product.
///
/// An empty list and a failure are equivalent for the product read path;
/// the caller degrades to a review-free product either way.
#[async_trait]
pub trait ReviewsClient: Send + Sync {
    async fn reviews_for_product(
        &self,
        product_id: i32,
    ) -> Result<Vec<ReviewRecord>, ReviewsError>;
}
