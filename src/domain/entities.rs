//! Domain entities mirrored from persistent storage and remote collaborators.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A catalog product as persisted in the product table.
///
/// Reviews are never part of this record; they are merged into a response
/// copy at assembly time so cache entries stay review-free.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: i32,
    pub category: String,
    pub title: String,
    pub sub_title: String,
    pub brand: String,
    pub rating: i32,
    pub short_description: String,
    pub description: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A product review owned and mutated by the remote review service.
///
/// This service only ever reads review records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub id: i32,
    pub product_id: i32,
    pub user_name: String,
    pub title: String,
    pub rating: i32,
    pub is_verified_purchase: bool,
    pub is_helpful: bool,
    pub is_abuse: bool,
    pub description: String,
}
