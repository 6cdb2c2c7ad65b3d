use async_trait::async_trait;
use time::OffsetDateTime;

use crate::application::repos::{PageRequest, ProductDraft, ProductsRepo, RepoError};
use crate::domain::entities::ProductRecord;

use super::PostgresRepositories;

const PRODUCT_COLUMNS: &str = "id, category, title, sub_title, brand, rating, \
     short_description, description, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    category: String,
    title: String,
    sub_title: String,
    brand: String,
    rating: i32,
    short_description: String,
    description: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ProductRow> for ProductRecord {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            category: row.category,
            title: row.title,
            sub_title: row.sub_title,
            brand: row.brand,
            rating: row.rating,
            short_description: row.short_description,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ProductsRepo for PostgresRepositories {
    async fn find_by_id(&self, id: i32) -> Result<Option<ProductRecord>, RepoError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(RepoError::from_persistence)?;

        Ok(row.map(ProductRecord::from))
    }

    async fn list(&self, request: PageRequest) -> Result<Vec<ProductRecord>, RepoError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(request.limit())
        .bind(request.offset())
        .fetch_all(self.pool())
        .await
        .map_err(RepoError::from_persistence)?;

        Ok(rows.into_iter().map(ProductRecord::from).collect())
    }

    async fn list_by_category(
        &self,
        category: &str,
        request: PageRequest,
    ) -> Result<Vec<ProductRecord>, RepoError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE category = $1 \
             ORDER BY id LIMIT $2 OFFSET $3"
        ))
        .bind(category)
        .bind(request.limit())
        .bind(request.offset())
        .fetch_all(self.pool())
        .await
        .map_err(RepoError::from_persistence)?;

        Ok(rows.into_iter().map(ProductRecord::from).collect())
    }

    async fn distinct_categories(&self) -> Result<Vec<String>, RepoError> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM products ORDER BY category",
        )
        .fetch_all(self.pool())
        .await
        .map_err(RepoError::from_persistence)
    }

    async fn upsert(&self, draft: ProductDraft) -> Result<ProductRecord, RepoError> {
        let row = if draft.id == 0 {
            sqlx::query_as::<_, ProductRow>(&format!(
                "INSERT INTO products \
                     (category, title, sub_title, brand, rating, short_description, description) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) \
                 RETURNING {PRODUCT_COLUMNS}"
            ))
            .bind(&draft.category)
            .bind(&draft.title)
            .bind(&draft.sub_title)
            .bind(&draft.brand)
            .bind(draft.rating)
            .bind(&draft.short_description)
            .bind(&draft.description)
            .fetch_one(self.pool())
            .await
        } else {
            sqlx::query_as::<_, ProductRow>(&format!(
                "INSERT INTO products \
                     (id, category, title, sub_title, brand, rating, short_description, description) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
                 ON CONFLICT (id) DO UPDATE SET \
                     category = EXCLUDED.category, \
                     title = EXCLUDED.title, \
                     sub_title = EXCLUDED.sub_title, \
                     brand = EXCLUDED.brand, \
                     rating = EXCLUDED.rating, \
                     short_description = EXCLUDED.short_description, \
                     description = EXCLUDED.description, \
                     updated_at = now() \
                 RETURNING {PRODUCT_COLUMNS}"
            ))
            .bind(draft.id)
            .bind(&draft.category)
            .bind(&draft.title)
            .bind(&draft.sub_title)
            .bind(&draft.brand)
            .bind(draft.rating)
            .bind(&draft.short_description)
            .bind(&draft.description)
            .fetch_one(self.pool())
            .await
        };

        row.map(ProductRecord::from)
            .map_err(RepoError::from_persistence)
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), RepoError> {
        // Deleting an absent id affects zero rows; that is not an error here.
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(RepoError::from_persistence)?;

        Ok(())
    }

    async fn health_check(&self) -> Result<(), RepoError> {
        self.ping().await.map_err(RepoError::from_persistence)
    }
}
