//! HTTP status-contract tests for the catalog API.
//!
//! The router is exercised in-process with an in-memory repository and a
//! scripted review client, so every externally observable status code can
//! be checked without a database or a live review service.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use time::OffsetDateTime;
use tower::ServiceExt;

use vetrina::application::catalog::CatalogService;
use vetrina::application::repos::{PageRequest, ProductDraft, ProductsRepo, RepoError};
use vetrina::cache::{CacheConfig, CatalogCache};
use vetrina::domain::entities::{ProductRecord, ReviewRecord};
use vetrina::infra::http::{ApiState, build_router};
use vetrina::reviews::{ReviewsClient, ReviewsError};

fn sample_product(id: i32, category: &str) -> ProductRecord {
    ProductRecord {
        id,
        category: category.to_string(),
        title: format!("Product {id}"),
        sub_title: String::new(),
        brand: "acme".to_string(),
        rating: 4,
        short_description: String::new(),
        description: String::new(),
        created_at: OffsetDateTime::UNIX_EPOCH,
        updated_at: OffsetDateTime::UNIX_EPOCH,
    }
}

fn sample_review(id: i32, product_id: i32) -> ReviewRecord {
    ReviewRecord {
        id,
        product_id,
        user_name: "reader".to_string(),
        title: "Great".to_string(),
        rating: 5,
        is_verified_purchase: true,
        is_helpful: true,
        is_abuse: false,
        description: "Would buy again".to_string(),
    }
}

#[derive(Default)]
struct InMemoryRepo {
    rows: RwLock<Vec<ProductRecord>>,
    next_id: AtomicI32,
    fail: AtomicBool,
}

impl InMemoryRepo {
    fn with_rows(rows: Vec<ProductRecord>) -> Self {
        let next_id = AtomicI32::new(rows.iter().map(|row| row.id).max().unwrap_or(0) + 1);
        Self {
            rows: RwLock::new(rows),
            next_id,
            fail: AtomicBool::new(false),
        }
    }

    fn fail_from_now_on(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), RepoError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(RepoError::Persistence("connection reset".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductsRepo for InMemoryRepo {
    async fn find_by_id(&self, id: i32) -> Result<Option<ProductRecord>, RepoError> {
        self.check()?;
        let rows = self.rows.read().expect("rows lock");
        Ok(rows.iter().find(|row| row.id == id).cloned())
    }

    async fn list(&self, request: PageRequest) -> Result<Vec<ProductRecord>, RepoError> {
        self.check()?;
        let rows = self.rows.read().expect("rows lock");
        Ok(rows
            .iter()
            .skip(request.offset() as usize)
            .take(request.size as usize)
            .cloned()
            .collect())
    }

    async fn list_by_category(
        &self,
        category: &str,
        request: PageRequest,
    ) -> Result<Vec<ProductRecord>, RepoError> {
        self.check()?;
        let rows = self.rows.read().expect("rows lock");
        Ok(rows
            .iter()
            .filter(|row| row.category == category)
            .skip(request.offset() as usize)
            .take(request.size as usize)
            .cloned()
            .collect())
    }

    async fn distinct_categories(&self) -> Result<Vec<String>, RepoError> {
        self.check()?;
        let rows = self.rows.read().expect("rows lock");
        let mut categories: Vec<String> = rows.iter().map(|row| row.category.clone()).collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    async fn upsert(&self, draft: ProductDraft) -> Result<ProductRecord, RepoError> {
        self.check()?;
        let mut rows = self.rows.write().expect("rows lock");
        let id = if draft.id == 0 {
            self.next_id.fetch_add(1, Ordering::SeqCst)
        } else {
            draft.id
        };
        let record = ProductRecord {
            id,
            category: draft.category,
            title: draft.title,
            sub_title: draft.sub_title,
            brand: draft.brand,
            rating: draft.rating,
            short_description: draft.short_description,
            description: draft.description,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        rows.retain(|row| row.id != id);
        rows.push(record.clone());
        Ok(record)
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), RepoError> {
        self.check()?;
        let mut rows = self.rows.write().expect("rows lock");
        rows.retain(|row| row.id != id);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), RepoError> {
        self.check()
    }
}

enum ReviewScript {
    Respond(Vec<ReviewRecord>),
    Fail,
}

struct ScriptedReviews(ReviewScript);

#[async_trait]
impl ReviewsClient for ScriptedReviews {
    async fn reviews_for_product(
        &self,
        _product_id: i32,
    ) -> Result<Vec<ReviewRecord>, ReviewsError> {
        match &self.0 {
            ReviewScript::Respond(reviews) => Ok(reviews.clone()),
            ReviewScript::Fail => Err(ReviewsError::Status(503)),
        }
    }
}

fn router_with(repo: Arc<InMemoryRepo>, reviews: ScriptedReviews) -> Router {
    let cache = Arc::new(CatalogCache::new(CacheConfig::default()));
    let catalog = Arc::new(CatalogService::new(repo, Arc::new(reviews), cache));
    build_router(ApiState { catalog })
}

fn seeded_router(rows: Vec<ProductRecord>) -> Router {
    router_with(
        Arc::new(InMemoryRepo::with_rows(rows)),
        ScriptedReviews(ReviewScript::Respond(Vec::new())),
    )
}

async fn send(router: &Router, method: Method, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should collect");
    (status, body.to_vec())
}

async fn send_json(router: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build");
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should collect");
    (status, body.to_vec())
}

fn as_json(body: &[u8]) -> serde_json::Value {
    serde_json::from_slice(body).expect("body should be JSON")
}

#[tokio::test]
async fn get_product_returns_product_with_reviews() {
    let router = router_with(
        Arc::new(InMemoryRepo::with_rows(vec![sample_product(1, "books")])),
        ScriptedReviews(ReviewScript::Respond(vec![sample_review(10, 1)])),
    );

    let (status, body) = send(&router, Method::GET, "/product/1").await;
    assert_eq!(status, StatusCode::OK);

    let json = as_json(&body);
    assert_eq!(json["id"], 1);
    assert_eq!(json["title"], "Product 1");
    assert_eq!(json["reviews"][0]["userName"], "reader");
    assert_eq!(json["reviews"][0]["isVerifiedPurchase"], true);
}

#[tokio::test]
async fn get_product_with_bad_id_is_rejected_with_empty_body() {
    let router = seeded_router(vec![sample_product(1, "books")]);

    let (status, body) = send(&router, Method::GET, "/product/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_empty());
}

#[tokio::test]
async fn get_missing_product_is_not_found() {
    let router = seeded_router(vec![sample_product(1, "books")]);

    let (status, body) = send(&router, Method::GET, "/product/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

#[tokio::test]
async fn review_failure_still_returns_the_product() {
    let router = router_with(
        Arc::new(InMemoryRepo::with_rows(vec![sample_product(1, "books")])),
        ScriptedReviews(ReviewScript::Fail),
    );

    let (status, body) = send(&router, Method::GET, "/product/1").await;
    assert_eq!(status, StatusCode::OK);

    let json = as_json(&body);
    assert_eq!(json["id"], 1);
    assert!(json.get("reviews").is_none());
}

#[tokio::test]
async fn store_failure_maps_to_expectation_failed() {
    let repo = Arc::new(InMemoryRepo::with_rows(vec![sample_product(1, "books")]));
    let router = router_with(
        repo.clone(),
        ScriptedReviews(ReviewScript::Respond(Vec::new())),
    );

    repo.fail_from_now_on();

    let (status, body) = send(&router, Method::GET, "/product/1").await;
    assert_eq!(status, StatusCode::EXPECTATION_FAILED);
    assert!(body.is_empty());
}

#[tokio::test]
async fn products_listing_defaults_to_first_ten() {
    let rows: Vec<ProductRecord> = (1..=15).map(|id| sample_product(id, "books")).collect();
    let router = seeded_router(rows);

    let (status, body) = send(&router, Method::GET, "/products").await;
    assert_eq!(status, StatusCode::OK);

    let json = as_json(&body);
    let items = json.as_array().expect("array body");
    assert_eq!(items.len(), 10);
    assert_eq!(items[0]["id"], 1);

    let (status, _) = send(&router, Method::GET, "/products/page/1").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&router, Method::GET, "/products/page/1/size/5").await;
    assert_eq!(status, StatusCode::OK);
    let json = as_json(&body);
    assert_eq!(json.as_array().expect("array body")[0]["id"], 6);
}

#[tokio::test]
async fn page_beyond_data_is_no_content() {
    let rows: Vec<ProductRecord> = (1..=15).map(|id| sample_product(id, "books")).collect();
    let router = seeded_router(rows);

    let (status, body) = send(&router, Method::GET, "/products/page/20/size/10").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
}

#[tokio::test]
async fn non_numeric_paging_is_rejected() {
    let router = seeded_router(vec![sample_product(1, "books")]);

    let (status, _) = send(&router, Method::GET, "/products/page/x/size/10").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&router, Method::GET, "/products/page/0/size/zero").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn categories_listing_and_empty_catalog() {
    let router = seeded_router(vec![
        sample_product(1, "books"),
        sample_product(2, "games"),
        sample_product(3, "books"),
    ]);

    let (status, body) = send(&router, Method::GET, "/products/category").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), serde_json::json!(["books", "games"]));

    let empty = seeded_router(Vec::new());
    let (status, body) = send(&empty, Method::GET, "/products/category").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

#[tokio::test]
async fn category_listing_pages_and_degrades_to_no_content() {
    let router = seeded_router(vec![
        sample_product(1, "books"),
        sample_product(2, "games"),
    ]);

    let (status, body) = send(&router, Method::GET, "/products/category/books").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body).as_array().expect("array body").len(), 1);

    let (status, _) = send(&router, Method::GET, "/products/category/music").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) =
        send(&router, Method::GET, "/products/category/books/page/5/size/10").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn save_assigns_an_id_and_the_product_becomes_readable() {
    let router = seeded_router(Vec::new());

    let (status, body) = send_json(
        &router,
        Method::POST,
        "/product",
        r#"{"category":"books","title":"Dune","subTitle":"sci-fi","brand":"acme","rating":5}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let json = as_json(&body);
    let id = json["id"].as_i64().expect("assigned id");
    assert!(id > 0);
    assert_eq!(json["subTitle"], "sci-fi");

    let (status, body) = send(&router, Method::GET, &format!("/product/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body)["title"], "Dune");
}

#[tokio::test]
async fn malformed_save_payload_is_rejected() {
    let router = seeded_router(Vec::new());

    let (status, body) = send_json(&router, Method::POST, "/product", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_empty());

    let (status, _) = send_json(
        &router,
        Method::POST,
        "/product",
        r#"{"category":"books","title":"Dune","rating":11}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_is_idempotent_and_bad_ids_are_rejected() {
    let router = seeded_router(vec![sample_product(1, "books")]);

    let (status, _) = send(&router, Method::DELETE, "/product/1").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&router, Method::DELETE, "/product/1").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&router, Method::GET, "/product/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&router, Method::DELETE, "/product/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn save_invalidates_the_listing_cache() {
    let rows: Vec<ProductRecord> = (1..=10).map(|id| sample_product(id, "books")).collect();
    let router = seeded_router(rows);

    let (status, body) = send(&router, Method::GET, "/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body).as_array().expect("array body").len(), 10);

    // Replace product 1; the cached first page must not survive the write.
    let (status, _) = send_json(
        &router,
        Method::POST,
        "/product",
        r#"{"id":1,"category":"books","title":"Renamed","rating":3}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&router, Method::GET, "/products").await;
    assert_eq!(status, StatusCode::OK);
    let json = as_json(&body);
    let renamed = json
        .as_array()
        .expect("array body")
        .iter()
        .find(|item| item["id"] == 1)
        .expect("product 1 present");
    assert_eq!(renamed["title"], "Renamed");
}

#[tokio::test]
async fn health_reflects_store_reachability() {
    let repo = Arc::new(InMemoryRepo::with_rows(Vec::new()));
    let router = router_with(
        repo.clone(),
        ScriptedReviews(ReviewScript::Respond(Vec::new())),
    );

    let (status, _) = send(&router, Method::GET, "/health").await;
    assert_eq!(status, StatusCode::OK);

    repo.fail_from_now_on();

    let (status, _) = send(&router, Method::GET, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
