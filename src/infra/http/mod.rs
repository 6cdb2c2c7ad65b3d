//! HTTP surface: router assembly and request handlers.

mod handlers;
mod middleware;
mod state;

pub use state::ApiState;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route(
            "/product/{id}",
            get(handlers::get_product).delete(handlers::delete_product),
        )
        .route("/product", post(handlers::save_product))
        .route("/products", get(handlers::list_products))
        .route("/products/page/{page}", get(handlers::list_products_page))
        .route(
            "/products/page/{page}/size/{size}",
            get(handlers::list_products_page_size),
        )
        .route("/products/category", get(handlers::list_categories))
        .route(
            "/products/category/{category}",
            get(handlers::list_by_category),
        )
        .route(
            "/products/category/{category}/page/{page}",
            get(handlers::list_by_category_page),
        )
        .route(
            "/products/category/{category}/page/{page}/size/{size}",
            get(handlers::list_by_category_page_size),
        )
        .route("/health", get(handlers::health))
        .layer(axum_middleware::from_fn(middleware::log_responses))
        .with_state(state)
}
