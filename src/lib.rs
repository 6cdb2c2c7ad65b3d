//! Vetrina is a product-catalog read/write service. Reads are fronted by
//! process-local cache regions; single-product reads are enriched with
//! review data fetched from a separately deployed review service.
//!
//! Layering, leaf-first:
//!
//! - [`domain`]: entity records shared across layers.
//! - [`application`]: the catalog aggregation service and repository traits.
//! - [`cache`]: the catalog cache regions and their invalidation triggers.
//! - [`reviews`]: the review-service client capability.
//! - [`infra`]: Postgres adapters, the HTTP surface, telemetry bootstrap.
//! - [`config`]: layered settings (file → environment → CLI).

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
pub mod reviews;
