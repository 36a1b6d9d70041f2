//! Order Service - order management REST backend
//!
//! # Modules
//!
//! - [`config`] - YAML config with environment overrides
//! - [`logging`] - tracing subscriber setup
//! - [`db`] - PostgreSQL connection pool
//! - [`orders`] - Order domain, storage backends and business rules
//! - [`gateway`] - HTTP API (axum), auth, OpenAPI docs

pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod orders;

// Convenient re-exports at crate root
pub use config::AppConfig;
pub use orders::{Order, OrderError, OrderItem, OrderService, OrderStatus};
