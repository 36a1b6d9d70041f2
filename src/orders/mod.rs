//! Order management module
//!
//! Domain types, storage backends and the [`OrderService`] that holds the
//! business rules (partial updates, filters, status transitions).

pub mod error;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use error::OrderError;
pub use memory::MemoryOrderStore;
pub use models::{
    ItemPatch, NewOrder, NewOrderItem, Order, OrderItem, OrderPatch, OrderStatus, StatusUpdate,
};
pub use postgres::PgOrderStore;
pub use service::{OrderResult, OrderService};
pub use store::{OrderFilter, OrderStore};
