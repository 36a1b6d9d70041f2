//! HTTP handlers
//!
//! - [`health`]: liveness probe
//! - [`order`]: order CRUD, listing and status transitions
//! - [`item`]: order item sub-resource

pub mod health;
pub mod item;
pub mod order;

pub use health::{HealthResponse, health_check};
pub use item::{create_item, delete_item, get_item, list_items, update_item};
pub use order::{
    cancel_order, create_order, delete_all_orders, delete_order, get_order, list_orders,
    return_order, update_order,
};
