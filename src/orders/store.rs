//! Storage abstraction for orders
//!
//! Implementations:
//! - [`super::postgres::PgOrderStore`]: PostgreSQL via sqlx
//! - [`super::memory::MemoryOrderStore`]: process-local, used by tests and `storage: memory`

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;

use super::error::OrderError;
use super::models::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatus};

/// List filters. Every `Some` field must match (logical AND).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub customer_id: Option<i64>,
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        self.customer_id.is_none_or(|c| order.customer_id == c)
            && self.status.is_none_or(|s| order.status == s)
    }

    /// Human-readable summary of a list result, e.g.
    /// `Found 1 order(s) for customer 101 with status 'shipped'`
    pub fn describe(&self, count: usize) -> String {
        let mut msg = format!("Found {} order(s)", count);
        if let Some(customer_id) = self.customer_id {
            msg.push_str(&format!(" for customer {}", customer_id));
        }
        if let Some(status) = self.status {
            msg.push_str(&format!(" with status '{}'", status));
        }
        msg
    }
}

/// Persistence operations used by [`super::service::OrderService`].
///
/// Implementations keep items in ascending id order and return orders
/// from `list` in insertion (id) order.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Store name for logging
    fn name(&self) -> &'static str;

    /// Cheap liveness probe
    async fn ping(&self) -> Result<(), OrderError>;

    /// Insert an order and its items, assigning ids
    async fn insert(&self, order: NewOrder, created_at: DateTime<Utc>)
    -> Result<Order, OrderError>;

    async fn get(&self, order_id: i64) -> Result<Option<Order>, OrderError>;

    /// Persist order-level fields and the fields of its existing items.
    ///
    /// Returns `false` if the order no longer exists.
    async fn save(&self, order: &Order) -> Result<bool, OrderError>;

    /// Returns `true` if a row was removed
    async fn delete(&self, order_id: i64) -> Result<bool, OrderError>;

    /// Returns the number of orders removed
    async fn delete_all(&self) -> Result<u64, OrderError>;

    /// Stream matching orders in insertion order
    fn list(&self, filter: OrderFilter) -> BoxStream<'_, Result<Order, OrderError>>;

    /// Returns `None` if the order does not exist
    async fn insert_item(
        &self,
        order_id: i64,
        item: NewOrderItem,
    ) -> Result<Option<OrderItem>, OrderError>;

    async fn get_item(&self, item_id: i64) -> Result<Option<OrderItem>, OrderError>;

    /// Returns `false` if the item no longer exists
    async fn save_item(&self, item: &OrderItem) -> Result<bool, OrderError>;

    /// Returns `true` if a row was removed
    async fn delete_item(&self, item_id: i64) -> Result<bool, OrderError>;
}
