//! Order business operations
//!
//! All state lives in the [`OrderStore`]; the service validates input,
//! merges partial updates and enforces status transitions.

use std::sync::Arc;

use chrono::Utc;
use futures::stream::BoxStream;
use validator::Validate;

use super::error::OrderError;
use super::models::{
    ItemPatch, NewOrder, NewOrderItem, Order, OrderItem, OrderPatch, OrderStatus,
};
use super::store::{OrderFilter, OrderStore};

pub type OrderResult<T> = Result<T, OrderError>;

#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn OrderStore>,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    pub async fn ping(&self) -> OrderResult<()> {
        self.store.ping().await
    }

    // ========================================================================
    // Orders
    // ========================================================================

    pub async fn create(&self, new_order: NewOrder) -> OrderResult<Order> {
        new_order.validate()?;
        tracing::info!(
            "Creating order for customer {} with status {}",
            new_order.customer_id,
            new_order.status
        );
        let order = self.store.insert(new_order, Utc::now()).await?;
        tracing::info!("Order {} created", order.id);
        Ok(order)
    }

    pub async fn retrieve(&self, order_id: i64) -> OrderResult<Order> {
        tracing::debug!("Processing lookup for order {}", order_id);
        self.store
            .get(order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))
    }

    /// Merge `patch` into the stored order.
    ///
    /// `product_id`/`quantity` address the primary item. If the order has no
    /// items left, both must be given and a new primary item is created.
    pub async fn update(&self, order_id: i64, patch: OrderPatch) -> OrderResult<Order> {
        patch.validate()?;
        let mut order = self.retrieve(order_id).await?;

        if let Some(customer_id) = patch.customer_id {
            order.customer_id = customer_id;
        }
        if let Some(status) = patch.status.and_then(|s| s.target()) {
            order.set_status(status, Utc::now());
        }

        let mut new_primary = None;
        if patch.touches_item() {
            match order.order_items.first_mut() {
                Some(item) => {
                    if let Some(product_id) = patch.product_id {
                        item.product_id = product_id;
                    }
                    if let Some(quantity) = patch.quantity {
                        item.quantity = quantity;
                    }
                }
                None => match (patch.product_id, patch.quantity) {
                    (Some(product_id), Some(quantity)) => {
                        new_primary = Some(NewOrderItem {
                            product_id,
                            quantity,
                        });
                    }
                    _ => {
                        return Err(OrderError::Validation(
                            "Invalid Order: order has no item, both product_id and quantity are required"
                                .to_string(),
                        ));
                    }
                },
            }
        }

        tracing::info!("Saving order {}", order_id);
        if !self.store.save(&order).await? {
            return Err(OrderError::OrderNotFound(order_id));
        }
        if let Some(item) = new_primary {
            let item = self
                .store
                .insert_item(order_id, item)
                .await?
                .ok_or(OrderError::OrderNotFound(order_id))?;
            order.order_items.push(item);
        }
        Ok(order)
    }

    /// Remove an order and its items. Absence is not an error.
    pub async fn delete(&self, order_id: i64) -> OrderResult<()> {
        if self.store.delete(order_id).await? {
            tracing::info!("Order {} deleted", order_id);
        } else {
            tracing::debug!("Delete of absent order {} ignored", order_id);
        }
        Ok(())
    }

    pub async fn delete_all(&self) -> OrderResult<u64> {
        let count = self.store.delete_all().await?;
        tracing::info!("Deleted {} order(s)", count);
        Ok(count)
    }

    /// Stream orders matching every filter, in insertion order
    pub fn list(&self, filter: OrderFilter) -> BoxStream<'_, OrderResult<Order>> {
        tracing::info!(
            "Processing order query customer_id={:?} status={:?}",
            filter.customer_id,
            filter.status
        );
        self.store.list(filter)
    }

    pub async fn cancel(&self, order_id: i64) -> OrderResult<Order> {
        self.transition(order_id, "cancel", OrderStatus::can_cancel, OrderStatus::Canceled)
            .await
    }

    pub async fn return_order(&self, order_id: i64) -> OrderResult<Order> {
        self.transition(order_id, "return", OrderStatus::can_return, OrderStatus::Returned)
            .await
    }

    async fn transition(
        &self,
        order_id: i64,
        action: &'static str,
        allowed: fn(OrderStatus) -> bool,
        target: OrderStatus,
    ) -> OrderResult<Order> {
        let mut order = self.retrieve(order_id).await?;
        if !allowed(order.status) {
            tracing::warn!(
                "Rejected {} of order {} in status {}",
                action,
                order_id,
                order.status
            );
            return Err(OrderError::InvalidTransition {
                action,
                status: order.status,
            });
        }
        order.set_status(target, Utc::now());
        if !self.store.save(&order).await? {
            return Err(OrderError::OrderNotFound(order_id));
        }
        tracing::info!("Order {} is now {}", order_id, target);
        Ok(order)
    }

    // ========================================================================
    // Items
    // ========================================================================

    pub async fn add_item(&self, order_id: i64, item: NewOrderItem) -> OrderResult<OrderItem> {
        item.validate()?;
        let item = self
            .store
            .insert_item(order_id, item)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))?;
        tracing::info!("Item {} added to order {}", item.id, order_id);
        Ok(item)
    }

    pub async fn list_items(&self, order_id: i64) -> OrderResult<Vec<OrderItem>> {
        Ok(self.retrieve(order_id).await?.order_items)
    }

    pub async fn get_item(&self, order_id: i64, item_id: i64) -> OrderResult<OrderItem> {
        self.retrieve(order_id)
            .await?
            .order_items
            .into_iter()
            .find(|i| i.id == item_id)
            .ok_or(OrderError::ItemNotFound { order_id, item_id })
    }

    pub async fn update_item(
        &self,
        order_id: i64,
        item_id: i64,
        patch: ItemPatch,
    ) -> OrderResult<OrderItem> {
        patch.validate()?;
        let mut item = self.get_item(order_id, item_id).await?;
        if let Some(product_id) = patch.product_id {
            item.product_id = product_id;
        }
        if let Some(quantity) = patch.quantity {
            item.quantity = quantity;
        }
        if !self.store.save_item(&item).await? {
            return Err(OrderError::ItemNotFound { order_id, item_id });
        }
        tracing::info!("Item {} of order {} updated", item_id, order_id);
        Ok(item)
    }

    /// Remove an item from an order.
    ///
    /// Absent items are ignored; an item that belongs to another order is
    /// reported as not found in this one.
    pub async fn delete_item(&self, order_id: i64, item_id: i64) -> OrderResult<()> {
        let order = self.retrieve(order_id).await?;
        if order.order_items.iter().any(|i| i.id == item_id) {
            self.store.delete_item(item_id).await?;
            tracing::info!("Item {} removed from order {}", item_id, order_id);
            return Ok(());
        }
        match self.store.get_item(item_id).await? {
            Some(_) => Err(OrderError::ItemNotFound { order_id, item_id }),
            None => Ok(()),
        }
    }
}
