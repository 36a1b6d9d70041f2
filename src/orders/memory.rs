//! In-memory order store

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, BoxStream, StreamExt};

use super::error::OrderError;
use super::models::{NewOrder, NewOrderItem, Order, OrderItem};
use super::store::{OrderFilter, OrderStore};

#[derive(Debug)]
struct Inner {
    /// Keyed by order id, so iteration is insertion order
    orders: BTreeMap<i64, Order>,
    next_order_id: i64,
    next_item_id: i64,
}

/// Order store backed by a `BTreeMap` behind a lock
#[derive(Debug)]
pub struct MemoryOrderStore {
    inner: RwLock<Inner>,
}

impl Default for MemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                orders: BTreeMap::new(),
                next_order_id: 1,
                next_item_id: 1,
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, OrderError> {
        self.inner
            .read()
            .map_err(|_| OrderError::Internal("order store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, OrderError> {
        self.inner
            .write()
            .map_err(|_| OrderError::Internal("order store lock poisoned".to_string()))
    }
}

impl Inner {
    fn alloc_item(&mut self, order_id: i64, item: NewOrderItem) -> OrderItem {
        let id = self.next_item_id;
        self.next_item_id += 1;
        OrderItem {
            id,
            order_id,
            product_id: item.product_id,
            quantity: item.quantity,
        }
    }

    fn find_item_mut(&mut self, item_id: i64) -> Option<&mut OrderItem> {
        self.orders
            .values_mut()
            .flat_map(|o| o.order_items.iter_mut())
            .find(|i| i.id == item_id)
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), OrderError> {
        self.read().map(|_| ())
    }

    async fn insert(
        &self,
        order: NewOrder,
        created_at: DateTime<Utc>,
    ) -> Result<Order, OrderError> {
        let mut inner = self.write()?;
        let id = inner.next_order_id;
        inner.next_order_id += 1;

        let order_items = order
            .items
            .into_iter()
            .map(|item| inner.alloc_item(id, item))
            .collect();

        let mut stored = Order {
            id,
            customer_id: order.customer_id,
            status: order.status,
            created_at,
            shipped_at: None,
            order_items,
        };
        stored.set_status(order.status, created_at);
        inner.orders.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get(&self, order_id: i64) -> Result<Option<Order>, OrderError> {
        Ok(self.read()?.orders.get(&order_id).cloned())
    }

    async fn save(&self, order: &Order) -> Result<bool, OrderError> {
        let mut inner = self.write()?;
        let Some(stored) = inner.orders.get_mut(&order.id) else {
            return Ok(false);
        };
        stored.customer_id = order.customer_id;
        stored.status = order.status;
        stored.shipped_at = order.shipped_at;
        for item in &order.order_items {
            if let Some(existing) = stored.order_items.iter_mut().find(|i| i.id == item.id) {
                existing.product_id = item.product_id;
                existing.quantity = item.quantity;
            }
        }
        Ok(true)
    }

    async fn delete(&self, order_id: i64) -> Result<bool, OrderError> {
        Ok(self.write()?.orders.remove(&order_id).is_some())
    }

    async fn delete_all(&self) -> Result<u64, OrderError> {
        let mut inner = self.write()?;
        let count = inner.orders.len() as u64;
        inner.orders.clear();
        Ok(count)
    }

    fn list(&self, filter: OrderFilter) -> BoxStream<'_, Result<Order, OrderError>> {
        let snapshot: Result<Vec<Order>, OrderError> = self.read().map(|inner| {
            inner
                .orders
                .values()
                .filter(|o| filter.matches(o))
                .cloned()
                .collect()
        });
        match snapshot {
            Ok(orders) => stream::iter(orders.into_iter().map(Ok)).boxed(),
            Err(e) => stream::once(async move { Err(e) }).boxed(),
        }
    }

    async fn insert_item(
        &self,
        order_id: i64,
        item: NewOrderItem,
    ) -> Result<Option<OrderItem>, OrderError> {
        let mut inner = self.write()?;
        if !inner.orders.contains_key(&order_id) {
            return Ok(None);
        }
        let item = inner.alloc_item(order_id, item);
        if let Some(order) = inner.orders.get_mut(&order_id) {
            order.order_items.push(item.clone());
        }
        Ok(Some(item))
    }

    async fn get_item(&self, item_id: i64) -> Result<Option<OrderItem>, OrderError> {
        let inner = self.read()?;
        Ok(inner
            .orders
            .values()
            .flat_map(|o| o.order_items.iter())
            .find(|i| i.id == item_id)
            .cloned())
    }

    async fn save_item(&self, item: &OrderItem) -> Result<bool, OrderError> {
        let mut inner = self.write()?;
        match inner.find_item_mut(item.id) {
            Some(existing) => {
                existing.product_id = item.product_id;
                existing.quantity = item.quantity;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_item(&self, item_id: i64) -> Result<bool, OrderError> {
        let mut inner = self.write()?;
        for order in inner.orders.values_mut() {
            if let Some(pos) = order.order_items.iter().position(|i| i.id == item_id) {
                order.order_items.remove(pos);
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::models::OrderStatus;
    use futures::TryStreamExt;

    fn new_order(customer_id: i64, status: OrderStatus) -> NewOrder {
        NewOrder {
            customer_id,
            status,
            items: vec![NewOrderItem {
                product_id: 7,
                quantity: 2,
            }],
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = MemoryOrderStore::new();
        let a = store
            .insert(new_order(101, OrderStatus::Placed), Utc::now())
            .await
            .unwrap();
        let b = store
            .insert(new_order(102, OrderStatus::Placed), Utc::now())
            .await
            .unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(a.order_items[0].id, 1);
        assert_eq!(b.order_items[0].id, 2);
        assert_eq!(b.order_items[0].order_id, 2);
    }

    #[tokio::test]
    async fn test_insert_shipped_sets_shipped_at() {
        let store = MemoryOrderStore::new();
        let order = store
            .insert(new_order(101, OrderStatus::Shipped), Utc::now())
            .await
            .unwrap();
        assert!(order.shipped_at.is_some());
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let store = MemoryOrderStore::new();
        for customer in [103, 101, 102] {
            store
                .insert(new_order(customer, OrderStatus::Placed), Utc::now())
                .await
                .unwrap();
        }
        let orders: Vec<Order> = store
            .list(OrderFilter::default())
            .try_collect()
            .await
            .unwrap();
        let customers: Vec<i64> = orders.iter().map(|o| o.customer_id).collect();
        assert_eq!(customers, vec![103, 101, 102]);
    }

    #[tokio::test]
    async fn test_delete_removes_items_with_order() {
        let store = MemoryOrderStore::new();
        let order = store
            .insert(new_order(101, OrderStatus::Placed), Utc::now())
            .await
            .unwrap();
        let item_id = order.order_items[0].id;

        assert!(store.delete(order.id).await.unwrap());
        assert!(!store.delete(order.id).await.unwrap());
        assert!(store.get_item(item_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_item_into_missing_order() {
        let store = MemoryOrderStore::new();
        let item = store
            .insert_item(
                42,
                NewOrderItem {
                    product_id: 1,
                    quantity: 1,
                },
            )
            .await
            .unwrap();
        assert!(item.is_none());
    }
}
