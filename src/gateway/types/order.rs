//! Order request/response types for the REST API
//!
//! - `CreateOrderRequest` / `UpdateOrderRequest` / `ItemRequest`: HTTP bodies
//! - `ListOrdersQuery`: query string of `GET /orders`
//! - `OrderView`: order as returned to clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::orders::{
    ItemPatch, NewOrder, NewOrderItem, Order, OrderError, OrderFilter, OrderItem, OrderPatch,
    OrderStatus, StatusUpdate,
};

// ============================================================================
// Request Bodies
// ============================================================================

/// Create order request
///
/// Either the top-level `product_id`/`quantity` pair or a non-empty
/// `order_items` list must be given. The top-level pair becomes the first item.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    #[schema(example = 101)]
    pub customer_id: Option<i64>,
    #[schema(example = 42)]
    pub product_id: Option<i64>,
    #[schema(example = 2)]
    pub quantity: Option<i32>,
    /// placed | shipped | returned | canceled (default placed)
    #[schema(example = "placed")]
    pub status: Option<String>,
    #[serde(default)]
    pub order_items: Vec<ItemRequest>,
}

impl CreateOrderRequest {
    pub fn into_new_order(self) -> Result<NewOrder, OrderError> {
        let customer_id = self
            .customer_id
            .ok_or_else(|| missing("Order", "customer_id"))?;
        let status = match non_empty(self.status.as_deref()) {
            Some(s) => s.parse::<OrderStatus>()?,
            None => OrderStatus::default(),
        };

        let mut items = Vec::with_capacity(self.order_items.len() + 1);
        match (self.product_id, self.quantity) {
            (Some(product_id), Some(quantity)) => items.push(NewOrderItem {
                product_id,
                quantity,
            }),
            (Some(_), None) => return Err(missing("Order", "quantity")),
            (None, Some(_)) => return Err(missing("Order", "product_id")),
            (None, None) if self.order_items.is_empty() => {
                return Err(missing("Order", "product_id"));
            }
            (None, None) => {}
        }
        for item in self.order_items {
            items.push(item.into_new_item()?);
        }

        Ok(NewOrder {
            customer_id,
            status,
            items,
        })
    }
}

/// Update order request; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub customer_id: Option<i64>,
    /// A status, or "unchanged" to keep the current one
    #[schema(example = "shipped")]
    pub status: Option<String>,
    pub product_id: Option<i64>,
    pub quantity: Option<i32>,
}

impl UpdateOrderRequest {
    pub fn into_patch(self) -> Result<OrderPatch, OrderError> {
        let status = non_empty(self.status.as_deref())
            .map(str::parse::<StatusUpdate>)
            .transpose()?;
        Ok(OrderPatch {
            customer_id: self.customer_id,
            status,
            product_id: self.product_id,
            quantity: self.quantity,
        })
    }
}

/// Order item body, used for both create and update
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ItemRequest {
    #[schema(example = 42)]
    pub product_id: Option<i64>,
    #[schema(example = 1)]
    pub quantity: Option<i32>,
}

impl ItemRequest {
    pub fn into_new_item(self) -> Result<NewOrderItem, OrderError> {
        Ok(NewOrderItem {
            product_id: self
                .product_id
                .ok_or_else(|| missing("OrderItem", "product_id"))?,
            quantity: self
                .quantity
                .ok_or_else(|| missing("OrderItem", "quantity"))?,
        })
    }

    pub fn into_patch(self) -> ItemPatch {
        ItemPatch {
            product_id: self.product_id,
            quantity: self.quantity,
        }
    }
}

fn missing(entity: &str, field: &str) -> OrderError {
    OrderError::Validation(format!("Invalid {}: missing {}", entity, field))
}

/// Browser forms submit empty strings for untouched inputs
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

// ============================================================================
// Query
// ============================================================================

/// Filters for `GET /orders`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListOrdersQuery {
    /// Only orders of this customer
    pub customer_id: Option<String>,
    /// Only orders in this status
    pub status: Option<String>,
    /// `true` returns orders without their items
    pub o: Option<String>,
}

impl ListOrdersQuery {
    pub fn filter(&self) -> Result<OrderFilter, OrderError> {
        let customer_id = non_empty(self.customer_id.as_deref())
            .map(|raw| {
                raw.parse::<i64>().map_err(|_| {
                    OrderError::Validation(format!("Invalid customer_id '{}'", raw))
                })
            })
            .transpose()?;
        let status = non_empty(self.status.as_deref())
            .map(str::parse::<OrderStatus>)
            .transpose()?;
        Ok(OrderFilter {
            customer_id,
            status,
        })
    }

    pub fn orders_only(&self) -> bool {
        is_true(self.o.as_deref())
    }
}

/// Options for `GET /orders/{order_id}`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GetOrderQuery {
    /// `true` returns the order without its items
    pub o: Option<String>,
}

impl GetOrderQuery {
    pub fn orders_only(&self) -> bool {
        is_true(self.o.as_deref())
    }
}

fn is_true(flag: Option<&str>) -> bool {
    non_empty(flag).is_some_and(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

// ============================================================================
// Response Data
// ============================================================================

/// Order as returned by the API
///
/// `product_id`/`quantity` mirror the primary item. `order_items` is left out
/// when the caller asked for orders only.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderView {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 101)]
    pub customer_id: i64,
    pub status: OrderStatus,
    pub product_id: Option<i64>,
    pub quantity: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub shipped_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_items: Option<Vec<OrderItem>>,
}

impl OrderView {
    pub fn new(order: Order, with_items: bool) -> Self {
        let primary = order.primary_item().cloned();
        Self {
            id: order.id,
            customer_id: order.customer_id,
            status: order.status,
            product_id: primary.as_ref().map(|i| i.product_id),
            quantity: primary.as_ref().map(|i| i.quantity),
            created_at: order.created_at,
            shipped_at: order.shipped_at,
            order_items: with_items.then_some(order.order_items),
        }
    }
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        Self::new(order, true)
    }
}

/// Result of an accepted return request
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReturnResponseData {
    #[schema(example = 2)]
    pub order_id: i64,
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: Option<i64>, quantity: Option<i32>) -> ItemRequest {
        ItemRequest {
            product_id,
            quantity,
        }
    }

    #[test]
    fn test_create_requires_customer_id() {
        let req = CreateOrderRequest {
            product_id: Some(1),
            quantity: Some(1),
            ..Default::default()
        };
        let err = req.into_new_order().unwrap_err();
        assert_eq!(err.to_string(), "Invalid Order: missing customer_id");
    }

    #[test]
    fn test_create_requires_an_item() {
        let req = CreateOrderRequest {
            customer_id: Some(101),
            ..Default::default()
        };
        let err = req.into_new_order().unwrap_err();
        assert_eq!(err.to_string(), "Invalid Order: missing product_id");

        let req = CreateOrderRequest {
            customer_id: Some(101),
            product_id: Some(5),
            ..Default::default()
        };
        let err = req.into_new_order().unwrap_err();
        assert_eq!(err.to_string(), "Invalid Order: missing quantity");
    }

    #[test]
    fn test_create_top_level_item_comes_first() {
        let req = CreateOrderRequest {
            customer_id: Some(101),
            product_id: Some(5),
            quantity: Some(2),
            status: Some("Shipped".into()),
            order_items: vec![item(Some(6), Some(1))],
        };
        let order = req.into_new_order().unwrap();
        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].product_id, 5);
        assert_eq!(order.items[1].product_id, 6);
    }

    #[test]
    fn test_create_rejects_incomplete_item() {
        let req = CreateOrderRequest {
            customer_id: Some(101),
            order_items: vec![item(Some(6), None)],
            ..Default::default()
        };
        let err = req.into_new_order().unwrap_err();
        assert_eq!(err.to_string(), "Invalid OrderItem: missing quantity");
    }

    #[test]
    fn test_create_rejects_unchanged_status() {
        let req = CreateOrderRequest {
            customer_id: Some(101),
            product_id: Some(5),
            quantity: Some(2),
            status: Some("unchanged".into()),
            ..Default::default()
        };
        assert!(req.into_new_order().is_err());
    }

    #[test]
    fn test_update_status_sentinel_and_blank() {
        let patch = UpdateOrderRequest {
            status: Some("Unchanged".into()),
            ..Default::default()
        }
        .into_patch()
        .unwrap();
        assert_eq!(patch.status, Some(StatusUpdate::Unchanged));

        let patch = UpdateOrderRequest {
            status: Some("  ".into()),
            ..Default::default()
        }
        .into_patch()
        .unwrap();
        assert_eq!(patch.status, None);
    }

    #[test]
    fn test_list_query_parsing() {
        let query = ListOrdersQuery {
            customer_id: Some("101".into()),
            status: Some("SHIPPED".into()),
            o: Some("true".into()),
        };
        let filter = query.filter().unwrap();
        assert_eq!(filter.customer_id, Some(101));
        assert_eq!(filter.status, Some(OrderStatus::Shipped));
        assert!(query.orders_only());

        let query = ListOrdersQuery {
            customer_id: Some("abc".into()),
            ..Default::default()
        };
        assert_eq!(
            query.filter().unwrap_err().to_string(),
            "Invalid customer_id 'abc'"
        );

        let query = ListOrdersQuery {
            customer_id: Some(String::new()),
            o: Some("false".into()),
            ..Default::default()
        };
        assert_eq!(query.filter().unwrap().customer_id, None);
        assert!(!query.orders_only());
    }

    #[test]
    fn test_order_view_omits_items() {
        let order = Order {
            id: 1,
            customer_id: 101,
            status: OrderStatus::Placed,
            created_at: Utc::now(),
            shipped_at: None,
            order_items: vec![OrderItem {
                id: 3,
                order_id: 1,
                product_id: 42,
                quantity: 2,
            }],
        };

        let full = serde_json::to_value(OrderView::from(order.clone())).unwrap();
        assert_eq!(full["product_id"], 42);
        assert_eq!(full["order_items"][0]["id"], 3);

        let summary = serde_json::to_value(OrderView::new(order, false)).unwrap();
        assert_eq!(summary["quantity"], 2);
        assert!(summary.get("order_items").is_none());
    }
}
