//! Order domain models
//!
//! - [`Order`]: persisted order with its items
//! - [`OrderItem`]: product/quantity line belonging to one order
//! - [`OrderStatus`]: persisted lifecycle state
//! - [`StatusUpdate`]: status value accepted by update requests

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::error::OrderError;

// ============================================================================
// Status
// ============================================================================

/// Order lifecycle state.
///
/// Serialized lowercase. Parsing is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Placed,
    Shipped,
    Returned,
    Canceled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Placed,
        OrderStatus::Shipped,
        OrderStatus::Returned,
        OrderStatus::Canceled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Placed => "placed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Returned => "returned",
            OrderStatus::Canceled => "canceled",
        }
    }

    pub fn can_cancel(self) -> bool {
        self == OrderStatus::Placed
    }

    pub fn can_return(self) -> bool {
        self == OrderStatus::Shipped
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == lowered)
            .ok_or_else(|| OrderError::Validation(format!("Invalid status '{}'", lowered)))
    }
}

/// Status carried by an update request.
///
/// `Unchanged` is the UI's "leave it alone" choice and never reaches storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusUpdate {
    Unchanged,
    Set(OrderStatus),
}

impl StatusUpdate {
    /// Status to write, if any.
    pub fn target(self) -> Option<OrderStatus> {
        match self {
            StatusUpdate::Unchanged => None,
            StatusUpdate::Set(status) => Some(status),
        }
    }
}

impl FromStr for StatusUpdate {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("unchanged") {
            return Ok(StatusUpdate::Unchanged);
        }
        s.parse().map(StatusUpdate::Set)
    }
}

// ============================================================================
// Entities
// ============================================================================

/// Single product line of an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct OrderItem {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 1)]
    pub order_id: i64,
    #[schema(example = 42)]
    pub product_id: i64,
    #[schema(example = 3)]
    pub quantity: i32,
}

/// Customer order
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Order {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 101)]
    pub customer_id: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub shipped_at: Option<DateTime<Utc>>,
    /// Items in ascending id order; the first one is the primary item
    pub order_items: Vec<OrderItem>,
}

impl Order {
    /// Item addressed by the order-level `product_id`/`quantity` fields
    pub fn primary_item(&self) -> Option<&OrderItem> {
        self.order_items.first()
    }

    /// Apply a status transition, stamping `shipped_at` on first shipment.
    pub fn set_status(&mut self, status: OrderStatus, now: DateTime<Utc>) {
        self.status = status;
        if status == OrderStatus::Shipped && self.shipped_at.is_none() {
            self.shipped_at = Some(now);
        }
    }
}

/// Fields needed to insert a new order
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewOrder {
    pub customer_id: i64,
    pub status: OrderStatus,
    #[validate(nested)]
    pub items: Vec<NewOrderItem>,
}

/// Fields needed to insert a new item
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewOrderItem {
    pub product_id: i64,
    #[validate(range(min = 0, message = "quantity must not be negative"))]
    pub quantity: i32,
}

/// Partial update of an order; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct OrderPatch {
    pub customer_id: Option<i64>,
    pub status: Option<StatusUpdate>,
    pub product_id: Option<i64>,
    #[validate(range(min = 0, message = "quantity must not be negative"))]
    pub quantity: Option<i32>,
}

impl OrderPatch {
    pub fn touches_item(&self) -> bool {
        self.product_id.is_some() || self.quantity.is_some()
    }
}

/// Partial update of an item; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct ItemPatch {
    pub product_id: Option<i64>,
    #[validate(range(min = 0, message = "quantity must not be negative"))]
    pub quantity: Option<i32>,
}
