//! PostgreSQL order store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{BoxStream, StreamExt};
use serde::Deserialize;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use super::error::OrderError;
use super::models::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatus};
use super::store::{OrderFilter, OrderStore};

const SCHEMA: [&str; 3] = [
    r#"CREATE TABLE IF NOT EXISTS orders (
           id          BIGSERIAL PRIMARY KEY,
           customer_id BIGINT NOT NULL,
           status      VARCHAR(16) NOT NULL DEFAULT 'placed'
                       CHECK (status IN ('placed', 'shipped', 'returned', 'canceled')),
           created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
           shipped_at  TIMESTAMPTZ
       )"#,
    r#"CREATE TABLE IF NOT EXISTS order_items (
           id         BIGSERIAL PRIMARY KEY,
           order_id   BIGINT NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
           product_id BIGINT NOT NULL,
           quantity   INTEGER NOT NULL CHECK (quantity >= 0)
       )"#,
    r#"CREATE INDEX IF NOT EXISTS idx_order_items_order_id ON order_items (order_id)"#,
];

/// Orders joined with their items aggregated as JSON, ascending item id.
/// Optional filters are NULL-able binds so the statement stays static.
const SELECT_ORDERS: &str = r#"
    SELECT o.id, o.customer_id, o.status, o.created_at, o.shipped_at,
           COALESCE(
               json_agg(
                   json_build_object(
                       'id', i.id,
                       'order_id', i.order_id,
                       'product_id', i.product_id,
                       'quantity', i.quantity
                   ) ORDER BY i.id
               ) FILTER (WHERE i.id IS NOT NULL),
               '[]'::json
           ) AS order_items
    FROM orders o
    LEFT JOIN order_items i ON i.order_id = o.id
    WHERE ($1::BIGINT IS NULL OR o.id = $1)
      AND ($2::BIGINT IS NULL OR o.customer_id = $2)
      AND ($3::TEXT IS NULL OR o.status = $3)
    GROUP BY o.id
    ORDER BY o.id"#;

#[derive(Debug, Deserialize)]
struct ItemRow {
    id: i64,
    order_id: i64,
    product_id: i64,
    quantity: i32,
}

impl From<ItemRow> for OrderItem {
    fn from(row: ItemRow) -> Self {
        OrderItem {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            quantity: row.quantity,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    customer_id: i64,
    status: String,
    created_at: DateTime<Utc>,
    shipped_at: Option<DateTime<Utc>>,
    order_items: Json<Vec<ItemRow>>,
}

impl OrderRow {
    fn into_order(self) -> Result<Order, OrderError> {
        let status: OrderStatus = self.status.parse().map_err(|_| {
            tracing::error!("Order {} has unknown status '{}'", self.id, self.status);
            OrderError::Internal(format!("corrupt status on order {}", self.id))
        })?;
        Ok(Order {
            id: self.id,
            customer_id: self.customer_id,
            status,
            created_at: self.created_at,
            shipped_at: self.shipped_at,
            order_items: self.order_items.0.into_iter().map(OrderItem::from).collect(),
        })
    }
}

/// Order store backed by the shared PostgreSQL pool
#[derive(Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create tables and indexes if they do not exist
    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        for ddl in SCHEMA {
            sqlx::query(ddl).execute(&self.pool).await?;
        }
        tracing::info!("Order schema initialized");
        Ok(())
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), OrderError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert(
        &self,
        order: NewOrder,
        created_at: DateTime<Utc>,
    ) -> Result<Order, OrderError> {
        let shipped_at = (order.status == OrderStatus::Shipped).then_some(created_at);

        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(
            r#"INSERT INTO orders (customer_id, status, created_at, shipped_at)
               VALUES ($1, $2, $3, $4) RETURNING id"#,
        )
        .bind(order.customer_id)
        .bind(order.status.as_str())
        .bind(created_at)
        .bind(shipped_at)
        .fetch_one(&mut *tx)
        .await?;
        let id: i64 = row.get("id");

        let mut order_items = Vec::with_capacity(order.items.len());
        for item in order.items {
            let row = sqlx::query(
                r#"INSERT INTO order_items (order_id, product_id, quantity)
                   VALUES ($1, $2, $3) RETURNING id"#,
            )
            .bind(id)
            .bind(item.product_id)
            .bind(item.quantity)
            .fetch_one(&mut *tx)
            .await?;
            order_items.push(OrderItem {
                id: row.get("id"),
                order_id: id,
                product_id: item.product_id,
                quantity: item.quantity,
            });
        }
        tx.commit().await?;

        Ok(Order {
            id,
            customer_id: order.customer_id,
            status: order.status,
            created_at,
            shipped_at,
            order_items,
        })
    }

    async fn get(&self, order_id: i64) -> Result<Option<Order>, OrderError> {
        let row: Option<OrderRow> = sqlx::query_as(SELECT_ORDERS)
            .bind(Some(order_id))
            .bind(None::<i64>)
            .bind(None::<&str>)
            .fetch_optional(&self.pool)
            .await?;
        row.map(OrderRow::into_order).transpose()
    }

    async fn save(&self, order: &Order) -> Result<bool, OrderError> {
        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query(
            r#"UPDATE orders SET customer_id = $2, status = $3, shipped_at = $4
               WHERE id = $1"#,
        )
        .bind(order.id)
        .bind(order.customer_id)
        .bind(order.status.as_str())
        .bind(order.shipped_at)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if updated == 0 {
            return Ok(false);
        }

        for item in &order.order_items {
            sqlx::query(
                r#"UPDATE order_items SET product_id = $2, quantity = $3
                   WHERE id = $1 AND order_id = $4"#,
            )
            .bind(item.id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(order.id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(true)
    }

    async fn delete(&self, order_id: i64) -> Result<bool, OrderError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(order_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self) -> Result<u64, OrderError> {
        let result = sqlx::query("DELETE FROM orders")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    fn list(&self, filter: OrderFilter) -> BoxStream<'_, Result<Order, OrderError>> {
        sqlx::query_as::<_, OrderRow>(SELECT_ORDERS)
            .bind(None::<i64>)
            .bind(filter.customer_id)
            .bind(filter.status.map(OrderStatus::as_str))
            .fetch(&self.pool)
            .map(|row| row.map_err(OrderError::from).and_then(OrderRow::into_order))
            .boxed()
    }

    async fn insert_item(
        &self,
        order_id: i64,
        item: NewOrderItem,
    ) -> Result<Option<OrderItem>, OrderError> {
        let row = sqlx::query(
            r#"INSERT INTO order_items (order_id, product_id, quantity)
               SELECT $1, $2, $3 WHERE EXISTS (SELECT 1 FROM orders WHERE id = $1)
               RETURNING id"#,
        )
        .bind(order_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| OrderItem {
            id: r.get("id"),
            order_id,
            product_id: item.product_id,
            quantity: item.quantity,
        }))
    }

    async fn get_item(&self, item_id: i64) -> Result<Option<OrderItem>, OrderError> {
        let row = sqlx::query(
            r#"SELECT id, order_id, product_id, quantity FROM order_items WHERE id = $1"#,
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| OrderItem {
            id: r.get("id"),
            order_id: r.get("order_id"),
            product_id: r.get("product_id"),
            quantity: r.get("quantity"),
        }))
    }

    async fn save_item(&self, item: &OrderItem) -> Result<bool, OrderError> {
        let result = sqlx::query(
            r#"UPDATE order_items SET product_id = $2, quantity = $3
               WHERE id = $1 AND order_id = $4"#,
        )
        .bind(item.id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.order_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_item(&self, item_id: i64) -> Result<bool, OrderError> {
        let result = sqlx::query("DELETE FROM order_items WHERE id = $1")
            .bind(item_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
