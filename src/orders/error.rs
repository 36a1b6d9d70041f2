//! Order error types

use thiserror::Error;

/// Errors raised by order operations
#[derive(Error, Debug)]
pub enum OrderError {
    // === Client Errors ===
    #[error("{0}")]
    Validation(String),

    #[error("Order with id '{0}' was not found")]
    OrderNotFound(i64),

    #[error("OrderItem with id '{item_id}' was not found in Order '{order_id}'")]
    ItemNotFound { order_id: i64, item_id: i64 },

    #[error("Cannot {action} order with status '{status}'")]
    InvalidTransition {
        action: &'static str,
        status: super::models::OrderStatus,
    },

    // === System Errors ===
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for OrderError {
    fn from(errors: validator::ValidationErrors) -> Self {
        OrderError::Validation(format!("Invalid Order: {}", errors))
    }
}

impl OrderError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            OrderError::Validation(_) => "VALIDATION_ERROR",
            OrderError::OrderNotFound(_) => "ORDER_NOT_FOUND",
            OrderError::ItemNotFound { .. } => "ITEM_NOT_FOUND",
            OrderError::InvalidTransition { .. } => "INVALID_TRANSITION",
            OrderError::Database(_) => "DATABASE_ERROR",
            OrderError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_client_error(&self) -> bool {
        !matches!(self, OrderError::Database(_) | OrderError::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::models::OrderStatus;

    #[test]
    fn test_not_found_message() {
        let err = OrderError::OrderNotFound(99999);
        assert_eq!(err.to_string(), "Order with id '99999' was not found");
        assert_eq!(err.code(), "ORDER_NOT_FOUND");
    }

    #[test]
    fn test_transition_message() {
        let err = OrderError::InvalidTransition {
            action: "return",
            status: OrderStatus::Placed,
        };
        assert_eq!(err.to_string(), "Cannot return order with status 'placed'");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_system_errors_are_not_client_errors() {
        assert!(!OrderError::Internal("boom".into()).is_client_error());
        assert!(!OrderError::Database(sqlx::Error::PoolClosed).is_client_error());
    }
}
