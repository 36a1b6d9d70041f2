use std::time::Instant;

use crate::orders::OrderService;

/// Gateway application state (shared)
pub struct AppState {
    /// Order business operations
    pub orders: OrderService,
    /// Expected `X-Api-Key`; `None` disables auth
    pub api_key: Option<String>,
    /// Process start, reported as uptime by `/health`
    pub started_at: Instant,
}

impl AppState {
    pub fn new(orders: OrderService, api_key: Option<String>) -> Self {
        Self {
            orders,
            api_key,
            started_at: Instant::now(),
        }
    }

    pub fn auth_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}
