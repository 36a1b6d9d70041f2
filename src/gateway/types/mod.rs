//! Gateway types module
//!
//! ## Input Types
//! - [`CreateOrderRequest`], [`UpdateOrderRequest`], [`ItemRequest`]: HTTP bodies
//! - [`ListOrdersQuery`]: list filters from the query string
//! - [`JsonBody`], [`ApiPath`], [`ApiQuery`]: Axum extractors with enveloped rejections
//!
//! ## Output Types
//! - [`OrderView`]: order as seen by clients
//! - [`ApiResponse<T>`]: Unified API response wrapper
//!
//! ## Submodules
//! - [`extract`]: Request extractors
//! - [`order`]: Order request/response types
//! - [`response`]: Response types and error codes

pub mod extract;
pub mod order;
pub mod response;

// Re-export commonly used types at module root
pub use extract::{ApiPath, ApiQuery, JsonBody};
pub use order::{
    CreateOrderRequest, GetOrderQuery, ItemRequest, ListOrdersQuery, OrderView,
    ReturnResponseData, UpdateOrderRequest,
};
pub use response::{
    ApiError, ApiResponse, ApiResult, CreatedResult, accepted, created, error_codes, no_content,
    ok, ok_with_msg,
};
