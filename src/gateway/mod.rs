pub mod auth;
pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use std::path::Path;
use std::sync::Arc;

use axum::{
    Json, Router,
    http::{Method, StatusCode, Uri},
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, put},
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use state::AppState;
use types::{ApiResponse, error_codes};

/// Build the complete router.
///
/// `/orders/**` sits behind the API key middleware. `/health`, the UI and
/// the docs are public.
pub fn build_router(state: Arc<AppState>, static_dir: impl AsRef<Path>) -> Router {
    let static_dir = static_dir.as_ref();

    // ==========================================================================
    // Order Routes (API key required)
    // ==========================================================================
    let order_routes = Router::new()
        .route(
            "/orders",
            get(handlers::list_orders)
                .post(handlers::create_order)
                .delete(handlers::delete_all_orders),
        )
        .route(
            "/orders/{order_id}",
            get(handlers::get_order)
                .put(handlers::update_order)
                .delete(handlers::delete_order),
        )
        .route("/orders/{order_id}/cancel", put(handlers::cancel_order))
        .route("/orders/{order_id}/return", put(handlers::return_order))
        .route(
            "/orders/{order_id}/items",
            get(handlers::list_items).post(handlers::create_item),
        )
        .route(
            "/orders/{order_id}/items/{item_id}",
            get(handlers::get_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        )
        .layer(from_fn_with_state(state.clone(), auth::api_key_middleware));

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(order_routes)
        .with_state(state)
        // Browser UI
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(static_dir))
        // OpenAPI / Swagger UI (stateless, added after with_state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(route_not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn route_not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error(
            error_codes::ROUTE_NOT_FOUND,
            format!("No route for {}", uri.path()),
        )),
    )
}

async fn method_not_allowed(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ApiResponse::<()>::error(
            error_codes::METHOD_NOT_ALLOWED,
            format!("Method {} not allowed for {}", method, uri.path()),
        )),
    )
}

/// Bind and serve until the process is stopped
pub async fn run_server(config: &AppConfig, state: Arc<AppState>) -> anyhow::Result<()> {
    if state.auth_enabled() {
        tracing::info!("API key authentication enabled for /orders");
    } else {
        tracing::warn!("No API key configured, /orders is open to every caller");
    }

    let app = build_router(state, &config.server.static_dir);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to bind to {}: {} (port {} may already be in use)",
            addr,
            e,
            config.server.port
        )
    })?;

    tracing::info!("Order service listening on http://{}", addr);
    tracing::info!("API Docs: http://{}/docs", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
