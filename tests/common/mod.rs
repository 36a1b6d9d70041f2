//! Shared helpers: an in-memory router and a JSON request driver.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use order_service::gateway::{build_router, state::AppState};
use order_service::orders::{MemoryOrderStore, OrderService};

pub const API_KEY: &str = "test-api-key";

pub struct TestApp {
    router: Router,
    api_key: Option<String>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    /// Router over a fresh memory store with auth disabled
    pub fn open() -> Self {
        Self::build(None)
    }

    /// Router over a fresh memory store requiring [`API_KEY`]
    pub fn secured() -> Self {
        Self::build(Some(API_KEY))
    }

    fn build(api_key: Option<&str>) -> Self {
        let service = OrderService::new(Arc::new(MemoryOrderStore::new()));
        let state = Arc::new(AppState::new(service, api_key.map(str::to_string)));
        Self {
            router: build_router(state, "static"),
            api_key: api_key.map(str::to_string),
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(key) = &self.api_key {
            builder = builder.header("X-Api-Key", key);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn put_empty(&self, uri: &str) -> TestResponse {
        self.request(Method::PUT, uri, None).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }

    /// Create an order and return its id
    pub async fn create_order(&self, customer_id: i64, status: &str) -> i64 {
        let resp = self
            .post(
                "/orders",
                json!({
                    "customer_id": customer_id,
                    "product_id": 500 + customer_id,
                    "quantity": 1,
                    "status": status,
                }),
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "{}", resp.body);
        resp.body["data"]["id"].as_i64().unwrap()
    }

    /// Orders {1:101/placed, 2:102/shipped, 3:103/returned, 4:104/canceled}
    pub async fn seed_example_orders(&self) {
        for (customer_id, status) in [
            (101, "placed"),
            (102, "shipped"),
            (103, "returned"),
            (104, "canceled"),
        ] {
            self.create_order(customer_id, status).await;
        }
    }
}

pub fn ids(body: &Value) -> Vec<i64> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_i64().unwrap())
        .collect()
}
