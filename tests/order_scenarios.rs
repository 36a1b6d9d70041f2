//! End-to-end scenarios over the HTTP API, mirroring what a user does in
//! the browser UI: seed orders, filter, transition and edit items.

mod common;

use axum::http::{StatusCode, header};
use serde_json::json;

use common::{TestApp, ids};

#[tokio::test]
async fn scenario_filter_example_orders_by_status() {
    let app = TestApp::open();
    app.seed_example_orders().await;

    for (status, expected) in [("placed", 1), ("shipped", 2), ("returned", 3), ("canceled", 4)] {
        let resp = app.get(&format!("/orders?status={}", status)).await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(ids(&resp.body), vec![expected], "status={}", status);
        for order in resp.body["data"].as_array().unwrap() {
            assert_eq!(order["status"], status);
        }
    }
}

#[tokio::test]
async fn scenario_cancel_only_from_placed() {
    let app = TestApp::open();
    app.seed_example_orders().await;

    let resp = app.put_empty("/orders/1/cancel").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"]["status"], "canceled");

    // shipped order cannot be canceled and keeps its status
    let resp = app.put_empty("/orders/2/cancel").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["msg"], "Cannot cancel order with status 'shipped'");
    assert_eq!(app.get("/orders/2").await.body["data"]["status"], "shipped");

    assert_eq!(
        app.put_empty("/orders/77/cancel").await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn scenario_return_only_from_shipped() {
    let app = TestApp::open();
    app.seed_example_orders().await;

    let resp = app.put_empty("/orders/2/return").await;
    assert_eq!(resp.status, StatusCode::ACCEPTED);
    assert_eq!(resp.body["data"]["order_id"], 2);
    assert_eq!(resp.body["data"]["status"], "returned");

    let resp = app.put_empty("/orders/1/return").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["msg"], "Cannot return order with status 'placed'");
    assert_eq!(app.get("/orders/1").await.body["data"]["status"], "placed");
}

#[tokio::test]
async fn scenario_ship_sets_shipped_at_once() {
    let app = TestApp::open();
    let id = app.create_order(9, "placed").await;
    let uri = format!("/orders/{}", id);
    assert!(app.get(&uri).await.body["data"]["shipped_at"].is_null());

    let shipped = app.put(&uri, json!({"status": "shipped"})).await.body["data"]["shipped_at"].clone();
    assert!(!shipped.is_null());

    app.put(&uri, json!({"status": "returned"})).await;
    let again = app.put(&uri, json!({"status": "shipped"})).await;
    assert_eq!(again.body["data"]["shipped_at"], shipped);
}

#[tokio::test]
async fn scenario_manage_items() {
    let app = TestApp::open();
    let order_id = app.create_order(11, "placed").await;
    let items_uri = format!("/orders/{}/items", order_id);

    // add
    let resp = app
        .post(&items_uri, json!({"product_id": 900, "quantity": 5}))
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    let item_id = resp.body["data"]["id"].as_i64().unwrap();
    assert_eq!(resp.body["data"]["order_id"], order_id);
    assert_eq!(
        resp.headers.get(header::LOCATION).unwrap(),
        &format!("{}/{}", items_uri, item_id)
    );

    // list
    let resp = app.get(&items_uri).await;
    assert_eq!(resp.body["data"].as_array().unwrap().len(), 2);

    // update
    let item_uri = format!("{}/{}", items_uri, item_id);
    let resp = app.put(&item_uri, json!({"quantity": 0})).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"]["quantity"], 0);
    assert_eq!(resp.body["data"]["product_id"], 900);

    // get
    let resp = app.get(&item_uri).await;
    assert_eq!(resp.body["data"]["quantity"], 0);

    // delete, twice
    assert_eq!(app.delete(&item_uri).await.status, StatusCode::NO_CONTENT);
    assert_eq!(app.delete(&item_uri).await.status, StatusCode::NO_CONTENT);
    assert_eq!(app.get(&item_uri).await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        app.get(&items_uri).await.body["data"]
            .as_array()
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn scenario_items_respect_order_ownership() {
    let app = TestApp::open();
    let first = app.create_order(1, "placed").await;
    let second = app.create_order(2, "placed").await;

    let item_id = app.get(&format!("/orders/{}/items", first)).await.body["data"][0]["id"]
        .as_i64()
        .unwrap();
    let foreign = format!("/orders/{}/items/{}", second, item_id);

    assert_eq!(app.get(&foreign).await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        app.put(&foreign, json!({"quantity": 3})).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(app.delete(&foreign).await.status, StatusCode::NOT_FOUND);

    // item still belongs to the first order, untouched
    let resp = app
        .get(&format!("/orders/{}/items/{}", first, item_id))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"]["quantity"], 1);
}

#[tokio::test]
async fn scenario_item_validation() {
    let app = TestApp::open();
    let order_id = app.create_order(3, "placed").await;

    let resp = app
        .post(&format!("/orders/{}/items", order_id), json!({"quantity": 1}))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["msg"], "Invalid OrderItem: missing product_id");

    let resp = app
        .post("/orders/4040/items", json!({"product_id": 1, "quantity": 1}))
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn scenario_update_recreates_primary_item() {
    let app = TestApp::open();
    let order_id = app.create_order(5, "placed").await;
    let item_id = app.get(&format!("/orders/{}/items", order_id)).await.body["data"][0]["id"]
        .as_i64()
        .unwrap();
    app.delete(&format!("/orders/{}/items/{}", order_id, item_id))
        .await;

    let uri = format!("/orders/{}", order_id);
    let resp = app.put(&uri, json!({"quantity": 2})).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app
        .put(&uri, json!({"product_id": 77, "quantity": 2}))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"]["product_id"], 77);
    assert_eq!(resp.body["data"]["order_items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn scenario_delete_then_list() {
    let app = TestApp::open();
    app.seed_example_orders().await;

    app.delete("/orders/3").await;
    let resp = app.get("/orders").await;
    assert_eq!(ids(&resp.body), vec![1, 2, 4]);

    let resp = app.get("/orders?status=returned").await;
    assert!(ids(&resp.body).is_empty());
    assert_eq!(resp.body["msg"], "Found 0 order(s) with status 'returned'");
}
