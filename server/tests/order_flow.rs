//! Order placement and lifecycle tests
//!
//! The heart of the suite: atomic stock decrement, all-or-nothing
//! multi-line orders, snapshot immutability, and owner scoping.

mod common;

use common::TestApp;
use http::StatusCode;
use serde_json::json;

async fn stock_of(app: &TestApp, token: &str, pid: &str) -> i64 {
    let res = app
        .request("GET", &format!("/api/products/{pid}"), Some(token), None, None)
        .await;
    assert_eq!(res.status, StatusCode::OK);
    res.body["stock"].as_i64().unwrap()
}

#[tokio::test]
async fn place_order_decrements_stock_and_totals() {
    let app = TestApp::spawn().await;
    let token = app.authed_user("alice").await;
    let kb = app.create_product(&token, "Keyboard", 80.0, 10).await;
    let mouse = app.create_product(&token, "Mouse", 25.5, 6).await;

    let res = app
        .request(
            "POST",
            "/api/orders",
            Some(&token),
            None,
            Some(json!({
                "nameOrder": "Office refresh",
                "description": "Desk gear",
                "items": [
                    { "productId": kb, "quantity": 2 },
                    { "productId": mouse, "quantity": 3 },
                ],
            })),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "order: {:?}", res.body);
    assert_eq!(res.body["name"], "Office refresh");
    assert_eq!(res.body["status"], "pending");
    assert_eq!(res.body["totalAmount"], 2.0 * 80.0 + 3.0 * 25.5);

    let items = res.body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], "Keyboard");
    assert_eq!(items[0]["price"], 80.0);
    assert_eq!(items[0]["quantity"], 2);
    assert_eq!(items[1]["name"], "Mouse");

    assert_eq!(stock_of(&app, &token, &kb).await, 8);
    assert_eq!(stock_of(&app, &token, &mouse).await, 3);
}

#[tokio::test]
async fn insufficient_stock_is_conflict_and_leaves_stock() {
    let app = TestApp::spawn().await;
    let token = app.authed_user("alice").await;
    let pid = app.create_product(&token, "Webcam", 60.0, 2).await;

    let res = app
        .request(
            "POST",
            "/api/orders",
            Some(&token),
            None,
            Some(json!({
                "nameOrder": "Too many",
                "items": [{ "productId": pid, "quantity": 3 }],
            })),
        )
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.body["code"], "E0004");

    assert_eq!(stock_of(&app, &token, &pid).await, 2);

    // Exactly the remaining stock still goes through
    let res = app
        .request(
            "POST",
            "/api/orders",
            Some(&token),
            None,
            Some(json!({
                "nameOrder": "All of it",
                "items": [{ "productId": pid, "quantity": 2 }],
            })),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(stock_of(&app, &token, &pid).await, 0);
}

#[tokio::test]
async fn multi_line_order_is_all_or_nothing() {
    let app = TestApp::spawn().await;
    let token = app.authed_user("alice").await;
    let plenty = app.create_product(&token, "Plenty", 10.0, 50).await;
    let scarce = app.create_product(&token, "Scarce", 99.0, 1).await;

    let res = app
        .request(
            "POST",
            "/api/orders",
            Some(&token),
            None,
            Some(json!({
                "nameOrder": "Mixed",
                "items": [
                    { "productId": plenty, "quantity": 5 },
                    { "productId": scarce, "quantity": 2 },
                ],
            })),
        )
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);

    // The successful line must have been rolled back too
    assert_eq!(stock_of(&app, &token, &plenty).await, 50);
    assert_eq!(stock_of(&app, &token, &scarce).await, 1);

    // And no order was recorded
    let list = app
        .request("GET", "/api/orders", Some(&token), None, None)
        .await;
    assert_eq!(list.body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn unknown_or_foreign_product_is_not_found() {
    let app = TestApp::spawn().await;
    let alice = app.authed_user("alice").await;
    let bob = app.authed_user("bob").await;
    let bobs = app.create_product(&bob, "Private", 10.0, 10).await;

    let res = app
        .request(
            "POST",
            "/api/orders",
            Some(&alice),
            None,
            Some(json!({
                "nameOrder": "Ghost",
                "items": [{ "productId": "product:doesnotexist", "quantity": 1 }],
            })),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    // Another user's product is just as invisible
    let res = app
        .request(
            "POST",
            "/api/orders",
            Some(&alice),
            None,
            Some(json!({
                "nameOrder": "Poach",
                "items": [{ "productId": bobs, "quantity": 1 }],
            })),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(stock_of(&app, &bob, &bobs).await, 10);
}

#[tokio::test]
async fn snapshots_survive_product_edits() {
    let app = TestApp::spawn().await;
    let token = app.authed_user("alice").await;
    let pid = app.create_product(&token, "Lamp", 30.0, 10).await;

    let order = app
        .request(
            "POST",
            "/api/orders",
            Some(&token),
            None,
            Some(json!({
                "nameOrder": "Lighting",
                "items": [{ "productId": pid, "quantity": 1 }],
            })),
        )
        .await;
    let oid = order.body["id"].as_str().unwrap().to_string();

    // Rename and reprice the product after the fact
    let upd = app
        .request(
            "PUT",
            &format!("/api/products/{pid}"),
            Some(&token),
            None,
            Some(json!({ "name": "Desk Lamp v2", "price": 45.0 })),
        )
        .await;
    assert_eq!(upd.status, StatusCode::OK);

    let res = app
        .request("GET", &format!("/api/orders/{oid}"), Some(&token), None, None)
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["items"][0]["name"], "Lamp");
    assert_eq!(res.body["items"][0]["price"], 30.0);
    assert_eq!(res.body["totalAmount"], 30.0);
}

#[tokio::test]
async fn status_updates_are_idempotent_and_do_not_restock() {
    let app = TestApp::spawn().await;
    let token = app.authed_user("alice").await;
    let pid = app.create_product(&token, "Chair", 120.0, 4).await;

    let order = app
        .request(
            "POST",
            "/api/orders",
            Some(&token),
            None,
            Some(json!({
                "nameOrder": "Seating",
                "items": [{ "productId": pid, "quantity": 2 }],
            })),
        )
        .await;
    let oid = order.body["id"].as_str().unwrap().to_string();
    assert_eq!(stock_of(&app, &token, &pid).await, 2);

    let res = app
        .request(
            "PUT",
            &format!("/api/orders/{oid}/status"),
            Some(&token),
            None,
            Some(json!({ "status": "completed" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "completed");

    // The new status is visible on the listing
    let list = app
        .request("GET", "/api/orders", Some(&token), None, None)
        .await;
    assert_eq!(list.body[0]["status"], "completed");

    let res = app
        .request(
            "PUT",
            &format!("/api/orders/{oid}/status"),
            Some(&token),
            None,
            Some(json!({ "status": "cancelled" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "cancelled");

    // Same transition again is a no-op success
    let res = app
        .request(
            "PUT",
            &format!("/api/orders/{oid}/status"),
            Some(&token),
            None,
            Some(json!({ "status": "cancelled" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "cancelled");

    // Cancelling never puts stock back
    assert_eq!(stock_of(&app, &token, &pid).await, 2);

    // Unknown statuses are rejected
    let res = app
        .request(
            "PUT",
            &format!("/api/orders/{oid}/status"),
            Some(&token),
            None,
            Some(json!({ "status": "shipped" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn orders_list_newest_first() {
    let app = TestApp::spawn().await;
    let token = app.authed_user("alice").await;
    let pid = app.create_product(&token, "Pen", 2.0, 100).await;

    for name in ["first", "second", "third"] {
        let res = app
            .request(
                "POST",
                "/api/orders",
                Some(&token),
                None,
                Some(json!({
                    "nameOrder": name,
                    "items": [{ "productId": pid, "quantity": 1 }],
                })),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED);
        // Millisecond timestamps need distinct ticks to order reliably
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let list = app
        .request("GET", "/api/orders", Some(&token), None, None)
        .await;
    let orders = list.body.as_array().unwrap();
    assert_eq!(orders.len(), 3);
    assert_eq!(orders[0]["name"], "third");
    assert_eq!(orders[2]["name"], "first");
}

#[tokio::test]
async fn bulk_delete_counts_only_own_orders() {
    let app = TestApp::spawn().await;
    let alice = app.authed_user("alice").await;
    let bob = app.authed_user("bob").await;

    let apid = app.create_product(&alice, "A-widget", 1.0, 10).await;
    let bpid = app.create_product(&bob, "B-widget", 1.0, 10).await;

    let a_order = app
        .request(
            "POST",
            "/api/orders",
            Some(&alice),
            None,
            Some(json!({
                "nameOrder": "mine",
                "items": [{ "productId": apid, "quantity": 1 }],
            })),
        )
        .await;
    let b_order = app
        .request(
            "POST",
            "/api/orders",
            Some(&bob),
            None,
            Some(json!({
                "nameOrder": "theirs",
                "items": [{ "productId": bpid, "quantity": 1 }],
            })),
        )
        .await;
    let a_oid = a_order.body["id"].as_str().unwrap().to_string();
    let b_oid = b_order.body["id"].as_str().unwrap().to_string();

    // Alice asks to delete both plus a malformed id; only hers counts
    let res = app
        .request(
            "DELETE",
            "/api/orders",
            Some(&alice),
            None,
            Some(json!({ "orderIds": [a_oid, b_oid.clone(), "not-an-id"] })),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["deletedCount"], 1);

    // Bob's order is still there
    let res = app
        .request("GET", &format!("/api/orders/{b_oid}"), Some(&bob), None, None)
        .await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn order_payload_validation() {
    let app = TestApp::spawn().await;
    let token = app.authed_user("alice").await;
    let pid = app.create_product(&token, "Desk", 200.0, 5).await;

    // Empty items
    let res = app
        .request(
            "POST",
            "/api/orders",
            Some(&token),
            None,
            Some(json!({ "nameOrder": "empty", "items": [] })),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    // Zero quantity
    let res = app
        .request(
            "POST",
            "/api/orders",
            Some(&token),
            None,
            Some(json!({
                "nameOrder": "zero",
                "items": [{ "productId": pid, "quantity": 0 }],
            })),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    // Id pointing at the wrong table
    let res = app
        .request(
            "POST",
            "/api/orders",
            Some(&token),
            None,
            Some(json!({
                "nameOrder": "wrong table",
                "items": [{ "productId": "user:alice", "quantity": 1 }],
            })),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}
