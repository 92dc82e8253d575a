//! Integration tests for the storefront cart over HTTP.
//!
//! Each test drives a fresh in-process storefront with a cookie-holding
//! client, so the cart persists across requests exactly as it would for a
//! browser session.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use plata_integration_tests::{CHECKOUT_ENDPOINT, TestServer};
use reqwest::{Client, StatusCode, header};
use serde_json::Value;

async fn add(client: &Client, server: &TestServer, name: &str, price: i64, tag: &str) -> Value {
    let price = price.to_string();
    let resp = client
        .post(server.url("/cart/add"))
        .form(&[("name", name), ("price", price.as_str()), ("tag", tag)])
        .send()
        .await
        .expect("Failed to add to cart");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["hx-trigger"], "cart-updated");
    resp.json().await.expect("Failed to parse cart view")
}

async fn cart(client: &Client, server: &TestServer) -> Value {
    client
        .get(server.url("/cart"))
        .send()
        .await
        .expect("Failed to get cart")
        .json()
        .await
        .expect("Failed to parse cart view")
}

// ============================================================================
// Cart Lifecycle
// ============================================================================

#[tokio::test]
async fn test_health() {
    let server = TestServer::start().await;
    let resp = server
        .client()
        .get(server.url("/health"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_jewelry_scenario() {
    let server = TestServer::start().await;
    let client = server.client();

    add(&client, &server, "Ring A", 15_000, "gold").await;
    add(&client, &server, "Ring A", 15_000, "gold").await;
    let view = add(&client, &server, "Necklace B", 8_000, "silver").await;

    let items = view["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], "Ring A");
    assert_eq!(items[0]["quantity"], 2);
    assert_eq!(items[0]["line_total"], 30_000);
    assert_eq!(items[1]["name"], "Necklace B");
    assert_eq!(items[1]["quantity"], 1);
    assert_eq!(items[1]["line_total"], 8_000);
    assert_eq!(view["total"], 38_000);
    assert_eq!(view["total_display"], "$38.000");
    assert_eq!(view["item_count"], 3);
    assert_eq!(view["line_count"], 2);

    // Re-fetched view matches the mutation response
    assert_eq!(cart(&client, &server).await, view);
}

#[tokio::test]
async fn test_carts_are_per_session() {
    let server = TestServer::start().await;
    let alice = server.client();
    let bob = server.client();

    add(&alice, &server, "Ring A", 15_000, "gold").await;

    let view = cart(&bob, &server).await;
    assert_eq!(view["line_count"], 0);

    let view = cart(&alice, &server).await;
    assert_eq!(view["line_count"], 1);
}

#[tokio::test]
async fn test_remove_keeps_order_and_ignores_stale_index() {
    let server = TestServer::start().await;
    let client = server.client();

    for name in ["a", "b", "c", "d"] {
        add(&client, &server, name, 1_000, "").await;
    }

    let view: Value = client
        .post(server.url("/cart/remove"))
        .form(&[("index", "2")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<&str> = view["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["a", "b", "d"]);

    let resp = client
        .post(server.url("/cart/remove"))
        .form(&[("index", "3")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let stale: Value = resp.json().await.unwrap();
    assert_eq!(stale, view);
}

#[tokio::test]
async fn test_count_badge() {
    let server = TestServer::start().await;
    let client = server.client();

    add(&client, &server, "Ring A", 15_000, "gold").await;
    add(&client, &server, "Ring A", 15_000, "gold").await;
    add(&client, &server, "Earrings C", 5_000, "").await;

    let count: Value = client
        .get(server.url("/cart/count"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(count["count"], 3);
}

#[tokio::test]
async fn test_clear() {
    let server = TestServer::start().await;
    let client = server.client();

    add(&client, &server, "Ring A", 15_000, "gold").await;
    let view: Value = client
        .post(server.url("/cart/clear"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(view["total"], 0);
    assert_eq!(view["items"].as_array().unwrap().len(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_on_one_session() {
    let server = TestServer::start().await;
    let client = server.client();

    // Establish the session cookie first
    add(&client, &server, "Ring A", 15_000, "gold").await;

    let requests: Vec<_> = (0..49)
        .map(|_| {
            let client = client.clone();
            let url = server.url("/cart/add");
            tokio::spawn(async move {
                client
                    .post(url)
                    .form(&[("name", "Ring A"), ("price", "15000"), ("tag", "gold")])
                    .send()
                    .await
                    .unwrap()
                    .status()
            })
        })
        .collect();
    for request in requests {
        assert_eq!(request.await.unwrap(), StatusCode::OK);
    }

    let view = cart(&client, &server).await;
    assert_eq!(view["line_count"], 1);
    assert_eq!(view["items"][0]["quantity"], 50);
    assert_eq!(view["total"], 750_000);
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_catalog_feeds_cart() {
    let server = TestServer::start().await;
    let client = server.client();

    let products: Value = client
        .get(server.url("/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let products = products.as_array().unwrap();
    assert_eq!(products.len(), 2);

    // Add each listed product the way its button would
    for product in products {
        add(
            &client,
            &server,
            product["name"].as_str().unwrap(),
            product["price"].as_i64().unwrap(),
            product["tag"].as_str().unwrap(),
        )
        .await;
    }

    let view: Value = client
        .post(server.url("/cart/add-product"))
        .form(&[("id", "1")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view["line_count"], 2);
    assert_eq!(view["items"][0]["quantity"], 2);
    assert_eq!(view["total"], 38_000);

    let resp = client.get(server.url("/products/99")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
async fn test_checkout_redirects_with_encoded_order() {
    let server = TestServer::start().await;
    let client = server.client();

    add(&client, &server, "Ring A", 15_000, "gold").await;
    add(&client, &server, "Ring A", 15_000, "gold").await;
    add(&client, &server, "Necklace & Chain #2", 8_000, "silver").await;

    let resp = client.post(server.url("/checkout")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let location = resp.headers()[header::LOCATION].to_str().unwrap();
    let encoded = location
        .strip_prefix(&format!("{CHECKOUT_ENDPOINT}?text="))
        .unwrap();
    assert!(!encoded.contains(['&', '#', ' ', '\n']));

    let message = urlencoding::decode(encoded).unwrap();
    assert!(message.contains("✨ Ring A x2 (gold) - $30.000"));
    assert!(message.contains("✨ Necklace & Chain #2 x1 (silver) - $8.000"));
    assert!(message.ends_with("💎 Total: $38.000"));

    // Cart is emptied after a successful checkout
    let view = cart(&client, &server).await;
    assert_eq!(view["line_count"], 0);
}

#[tokio::test]
async fn test_checkout_empty_cart_is_refused() {
    let server = TestServer::start().await;
    let client = server.client();

    let resp = client.post(server.url("/checkout")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.headers().get(header::LOCATION).is_none());
    assert_eq!(resp.text().await.unwrap(), "Your cart is empty");

    let view = cart(&client, &server).await;
    assert_eq!(view["line_count"], 0);
}
