//! API integration tests
//!
//! Run against a live server with a fresh data directory:
//! `cargo test -- --ignored`

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_create_and_get_item() {
    let client = Client::new();

    let response = client
        .post(format!("{}/items", BASE_URL))
        .json(&json!({
            "id": 9001,
            "title": "The Left Hand of Darkness",
            "author": "Le Guin",
            "genre": "SciFi"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let response = client
        .get(format!("{}/items/9001", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["title"], "The Left Hand of Darkness");
    assert_eq!(body["available"], true);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_item_rejected() {
    let client = Client::new();

    let item = json!({
        "id": 9002,
        "title": "Duplicate",
        "author": "Nobody",
        "genre": "Test"
    });

    let first = client
        .post(format!("{}/items", BASE_URL))
        .json(&item)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(first.status(), 201);

    let second = client
        .post(format!("{}/items", BASE_URL))
        .json(&item)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_search_item_by_title() {
    let client = Client::new();

    let _ = client
        .post(format!("{}/items", BASE_URL))
        .json(&json!({
            "id": 9003,
            "title": "A Wizard of Earthsea",
            "author": "Le Guin",
            "genre": "Fantasy"
        }))
        .send()
        .await;

    let response = client
        .get(format!("{}/items/search?title=a wizard of earthsea", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["id"], 9003);
}

#[tokio::test]
#[ignore]
async fn test_search_without_criterion_is_rejected() {
    let client = Client::new();

    let response = client
        .get(format!("{}/items/search", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_borrow_and_return_flow() {
    let client = Client::new();

    let _ = client
        .post(format!("{}/items", BASE_URL))
        .json(&json!({
            "id": 9100,
            "title": "Dune",
            "author": "Herbert",
            "genre": "SciFi"
        }))
        .send()
        .await;
    let _ = client
        .post(format!("{}/patrons", BASE_URL))
        .json(&json!({
            "id": 9107,
            "name": "Amy",
            "contact": "a@x.com"
        }))
        .send()
        .await;

    // borrow
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({ "patron_id": 9107, "item_id": 9100 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["item"]["available"], false);
    assert_eq!(body["item"]["borrower"], "Amy");

    // a second borrow of the same item must conflict
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({ "patron_id": 9107, "item_id": 9100 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // loan is visible from the patron side
    let response = client
        .get(format!("{}/patrons/9107/loans", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body[0]["id"], 9100);

    let response = client
        .get(format!(
            "{}/loans/status?patron_id=9107&item_id=9100",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["borrowed"], true);

    // return
    let response = client
        .post(format!("{}/loans/return", BASE_URL))
        .json(&json!({ "patron_id": 9107, "item_id": 9100 }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["item"]["available"], true);

    // a second return must conflict
    let response = client
        .post(format!("{}/loans/return", BASE_URL))
        .json(&json!({ "patron_id": 9107, "item_id": 9100 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_borrow_unknown_patron() {
    let client = Client::new();

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({ "patron_id": 424242, "item_id": 424242 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}
