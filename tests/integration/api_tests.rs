//! Live API tests
//!
//! Require a running server on localhost:3000 seeded with `cargo run --bin seed`.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:3000";

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
async fn test_get_all_members() {
    let client = Client::new();

    let response = client
        .get(format!("{}/members", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore]
async fn test_get_all_books() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore]
async fn test_get_available_books() {
    let client = Client::new();

    let response = client
        .get(format!("{}/availableBooks", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore]
async fn test_borrow_and_return_book() {
    let client = Client::new();
    let loan = json!({
        "memberCode": "M002",
        "bookCode": "TW-11"
    });

    let response = client
        .post(format!("{}/borrowBook", BASE_URL))
        .json(&loan)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "Book borrowed successfully");

    let response = client
        .post(format!("{}/returnBook", BASE_URL))
        .json(&loan)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "Book returned successfully");
}

#[tokio::test]
#[ignore]
async fn test_return_unborrowed_book() {
    let client = Client::new();

    let response = client
        .post(format!("{}/returnBook", BASE_URL))
        .json(&json!({ "memberCode": "M003", "bookCode": "NRN-7" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}
