//! HTTP tests against the router backed by the in-memory store

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use library_server::{
    api::create_router,
    config::AppConfig,
    ledger::{Clock, LoanPolicy, ManualClock},
    models::{Book, Member},
    repository::MemoryStore,
    services::Services,
    AppState,
};

const NOW: i64 = 1_700_000_000;
const DAY: i64 = 24 * 60 * 60;

fn app(store: &MemoryStore, clock: &Arc<ManualClock>) -> Router {
    let services = Services::new(Arc::new(store.clone()), LoanPolicy::default(), clock.clone());
    create_router(AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(services),
    })
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post(app: &Router, uri: &str, body: String) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn loan_body(member: &str, book: &str) -> String {
    json!({ "memberCode": member, "bookCode": book }).to_string()
}

#[tokio::test]
async fn test_list_endpoints_return_arrays() {
    let store = MemoryStore::with_sample_data();
    let app = app(&store, &Arc::new(ManualClock::new(NOW)));

    let (status, members) = get(&app, "/members").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(members.as_array().unwrap().len(), 3);
    assert_eq!(members[0]["code"], "M001");
    assert_eq!(members[0]["borrowed_books_count"], 0);

    let (status, books) = get(&app, "/books").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(books.as_array().unwrap().len(), 5);

    let (status, available) = get(&app, "/availableBooks").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(available.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_empty_store_returns_empty_arrays() {
    let store = MemoryStore::new();
    let app = app(&store, &Arc::new(ManualClock::new(NOW)));

    for uri in ["/members", "/books", "/availableBooks"] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]), "{}", uri);
    }
}

#[tokio::test]
async fn test_borrow_and_return_scenario() {
    let store = MemoryStore::with_sample_data();
    let clock = Arc::new(ManualClock::new(NOW));
    let app = app(&store, &clock);

    let (status, text) = post(&app, "/borrowBook", loan_body("M002", "TW-11")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "Book borrowed successfully");
    assert_eq!(store.book("TW-11").await.unwrap().stock, 0);

    let (_, available) = get(&app, "/availableBooks").await;
    assert!(available.as_array().unwrap().iter().all(|b| b["code"] != "TW-11"));

    let (_, members) = get(&app, "/members").await;
    let ferry = members.as_array().unwrap().iter().find(|m| m["code"] == "M002").unwrap();
    assert_eq!(ferry["borrowed_books_count"], 1);

    let (status, text) = post(&app, "/borrowBook", loan_body("M001", "TW-11")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(error["error"], "OutOfStock");

    clock.advance(DAY);
    let (status, text) = post(&app, "/returnBook", loan_body("M002", "TW-11")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "Book returned successfully");
    assert_eq!(store.book("TW-11").await.unwrap().stock, 1);
    assert_eq!(store.member("M002").await.unwrap().penalty_until, None);
}

#[tokio::test]
async fn test_late_return_reports_penalty() {
    let store = MemoryStore::with_sample_data();
    let clock = Arc::new(ManualClock::new(NOW));
    let app = app(&store, &clock);

    // Borrowed eight days ago
    store.insert_loan("M003", "HOB-83", NOW - 8 * DAY).await;
    store.insert_book(Book::new("HOB-83", "The Hobbit, or There and Back Again", 0)).await;

    let (status, text) = post(&app, "/returnBook", loan_body("M003", "HOB-83")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "Book returned with penalty");

    let member = store.member("M003").await.unwrap();
    assert_eq!(member.penalty_until, Some(clock.now() + 3 * DAY));
    assert_eq!(store.book("HOB-83").await.unwrap().stock, 1);

    let (status, text) = post(&app, "/borrowBook", loan_body("M003", "JK-45")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(error["error"], "PenaltyActive");
}

#[tokio::test]
async fn test_borrow_limit_is_client_error() {
    let store = MemoryStore::with_sample_data();
    let app = app(&store, &Arc::new(ManualClock::new(NOW)));

    for book in ["JK-45", "SHR-1"] {
        let (status, _) = post(&app, "/borrowBook", loan_body("M001", book)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, text) = post(&app, "/borrowBook", loan_body("M001", "NRN-7")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(error["error"], "MaxBorrowsReached");
    assert_eq!(error["message"], "This member has already borrowed 2 books");
}

#[tokio::test]
async fn test_return_without_loan() {
    let store = MemoryStore::with_sample_data();
    store.insert_member(Member::new("M004", "Dewi")).await;
    let app = app(&store, &Arc::new(ManualClock::new(NOW)));

    let (status, text) = post(&app, "/returnBook", loan_body("M004", "TW-11")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(error["error"], "NoSuchLoan");
    assert_eq!(store.book("TW-11").await.unwrap().stock, 1);

    let (status, text) = post(&app, "/returnBook", loan_body("M001", "XX-0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(error["error"], "NoSuchLoan");
    assert_eq!(error["code"], 6);
}

#[tokio::test]
async fn test_malformed_bodies_are_rejected() {
    let store = MemoryStore::with_sample_data();
    let app = app(&store, &Arc::new(ManualClock::new(NOW)));

    let (status, _) = post(&app, "/borrowBook", r#"{"memberCode":"M001"}"#.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(&app, "/borrowBook", loan_body("", "TW-11")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(store.loans().await.is_empty());
}

#[tokio::test]
async fn test_health_and_ready() {
    let store = MemoryStore::new();
    let app = app(&store, &Arc::new(ManualClock::new(NOW)));

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["lending"]["max_open_loans"], 2);
    assert_eq!(body["lending"]["loan_period_days"], 7);
    assert_eq!(body["lending"]["penalty_days"], 3);

    let (status, body) = get(&app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_health_reports_configured_lending_rules() {
    let mut config = AppConfig::default();
    config.loans.max_open_loans = 4;
    config.loans.penalty_days = 5;
    let policy = LoanPolicy::from(&config.loans);

    let store = MemoryStore::new();
    let services = Services::new(Arc::new(store), policy, Arc::new(ManualClock::new(NOW)));
    let app = create_router(AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    });

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lending"]["max_open_loans"], 4);
    assert_eq!(body["lending"]["loan_period_days"], 7);
    assert_eq!(body["lending"]["penalty_days"], 5);
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let store = MemoryStore::new();
    let app = app(&store, &Arc::new(ManualClock::new(NOW)));

    let (status, doc) = get(&app, "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    for path in ["/members", "/books", "/availableBooks", "/borrowBook", "/returnBook"] {
        assert!(doc["paths"][path].is_object(), "missing {}", path);
    }
}
