//! API integration tests.
//!
//! These run against a live server and database:
//! `cargo run` in one terminal, then `cargo test -- --ignored`.

use chrono::{Duration, Utc};
use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Unique suffix so repeated runs do not trip the email uniqueness checks
fn unique() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}-{}", std::process::id(), nanos)
}

/// Register a fresh librarian and return an authenticated token
async fn register_and_login(client: &Client) -> String {
    let email = format!("desk-{}@example.org", unique());

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "first_name": "Test",
            "last_name": "Librarian",
            "email": email,
            "password": "correct horse battery",
            "repeat_password": "correct horse battery"
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": email,
            "password": "correct horse battery"
        }))
        .send()
        .await
        .expect("Failed to send login request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Create a member and return its id
async fn create_member(client: &Client, token: &str) -> i64 {
    let response = client
        .post(format!("{}/members", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "name": "Ada Reader",
            "email": format!("ada-{}@example.org", unique())
        }))
        .send()
        .await
        .expect("Failed to send create member request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse member response");
    body["id"].as_i64().expect("No member ID")
}

/// Create a book and return its id
async fn create_book(client: &Client, token: &str, quantity: i64, fee: i64) -> i64 {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "title": "The Pragmatic Borrower",
            "author": "A. Nony Mouse",
            "category": "Programming",
            "quantity": quantity,
            "borrowing_fee": fee
        }))
        .send()
        .await
        .expect("Failed to send create book request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse book response");
    body["id"].as_i64().expect("No book ID")
}

async fn get_book(client: &Client, token: &str, id: i64) -> Value {
    let response = client
        .get(format!("{}/books/{}", BASE_URL, id))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send get book request");
    assert!(response.status().is_success());
    response.json().await.expect("Failed to parse book response")
}

/// Amounts come back as decimal strings; quantities as numbers
fn as_f64(v: &Value) -> f64 {
    match v {
        Value::String(s) => s.parse().expect("non-numeric decimal string"),
        other => other.as_f64().expect("non-numeric value"),
    }
}

fn date_offset(days: i64) -> String {
    (Utc::now().date_naive() + Duration::days(days)).to_string()
}

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
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "nobody@example.org",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_book_status_follows_quantity() {
    let client = Client::new();
    let token = register_and_login(&client).await;

    let book_id = create_book(&client, &token, 0, 10).await;
    let book = get_book(&client, &token, book_id).await;
    assert_eq!(book["status"], "not-available");

    let response = client
        .put(format!("{}/books/{}", BASE_URL, book_id))
        .bearer_auth(&token)
        .json(&json!({
            "title": "The Pragmatic Borrower",
            "author": "A. Nony Mouse",
            "category": "Programming",
            "quantity": 3,
            "borrowing_fee": 10
        }))
        .send()
        .await
        .expect("Failed to send update request");
    assert!(response.status().is_success());

    let book = get_book(&client, &token, book_id).await;
    assert_eq!(book["status"], "available");
    assert_eq!(book["quantity"], 3);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_member_email_rejected() {
    let client = Client::new();
    let token = register_and_login(&client).await;

    let email = format!("dupe-{}@example.org", unique());
    for expected in [201, 409] {
        let response = client
            .post(format!("{}/members", BASE_URL))
            .bearer_auth(&token)
            .json(&json!({ "name": "Ada Reader", "email": email }))
            .send()
            .await
            .expect("Failed to send create member request");
        assert_eq!(response.status(), expected);
    }
}

#[tokio::test]
#[ignore]
async fn test_lend_decrements_quantity_and_settles_fee() {
    let client = Client::new();
    let token = register_and_login(&client).await;
    let member_id = create_member(&client, &token).await;
    let book_id = create_book(&client, &token, 2, 10).await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "member_id": member_id,
            "book_ids": [book_id],
            "return_date": date_offset(14),
            "fine": 5,
            "payment_method": "Cash"
        }))
        .send()
        .await
        .expect("Failed to send lend request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse lend response");
    assert_eq!(body["borrowed_ids"].as_array().unwrap().len(), 1);
    assert_eq!(as_f64(&body["amount"]), 10.0);
    assert!(body["transaction_id"].is_number());

    let book = get_book(&client, &token, book_id).await;
    assert_eq!(book["quantity"], 1);
    assert_eq!(book["status"], "available");
}

#[tokio::test]
#[ignore]
async fn test_lend_is_atomic_when_stock_runs_out() {
    let client = Client::new();
    let token = register_and_login(&client).await;
    let member_id = create_member(&client, &token).await;
    let book_id = create_book(&client, &token, 1, 10).await;

    // Two copies of a one-copy book: the whole request must fail
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "member_id": member_id,
            "book_ids": [book_id, book_id],
            "return_date": date_offset(14),
            "fine": 5,
            "payment_method": "Cash"
        }))
        .send()
        .await
        .expect("Failed to send lend request");
    assert_eq!(response.status(), 409);

    // Nothing committed: quantity unchanged, no ledger rows, no payments
    let book = get_book(&client, &token, book_id).await;
    assert_eq!(book["quantity"], 1);

    let loans: Value = client
        .get(format!("{}/loans", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list loans")
        .json()
        .await
        .expect("Failed to parse loans");
    assert_eq!(loans.as_array().unwrap().len(), 0);

    let payments: Value = client
        .get(format!("{}/payments", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list payments")
        .json()
        .await
        .expect("Failed to parse payments");
    assert_eq!(payments.as_array().unwrap().len(), 0);
}

#[tokio::test]
#[ignore]
async fn test_on_time_return_restocks_without_payment() {
    let client = Client::new();
    let token = register_and_login(&client).await;
    let member_id = create_member(&client, &token).await;
    let book_id = create_book(&client, &token, 1, 10).await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "member_id": member_id,
            "book_ids": [book_id],
            "return_date": date_offset(14),
            "fine": 5,
            "payment_method": "Card"
        }))
        .send()
        .await
        .expect("Failed to send lend request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse lend response");
    let loan_id = body["borrowed_ids"][0].as_i64().unwrap();

    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send return request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse return response");
    assert_eq!(body["record"]["returned"], true);

    let book = get_book(&client, &token, book_id).await;
    assert_eq!(book["quantity"], 1);

    // Only the lend-time fee settlement exists; returning created none
    let payments: Value = client
        .get(format!("{}/payments", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list payments")
        .json()
        .await
        .expect("Failed to parse payments");
    assert_eq!(payments.as_array().unwrap().len(), 1);

    // A second return attempt must be refused
    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send return request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_overdue_return_requires_fine_settlement() {
    let client = Client::new();
    let token = register_and_login(&client).await;
    let member_id = create_member(&client, &token).await;
    let book_id = create_book(&client, &token, 1, 10).await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "member_id": member_id,
            "book_ids": [book_id],
            "return_date": date_offset(-1),
            "fine": 25,
            "payment_method": "Cash"
        }))
        .send()
        .await
        .expect("Failed to send lend request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse lend response");
    let loan_id = body["borrowed_ids"][0].as_i64().unwrap();

    // On-time path fails closed on an overdue record
    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send return request");
    assert_eq!(response.status(), 409);

    // Settle the fine
    let response = client
        .post(format!("{}/loans/{}/settle-fine", BASE_URL, loan_id))
        .bearer_auth(&token)
        .json(&json!({ "payment_method": "Gpay" }))
        .send()
        .await
        .expect("Failed to send settle request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse settle response");
    assert_eq!(body["record"]["returned"], true);
    assert!(body["transaction_id"].is_number());

    // Settling twice must fail and must not restock a second copy
    let response = client
        .post(format!("{}/loans/{}/settle-fine", BASE_URL, loan_id))
        .bearer_auth(&token)
        .json(&json!({ "payment_method": "Gpay" }))
        .send()
        .await
        .expect("Failed to send settle request");
    assert_eq!(response.status(), 409);

    let book = get_book(&client, &token, book_id).await;
    assert_eq!(book["quantity"], 1);

    // Lend fee + fine: exactly two settlements, the fine one worth 25
    let payments: Value = client
        .get(format!("{}/payments", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list payments")
        .json()
        .await
        .expect("Failed to parse payments");
    let payments = payments.as_array().unwrap();
    assert_eq!(payments.len(), 2);
    assert!(payments.iter().any(|p| as_f64(&p["amount"]) == 25.0));
}

#[tokio::test]
#[ignore]
async fn test_borrow_limit_blocks_lending() {
    let client = Client::new();
    let token = register_and_login(&client).await;
    let member_id = create_member(&client, &token).await;
    let book_id = create_book(&client, &token, 5, 1).await;

    // Outstanding record with a fine over the limit; not overdue, still counts
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "member_id": member_id,
            "book_ids": [book_id],
            "return_date": date_offset(14),
            "fine": 600,
            "payment_method": "Cash"
        }))
        .send()
        .await
        .expect("Failed to send lend request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "member_id": member_id,
            "book_ids": [book_id],
            "return_date": date_offset(14),
            "fine": 5,
            "payment_method": "Cash"
        }))
        .send()
        .await
        .expect("Failed to send lend request");
    assert_eq!(response.status(), 422);

    let member: Value = client
        .get(format!("{}/members/{}", BASE_URL, member_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to get member")
        .json()
        .await
        .expect("Failed to parse member");
    assert_eq!(as_f64(&member["amount_due"]), 600.0);
}

#[tokio::test]
#[ignore]
async fn test_tenants_cannot_see_each_other() {
    let client = Client::new();
    let token_a = register_and_login(&client).await;
    let token_b = register_and_login(&client).await;

    let book_id = create_book(&client, &token_a, 3, 10).await;
    let member_id = create_member(&client, &token_a).await;

    // Correct primary keys, wrong tenant: identical NotFound either way
    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .bearer_auth(&token_b)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    let response = client
        .get(format!("{}/members/{}", BASE_URL, member_id))
        .bearer_auth(&token_b)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    // Mutations across the boundary are refused too
    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .bearer_auth(&token_b)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    // And tenant B's listings stay empty
    let books: Value = client
        .get(format!("{}/books", BASE_URL))
        .bearer_auth(&token_b)
        .send()
        .await
        .expect("Failed to list books")
        .json()
        .await
        .expect("Failed to parse books");
    assert_eq!(books.as_array().unwrap().len(), 0);
}

#[tokio::test]
#[ignore]
async fn test_stats_reflect_ledger_state() {
    let client = Client::new();
    let token = register_and_login(&client).await;
    let member_id = create_member(&client, &token).await;
    let book_id = create_book(&client, &token, 2, 10).await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "member_id": member_id,
            "book_ids": [book_id],
            "return_date": date_offset(-3),
            "fine": 40,
            "payment_method": "Card"
        }))
        .send()
        .await
        .expect("Failed to send lend request");
    assert_eq!(response.status(), 201);

    let stats: Value = client
        .get(format!("{}/stats", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to get stats")
        .json()
        .await
        .expect("Failed to parse stats");

    assert_eq!(stats["total_members"], 1);
    assert_eq!(stats["total_books"], 1);
    assert_eq!(stats["total_borrowed_books"], 1);
    assert_eq!(stats["total_overdue_books"], 1);
    assert_eq!(as_f64(&stats["total_amount"]), 10.0);
    assert_eq!(as_f64(&stats["overdue_amount"]), 40.0);
    assert_eq!(stats["recently_added_books"].as_array().unwrap().len(), 1);
}
