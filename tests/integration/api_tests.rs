//! API integration tests against a running server

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Unique suffix so reruns do not collide on tag names
fn unique(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

/// Helper to create a book and return its id
async fn create_book(client: &Client, title: &str) -> i64 {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": title,
            "author": "A",
            "publisher": "P",
            "published_date": "2024-01-15",
            "language_code": "En",
            "page_count": 100
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No book ID")
}

/// Number of tags named `name`; other tests may add tags concurrently
async fn tag_count(client: &Client, name: &str) -> usize {
    let body: Value = client
        .get(format!("{}/tags", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    body.as_array()
        .expect("Tags should be an array")
        .iter()
        .filter(|t| t["name"] == name)
        .count()
}

async fn create_tag(client: &Client, name: &str) -> i64 {
    let response = client
        .post(format!("{}/tags", BASE_URL))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No tag ID")
}

/// Attach tags by name and return the book body
async fn attach(client: &Client, book_id: i64, names: &[&str]) -> Value {
    let tags: Vec<Value> = names.iter().map(|name| json!({ "name": name })).collect();
    let response = client
        .post(format!("{}/books/{}/tags", BASE_URL, book_id))
        .json(&json!({ "tags": tags }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    response.json().await.expect("Failed to parse response")
}

async fn get_json(client: &Client, path: &str) -> Value {
    client
        .get(format!("{}{}", BASE_URL, path))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response")
}

/// Position of the entry with `id` in a list body
fn position(list: &Value, id: i64) -> usize {
    list.as_array()
        .expect("Expected an array")
        .iter()
        .position(|entry| entry["id"] == id)
        .expect("Entry missing from list")
}

fn tag_names(book: &Value) -> Vec<String> {
    book["tags"]
        .as_array()
        .expect("No tags in response")
        .iter()
        .map(|t| t["name"].as_str().expect("Tag without name").to_string())
        .collect()
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
async fn test_create_and_read_book() {
    let client = Client::new();
    let id = create_book(&client, &unique("Round trip")).await;

    let response = client
        .get(format!("{}/books/{}?with_tags=false", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["id"], id);
    assert_eq!(body["author"], "A");
    assert_eq!(body["published_date"], "2024-01-15");
    assert_eq!(body["page_count"], 100);
    assert!(body.get("tags").is_none());
}

#[tokio::test]
#[ignore]
async fn test_update_refreshes_fields() {
    let client = Client::new();
    let id = create_book(&client, &unique("Before")).await;

    let title = unique("After");
    let response = client
        .put(format!("{}/books/{}", BASE_URL, id))
        .json(&json!({
            "title": title,
            "author": "B",
            "publisher": "Q",
            "published_date": "2020-02-29",
            "language_code": "Fr",
            "page_count": 321
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["id"], id);
    assert_eq!(body["title"], title);
    assert_eq!(body["published_date"], "2020-02-29");
    assert_ne!(body["updated_at"], body["created_at"]);
}

#[tokio::test]
#[ignore]
async fn test_delete_book_twice() {
    let client = Client::new();
    let id = create_book(&client, &unique("Delete me")).await;

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error_code"], "book_not_found");
}

#[tokio::test]
#[ignore]
async fn test_get_missing_book() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books/{}", BASE_URL, i32::MAX))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body,
        json!({"message": "Book Not Found", "error_code": "book_not_found"})
    );
}

#[tokio::test]
#[ignore]
async fn test_duplicate_tag_leaves_count_unchanged() {
    let client = Client::new();
    let name = unique("Fiction");

    let response = client
        .post(format!("{}/tags", BASE_URL))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["id"].is_number());
    assert_eq!(body["name"], name);
    assert!(body["created_at"].is_string());

    assert_eq!(tag_count(&client, &name).await, 1);

    let response = client
        .post(format!("{}/tags", BASE_URL))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error_code"], "tag_exists");
    assert_eq!(tag_count(&client, &name).await, 1);
}

#[tokio::test]
#[ignore]
async fn test_attach_tags_reuses_existing() {
    let client = Client::new();
    let book_id = create_book(&client, &unique("Tagged")).await;
    let fiction = unique("Fiction");
    let adventure = unique("Adventure");

    let response = client
        .post(format!("{}/tags", BASE_URL))
        .json(&json!({ "name": fiction }))
        .send()
        .await
        .expect("Failed to send request");
    let existing: Value = response.json().await.expect("Failed to parse response");

    assert_eq!(tag_count(&client, &adventure).await, 0);

    let response = client
        .post(format!("{}/books/{}/tags", BASE_URL, book_id))
        .json(&json!({ "tags": [{ "name": fiction }, { "name": adventure }] }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let tags = body["tags"].as_array().expect("No tags in response");
    assert_eq!(tags.len(), 2);
    let reused = tags
        .iter()
        .find(|t| t["name"] == fiction)
        .expect("Existing tag not attached");
    assert_eq!(reused["id"], existing["id"]);

    // The existing tag is reused, only the new name created a row
    assert_eq!(tag_count(&client, &fiction).await, 1);
    assert_eq!(tag_count(&client, &adventure).await, 1);

    // Attaching again is a no-op
    let response = client
        .post(format!("{}/books/{}/tags", BASE_URL, book_id))
        .json(&json!({ "tags": [{ "name": fiction }] }))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["tags"].as_array().map(|t| t.len()), Some(2));
}

#[tokio::test]
#[ignore]
async fn test_attach_tags_to_missing_book() {
    let client = Client::new();

    let response = client
        .post(format!("{}/books/{}/tags", BASE_URL, i32::MAX))
        .json(&json!({ "tags": [{ "name": "Fiction" }] }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_books_listed_newest_first() {
    let client = Client::new();
    let older = create_book(&client, &unique("Older")).await;
    let newer = create_book(&client, &unique("Newer")).await;

    let list = get_json(&client, "/books?with_tags=false").await;
    assert!(position(&list, newer) < position(&list, older));
}

#[tokio::test]
#[ignore]
async fn test_tags_listed_newest_first() {
    let client = Client::new();
    let older = create_tag(&client, &unique("Older")).await;
    let newer = create_tag(&client, &unique("Newer")).await;

    let list = get_json(&client, "/tags").await;
    assert!(position(&list, newer) < position(&list, older));
}

#[tokio::test]
#[ignore]
async fn test_list_books_loads_each_books_own_tags() {
    let client = Client::new();
    let first = create_book(&client, &unique("First")).await;
    let second = create_book(&client, &unique("Second")).await;
    let poetry = unique("Poetry");
    let history = unique("History");

    attach(&client, first, &[poetry.as_str()]).await;
    attach(&client, second, &[history.as_str()]).await;

    // with_tags defaults to true
    let list = get_json(&client, "/books").await;
    let books = list.as_array().expect("Expected an array");

    assert_eq!(tag_names(&books[position(&list, first)]), vec![poetry]);
    assert_eq!(tag_names(&books[position(&list, second)]), vec![history]);
}

#[tokio::test]
#[ignore]
async fn test_deleting_tag_unlinks_it_from_books() {
    let client = Client::new();
    let book_id = create_book(&client, &unique("Unlinked")).await;
    let name = unique("Ephemeral");

    let book = attach(&client, book_id, &[name.as_str()]).await;
    let tag_id = book["tags"][0]["id"].as_i64().expect("No tag ID");

    let response = client
        .delete(format!("{}/tags/{}", BASE_URL, tag_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let book = get_json(&client, &format!("/books/{}", book_id)).await;
    assert_eq!(book["tags"], json!([]));
}

#[tokio::test]
#[ignore]
async fn test_deleting_book_keeps_its_tags() {
    let client = Client::new();
    let book_id = create_book(&client, &unique("Removed")).await;
    let name = unique("Survivor");

    let book = attach(&client, book_id, &[name.as_str()]).await;
    let tag_id = book["tags"][0]["id"].as_i64().expect("No tag ID");

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let tag = get_json(&client, &format!("/tags/{}", tag_id)).await;
    assert_eq!(tag["name"], name);

    let response = client
        .delete(format!("{}/tags/{}", BASE_URL, tag_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);
}
