//! API integration tests

use std::time::Duration;

use bookshelf_api::{api::create_router, AppState};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

/// Start a server with an empty store on an ephemeral port and return its base URL
async fn spawn_app() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");
    let app = create_router(AppState::new());

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    format!("http://{}", addr)
}

fn book(name: &str, page_count: u32, read_page: u32, reading: bool) -> Value {
    json!({
        "name": name,
        "year": 2010,
        "author": "John Doe",
        "summary": "Lorem ipsum dolor sit amet",
        "publisher": "Dicoding Indonesia",
        "pageCount": page_count,
        "readPage": read_page,
        "reading": reading
    })
}

/// Create a book and return its id
async fn create_book(client: &Client, base: &str, body: &Value) -> String {
    let response = client
        .post(format!("{}/books", base))
        .json(body)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    body["data"]["bookId"]
        .as_str()
        .expect("No book id in response")
        .to_string()
}

async fn list_names(client: &Client, base: &str, query: &str) -> Vec<String> {
    let response = client
        .get(format!("{}/books{}", base, query))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    body["data"]["books"]
        .as_array()
        .expect("No books array")
        .iter()
        .map(|b| b["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/health", base))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_create_and_get_book() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/books", base))
        .json(&book("Buku A", 100, 100, false))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Buku berhasil ditambahkan");
    let id = body["data"]["bookId"].as_str().expect("No book id").to_string();
    assert_eq!(id.len(), 16);

    let response = client
        .get(format!("{}/books/{}", base, id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "success");

    let book = &body["data"]["book"];
    assert_eq!(book["id"], id.as_str());
    assert_eq!(book["name"], "Buku A");
    assert_eq!(book["year"], 2010);
    assert_eq!(book["pageCount"], 100);
    assert_eq!(book["readPage"], 100);
    assert_eq!(book["finished"], true);
    assert_eq!(book["reading"], false);
    assert!(book["insertedAt"].is_string());
    assert_eq!(book["insertedAt"], book["updatedAt"]);
}

#[tokio::test]
async fn test_create_without_name() {
    let base = spawn_app().await;
    let client = Client::new();

    let mut body = book("", 100, 200, false);
    body.as_object_mut().expect("object").remove("name");

    let response = client
        .post(format!("{}/books", base))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Gagal menambahkan buku. Mohon isi nama buku");
}

#[tokio::test]
async fn test_create_with_page_overflow() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/books", base))
        .json(&book("Buku A", 80, 90, false))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "fail");
    assert_eq!(
        body["message"],
        "Gagal menambahkan buku. readPage tidak boleh lebih besar dari pageCount"
    );
    assert!(list_names(&client, &base, "").await.is_empty());
}

#[tokio::test]
async fn test_malformed_payload() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/books", base))
        .json(&json!({ "name": "Buku A", "pageCount": -1 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "fail");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_list_projects_in_insertion_order() {
    let base = spawn_app().await;
    let client = Client::new();

    let first = create_book(&client, &base, &book("Dogs Life", 10, 0, false)).await;
    let second = create_book(&client, &base, &book("Catalog", 10, 0, false)).await;

    let response = client
        .get(format!("{}/books", base))
        .send()
        .await
        .expect("Failed to send request");

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "success");
    assert_eq!(
        body["data"]["books"],
        json!([
            { "id": first, "name": "Dogs Life", "publisher": "Dicoding Indonesia" },
            { "id": second, "name": "Catalog", "publisher": "Dicoding Indonesia" }
        ])
    );

    assert_eq!(list_names(&client, &base, "?name=dog").await, vec!["Dogs Life"]);
}

#[tokio::test]
async fn test_list_filter_precedence() {
    let base = spawn_app().await;
    let client = Client::new();

    create_book(&client, &base, &book("Harry", 10, 10, false)).await;
    create_book(&client, &base, &book("Potter", 10, 3, true)).await;

    assert_eq!(list_names(&client, &base, "?name=harry").await, vec!["Harry"]);
    assert_eq!(
        list_names(&client, &base, "?name=harry&reading=1").await,
        vec!["Harry"]
    );
    assert_eq!(list_names(&client, &base, "?reading=1").await, vec!["Potter"]);
    assert_eq!(
        list_names(&client, &base, "?reading=0&finished=0").await,
        vec!["Harry"]
    );
    assert_eq!(list_names(&client, &base, "?finished=1").await, vec!["Harry"]);
    assert_eq!(list_names(&client, &base, "?finished=0").await, vec!["Potter"]);
    assert_eq!(
        list_names(&client, &base, "?name=&finished=0").await,
        vec!["Potter"]
    );
}

#[tokio::test]
async fn test_update_book() {
    let base = spawn_app().await;
    let client = Client::new();

    let id = create_book(&client, &base, &book("A", 100, 100, false)).await;
    let before: Value = client
        .get(format!("{}/books/{}", base, id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    tokio::time::sleep(Duration::from_millis(10)).await;

    let response = client
        .put(format!("{}/books/{}", base, id))
        .json(&book("A revised", 100, 50, true))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Buku berhasil diperbarui");

    let after: Value = client
        .get(format!("{}/books/{}", base, id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let (before, after) = (&before["data"]["book"], &after["data"]["book"]);
    assert_eq!(after["name"], "A revised");
    assert_eq!(after["readPage"], 50);
    assert_eq!(after["reading"], true);
    assert_eq!(after["finished"], false);
    assert_eq!(after["insertedAt"], before["insertedAt"]);
    assert_ne!(after["updatedAt"], before["updatedAt"]);
}

#[tokio::test]
async fn test_update_errors() {
    let base = spawn_app().await;
    let client = Client::new();

    // Validation is reported even when the id does not exist
    let response = client
        .put(format!("{}/books/unknown", base))
        .json(&book("", 10, 1, false))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Gagal memperbarui buku. Mohon isi nama buku");

    let response = client
        .put(format!("{}/books/unknown", base))
        .json(&book("A", 10, 11, false))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["message"],
        "Gagal memperbarui buku. readPage tidak boleh lebih besar dari pageCount"
    );

    let response = client
        .put(format!("{}/books/unknown", base))
        .json(&book("A", 10, 1, false))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Gagal memperbarui buku. Id tidak ditemukan");
}

#[tokio::test]
async fn test_delete_book() {
    let base = spawn_app().await;
    let client = Client::new();

    let id = create_book(&client, &base, &book("A", 10, 1, false)).await;

    let response = client
        .delete(format!("{}/books/{}", base, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Buku berhasil dihapus");

    let response = client
        .get(format!("{}/books/{}", base, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Buku tidak ditemukan");

    let response = client
        .delete(format!("{}/books/{}", base, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Buku gagal dihapus. Id tidak ditemukan");
}

#[tokio::test]
async fn test_openapi_document() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api-docs/openapi.json", base))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["paths"]["/books"].is_object());
    assert!(body["paths"]["/books/{bookId}"].is_object());
}

#[tokio::test]
async fn test_list_with_repeated_parameter() {
    let base = spawn_app().await;
    let client = Client::new();

    create_book(&client, &base, &book("Harry", 10, 10, true)).await;
    create_book(&client, &base, &book("Potter", 10, 3, false)).await;

    let response = client
        .get(format!("{}/books?reading=1&reading=0", base))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["books"][0]["name"], "Harry");
    assert_eq!(body["data"]["books"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_list_flags_are_numeric() {
    let base = spawn_app().await;
    let client = Client::new();

    create_book(&client, &base, &book("Harry", 10, 10, true)).await;

    assert_eq!(list_names(&client, &base, "?reading=01").await, vec!["Harry"]);
    assert_eq!(list_names(&client, &base, "?finished=1.0").await, vec!["Harry"]);
    assert!(list_names(&client, &base, "?finished=%20").await.is_empty());
    assert!(list_names(&client, &base, "?reading=2").await.is_empty());
}

#[tokio::test]
async fn test_descriptive_fields_are_stored_as_sent() {
    let base = spawn_app().await;
    let client = Client::new();

    let mut body = book("X", 10, 1, false);
    body["year"] = json!("2010");
    body["publisher"] = json!(7);
    let id = create_book(&client, &base, &body).await;

    let body: Value = client
        .get(format!("{}/books/{}", base, id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(body["data"]["book"]["year"], "2010");
    assert_eq!(body["data"]["book"]["publisher"], 7);
}
