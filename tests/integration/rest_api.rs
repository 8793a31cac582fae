// Test-specific lint overrides: integration tests use unwrap/expect freely,
// and some pedantic/nursery lints are not appropriate for test code.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::doc_markdown,
    clippy::missing_panics_doc,
    clippy::missing_docs_in_private_items
)]

//! Integration tests for the REST surface.
//!
//! Each test boots a real server on `127.0.0.1:0` with a scratch data
//! file and drives it over HTTP with reqwest, verifying:
//! - the route table and status codes of the API contract
//! - validation failures map to 400, unknown ids to 404
//! - ordering semantics (create, delete gaps, reorder) observable
//!   through the API
//! - durability: a second server over the same data file sees the same
//!   collection

use std::sync::Arc;

use serde_json::{Value, json};
use taskdeck_server::http::{self, AppState};
use taskdeck_server::storage::JsonStorage;
use taskdeck_server::store::TaskStore;

/// A running test server plus the scratch directory backing its data file.
struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
    // Held so the scratch directory outlives the server.
    _dir: Option<tempfile::TempDir>,
}

impl TestServer {
    /// Boots a server on an OS-assigned port with a fresh data file.
    async fn spawn() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let data_path = dir.path().join("tasks.json");
        let mut server = Self::spawn_at(&data_path).await;
        server._dir = Some(dir);
        server
    }

    /// Boots a server over an existing data file (restart scenario).
    async fn spawn_at(data_path: &std::path::Path) -> Self {
        let store = TaskStore::open(JsonStorage::new(data_path)).unwrap();
        let state = Arc::new(AppState::new(store));
        let (addr, handle) = http::start_server("127.0.0.1:0", state).await.unwrap();
        Self {
            base_url: format!("http://{addr}"),
            handle,
            _dir: None,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn task_body(title: &str) -> Value {
    json!({
        "title": title,
        "description": format!("{title} description"),
        "priority": "medium",
        "status": "pending",
        "dueDate": "2026-09-01",
    })
}

async fn create_task(client: &reqwest::Client, server: &TestServer, title: &str) -> Value {
    let response = client
        .post(server.url("/tasks"))
        .json(&task_body(title))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    response.json().await.unwrap()
}

// --- create ---

#[tokio::test]
async fn create_returns_201_with_store_assigned_fields() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let task = create_task(&client, &server, "First task").await;

    assert_eq!(task["title"], "First task");
    assert_eq!(task["priority"], "medium");
    assert_eq!(task["status"], "pending");
    assert_eq!(task["dueDate"], "2026-09-01");
    assert_eq!(task["order"], 0);
    assert!(task["id"].as_str().unwrap().len() == 36);
    assert_eq!(task["createdAt"], task["updatedAt"]);
}

#[tokio::test]
async fn create_rejects_empty_title_with_400() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut body = task_body("x");
    body["title"] = json!("");
    let response = client
        .post(server.url("/tasks"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn create_rejects_unknown_enum_value_with_400() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut body = task_body("x");
    body["priority"] = json!("urgent");
    let response = client
        .post(server.url("/tasks"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn create_rejects_missing_field_with_400() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/tasks"))
        .json(&json!({ "title": "only a title" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn create_rejects_caller_supplied_order_with_400() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut body = task_body("x");
    body["order"] = json!(7);
    let response = client
        .post(server.url("/tasks"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn create_rejects_unparseable_due_date_with_400() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut body = task_body("x");
    body["dueDate"] = json!("sometime soon");
    let response = client
        .post(server.url("/tasks"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

// --- list + filters ---

#[tokio::test]
async fn list_returns_tasks_in_creation_order() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    create_task(&client, &server, "a").await;
    create_task(&client, &server, "b").await;
    create_task(&client, &server, "c").await;

    let response = client.get(server.url("/tasks")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    let tasks: Vec<Value> = response.json().await.unwrap();
    let titles: Vec<&str> = tasks.iter().map(|t| t["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["a", "b", "c"]);
    let orders: Vec<i64> = tasks.iter().map(|t| t["order"].as_i64().unwrap()).collect();
    assert_eq!(orders, vec![0, 1, 2]);
}

#[tokio::test]
async fn list_title_filter_is_case_insensitive_substring() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    create_task(&client, &server, "Documentation").await;
    create_task(&client, &server, "write docs").await;
    create_task(&client, &server, "Deploy staging").await;

    let tasks: Vec<Value> = client
        .get(server.url("/tasks?title=doc"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let titles: Vec<&str> = tasks.iter().map(|t| t["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Documentation", "write docs"]);
}

#[tokio::test]
async fn list_combines_filters_conjunctively() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    create_task(&client, &server, "report alpha").await;
    let beta = create_task(&client, &server, "report beta").await;
    client
        .patch(server.url(&format!("/tasks/{}", beta["id"].as_str().unwrap())))
        .json(&json!({ "status": "in-progress" }))
        .send()
        .await
        .unwrap();

    let tasks: Vec<Value> = client
        .get(server.url("/tasks?title=report&status=in-progress"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "report beta");
}

#[tokio::test]
async fn list_with_invalid_status_filter_is_400() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let response = client
        .get(server.url("/tasks?status=archived"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

// --- get one ---

#[tokio::test]
async fn get_by_id_returns_the_task() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create_task(&client, &server, "fetch me").await;
    let id = created["id"].as_str().unwrap();

    let response = client
        .get(server.url(&format!("/tasks/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let task: Value = response.json().await.unwrap();
    assert_eq!(task, created);
}

#[tokio::test]
async fn get_unknown_id_is_404() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let response = client
        .get(server.url("/tasks/0198c5c3-0000-7000-8000-000000000000"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["code"], "NOT_FOUND");
}

#[tokio::test]
async fn get_non_uuid_id_is_404() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let response = client
        .get(server.url("/tasks/12345"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

// --- patch ---

#[tokio::test]
async fn patch_merges_fields_and_refreshes_updated_at() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create_task(&client, &server, "before").await;
    let id = created["id"].as_str().unwrap();

    let response = client
        .patch(server.url(&format!("/tasks/{id}")))
        .json(&json!({ "title": "after", "priority": "high" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let updated: Value = response.json().await.unwrap();

    assert_eq!(updated["title"], "after");
    assert_eq!(updated["priority"], "high");
    assert_eq!(updated["description"], created["description"]);
    assert_eq!(updated["status"], created["status"]);
    assert_eq!(updated["order"], created["order"]);
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert_ne!(updated["updatedAt"], created["updatedAt"]);
}

#[tokio::test]
async fn patch_unknown_id_is_404() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let response = client
        .patch(server.url("/tasks/0198c5c3-0000-7000-8000-000000000000"))
        .json(&json!({ "title": "anything" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn patch_rejects_empty_title_with_400() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create_task(&client, &server, "keep me").await;
    let id = created["id"].as_str().unwrap();

    let response = client
        .patch(server.url(&format!("/tasks/{id}")))
        .json(&json!({ "title": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    // The stored task is untouched.
    let task: Value = client
        .get(server.url(&format!("/tasks/{id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(task["title"], "keep me");
}

// --- delete ---

#[tokio::test]
async fn delete_returns_confirmation_then_404() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create_task(&client, &server, "doomed").await;
    let id = created["id"].as_str().unwrap();

    let response = client
        .delete(server.url(&format!("/tasks/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Task deleted successfully");

    let response = client
        .get(server.url(&format!("/tasks/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn delete_unknown_id_is_404() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let response = client
        .delete(server.url("/tasks/0198c5c3-0000-7000-8000-000000000000"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn delete_leaves_order_gap_and_create_uses_max() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    create_task(&client, &server, "a").await;
    let b = create_task(&client, &server, "b").await;
    create_task(&client, &server, "c").await;

    client
        .delete(server.url(&format!("/tasks/{}", b["id"].as_str().unwrap())))
        .send()
        .await
        .unwrap();

    let d = create_task(&client, &server, "d").await;
    assert_eq!(d["order"], 3);

    let tasks: Vec<Value> = client
        .get(server.url("/tasks"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let orders: Vec<i64> = tasks.iter().map(|t| t["order"].as_i64().unwrap()).collect();
    assert_eq!(orders, vec![0, 2, 3]);
}

// --- reorder ---

#[tokio::test]
async fn reorder_rewrites_positions_and_list_follows() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let a = create_task(&client, &server, "a").await;
    let b = create_task(&client, &server, "b").await;
    let c = create_task(&client, &server, "c").await;

    let response = client
        .post(server.url("/tasks/reorder"))
        .json(&json!({ "taskIds": [c["id"], a["id"], b["id"]] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let tasks: Vec<Value> = response.json().await.unwrap();
    let titles: Vec<&str> = tasks.iter().map(|t| t["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["c", "a", "b"]);
    let orders: Vec<i64> = tasks.iter().map(|t| t["order"].as_i64().unwrap()).collect();
    assert_eq!(orders, vec![0, 1, 2]);

    let listed: Vec<Value> = client
        .get(server.url("/tasks"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let listed_titles: Vec<&str> = listed
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(listed_titles, vec!["c", "a", "b"]);
}

#[tokio::test]
async fn reorder_with_unknown_id_is_404_and_mutates_nothing() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let a = create_task(&client, &server, "a").await;
    let b = create_task(&client, &server, "b").await;

    let response = client
        .post(server.url("/tasks/reorder"))
        .json(&json!({
            "taskIds": [b["id"], "0198c5c3-0000-7000-8000-000000000000", a["id"]],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let tasks: Vec<Value> = client
        .get(server.url("/tasks"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let titles: Vec<&str> = tasks.iter().map(|t| t["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["a", "b"]);
}

#[tokio::test]
async fn reorder_with_empty_sequence_is_400() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/tasks/reorder"))
        .json(&json!({ "taskIds": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

// --- durability ---

#[tokio::test]
async fn restarted_server_sees_the_same_collection() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("tasks.json");
    let client = reqwest::Client::new();

    let first_view: Vec<Value> = {
        let server = TestServer::spawn_at(&data_path).await;
        create_task(&client, &server, "a").await;
        create_task(&client, &server, "b").await;
        client
            .get(server.url("/tasks"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    };

    let server = TestServer::spawn_at(&data_path).await;
    let second_view: Vec<Value> = client
        .get(server.url("/tasks"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second_view, first_view);
}
