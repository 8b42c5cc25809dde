#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tidytasks::config::Config;
use tidytasks::store::{JsonFileStore, TaskStore};
use tidytasks::task::TaskList;
use tidytasks::web::create_app;
use tower::ServiceExt;

/// Test context for endpoint tests backed by a tasks file in a temporary directory.
pub struct TestContext {
    // Kept so the tasks file is not removed.
    pub dir: TempDir,
    pub tasks_file: PathBuf,
    pub app: Router,
}

impl TestContext {
    /// Reads the tasks file back the same way the server does.
    pub async fn stored_tasks(&self) -> TaskList {
        JsonFileStore::new(&self.tasks_file)
            .load()
            .await
            .expect("Failed to load stored tasks")
    }

    /// Sends a request and returns status, `location` header and body text.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get("location")
            .map(|value| value.to_str().unwrap().to_string());
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        TestResponse {
            status,
            location,
            body: String::from_utf8(body.to_vec()).unwrap(),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    /// Posts a url-encoded form body to `/add`.
    pub async fn add(&self, form_body: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/add")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(form_body.to_string()))
            .unwrap();
        self.send(request).await
    }
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestResponse {
    pub fn assert_redirects_home(&self) {
        assert_eq!(self.status, StatusCode::SEE_OTHER, "body: {}", self.body);
        assert_eq!(self.location.as_deref(), Some("/"));
    }
}

/// Setup function for endpoint tests.
pub fn setup() -> TestContext {
    setup_with_config(|_| {})
}

pub fn setup_with_config(configure: impl FnOnce(&mut Config)) -> TestContext {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
    let dir = TempDir::new().expect("Failed to create temp dir");
    let tasks_file = dir.path().join("tasks.json");

    let mut config = Config {
        tasks_file: tasks_file.clone(),
        ..Config::default()
    };
    configure(&mut config);

    let store: Arc<dyn TaskStore> = Arc::new(JsonFileStore::new(&tasks_file));
    let app = create_app(Arc::new(config), store);
    TestContext {
        dir,
        tasks_file,
        app,
    }
}
