use axum::Router;
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::response::Html;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::store::{JsonFileStore, StoreError, TaskStore};
use crate::task::web::{TaskState, create_task_router};

pub mod middleware;

use middleware::{FaultDetail, fault_detail_middleware};

/// Custom error type for web handler operations.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// Represents an error during template rendering.
    /// The specific `askama::Error` is captured as the source of this error.
    #[error("Template rendering failed")]
    Template(#[from] askama::Error),
    /// The task store could not be read or written.
    #[error("Task store failed")]
    Store(#[from] StoreError),
}

impl axum::response::IntoResponse for WebError {
    fn into_response(self) -> axum::response::Response {
        let detail = FaultDetail::from_error(&self);
        tracing::error!(error = %detail, "Request failed");

        let user_facing_error_message =
            "An unexpected error occurred while processing your request. Please try again later.";
        let mut response = (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(format!(
                "<h1>Internal Server Error</h1><p>{}</p>",
                user_facing_error_message
            )),
        )
            .into_response();
        response.extensions_mut().insert(detail);
        response
    }
}

/// Builds the full application router around the given store.
pub fn create_app(config: Arc<Config>, store: Arc<dyn TaskStore>) -> Router {
    let task_router = create_task_router(TaskState::new(store));

    Router::new()
        .route("/health", axum::routing::get(health_check_handler))
        .merge(task_router)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(from_fn_with_state(config, fault_detail_middleware)),
        )
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let server_address = config.server_address();
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);
    tracing::info!("Tasks are stored in {}", config.tasks_file.display());
    if config.debug {
        tracing::warn!("Debug mode is on: error details are shown to clients");
    }

    let store: Arc<dyn TaskStore> = Arc::new(JsonFileStore::new(config.tasks_file.clone()));
    let app = create_app(Arc::new(config), store);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}
