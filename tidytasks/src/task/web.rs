use askama::Template;
use axum::{
    Form, Router,
    extract::{FromRequestParts, Path, State, rejection::FormRejection},
    http::{StatusCode, request::Parts},
    response::{Html, Redirect},
    routing::{get, post},
};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::store::TaskStore;
use crate::task::{TaskList, TaskService};
use crate::web::WebError;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct AddTaskForm {
    description: Option<String>,
}

impl AddTaskForm {
    /// Keeps the first `description` field of a url-encoded body. Repeats are ignored.
    pub fn from_fields(fields: Vec<(String, String)>) -> Self {
        let description = fields
            .into_iter()
            .find(|(name, _)| name == "description")
            .map(|(_, value)| value);
        Self { description }
    }
}

#[derive(Clone)]
pub struct TaskState {
    pub store: Arc<dyn TaskStore>,
    /// Held across each load-mutate-save so concurrent writes in this process cannot lose updates.
    writes: Arc<Mutex<()>>,
}

impl TaskState {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            writes: Arc::new(Mutex::new(())),
        }
    }

    fn service(&self) -> TaskService<'_> {
        TaskService::new(self.store.as_ref())
    }
}

/// Zero-based position of a task, taken from the last path segment.
///
/// Anything other than a run of ASCII digits does not match the route and is
/// answered with 404. Digit runs too large for `usize` are valid but out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position(pub usize);

impl Position {
    pub fn parse(segment: &str) -> Option<Self> {
        if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self(segment.parse().unwrap_or(usize::MAX)))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Position {
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(segment) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| StatusCode::NOT_FOUND)?;
        Position::parse(&segment).ok_or(StatusCode::NOT_FOUND)
    }
}

#[derive(Template)]
#[template(path = "index.html")]
struct TasksTemplate {
    tasks: TaskList,
}

impl TasksTemplate {
    pub fn new(tasks: TaskList) -> Self {
        Self { tasks }
    }
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

/// Handler for the / endpoint that lists every task.
#[tracing::instrument(skip(state))]
async fn list_tasks_handler(State(state): State<TaskState>) -> Result<Html<String>, WebError> {
    let tasks = state.service().list_tasks().await?;
    let template = TasksTemplate::new(tasks);
    template.render().map(Html).map_err(WebError::from)
}

/// Handler for adding a task via POST request.
#[tracing::instrument(skip(state))]
async fn add_task_handler(
    State(state): State<TaskState>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<Redirect, WebError> {
    let description = match form {
        Ok(Form(fields)) => AddTaskForm::from_fields(fields).description,
        Err(rejection) => {
            tracing::debug!(%rejection, "Treating unreadable form as empty");
            None
        }
    };

    let _guard = state.writes.lock().await;
    state.service().add_task(description, today()).await?;
    Ok(Redirect::to("/"))
}

/// Handler for marking the task at a position completed.
#[tracing::instrument(skip(state))]
async fn complete_task_handler(
    State(state): State<TaskState>,
    Position(position): Position,
) -> Result<Redirect, WebError> {
    let _guard = state.writes.lock().await;
    state.service().complete_task(position).await?;
    Ok(Redirect::to("/"))
}

/// Handler for deleting the task at a position.
#[tracing::instrument(skip(state))]
async fn delete_task_handler(
    State(state): State<TaskState>,
    Position(position): Position,
) -> Result<Redirect, WebError> {
    let _guard = state.writes.lock().await;
    state.service().delete_task(position).await?;
    Ok(Redirect::to("/"))
}

/// Creates and returns the task router with all task-related routes.
pub fn create_task_router(state: TaskState) -> Router {
    Router::new()
        .route("/", get(list_tasks_handler))
        .route("/add", post(add_task_handler))
        .route("/complete/{position}", get(complete_task_handler))
        .route("/delete/{position}", get(delete_task_handler))
        .with_state(state)
}
