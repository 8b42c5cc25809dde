use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::store::{StoreError, TaskStore};

pub mod web;

/// Completion state of a task. Only ever moves from `Pending` to `Completed`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Pending,
    Completed,
}

impl Status {
    /// The glyph shown next to a task on the list page.
    pub fn glyph(&self) -> &'static str {
        match self {
            Status::Pending => "⏳",
            Status::Completed => "✅",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    description: String,
    status: Status,
    created_at: NaiveDate,
}

impl Task {
    /// Creates a pending task.
    pub fn new(description: String, created_at: NaiveDate) -> Self {
        Self {
            description,
            status: Status::Pending,
            created_at,
        }
    }

    /// Returns the description as the user typed it.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Returns the creation date.
    pub fn created_at(&self) -> NaiveDate {
        self.created_at
    }

    pub fn is_pending(&self) -> bool {
        self.status == Status::Pending
    }

    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }

    fn complete(&mut self) {
        self.status = Status::Completed;
    }
}

/// Tasks in insertion order. A task is addressed by its position in this list,
/// which shifts whenever an earlier task is deleted.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Task> {
        self.tasks.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// Appends a task at the end of the list.
    pub fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Marks the task at `position` completed. Returns `false` when the position is out of range.
    pub fn complete(&mut self, position: usize) -> bool {
        match self.tasks.get_mut(position) {
            Some(task) => {
                task.complete();
                true
            }
            None => false,
        }
    }

    /// Removes the task at `position`, shifting every later task down by one.
    pub fn remove(&mut self, position: usize) -> Option<Task> {
        (position < self.tasks.len()).then(|| self.tasks.remove(position))
    }
}

/// Runs each operation as one load, mutate, save cycle against the store.
pub struct TaskService<'a> {
    store: &'a dyn TaskStore,
}

impl TaskService<'_> {
    pub fn new(store: &dyn TaskStore) -> TaskService<'_> {
        TaskService { store }
    }

    /// Retrieves every task in insertion order.
    #[tracing::instrument(skip(self))]
    pub async fn list_tasks(&self) -> Result<TaskList, StoreError> {
        self.store.load().await
    }

    /// Appends a pending task created on `today`.
    ///
    /// # Arguments
    ///
    /// * `description` - The submitted description. Missing or empty descriptions are ignored.
    /// * `today` - The creation date to stamp on the task.
    ///
    /// # Returns
    ///
    /// A `Result` containing `true` if a task was appended, `false` if the input was ignored.
    #[tracing::instrument(skip(self))]
    pub async fn add_task(
        &self,
        description: Option<String>,
        today: NaiveDate,
    ) -> Result<bool, StoreError> {
        let Some(description) = description.filter(|d| !d.is_empty()) else {
            tracing::debug!("Ignoring add without a description");
            return Ok(false);
        };

        let mut tasks = self.store.load().await?;
        tasks.push(Task::new(description, today));
        self.store.save(&tasks).await?;
        tracing::info!(position = tasks.len() - 1, "Task added");
        Ok(true)
    }

    /// Marks the task at `position` completed.
    ///
    /// # Returns
    ///
    /// A `Result` containing `true` if the position was in range, `false` otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn complete_task(&self, position: usize) -> Result<bool, StoreError> {
        let mut tasks = self.store.load().await?;
        if !tasks.complete(position) {
            tracing::debug!(len = tasks.len(), "Ignoring complete for out-of-range position");
            return Ok(false);
        }
        self.store.save(&tasks).await?;
        tracing::info!("Task completed");
        Ok(true)
    }

    /// Deletes the task at `position`.
    ///
    /// # Returns
    ///
    /// A `Result` containing the removed `Task`, or `None` if the position was out of range.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task(&self, position: usize) -> Result<Option<Task>, StoreError> {
        let mut tasks = self.store.load().await?;
        let Some(removed) = tasks.remove(position) else {
            tracing::debug!(len = tasks.len(), "Ignoring delete for out-of-range position");
            return Ok(None);
        };
        self.store.save(&tasks).await?;
        tracing::info!("Task deleted");
        Ok(Some(removed))
    }
}
