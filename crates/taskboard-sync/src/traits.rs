//! Contracts of the remote collaborators the adapter talks to.
//!
//! Calls are independent: no transaction spans two of them, and the same task
//! may be written by concurrent calls.

use async_trait::async_trait;
use std::sync::Arc;
use taskboard_core::BoardResult;
use taskboard_domain::{
    Column, ColumnId, ColumnUpdate, OrderUpdate, Project, ProjectId, Task, TaskId, TaskUpdate,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteTaskStore: Send + Sync {
    /// Move one task, returning the stored row.
    async fn update_task_order(
        &self,
        task_id: TaskId,
        column_id: ColumnId,
        order_index: i32,
    ) -> BoardResult<Task>;

    async fn batch_update_task_orders(&self, updates: &[OrderUpdate]) -> BoardResult<()>;

    async fn create_task(&self, task: &Task) -> BoardResult<Task>;

    async fn update_task(&self, task_id: TaskId, updates: &TaskUpdate) -> BoardResult<Task>;

    async fn delete_task(&self, task_id: TaskId) -> BoardResult<()>;

    async fn fetch_tasks(&self, project_id: ProjectId) -> BoardResult<Vec<Task>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteColumnStore: Send + Sync {
    async fn create_column(&self, column: &Column) -> BoardResult<Column>;

    async fn update_column(&self, column_id: ColumnId, updates: &ColumnUpdate)
        -> BoardResult<Column>;

    /// The store reassigns the column's tasks to the project's first column.
    async fn delete_column(&self, column_id: ColumnId) -> BoardResult<()>;

    async fn fetch_columns(&self, project_id: ProjectId) -> BoardResult<Vec<Column>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteProjectStore: Send + Sync {
    async fn create_project(&self, project: &Project, columns: &[Column]) -> BoardResult<()>;

    async fn fetch_projects(&self) -> BoardResult<Vec<Project>>;
}

/// Fire-and-forget user notifications.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationSink: Send + Sync {
    fn show_success(&self, message: &str);
    fn show_error(&self, message: &str);
}

/// The three remote stores, usually backed by one service.
#[derive(Clone)]
pub struct Remotes {
    pub tasks: Arc<dyn RemoteTaskStore>,
    pub columns: Arc<dyn RemoteColumnStore>,
    pub projects: Arc<dyn RemoteProjectStore>,
}

impl Remotes {
    pub fn new(
        tasks: Arc<dyn RemoteTaskStore>,
        columns: Arc<dyn RemoteColumnStore>,
        projects: Arc<dyn RemoteProjectStore>,
    ) -> Self {
        Self {
            tasks,
            columns,
            projects,
        }
    }

    pub fn shared<R>(remote: Arc<R>) -> Self
    where
        R: RemoteTaskStore + RemoteColumnStore + RemoteProjectStore + 'static,
    {
        Self {
            tasks: remote.clone(),
            columns: remote.clone(),
            projects: remote,
        }
    }
}
