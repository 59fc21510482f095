//! Optimistic persistence of board mutations.
//!
//! Drag operations (`move_task`, `move_task_at_pointer`, `reorder_tasks`,
//! `move_column`) follow one path:
//!
//! 1. check the caller's capabilities,
//! 2. take the project's single-flight slot,
//! 3. plan against the current rows and apply the plan locally at once,
//! 4. push the changed rows to the remote stores,
//! 5. on any remote failure put the captured rows back and raise one error
//!    notification.
//!
//! Drag operations never return an error; the [`MoveOutcome`] says what
//! happened. Create/update/delete operations write remotely first and only then
//! locally, and do return a [`BoardResult`].

use chrono::NaiveDate;
use std::sync::Arc;
use taskboard_core::{BoardError, BoardResult, DefaultColumn};
use taskboard_domain::commands::{
    CreateColumn, CreateProject, CreateTask, DeleteColumn, DeleteTask, ReorderTasks, UpdateColumn,
    UpdateTask,
};
use taskboard_domain::order::{append_index, next_column_position};
use taskboard_domain::{
    resolve_collision, BoardStore, Capabilities, Capability, Column, ColumnId, ColumnReorderPlan,
    ColumnUpdate, DropTarget, Droppable, OrderUpdate, Point, Project, ProjectId, Rect, ReorderPlan,
    RowSnapshot, Task, TaskId, TaskPriority, TaskUpdate,
};
use tokio::sync::RwLock;

use crate::queue::SingleFlight;
use crate::reconcile::Reconciler;
use crate::traits::{NotificationSink, Remotes};

pub type SharedStore = Arc<RwLock<BoardStore>>;

pub const MOVE_TASK_FAILED: &str = "Failed to move task";
pub const REORDER_TASKS_FAILED: &str = "Failed to reorder tasks";
pub const REORDER_COLUMNS_FAILED: &str = "Failed to reorder columns";

/// Result of a drag operation.
#[derive(Debug)]
pub enum MoveOutcome<P> {
    /// Applied locally and confirmed remotely.
    Applied(P),
    /// Nothing to do: ambiguous input or a drop that changes nothing.
    NoOp,
    /// The capability set does not allow the operation.
    Forbidden,
    /// A remote write failed; local rows were restored.
    RolledBack(BoardError),
}

impl<P> MoveOutcome<P> {
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveOutcome::Applied(_))
    }

    pub fn applied(self) -> Option<P> {
        match self {
            MoveOutcome::Applied(plan) => Some(plan),
            _ => None,
        }
    }
}

/// Fields of a task about to be created.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: TaskPriority::Medium,
            due_date: None,
        }
    }
}

#[derive(Clone)]
pub struct BatchPersistenceAdapter {
    state: SharedStore,
    remotes: Remotes,
    notifier: Arc<dyn NotificationSink>,
    flights: SingleFlight,
}

impl BatchPersistenceAdapter {
    pub fn new(store: BoardStore, remotes: Remotes, notifier: Arc<dyn NotificationSink>) -> Self {
        Self::with_shared(Arc::new(RwLock::new(store)), remotes, notifier)
    }

    pub fn with_shared(
        state: SharedStore,
        remotes: Remotes,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            state,
            remotes,
            notifier,
            flights: SingleFlight::new(),
        }
    }

    pub fn state(&self) -> SharedStore {
        self.state.clone()
    }

    /// A reconciler sharing this adapter's rows, remotes and flight slots.
    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new(self.state.clone(), self.remotes.clone(), self.flights.clone())
    }

    pub async fn move_task(
        &self,
        capabilities: &Capabilities,
        project_id: ProjectId,
        active_task_id: TaskId,
        drop_target: Option<DropTarget>,
    ) -> MoveOutcome<ReorderPlan> {
        if capabilities.require(Capability::EditTasks).is_err() {
            tracing::warn!("Move of task {} refused: cannot edit tasks", active_task_id);
            return MoveOutcome::Forbidden;
        }
        let _slot = self.flights.acquire(project_id).await;

        let (plan, saved) = {
            let mut state = self.state.write().await;
            if state.task(active_task_id).map(|t| t.project_id) != Some(project_id) {
                tracing::debug!("Ignoring drop of unknown task {}", active_task_id);
                return MoveOutcome::NoOp;
            }
            let Some(plan) = state.plan_task_drop(active_task_id, drop_target.as_ref()) else {
                tracing::debug!("Drop of task {} changes nothing", active_task_id);
                return MoveOutcome::NoOp;
            };
            match state.apply_task_plan(&plan) {
                Ok(saved) => (plan, saved),
                Err(err) => {
                    tracing::error!("Failed to apply plan for task {}: {}", plan.task_id, err);
                    self.notifier.show_error(MOVE_TASK_FAILED);
                    return MoveOutcome::RolledBack(err);
                }
            }
        };

        let failure_message = if plan.is_cross_column() {
            MOVE_TASK_FAILED
        } else {
            REORDER_TASKS_FAILED
        };

        match self.push_task_plan(&plan).await {
            Ok(()) => {
                tracing::info!(
                    "Moved task {} to column {} at {} ({} rows restamped)",
                    plan.task_id,
                    plan.new_column_id,
                    plan.new_order_index,
                    plan.side_effect_updates.len()
                );
                MoveOutcome::Applied(plan)
            }
            Err(err) => self.roll_back(saved, failure_message, err).await,
        }
    }

    /// Drop the active task wherever the pointer is: pick the target from the
    /// droppable regions, then move as [`move_task`](Self::move_task) does.
    pub async fn move_task_at_pointer(
        &self,
        capabilities: &Capabilities,
        project_id: ProjectId,
        active_task_id: TaskId,
        pointer: Point,
        active_rect: Rect,
        droppables: &[Droppable],
    ) -> MoveOutcome<ReorderPlan> {
        let drop_target = resolve_collision(pointer, active_rect, droppables).map(|hit| {
            tracing::debug!(
                "Pointer drop of task {} hit {:?} via {:?}",
                active_task_id,
                hit.target,
                hit.tier
            );
            hit.target
        });
        self.move_task(capabilities, project_id, active_task_id, drop_target)
            .await
    }

    /// Batch reorder: restamp a whole column in the given order.
    pub async fn reorder_tasks(
        &self,
        capabilities: &Capabilities,
        column_id: ColumnId,
        ordered_task_ids: Vec<TaskId>,
    ) -> MoveOutcome<Vec<OrderUpdate>> {
        if capabilities.require(Capability::EditTasks).is_err() {
            tracing::warn!("Reorder of column {} refused: cannot edit tasks", column_id);
            return MoveOutcome::Forbidden;
        }
        let Some(project_id) = self.project_of_column(column_id).await else {
            return MoveOutcome::NoOp;
        };
        let _slot = self.flights.acquire(project_id).await;

        let command = ReorderTasks {
            column_id,
            ordered_task_ids,
        };
        let (updates, saved) = {
            let mut state = self.state.write().await;
            let updates: Vec<OrderUpdate> = match command.changes(state.tasks()) {
                Ok(changes) => changes
                    .into_iter()
                    .map(|(task_id, order_index)| OrderUpdate {
                        task_id,
                        order_index,
                    })
                    .collect(),
                Err(err) => {
                    tracing::debug!("Ignoring reorder of column {}: {}", column_id, err);
                    return MoveOutcome::NoOp;
                }
            };
            if updates.is_empty() {
                return MoveOutcome::NoOp;
            }
            let touched: Vec<TaskId> = updates.iter().map(|u| u.task_id).collect();
            let saved = RowSnapshot::capture(state.tasks(), &[], &touched, &[]);
            if let Err(err) = state.execute(&command) {
                self.notifier.show_error(REORDER_TASKS_FAILED);
                return MoveOutcome::RolledBack(err);
            }
            (updates, saved)
        };

        match self.remotes.tasks.batch_update_task_orders(&updates).await {
            Ok(()) => {
                tracing::info!("Reordered {} tasks in column {}", updates.len(), column_id);
                MoveOutcome::Applied(updates)
            }
            Err(err) => self.roll_back(saved, REORDER_TASKS_FAILED, err).await,
        }
    }

    pub async fn move_column(
        &self,
        capabilities: &Capabilities,
        active_column_id: ColumnId,
        over_column_id: Option<ColumnId>,
    ) -> MoveOutcome<ColumnReorderPlan> {
        if capabilities.require(Capability::ManageColumns).is_err() {
            tracing::warn!(
                "Move of column {} refused: cannot manage columns",
                active_column_id
            );
            return MoveOutcome::Forbidden;
        }
        let Some(project_id) = self.project_of_column(active_column_id).await else {
            return MoveOutcome::NoOp;
        };
        let _slot = self.flights.acquire(project_id).await;

        let (plan, saved) = {
            let mut state = self.state.write().await;
            let Some(plan) = state.plan_column_drop(active_column_id, over_column_id) else {
                return MoveOutcome::NoOp;
            };
            match state.apply_column_plan(&plan) {
                Ok(saved) => (plan, saved),
                Err(err) => {
                    self.notifier.show_error(REORDER_COLUMNS_FAILED);
                    return MoveOutcome::RolledBack(err);
                }
            }
        };

        let changes: Vec<(ColumnId, ColumnUpdate)> = plan
            .updates
            .iter()
            .map(|update| (update.column_id, ColumnUpdate::position(update.position)))
            .collect();
        let writes = changes
            .iter()
            .map(|(column_id, update)| self.remotes.columns.update_column(*column_id, update));
        let results = futures::future::join_all(writes).await;

        match results.into_iter().find_map(Result::err) {
            None => {
                tracing::info!(
                    "Moved column {} ({} positions rewritten)",
                    active_column_id,
                    plan.updates.len()
                );
                MoveOutcome::Applied(plan)
            }
            Some(err) => self.roll_back(saved, REORDER_COLUMNS_FAILED, err).await,
        }
    }

    async fn push_task_plan(&self, plan: &ReorderPlan) -> BoardResult<()> {
        let moved = self.remotes.tasks.update_task_order(
            plan.task_id,
            plan.new_column_id,
            plan.new_order_index,
        );
        let restamped = async {
            if plan.side_effect_updates.is_empty() {
                Ok(())
            } else {
                self.remotes
                    .tasks
                    .batch_update_task_orders(&plan.side_effect_updates)
                    .await
            }
        };

        // Both calls settle before any rollback so no late write lands after it.
        let (moved, restamped) = futures::join!(moved, restamped);
        moved?;
        restamped
    }

    async fn roll_back<P>(
        &self,
        saved: RowSnapshot,
        message: &str,
        err: BoardError,
    ) -> MoveOutcome<P> {
        tracing::warn!("{}: {}; restoring local rows", message, err);
        {
            let mut state = self.state.write().await;
            if let Err(restore_err) = state.restore(saved) {
                tracing::error!("Rollback failed: {}", restore_err);
            }
        }
        self.notifier.show_error(message);
        MoveOutcome::RolledBack(err)
    }

    async fn project_of_column(&self, column_id: ColumnId) -> Option<ProjectId> {
        self.state
            .read()
            .await
            .column(column_id)
            .map(|c| c.project_id)
    }

    fn report<T>(&self, result: BoardResult<T>, success: &str, failure: &str) -> BoardResult<T> {
        match &result {
            Ok(_) => self.notifier.show_success(success),
            Err(err) => {
                tracing::error!("{}: {}", failure, err);
                self.notifier.show_error(failure);
            }
        }
        result
    }

    pub async fn create_project(
        &self,
        capabilities: &Capabilities,
        name: String,
        description: Option<String>,
        default_columns: &[DefaultColumn],
    ) -> BoardResult<Project> {
        capabilities.require(Capability::ManageProject)?;
        let result: BoardResult<Project> = async {
            let project = Project::new(name, description);
            let columns = project.seed_columns(default_columns);
            self.remotes
                .projects
                .create_project(&project, &columns)
                .await?;
            self.state.write().await.execute(&CreateProject {
                project: project.clone(),
                columns,
            })?;
            Ok::<_, BoardError>(project)
        }
        .await;
        self.report(result, "Project created", "Failed to create project")
    }

    pub async fn create_column(
        &self,
        capabilities: &Capabilities,
        project_id: ProjectId,
        name: String,
        color: String,
    ) -> BoardResult<Column> {
        capabilities.require(Capability::ManageColumns)?;
        let _slot = self.flights.acquire(project_id).await;
        let result: BoardResult<Column> = async {
            let position = {
                let state = self.state.read().await;
                if state.project(project_id).is_none() {
                    return Err(BoardError::NotFound(format!("Project {}", project_id)));
                }
                next_column_position(state.columns(), project_id)
            };
            let column = Column::new(project_id, name, color, position);
            let stored = self.remotes.columns.create_column(&column).await?;
            self.state.write().await.execute(&CreateColumn {
                column: stored.clone(),
            })?;
            Ok::<_, BoardError>(stored)
        }
        .await;
        self.report(result, "Column created", "Failed to create column")
    }

    /// Rename or recolor a column. Position changes go through `move_column`.
    pub async fn update_column(
        &self,
        capabilities: &Capabilities,
        column_id: ColumnId,
        updates: ColumnUpdate,
    ) -> BoardResult<Column> {
        capabilities.require(Capability::ManageColumns)?;
        if updates.position.is_some() {
            return Err(BoardError::Validation(
                "Use a column move to change its position".into(),
            ));
        }
        let result: BoardResult<Column> = async {
            let stored = self.remotes.columns.update_column(column_id, &updates).await?;
            self.state
                .write()
                .await
                .execute(&UpdateColumn { column_id, updates })?;
            Ok::<_, BoardError>(stored)
        }
        .await;
        self.report(result, "Column updated", "Failed to update column")
    }

    /// Delete a column; its tasks move to the end of the project's first column.
    pub async fn delete_column(
        &self,
        capabilities: &Capabilities,
        column_id: ColumnId,
    ) -> BoardResult<()> {
        capabilities.require(Capability::ManageColumns)?;
        let project_id = self
            .project_of_column(column_id)
            .await
            .ok_or_else(|| BoardError::NotFound(format!("Column {}", column_id)))?;
        let _slot = self.flights.acquire(project_id).await;
        let result: BoardResult<()> = async {
            self.remotes.columns.delete_column(column_id).await?;
            self.state
                .write()
                .await
                .execute(&DeleteColumn { column_id })
        }
        .await;
        self.report(result, "Column deleted", "Failed to delete column")
    }

    /// Append a new task to the end of `column_id`.
    pub async fn create_task(
        &self,
        capabilities: &Capabilities,
        project_id: ProjectId,
        column_id: ColumnId,
        new_task: NewTask,
    ) -> BoardResult<Task> {
        capabilities.require(Capability::CreateTasks)?;
        let _slot = self.flights.acquire(project_id).await;
        let result: BoardResult<Task> = async {
            let order_index = {
                let state = self.state.read().await;
                match state.column(column_id) {
                    Some(column) if column.project_id == project_id => {}
                    _ => return Err(BoardError::NotFound(format!("Column {}", column_id))),
                }
                append_index(state.tasks(), column_id)
            };
            let mut task = Task::new(project_id, Some(column_id), new_task.title, order_index);
            task.description = new_task.description;
            task.priority = new_task.priority;
            task.due_date = new_task.due_date;

            let stored = self.remotes.tasks.create_task(&task).await?;
            self.state.write().await.execute(&CreateTask {
                task: stored.clone(),
            })?;
            Ok::<_, BoardError>(stored)
        }
        .await;
        self.report(result, "Task created", "Failed to create task")
    }

    pub async fn update_task(
        &self,
        capabilities: &Capabilities,
        task_id: TaskId,
        updates: TaskUpdate,
    ) -> BoardResult<Task> {
        capabilities.require(Capability::EditTasks)?;
        let result: BoardResult<Task> = async {
            let stored = self.remotes.tasks.update_task(task_id, &updates).await?;
            self.state
                .write()
                .await
                .execute(&UpdateTask { task_id, updates })?;
            Ok::<_, BoardError>(stored)
        }
        .await;
        self.report(result, "Task updated", "Failed to update task")
    }

    pub async fn delete_task(
        &self,
        capabilities: &Capabilities,
        task_id: TaskId,
    ) -> BoardResult<()> {
        capabilities.require(Capability::DeleteTasks)?;
        let project_id = self
            .state
            .read()
            .await
            .task(task_id)
            .map(|t| t.project_id)
            .ok_or_else(|| BoardError::NotFound(format!("Task {}", task_id)))?;
        let _slot = self.flights.acquire(project_id).await;
        let result: BoardResult<()> = async {
            self.remotes.tasks.delete_task(task_id).await?;
            self.state.write().await.execute(&DeleteTask { task_id })
        }
        .await;
        self.report(result, "Task deleted", "Failed to delete task")
    }
}
