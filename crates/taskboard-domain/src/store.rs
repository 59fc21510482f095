use taskboard_core::BoardResult;

use crate::commands::{Command, CommandContext, MoveColumn, MoveTask, RestoreRows};
use crate::order;
use crate::projection::{project_board, BoardView, DragState};
use crate::resolver::{resolve_column_drop, resolve_task_drop};
use crate::snapshot::{BoardSnapshot, RowSnapshot};
use crate::{
    Column, ColumnId, ColumnReorderPlan, DropTarget, Project, ProjectId, ReorderPlan, Task,
    TaskId,
};

/// The single owner of board rows.
///
/// Reads go through the accessors; writes go through [`BoardStore::execute`]
/// so that every mutation is a named, logged command.
#[derive(Debug, Clone, Default)]
pub struct BoardStore {
    projects: Vec<Project>,
    columns: Vec<Column>,
    tasks: Vec<Task>,
    revision: u64,
}

impl BoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: BoardSnapshot) -> Self {
        Self {
            projects: snapshot.projects,
            columns: snapshot.columns,
            tasks: snapshot.tasks,
            revision: 0,
        }
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            projects: self.projects.clone(),
            columns: self.columns.clone(),
            tasks: self.tasks.clone(),
        }
    }

    pub fn execute(&mut self, command: &dyn Command) -> BoardResult<()> {
        tracing::debug!("Executing: {}", command.description());
        let mut context = CommandContext {
            projects: &mut self.projects,
            columns: &mut self.columns,
            tasks: &mut self.tasks,
        };
        command.execute(&mut context)?;
        self.revision += 1;
        Ok(())
    }

    /// Incremented after every successful command.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn project_columns(&self, project_id: ProjectId) -> Vec<&Column> {
        order::project_columns(&self.columns, project_id)
    }

    pub fn column_tasks(&self, column_id: ColumnId) -> Vec<&Task> {
        order::column_tasks(&self.tasks, column_id)
    }

    pub fn project_tasks(&self, project_id: ProjectId) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .collect()
    }

    pub fn plan_task_drop(
        &self,
        active_task_id: TaskId,
        drop_target: Option<&DropTarget>,
    ) -> Option<ReorderPlan> {
        resolve_task_drop(&self.tasks, &self.columns, active_task_id, drop_target)
    }

    pub fn plan_column_drop(
        &self,
        active_column_id: ColumnId,
        over_column_id: Option<ColumnId>,
    ) -> Option<ColumnReorderPlan> {
        resolve_column_drop(&self.columns, active_column_id, over_column_id)
    }

    /// Capture the rows `plan` touches, then apply it.
    pub fn apply_task_plan(&mut self, plan: &ReorderPlan) -> BoardResult<RowSnapshot> {
        let saved = RowSnapshot::capture(&self.tasks, &[], &plan.touched_task_ids(), &[]);
        self.execute(&MoveTask { plan: plan.clone() })?;
        Ok(saved)
    }

    pub fn apply_column_plan(&mut self, plan: &ColumnReorderPlan) -> BoardResult<RowSnapshot> {
        let saved = RowSnapshot::capture(&[], &self.columns, &[], &plan.touched_column_ids());
        self.execute(&MoveColumn { plan: plan.clone() })?;
        Ok(saved)
    }

    pub fn restore(&mut self, saved: RowSnapshot) -> BoardResult<()> {
        self.execute(&RestoreRows {
            tasks: saved.tasks,
            columns: saved.columns,
        })
    }

    pub fn view(&self, project_id: ProjectId, drag: &DragState) -> BoardView<'_> {
        project_board(project_id, &self.columns, &self.tasks, drag)
    }
}
