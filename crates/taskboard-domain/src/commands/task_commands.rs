use super::{Command, CommandContext};
use crate::order::normalize_column;
use crate::{Task, TaskId, TaskUpdate};
use taskboard_core::{BoardError, BoardResult};

pub struct CreateTask {
    pub task: Task,
}

impl Command for CreateTask {
    fn execute(&self, context: &mut CommandContext) -> BoardResult<()> {
        if let Some(column_id) = self.task.column_id {
            let column = context
                .columns
                .iter()
                .find(|c| c.id == column_id)
                .ok_or_else(|| BoardError::NotFound(format!("Column {}", column_id)))?;
            if column.project_id != self.task.project_id {
                return Err(BoardError::Validation(format!(
                    "Column {} belongs to another project",
                    column_id
                )));
            }
        }
        context.tasks.push(self.task.clone());
        if let Some(column_id) = self.task.column_id {
            normalize_column(context.tasks, column_id);
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("Create task '{}'", self.task.title)
    }
}

pub struct UpdateTask {
    pub task_id: TaskId,
    pub updates: TaskUpdate,
}

impl Command for UpdateTask {
    fn execute(&self, context: &mut CommandContext) -> BoardResult<()> {
        let task = context
            .tasks
            .iter_mut()
            .find(|t| t.id == self.task_id)
            .ok_or_else(|| BoardError::NotFound(format!("Task {}", self.task_id)))?;
        task.update(self.updates.clone());
        Ok(())
    }

    fn description(&self) -> String {
        format!("Update task {}", self.task_id)
    }
}

/// Delete a task and close the gap it leaves in its column.
pub struct DeleteTask {
    pub task_id: TaskId,
}

impl Command for DeleteTask {
    fn execute(&self, context: &mut CommandContext) -> BoardResult<()> {
        let position = context
            .tasks
            .iter()
            .position(|t| t.id == self.task_id)
            .ok_or_else(|| BoardError::NotFound(format!("Task {}", self.task_id)))?;
        let removed = context.tasks.remove(position);
        if let Some(column_id) = removed.column_id {
            normalize_column(context.tasks, column_id);
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("Delete task {}", self.task_id)
    }
}
