use super::{Command, CommandContext};
use crate::order::{column_tasks, normalize_project_columns, project_columns};
use crate::{Column, ColumnId, ColumnUpdate};
use taskboard_core::{BoardError, BoardResult};

pub struct CreateColumn {
    pub column: Column,
}

impl Command for CreateColumn {
    fn execute(&self, context: &mut CommandContext) -> BoardResult<()> {
        if !context
            .projects
            .iter()
            .any(|p| p.id == self.column.project_id)
        {
            return Err(BoardError::NotFound(format!(
                "Project {}",
                self.column.project_id
            )));
        }
        context.columns.push(self.column.clone());
        normalize_project_columns(context.columns, self.column.project_id);
        Ok(())
    }

    fn description(&self) -> String {
        format!("Create column '{}'", self.column.name)
    }
}

/// Rename or recolor a column. Positions only change through `MoveColumn`.
pub struct UpdateColumn {
    pub column_id: ColumnId,
    pub updates: ColumnUpdate,
}

impl Command for UpdateColumn {
    fn execute(&self, context: &mut CommandContext) -> BoardResult<()> {
        if self.updates.position.is_some() {
            return Err(BoardError::Validation(
                "Column position cannot be edited directly".into(),
            ));
        }
        let column = context
            .columns
            .iter_mut()
            .find(|c| c.id == self.column_id)
            .ok_or_else(|| BoardError::NotFound(format!("Column {}", self.column_id)))?;
        column.update(self.updates.clone());
        Ok(())
    }

    fn description(&self) -> String {
        format!("Update column {}", self.column_id)
    }
}

/// Delete a column. Its tasks are appended, in order, to the first remaining
/// column of the project; with no column left they lose their column.
pub struct DeleteColumn {
    pub column_id: ColumnId,
}

impl Command for DeleteColumn {
    fn execute(&self, context: &mut CommandContext) -> BoardResult<()> {
        let project_id = context
            .columns
            .iter()
            .find(|c| c.id == self.column_id)
            .map(|c| c.project_id)
            .ok_or_else(|| BoardError::NotFound(format!("Column {}", self.column_id)))?;

        let orphans: Vec<_> = column_tasks(context.tasks, self.column_id)
            .into_iter()
            .map(|t| t.id)
            .collect();

        context.columns.retain(|c| c.id != self.column_id);
        normalize_project_columns(context.columns, project_id);

        let fallback = project_columns(context.columns, project_id)
            .first()
            .map(|c| c.id);
        let mut next_index = match fallback {
            Some(column_id) => crate::order::append_index(context.tasks, column_id),
            None => 0,
        };

        for task_id in orphans {
            if let Some(task) = context.tasks.iter_mut().find(|t| t.id == task_id) {
                match fallback {
                    Some(column_id) => {
                        task.move_to_column(Some(column_id), next_index);
                        next_index += 1;
                    }
                    None => task.move_to_column(None, 0),
                }
            }
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("Delete column {}", self.column_id)
    }
}
