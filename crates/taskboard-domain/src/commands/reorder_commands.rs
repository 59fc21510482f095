use super::{Command, CommandContext};
use crate::order::column_tasks;
use crate::{
    Column, ColumnId, ColumnReorderPlan, OrderUpdate, ProjectId, ReorderPlan, Task, TaskId,
};
use taskboard_core::{BoardError, BoardResult};

/// Apply a drag-and-drop plan: the moved task plus every re-stamped neighbour.
pub struct MoveTask {
    pub plan: ReorderPlan,
}

impl Command for MoveTask {
    fn execute(&self, context: &mut CommandContext) -> BoardResult<()> {
        if !context.tasks.iter().any(|t| t.id == self.plan.task_id) {
            return Err(BoardError::NotFound(format!("Task {}", self.plan.task_id)));
        }
        if !context
            .columns
            .iter()
            .any(|c| c.id == self.plan.new_column_id)
        {
            return Err(BoardError::NotFound(format!(
                "Column {}",
                self.plan.new_column_id
            )));
        }
        self.plan.apply(context.tasks);
        Ok(())
    }

    fn description(&self) -> String {
        format!(
            "Move task {} to column {} at {} ({} side effects)",
            self.plan.task_id,
            self.plan.new_column_id,
            self.plan.new_order_index,
            self.plan.side_effect_updates.len()
        )
    }
}

/// Restamp a whole column in an explicit order.
///
/// `ordered_task_ids` must name exactly the tasks currently in the column.
pub struct ReorderTasks {
    pub column_id: ColumnId,
    pub ordered_task_ids: Vec<TaskId>,
}

impl ReorderTasks {
    /// Validate against current rows and return `(task_id, new_index)` pairs
    /// that differ from the stored index.
    pub fn changes(&self, tasks: &[Task]) -> BoardResult<Vec<(TaskId, i32)>> {
        let current = column_tasks(tasks, self.column_id);
        let same_members = current.len() == self.ordered_task_ids.len()
            && current
                .iter()
                .all(|t| self.ordered_task_ids.contains(&t.id));
        if !same_members {
            return Err(BoardError::Validation(format!(
                "Reorder of column {} must list each of its {} tasks exactly once",
                self.column_id,
                current.len()
            )));
        }

        Ok(self
            .ordered_task_ids
            .iter()
            .enumerate()
            .filter_map(|(index, id)| {
                let index = index as i32;
                current
                    .iter()
                    .find(|t| t.id == *id)
                    .filter(|t| t.order_index != index)
                    .map(|_| (*id, index))
            })
            .collect())
    }
}

impl Command for ReorderTasks {
    fn execute(&self, context: &mut CommandContext) -> BoardResult<()> {
        for (task_id, index) in self.changes(context.tasks)? {
            if let Some(task) = context.tasks.iter_mut().find(|t| t.id == task_id) {
                task.update_order_index(index);
            }
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!(
            "Reorder {} tasks in column {}",
            self.ordered_task_ids.len(),
            self.column_id
        )
    }
}

/// Write order indices as given, without planning.
///
/// This is the raw form a remote store receives; every task must exist or
/// nothing is written.
pub struct StampTaskOrders {
    pub updates: Vec<OrderUpdate>,
}

impl Command for StampTaskOrders {
    fn execute(&self, context: &mut CommandContext) -> BoardResult<()> {
        if let Some(missing) = self
            .updates
            .iter()
            .find(|u| !context.tasks.iter().any(|t| t.id == u.task_id))
        {
            return Err(BoardError::NotFound(format!("Task {}", missing.task_id)));
        }
        if let Some(negative) = self.updates.iter().find(|u| u.order_index < 0) {
            return Err(BoardError::Validation(format!(
                "Negative order index for task {}",
                negative.task_id
            )));
        }
        for update in &self.updates {
            if let Some(task) = context.tasks.iter_mut().find(|t| t.id == update.task_id) {
                task.update_order_index(update.order_index);
            }
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("Stamp order of {} tasks", self.updates.len())
    }
}

pub struct MoveColumn {
    pub plan: ColumnReorderPlan,
}

impl Command for MoveColumn {
    fn execute(&self, context: &mut CommandContext) -> BoardResult<()> {
        if let Some(missing) = self
            .plan
            .updates
            .iter()
            .find(|u| !context.columns.iter().any(|c| c.id == u.column_id))
        {
            return Err(BoardError::NotFound(format!("Column {}", missing.column_id)));
        }
        self.plan.apply(context.columns);
        Ok(())
    }

    fn description(&self) -> String {
        format!(
            "Move {} columns in project {}",
            self.plan.updates.len(),
            self.plan.project_id
        )
    }
}

/// Put captured rows back exactly as they were.
pub struct RestoreRows {
    pub tasks: Vec<Task>,
    pub columns: Vec<Column>,
}

impl Command for RestoreRows {
    fn execute(&self, context: &mut CommandContext) -> BoardResult<()> {
        for saved in &self.tasks {
            match context.tasks.iter_mut().find(|t| t.id == saved.id) {
                Some(task) => *task = saved.clone(),
                None => context.tasks.push(saved.clone()),
            }
        }
        for saved in &self.columns {
            match context.columns.iter_mut().find(|c| c.id == saved.id) {
                Some(column) => *column = saved.clone(),
                None => context.columns.push(saved.clone()),
            }
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!(
            "Restore {} tasks and {} columns",
            self.tasks.len(),
            self.columns.len()
        )
    }
}

/// Replace every column and task of a project with authoritative rows.
pub struct ReplaceProjectRows {
    pub project_id: ProjectId,
    pub columns: Vec<Column>,
    pub tasks: Vec<Task>,
}

impl Command for ReplaceProjectRows {
    fn execute(&self, context: &mut CommandContext) -> BoardResult<()> {
        if self.columns.iter().any(|c| c.project_id != self.project_id)
            || self.tasks.iter().any(|t| t.project_id != self.project_id)
        {
            return Err(BoardError::Validation(format!(
                "Replacement rows must all belong to project {}",
                self.project_id
            )));
        }
        context.columns.retain(|c| c.project_id != self.project_id);
        context.columns.extend(self.columns.iter().cloned());
        context.tasks.retain(|t| t.project_id != self.project_id);
        context.tasks.extend(self.tasks.iter().cloned());
        Ok(())
    }

    fn description(&self) -> String {
        format!(
            "Replace rows of project {} ({} columns, {} tasks)",
            self.project_id,
            self.columns.len(),
            self.tasks.len()
        )
    }
}
