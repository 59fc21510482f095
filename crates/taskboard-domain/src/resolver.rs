//! Drag-end resolution: turns "task X was dropped on Y" into a [`ReorderPlan`].
//!
//! Every function here is pure. Ambiguous input (unknown ids, no drop target,
//! a drop that would not change anything) resolves to `None`, never to an
//! error: drag sources emit partial events during fast gestures and those must
//! be dropped silently.
//!
//! Source columns are renormalized eagerly: a cross-column move also lists the
//! re-stamped rows of the column the task left, so both columns are `0..N-1`
//! once the plan is applied.

use serde::{Deserialize, Serialize};

use crate::column::{Column, ColumnId};
use crate::order::{array_move, changed_ranks, column_tasks, project_columns};
use crate::project::ProjectId;
use crate::task::{Task, TaskId};

/// What a dragged task was released over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum DropTarget {
    /// Empty space of a column: append.
    Column(ColumnId),
    /// Another task: take its slot.
    Task(TaskId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub task_id: TaskId,
    pub order_index: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderPlan {
    pub task_id: TaskId,
    pub source_column_id: Option<ColumnId>,
    pub new_column_id: ColumnId,
    pub new_order_index: i32,
    /// Other rows whose `order_index` changes, in either column.
    pub side_effect_updates: Vec<OrderUpdate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub column_id: ColumnId,
    pub position: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnReorderPlan {
    pub project_id: ProjectId,
    pub updates: Vec<PositionUpdate>,
}

impl ReorderPlan {
    pub fn is_cross_column(&self) -> bool {
        self.source_column_id != Some(self.new_column_id)
    }

    pub fn touched_task_ids(&self) -> Vec<TaskId> {
        std::iter::once(self.task_id)
            .chain(self.side_effect_updates.iter().map(|u| u.task_id))
            .collect()
    }

    pub fn apply(&self, tasks: &mut [Task]) {
        for task in tasks.iter_mut() {
            if task.id == self.task_id {
                task.move_to_column(Some(self.new_column_id), self.new_order_index);
            } else if let Some(update) = self
                .side_effect_updates
                .iter()
                .find(|u| u.task_id == task.id)
            {
                task.update_order_index(update.order_index);
            }
        }
    }
}

impl ColumnReorderPlan {
    pub fn touched_column_ids(&self) -> Vec<ColumnId> {
        self.updates.iter().map(|u| u.column_id).collect()
    }

    pub fn apply(&self, columns: &mut [Column]) {
        for update in &self.updates {
            if let Some(column) = columns.iter_mut().find(|c| c.id == update.column_id) {
                column.update_position(update.position);
            }
        }
    }
}

/// Resolve a task drag-end into a plan, or `None` when nothing should change.
pub fn resolve_task_drop(
    tasks: &[Task],
    columns: &[Column],
    active_task_id: TaskId,
    drop_target: Option<&DropTarget>,
) -> Option<ReorderPlan> {
    let active = tasks.iter().find(|t| t.id == active_task_id)?;
    let target = drop_target?;

    match *target {
        DropTarget::Column(column_id) => {
            let column = columns.iter().find(|c| c.id == column_id)?;
            if column.project_id != active.project_id || active.column_id == Some(column_id) {
                return None;
            }
            Some(plan_cross_column(tasks, active, column_id, None))
        }
        DropTarget::Task(over_id) => {
            if over_id == active.id {
                return None;
            }
            let over = tasks.iter().find(|t| t.id == over_id)?;
            let column_id = over.column_id?;
            if over.project_id != active.project_id || !columns.iter().any(|c| c.id == column_id)
            {
                return None;
            }
            if active.column_id == Some(column_id) {
                plan_within_column(tasks, active, over, column_id)
            } else {
                Some(plan_cross_column(tasks, active, column_id, Some(over)))
            }
        }
    }
}

fn plan_within_column(
    tasks: &[Task],
    active: &Task,
    over: &Task,
    column_id: ColumnId,
) -> Option<ReorderPlan> {
    let mut ordered = column_tasks(tasks, column_id);
    let from = ordered.iter().position(|t| t.id == active.id)?;
    let to = ordered.iter().position(|t| t.id == over.id)?;
    if from == to {
        return None;
    }

    array_move(&mut ordered, from, to);
    let side_effect_updates = to_order_updates(changed_ranks(&ordered), active.id);

    Some(ReorderPlan {
        task_id: active.id,
        source_column_id: Some(column_id),
        new_column_id: column_id,
        new_order_index: to as i32,
        side_effect_updates,
    })
}

fn plan_cross_column(
    tasks: &[Task],
    active: &Task,
    target_column_id: ColumnId,
    over: Option<&Task>,
) -> ReorderPlan {
    let mut target = column_tasks(tasks, target_column_id);
    let insert_at = over
        .and_then(|o| target.iter().position(|t| t.id == o.id))
        .unwrap_or(target.len());
    target.insert(insert_at, active);

    let mut side_effect_updates = to_order_updates(changed_ranks(&target), active.id);

    if let Some(source_column_id) = active.column_id {
        let remaining: Vec<&Task> = column_tasks(tasks, source_column_id)
            .into_iter()
            .filter(|t| t.id != active.id)
            .collect();
        side_effect_updates.extend(to_order_updates(changed_ranks(&remaining), active.id));
    }

    ReorderPlan {
        task_id: active.id,
        source_column_id: active.column_id,
        new_column_id: target_column_id,
        new_order_index: insert_at as i32,
        side_effect_updates,
    }
}

fn to_order_updates(changed: Vec<(TaskId, i32)>, skip: TaskId) -> Vec<OrderUpdate> {
    changed
        .into_iter()
        .filter(|(task_id, _)| *task_id != skip)
        .map(|(task_id, order_index)| OrderUpdate {
            task_id,
            order_index,
        })
        .collect()
}

/// Resolve a column drag-end: the active column takes the slot of `over`.
pub fn resolve_column_drop(
    columns: &[Column],
    active_column_id: ColumnId,
    over_column_id: Option<ColumnId>,
) -> Option<ColumnReorderPlan> {
    let over_column_id = over_column_id?;
    if over_column_id == active_column_id {
        return None;
    }
    let active = columns.iter().find(|c| c.id == active_column_id)?;
    let over = columns.iter().find(|c| c.id == over_column_id)?;
    if active.project_id != over.project_id {
        return None;
    }

    let mut ordered = project_columns(columns, active.project_id);
    let from = ordered.iter().position(|c| c.id == active.id)?;
    let to = ordered.iter().position(|c| c.id == over.id)?;
    array_move(&mut ordered, from, to);

    let updates: Vec<PositionUpdate> = changed_ranks(&ordered)
        .into_iter()
        .map(|(column_id, position)| PositionUpdate {
            column_id,
            position,
        })
        .collect();
    if updates.is_empty() {
        return None;
    }

    Some(ColumnReorderPlan {
        project_id: active.project_id,
        updates,
    })
}
