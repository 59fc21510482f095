//! Read-only board view derived from rows plus the current drag state.
//!
//! Nothing here is stored; callers recompute the view whenever tasks, columns
//! or the drag state change.

use serde::Serialize;

use crate::column::Column;
use crate::order::{column_tasks, project_columns};
use crate::project::ProjectId;
use crate::resolver::DropTarget;
use crate::task::{Task, TaskId};

/// Transient state of the gesture in progress: start, zero or more over, end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DragState {
    pub active_task_id: Option<TaskId>,
    pub over: Option<DropTarget>,
}

impl DragState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn start(&mut self, task_id: TaskId) {
        self.active_task_id = Some(task_id);
        self.over = None;
    }

    /// Ignored when no drag is active.
    pub fn hover(&mut self, target: Option<DropTarget>) {
        if self.active_task_id.is_some() {
            self.over = target;
        }
    }

    /// Finish the gesture, returning what the resolver needs.
    pub fn end(&mut self) -> Option<(TaskId, Option<DropTarget>)> {
        let active = self.active_task_id.take()?;
        Some((active, self.over.take()))
    }

    pub fn cancel(&mut self) {
        *self = Self::idle();
    }

    pub fn is_dragging(&self) -> bool {
        self.active_task_id.is_some()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskView<'a> {
    pub task: &'a Task,
    pub is_dragging: bool,
    pub show_insertion_indicator: bool,
    pub should_shift: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnView<'a> {
    pub column: &'a Column,
    pub tasks: Vec<TaskView<'a>>,
    pub is_dragged_over: bool,
    /// Append preview at the end of the column.
    pub show_insertion_indicator: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardView<'a> {
    pub project_id: ProjectId,
    pub columns: Vec<ColumnView<'a>>,
}

impl BoardView<'_> {
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }
}

pub fn project_board<'a>(
    project_id: ProjectId,
    columns: &'a [Column],
    tasks: &'a [Task],
    drag: &DragState,
) -> BoardView<'a> {
    let active = drag
        .active_task_id
        .and_then(|id| tasks.iter().find(|t| t.id == id));
    let over_task = match drag.over {
        Some(DropTarget::Task(id)) => tasks.iter().find(|t| t.id == id),
        _ => None,
    };

    let columns = project_columns(columns, project_id)
        .into_iter()
        .map(|column| {
            let ordered = column_tasks(tasks, column.id);
            let hovered_here = over_task.is_some_and(|t| t.column_id == Some(column.id));
            let over_column_itself = drag.over == Some(DropTarget::Column(column.id));
            let active_here = active.is_some_and(|t| t.column_id == Some(column.id));

            let shift_range = if hovered_here {
                shift_range(&ordered, active.map(|t| t.id), over_task.map(|t| t.id))
            } else {
                None
            };

            let task_views = ordered
                .into_iter()
                .enumerate()
                .map(|(index, task)| {
                    let is_active = active.is_some_and(|a| a.id == task.id);
                    TaskView {
                        task,
                        is_dragging: is_active,
                        show_insertion_indicator: !is_active
                            && over_task.is_some_and(|o| o.id == task.id),
                        should_shift: !is_active
                            && shift_range.is_some_and(|(lo, hi)| index >= lo && index <= hi),
                    }
                })
                .collect();

            ColumnView {
                column,
                tasks: task_views,
                is_dragged_over: drag.is_dragging() && (over_column_itself || hovered_here),
                show_insertion_indicator: over_column_itself && active.is_some() && !active_here,
            }
        })
        .collect();

    BoardView {
        project_id,
        columns,
    }
}

/// Inclusive index range of tasks that make room for the dragged one.
fn shift_range(
    ordered: &[&Task],
    active_id: Option<TaskId>,
    over_id: Option<TaskId>,
) -> Option<(usize, usize)> {
    let over_index = ordered.iter().position(|t| Some(t.id) == over_id)?;
    match ordered.iter().position(|t| Some(t.id) == active_id) {
        // Coming from another column: everything from the slot down moves.
        None => Some((over_index, ordered.len().saturating_sub(1))),
        Some(from) if from < over_index => Some((from + 1, over_index)),
        Some(from) if from > over_index => Some((over_index, from - 1)),
        Some(_) => None,
    }
}
