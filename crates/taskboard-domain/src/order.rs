//! Integer order indices: dense per scope, rewritten on insert.
//!
//! A task's `order_index` only means something next to the other tasks of the
//! same column; a column's `position` only next to the other columns of the
//! same project. Every completed operation leaves a scope ranked `0..N-1`.
//! Inserting in the middle rewrites every row after the insertion point rather
//! than using fractional keys, so no periodic rebalancing pass exists.

use taskboard_core::Ranked;

use crate::column::{Column, ColumnId};
use crate::project::ProjectId;
use crate::task::{Task, TaskId};

/// Tasks of one column in display order. Ties keep their input order.
pub fn column_tasks(tasks: &[Task], column_id: ColumnId) -> Vec<&Task> {
    let mut in_column: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.column_id == Some(column_id))
        .collect();
    in_column.sort_by_key(|t| t.order_index);
    in_column
}

/// Columns of one project in display order.
pub fn project_columns(columns: &[Column], project_id: ProjectId) -> Vec<&Column> {
    let mut in_project: Vec<&Column> = columns
        .iter()
        .filter(|c| c.project_id == project_id)
        .collect();
    in_project.sort_by_key(|c| c.position);
    in_project
}

/// Index a task gets when appended to the end of a column.
pub fn append_index(tasks: &[Task], column_id: ColumnId) -> i32 {
    tasks
        .iter()
        .filter(|t| t.column_id == Some(column_id))
        .count() as i32
}

pub fn next_column_position(columns: &[Column], project_id: ProjectId) -> i32 {
    columns
        .iter()
        .filter(|c| c.project_id == project_id)
        .count() as i32
}

/// Remove the element at `from` and reinsert it so it ends up at `to`.
///
/// Out-of-range indices leave the vector untouched.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || to >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

/// Pairs `(id, new_rank)` for every row of `ordered` whose rank differs from
/// its position in the slice.
pub fn changed_ranks<T: Ranked>(ordered: &[&T]) -> Vec<(T::Id, i32)> {
    ordered
        .iter()
        .enumerate()
        .filter(|(index, item)| item.rank() != *index as i32)
        .map(|(index, item)| (item.rank_id(), index as i32))
        .collect()
}

/// Rewrite ranks of the rows matching `in_scope` to `0..N-1`, keeping their
/// current relative order. Returns the ids of rewritten rows.
pub fn normalize_by<T, F>(items: &mut [T], in_scope: F) -> Vec<T::Id>
where
    T: Ranked,
    F: Fn(&T) -> bool,
{
    let mut scoped: Vec<(usize, i32)> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| in_scope(item))
        .map(|(slot, item)| (slot, item.rank()))
        .collect();
    scoped.sort_by_key(|(_, rank)| *rank);

    let mut changed = Vec::new();
    for (new_rank, (slot, old_rank)) in scoped.into_iter().enumerate() {
        let new_rank = new_rank as i32;
        if old_rank != new_rank {
            items[slot].set_rank(new_rank);
            changed.push(items[slot].rank_id());
        }
    }
    changed
}

pub fn normalize_column(tasks: &mut [Task], column_id: ColumnId) -> Vec<TaskId> {
    normalize_by(tasks, |t| t.column_id == Some(column_id))
}

pub fn normalize_project_columns(columns: &mut [Column], project_id: ProjectId) -> Vec<ColumnId> {
    normalize_by(columns, |c| c.project_id == project_id)
}

/// True when the ranks, in any order, are exactly `0..N-1`.
pub fn is_dense<I: IntoIterator<Item = i32>>(ranks: I) -> bool {
    let mut ranks: Vec<i32> = ranks.into_iter().collect();
    ranks.sort_unstable();
    ranks.iter().enumerate().all(|(i, r)| *r == i as i32)
}
