//! Point-in-time captures of board rows.
//!
//! [`BoardSnapshot`] is the full serializable state (the JSON file remote
//! stores one). [`RowSnapshot`] holds only the rows a plan is about to touch
//! and is what a failed optimistic update is rolled back to.

use crate::{Column, ColumnId, Project, ProjectId, Task, TaskId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    #[serde(default)]
    pub projects: Vec<Project>,

    #[serde(default)]
    pub columns: Vec<Column>,

    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl BoardSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty() && self.columns.is_empty() && self.tasks.is_empty()
    }

    /// Only the rows belonging to one project.
    pub fn for_project(&self, project_id: ProjectId) -> Self {
        Self {
            projects: self
                .projects
                .iter()
                .filter(|p| p.id == project_id)
                .cloned()
                .collect(),
            columns: self
                .columns
                .iter()
                .filter(|c| c.project_id == project_id)
                .cloned()
                .collect(),
            tasks: self
                .tasks
                .iter()
                .filter(|t| t.project_id == project_id)
                .cloned()
                .collect(),
        }
    }
}

/// Copies of specific rows, taken before an optimistic update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSnapshot {
    pub tasks: Vec<Task>,
    pub columns: Vec<Column>,
}

impl RowSnapshot {
    pub fn capture(
        tasks: &[Task],
        columns: &[Column],
        task_ids: &[TaskId],
        column_ids: &[ColumnId],
    ) -> Self {
        Self {
            tasks: tasks
                .iter()
                .filter(|t| task_ids.contains(&t.id))
                .cloned()
                .collect(),
            columns: columns
                .iter()
                .filter(|c| column_ids.contains(&c.id))
                .cloned()
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_for_project_filters_rows() {
        let keep = Project::new("Keep".into(), None);
        let drop = Project::new("Drop".into(), None);
        let snapshot = BoardSnapshot {
            projects: vec![keep.clone(), drop.clone()],
            columns: vec![
                Column::new(keep.id, "A".into(), "#1".into(), 0),
                Column::new(drop.id, "B".into(), "#2".into(), 0),
            ],
            tasks: vec![
                Task::new(keep.id, None, "k".into(), 0),
                Task::new(drop.id, None, "d".into(), 0),
            ],
        };

        let scoped = snapshot.for_project(keep.id);
        assert_eq!(scoped.projects, vec![keep]);
        assert_eq!(scoped.columns.len(), 1);
        assert_eq!(scoped.tasks[0].title, "k");
    }

    #[test]
    fn test_partial_deserialization() {
        let snapshot: BoardSnapshot = serde_json::from_str(r#"{"projects": []}"#).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_row_capture() {
        let project_id = Uuid::new_v4();
        let tasks = vec![
            Task::new(project_id, None, "a".into(), 0),
            Task::new(project_id, None, "b".into(), 1),
        ];
        let rows = RowSnapshot::capture(&tasks, &[], &[tasks[1].id], &[]);
        assert_eq!(rows.tasks, vec![tasks[1].clone()]);
        assert!(rows.columns.is_empty());
        assert!(!rows.is_empty());
    }
}
