use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use taskboard_core::{BoardError, Ranked};
use uuid::Uuid;

use crate::column::ColumnId;
use crate::field_update::FieldUpdate;
use crate::project::ProjectId;

pub type TaskId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl FromStr for TaskStatus {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(BoardError::Validation(format!("Unknown status: {}", other))),
        }
    }
}

impl FromStr for TaskPriority {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            "urgent" => Ok(TaskPriority::Urgent),
            other => Err(BoardError::Validation(format!("Unknown priority: {}", other))),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    /// Tasks without a column are kept but left out of the board.
    pub column_id: Option<ColumnId>,
    pub order_index: i32,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial task update. Column and order are absent; those only
/// change through the reorder commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: FieldUpdate<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: FieldUpdate<NaiveDate>,
}

impl Task {
    pub fn new(
        project_id: ProjectId,
        column_id: Option<ColumnId>,
        title: String,
        order_index: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            title,
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            column_id,
            order_index,
            due_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn move_to_column(&mut self, column_id: Option<ColumnId>, order_index: i32) {
        self.column_id = column_id;
        self.order_index = order_index;
        self.updated_at = Utc::now();
    }

    pub fn update_order_index(&mut self, order_index: i32) {
        self.order_index = order_index;
        self.updated_at = Utc::now();
    }

    pub fn update(&mut self, updates: TaskUpdate) {
        if let Some(title) = updates.title {
            self.title = title;
        }
        updates.description.apply_to(&mut self.description);
        if let Some(status) = updates.status {
            self.status = status;
        }
        if let Some(priority) = updates.priority {
            self.priority = priority;
        }
        updates.due_date.apply_to(&mut self.due_date);
        self.updated_at = Utc::now();
    }
}

impl Ranked for Task {
    type Id = TaskId;

    fn rank_id(&self) -> TaskId {
        self.id
    }

    fn rank(&self) -> i32 {
        self.order_index
    }

    fn set_rank(&mut self, rank: i32) {
        self.update_order_index(rank);
    }
}
