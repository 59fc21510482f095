use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskboard_core::Ranked;
use uuid::Uuid;

use crate::project::ProjectId;

pub type ColumnId = Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub project_id: ProjectId,
    pub name: String,
    pub color: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial column update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
}

impl ColumnUpdate {
    pub fn position(position: i32) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none() && self.position.is_none()
    }
}

impl Column {
    pub fn new(project_id: ProjectId, name: String, color: String, position: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            name,
            color,
            position,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update(&mut self, updates: ColumnUpdate) {
        if let Some(name) = updates.name {
            self.name = name;
        }
        if let Some(color) = updates.color {
            self.color = color;
        }
        if let Some(position) = updates.position {
            self.position = position;
        }
        self.updated_at = Utc::now();
    }

    pub fn update_position(&mut self, position: i32) {
        self.position = position;
        self.updated_at = Utc::now();
    }
}

impl Ranked for Column {
    type Id = ColumnId;

    fn rank_id(&self) -> ColumnId {
        self.id
    }

    fn rank(&self) -> i32 {
        self.position
    }

    fn set_rank(&mut self, rank: i32) {
        self.update_position(rank);
    }
}
