use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskboard_core::DefaultColumn;
use uuid::Uuid;

use crate::column::Column;

pub type ProjectId = Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: String, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update_name(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    /// Columns seeded on project creation, positioned `0..N-1` in the given order.
    pub fn seed_columns(&self, defaults: &[DefaultColumn]) -> Vec<Column> {
        defaults
            .iter()
            .enumerate()
            .map(|(position, def)| {
                Column::new(self.id, def.name.clone(), def.color.clone(), position as i32)
            })
            .collect()
    }
}
