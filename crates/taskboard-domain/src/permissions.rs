//! Capability sets threaded explicitly into every mutating call site.
//!
//! A role is resolved once into a [`Capabilities`] value; the batch adapter and
//! the CLI handlers receive that value as a parameter instead of asking "may I?"
//! ad hoc.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use taskboard_core::{BoardError, BoardResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Admin,
    Member,
    Viewer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    EditTasks,
    CreateTasks,
    DeleteTasks,
    ManageColumns,
    ManageProject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub can_edit_tasks: bool,
    pub can_create_tasks: bool,
    pub can_delete_tasks: bool,
    pub can_manage_columns: bool,
    pub can_manage_project: bool,
}

impl FromStr for Role {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "owner" => Ok(Role::Owner),
            "admin" => Ok(Role::Admin),
            "member" => Ok(Role::Member),
            "viewer" => Ok(Role::Viewer),
            other => Err(BoardError::Validation(format!("Unknown role: {}", other))),
        }
    }
}

impl Capabilities {
    pub fn all() -> Self {
        Self::for_role(Role::Owner)
    }

    pub fn for_role(role: Role) -> Self {
        //                        edit   create delete columns project
        let (e, c, d, m, p) = match role {
            Role::Owner => (true, true, true, true, true),
            Role::Admin => (true, true, true, true, false),
            Role::Member => (true, true, false, false, false),
            Role::Viewer => (false, false, false, false, false),
        };
        Self {
            can_edit_tasks: e,
            can_create_tasks: c,
            can_delete_tasks: d,
            can_manage_columns: m,
            can_manage_project: p,
        }
    }

    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::EditTasks => self.can_edit_tasks,
            Capability::CreateTasks => self.can_create_tasks,
            Capability::DeleteTasks => self.can_delete_tasks,
            Capability::ManageColumns => self.can_manage_columns,
            Capability::ManageProject => self.can_manage_project,
        }
    }

    pub fn require(&self, capability: Capability) -> BoardResult<()> {
        if self.allows(capability) {
            Ok(())
        } else {
            Err(BoardError::PermissionDenied(format!(
                "missing capability {:?}",
                capability
            )))
        }
    }
}
