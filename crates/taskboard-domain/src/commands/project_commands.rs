use super::{Command, CommandContext};
use crate::{Column, Project};
use taskboard_core::{BoardError, BoardResult};

/// Insert a project together with its seeded columns.
pub struct CreateProject {
    pub project: Project,
    pub columns: Vec<Column>,
}

impl Command for CreateProject {
    fn execute(&self, context: &mut CommandContext) -> BoardResult<()> {
        if context.projects.iter().any(|p| p.id == self.project.id) {
            return Err(BoardError::Validation(format!(
                "Project {} already exists",
                self.project.id
            )));
        }
        if self.columns.iter().any(|c| c.project_id != self.project.id) {
            return Err(BoardError::Validation(
                "Seeded column belongs to another project".into(),
            ));
        }
        context.projects.push(self.project.clone());
        context.columns.extend(self.columns.iter().cloned());
        Ok(())
    }

    fn description(&self) -> String {
        format!(
            "Create project '{}' with {} columns",
            self.project.name,
            self.columns.len()
        )
    }
}
