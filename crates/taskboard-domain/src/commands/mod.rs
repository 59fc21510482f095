use taskboard_core::BoardResult;

pub mod column_commands;
pub mod project_commands;
pub mod reorder_commands;
pub mod task_commands;

pub use column_commands::*;
pub use project_commands::*;
pub use reorder_commands::*;
pub use task_commands::*;

/// A single mutation of board state.
///
/// Every change to projects, columns or tasks is expressed as a command and
/// executed by [`crate::BoardStore::execute`]; nothing else writes to the rows.
pub trait Command: Send + Sync {
    fn execute(&self, context: &mut CommandContext) -> BoardResult<()>;

    /// Human-readable description, used for logging.
    fn description(&self) -> String;
}

pub struct CommandContext<'a> {
    pub projects: &'a mut Vec<crate::Project>,
    pub columns: &'a mut Vec<crate::Column>,
    pub tasks: &'a mut Vec<crate::Task>,
}
