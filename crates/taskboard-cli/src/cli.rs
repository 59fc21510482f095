use chrono::NaiveDate;
use clap::{ArgGroup, Args, Parser, Subcommand};
use taskboard_domain::{Role, TaskPriority, TaskStatus};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Kanban boards with drag-and-drop ordering", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the board file (or set TASKBOARD_FILE)
    #[arg(long, short, value_name = "FILE", env = "TASKBOARD_FILE")]
    pub file: String,

    /// Act as this role instead of the configured one
    #[arg(long, value_name = "ROLE")]
    pub role: Option<Role>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Project operations
    Project(ProjectCommand),
    /// Column operations
    Column(ColumnCommand),
    /// Task operations
    Task(TaskCommand),
    /// Board views
    Board(BoardCommand),
    /// Replace local rows of a project with the file's rows when they differ
    Reconcile {
        #[arg(long)]
        project_id: Uuid,
        /// Keep reconciling on the configured interval until interrupted
        #[arg(long)]
        watch: bool,
    },
}

#[derive(Args)]
pub struct ProjectCommand {
    #[command(subcommand)]
    pub action: ProjectAction,
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a project with the configured default columns
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// List all projects
    List,
}

#[derive(Args)]
pub struct ColumnCommand {
    #[command(subcommand)]
    pub action: ColumnAction,
}

#[derive(Subcommand)]
pub enum ColumnAction {
    /// Append a column to a project
    Create {
        #[arg(long)]
        project_id: Uuid,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "#6b7280")]
        color: String,
    },
    /// List a project's columns in board order
    List {
        #[arg(long)]
        project_id: Uuid,
    },
    /// Rename or recolor a column
    Update {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a column, moving its tasks to the first column
    Delete {
        #[arg(long)]
        id: Uuid,
    },
    /// Drag a column onto another column's slot
    Move {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        over: Uuid,
    },
}

#[derive(Args)]
pub struct TaskCommand {
    #[command(subcommand)]
    pub action: TaskAction,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Append a task to a column
    Create {
        #[arg(long)]
        project_id: Uuid,
        #[arg(long)]
        column_id: Uuid,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "medium")]
        priority: TaskPriority,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due_date: Option<NaiveDate>,
    },
    /// List a project's tasks, optionally for one column
    List {
        #[arg(long)]
        project_id: Uuid,
        #[arg(long)]
        column_id: Option<Uuid>,
    },
    /// Update task fields
    Update(TaskUpdateArgs),
    /// Delete a task
    Delete {
        #[arg(long)]
        id: Uuid,
    },
    /// Drop a task onto another task or onto a column
    Move(TaskMoveArgs),
    /// Restamp a column in the given order
    Reorder {
        #[arg(long)]
        column_id: Uuid,
        /// Every task of the column, comma-separated, in the new order
        #[arg(long, value_delimiter = ',', num_args = 1..)]
        ids: Vec<Uuid>,
    },
}

#[derive(Args)]
pub struct TaskUpdateArgs {
    #[arg(long)]
    pub id: Uuid,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, conflicts_with = "description")]
    pub clear_description: bool,
    #[arg(long)]
    pub status: Option<TaskStatus>,
    #[arg(long)]
    pub priority: Option<TaskPriority>,
    #[arg(long)]
    pub due_date: Option<NaiveDate>,
    #[arg(long, conflicts_with = "due_date")]
    pub clear_due_date: bool,
}

#[derive(Args)]
#[command(group(ArgGroup::new("target").args(["onto_task", "onto_column"])))]
pub struct TaskMoveArgs {
    #[arg(long)]
    pub id: Uuid,
    /// Task the dragged task is released over
    #[arg(long)]
    pub onto_task: Option<Uuid>,
    /// Column the dragged task is released over
    #[arg(long)]
    pub onto_column: Option<Uuid>,
}

#[derive(Args)]
pub struct BoardCommand {
    #[command(subcommand)]
    pub action: BoardAction,
}

#[derive(Subcommand)]
pub enum BoardAction {
    /// Columns in order with their ordered tasks
    Show {
        #[arg(long)]
        project_id: Uuid,
    },
}
