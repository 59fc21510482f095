pub mod collision;
pub mod column;
pub mod commands;
pub mod field_update;
pub mod order;
pub mod permissions;
pub mod project;
pub mod projection;
pub mod resolver;
pub mod snapshot;
pub mod store;
pub mod task;

pub use collision::{resolve_collision, Collision, CollisionTier, Droppable, Point, Rect};
pub use column::{Column, ColumnId, ColumnUpdate};
pub use field_update::FieldUpdate;
pub use permissions::{Capabilities, Capability, Role};
pub use project::{Project, ProjectId};
pub use projection::{project_board, BoardView, ColumnView, DragState, TaskView};
pub use resolver::{
    resolve_column_drop, resolve_task_drop, ColumnReorderPlan, DropTarget, OrderUpdate,
    PositionUpdate, ReorderPlan,
};
pub use snapshot::{BoardSnapshot, RowSnapshot};
pub use store::BoardStore;
pub use task::{Task, TaskId, TaskPriority, TaskStatus, TaskUpdate};
