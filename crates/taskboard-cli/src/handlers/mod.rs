pub mod board;
pub mod column;
pub mod project;
pub mod reconcile;
pub mod task;
