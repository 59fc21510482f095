pub mod adapter;
pub mod notify;
pub mod queue;
pub mod reconcile;
pub mod store;
pub mod traits;

pub use adapter::{
    BatchPersistenceAdapter, MoveOutcome, NewTask, SharedStore, MOVE_TASK_FAILED,
    REORDER_COLUMNS_FAILED, REORDER_TASKS_FAILED,
};
pub use notify::TracingNotifier;
pub use queue::{FlightGuard, SingleFlight};
pub use reconcile::{DriftReport, Reconciler};
pub use store::{AtomicWriter, JsonEnvelope, JsonFileRemote};
pub use traits::{NotificationSink, RemoteColumnStore, RemoteProjectStore, RemoteTaskStore, Remotes};
