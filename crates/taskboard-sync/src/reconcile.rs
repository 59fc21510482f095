use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use taskboard_core::BoardResult;
use taskboard_domain::commands::ReplaceProjectRows;
use taskboard_domain::{Column, ProjectId, Task};
use tokio::task::JoinHandle;

use crate::adapter::SharedStore;
use crate::queue::SingleFlight;
use crate::traits::Remotes;

/// Rows that differed between local state and the remote stores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DriftReport {
    pub columns_changed: usize,
    pub tasks_changed: usize,
}

impl DriftReport {
    pub fn is_clean(&self) -> bool {
        self.columns_changed == 0 && self.tasks_changed == 0
    }
}

/// Pulls authoritative rows and overwrites local drift.
///
/// A partially failed batch can leave the remote side with some rows written
/// and others not; the local rollback cannot see that. Reconciling the
/// project afterwards brings both sides back together.
pub struct Reconciler {
    state: SharedStore,
    remotes: Remotes,
    flights: SingleFlight,
}

impl Reconciler {
    pub fn new(state: SharedStore, remotes: Remotes, flights: SingleFlight) -> Self {
        Self {
            state,
            remotes,
            flights,
        }
    }

    pub async fn reconcile(&self, project_id: ProjectId) -> BoardResult<DriftReport> {
        let _slot = self.flights.acquire(project_id).await;

        let (columns, tasks) = futures::try_join!(
            self.remotes.columns.fetch_columns(project_id),
            self.remotes.tasks.fetch_tasks(project_id),
        )?;

        let mut state = self.state.write().await;
        let report = DriftReport {
            columns_changed: count_drift(
                state.project_columns(project_id).into_iter(),
                columns.as_slice(),
                |c: &Column| c.id,
                same_column,
            ),
            tasks_changed: count_drift(
                state.project_tasks(project_id).into_iter(),
                tasks.as_slice(),
                |t: &Task| t.id,
                same_task,
            ),
        };

        if report.is_clean() {
            tracing::debug!("Project {} is in sync", project_id);
            return Ok(report);
        }

        tracing::warn!(
            "Project {} drifted: {} columns, {} tasks; replacing local rows",
            project_id,
            report.columns_changed,
            report.tasks_changed
        );
        state.execute(&ReplaceProjectRows {
            project_id,
            columns,
            tasks,
        })?;
        Ok(report)
    }

    /// Reconcile `project_id` now and then every `period` until aborted.
    pub fn spawn_periodic(
        self: Arc<Self>,
        project_id: ProjectId,
        period: Duration,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                if let Err(err) = self.reconcile(project_id).await {
                    tracing::error!("Reconcile of project {} failed: {}", project_id, err);
                }
            }
        })
    }
}

/// Rows missing on either side, plus rows present on both that differ.
fn count_drift<'a, T, I, K>(
    local: I,
    remote: &[T],
    key: impl Fn(&T) -> K,
    same: impl Fn(&T, &T) -> bool,
) -> usize
where
    T: 'a,
    I: Iterator<Item = &'a T>,
    K: PartialEq,
{
    let local: Vec<&T> = local.collect();
    let changed_or_missing = remote
        .iter()
        .filter(|r| !local.iter().any(|l| same(*l, *r)))
        .count();
    let gone = local
        .iter()
        .filter(|l| !remote.iter().any(|r| key(r) == key(**l)))
        .count();
    changed_or_missing + gone
}

// Timestamps are stamped by whichever side wrote last and never count as drift.
fn same_column(local: &Column, remote: &Column) -> bool {
    local.id == remote.id
        && local.project_id == remote.project_id
        && local.name == remote.name
        && local.color == remote.color
        && local.position == remote.position
}

fn same_task(local: &Task, remote: &Task) -> bool {
    local.id == remote.id
        && local.project_id == remote.project_id
        && local.column_id == remote.column_id
        && local.order_index == remote.order_index
        && local.title == remote.title
        && local.description == remote.description
        && local.status == remote.status
        && local.priority == remote.priority
        && local.due_date == remote.due_date
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockRemoteColumnStore, MockRemoteProjectStore, MockRemoteTaskStore};
    use taskboard_core::{AppConfig, BoardError};
    use taskboard_domain::commands::{CreateProject, CreateTask};
    use taskboard_domain::{BoardStore, Project};
    use tokio::sync::RwLock;

    fn seeded() -> (BoardStore, ProjectId) {
        let mut store = BoardStore::new();
        let project = Project::new("Ops".into(), None);
        let project_id = project.id;
        let columns = project.seed_columns(&AppConfig::default().effective_default_columns());
        let first = columns[0].id;
        store.execute(&CreateProject { project, columns }).unwrap();
        for i in 0..2 {
            let task = Task::new(project_id, Some(first), format!("t{}", i), i);
            store.execute(&CreateTask { task }).unwrap();
        }
        (store, project_id)
    }

    fn reconciler(
        store: BoardStore,
        columns: MockRemoteColumnStore,
        tasks: MockRemoteTaskStore,
    ) -> Reconciler {
        let remotes = Remotes::new(
            Arc::new(tasks),
            Arc::new(columns),
            Arc::new(MockRemoteProjectStore::new()),
        );
        Reconciler::new(Arc::new(RwLock::new(store)), remotes, SingleFlight::new())
    }

    #[tokio::test]
    async fn test_clean_project_is_left_alone() {
        let (store, project_id) = seeded();
        let remote = store.snapshot().for_project(project_id);
        let revision = store.revision();

        let mut columns = MockRemoteColumnStore::new();
        let remote_columns = remote.columns.clone();
        columns
            .expect_fetch_columns()
            .returning(move |_| Ok(remote_columns.clone()));
        let mut tasks = MockRemoteTaskStore::new();
        let remote_tasks = remote.tasks.clone();
        tasks
            .expect_fetch_tasks()
            .returning(move |_| Ok(remote_tasks.clone()));

        let reconciler = reconciler(store, columns, tasks);
        let report = reconciler.reconcile(project_id).await.unwrap();
        assert!(report.is_clean());
        assert_eq!(reconciler.state.read().await.revision(), revision);
    }

    #[tokio::test]
    async fn test_newer_timestamps_alone_are_not_drift() {
        let (store, project_id) = seeded();
        let mut remote = store.snapshot().for_project(project_id);
        let later = chrono::Utc::now() + chrono::Duration::seconds(30);
        for column in &mut remote.columns {
            column.updated_at = later;
        }
        for task in &mut remote.tasks {
            task.updated_at = later;
        }
        let revision = store.revision();

        let mut columns = MockRemoteColumnStore::new();
        let remote_columns = remote.columns.clone();
        columns
            .expect_fetch_columns()
            .returning(move |_| Ok(remote_columns.clone()));
        let mut tasks = MockRemoteTaskStore::new();
        let remote_tasks = remote.tasks.clone();
        tasks
            .expect_fetch_tasks()
            .returning(move |_| Ok(remote_tasks.clone()));

        let reconciler = reconciler(store, columns, tasks);
        let report = reconciler.reconcile(project_id).await.unwrap();
        assert!(report.is_clean());
        assert_eq!(reconciler.state.read().await.revision(), revision);
    }

    #[tokio::test]
    async fn test_drift_is_replaced_by_remote_rows() {
        let (store, project_id) = seeded();
        let mut remote = store.snapshot().for_project(project_id);
        // The remote only saw half of a swap.
        remote.tasks[0].order_index = 1;
        remote.tasks.pop();

        let mut columns = MockRemoteColumnStore::new();
        let remote_columns = remote.columns.clone();
        columns
            .expect_fetch_columns()
            .returning(move |_| Ok(remote_columns.clone()));
        let mut tasks = MockRemoteTaskStore::new();
        let remote_tasks = remote.tasks.clone();
        tasks
            .expect_fetch_tasks()
            .returning(move |_| Ok(remote_tasks.clone()));

        let reconciler = reconciler(store, columns, tasks);
        let report = reconciler.reconcile(project_id).await.unwrap();
        assert_eq!(
            report,
            DriftReport {
                columns_changed: 0,
                tasks_changed: 2
            }
        );

        let state = reconciler.state.read().await;
        assert_eq!(state.project_tasks(project_id).len(), 1);
        assert_eq!(state.project_tasks(project_id)[0].order_index, 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_changes_nothing() {
        let (store, project_id) = seeded();
        let before = store.snapshot();

        let mut columns = MockRemoteColumnStore::new();
        columns
            .expect_fetch_columns()
            .returning(|_| Err(BoardError::Remote("unreachable".into())));
        let mut tasks = MockRemoteTaskStore::new();
        tasks.expect_fetch_tasks().returning(|_| Ok(vec![]));

        let reconciler = reconciler(store, columns, tasks);
        let result = reconciler.reconcile(project_id).await;
        assert!(matches!(result, Err(BoardError::Remote(_))));
        assert_eq!(reconciler.state.read().await.snapshot(), before);
    }
}
