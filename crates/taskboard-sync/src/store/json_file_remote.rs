use crate::store::atomic_writer::AtomicWriter;
use crate::traits::{RemoteColumnStore, RemoteProjectStore, RemoteTaskStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use taskboard_core::{BoardError, BoardResult};
use taskboard_domain::commands::{
    CreateColumn, CreateProject, CreateTask, DeleteColumn, DeleteTask, MoveColumn, MoveTask,
    StampTaskOrders, UpdateColumn, UpdateTask,
};
use taskboard_domain::{
    BoardSnapshot, BoardStore, Column, ColumnId, ColumnReorderPlan, ColumnUpdate, OrderUpdate,
    PositionUpdate, Project, ProjectId, ReorderPlan, Task, TaskId, TaskUpdate,
};
use tokio::sync::Mutex;
use uuid::Uuid;

pub const FORMAT_VERSION: u32 = 1;

/// On-disk layout of the board file.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonEnvelope {
    pub version: u32,
    pub instance_id: Uuid,
    pub saved_at: DateTime<Utc>,
    pub data: BoardSnapshot,
}

/// A remote backed by one JSON file.
///
/// Every call loads the file, runs the matching board command against it and
/// writes it back atomically, so the file enforces the same rules as local
/// state. Calls on one instance are serialized.
#[derive(Debug, Clone)]
pub struct JsonFileRemote {
    path: PathBuf,
    instance_id: Uuid,
    lock: Arc<Mutex<()>>,
}

impl JsonFileRemote {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            instance_id: Uuid::new_v4(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    /// Current file contents; a missing file is an empty board.
    pub async fn load_snapshot(&self) -> BoardResult<BoardSnapshot> {
        let Some(bytes) = AtomicWriter::read_optional(&self.path).await? else {
            tracing::debug!("{} does not exist yet, starting empty", self.path.display());
            return Ok(BoardSnapshot::new());
        };

        let envelope: JsonEnvelope = serde_json::from_slice(&bytes)
            .map_err(|e| BoardError::Serialization(e.to_string()))?;
        if envelope.version != FORMAT_VERSION {
            return Err(BoardError::Serialization(format!(
                "Unsupported format version: {}",
                envelope.version
            )));
        }
        Ok(envelope.data)
    }

    async fn save_snapshot(&self, data: BoardSnapshot) -> BoardResult<()> {
        let envelope = JsonEnvelope {
            version: FORMAT_VERSION,
            instance_id: self.instance_id,
            saved_at: Utc::now(),
            data,
        };
        let bytes = serde_json::to_vec_pretty(&envelope)
            .map_err(|e| BoardError::Serialization(e.to_string()))?;
        AtomicWriter::write_atomic(&self.path, &bytes).await?;

        tracing::info!("Saved {} bytes to {}", bytes.len(), self.path.display());
        Ok(())
    }

    async fn read<T>(&self, f: impl FnOnce(&BoardStore) -> T + Send) -> BoardResult<T> {
        let _guard = self.lock.lock().await;
        let store = BoardStore::from_snapshot(self.load_snapshot().await?);
        Ok(f(&store))
    }

    /// Load, change and save under the instance lock. Nothing is written when
    /// `f` fails.
    async fn mutate<T>(
        &self,
        f: impl FnOnce(&mut BoardStore) -> BoardResult<T> + Send,
    ) -> BoardResult<T> {
        let _guard = self.lock.lock().await;
        let mut store = BoardStore::from_snapshot(self.load_snapshot().await?);
        let out = f(&mut store)?;
        self.save_snapshot(store.snapshot()).await?;
        Ok(out)
    }
}

fn stored_task(store: &BoardStore, task_id: TaskId) -> BoardResult<Task> {
    store
        .task(task_id)
        .cloned()
        .ok_or_else(|| BoardError::NotFound(format!("Task {}", task_id)))
}

fn stored_column(store: &BoardStore, column_id: ColumnId) -> BoardResult<Column> {
    store
        .column(column_id)
        .cloned()
        .ok_or_else(|| BoardError::NotFound(format!("Column {}", column_id)))
}

#[async_trait]
impl RemoteTaskStore for JsonFileRemote {
    async fn update_task_order(
        &self,
        task_id: TaskId,
        column_id: ColumnId,
        order_index: i32,
    ) -> BoardResult<Task> {
        self.mutate(|store| {
            let source_column_id = stored_task(store, task_id)?.column_id;
            store.execute(&MoveTask {
                plan: ReorderPlan {
                    task_id,
                    source_column_id,
                    new_column_id: column_id,
                    new_order_index: order_index,
                    side_effect_updates: Vec::new(),
                },
            })?;
            stored_task(store, task_id)
        })
        .await
    }

    async fn batch_update_task_orders(&self, updates: &[OrderUpdate]) -> BoardResult<()> {
        let updates = updates.to_vec();
        self.mutate(|store| store.execute(&StampTaskOrders { updates }))
            .await
    }

    async fn create_task(&self, task: &Task) -> BoardResult<Task> {
        let task = task.clone();
        let task_id = task.id;
        self.mutate(|store| {
            store.execute(&CreateTask { task })?;
            stored_task(store, task_id)
        })
        .await
    }

    async fn update_task(&self, task_id: TaskId, updates: &TaskUpdate) -> BoardResult<Task> {
        let updates = updates.clone();
        self.mutate(|store| {
            store.execute(&UpdateTask { task_id, updates })?;
            stored_task(store, task_id)
        })
        .await
    }

    async fn delete_task(&self, task_id: TaskId) -> BoardResult<()> {
        self.mutate(|store| store.execute(&DeleteTask { task_id }))
            .await
    }

    async fn fetch_tasks(&self, project_id: ProjectId) -> BoardResult<Vec<Task>> {
        self.read(|store| {
            store
                .project_tasks(project_id)
                .into_iter()
                .cloned()
                .collect()
        })
        .await
    }
}

#[async_trait]
impl RemoteColumnStore for JsonFileRemote {
    async fn create_column(&self, column: &Column) -> BoardResult<Column> {
        let column = column.clone();
        let column_id = column.id;
        self.mutate(|store| {
            store.execute(&CreateColumn { column })?;
            stored_column(store, column_id)
        })
        .await
    }

    async fn update_column(
        &self,
        column_id: ColumnId,
        updates: &ColumnUpdate,
    ) -> BoardResult<Column> {
        let mut updates = updates.clone();
        self.mutate(|store| {
            let project_id = stored_column(store, column_id)?.project_id;
            if let Some(position) = updates.position.take() {
                store.execute(&MoveColumn {
                    plan: ColumnReorderPlan {
                        project_id,
                        updates: vec![PositionUpdate {
                            column_id,
                            position,
                        }],
                    },
                })?;
            }
            if !updates.is_empty() {
                store.execute(&UpdateColumn { column_id, updates })?;
            }
            stored_column(store, column_id)
        })
        .await
    }

    async fn delete_column(&self, column_id: ColumnId) -> BoardResult<()> {
        self.mutate(|store| store.execute(&DeleteColumn { column_id }))
            .await
    }

    async fn fetch_columns(&self, project_id: ProjectId) -> BoardResult<Vec<Column>> {
        self.read(|store| {
            store
                .project_columns(project_id)
                .into_iter()
                .cloned()
                .collect()
        })
        .await
    }
}

#[async_trait]
impl RemoteProjectStore for JsonFileRemote {
    async fn create_project(&self, project: &Project, columns: &[Column]) -> BoardResult<()> {
        let command = CreateProject {
            project: project.clone(),
            columns: columns.to_vec(),
        };
        self.mutate(|store| store.execute(&command)).await
    }

    async fn fetch_projects(&self) -> BoardResult<Vec<Project>> {
        self.read(|store| store.projects().to_vec()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_core::AppConfig;
    use tempfile::tempdir;

    async fn seeded(remote: &JsonFileRemote) -> (ProjectId, Vec<ColumnId>) {
        let project = Project::new("Launch".into(), None);
        let columns = project.seed_columns(&AppConfig::default().effective_default_columns());
        let ids = columns.iter().map(|c| c.id).collect();
        remote.create_project(&project, &columns).await.unwrap();
        (project.id, ids)
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_board() {
        let dir = tempdir().unwrap();
        let remote = JsonFileRemote::new(dir.path().join("board.json"));
        assert!(remote.load_snapshot().await.unwrap().is_empty());
        assert!(remote.fetch_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_writes_survive_new_instance() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("board.json");
        let remote = JsonFileRemote::new(&path);
        let (project_id, columns) = seeded(&remote).await;

        let task = Task::new(project_id, Some(columns[0]), "Write docs".into(), 0);
        remote.create_task(&task).await.unwrap();

        let reopened = JsonFileRemote::new(&path);
        let tasks = reopened.fetch_tasks(project_id).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Write docs");
        assert_eq!(reopened.fetch_columns(project_id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_task_order_moves_single_row() {
        let dir = tempdir().unwrap();
        let remote = JsonFileRemote::new(dir.path().join("board.json"));
        let (project_id, columns) = seeded(&remote).await;

        let task = Task::new(project_id, Some(columns[0]), "Ship".into(), 0);
        remote.create_task(&task).await.unwrap();

        let stored = remote.update_task_order(task.id, columns[2], 0).await.unwrap();
        assert_eq!(stored.column_id, Some(columns[2]));
        assert_eq!(stored.order_index, 0);
    }

    #[tokio::test]
    async fn test_failed_batch_writes_nothing() {
        let dir = tempdir().unwrap();
        let remote = JsonFileRemote::new(dir.path().join("board.json"));
        let (project_id, columns) = seeded(&remote).await;
        let task = Task::new(project_id, Some(columns[0]), "Ship".into(), 0);
        remote.create_task(&task).await.unwrap();
        let before = remote.load_snapshot().await.unwrap();

        let result = remote
            .batch_update_task_orders(&[
                OrderUpdate {
                    task_id: task.id,
                    order_index: 3,
                },
                OrderUpdate {
                    task_id: Uuid::new_v4(),
                    order_index: 0,
                },
            ])
            .await;
        assert!(matches!(result, Err(BoardError::NotFound(_))));
        assert_eq!(remote.load_snapshot().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_update_column_position_and_name() {
        let dir = tempdir().unwrap();
        let remote = JsonFileRemote::new(dir.path().join("board.json"));
        let (_, columns) = seeded(&remote).await;

        let stored = remote
            .update_column(
                columns[0],
                &ColumnUpdate {
                    name: Some("Backlog".into()),
                    position: Some(2),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(stored.name, "Backlog");
        assert_eq!(stored.position, 2);
    }

    #[tokio::test]
    async fn test_rejects_unknown_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("board.json");
        std::fs::write(
            &path,
            r#"{"version": 9, "instance_id": "00000000-0000-0000-0000-000000000000",
                "saved_at": "2024-01-01T00:00:00Z", "data": {}}"#,
        )
        .unwrap();

        let remote = JsonFileRemote::new(&path);
        let err = remote.load_snapshot().await.unwrap_err();
        assert!(matches!(err, BoardError::Serialization(_)));
    }
}
