use std::path::{Path, PathBuf};

use tokio::fs as tokio_fs;
use tokio::sync::Mutex;

use super::{BoardPersistence, MoveRequest, StoreResult, ops};
use crate::error::{BoardError, PersistenceError, Result};
use crate::types::{BoardData, Column, ColumnId, ProjectId, Task, TaskId, TaskUpdate};

/// Board store backed by one JSON document per project under a directory.
///
/// Writes are serialized per backend: each one reads, modifies, and writes
/// back the whole document.
#[derive(Debug)]
pub struct JsonFileBackend {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

fn storage_error(path: &Path, e: impl std::fmt::Display) -> PersistenceError {
    PersistenceError::Rejected(format!("cannot access {}: {e}", path.display()))
}

impl JsonFileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn board_path(&self, project_id: &ProjectId) -> StoreResult<PathBuf> {
        let valid = !project_id.as_str().is_empty()
            && project_id
                .as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PersistenceError::Validation {
                field: "project".to_string(),
                message: format!("'{project_id}' is not a valid project id"),
            });
        }
        Ok(self.dir.join(format!("{project_id}.json")))
    }

    async fn load(&self, project_id: &ProjectId) -> StoreResult<BoardData> {
        let path = self.board_path(project_id)?;
        let content = match tokio_fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PersistenceError::NotFound(project_id.to_string()));
            }
            Err(e) => return Err(storage_error(&path, e)),
        };
        serde_json::from_str(&content).map_err(|e| storage_error(&path, e))
    }

    async fn save(&self, data: &BoardData) -> StoreResult<()> {
        let path = self.board_path(&data.project.id)?;
        let json = serde_json::to_string_pretty(data).map_err(|e| storage_error(&path, e))?;
        tokio_fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| storage_error(&self.dir, e))?;
        // Write to a sibling file first so a crash never leaves half a board
        let tmp = path.with_extension("json.tmp");
        tokio_fs::write(&tmp, json)
            .await
            .map_err(|e| storage_error(&tmp, e))?;
        tokio_fs::rename(&tmp, &path)
            .await
            .map_err(|e| storage_error(&path, e))
    }

    async fn modify<T>(
        &self,
        project_id: &ProjectId,
        apply: impl FnOnce(&mut BoardData) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let _guard = self.write_lock.lock().await;
        let mut data = self.load(project_id).await?;
        let value = apply(&mut data)?;
        self.save(&data).await?;
        Ok(value)
    }

    /// Create the board file for a new project
    pub async fn init_board(
        &self,
        project_id: ProjectId,
        name: &str,
        columns: &[String],
    ) -> Result<BoardData> {
        let _guard = self.write_lock.lock().await;
        let path = self.board_path(&project_id)?;
        if tokio_fs::try_exists(&path).await? {
            return Err(BoardError::Validation(format!(
                "board '{project_id}' already exists"
            )));
        }
        let data = ops::new_board(project_id, name, columns);
        self.save(&data).await?;
        tracing::info!(path = %path.display(), "board created");
        Ok(data)
    }

    /// Projects with a board file, sorted by id
    pub async fn list_projects(&self) -> Result<Vec<ProjectId>> {
        let mut projects = Vec::new();
        let mut entries = match tokio_fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(projects),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                projects.push(ProjectId::from(stem));
            }
        }
        projects.sort();
        Ok(projects)
    }
}

#[async_trait::async_trait]
impl BoardPersistence for JsonFileBackend {
    async fn fetch_board(&self, project_id: &ProjectId) -> StoreResult<BoardData> {
        self.load(project_id).await
    }

    async fn create_task(
        &self,
        project_id: &ProjectId,
        column_id: &ColumnId,
        title: &str,
        description: Option<&str>,
    ) -> StoreResult<Task> {
        self.modify(project_id, |data| {
            ops::create_task(data, column_id, title, description)
        })
        .await
    }

    async fn move_task(&self, project_id: &ProjectId, request: &MoveRequest) -> StoreResult<()> {
        self.modify(project_id, |data| ops::move_task(data, request))
            .await
    }

    async fn rename_column(
        &self,
        project_id: &ProjectId,
        column_id: &ColumnId,
        title: &str,
    ) -> StoreResult<()> {
        self.modify(project_id, |data| ops::rename_column(data, column_id, title))
            .await
    }

    async fn create_column(&self, project_id: &ProjectId, title: &str) -> StoreResult<Column> {
        self.modify(project_id, |data| ops::create_column(data, title))
            .await
    }

    async fn reorder_columns(&self, project_id: &ProjectId, order: &[ColumnId]) -> StoreResult<()> {
        self.modify(project_id, |data| ops::reorder_columns(data, order))
            .await
    }

    async fn update_task(
        &self,
        project_id: &ProjectId,
        task_id: &TaskId,
        update: &TaskUpdate,
    ) -> StoreResult<Task> {
        self.modify(project_id, |data| ops::update_task(data, task_id, update))
            .await
    }

    async fn delete_task(&self, project_id: &ProjectId, task_id: &TaskId) -> StoreResult<()> {
        self.modify(project_id, |data| ops::delete_task(data, task_id))
            .await
    }
}
