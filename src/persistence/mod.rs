//! Contract for the board store the board writes through.
//!
//! The board never talks to a store directly; `BoardController` calls these
//! methods after applying each change locally and rolls back on any error.

mod file;
mod memory;
pub mod ops;

pub use file::JsonFileBackend;
pub use memory::{MemoryBackend, StoreCall, WriteGate};

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::types::{BoardData, Column, ColumnId, ProjectId, Task, TaskId, TaskUpdate};

pub type StoreResult<T> = std::result::Result<T, PersistenceError>;

/// A task's new column and the resulting order of every affected column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub task_id: TaskId,
    pub from_column_id: ColumnId,
    pub to_column_id: ColumnId,
    pub ordered_from: Vec<TaskId>,
    pub ordered_to: Vec<TaskId>,
}

#[async_trait::async_trait]
pub trait BoardPersistence: Send + Sync {
    async fn fetch_board(&self, project_id: &ProjectId) -> StoreResult<BoardData>;

    async fn create_task(
        &self,
        project_id: &ProjectId,
        column_id: &ColumnId,
        title: &str,
        description: Option<&str>,
    ) -> StoreResult<Task>;

    /// Change a task's column and resequence the affected columns.
    ///
    /// One logical write, however many round trips a backend needs.
    async fn move_task(&self, project_id: &ProjectId, request: &MoveRequest) -> StoreResult<()>;

    async fn rename_column(
        &self,
        project_id: &ProjectId,
        column_id: &ColumnId,
        title: &str,
    ) -> StoreResult<()>;

    async fn create_column(&self, project_id: &ProjectId, title: &str) -> StoreResult<Column>;

    async fn reorder_columns(&self, project_id: &ProjectId, order: &[ColumnId]) -> StoreResult<()>;

    async fn update_task(
        &self,
        project_id: &ProjectId,
        task_id: &TaskId,
        update: &TaskUpdate,
    ) -> StoreResult<Task>;

    async fn delete_task(&self, project_id: &ProjectId, task_id: &TaskId) -> StoreResult<()>;
}
