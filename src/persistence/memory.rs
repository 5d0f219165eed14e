use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use futures::channel::oneshot;
use parking_lot::Mutex;

use super::{BoardPersistence, MoveRequest, StoreResult, ops};
use crate::error::PersistenceError;
use crate::types::{BoardData, Column, ColumnId, ProjectId, Task, TaskId, TaskUpdate};

/// Kind of call received by a `MemoryBackend`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreCall {
    FetchBoard,
    CreateTask,
    MoveTask,
    RenameColumn,
    CreateColumn,
    ReorderColumns,
    UpdateTask,
    DeleteTask,
}

/// Holds the next write open until released or dropped
#[derive(Debug)]
pub struct WriteGate {
    tx: oneshot::Sender<()>,
}

impl WriteGate {
    pub fn release(self) {
        let _ = self.tx.send(());
    }
}

/// Board store kept in process memory.
///
/// Records every call and can be told to reject, expire the session, or
/// hold a write open, which makes it the backend of choice for exercising
/// reconciliation.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    boards: DashMap<ProjectId, BoardData>,
    failures: Mutex<VecDeque<PersistenceError>>,
    session_expired: AtomicBool,
    gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    calls: Mutex<Vec<StoreCall>>,
}

impl MemoryBackend {
    pub fn with_board(data: BoardData) -> Self {
        let backend = Self::default();
        backend.insert_board(data);
        backend
    }

    pub fn insert_board(&self, data: BoardData) {
        self.boards.insert(data.project.id.clone(), data);
    }

    pub fn board(&self, project_id: &ProjectId) -> Option<BoardData> {
        self.boards.get(project_id).map(|b| b.value().clone())
    }

    /// Reject the next write with `error`; queued failures apply in order
    pub fn fail_next(&self, error: PersistenceError) {
        self.failures.lock().push_back(error);
    }

    /// Every later write fails with `SessionExpired`
    pub fn expire_session(&self) {
        self.session_expired.store(true, Ordering::SeqCst);
    }

    /// Suspend the next write until the returned gate is released
    pub fn hold_next_write(&self) -> WriteGate {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().push_back(rx);
        WriteGate { tx }
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    /// Calls other than fetches
    pub fn write_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| **c != StoreCall::FetchBoard)
            .count()
    }

    async fn write<T>(
        &self,
        call: StoreCall,
        project_id: &ProjectId,
        apply: impl FnOnce(&mut BoardData) -> StoreResult<T>,
    ) -> StoreResult<T> {
        self.calls.lock().push(call);
        let gate = self.gates.lock().pop_front();
        if let Some(gate) = gate {
            // A dropped gate releases the write too
            let _ = gate.await;
        }
        if self.session_expired.load(Ordering::SeqCst) {
            return Err(PersistenceError::SessionExpired);
        }
        let injected = self.failures.lock().pop_front();
        if let Some(error) = injected {
            tracing::debug!(?call, %error, "injected store failure");
            return Err(error);
        }
        let mut board = self
            .boards
            .get_mut(project_id)
            .ok_or_else(|| PersistenceError::NotFound(project_id.to_string()))?;
        apply(&mut board)
    }
}

#[async_trait::async_trait]
impl BoardPersistence for MemoryBackend {
    async fn fetch_board(&self, project_id: &ProjectId) -> StoreResult<BoardData> {
        self.calls.lock().push(StoreCall::FetchBoard);
        if self.session_expired.load(Ordering::SeqCst) {
            return Err(PersistenceError::SessionExpired);
        }
        self.board(project_id)
            .ok_or_else(|| PersistenceError::NotFound(project_id.to_string()))
    }

    async fn create_task(
        &self,
        project_id: &ProjectId,
        column_id: &ColumnId,
        title: &str,
        description: Option<&str>,
    ) -> StoreResult<Task> {
        self.write(StoreCall::CreateTask, project_id, |data| {
            ops::create_task(data, column_id, title, description)
        })
        .await
    }

    async fn move_task(&self, project_id: &ProjectId, request: &MoveRequest) -> StoreResult<()> {
        self.write(StoreCall::MoveTask, project_id, |data| ops::move_task(data, request))
            .await
    }

    async fn rename_column(
        &self,
        project_id: &ProjectId,
        column_id: &ColumnId,
        title: &str,
    ) -> StoreResult<()> {
        self.write(StoreCall::RenameColumn, project_id, |data| {
            ops::rename_column(data, column_id, title)
        })
        .await
    }

    async fn create_column(&self, project_id: &ProjectId, title: &str) -> StoreResult<Column> {
        self.write(StoreCall::CreateColumn, project_id, |data| {
            ops::create_column(data, title)
        })
        .await
    }

    async fn reorder_columns(&self, project_id: &ProjectId, order: &[ColumnId]) -> StoreResult<()> {
        self.write(StoreCall::ReorderColumns, project_id, |data| {
            ops::reorder_columns(data, order)
        })
        .await
    }

    async fn update_task(
        &self,
        project_id: &ProjectId,
        task_id: &TaskId,
        update: &TaskUpdate,
    ) -> StoreResult<Task> {
        self.write(StoreCall::UpdateTask, project_id, |data| {
            ops::update_task(data, task_id, update)
        })
        .await
    }

    async fn delete_task(&self, project_id: &ProjectId, task_id: &TaskId) -> StoreResult<()> {
        self.write(StoreCall::DeleteTask, project_id, |data| {
            ops::delete_task(data, task_id)
        })
        .await
    }
}
