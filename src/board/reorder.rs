//! Task reordering within and across columns.

use serde::{Deserialize, Serialize};

use super::state::BoardState;
use crate::types::{ColumnId, TaskId};

/// Where a move took a task from and to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    pub task_id: TaskId,
    pub from_column_id: ColumnId,
    pub to_column_id: ColumnId,
    pub from_index: usize,
    pub to_index: usize,
}

impl MoveResult {
    pub fn is_cross_column(&self) -> bool {
        self.from_column_id != self.to_column_id
    }

    /// True when the move ends exactly where it started
    pub fn is_noop(&self) -> bool {
        !self.is_cross_column() && self.from_index == self.to_index
    }
}

/// Move a task to `requested_index` of `target_column_id`.
///
/// Returns `None` when the task or either column cannot be found, or when a
/// same-column move would land on the slot it already occupies. The caller
/// renumbers positions after a successful move.
pub fn move_task(
    state: &mut BoardState,
    task_id: &TaskId,
    target_column_id: &ColumnId,
    requested_index: usize,
) -> Option<MoveResult> {
    let (from_column_id, _) = state.locate(task_id)?;
    let from_col = state.column_index(&from_column_id)?;
    let to_col = state.column_index(target_column_id)?;

    let columns = state.columns_mut();
    let from_index = columns[from_col].index_of(task_id)?;

    let to_index = if from_col == to_col {
        let tasks = &mut columns[from_col].task_ids;
        let original_len = tasks.len();
        let target = requested_index.min(original_len.saturating_sub(1));
        if target == from_index {
            return None;
        }
        let moved = tasks.remove(from_index);
        let target = target.min(tasks.len());
        tasks.insert(target, moved);
        target
    } else {
        let moved = columns[from_col].task_ids.remove(from_index);
        let target_tasks = &mut columns[to_col].task_ids;
        let target = requested_index.min(target_tasks.len());
        target_tasks.insert(target, moved);
        target
    };

    if let Some(task) = state.task_mut(task_id) {
        task.column_id = target_column_id.clone();
    }

    tracing::debug!(
        task_id = %task_id,
        from = %from_column_id,
        to = %target_column_id,
        from_index,
        to_index,
        "moved task"
    );

    Some(MoveResult {
        task_id: task_id.clone(),
        from_column_id,
        to_column_id: target_column_id.clone(),
        from_index,
        to_index,
    })
}
