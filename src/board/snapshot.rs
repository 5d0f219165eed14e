//! Point-in-time capture of column membership and order, used for rollback.

use serde::{Deserialize, Serialize};

use crate::types::{ColumnId, TaskId};

/// Ordered task ids of a single column at snapshot time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSnapshot {
    pub column_id: ColumnId,
    pub task_ids: Vec<TaskId>,
}

/// Immutable capture of every column's task order.
///
/// Only ids are recorded; task contents are rolled back field by field by
/// the operations that change them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub columns: Vec<ColumnSnapshot>,
}

impl BoardSnapshot {
    pub fn column(&self, column_id: &ColumnId) -> Option<&ColumnSnapshot> {
        self.columns.iter().find(|c| &c.column_id == column_id)
    }

    /// Locate a task as (column, index) in the captured arrangement
    pub fn locate(&self, task_id: &TaskId) -> Option<(&ColumnId, usize)> {
        self.columns.iter().find_map(|c| {
            c.task_ids
                .iter()
                .position(|id| id == task_id)
                .map(|idx| (&c.column_id, idx))
        })
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.task_ids.len()).sum()
    }
}
