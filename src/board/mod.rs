//! Board state, reordering gestures, projection, and reconciliation.
//!
//! `BoardSession` owns everything a mounted board needs and is driven
//! synchronously; `BoardController` wraps it for hosts and performs the
//! asynchronous writes against the board store.

pub mod controller;
pub mod drag;
pub mod filter;
pub mod keyboard;
pub mod listeners;
pub mod metadata;
pub mod preferences;
pub mod reconcile;
pub mod reorder;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod stats;

pub use controller::{BoardController, BoardServices, KeyResponse};
pub use drag::{CardRect, DragState, KeyboardGrab, PointerDrag};
pub use filter::{BoardView, CardView, ColumnView, FilterState};
pub use keyboard::{BoardKey, KeyOutcome};
pub use listeners::Subscription;
pub use metadata::{ChecklistItem, Label, TaskMetadata, TaskMetadataStore};
pub use preferences::{ColumnPreference, ColumnPreferences};
pub use reconcile::{Outcome, PendingMove, Rollback};
pub use reorder::{MoveResult, move_task};
pub use session::{BoardSession, SessionOptions};
pub use snapshot::{BoardSnapshot, ColumnSnapshot};
pub use state::{BoardState, ColumnState};
pub use stats::{BoardStats, ColumnStats};

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use super::session::{BoardSession, SessionOptions};
    use super::state::BoardState;
    use crate::notify::ToastLog;
    use crate::storage::MemoryStorage;
    use crate::types::{BoardData, Column, Project, ProjectId, Task};

    /// Board data from `(column, "space separated task ids")` pairs.
    ///
    /// Column ids double as titles; task ids double as titles.
    pub fn board_data(columns: &[(&str, &str)]) -> BoardData {
        let project_id = ProjectId::from("p1");
        let mut data = BoardData {
            project: Project {
                id: project_id.clone(),
                name: "Demo".to_string(),
            },
            columns: vec![],
            tasks: vec![],
        };
        for (col_pos, (column_id, task_ids)) in columns.iter().enumerate() {
            data.columns.push(Column {
                id: (*column_id).into(),
                project_id: project_id.clone(),
                title: column_id.to_string(),
                position: col_pos as u32 + 1,
            });
            for (pos, task_id) in task_ids.split_whitespace().enumerate() {
                data.tasks.push(Task {
                    id: task_id.into(),
                    project_id: project_id.clone(),
                    column_id: (*column_id).into(),
                    title: task_id.to_string(),
                    position: pos as u32 + 1,
                    description: None,
                });
            }
        }
        data
    }

    pub fn board(columns: &[(&str, &str)]) -> BoardState {
        BoardState::build(&board_data(columns))
    }

    pub fn session(columns: &[(&str, &str)]) -> (BoardSession, Arc<ToastLog>) {
        let toasts = Arc::new(ToastLog::default());
        let session = BoardSession::new(
            &board_data(columns),
            SessionOptions::default(),
            toasts.clone(),
            Arc::new(MemoryStorage::default()),
        );
        (session, toasts)
    }

    pub fn ids(state: &BoardState, column_id: &str) -> Vec<String> {
        state
            .ordered_ids(&column_id.into())
            .iter()
            .map(|id| id.to_string())
            .collect()
    }
}
