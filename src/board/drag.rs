//! Pointer-drag gesture: `idle -> dragging -> (dropped | cancelled) -> idle`.
//!
//! The transitions are driven by the host mapping its native drag events
//! onto `pointer_drag_start`, `pointer_drag_over`, `pointer_drop` and
//! `pointer_drag_end`. Only one gesture, pointer or keyboard, is ever live.

use serde::{Deserialize, Serialize};

use super::reconcile::PendingMove;
use super::reorder::move_task;
use super::session::BoardSession;
use super::snapshot::BoardSnapshot;
use super::state::BoardState;
use crate::types::{ColumnId, TaskId};

/// The single active reordering gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragState {
    Pointer(PointerDrag),
    Keyboard(KeyboardGrab),
}

impl DragState {
    pub fn task_id(&self) -> &TaskId {
        match self {
            DragState::Pointer(drag) => &drag.task_id,
            DragState::Keyboard(grab) => &grab.task_id,
        }
    }

    pub fn snapshot(&self) -> &BoardSnapshot {
        match self {
            DragState::Pointer(drag) => &drag.snapshot,
            DragState::Keyboard(grab) => &grab.snapshot,
        }
    }

    /// Column currently highlighted as the pointer's drop target
    pub fn drop_highlight(&self) -> Option<&ColumnId> {
        match self {
            DragState::Pointer(drag) => drag.drop_target.as_ref(),
            DragState::Keyboard(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerDrag {
    pub task_id: TaskId,
    pub from_column_id: ColumnId,
    pub snapshot: BoardSnapshot,
    /// Set once a drop on a column was processed; dragend restores otherwise
    pub drop_handled: bool,
    pub drop_target: Option<ColumnId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardGrab {
    pub task_id: TaskId,
    pub from_column_id: ColumnId,
    pub from_index: usize,
    pub current_column_id: ColumnId,
    pub current_index: usize,
    pub snapshot: BoardSnapshot,
}

/// Vertical extent of a rendered card, as measured by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRect {
    pub task_id: TaskId,
    pub top: f64,
    pub height: f64,
}

impl CardRect {
    pub fn new(task_id: impl Into<TaskId>, top: f64, height: f64) -> Self {
        Self {
            task_id: task_id.into(),
            top,
            height,
        }
    }

    pub fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Index among rendered cards where a drop at `pointer_y` lands.
///
/// The dragged card is skipped. The result is the index of the first card
/// whose midpoint lies below the pointer; a pointer exactly on a midpoint
/// counts toward the later slot.
pub fn compute_drop_index(cards: &[CardRect], dragged: &TaskId, pointer_y: f64) -> usize {
    cards
        .iter()
        .filter(|card| &card.task_id != dragged)
        .position(|card| pointer_y < card.midpoint())
        .unwrap_or_else(|| cards.iter().filter(|c| &c.task_id != dragged).count())
}

/// Translate a drop index among rendered cards to a canonical column index.
///
/// Rendered cards may be a filtered subset. The task lands just before the
/// canonical slot of the card it was dropped above, or at the end of the
/// column when dropped below every rendered card. Indices are expressed in
/// the column as it stands with the dragged task still in place.
pub fn canonical_drop_index(
    state: &BoardState,
    column_id: &ColumnId,
    cards: &[CardRect],
    dragged: &TaskId,
    rendered_index: usize,
) -> usize {
    let Some(column) = state.column(column_id) else {
        return 0;
    };
    let anchor = cards
        .iter()
        .filter(|card| &card.task_id != dragged)
        .nth(rendered_index)
        .and_then(|card| column.index_of(&card.task_id));

    let from_index = column.index_of(dragged);
    match (anchor, from_index) {
        // Moving down in the same column: removal shifts the anchor up by one
        (Some(anchor), Some(from)) if from < anchor => anchor - 1,
        (Some(anchor), _) => anchor,
        (None, Some(_)) => column.len().saturating_sub(1),
        (None, None) => column.len(),
    }
}

impl BoardSession {
    /// Begin a pointer drag of `task_id`.
    ///
    /// Returns false (and changes nothing) while a keyboard grab or another
    /// drag is active, while the task has an unsettled write, or when the
    /// task is unknown.
    pub fn pointer_drag_start(&mut self, task_id: &TaskId) -> bool {
        if self.drag.is_some() {
            tracing::debug!(task_id = %task_id, "drag start suppressed, gesture already active");
            return false;
        }
        if self.is_busy(task_id) {
            tracing::debug!(task_id = %task_id, "drag start suppressed, write in flight");
            return false;
        }
        let Some((from_column_id, _)) = self.state.locate(task_id) else {
            return false;
        };
        tracing::debug!(task_id = %task_id, column_id = %from_column_id, "pointer drag started");
        self.drag = Some(DragState::Pointer(PointerDrag {
            task_id: task_id.clone(),
            from_column_id,
            snapshot: self.state.snapshot(),
            drop_handled: false,
            drop_target: None,
        }));
        self.mark_dirty();
        true
    }

    /// Update the drop highlight; state is never mutated here
    pub fn pointer_drag_over(&mut self, column_id: Option<&ColumnId>) {
        let target = column_id.filter(|id| self.is_drop_target(id)).cloned();
        if let Some(DragState::Pointer(drag)) = &mut self.drag
            && drag.drop_target != target
        {
            drag.drop_target = target;
            self.mark_dirty();
        }
    }

    /// Drop the dragged task on a column.
    ///
    /// Drops on columns that cannot take cards (collapsed, hidden, or not yet
    /// confirmed by the store) are ignored, which leaves the drop unhandled so
    /// that dragend snaps the board back. A handled drop whose move is a no-op
    /// just re-renders. A real move returns the write to reconcile.
    pub fn pointer_drop(
        &mut self,
        column_id: &ColumnId,
        pointer_y: f64,
        cards: &[CardRect],
    ) -> Option<PendingMove> {
        if !self.is_drop_target(column_id) {
            tracing::debug!(column_id = %column_id, "drop ignored, column is not a drop target");
            return None;
        }
        let Some(DragState::Pointer(drag)) = &mut self.drag else {
            return None;
        };
        drag.drop_handled = true;
        drag.drop_target = None;
        let task_id = drag.task_id.clone();
        let snapshot = drag.snapshot.clone();

        let rendered_index = compute_drop_index(cards, &task_id, pointer_y);
        let index = canonical_drop_index(&self.state, column_id, cards, &task_id, rendered_index);
        self.mark_dirty();

        let result = move_task(&mut self.state, &task_id, column_id, index)?;
        self.state.renumber_positions();
        self.focused = Some(task_id);
        Some(PendingMove::new(&self.state, result, snapshot))
    }

    /// Finish the gesture; restores the pre-drag arrangement when no drop
    /// was handled. Always clears drag visuals.
    pub fn pointer_drag_end(&mut self) {
        let Some(DragState::Pointer(drag)) = self.drag.take() else {
            return;
        };
        if !drag.drop_handled {
            tracing::debug!(task_id = %drag.task_id, "drag cancelled, restoring snapshot");
            self.state.restore(&drag.snapshot);
            self.state.renumber_positions();
        }
        self.mark_dirty();
    }
}
