//! Keyboard-drag gesture: `idle -> grabbed -> idle`.
//!
//! Space grabs the focused task, arrows move it one slot or one column at a
//! time, Space again commits and Escape restores the pre-grab arrangement.

use super::drag::{DragState, KeyboardGrab};
use super::reconcile::PendingMove;
use super::reorder::{MoveResult, move_task};
use super::session::BoardSession;
use crate::notify::Toast;
use crate::types::{ColumnId, TaskId};

pub const KEYBOARD_HINT: &str =
    "Moving task: use arrow keys to move, Space to drop, Escape to cancel";

/// Keys the board reacts to while a task has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardKey {
    Space,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Escape,
    Other,
}

impl BoardKey {
    /// Map a DOM-style key name onto a board key
    pub fn from_key_name(name: &str) -> Self {
        match name {
            " " | "Space" | "Spacebar" => BoardKey::Space,
            "ArrowUp" | "Up" => BoardKey::ArrowUp,
            "ArrowDown" | "Down" => BoardKey::ArrowDown,
            "ArrowLeft" | "Left" => BoardKey::ArrowLeft,
            "ArrowRight" | "Right" => BoardKey::ArrowRight,
            "Escape" | "Esc" => BoardKey::Escape,
            _ => BoardKey::Other,
        }
    }
}

/// What a key press did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not a key for this task in this state
    Ignored,
    Grabbed,
    Moved(MoveResult),
    /// A move key that had nowhere to go
    Unchanged,
    /// Grab ended away from where it started; the write must be reconciled
    Committed(PendingMove),
    /// Grab ended where it started; nothing to persist
    CommittedNoop,
    Cancelled,
}

#[derive(Clone, Copy)]
enum Step {
    Up,
    Down,
    Left,
    Right,
}

impl BoardSession {
    /// Handle a key pressed while `focused` has focus
    pub fn handle_task_key(&mut self, focused: &TaskId, key: BoardKey) -> KeyOutcome {
        let grabbed_here = match &self.drag {
            None => None,
            Some(DragState::Pointer(_)) => return KeyOutcome::Ignored,
            Some(DragState::Keyboard(grab)) => Some(grab.task_id == *focused),
        };
        match (grabbed_here, key) {
            (None, BoardKey::Space) => self.grab(focused),
            (None, _) | (Some(false), _) => KeyOutcome::Ignored,
            (Some(true), BoardKey::Space) => self.commit_grab(),
            (Some(true), BoardKey::Escape) => self.cancel_grab(),
            (Some(true), BoardKey::ArrowUp) => self.step(Step::Up),
            (Some(true), BoardKey::ArrowDown) => self.step(Step::Down),
            (Some(true), BoardKey::ArrowLeft) => self.step(Step::Left),
            (Some(true), BoardKey::ArrowRight) => self.step(Step::Right),
            (Some(true), BoardKey::Other) => KeyOutcome::Ignored,
        }
    }

    fn grab(&mut self, task_id: &TaskId) -> KeyOutcome {
        if self.is_busy(task_id) {
            tracing::debug!(task_id = %task_id, "grab suppressed, write in flight");
            return KeyOutcome::Ignored;
        }
        let Some((column_id, index)) = self.state.locate(task_id) else {
            return KeyOutcome::Ignored;
        };
        tracing::debug!(task_id = %task_id, column_id = %column_id, index, "task grabbed");
        self.drag = Some(DragState::Keyboard(KeyboardGrab {
            task_id: task_id.clone(),
            from_column_id: column_id.clone(),
            from_index: index,
            current_column_id: column_id,
            current_index: index,
            snapshot: self.state.snapshot(),
        }));
        if self.options.keyboard_hint && !self.hint_shown {
            self.hint_shown = true;
            self.notifier.notify(Toast::info(KEYBOARD_HINT));
        }
        self.focused = Some(task_id.clone());
        self.mark_dirty();
        KeyOutcome::Grabbed
    }

    fn step(&mut self, step: Step) -> KeyOutcome {
        let Some(DragState::Keyboard(grab)) = &self.drag else {
            return KeyOutcome::Ignored;
        };
        let task_id = grab.task_id.clone();
        let Some((column_id, index)) = self.state.locate(&task_id) else {
            return KeyOutcome::Unchanged;
        };
        let Some((target_column, target_index)) = self.step_target(&column_id, index, step) else {
            return KeyOutcome::Unchanged;
        };
        let Some(result) = move_task(&mut self.state, &task_id, &target_column, target_index) else {
            return KeyOutcome::Unchanged;
        };
        self.state.renumber_positions();
        if let Some(DragState::Keyboard(grab)) = &mut self.drag {
            grab.current_column_id = result.to_column_id.clone();
            grab.current_index = result.to_index;
        }
        self.focused = Some(task_id);
        self.mark_dirty();
        KeyOutcome::Moved(result)
    }

    /// Where one step from (`column_id`, `index`) lands.
    ///
    /// Left and right follow canonical column order, collapsed and hidden
    /// columns included, and keep the vertical slot clamped to the target.
    fn step_target(&self, column_id: &ColumnId, index: usize, step: Step) -> Option<(ColumnId, usize)> {
        let columns = self.state.columns();
        let col_idx = self.state.column_index(column_id)?;
        match step {
            Step::Up => index.checked_sub(1).map(|i| (column_id.clone(), i)),
            // One past the end means "move to end"; the engine clamps it
            Step::Down => Some((column_id.clone(), (index + 1).min(columns[col_idx].len()))),
            Step::Left | Step::Right => {
                let target_idx = match step {
                    Step::Left => col_idx.checked_sub(1)?,
                    _ => col_idx + 1,
                };
                let target = columns.get(target_idx)?;
                if target.id().is_pending() {
                    return None;
                }
                Some((target.id().clone(), index.min(target.len())))
            }
        }
    }

    fn commit_grab(&mut self) -> KeyOutcome {
        let Some(DragState::Keyboard(grab)) = self.drag.take() else {
            return KeyOutcome::Ignored;
        };
        self.focused = Some(grab.task_id.clone());
        self.mark_dirty();
        // A refresh may have moved the task since the last arrow key
        let (to_column_id, to_index) = self
            .state
            .locate(&grab.task_id)
            .unwrap_or((grab.current_column_id, grab.current_index));
        if to_column_id == grab.from_column_id && to_index == grab.from_index {
            tracing::debug!(task_id = %grab.task_id, "grab released in place");
            return KeyOutcome::CommittedNoop;
        }
        self.state.renumber_positions();
        let result = MoveResult {
            task_id: grab.task_id,
            from_column_id: grab.from_column_id,
            to_column_id,
            from_index: grab.from_index,
            to_index,
        };
        KeyOutcome::Committed(PendingMove::new(&self.state, result, grab.snapshot))
    }

    fn cancel_grab(&mut self) -> KeyOutcome {
        let Some(DragState::Keyboard(grab)) = self.drag.take() else {
            return KeyOutcome::Ignored;
        };
        tracing::debug!(task_id = %grab.task_id, "grab cancelled, restoring snapshot");
        self.state.restore(&grab.snapshot);
        self.state.renumber_positions();
        self.focused = Some(grab.task_id);
        self.mark_dirty();
        KeyOutcome::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fixtures::{ids, session};
    use crate::notify::ToastLevel;

    fn press(session: &mut BoardSession, task: &str, keys: &[BoardKey]) -> Vec<KeyOutcome> {
        keys.iter()
            .map(|key| session.handle_task_key(&task.into(), *key))
            .collect()
    }

    #[test]
    fn test_key_names() {
        assert_eq!(BoardKey::from_key_name(" "), BoardKey::Space);
        assert_eq!(BoardKey::from_key_name("ArrowLeft"), BoardKey::ArrowLeft);
        assert_eq!(BoardKey::from_key_name("Esc"), BoardKey::Escape);
        assert_eq!(BoardKey::from_key_name("Enter"), BoardKey::Other);
    }

    #[test]
    fn test_arrow_right_keeps_slot_clamped() {
        let (mut session, _) = session(&[("todo", "t1 t2"), ("done", "d1 d2 d3")]);
        press(&mut session, "t2", &[BoardKey::Space, BoardKey::ArrowUp]);
        let outcome = session.handle_task_key(&"t2".into(), BoardKey::ArrowRight);
        let KeyOutcome::Moved(result) = outcome else {
            panic!("expected move, got {outcome:?}");
        };
        assert_eq!(result.to_column_id, ColumnId::from("done"));
        assert_eq!(result.to_index, 0);
        assert_eq!(ids(session.state(), "done"), vec!["t2", "d1", "d2", "d3"]);
    }

    #[test]
    fn test_arrow_right_clamps_to_target_length() {
        let (mut session, _) = session(&[("todo", "t1 t2 t3"), ("done", "d1")]);
        press(&mut session, "t3", &[BoardKey::Space, BoardKey::ArrowRight]);
        assert_eq!(ids(session.state(), "done"), vec!["d1", "t3"]);
    }

    #[test]
    fn test_three_downs_then_escape_restores() {
        let (mut session, _) = session(&[("todo", "t1 t2 t3 t4"), ("done", "d1")]);
        let before = session.state().snapshot();
        let outcomes = press(
            &mut session,
            "t1",
            &[
                BoardKey::Space,
                BoardKey::ArrowDown,
                BoardKey::ArrowDown,
                BoardKey::ArrowDown,
            ],
        );
        assert!(outcomes[1..].iter().all(|o| matches!(o, KeyOutcome::Moved(_))));
        assert_eq!(ids(session.state(), "todo"), vec!["t2", "t3", "t4", "t1"]);

        assert_eq!(
            session.handle_task_key(&"t1".into(), BoardKey::Escape),
            KeyOutcome::Cancelled
        );
        assert_eq!(session.state().snapshot(), before);
        assert!(session.drag().is_none());
        assert_eq!(session.focused(), Some(&TaskId::from("t1")));
    }

    #[test]
    fn test_moves_past_edges_are_unchanged() {
        let (mut session, _) = session(&[("todo", "t1 t2")]);
        let outcomes = press(
            &mut session,
            "t1",
            &[BoardKey::Space, BoardKey::ArrowUp, BoardKey::ArrowLeft, BoardKey::ArrowRight],
        );
        assert_eq!(outcomes[1..], [KeyOutcome::Unchanged, KeyOutcome::Unchanged, KeyOutcome::Unchanged]);
        press(&mut session, "t1", &[BoardKey::ArrowDown]);
        assert_eq!(
            session.handle_task_key(&"t1".into(), BoardKey::ArrowDown),
            KeyOutcome::Unchanged
        );
    }

    #[test]
    fn test_commit_at_origin_is_noop() {
        let (mut session, _) = session(&[("todo", "t1 t2"), ("done", "")]);
        let outcomes = press(
            &mut session,
            "t1",
            &[BoardKey::Space, BoardKey::ArrowRight, BoardKey::ArrowLeft, BoardKey::Space],
        );
        assert_eq!(outcomes[3], KeyOutcome::CommittedNoop);
        assert_eq!(ids(session.state(), "todo"), vec!["t1", "t2"]);
    }

    #[test]
    fn test_commit_after_move_yields_pending_write() {
        let (mut session, _) = session(&[("todo", "t1 t2"), ("done", "d1")]);
        press(&mut session, "t2", &[BoardKey::Space, BoardKey::ArrowRight]);
        let outcome = session.handle_task_key(&"t2".into(), BoardKey::Space);
        let KeyOutcome::Committed(pending) = outcome else {
            panic!("expected commit, got {outcome:?}");
        };
        assert_eq!(pending.result.from_column_id, ColumnId::from("todo"));
        assert_eq!(pending.result.from_index, 1);
        assert_eq!(pending.result.to_index, 1);
        assert_eq!(pending.ordered_from, vec![TaskId::from("t1")]);
        assert_eq!(pending.ordered_to, vec![TaskId::from("d1"), TaskId::from("t2")]);
        assert_eq!(session.state().task(&"t2".into()).unwrap().position, 2);
    }

    #[test]
    fn test_keys_for_other_task_are_ignored() {
        let (mut session, _) = session(&[("todo", "t1 t2")]);
        press(&mut session, "t1", &[BoardKey::Space]);
        assert_eq!(
            session.handle_task_key(&"t2".into(), BoardKey::ArrowDown),
            KeyOutcome::Ignored
        );
        assert_eq!(
            session.handle_task_key(&"t2".into(), BoardKey::Space),
            KeyOutcome::Ignored
        );
        assert_eq!(ids(session.state(), "todo"), vec!["t1", "t2"]);
    }

    #[test]
    fn test_hint_shown_once_per_session() {
        let (mut session, toasts) = session(&[("todo", "t1 t2")]);
        press(&mut session, "t1", &[BoardKey::Space, BoardKey::Escape, BoardKey::Space]);
        assert_eq!(toasts.count(ToastLevel::Info), 1);
        assert_eq!(toasts.snapshot()[0].message, KEYBOARD_HINT);
    }

    #[test]
    fn test_pointer_drag_blocks_grab() {
        let (mut session, _) = session(&[("todo", "t1 t2")]);
        session.pointer_drag_start(&"t2".into());
        assert_eq!(
            session.handle_task_key(&"t1".into(), BoardKey::Space),
            KeyOutcome::Ignored
        );
    }
}
