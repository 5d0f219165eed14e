//! Optimistic local writes and their reconciliation with the board store.
//!
//! Every write is applied locally first and re-rendered at once. The
//! `begin_*` methods return the `Rollback` that undoes exactly what they
//! changed; `settle` consumes it once the store has answered. A rejected
//! write is always rolled back before its single error toast is raised.

use unicase::UniCase;

use super::metadata::TaskMetadata;
use super::reorder::{MoveResult, move_task};
use super::session::BoardSession;
use super::snapshot::BoardSnapshot;
use super::state::BoardState;
use crate::error::{BoardError, PersistenceError, Result};
use crate::notify::Toast;
use crate::types::{
    Column, ColumnId, Direction, Task, TaskFields, TaskId, TaskUpdate, validate_title,
};

/// A locally applied move awaiting the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    pub result: MoveResult,
    /// Arrangement before the gesture started
    pub snapshot: BoardSnapshot,
    pub ordered_from: Vec<TaskId>,
    /// Same as `ordered_from` for a move within one column
    pub ordered_to: Vec<TaskId>,
}

impl PendingMove {
    pub fn new(state: &BoardState, result: MoveResult, snapshot: BoardSnapshot) -> Self {
        let ordered_from = state.ordered_ids(&result.from_column_id);
        let ordered_to = if result.is_cross_column() {
            state.ordered_ids(&result.to_column_id)
        } else {
            ordered_from.clone()
        };
        Self {
            result,
            snapshot,
            ordered_from,
            ordered_to,
        }
    }

    pub fn rollback(&self) -> Rollback {
        Rollback::Move {
            task_id: self.result.task_id.clone(),
            snapshot: self.snapshot.clone(),
        }
    }
}

/// How a host-facing operation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The store accepted the write
    Saved(T),
    /// Nothing to do; no write was issued
    Unchanged,
    /// The user dismissed a prompt
    Abandoned,
    /// The store rejected the write and the local change was rolled back
    Reverted(PersistenceError),
}

impl<T> Outcome<T> {
    pub fn is_saved(&self) -> bool {
        matches!(self, Outcome::Saved(_))
    }

    pub fn is_reverted(&self) -> bool {
        matches!(self, Outcome::Reverted(_))
    }

    pub fn saved(self) -> Option<T> {
        match self {
            Outcome::Saved(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Saved(value) => Outcome::Saved(f(value)),
            Outcome::Unchanged => Outcome::Unchanged,
            Outcome::Abandoned => Outcome::Abandoned,
            Outcome::Reverted(error) => Outcome::Reverted(error),
        }
    }
}

/// Undo information for one optimistic write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rollback {
    Move {
        task_id: TaskId,
        snapshot: BoardSnapshot,
    },
    CreateTask {
        placeholder: TaskId,
    },
    UpdateTask {
        task_id: TaskId,
        title: String,
        description: Option<String>,
    },
    DeleteTask {
        task: Task,
        column_id: ColumnId,
        index: usize,
        metadata: Option<TaskMetadata>,
    },
    CreateColumn {
        placeholder: ColumnId,
    },
    RenameColumn {
        column_id: ColumnId,
        title: String,
    },
    ReorderColumns {
        order: Vec<ColumnId>,
    },
}

impl Rollback {
    /// Task whose in-flight guard this write holds
    pub fn task_id(&self) -> Option<&TaskId> {
        match self {
            Rollback::Move { task_id, .. } | Rollback::UpdateTask { task_id, .. } => Some(task_id),
            Rollback::CreateTask { placeholder } => Some(placeholder),
            Rollback::DeleteTask { task, .. } => Some(&task.id),
            Rollback::CreateColumn { .. }
            | Rollback::RenameColumn { .. }
            | Rollback::ReorderColumns { .. } => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rollback::Move { .. } => "Move",
            Rollback::CreateTask { .. } => "New task",
            Rollback::UpdateTask { .. } => "Task edit",
            Rollback::DeleteTask { .. } => "Task deletion",
            Rollback::CreateColumn { .. } => "New column",
            Rollback::RenameColumn { .. } => "Column rename",
            Rollback::ReorderColumns { .. } => "Column move",
        }
    }
}

impl BoardSession {
    /// True while a write for `task_id` is unsettled
    pub fn is_busy(&self, task_id: &TaskId) -> bool {
        self.in_flight.contains(task_id)
    }

    pub(crate) fn begin_write(&mut self, task_id: &TaskId) {
        self.in_flight.insert(task_id.clone());
    }

    pub(crate) fn end_write(&mut self, task_id: &TaskId) {
        self.in_flight.remove(task_id);
    }

    /// A task that exists and is free to change
    fn require_idle_task(&self, task_id: &TaskId) -> Result<&Task> {
        let task = self
            .state
            .task(task_id)
            .ok_or_else(|| BoardError::TaskNotFound(task_id.to_string()))?;
        let dragged = self.drag.as_ref().is_some_and(|d| d.task_id() == task_id);
        if self.is_busy(task_id) || dragged {
            return Err(BoardError::TaskBusy(task_id.to_string()));
        }
        Ok(task)
    }

    fn require_confirmed_column(&self, column_id: &ColumnId) -> Result<&Column> {
        let column = self.require_column(column_id)?;
        if column_id.is_pending() {
            return Err(BoardError::Validation(format!(
                "column '{}' is still being created",
                column.title
            )));
        }
        Ok(column)
    }

    fn ensure_unique_title(&self, title: &str, except: Option<&ColumnId>) -> Result<()> {
        let wanted = UniCase::new(title);
        let taken = self
            .state
            .columns()
            .iter()
            .filter(|c| Some(c.id()) != except)
            .any(|c| UniCase::new(c.column.title.as_str()) == wanted);
        if taken {
            return Err(BoardError::Validation(format!(
                "a column named '{title}' already exists"
            )));
        }
        Ok(())
    }

    /// Resolve the store's answer to an optimistic write.
    ///
    /// Releases the task's in-flight guard. On failure the local change is
    /// rolled back and exactly one error toast is raised.
    pub fn settle<T>(
        &mut self,
        rollback: Rollback,
        result: std::result::Result<T, PersistenceError>,
    ) -> Outcome<T> {
        if let Some(task_id) = rollback.task_id().cloned() {
            self.end_write(&task_id);
        }
        match result {
            Ok(value) => {
                tracing::info!(project_id = %self.project_id(), "{} saved", rollback.label());
                Outcome::Saved(value)
            }
            Err(error) => {
                self.revert(rollback, &error);
                Outcome::Reverted(error)
            }
        }
    }

    fn revert(&mut self, rollback: Rollback, error: &PersistenceError) {
        let label = rollback.label();
        tracing::warn!(project_id = %self.project_id(), %error, "{label} rejected, rolling back");

        match rollback {
            Rollback::Move { task_id, snapshot } => {
                self.state.restore(&snapshot);
                self.state.renumber_positions();
                if self.state.task(&task_id).is_some() {
                    self.focused = Some(task_id);
                }
            }
            Rollback::CreateTask { placeholder } => {
                self.state.remove_task(&placeholder);
                self.metadata.remove(&placeholder);
                if self.focused.as_ref() == Some(&placeholder) {
                    self.focused = None;
                }
            }
            Rollback::UpdateTask {
                task_id,
                title,
                description,
            } => {
                if let Some(task) = self.state.task_mut(&task_id) {
                    task.title = title;
                    task.description = description;
                }
            }
            Rollback::DeleteTask {
                task,
                column_id,
                index,
                metadata,
            } => {
                let task_id = task.id.clone();
                if self.state.insert_task(task, &column_id, index) {
                    if let Some(meta) = metadata {
                        self.metadata.restore(&task_id, meta);
                    }
                    self.focused = Some(task_id);
                } else {
                    tracing::warn!(task_id = %task_id, column_id = %column_id, "cannot restore deleted task, column is gone");
                }
            }
            Rollback::CreateColumn { placeholder } => {
                self.state.remove_empty_column(&placeholder);
                let column_ids = self.state.column_ids();
                self.preferences.prune(&column_ids);
                self.filter.prune(&column_ids);
            }
            Rollback::RenameColumn { column_id, title } => {
                self.state.set_column_title(&column_id, title);
            }
            Rollback::ReorderColumns { order } => {
                self.state.reorder_columns(&order);
            }
        }

        self.mark_dirty();
        self.notifier
            .notify(Toast::error(format!("{label} reverted: {}", error.user_message())));
    }

    /// Move a task outside of any gesture, e.g. from a command.
    ///
    /// `Ok(None)` means the move is a no-op and nothing should be written.
    pub fn move_task_to(
        &mut self,
        task_id: &TaskId,
        column_id: &ColumnId,
        index: usize,
    ) -> Result<Option<PendingMove>> {
        self.require_idle_task(task_id)?;
        self.require_confirmed_column(column_id)?;
        let snapshot = self.state.snapshot();
        let Some(result) = move_task(&mut self.state, task_id, column_id, index) else {
            return Ok(None);
        };
        self.state.renumber_positions();
        self.focused = Some(task_id.clone());
        self.mark_dirty();
        Ok(Some(PendingMove::new(&self.state, result, snapshot)))
    }

    /// Column a new task lands in when none is given: the first rendered,
    /// expanded column, else the first confirmed one.
    fn default_task_column(&self) -> Result<ColumnId> {
        let confirmed = || self.state.columns().iter().filter(|c| !c.id().is_pending());
        confirmed()
            .find(|c| self.is_drop_target(c.id()))
            .or_else(|| confirmed().next())
            .map(|c| c.id().clone())
            .ok_or_else(|| BoardError::Validation("the board has no columns yet".to_string()))
    }

    /// Insert a placeholder task at the end of the target column.
    ///
    /// The placeholder is swapped for the stored task by
    /// `confirm_created_task`, or removed on rollback.
    pub fn begin_create_task(
        &mut self,
        column_id: Option<&ColumnId>,
        fields: TaskFields,
    ) -> Result<(Task, Rollback)> {
        let fields = fields.validated()?;
        let column_id = match column_id {
            Some(id) => self.require_confirmed_column(id)?.id.clone(),
            None => self.default_task_column()?,
        };
        let placeholder = Task {
            id: TaskId::pending(),
            project_id: self.project_id().clone(),
            column_id: column_id.clone(),
            title: fields.title,
            position: 0,
            description: fields.description,
        };
        let index = self.state.column(&column_id).map_or(0, |c| c.len());
        self.state.insert_task(placeholder.clone(), &column_id, index);
        self.begin_write(&placeholder.id);
        self.mark_dirty();
        let rollback = Rollback::CreateTask {
            placeholder: placeholder.id.clone(),
        };
        Ok((placeholder, rollback))
    }

    /// Replace a placeholder with the task the store created
    pub fn confirm_created_task(&mut self, placeholder: &TaskId, task: Task) {
        let task_id = task.id.clone();
        if self.state.task(&task_id).is_some() {
            // A refresh already brought the stored task in
            self.state.remove_task(placeholder);
        } else if !self.state.replace_task(placeholder, task.clone()) {
            let column_id = task.column_id.clone();
            let end = self.state.column(&column_id).map_or(0, |c| c.len());
            if !self.state.insert_task(task, &column_id, end) {
                tracing::warn!(task_id = %task_id, column_id = %column_id, "created task has no column on this board");
            }
        }
        self.metadata.rekey(placeholder, &task_id);
        if self.focused.as_ref() == Some(placeholder) {
            self.focused = Some(task_id);
        }
        self.mark_dirty();
    }

    /// Apply the changed fields of `update` locally.
    ///
    /// Returns the normalized update to send, or `None` when nothing changes.
    pub fn begin_update_task(
        &mut self,
        task_id: &TaskId,
        update: TaskUpdate,
    ) -> Result<Option<(TaskUpdate, Rollback)>> {
        let task = self.require_idle_task(task_id)?;
        let title = match update.title {
            Some(title) => Some(validate_title(&title, "task")?).filter(|t| *t != task.title),
            None => None,
        };
        let description = update
            .description
            .map(|d| d.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()))
            .filter(|d| *d != task.description);
        let update = TaskUpdate { title, description };
        if update.is_empty() {
            return Ok(None);
        }

        let rollback = Rollback::UpdateTask {
            task_id: task_id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
        };
        if let Some(task) = self.state.task_mut(task_id) {
            if let Some(title) = &update.title {
                task.title = title.clone();
            }
            if let Some(description) = &update.description {
                task.description = description.clone();
            }
        }
        self.begin_write(task_id);
        self.mark_dirty();
        Ok(Some((update, rollback)))
    }

    pub fn begin_delete_task(&mut self, task_id: &TaskId) -> Result<Rollback> {
        self.require_idle_task(task_id)?;
        let (task, column_id, index) = self
            .state
            .remove_task(task_id)
            .ok_or_else(|| BoardError::TaskNotFound(task_id.to_string()))?;
        let metadata = self.metadata.remove(task_id);
        if self.focused.as_ref() == Some(task_id) {
            self.focused = None;
        }
        self.begin_write(task_id);
        self.mark_dirty();
        Ok(Rollback::DeleteTask {
            task,
            column_id,
            index,
            metadata,
        })
    }

    /// Append a placeholder column; titles are unique ignoring case
    pub fn begin_create_column(&mut self, title: &str) -> Result<(Column, Rollback)> {
        let title = validate_title(title, "column")?;
        self.ensure_unique_title(&title, None)?;
        let placeholder = Column {
            id: ColumnId::pending(),
            project_id: self.project_id().clone(),
            title,
            position: self.state.columns().len() as u32 + 1,
        };
        self.state.add_column(placeholder.clone());
        self.mark_dirty();
        let rollback = Rollback::CreateColumn {
            placeholder: placeholder.id.clone(),
        };
        Ok((placeholder, rollback))
    }

    pub fn confirm_created_column(&mut self, placeholder: &ColumnId, column: Column) {
        let column_id = column.id.clone();
        if self.state.column(&column_id).is_some() {
            self.state.remove_empty_column(placeholder);
        } else if !self.state.replace_column(placeholder, column.clone()) {
            self.state.add_column(column);
        }
        self.preferences.rekey(placeholder, &column_id);
        self.filter.prune(&self.state.column_ids());
        self.mark_dirty();
    }

    /// Retitle a column. `None` when the title is unchanged.
    pub fn begin_rename_column(
        &mut self,
        column_id: &ColumnId,
        title: &str,
    ) -> Result<Option<(String, Rollback)>> {
        let current = self.require_confirmed_column(column_id)?.title.clone();
        let title = validate_title(title, "column")?;
        if title == current {
            return Ok(None);
        }
        self.ensure_unique_title(&title, Some(column_id))?;
        let previous = self
            .state
            .set_column_title(column_id, title.clone())
            .unwrap_or(current);
        self.mark_dirty();
        Ok(Some((
            title,
            Rollback::RenameColumn {
                column_id: column_id.clone(),
                title: previous,
            },
        )))
    }

    /// Swap a column with its neighbour.
    ///
    /// Returns the confirmed column order to persist, or `None` when there is
    /// no neighbour in that direction.
    pub fn begin_move_column(
        &mut self,
        column_id: &ColumnId,
        direction: Direction,
    ) -> Result<Option<(Vec<ColumnId>, Rollback)>> {
        self.require_confirmed_column(column_id)?;
        let previous = self.state.column_ids();
        let Some(index) = self.state.column_index(column_id) else {
            return Err(BoardError::ColumnNotFound(column_id.to_string()));
        };
        let target = match direction {
            Direction::Left => index.checked_sub(1),
            Direction::Right => Some(index + 1).filter(|i| *i < previous.len()),
        };
        let Some(target) = target else {
            return Ok(None);
        };

        let mut order = previous.clone();
        order.swap(index, target);
        self.state.reorder_columns(&order);
        self.mark_dirty();
        let confirmed = order.into_iter().filter(|id| !id.is_pending()).collect();
        Ok(Some((confirmed, Rollback::ReorderColumns { order: previous })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fixtures::{ids, session};
    use crate::board::metadata::Label;
    use crate::notify::ToastLevel;

    fn network() -> PersistenceError {
        PersistenceError::Network("connection reset".to_string())
    }

    #[test]
    fn test_rejected_cross_column_move_rolls_back_once() {
        let (mut session, toasts) = session(&[("To do", "T1 T2"), ("Done", "")]);
        let before = session.state().snapshot();
        let pending = session
            .move_task_to(&"T1".into(), &"Done".into(), 0)
            .unwrap()
            .unwrap();
        assert_eq!(ids(session.state(), "Done"), vec!["T1"]);
        assert_eq!(session.state().task(&"T1".into()).unwrap().column_id, ColumnId::from("Done"));

        session.begin_write(&pending.result.task_id);
        let outcome = session.settle(pending.rollback(), Err::<(), _>(network()));

        assert!(outcome.is_reverted());
        assert_eq!(session.state().snapshot(), before);
        assert_eq!(session.state().task(&"T1".into()).unwrap().column_id, ColumnId::from("To do"));
        assert_eq!(toasts.count(ToastLevel::Error), 1);
        assert_eq!(
            toasts.snapshot()[0].message,
            "Move reverted: Network error, changes were not saved"
        );
        assert!(!session.is_busy(&"T1".into()));
        assert_eq!(session.focused(), Some(&TaskId::from("T1")));
    }

    #[test]
    fn test_move_to_same_slot_is_none() {
        let (mut session, _) = session(&[("todo", "t1 t2")]);
        assert_eq!(session.move_task_to(&"t2".into(), &"todo".into(), 1).unwrap(), None);
        assert_eq!(session.move_task_to(&"t2".into(), &"todo".into(), 9).unwrap(), None);
    }

    #[test]
    fn test_pending_move_orderings() {
        let (mut session, _) = session(&[("todo", "t1 t2 t3")]);
        let pending = session
            .move_task_to(&"t3".into(), &"todo".into(), 0)
            .unwrap()
            .unwrap();
        let expected: Vec<TaskId> = ["t3", "t1", "t2"].into_iter().map(TaskId::from).collect();
        assert_eq!(pending.ordered_from, expected);
        assert_eq!(pending.ordered_to, expected);
    }

    #[test]
    fn test_create_task_placeholder_confirmed_in_place() {
        let (mut session, _) = session(&[("todo", "t1"), ("done", "")]);
        let (placeholder, rollback) = session
            .begin_create_task(None, TaskFields::new("  Write docs ", None))
            .unwrap();
        assert!(placeholder.id.is_pending());
        assert_eq!(placeholder.title, "Write docs");
        assert!(session.is_busy(&placeholder.id));
        session.move_task_to(&"t1".into(), &"done".into(), 0).unwrap();

        let stored = Task {
            id: "t9".into(),
            position: 7,
            ..placeholder.clone()
        };
        let outcome = session.settle(rollback, Ok(stored.clone()));
        session.confirm_created_task(&placeholder.id, outcome.saved().unwrap());

        assert_eq!(ids(session.state(), "todo"), vec!["t9"]);
        assert_eq!(session.state().task(&"t9".into()).unwrap().position, 1);
        assert!(session.state().task(&placeholder.id).is_none());
        assert!(session.state().is_consistent());
    }

    #[test]
    fn test_create_task_rollback_removes_placeholder() {
        let (mut session, toasts) = session(&[("todo", "t1")]);
        let (placeholder, rollback) = session
            .begin_create_task(Some(&"todo".into()), TaskFields::new("x", None))
            .unwrap();
        assert_eq!(session.state().task_count(), 2);
        session.settle(rollback, Err::<Task, _>(PersistenceError::SessionExpired));
        assert_eq!(ids(session.state(), "todo"), vec!["t1"]);
        assert!(!session.is_busy(&placeholder.id));
        assert_eq!(toasts.snapshot()[0].message, "New task reverted: Sign-in expired");
    }

    #[test]
    fn test_create_task_validation_leaves_state_alone() {
        let (mut session, _) = session(&[("todo", "t1")]);
        let err = session
            .begin_create_task(None, TaskFields::new("   ", None))
            .unwrap_err();
        assert!(matches!(err, BoardError::Validation(_)));
        assert_eq!(session.state().task_count(), 1);
    }

    #[test]
    fn test_default_column_skips_collapsed() {
        let (mut session, _) = session(&[("a", ""), ("b", "")]);
        session.set_column_collapsed(&"a".into(), true).unwrap();
        let (placeholder, _) = session
            .begin_create_task(None, TaskFields::new("x", None))
            .unwrap();
        assert_eq!(placeholder.column_id, ColumnId::from("b"));
    }

    #[test]
    fn test_update_rollback_restores_fields() {
        let (mut session, _) = session(&[("todo", "t1")]);
        let update = TaskUpdate {
            title: Some("Renamed".to_string()),
            description: Some(Some("  details ".to_string())),
        };
        let (sent, rollback) = session.begin_update_task(&"t1".into(), update).unwrap().unwrap();
        assert_eq!(sent.description, Some(Some("details".to_string())));
        assert_eq!(session.state().task(&"t1".into()).unwrap().title, "Renamed");
        assert!(matches!(
            session.begin_update_task(&"t1".into(), TaskUpdate::default()),
            Err(BoardError::TaskBusy(_))
        ));

        session.settle(rollback, Err::<(), _>(network()));
        let task = session.state().task(&"t1".into()).unwrap();
        assert_eq!(task.title, "t1");
        assert_eq!(task.description, None);
    }

    #[test]
    fn test_update_without_changes_is_none() {
        let (mut session, _) = session(&[("todo", "t1")]);
        let update = TaskUpdate {
            title: Some(" t1 ".to_string()),
            description: Some(None),
        };
        assert!(session.begin_update_task(&"t1".into(), update).unwrap().is_none());
    }

    #[test]
    fn test_delete_rollback_reinserts_with_metadata() {
        let (mut session, _) = session(&[("todo", "t1 t2 t3")]);
        session
            .update_metadata(&"t2".into(), |m| m.labels.push(Label::new("keep")))
            .unwrap();
        let rollback = session.begin_delete_task(&"t2".into()).unwrap();
        assert_eq!(ids(session.state(), "todo"), vec!["t1", "t3"]);
        assert!(session.metadata().get(&"t2".into()).is_none());

        session.settle(rollback, Err::<(), _>(network()));
        assert_eq!(ids(session.state(), "todo"), vec!["t1", "t2", "t3"]);
        assert_eq!(session.metadata().get(&"t2".into()).unwrap().labels[0].name, "keep");
    }

    #[test]
    fn test_delete_of_dragged_task_is_refused() {
        let (mut session, _) = session(&[("todo", "t1")]);
        session.pointer_drag_start(&"t1".into());
        assert!(matches!(
            session.begin_delete_task(&"t1".into()),
            Err(BoardError::TaskBusy(_))
        ));
    }

    #[test]
    fn test_create_column_confirm_and_rollback() {
        let (mut session, toasts) = session(&[("todo", "")]);
        let (placeholder, rollback) = session.begin_create_column(" Review ").unwrap();
        assert_eq!(placeholder.position, 2);
        assert!(!session.is_drop_target(&placeholder.id));
        session.settle(rollback, Err::<Column, _>(network()));
        assert_eq!(session.state().column_ids(), vec![ColumnId::from("todo")]);
        assert_eq!(toasts.count(ToastLevel::Error), 1);

        let (placeholder, _) = session.begin_create_column("Review").unwrap();
        let stored = Column {
            id: "c-review".into(),
            ..placeholder.clone()
        };
        session.confirm_created_column(&placeholder.id, stored);
        assert_eq!(
            session.state().column_ids(),
            vec![ColumnId::from("todo"), ColumnId::from("c-review")]
        );
    }

    #[test]
    fn test_column_titles_are_unique_ignoring_case() {
        let (mut session, _) = session(&[("todo", ""), ("done", "")]);
        assert!(session.begin_create_column("TODO").is_err());
        assert!(session.begin_rename_column(&"done".into(), "Todo").is_err());
        assert_eq!(session.state().column(&"done".into()).unwrap().column.title, "done");
    }

    #[test]
    fn test_rename_rollback_restores_title() {
        let (mut session, _) = session(&[("todo", "")]);
        assert!(session.begin_rename_column(&"todo".into(), "todo").unwrap().is_none());
        let (title, rollback) = session
            .begin_rename_column(&"todo".into(), "Backlog")
            .unwrap()
            .unwrap();
        assert_eq!(title, "Backlog");
        session.settle(rollback, Err::<(), _>(network()));
        assert_eq!(session.state().column(&"todo".into()).unwrap().column.title, "todo");
    }

    #[test]
    fn test_move_column_and_rollback() {
        let (mut session, _) = session(&[("a", ""), ("b", ""), ("c", "")]);
        assert!(session.begin_move_column(&"a".into(), Direction::Left).unwrap().is_none());
        assert!(session.begin_move_column(&"c".into(), Direction::Right).unwrap().is_none());

        let (order, rollback) = session
            .begin_move_column(&"a".into(), Direction::Right)
            .unwrap()
            .unwrap();
        let expected: Vec<ColumnId> = ["b", "a", "c"].into_iter().map(ColumnId::from).collect();
        assert_eq!(order, expected);
        assert_eq!(session.state().column(&"a".into()).unwrap().column.position, 2);

        session.settle(rollback, Err::<(), _>(network()));
        let restored: Vec<ColumnId> = ["a", "b", "c"].into_iter().map(ColumnId::from).collect();
        assert_eq!(session.state().column_ids(), restored);
    }
}
