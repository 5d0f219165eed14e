//! Host-facing controller for a mounted board.
//!
//! Wraps a `BoardSession` and performs each optimistic write against the
//! board store. The session lock is never held across an await: a write
//! applies locally, releases the lock, awaits the store, then settles.
//! Listeners run after the lock is released.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::drag::CardRect;
use super::filter::{BoardView, FilterState};
use super::keyboard::{BoardKey, KeyOutcome};
use super::listeners::{Listeners, Subscription};
use super::metadata::TaskMetadata;
use super::preferences::ColumnPreference;
use super::reconcile::{Outcome, PendingMove};
use super::reorder::MoveResult;
use super::session::{BoardSession, SessionOptions};
use super::stats::BoardStats;
use crate::error::{BoardError, PromptCancelled, Result};
use crate::notify::{Notifier, Toast};
use crate::persistence::{BoardPersistence, MoveRequest};
use crate::prompt::Prompter;
use crate::storage::LocalStorage;
use crate::types::{
    Column, ColumnId, Direction, ProjectId, Task, TaskFields, TaskId, TaskUpdate, UserSession,
};

/// Collaborators a board is mounted with
#[derive(Clone)]
pub struct BoardServices {
    pub persistence: Arc<dyn BoardPersistence>,
    pub prompter: Arc<dyn Prompter>,
    pub notifier: Arc<dyn Notifier>,
    pub storage: Arc<dyn LocalStorage>,
}

/// Result of a key press routed through the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResponse {
    /// Handled without touching the store
    Local(KeyOutcome),
    /// The key committed a move and the store has answered
    Settled(Outcome<MoveResult>),
}

pub struct BoardController {
    project_id: ProjectId,
    user: UserSession,
    session: Mutex<BoardSession>,
    persistence: Arc<dyn BoardPersistence>,
    prompter: Arc<dyn Prompter>,
    notifier: Arc<dyn Notifier>,
    columns_listeners: Listeners<Vec<Column>>,
    metrics_listeners: Listeners<BoardStats>,
    render_listeners: Listeners<BoardView>,
    /// Columns as last published, to skip redundant column events
    last_columns: Mutex<Vec<Column>>,
}

impl std::fmt::Debug for BoardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardController")
            .field("project_id", &self.project_id)
            .field("user", &self.user.user_id)
            .field("session", &*self.session.lock())
            .finish_non_exhaustive()
    }
}

fn abandoned<T>(_: PromptCancelled) -> Outcome<T> {
    Outcome::Abandoned
}

impl BoardController {
    /// Fetch the board and build its session
    pub async fn mount(
        project_id: ProjectId,
        user: UserSession,
        services: BoardServices,
        options: SessionOptions,
    ) -> Result<Self> {
        let data = services.persistence.fetch_board(&project_id).await?;
        let session = BoardSession::new(
            &data,
            options,
            services.notifier.clone(),
            services.storage,
        );
        tracing::info!(
            project_id = %project_id,
            user_id = %user.user_id,
            columns = data.columns.len(),
            tasks = data.tasks.len(),
            "board mounted"
        );
        let columns = session.columns();
        Ok(Self {
            project_id,
            user,
            session: Mutex::new(session),
            persistence: services.persistence,
            prompter: services.prompter,
            notifier: services.notifier,
            columns_listeners: Listeners::default(),
            metrics_listeners: Listeners::default(),
            render_listeners: Listeners::default(),
            last_columns: Mutex::new(columns),
        })
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn user(&self) -> &UserSession {
        &self.user
    }

    /// Run `f` against the session, then publish any resulting render
    fn with_session<R>(&self, f: impl FnOnce(&mut BoardSession) -> R) -> R {
        let value = {
            let mut session = self.session.lock();
            f(&mut session)
        };
        self.publish();
        value
    }

    fn read<R>(&self, f: impl FnOnce(&BoardSession) -> R) -> R {
        f(&self.session.lock())
    }

    fn publish(&self) {
        let (render, columns) = {
            let mut session = self.session.lock();
            (session.take_render(), session.columns())
        };
        let Some((view, stats)) = render else {
            return;
        };
        let columns_changed = {
            let mut last = self.last_columns.lock();
            let changed = *last != columns;
            if changed {
                *last = columns.clone();
            }
            changed
        };
        if columns_changed {
            self.columns_listeners.emit(&columns);
        }
        self.render_listeners.emit(&view);
        self.metrics_listeners.emit(&stats);
    }

    // Queries

    pub fn view(&self) -> BoardView {
        self.read(|s| s.view())
    }

    pub fn get_columns(&self) -> Vec<Column> {
        self.read(|s| s.columns())
    }

    pub fn get_filter_state(&self) -> FilterState {
        self.read(|s| s.filter().clone())
    }

    pub fn get_column_preferences(&self) -> BTreeMap<ColumnId, ColumnPreference> {
        self.read(|s| s.column_preferences())
    }

    pub fn get_board_stats(&self) -> BoardStats {
        self.read(|s| s.stats())
    }

    pub fn task(&self, task_id: &TaskId) -> Option<Task> {
        self.read(|s| s.state().task(task_id).cloned())
    }

    /// Every task, column by column in display order
    pub fn tasks(&self) -> Vec<Task> {
        self.read(|s| {
            let state = s.state();
            state
                .columns()
                .iter()
                .flat_map(|column| state.tasks_in(column).cloned())
                .collect()
        })
    }

    pub fn task_metadata(&self, task_id: &TaskId) -> Option<TaskMetadata> {
        self.read(|s| s.metadata().get(task_id).cloned())
    }

    pub fn is_busy(&self, task_id: &TaskId) -> bool {
        self.read(|s| s.is_busy(task_id))
    }

    // Listeners

    /// Called with the full column list whenever it changes
    pub fn on_columns_change(
        &self,
        listener: impl Fn(&Vec<Column>) + Send + Sync + 'static,
    ) -> Subscription {
        self.columns_listeners.subscribe(listener)
    }

    /// Called with fresh stats after every re-render
    pub fn on_board_metrics_change(
        &self,
        listener: impl Fn(&BoardStats) + Send + Sync + 'static,
    ) -> Subscription {
        self.metrics_listeners.subscribe(listener)
    }

    pub fn on_render(&self, listener: impl Fn(&BoardView) + Send + Sync + 'static) -> Subscription {
        self.render_listeners.subscribe(listener)
    }

    // Local-only changes

    pub fn set_search_query(&self, query: &str) -> bool {
        self.with_session(|s| s.set_search_query(query))
    }

    pub fn set_column_filter<I>(&self, column_ids: I) -> bool
    where
        I: IntoIterator<Item = ColumnId>,
    {
        self.with_session(|s| s.set_column_filter(column_ids))
    }

    pub fn set_column_hidden(&self, column_id: &ColumnId, hidden: bool) -> Result<bool> {
        self.with_session(|s| s.set_column_hidden(column_id, hidden))
    }

    pub fn set_column_collapsed(&self, column_id: &ColumnId, collapsed: bool) -> Result<bool> {
        self.with_session(|s| s.set_column_collapsed(column_id, collapsed))
    }

    pub fn focus(&self, task_id: Option<TaskId>) {
        self.with_session(|s| s.focus(task_id));
    }

    pub fn update_metadata(
        &self,
        task_id: &TaskId,
        f: impl FnOnce(&mut TaskMetadata),
    ) -> Result<()> {
        self.with_session(|s| s.update_metadata(task_id, f))
    }

    // Pointer gestures

    pub fn drag_start(&self, task_id: &TaskId) -> bool {
        self.with_session(|s| s.pointer_drag_start(task_id))
    }

    pub fn drag_over(&self, column_id: Option<&ColumnId>) {
        self.with_session(|s| s.pointer_drag_over(column_id));
    }

    /// Drop the dragged card over `column_id` at `pointer_y`.
    ///
    /// `cards` are the rendered cards of the target column.
    pub async fn drop(
        &self,
        column_id: &ColumnId,
        pointer_y: f64,
        cards: &[CardRect],
    ) -> Outcome<MoveResult> {
        let pending = self.with_session(|s| {
            let pending = s.pointer_drop(column_id, pointer_y, cards);
            if let Some(pending) = &pending {
                s.begin_write(&pending.result.task_id);
            }
            pending
        });
        match pending {
            Some(pending) => self.persist_move(pending).await,
            None => Outcome::Unchanged,
        }
    }

    pub fn drag_end(&self) {
        self.with_session(|s| s.pointer_drag_end());
    }

    // Keyboard gestures

    pub async fn handle_key(&self, focused: &TaskId, key: BoardKey) -> KeyResponse {
        let outcome = self.with_session(|s| {
            let outcome = s.handle_task_key(focused, key);
            if let KeyOutcome::Committed(pending) = &outcome {
                s.begin_write(&pending.result.task_id);
            }
            outcome
        });
        match outcome {
            KeyOutcome::Committed(pending) => KeyResponse::Settled(self.persist_move(pending).await),
            other => KeyResponse::Local(other),
        }
    }

    // Writes

    /// Persist a move already applied to the board
    pub async fn commit_move(&self, pending: PendingMove) -> Outcome<MoveResult> {
        self.with_session(|s| s.begin_write(&pending.result.task_id));
        self.persist_move(pending).await
    }

    /// Write a move whose task already holds its in-flight guard
    async fn persist_move(&self, pending: PendingMove) -> Outcome<MoveResult> {
        let request = MoveRequest {
            task_id: pending.result.task_id.clone(),
            from_column_id: pending.result.from_column_id.clone(),
            to_column_id: pending.result.to_column_id.clone(),
            ordered_from: pending.ordered_from.clone(),
            ordered_to: pending.ordered_to.clone(),
        };
        tracing::debug!(
            task_id = %request.task_id,
            from = %request.from_column_id,
            to = %request.to_column_id,
            "persisting move"
        );
        let result = self.persistence.move_task(&self.project_id, &request).await;
        let rollback = pending.rollback();
        self.with_session(|s| s.settle(rollback, result.map(|()| pending.result)))
    }

    /// Move a task to `index` of `column_id` and persist it
    pub async fn move_task(
        &self,
        task_id: &TaskId,
        column_id: &ColumnId,
        index: usize,
    ) -> Result<Outcome<MoveResult>> {
        let pending = self.with_session(|s| {
            let pending = s.move_task_to(task_id, column_id, index)?;
            if let Some(pending) = &pending {
                s.begin_write(&pending.result.task_id);
            }
            Ok::<_, BoardError>(pending)
        })?;
        Ok(match pending {
            Some(pending) => self.persist_move(pending).await,
            None => Outcome::Unchanged,
        })
    }

    /// Ask for task fields, then create the task in `column_id` (or the
    /// default column)
    pub async fn start_task_creation(&self, column_id: Option<&ColumnId>) -> Result<Outcome<Task>> {
        match self.prompter.prompt_task_fields(TaskFields::default()).await {
            Ok(fields) => self.create_task(column_id, fields).await,
            Err(cancelled) => Ok(abandoned(cancelled)),
        }
    }

    pub async fn create_task(
        &self,
        column_id: Option<&ColumnId>,
        fields: TaskFields,
    ) -> Result<Outcome<Task>> {
        let (placeholder, rollback) = self.with_session(|s| s.begin_create_task(column_id, fields))?;
        let result = self
            .persistence
            .create_task(
                &self.project_id,
                &placeholder.column_id,
                &placeholder.title,
                placeholder.description.as_deref(),
            )
            .await;
        Ok(self.with_session(|s| {
            let outcome = s.settle(rollback, result);
            if let Outcome::Saved(task) = &outcome {
                s.confirm_created_task(&placeholder.id, task.clone());
            }
            outcome
        }))
    }

    /// Prompt with the task's current fields and save what changed
    pub async fn edit_task(&self, task_id: &TaskId) -> Result<Outcome<Task>> {
        let current = self
            .task(task_id)
            .ok_or_else(|| BoardError::TaskNotFound(task_id.to_string()))?;
        let initial = TaskFields::new(current.title, current.description);
        let fields = match self.prompter.prompt_task_fields(initial).await {
            Ok(fields) => fields,
            Err(cancelled) => return Ok(abandoned(cancelled)),
        };
        let update = TaskUpdate {
            title: Some(fields.title),
            description: Some(fields.description),
        };
        self.update_task(task_id, update).await
    }

    pub async fn update_task(&self, task_id: &TaskId, update: TaskUpdate) -> Result<Outcome<Task>> {
        let Some((update, rollback)) = self.with_session(|s| s.begin_update_task(task_id, update))?
        else {
            return Ok(Outcome::Unchanged);
        };
        let result = self
            .persistence
            .update_task(&self.project_id, task_id, &update)
            .await;
        Ok(self.with_session(|s| s.settle(rollback, result)))
    }

    /// Delete a task after the user confirms
    pub async fn delete_task(&self, task_id: &TaskId) -> Result<Outcome<()>> {
        let title = self
            .task(task_id)
            .ok_or_else(|| BoardError::TaskNotFound(task_id.to_string()))?
            .title;
        if let Err(cancelled) = self.prompter.confirm(&format!("Delete task '{title}'?")).await {
            return Ok(abandoned(cancelled));
        }
        let rollback = self.with_session(|s| s.begin_delete_task(task_id))?;
        let result = self.persistence.delete_task(&self.project_id, task_id).await;
        Ok(self.with_session(|s| s.settle(rollback, result)))
    }

    /// Add a column; prompts for the title when none is given
    pub async fn create_column(&self, title: Option<&str>) -> Result<Outcome<Column>> {
        let title = match title {
            Some(title) => title.to_string(),
            None => match self.prompter.prompt_text("Column title", "").await {
                Ok(title) => title,
                Err(cancelled) => return Ok(abandoned(cancelled)),
            },
        };
        let (placeholder, rollback) = self.with_session(|s| s.begin_create_column(&title))?;
        let result = self
            .persistence
            .create_column(&self.project_id, &placeholder.title)
            .await;
        Ok(self.with_session(|s| {
            let outcome = s.settle(rollback, result);
            if let Outcome::Saved(column) = &outcome {
                s.confirm_created_column(&placeholder.id, column.clone());
            }
            outcome
        }))
    }

    /// Retitle a column; prompts with the current title when none is given.
    ///
    /// Saves to the new title.
    pub async fn rename_column(
        &self,
        column_id: &ColumnId,
        title: Option<&str>,
    ) -> Result<Outcome<String>> {
        let title = match title {
            Some(title) => title.to_string(),
            None => {
                let current = self
                    .read(|s| s.state().column(column_id).map(|c| c.column.title.clone()))
                    .ok_or_else(|| BoardError::ColumnNotFound(column_id.to_string()))?;
                match self.prompter.prompt_text("Column title", &current).await {
                    Ok(title) => title,
                    Err(cancelled) => return Ok(abandoned(cancelled)),
                }
            }
        };
        let Some((title, rollback)) =
            self.with_session(|s| s.begin_rename_column(column_id, &title))?
        else {
            return Ok(Outcome::Unchanged);
        };
        let result = self
            .persistence
            .rename_column(&self.project_id, column_id, &title)
            .await;
        Ok(self.with_session(|s| s.settle(rollback, result.map(|()| title))))
    }

    /// Swap a column with its neighbour; saves to the persisted order
    pub async fn move_column(
        &self,
        column_id: &ColumnId,
        direction: Direction,
    ) -> Result<Outcome<Vec<ColumnId>>> {
        let Some((order, rollback)) =
            self.with_session(|s| s.begin_move_column(column_id, direction))?
        else {
            return Ok(Outcome::Unchanged);
        };
        let result = self
            .persistence
            .reorder_columns(&self.project_id, &order)
            .await;
        Ok(self.with_session(|s| s.settle(rollback, result.map(|()| order))))
    }

    /// Rebuild the board from the store
    pub async fn refresh(&self) -> Result<()> {
        match self.persistence.fetch_board(&self.project_id).await {
            Ok(data) => {
                self.with_session(|s| s.replace_board(&data));
                tracing::debug!(project_id = %self.project_id, "board refreshed");
                Ok(())
            }
            Err(error) => {
                tracing::warn!(project_id = %self.project_id, %error, "refresh failed");
                self.notifier.notify(Toast::error(format!(
                    "Could not refresh board: {}",
                    error.user_message()
                )));
                Err(error.into())
            }
        }
    }
}
