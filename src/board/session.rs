//! Per-mount owner of everything a board needs.
//!
//! A `BoardSession` is built when a board mounts and dropped when it
//! unmounts. All mutation happens synchronously through `&mut self`; the
//! session never performs I/O against the board store itself.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use super::drag::DragState;
use super::filter::{BoardView, FilterState, ProjectionInput, is_column_rendered, project};
use super::metadata::{TaskMetadata, TaskMetadataStore};
use super::preferences::{ColumnPreference, ColumnPreferences};
use super::state::BoardState;
use super::stats::BoardStats;
use crate::error::{BoardError, Result};
use crate::notify::Notifier;
use crate::storage::LocalStorage;
use crate::types::{BoardData, Column, ColumnId, ProjectId, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Show the keyboard-drag hint the first time a task is grabbed
    pub keyboard_hint: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            keyboard_hint: true,
        }
    }
}

pub struct BoardSession {
    pub(super) state: BoardState,
    pub(super) drag: Option<DragState>,
    pub(super) filter: FilterState,
    pub(super) preferences: ColumnPreferences,
    pub(super) metadata: TaskMetadataStore,
    pub(super) focused: Option<TaskId>,
    pub(super) options: SessionOptions,
    pub(super) hint_shown: bool,
    /// Tasks with an unsettled write against the store
    pub(super) in_flight: HashSet<TaskId>,
    pub(super) notifier: Arc<dyn Notifier>,
    dirty: bool,
}

impl std::fmt::Debug for BoardSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardSession")
            .field("project_id", self.project_id())
            .field("columns", &self.state.columns().len())
            .field("tasks", &self.state.task_count())
            .field("drag", &self.drag)
            .field("filter", &self.filter)
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

impl BoardSession {
    pub fn new(
        data: &BoardData,
        options: SessionOptions,
        notifier: Arc<dyn Notifier>,
        storage: Arc<dyn LocalStorage>,
    ) -> Self {
        let state = BoardState::build(data);
        let project_id = state.project.id.clone();
        let mut preferences = ColumnPreferences::load(project_id.clone(), storage.clone());
        preferences.prune(&state.column_ids());
        let mut metadata = TaskMetadataStore::load(project_id, storage);
        metadata.prune(&state.task_ids());

        Self {
            state,
            drag: None,
            filter: FilterState::default(),
            preferences,
            metadata,
            focused: None,
            options,
            hint_shown: false,
            in_flight: HashSet::new(),
            notifier,
            dirty: true,
        }
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.state.project.id
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn preferences(&self) -> &ColumnPreferences {
        &self.preferences
    }

    pub fn metadata(&self) -> &TaskMetadataStore {
        &self.metadata
    }

    pub fn focused(&self) -> Option<&TaskId> {
        self.focused.as_ref()
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    /// Columns in canonical order
    pub fn columns(&self) -> Vec<Column> {
        self.state.columns().iter().map(|c| c.column.clone()).collect()
    }

    pub fn column_preferences(&self) -> BTreeMap<ColumnId, ColumnPreference> {
        self.preferences.all().clone()
    }

    pub fn view(&self) -> BoardView {
        project(&ProjectionInput {
            state: &self.state,
            filter: &self.filter,
            preferences: &self.preferences,
            metadata: &self.metadata,
            drag: self.drag.as_ref(),
            focused: self.focused.as_ref(),
        })
    }

    pub fn stats(&self) -> BoardStats {
        BoardStats::collect(&self.state, &self.view(), &self.preferences, &self.filter)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Recompute the view and metrics if anything changed since the last call
    pub fn take_render(&mut self) -> Option<(BoardView, BoardStats)> {
        if !std::mem::take(&mut self.dirty) {
            return None;
        }
        let view = self.view();
        let stats = BoardStats::collect(&self.state, &view, &self.preferences, &self.filter);
        Some((view, stats))
    }

    pub fn focus(&mut self, task_id: Option<TaskId>) {
        if self.focused != task_id {
            self.focused = task_id;
            self.mark_dirty();
        }
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) -> bool {
        let changed = self.filter.set_query(query);
        if changed {
            self.mark_dirty();
        }
        changed
    }

    /// Restrict rendering to `ids`; ids not on the board are dropped
    pub fn set_column_filter<I>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = ColumnId>,
    {
        let changed = self.filter.set_column_filter(ids, &self.state.column_ids());
        if changed {
            self.mark_dirty();
        }
        changed
    }

    pub fn set_column_hidden(&mut self, column_id: &ColumnId, hidden: bool) -> Result<bool> {
        self.require_column(column_id)?;
        let changed = self.preferences.set_hidden(column_id, hidden);
        if changed {
            self.mark_dirty();
        }
        Ok(changed)
    }

    pub fn set_column_collapsed(&mut self, column_id: &ColumnId, collapsed: bool) -> Result<bool> {
        self.require_column(column_id)?;
        let changed = self.preferences.set_collapsed(column_id, collapsed);
        if changed {
            self.mark_dirty();
        }
        Ok(changed)
    }

    /// Whether a pointer drop on `column_id` is accepted.
    ///
    /// Collapsed columns, columns not currently rendered, and columns the
    /// store has not confirmed yet never take drops.
    pub fn is_drop_target(&self, column_id: &ColumnId) -> bool {
        self.state.column(column_id).is_some()
            && !column_id.is_pending()
            && !self.preferences.is_collapsed(column_id)
            && is_column_rendered(column_id, &self.filter, &self.preferences)
    }

    /// Edit a task's metadata; changes re-render and feed search
    pub fn update_metadata(
        &mut self,
        task_id: &TaskId,
        f: impl FnOnce(&mut TaskMetadata),
    ) -> Result<()> {
        if self.state.task(task_id).is_none() {
            return Err(BoardError::TaskNotFound(task_id.to_string()));
        }
        self.metadata.update(task_id, f);
        self.mark_dirty();
        Ok(())
    }

    /// Rebuild the board wholesale from a fresh fetch.
    ///
    /// Preferences, filter ids, and metadata for vanished columns and tasks
    /// are pruned. A gesture whose task disappeared is dropped.
    pub fn replace_board(&mut self, data: &BoardData) {
        self.state = BoardState::build(data);

        if let Some(drag) = &self.drag
            && self.state.task(drag.task_id()).is_none()
        {
            tracing::debug!(task_id = %drag.task_id(), "task vanished during refresh, dropping gesture");
            self.drag = None;
        }
        if let Some(focused) = &self.focused
            && self.state.task(focused).is_none()
        {
            self.focused = None;
        }

        let column_ids = self.state.column_ids();
        self.preferences.prune(&column_ids);
        self.filter.prune(&column_ids);
        self.metadata.prune(&self.state.task_ids());
        self.mark_dirty();
    }

    pub(super) fn require_column(&self, column_id: &ColumnId) -> Result<&Column> {
        self.state
            .column(column_id)
            .map(|c| &c.column)
            .ok_or_else(|| BoardError::ColumnNotFound(column_id.to_string()))
    }
}
