//! Visibility and search projection of the canonical board.
//!
//! The projection is recomputed in full whenever anything changes; there is
//! no incremental update.

use std::collections::BTreeSet;

use serde::Serialize;

use super::drag::DragState;
use super::metadata::TaskMetadataStore;
use super::preferences::ColumnPreferences;
use super::state::BoardState;
use crate::types::{ColumnId, Task, TaskId};

/// Transient search and column filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub query: String,
    /// `None` shows every column not hidden by preference
    pub column_ids: Option<BTreeSet<ColumnId>>,
}

impl FilterState {
    pub fn set_query(&mut self, query: impl Into<String>) -> bool {
        let query = query.into();
        if self.query == query {
            return false;
        }
        self.query = query;
        true
    }

    /// Replace the column filter, keeping only ids present on the board.
    ///
    /// An empty result clears the filter.
    pub fn set_column_filter<I>(&mut self, ids: I, existing: &[ColumnId]) -> bool
    where
        I: IntoIterator<Item = ColumnId>,
    {
        let selected: BTreeSet<ColumnId> = ids
            .into_iter()
            .filter(|id| existing.contains(id))
            .collect();
        let next = if selected.is_empty() {
            None
        } else {
            Some(selected)
        };
        if self.column_ids == next {
            return false;
        }
        self.column_ids = next;
        true
    }

    /// Drop filter ids for columns that disappeared
    pub fn prune(&mut self, existing: &[ColumnId]) -> bool {
        match self.column_ids.take() {
            Some(ids) => {
                let before = ids.len();
                let kept: BTreeSet<ColumnId> =
                    ids.into_iter().filter(|id| existing.contains(id)).collect();
                let changed = kept.len() != before;
                self.column_ids = if kept.is_empty() { None } else { Some(kept) };
                changed
            }
            None => false,
        }
    }

    pub fn includes_column(&self, column_id: &ColumnId) -> bool {
        self.column_ids
            .as_ref()
            .is_none_or(|ids| ids.is_empty() || ids.contains(column_id))
    }

    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty() || self.column_ids.is_some()
    }
}

/// Case-insensitive substring match over title, description, and metadata
pub fn task_matches(task: &Task, metadata: &TaskMetadataStore, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    let mut corpus = task.title.to_lowercase();
    if let Some(description) = &task.description {
        corpus.push('\n');
        corpus.push_str(&description.to_lowercase());
    }
    if let Some(meta) = metadata.get(&task.id) {
        corpus.push('\n');
        corpus.push_str(&meta.search_text().to_lowercase());
    }
    corpus.contains(&needle)
}

/// Rendered board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    pub columns: Vec<ColumnView>,
    pub query: String,
    /// Tasks on the board, rendered or not
    pub total_tasks: usize,
    /// Tasks shown in expanded, rendered columns
    pub visible_tasks: usize,
}

impl BoardView {
    pub fn column(&self, column_id: &ColumnId) -> Option<&ColumnView> {
        self.columns.iter().find(|c| &c.id == column_id)
    }

    pub fn visible_task_ids(&self, column_id: &ColumnId) -> Vec<TaskId> {
        self.column(column_id)
            .map(|c| c.cards.iter().map(|card| card.task_id.clone()).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnView {
    pub id: ColumnId,
    pub title: String,
    pub position: u32,
    pub collapsed: bool,
    /// All tasks in the column
    pub task_count: usize,
    /// Tasks matching the search query
    pub match_count: usize,
    /// Empty for collapsed columns
    pub cards: Vec<CardView>,
    pub is_drop_target: bool,
    pub is_drop_highlight: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub task_id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub position: u32,
    pub labels: Vec<String>,
    /// (done, total) checklist items
    pub checklist: (usize, usize),
    pub is_dragging: bool,
    pub is_grabbed: bool,
    pub is_focused: bool,
    pub is_pending: bool,
}

/// Inputs the projector reads
pub struct ProjectionInput<'a> {
    pub state: &'a BoardState,
    pub filter: &'a FilterState,
    pub preferences: &'a ColumnPreferences,
    pub metadata: &'a TaskMetadataStore,
    pub drag: Option<&'a DragState>,
    pub focused: Option<&'a TaskId>,
}

/// A column is rendered when not hidden and admitted by the column filter
pub fn is_column_rendered(
    column_id: &ColumnId,
    filter: &FilterState,
    preferences: &ColumnPreferences,
) -> bool {
    !preferences.is_hidden(column_id) && filter.includes_column(column_id)
}

pub fn project(input: &ProjectionInput<'_>) -> BoardView {
    let state = input.state;
    let dragged = input.drag.map(DragState::task_id);
    let highlight = input.drag.and_then(DragState::drop_highlight);
    let grabbed = matches!(input.drag, Some(DragState::Keyboard(_)));

    let mut visible_tasks = 0;
    let columns: Vec<ColumnView> = state
        .columns()
        .iter()
        .filter(|c| is_column_rendered(c.id(), input.filter, input.preferences))
        .map(|column| {
            let collapsed = input.preferences.is_collapsed(column.id());
            let matching: Vec<&Task> = state
                .tasks_in(column)
                .filter(|t| task_matches(t, input.metadata, &input.filter.query))
                .collect();
            let match_count = matching.len();

            let cards: Vec<CardView> = if collapsed {
                Vec::new()
            } else {
                matching
                    .into_iter()
                    .map(|task| {
                        let meta = input.metadata.get(&task.id);
                        let is_dragged = dragged == Some(&task.id);
                        CardView {
                            task_id: task.id.clone(),
                            title: task.title.clone(),
                            description: task.description.clone(),
                            position: task.position,
                            labels: meta
                                .map(|m| m.labels.iter().map(|l| l.name.clone()).collect())
                                .unwrap_or_default(),
                            checklist: meta.map(|m| m.checklist_progress()).unwrap_or((0, 0)),
                            is_dragging: is_dragged && !grabbed,
                            is_grabbed: is_dragged && grabbed,
                            is_focused: input.focused == Some(&task.id),
                            is_pending: task.id.is_pending(),
                        }
                    })
                    .collect()
            };
            visible_tasks += cards.len();

            ColumnView {
                id: column.id().clone(),
                title: column.column.title.clone(),
                position: column.column.position,
                collapsed,
                task_count: column.len(),
                match_count,
                cards,
                is_drop_target: !collapsed && !column.id().is_pending(),
                is_drop_highlight: highlight == Some(column.id()),
            }
        })
        .collect();

    BoardView {
        columns,
        query: input.filter.query.clone(),
        total_tasks: state.task_count(),
        visible_tasks,
    }
}
