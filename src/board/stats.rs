//! Board metrics derived from the canonical state and the current view.

use serde::Serialize;

use super::filter::{BoardView, FilterState};
use super::preferences::ColumnPreferences;
use super::state::BoardState;
use crate::types::ColumnId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnStats {
    pub column_id: ColumnId,
    pub title: String,
    pub task_count: usize,
    /// Cards currently shown; zero for hidden, filtered out, or collapsed columns
    pub visible_count: usize,
    pub hidden: bool,
    pub collapsed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoardStats {
    pub total_tasks: usize,
    pub visible_tasks: usize,
    pub total_columns: usize,
    pub rendered_columns: usize,
    pub hidden_columns: usize,
    pub collapsed_columns: usize,
    pub filter_active: bool,
    pub columns: Vec<ColumnStats>,
}

impl BoardStats {
    pub fn collect(
        state: &BoardState,
        view: &BoardView,
        preferences: &ColumnPreferences,
        filter: &FilterState,
    ) -> Self {
        let columns: Vec<ColumnStats> = state
            .columns()
            .iter()
            .map(|column| {
                let pref = preferences.get(column.id());
                ColumnStats {
                    column_id: column.id().clone(),
                    title: column.column.title.clone(),
                    task_count: column.len(),
                    visible_count: view.column(column.id()).map_or(0, |c| c.cards.len()),
                    hidden: pref.hidden,
                    collapsed: pref.collapsed,
                }
            })
            .collect();

        Self {
            total_tasks: state.task_count(),
            visible_tasks: view.visible_tasks,
            total_columns: columns.len(),
            rendered_columns: view.columns.len(),
            hidden_columns: columns.iter().filter(|c| c.hidden).count(),
            collapsed_columns: columns.iter().filter(|c| c.collapsed).count(),
            filter_active: filter.is_active(),
            columns,
        }
    }

    pub fn column(&self, column_id: &ColumnId) -> Option<&ColumnStats> {
        self.columns.iter().find(|c| &c.column_id == column_id)
    }
}
