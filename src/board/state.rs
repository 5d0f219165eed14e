//! Canonical in-memory board: ordered columns, each holding ordered task ids,
//! plus the task records keyed by id.
//!
//! Column arrays and the task map are kept mutually consistent by every
//! method here: a task id appears in exactly one column, and every id in a
//! column resolves to a task record.

use std::collections::{HashMap, HashSet};

use super::snapshot::{BoardSnapshot, ColumnSnapshot};
use crate::types::{BoardData, Column, ColumnId, Project, Task, TaskId};

/// A column together with its tasks in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnState {
    pub column: Column,
    pub task_ids: Vec<TaskId>,
}

impl ColumnState {
    pub fn new(column: Column) -> Self {
        Self {
            column,
            task_ids: Vec::new(),
        }
    }

    pub fn id(&self) -> &ColumnId {
        &self.column.id
    }

    pub fn len(&self) -> usize {
        self.task_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.task_ids.is_empty()
    }

    pub fn index_of(&self, task_id: &TaskId) -> Option<usize> {
        self.task_ids.iter().position(|id| id == task_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub project: Project,
    columns: Vec<ColumnState>,
    tasks: HashMap<TaskId, Task>,
}

impl BoardState {
    /// Build the canonical state from a full board fetch.
    ///
    /// Columns and tasks are ordered by `position` with ties kept in input
    /// order; tasks pointing at an unknown column are dropped. Positions are
    /// re-derived as dense ranks afterwards.
    pub fn build(data: &BoardData) -> Self {
        let mut columns: Vec<Column> = data.columns.clone();
        columns.sort_by_key(|c| c.position);

        let mut column_states: Vec<ColumnState> = columns.into_iter().map(ColumnState::new).collect();
        let index_by_column: HashMap<ColumnId, usize> = column_states
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id().clone(), i))
            .collect();

        let mut grouped: Vec<Vec<&Task>> = vec![Vec::new(); column_states.len()];
        let mut seen: HashSet<&TaskId> = HashSet::new();
        for task in &data.tasks {
            if !seen.insert(&task.id) {
                tracing::warn!(task_id = %task.id, "duplicate task in board data, keeping first");
                continue;
            }
            match index_by_column.get(&task.column_id) {
                Some(&idx) => grouped[idx].push(task),
                None => {
                    tracing::warn!(
                        task_id = %task.id,
                        column_id = %task.column_id,
                        "task references unknown column, dropping"
                    );
                }
            }
        }

        let mut tasks = HashMap::with_capacity(data.tasks.len());
        for (column_state, mut group) in column_states.iter_mut().zip(grouped) {
            group.sort_by_key(|t| t.position);
            for task in group {
                column_state.task_ids.push(task.id.clone());
                tasks.insert(task.id.clone(), task.clone());
            }
        }

        let mut state = Self {
            project: data.project.clone(),
            columns: column_states,
            tasks,
        };
        state.renumber_positions();
        state
    }

    /// Capture every column's task order
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            columns: self
                .columns
                .iter()
                .map(|c| ColumnSnapshot {
                    column_id: c.id().clone(),
                    task_ids: c.task_ids.clone(),
                })
                .collect(),
        }
    }

    /// Replay a snapshot's membership and order.
    ///
    /// Ids no longer present are skipped. Columns absent from the snapshot
    /// keep whatever they hold that the snapshot did not claim, and tasks
    /// the snapshot never saw stay in the column they reference.
    pub fn restore(&mut self, snapshot: &BoardSnapshot) {
        let mut placed: HashSet<TaskId> = HashSet::new();
        let mut rebuilt: Vec<Option<Vec<TaskId>>> = vec![None; self.columns.len()];

        for (idx, column) in self.columns.iter().enumerate() {
            if let Some(snap) = snapshot.column(column.id()) {
                let ids: Vec<TaskId> = snap
                    .task_ids
                    .iter()
                    .filter(|id| self.tasks.contains_key(*id) && placed.insert((*id).clone()))
                    .cloned()
                    .collect();
                rebuilt[idx] = Some(ids);
            }
        }

        for (column, ids) in self.columns.iter_mut().zip(rebuilt) {
            match ids {
                Some(ids) => column.task_ids = ids,
                None => column.task_ids.retain(|id| !placed.contains(id)),
            }
        }
        for column in &self.columns {
            placed.extend(column.task_ids.iter().cloned());
        }

        let mut orphans: Vec<&Task> = self
            .tasks
            .values()
            .filter(|t| !placed.contains(&t.id))
            .collect();
        orphans.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id)));
        let orphans: Vec<(TaskId, ColumnId)> = orphans
            .into_iter()
            .map(|t| (t.id.clone(), t.column_id.clone()))
            .collect();
        for (task_id, column_id) in orphans {
            let idx = self.column_index(&column_id).unwrap_or(0);
            if let Some(column) = self.columns.get_mut(idx) {
                column.task_ids.push(task_id);
            }
        }

        self.renumber_positions();
    }

    /// Reassign dense 1-based positions and owning column ids.
    ///
    /// This is the only place positions are written.
    pub fn renumber_positions(&mut self) {
        for (col_idx, column) in self.columns.iter_mut().enumerate() {
            column.column.position = col_idx as u32 + 1;
            for (idx, task_id) in column.task_ids.iter().enumerate() {
                if let Some(task) = self.tasks.get_mut(task_id) {
                    task.position = idx as u32 + 1;
                    task.column_id = column.column.id.clone();
                }
            }
        }
    }

    pub fn columns(&self) -> &[ColumnState] {
        &self.columns
    }

    pub fn column(&self, column_id: &ColumnId) -> Option<&ColumnState> {
        self.columns.iter().find(|c| c.id() == column_id)
    }

    pub fn column_index(&self, column_id: &ColumnId) -> Option<usize> {
        self.columns.iter().position(|c| c.id() == column_id)
    }

    pub fn column_ids(&self) -> Vec<ColumnId> {
        self.columns.iter().map(|c| c.id().clone()).collect()
    }

    pub(crate) fn columns_mut(&mut self) -> &mut Vec<ColumnState> {
        &mut self.columns
    }

    pub fn task(&self, task_id: &TaskId) -> Option<&Task> {
        self.tasks.get(task_id)
    }

    pub(crate) fn task_mut(&mut self, task_id: &TaskId) -> Option<&mut Task> {
        self.tasks.get_mut(task_id)
    }

    pub fn task_ids(&self) -> HashSet<TaskId> {
        self.tasks.keys().cloned().collect()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Tasks of a column in display order
    pub fn tasks_in<'a>(&'a self, column: &'a ColumnState) -> impl Iterator<Item = &'a Task> + 'a {
        column.task_ids.iter().filter_map(|id| self.tasks.get(id))
    }

    /// Ordered ids of a column, empty when the column is unknown
    pub fn ordered_ids(&self, column_id: &ColumnId) -> Vec<TaskId> {
        self.column(column_id)
            .map(|c| c.task_ids.clone())
            .unwrap_or_default()
    }

    /// Find a task's column and index by scanning the column it references
    pub fn locate(&self, task_id: &TaskId) -> Option<(ColumnId, usize)> {
        let task = self.tasks.get(task_id)?;
        let column = self.column(&task.column_id)?;
        column
            .index_of(task_id)
            .map(|idx| (column.id().clone(), idx))
    }

    /// Insert a new task at `index` (clamped) of a column.
    ///
    /// Returns false when the column is unknown or the id is taken.
    pub fn insert_task(&mut self, mut task: Task, column_id: &ColumnId, index: usize) -> bool {
        if self.tasks.contains_key(&task.id) {
            return false;
        }
        let Some(column) = self.columns.iter_mut().find(|c| c.id() == column_id) else {
            return false;
        };
        let index = index.min(column.task_ids.len());
        column.task_ids.insert(index, task.id.clone());
        task.column_id = column_id.clone();
        self.tasks.insert(task.id.clone(), task);
        self.renumber_positions();
        true
    }

    /// Remove a task, returning it with the column and index it occupied
    pub fn remove_task(&mut self, task_id: &TaskId) -> Option<(Task, ColumnId, usize)> {
        let (column_id, index) = self.locate(task_id)?;
        if let Some(column) = self.columns.iter_mut().find(|c| c.id() == &column_id) {
            column.task_ids.remove(index);
        }
        let task = self.tasks.remove(task_id)?;
        self.renumber_positions();
        Some((task, column_id, index))
    }

    /// Swap a task record for another, keeping its slot.
    ///
    /// Used when the store confirms a placeholder under its real id.
    pub fn replace_task(&mut self, old_id: &TaskId, task: Task) -> bool {
        let Some((column_id, index)) = self.locate(old_id) else {
            return false;
        };
        if old_id != &task.id && self.tasks.contains_key(&task.id) {
            return false;
        }
        self.tasks.remove(old_id);
        if let Some(column) = self.columns.iter_mut().find(|c| c.id() == &column_id) {
            column.task_ids[index] = task.id.clone();
        }
        self.tasks.insert(task.id.clone(), task);
        self.renumber_positions();
        true
    }

    pub fn add_column(&mut self, column: Column) -> bool {
        if self.column(&column.id).is_some() {
            return false;
        }
        self.columns.push(ColumnState::new(column));
        self.renumber_positions();
        true
    }

    /// Remove an empty column; used to roll back an optimistic create
    pub(crate) fn remove_empty_column(&mut self, column_id: &ColumnId) -> bool {
        match self.column_index(column_id) {
            Some(idx) if self.columns[idx].is_empty() => {
                self.columns.remove(idx);
                self.renumber_positions();
                true
            }
            _ => false,
        }
    }

    /// Replace a column's id in place, keeping its tasks
    pub(crate) fn replace_column(&mut self, old_id: &ColumnId, column: Column) -> bool {
        let Some(idx) = self.column_index(old_id) else {
            return false;
        };
        self.columns[idx].column = column;
        self.renumber_positions();
        true
    }

    pub fn set_column_title(&mut self, column_id: &ColumnId, title: String) -> Option<String> {
        let column = self.columns.iter_mut().find(|c| c.id() == column_id)?;
        Some(std::mem::replace(&mut column.column.title, title))
    }

    /// Reorder columns to match `order`; unknown ids are ignored and
    /// unlisted columns keep their relative order at the end.
    pub fn reorder_columns(&mut self, order: &[ColumnId]) {
        let mut remaining = std::mem::take(&mut self.columns);
        let mut reordered = Vec::with_capacity(remaining.len());
        for id in order {
            if let Some(pos) = remaining.iter().position(|c| c.id() == id) {
                reordered.push(remaining.remove(pos));
            }
        }
        reordered.extend(remaining);
        self.columns = reordered;
        self.renumber_positions();
    }

    /// Verify the column arrays and task map agree
    pub fn is_consistent(&self) -> bool {
        let mut seen = HashSet::new();
        for column in &self.columns {
            for id in &column.task_ids {
                match self.tasks.get(id) {
                    Some(task) if &task.column_id == column.id() => {}
                    _ => return false,
                }
                if !seen.insert(id) {
                    return false;
                }
            }
        }
        seen.len() == self.tasks.len()
    }
}
