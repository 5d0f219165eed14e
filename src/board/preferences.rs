//! Per-board hidden/collapsed column flags kept in client-local storage.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::storage::LocalStorage;
use crate::types::{ColumnId, ProjectId};

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPreference {
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub collapsed: bool,
}

impl ColumnPreference {
    pub fn is_default(&self) -> bool {
        !self.hidden && !self.collapsed
    }
}

pub struct ColumnPreferences {
    project_id: ProjectId,
    storage: Arc<dyn LocalStorage>,
    entries: BTreeMap<ColumnId, ColumnPreference>,
}

impl std::fmt::Debug for ColumnPreferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnPreferences")
            .field("project_id", &self.project_id)
            .field("entries", &self.entries)
            .finish()
    }
}

impl ColumnPreferences {
    pub fn storage_key(project_id: &ProjectId) -> String {
        format!("taskboard:columns:{project_id}")
    }

    /// Load saved flags; unreadable or corrupt data starts the board clean
    pub fn load(project_id: ProjectId, storage: Arc<dyn LocalStorage>) -> Self {
        let key = Self::storage_key(&project_id);
        let entries = match storage.get(&key) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(project_id = %project_id, "discarding corrupt column preferences: {e}");
                BTreeMap::new()
            }),
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(project_id = %project_id, "failed to read column preferences: {e}");
                BTreeMap::new()
            }
        };
        Self {
            project_id,
            storage,
            entries,
        }
    }

    pub fn get(&self, column_id: &ColumnId) -> ColumnPreference {
        self.entries.get(column_id).copied().unwrap_or_default()
    }

    pub fn is_hidden(&self, column_id: &ColumnId) -> bool {
        self.get(column_id).hidden
    }

    pub fn is_collapsed(&self, column_id: &ColumnId) -> bool {
        self.get(column_id).collapsed
    }

    pub fn all(&self) -> &BTreeMap<ColumnId, ColumnPreference> {
        &self.entries
    }

    /// Returns true when the flag changed
    pub fn set_hidden(&mut self, column_id: &ColumnId, hidden: bool) -> bool {
        self.update(column_id, |p| p.hidden = hidden)
    }

    /// Returns true when the flag changed
    pub fn set_collapsed(&mut self, column_id: &ColumnId, collapsed: bool) -> bool {
        self.update(column_id, |p| p.collapsed = collapsed)
    }

    fn update(&mut self, column_id: &ColumnId, f: impl FnOnce(&mut ColumnPreference)) -> bool {
        let before = self.get(column_id);
        let mut after = before;
        f(&mut after);
        if before == after {
            return false;
        }
        if after.is_default() {
            self.entries.remove(column_id);
        } else {
            self.entries.insert(column_id.clone(), after);
        }
        self.save();
        true
    }

    /// Drop flags for columns that no longer exist
    pub fn prune(&mut self, existing: &[ColumnId]) -> bool {
        let existing: HashSet<&ColumnId> = existing.iter().collect();
        let before = self.entries.len();
        self.entries.retain(|id, _| existing.contains(id));
        let changed = self.entries.len() != before;
        if changed {
            tracing::debug!(
                project_id = %self.project_id,
                removed = before - self.entries.len(),
                "pruned column preferences"
            );
            self.save();
        }
        changed
    }

    /// Carry flags over when a placeholder column is confirmed under a new id
    pub(crate) fn rekey(&mut self, old: &ColumnId, new: &ColumnId) {
        if let Some(pref) = self.entries.remove(old) {
            self.entries.insert(new.clone(), pref);
            self.save();
        }
    }

    fn save(&self) {
        let key = Self::storage_key(&self.project_id);
        let result = if self.entries.is_empty() {
            self.storage.remove(&key)
        } else {
            match serde_json::to_string(&self.entries) {
                Ok(json) => self.storage.set(&key, &json),
                Err(e) => Err(e.into()),
            }
        };
        if let Err(e) = result {
            tracing::warn!(project_id = %self.project_id, "failed to save column preferences: {e}");
        }
    }
}
