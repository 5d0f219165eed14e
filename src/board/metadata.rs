//! Optional per-task metadata (labels, checklist, notes).
//!
//! Kept beside the board rather than inside `Task` so reordering never sees
//! it; the projector joins it in when rendering and searching.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::storage::LocalStorage;
use crate::types::{ProjectId, TaskId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskMetadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checklist: Vec<ChecklistItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TaskMetadata {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.checklist.is_empty() && self.notes.is_none()
    }

    /// (done, total) checklist progress
    pub fn checklist_progress(&self) -> (usize, usize) {
        let done = self.checklist.iter().filter(|i| i.done).count();
        (done, self.checklist.len())
    }

    /// Text contributed to the search corpus
    pub fn search_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(notes) = &self.notes {
            parts.push(notes);
        }
        parts.extend(self.checklist.iter().map(|i| i.text.as_str()));
        parts.extend(self.labels.iter().map(|l| l.name.as_str()));
        parts.join("\n")
    }
}

pub struct TaskMetadataStore {
    project_id: ProjectId,
    storage: Arc<dyn LocalStorage>,
    entries: BTreeMap<TaskId, TaskMetadata>,
}

impl std::fmt::Debug for TaskMetadataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskMetadataStore")
            .field("project_id", &self.project_id)
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl TaskMetadataStore {
    pub fn storage_key(project_id: &ProjectId) -> String {
        format!("taskboard:metadata:{project_id}")
    }

    pub fn load(project_id: ProjectId, storage: Arc<dyn LocalStorage>) -> Self {
        let key = Self::storage_key(&project_id);
        let entries = match storage.get(&key) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(project_id = %project_id, "discarding corrupt task metadata: {e}");
                BTreeMap::new()
            }),
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(project_id = %project_id, "failed to read task metadata: {e}");
                BTreeMap::new()
            }
        };
        Self {
            project_id,
            storage,
            entries,
        }
    }

    pub fn get(&self, task_id: &TaskId) -> Option<&TaskMetadata> {
        self.entries.get(task_id)
    }

    /// Edit a task's metadata in place; empty metadata is dropped
    pub fn update(&mut self, task_id: &TaskId, f: impl FnOnce(&mut TaskMetadata)) {
        let mut meta = self.entries.remove(task_id).unwrap_or_default();
        f(&mut meta);
        if !meta.is_empty() {
            self.entries.insert(task_id.clone(), meta);
        }
        self.save();
    }

    pub fn prune(&mut self, existing: &HashSet<TaskId>) -> bool {
        let before = self.entries.len();
        self.entries.retain(|id, _| existing.contains(id));
        let changed = before != self.entries.len();
        if changed {
            self.save();
        }
        changed
    }

    pub(crate) fn rekey(&mut self, old: &TaskId, new: &TaskId) {
        if let Some(meta) = self.entries.remove(old) {
            self.entries.insert(new.clone(), meta);
            self.save();
        }
    }

    pub(crate) fn remove(&mut self, task_id: &TaskId) -> Option<TaskMetadata> {
        let removed = self.entries.remove(task_id);
        if removed.is_some() {
            self.save();
        }
        removed
    }

    pub(crate) fn restore(&mut self, task_id: &TaskId, meta: TaskMetadata) {
        self.entries.insert(task_id.clone(), meta);
        self.save();
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
            tracing::warn!(project_id = %self.project_id, "failed to save task metadata: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_search_text_joins_extension_fields() {
        let meta = TaskMetadata {
            labels: vec![Label::new("backend")],
            checklist: vec![ChecklistItem {
                text: "write migration".to_string(),
                done: true,
            }],
            notes: Some("see incident 42".to_string()),
        };
        assert_eq!(meta.search_text(), "see incident 42\nwrite migration\nbackend");
        assert_eq!(meta.checklist_progress(), (1, 1));
    }

    #[test]
    fn test_update_persists_and_prune_drops_vanished() {
        let storage = Arc::new(MemoryStorage::default());
        let mut store = TaskMetadataStore::load("p1".into(), storage.clone());
        store.update(&"t1".into(), |m| m.labels.push(Label::new("urgent")));
        store.update(&"t2".into(), |m| m.notes = Some("later".to_string()));

        let reloaded = TaskMetadataStore::load("p1".into(), storage.clone());
        assert_eq!(reloaded.get(&"t1".into()).unwrap().labels[0].name, "urgent");

        let existing: HashSet<TaskId> = [TaskId::from("t2")].into_iter().collect();
        assert!(store.prune(&existing));
        assert!(store.get(&"t1".into()).is_none());
        assert!(store.get(&"t2".into()).is_some());
    }

    #[test]
    fn test_update_to_empty_removes_entry() {
        let storage = Arc::new(MemoryStorage::default());
        let mut store = TaskMetadataStore::load("p1".into(), storage.clone());
        store.update(&"t1".into(), |m| m.notes = Some("x".to_string()));
        store.update(&"t1".into(), |m| m.notes = None);
        assert!(store.get(&"t1".into()).is_none());
        assert_eq!(storage.get("taskboard:metadata:p1").unwrap(), None);
    }
}
