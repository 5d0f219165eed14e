use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Result};

crate::string_id!(
    /// Identifier of a project; one board per project
    ProjectId
);

crate::string_id!(
    /// Identifier of a board column
    ColumnId
);

crate::string_id!(
    /// Identifier of a task card
    TaskId
);

/// Prefix of ids assigned to tasks and columns that exist only locally until the store
/// confirms their creation.
pub const PENDING_ID_PREFIX: &str = "pending-";

impl TaskId {
    /// Fresh placeholder id for an optimistic create
    pub fn pending() -> Self {
        Self::new(format!("{PENDING_ID_PREFIX}{}", uuid::Uuid::new_v4()))
    }

    pub fn is_pending(&self) -> bool {
        self.as_str().starts_with(PENDING_ID_PREFIX)
    }
}

impl ColumnId {
    /// Fresh placeholder id for an optimistic column create
    pub fn pending() -> Self {
        Self::new(format!("{PENDING_ID_PREFIX}{}", uuid::Uuid::new_v4()))
    }

    pub fn is_pending(&self) -> bool {
        self.as_str().starts_with(PENDING_ID_PREFIX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub project_id: ProjectId,
    pub title: String,
    pub position: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub column_id: ColumnId,
    pub title: String,
    pub position: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Full board payload as returned by the board store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardData {
    pub project: Project,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Authenticated user the board is mounted for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Editable task fields gathered from the task form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFields {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TaskFields {
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description,
        }
    }

    /// Trim the fields and reject an empty title
    pub fn validated(self) -> Result<Self> {
        let title = validate_title(&self.title, "task")?;
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        Ok(Self { title, description })
    }
}

/// Partial task update sent to the board store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// `Some(None)` clears the description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

/// Direction for column reordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

crate::enum_display_fromstr!(
    Direction,
    {
        Left => "left",
        Right => "right",
    }
);

/// Trim a column or task title, rejecting blank input
pub fn validate_title(title: &str, what: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(BoardError::Validation(format!("{what} title cannot be empty")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_task_id() {
        let id = TaskId::pending();
        assert!(id.is_pending());
        assert!(!TaskId::from("t-1").is_pending());
    }

    #[test]
    fn test_task_fields_validation_trims() {
        let fields = TaskFields::new("  Fix login  ", Some("   ".to_string()))
            .validated()
            .unwrap();
        assert_eq!(fields.title, "Fix login");
        assert_eq!(fields.description, None);
    }

    #[test]
    fn test_task_fields_validation_rejects_blank_title() {
        let err = TaskFields::new("   ", None).validated().unwrap_err();
        assert_eq!(err.to_string(), "task title cannot be empty");
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("Left".parse::<Direction>().unwrap(), Direction::Left);
        assert!("up".parse::<Direction>().is_err());
    }

    #[test]
    fn test_board_data_deserializes_without_tasks() {
        let json = r#"{"project":{"id":"p1","name":"Demo"},"columns":[]}"#;
        let data: BoardData = serde_json::from_str(json).unwrap();
        assert_eq!(data.project.id, ProjectId::from("p1"));
        assert!(data.tasks.is_empty());
    }
}
