//! Store-side application of each write to a `BoardData` document.
//!
//! Both bundled backends keep whole boards and share these functions. The
//! store keeps its own positions dense, the same way the board does.

use unicase::UniCase;

use super::{MoveRequest, StoreResult};
use crate::error::PersistenceError;
use crate::types::{BoardData, Column, ColumnId, Project, ProjectId, Task, TaskId, TaskUpdate};

fn short_id(prefix: &str) -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", &uuid[..8])
}

fn required_title(title: &str) -> StoreResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(PersistenceError::Validation {
            field: "title".to_string(),
            message: "cannot be empty".to_string(),
        });
    }
    Ok(title.to_string())
}

fn require_column<'a>(data: &'a BoardData, column_id: &ColumnId) -> StoreResult<&'a Column> {
    data.columns
        .iter()
        .find(|c| &c.id == column_id)
        .ok_or_else(|| PersistenceError::NotFound(column_id.to_string()))
}

fn task_mut<'a>(data: &'a mut BoardData, task_id: &TaskId) -> StoreResult<&'a mut Task> {
    data.tasks
        .iter_mut()
        .find(|t| &t.id == task_id)
        .ok_or_else(|| PersistenceError::NotFound(task_id.to_string()))
}

/// Rewrite a column's positions: listed ids first in the given order, then
/// any other tasks of the column in their previous order.
fn resequence(data: &mut BoardData, column_id: &ColumnId, ordered: &[TaskId]) {
    let mut members: Vec<usize> = data
        .tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| &t.column_id == column_id)
        .map(|(i, _)| i)
        .collect();
    members.sort_by_key(|&i| {
        let task = &data.tasks[i];
        let rank = ordered.iter().position(|id| id == &task.id).unwrap_or(usize::MAX);
        (rank, task.position)
    });
    for (pos, idx) in members.into_iter().enumerate() {
        data.tasks[idx].position = pos as u32 + 1;
    }
}

/// Empty board with the given columns in order
pub fn new_board(project_id: ProjectId, name: &str, columns: &[String]) -> BoardData {
    let columns = columns
        .iter()
        .enumerate()
        .map(|(i, title)| Column {
            id: ColumnId::new(short_id("c")),
            project_id: project_id.clone(),
            title: title.clone(),
            position: i as u32 + 1,
        })
        .collect();
    BoardData {
        project: Project {
            id: project_id,
            name: name.to_string(),
        },
        columns,
        tasks: Vec::new(),
    }
}

pub fn create_task(
    data: &mut BoardData,
    column_id: &ColumnId,
    title: &str,
    description: Option<&str>,
) -> StoreResult<Task> {
    require_column(data, column_id)?;
    let title = required_title(title)?;
    let position = data.tasks.iter().filter(|t| &t.column_id == column_id).count() as u32 + 1;
    let task = Task {
        id: TaskId::new(short_id("t")),
        project_id: data.project.id.clone(),
        column_id: column_id.clone(),
        title,
        position,
        description: description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
    };
    data.tasks.push(task.clone());
    Ok(task)
}

/// Last write wins: the task lands in the target column whatever column the
/// store currently has it in.
pub fn move_task(data: &mut BoardData, request: &MoveRequest) -> StoreResult<()> {
    require_column(data, &request.from_column_id)?;
    require_column(data, &request.to_column_id)?;
    let task = task_mut(data, &request.task_id)?;
    task.column_id = request.to_column_id.clone();
    resequence(data, &request.from_column_id, &request.ordered_from);
    if request.from_column_id != request.to_column_id {
        resequence(data, &request.to_column_id, &request.ordered_to);
    }
    Ok(())
}

pub fn rename_column(data: &mut BoardData, column_id: &ColumnId, title: &str) -> StoreResult<()> {
    let title = required_title(title)?;
    ensure_unique_title(data, &title, Some(column_id))?;
    let column = data
        .columns
        .iter_mut()
        .find(|c| &c.id == column_id)
        .ok_or_else(|| PersistenceError::NotFound(column_id.to_string()))?;
    column.title = title;
    Ok(())
}

fn ensure_unique_title(data: &BoardData, title: &str, except: Option<&ColumnId>) -> StoreResult<()> {
    let wanted = UniCase::new(title);
    if data
        .columns
        .iter()
        .any(|c| Some(&c.id) != except && UniCase::new(c.title.as_str()) == wanted)
    {
        return Err(PersistenceError::Validation {
            field: "title".to_string(),
            message: format!("column '{title}' already exists"),
        });
    }
    Ok(())
}

pub fn create_column(data: &mut BoardData, title: &str) -> StoreResult<Column> {
    let title = required_title(title)?;
    ensure_unique_title(data, &title, None)?;
    let position = data.columns.iter().map(|c| c.position).max().unwrap_or(0) + 1;
    let column = Column {
        id: ColumnId::new(short_id("c")),
        project_id: data.project.id.clone(),
        title,
        position,
    };
    data.columns.push(column.clone());
    Ok(column)
}

/// Listed columns first, unlisted ones after in their previous order
pub fn reorder_columns(data: &mut BoardData, order: &[ColumnId]) -> StoreResult<()> {
    if let Some(unknown) = order.iter().find(|id| !data.columns.iter().any(|c| &c.id == *id)) {
        return Err(PersistenceError::NotFound(unknown.to_string()));
    }
    data.columns.sort_by_key(|c| {
        let rank = order.iter().position(|id| id == &c.id).unwrap_or(usize::MAX);
        (rank, c.position)
    });
    for (i, column) in data.columns.iter_mut().enumerate() {
        column.position = i as u32 + 1;
    }
    Ok(())
}

pub fn update_task(data: &mut BoardData, task_id: &TaskId, update: &TaskUpdate) -> StoreResult<Task> {
    let title = update.title.as_deref().map(required_title).transpose()?;
    let task = task_mut(data, task_id)?;
    if let Some(title) = title {
        task.title = title;
    }
    if let Some(description) = &update.description {
        task.description = description.clone();
    }
    Ok(task.clone())
}

pub fn delete_task(data: &mut BoardData, task_id: &TaskId) -> StoreResult<()> {
    let idx = data
        .tasks
        .iter()
        .position(|t| &t.id == task_id)
        .ok_or_else(|| PersistenceError::NotFound(task_id.to_string()))?;
    let removed = data.tasks.remove(idx);
    resequence(data, &removed.column_id, &[]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> BoardData {
        let mut data = new_board("p1".into(), "Demo", &["To do".to_string(), "Done".to_string()]);
        let todo = data.columns[0].id.clone();
        for title in ["a", "b", "c"] {
            create_task(&mut data, &todo, title, None).unwrap();
        }
        data
    }

    fn titles_in(data: &BoardData, column: &ColumnId) -> Vec<String> {
        let mut tasks: Vec<&Task> = data.tasks.iter().filter(|t| &t.column_id == column).collect();
        tasks.sort_by_key(|t| t.position);
        tasks.iter().map(|t| t.title.clone()).collect()
    }

    #[test]
    fn test_move_resequences_both_columns() {
        let mut data = board();
        let (todo, done) = (data.columns[0].id.clone(), data.columns[1].id.clone());
        let ids: Vec<TaskId> = data.tasks.iter().map(|t| t.id.clone()).collect();

        let request = MoveRequest {
            task_id: ids[0].clone(),
            from_column_id: todo.clone(),
            to_column_id: done.clone(),
            ordered_from: vec![ids[2].clone(), ids[1].clone()],
            ordered_to: vec![ids[0].clone()],
        };
        move_task(&mut data, &request).unwrap();

        assert_eq!(titles_in(&data, &todo), vec!["c", "b"]);
        assert_eq!(titles_in(&data, &done), vec!["a"]);
        assert_eq!(data.tasks[0].position, 1);
    }

    #[test]
    fn test_move_unknown_task_is_not_found() {
        let mut data = board();
        let todo = data.columns[0].id.clone();
        let request = MoveRequest {
            task_id: "nope".into(),
            from_column_id: todo.clone(),
            to_column_id: todo,
            ordered_from: vec![],
            ordered_to: vec![],
        };
        assert_eq!(
            move_task(&mut data, &request),
            Err(PersistenceError::NotFound("nope".to_string()))
        );
    }

    #[test]
    fn test_delete_closes_position_gap() {
        let mut data = board();
        let todo = data.columns[0].id.clone();
        let middle = data.tasks[1].id.clone();
        delete_task(&mut data, &middle).unwrap();
        let positions: Vec<u32> = data.tasks.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![1, 2]);
        assert_eq!(titles_in(&data, &todo), vec!["a", "c"]);
    }

    #[test]
    fn test_column_titles_validated() {
        let mut data = board();
        assert!(create_column(&mut data, "  ").is_err());
        assert!(create_column(&mut data, "done").is_err());
        let review = create_column(&mut data, "Review").unwrap();
        assert_eq!(review.position, 3);

        let order = vec![review.id.clone()];
        reorder_columns(&mut data, &order).unwrap();
        let titles: Vec<&str> = data.columns.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Review", "To do", "Done"]);
    }

    #[test]
    fn test_update_task_fields() {
        let mut data = board();
        let id = data.tasks[0].id.clone();
        let update = TaskUpdate {
            title: Some(" renamed ".to_string()),
            description: Some(Some("notes".to_string())),
        };
        let task = update_task(&mut data, &id, &update).unwrap();
        assert_eq!(task.title, "renamed");
        assert_eq!(task.description.as_deref(), Some("notes"));
    }
}
