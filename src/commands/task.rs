use std::sync::Arc;

use serde_json::json;

use super::{BoardContext, CommandOutput};
use crate::config::Config;
use crate::error::Result;
use crate::prompt::{Prompter, PromptResponse, ScriptedPrompter, TerminalPrompter};
use crate::types::{Task, TaskFields, TaskUpdate};

fn task_output(action: &str, task: &Task) -> CommandOutput {
    CommandOutput::new(json!({
        "id": task.id,
        "action": action,
        "column_id": task.column_id,
        "title": task.title,
        "description": task.description,
        "position": task.position,
    }))
}

/// Add a task; without a title the fields are prompted for
pub async fn cmd_add(
    config: &Config,
    project: Option<&str>,
    title: Option<&str>,
    column: Option<&str>,
    description: Option<&str>,
    output_json: bool,
) -> Result<()> {
    let ctx = BoardContext::open_interactive(config, project).await?;
    let column_id = column.map(|key| ctx.resolve_column(key)).transpose()?;
    let outcome = match title {
        Some(title) => {
            let fields = TaskFields::new(title, description.map(String::from));
            ctx.controller.create_task(column_id.as_ref(), fields).await?
        }
        None => ctx.controller.start_task_creation(column_id.as_ref()).await?,
    };
    ctx.finish(outcome, output_json, |task| {
        let text = format!("Created {}: {}", task.id, task.title);
        task_output("created", &task).with_text(text)
    })
}

/// Move a task to `index` of a column, or to its end
pub async fn cmd_mv(
    config: &Config,
    project: Option<&str>,
    task: &str,
    column: &str,
    index: Option<usize>,
    output_json: bool,
) -> Result<()> {
    let ctx = BoardContext::open_interactive(config, project).await?;
    let task_id = ctx.resolve_task(task)?;
    let column_id = ctx.resolve_column(column)?;
    // Past-the-end clamps to the last slot
    let index = index.unwrap_or(usize::MAX);
    let outcome = ctx.controller.move_task(&task_id, &column_id, index).await?;
    ctx.finish(outcome, output_json, |result| {
        CommandOutput::new(json!({
            "id": result.task_id,
            "action": "moved",
            "from_column_id": result.from_column_id,
            "to_column_id": result.to_column_id,
            "index": result.to_index,
        }))
        .with_text(format!(
            "Moved {} to {} (position {})",
            result.task_id,
            result.to_column_id,
            result.to_index + 1
        ))
    })
}

/// Change a task's fields; with no flags the fields are prompted for
pub async fn cmd_edit(
    config: &Config,
    project: Option<&str>,
    task: &str,
    title: Option<&str>,
    description: Option<&str>,
    clear_description: bool,
    output_json: bool,
) -> Result<()> {
    let ctx = BoardContext::open_interactive(config, project).await?;
    let task_id = ctx.resolve_task(task)?;
    let outcome = if title.is_none() && description.is_none() && !clear_description {
        ctx.controller.edit_task(&task_id).await?
    } else {
        let description = if clear_description {
            Some(None)
        } else {
            description.map(|d| Some(d.to_string()))
        };
        let update = TaskUpdate {
            title: title.map(String::from),
            description,
        };
        ctx.controller.update_task(&task_id, update).await?
    };
    ctx.finish(outcome, output_json, |task| {
        let text = format!("Updated {}: {}", task.id, task.title);
        task_output("updated", &task).with_text(text)
    })
}

pub async fn cmd_rm(
    config: &Config,
    project: Option<&str>,
    task: &str,
    yes: bool,
    output_json: bool,
) -> Result<()> {
    let prompter: Arc<dyn Prompter> = if yes {
        Arc::new(ScriptedPrompter::new([PromptResponse::Confirm]))
    } else {
        Arc::new(TerminalPrompter)
    };
    let ctx = BoardContext::open(config, project, prompter).await?;
    let task_id = ctx.resolve_task(task)?;
    let outcome = ctx.controller.delete_task(&task_id).await?;
    ctx.finish(outcome, output_json, |()| {
        CommandOutput::new(json!({ "id": task_id, "action": "deleted" }))
            .with_text(format!("Deleted {task_id}"))
    })
}
