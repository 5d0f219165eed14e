use serde_json::json;
use unicase::UniCase;

use super::{BoardContext, CommandOutput};
use crate::board::Label;
use crate::config::Config;
use crate::error::Result;

pub async fn cmd_label(
    config: &Config,
    project: Option<&str>,
    task: &str,
    name: &str,
    remove: bool,
    output_json: bool,
) -> Result<()> {
    let ctx = BoardContext::open_interactive(config, project).await?;
    let task_id = ctx.resolve_task(task)?;
    let wanted = UniCase::new(name);
    ctx.controller.update_metadata(&task_id, |meta| {
        let present = meta.labels.iter().any(|l| UniCase::new(l.name.as_str()) == wanted);
        if remove {
            meta.labels.retain(|l| UniCase::new(l.name.as_str()) != wanted);
        } else if !present {
            meta.labels.push(Label::new(name));
        }
    })?;

    let labels: Vec<String> = ctx
        .controller
        .task_metadata(&task_id)
        .map(|meta| meta.labels.into_iter().map(|l| l.name).collect())
        .unwrap_or_default();
    CommandOutput::new(json!({ "id": task_id, "labels": labels }))
        .with_text(format!("{task_id} labels: {}", labels.join(", ")))
        .print(output_json)
}

/// Replace a task's notes; empty text clears them
pub async fn cmd_note(
    config: &Config,
    project: Option<&str>,
    task: &str,
    text: Option<&str>,
    output_json: bool,
) -> Result<()> {
    let ctx = BoardContext::open_interactive(config, project).await?;
    let task_id = ctx.resolve_task(task)?;
    let notes = text
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from);
    let cleared = notes.is_none();
    ctx.controller
        .update_metadata(&task_id, |meta| meta.notes = notes.clone())?;

    let message = if cleared {
        format!("Cleared notes on {task_id}")
    } else {
        format!("Updated notes on {task_id}")
    };
    CommandOutput::new(json!({ "id": task_id, "notes": notes }))
        .with_text(message)
        .print(output_json)
}
