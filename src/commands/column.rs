use serde_json::json;

use super::{BoardContext, CommandOutput};
use crate::config::Config;
use crate::display::render_columns;
use crate::error::Result;
use crate::types::Direction;

pub async fn cmd_column_ls(config: &Config, project: Option<&str>, output_json: bool) -> Result<()> {
    let ctx = BoardContext::open_interactive(config, project).await?;
    let columns = ctx.controller.get_columns();
    let preferences = ctx.controller.get_column_preferences();
    CommandOutput::new(json!({
        "columns": columns,
        "preferences": preferences,
    }))
    .with_text(render_columns(&columns, &preferences))
    .print(output_json)
}

pub async fn cmd_column_add(
    config: &Config,
    project: Option<&str>,
    title: Option<&str>,
    output_json: bool,
) -> Result<()> {
    let ctx = BoardContext::open_interactive(config, project).await?;
    let outcome = ctx.controller.create_column(title).await?;
    ctx.finish(outcome, output_json, |column| {
        CommandOutput::new(json!({
            "id": column.id,
            "action": "created",
            "title": column.title,
            "position": column.position,
        }))
        .with_text(format!("Created column {}: {}", column.id, column.title))
    })
}

pub async fn cmd_column_rename(
    config: &Config,
    project: Option<&str>,
    column: &str,
    title: Option<&str>,
    output_json: bool,
) -> Result<()> {
    let ctx = BoardContext::open_interactive(config, project).await?;
    let column_id = ctx.resolve_column(column)?;
    let outcome = ctx.controller.rename_column(&column_id, title).await?;
    ctx.finish(outcome, output_json, |title| {
        CommandOutput::new(json!({ "id": column_id, "action": "renamed", "title": title }))
            .with_text(format!("Renamed {column_id} to {title}"))
    })
}

pub async fn cmd_column_move(
    config: &Config,
    project: Option<&str>,
    column: &str,
    direction: Direction,
    output_json: bool,
) -> Result<()> {
    let ctx = BoardContext::open_interactive(config, project).await?;
    let column_id = ctx.resolve_column(column)?;
    let outcome = ctx.controller.move_column(&column_id, direction).await?;
    ctx.finish(outcome, output_json, |order| {
        CommandOutput::new(json!({ "id": column_id, "action": "moved", "order": order }))
            .with_text(format!("Moved {column_id} {direction}"))
    })
}

/// Hide or show a column; a local preference, never written to the store
pub async fn cmd_column_hide(
    config: &Config,
    project: Option<&str>,
    column: &str,
    hidden: bool,
    output_json: bool,
) -> Result<()> {
    let ctx = BoardContext::open_interactive(config, project).await?;
    let column_id = ctx.resolve_column(column)?;
    let changed = ctx.controller.set_column_hidden(&column_id, hidden)?;
    let state = if hidden { "hidden" } else { "shown" };
    CommandOutput::new(json!({ "id": column_id, "hidden": hidden, "changed": changed }))
        .with_text(format!("Column {column_id} {state}"))
        .print(output_json)
}

pub async fn cmd_column_collapse(
    config: &Config,
    project: Option<&str>,
    column: &str,
    collapsed: bool,
    output_json: bool,
) -> Result<()> {
    let ctx = BoardContext::open_interactive(config, project).await?;
    let column_id = ctx.resolve_column(column)?;
    let changed = ctx.controller.set_column_collapsed(&column_id, collapsed)?;
    let state = if collapsed { "collapsed" } else { "expanded" };
    CommandOutput::new(json!({ "id": column_id, "collapsed": collapsed, "changed": changed }))
        .with_text(format!("Column {column_id} {state}"))
        .print(output_json)
}
