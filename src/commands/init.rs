use serde_json::json;

use super::{CommandOutput, project_id};
use crate::config::Config;
use crate::error::Result;
use crate::persistence::JsonFileBackend;

/// Create an empty board for the project
pub async fn cmd_init(
    config: &Config,
    project: Option<&str>,
    name: Option<&str>,
    columns: &[String],
    output_json: bool,
) -> Result<()> {
    let project_id = project_id(config, project);
    let columns = if columns.is_empty() {
        config.default_columns.clone()
    } else {
        columns.to_vec()
    };
    let name = name.unwrap_or(project_id.as_str()).to_string();
    let backend = JsonFileBackend::new(config.data_dir()?);
    let data = backend.init_board(project_id, &name, &columns).await?;

    let titles: Vec<&str> = data.columns.iter().map(|c| c.title.as_str()).collect();
    CommandOutput::new(json!({
        "project": data.project.id,
        "action": "created",
        "name": data.project.name,
        "columns": data.columns,
    }))
    .with_text(format!(
        "Created board '{}' with columns: {}",
        data.project.id,
        titles.join(", ")
    ))
    .print(output_json)
}

pub async fn cmd_projects(config: &Config, output_json: bool) -> Result<()> {
    let backend = JsonFileBackend::new(config.data_dir()?);
    let projects = backend.list_projects().await?;
    let text = if projects.is_empty() {
        "No boards yet".to_string()
    } else {
        projects
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    };
    CommandOutput::new(json!(projects))
        .with_text(text)
        .print(output_json)
}
