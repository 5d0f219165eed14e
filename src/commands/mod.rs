//! Command implementations for the `taskboard` binary.
//!
//! Each command mounts the board through a `BoardContext`, drives the
//! controller, prints any toasts to stderr, then prints its result.

mod column;
mod init;
mod metadata;
mod show;
mod stats;
mod task;

pub use column::{
    cmd_column_add, cmd_column_collapse, cmd_column_hide, cmd_column_ls, cmd_column_move,
    cmd_column_rename,
};
pub use init::{cmd_init, cmd_projects};
pub use metadata::{cmd_label, cmd_note};
pub use show::cmd_show;
pub use stats::cmd_stats;
pub use task::{cmd_add, cmd_edit, cmd_mv, cmd_rm};

use std::sync::Arc;

use serde_json::{Value, json};
use unicase::UniCase;

use crate::board::{BoardController, BoardServices, Outcome};
use crate::config::Config;
use crate::display::{Styler, format_toast};
use crate::error::{BoardError, PersistenceError, Result};
use crate::notify::ToastLog;
use crate::persistence::JsonFileBackend;
use crate::prompt::{Prompter, TerminalPrompter};
use crate::storage::FileStorage;
use crate::types::{ColumnId, ProjectId, TaskId};

/// What a command prints: JSON with `--json`, text otherwise
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, output_json: bool) -> Result<()> {
        if output_json {
            println!("{}", serde_json::to_string_pretty(&self.json)?);
        } else if let Some(text) = self.text {
            println!("{text}");
        }
        Ok(())
    }
}

pub(crate) fn project_id(config: &Config, project: Option<&str>) -> ProjectId {
    project
        .map(ProjectId::from)
        .unwrap_or_else(|| config.default_project())
}

/// A mounted board and the toasts it has raised
pub struct BoardContext {
    pub controller: BoardController,
    toasts: Arc<ToastLog>,
}

impl BoardContext {
    pub async fn open(
        config: &Config,
        project: Option<&str>,
        prompter: Arc<dyn Prompter>,
    ) -> Result<Self> {
        let project_id = project_id(config, project);
        let toasts = Arc::new(ToastLog::default());
        let services = BoardServices {
            persistence: Arc::new(JsonFileBackend::new(config.data_dir()?)),
            prompter,
            notifier: toasts.clone(),
            storage: Arc::new(FileStorage::new(config.preferences_dir()?)),
        };
        let controller = BoardController::mount(
            project_id.clone(),
            config.user_session(),
            services,
            config.session_options(),
        )
        .await
        .map_err(|e| match e {
            BoardError::Persistence(PersistenceError::NotFound(_)) => BoardError::Other(format!(
                "no board for project '{project_id}', run 'taskboard init' first"
            )),
            other => other,
        })?;
        Ok(Self { controller, toasts })
    }

    /// Open with prompts on the terminal
    pub async fn open_interactive(config: &Config, project: Option<&str>) -> Result<Self> {
        Self::open(config, project, Arc::new(TerminalPrompter)).await
    }

    /// Print toasts raised so far to stderr
    pub fn flush_toasts(&self) {
        let styler = Styler::for_stderr();
        for toast in self.toasts.drain() {
            eprintln!("{}", format_toast(&toast, &styler));
        }
    }

    /// Exact task id, or a prefix matching exactly one task
    pub fn resolve_task(&self, partial: &str) -> Result<TaskId> {
        let tasks = self.controller.tasks();
        if let Some(task) = tasks.iter().find(|t| t.id.as_str() == partial) {
            return Ok(task.id.clone());
        }
        let matches: Vec<&TaskId> = tasks
            .iter()
            .map(|t| &t.id)
            .filter(|id| id.as_str().starts_with(partial))
            .collect();
        match matches.as_slice() {
            [] => Err(BoardError::TaskNotFound(partial.to_string())),
            [only] => Ok((*only).clone()),
            many => Err(BoardError::Validation(format!(
                "task id '{partial}' is ambiguous: {}",
                many.iter()
                    .map(|id| id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }

    /// Column by id, or by title ignoring case
    pub fn resolve_column(&self, key: &str) -> Result<ColumnId> {
        let columns = self.controller.get_columns();
        columns
            .iter()
            .find(|c| c.id.as_str() == key)
            .or_else(|| {
                columns
                    .iter()
                    .find(|c| UniCase::new(c.title.as_str()) == UniCase::new(key))
            })
            .map(|c| c.id.clone())
            .ok_or_else(|| BoardError::ColumnNotFound(key.to_string()))
    }

    /// Print the outcome of a write; a reverted write fails the command
    pub fn finish<T>(
        &self,
        outcome: Outcome<T>,
        output_json: bool,
        saved: impl FnOnce(T) -> CommandOutput,
    ) -> Result<()> {
        self.flush_toasts();
        match outcome {
            Outcome::Saved(value) => saved(value).print(output_json),
            Outcome::Unchanged => CommandOutput::new(json!({ "action": "unchanged" }))
                .with_text("Nothing to change")
                .print(output_json),
            Outcome::Abandoned => CommandOutput::new(json!({ "action": "cancelled" }))
                .with_text("Cancelled")
                .print(output_json),
            Outcome::Reverted(error) => Err(error.into()),
        }
    }
}
