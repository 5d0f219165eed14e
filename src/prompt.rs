//! Modal prompts the board asks the host to show.
//!
//! A dismissed prompt resolves to `PromptCancelled`, which the board treats
//! as an abandoned operation and never reports as an error.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use parking_lot::Mutex;

use crate::error::PromptCancelled;
use crate::types::TaskFields;

pub type PromptResult<T> = std::result::Result<T, PromptCancelled>;

#[async_trait::async_trait]
pub trait Prompter: Send + Sync {
    async fn prompt_text(&self, label: &str, initial: &str) -> PromptResult<String>;

    async fn prompt_task_fields(&self, initial: TaskFields) -> PromptResult<TaskFields>;

    async fn confirm(&self, message: &str) -> PromptResult<()>;
}

/// One canned answer for a `ScriptedPrompter`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    Text(String),
    Fields(TaskFields),
    Confirm,
    Cancel,
}

/// Answers prompts from a queue, in order.
///
/// An empty queue or an answer of the wrong kind dismisses the prompt.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    responses: Mutex<VecDeque<PromptResponse>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(responses: impl IntoIterator<Item = PromptResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, response: PromptResponse) {
        self.responses.lock().push_back(response);
    }

    /// Labels and messages of every prompt shown so far
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().clone()
    }

    fn next(&self, question: &str) -> Option<PromptResponse> {
        self.asked.lock().push(question.to_string());
        self.responses.lock().pop_front()
    }
}

#[async_trait::async_trait]
impl Prompter for ScriptedPrompter {
    async fn prompt_text(&self, label: &str, _initial: &str) -> PromptResult<String> {
        match self.next(label) {
            Some(PromptResponse::Text(text)) => Ok(text),
            _ => Err(PromptCancelled),
        }
    }

    async fn prompt_task_fields(&self, initial: TaskFields) -> PromptResult<TaskFields> {
        match self.next(&format!("task: {}", initial.title)) {
            Some(PromptResponse::Fields(fields)) => Ok(fields),
            _ => Err(PromptCancelled),
        }
    }

    async fn confirm(&self, message: &str) -> PromptResult<()> {
        match self.next(message) {
            Some(PromptResponse::Confirm) => Ok(()),
            _ => Err(PromptCancelled),
        }
    }
}

/// Prompts on the controlling terminal; an empty answer or EOF dismisses
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

fn read_line(prompt: String) -> PromptResult<String> {
    let mut stderr = std::io::stderr();
    let _ = write!(stderr, "{prompt}");
    let _ = stderr.flush();
    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => Err(PromptCancelled),
        Ok(_) => Ok(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}

async fn ask(prompt: String) -> PromptResult<String> {
    tokio::task::spawn_blocking(move || read_line(prompt))
        .await
        .map_err(|_| PromptCancelled)?
}

#[async_trait::async_trait]
impl Prompter for TerminalPrompter {
    async fn prompt_text(&self, label: &str, initial: &str) -> PromptResult<String> {
        let prompt = if initial.is_empty() {
            format!("{label}: ")
        } else {
            format!("{label} [{initial}]: ")
        };
        let answer = ask(prompt).await?;
        match (answer.trim(), initial) {
            ("", "") => Err(PromptCancelled),
            ("", initial) => Ok(initial.to_string()),
            (text, _) => Ok(text.to_string()),
        }
    }

    async fn prompt_task_fields(&self, initial: TaskFields) -> PromptResult<TaskFields> {
        let title = self.prompt_text("Title", &initial.title).await?;
        let current = initial.description.clone().unwrap_or_default();
        let description = ask(format!("Description [{current}]: ")).await?;
        let description = match description.trim() {
            "" => initial.description,
            "-" => None,
            text => Some(text.to_string()),
        };
        Ok(TaskFields { title, description })
    }

    async fn confirm(&self, message: &str) -> PromptResult<()> {
        let answer = ask(format!("{message} [y/N]: ")).await?;
        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => Ok(()),
            _ => Err(PromptCancelled),
        }
    }
}
