#[macro_use]
mod macros;

pub mod board;
pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod notify;
pub mod persistence;
pub mod prompt;
pub mod storage;
pub mod types;

pub use board::{
    BoardController, BoardKey, BoardServices, BoardSession, BoardStats, BoardView, CardRect,
    KeyOutcome, KeyResponse, MoveResult, Outcome, SessionOptions, Subscription,
};
pub use config::Config;
pub use error::{BoardError, PersistenceError, PromptCancelled, Result};
pub use notify::{Notifier, Toast, ToastLevel, ToastLog};
pub use persistence::{BoardPersistence, JsonFileBackend, MemoryBackend, MoveRequest};
pub use prompt::{PromptResponse, Prompter, ScriptedPrompter, TerminalPrompter};
pub use storage::{FileStorage, LocalStorage, MemoryStorage};
pub use types::{
    BoardData, Column, ColumnId, Direction, Project, ProjectId, Task, TaskFields, TaskId,
    TaskUpdate, UserSession,
};
