#![allow(dead_code)]

use std::fs;
use std::process::{Command, Output};
use std::sync::Arc;

use tempfile::TempDir;

use taskboard::board::{BoardController, BoardServices, SessionOptions};
use taskboard::{
    BoardData, Column, ColumnId, MemoryBackend, MemoryStorage, Project, ProjectId,
    ScriptedPrompter, Task, ToastLog, UserSession,
};

/// Board data from `(column, "space separated task ids")` pairs.
///
/// Column ids double as titles, and task ids as task titles.
pub fn board_data(columns: &[(&str, &str)]) -> BoardData {
    let project_id = ProjectId::from("p1");
    let mut data = BoardData {
        project: Project {
            id: project_id.clone(),
            name: "Demo".to_string(),
        },
        columns: Vec::new(),
        tasks: Vec::new(),
    };
    for (col_pos, (column_id, task_ids)) in columns.iter().enumerate() {
        data.columns.push(Column {
            id: ColumnId::from(*column_id),
            project_id: project_id.clone(),
            title: column_id.to_string(),
            position: col_pos as u32 + 1,
        });
        for (pos, task_id) in task_ids.split_whitespace().enumerate() {
            data.tasks.push(Task {
                id: task_id.into(),
                project_id: project_id.clone(),
                column_id: ColumnId::from(*column_id),
                title: task_id.to_string(),
                position: pos as u32 + 1,
                description: None,
            });
        }
    }
    data
}

/// A mounted controller over an in-memory store
pub struct Harness {
    pub controller: BoardController,
    pub backend: Arc<MemoryBackend>,
    pub prompter: Arc<ScriptedPrompter>,
    pub toasts: Arc<ToastLog>,
    pub storage: Arc<MemoryStorage>,
}

impl Harness {
    pub async fn mount(columns: &[(&str, &str)]) -> Self {
        Self::mount_with(columns, SessionOptions::default()).await
    }

    pub async fn mount_with(columns: &[(&str, &str)], options: SessionOptions) -> Self {
        let backend = Arc::new(MemoryBackend::with_board(board_data(columns)));
        let prompter = Arc::new(ScriptedPrompter::default());
        let toasts = Arc::new(ToastLog::default());
        let storage = Arc::new(MemoryStorage::default());
        let services = BoardServices {
            persistence: backend.clone(),
            prompter: prompter.clone(),
            notifier: toasts.clone(),
            storage: storage.clone(),
        };
        let user = UserSession {
            user_id: "u1".to_string(),
            email: Some("u1@example.com".to_string()),
        };
        let controller = BoardController::mount("p1".into(), user, services, options)
            .await
            .expect("board should mount");
        Self {
            controller,
            backend,
            prompter,
            toasts,
            storage,
        }
    }

    /// Task ids of a column in board order
    pub fn ids(&self, column_id: &str) -> Vec<String> {
        let column_id = ColumnId::from(column_id);
        self.controller
            .tasks()
            .into_iter()
            .filter(|t| t.column_id == column_id)
            .map(|t| t.id.to_string())
            .collect()
    }

    /// Task ids of a column in the store, by stored position
    pub fn stored_ids(&self, column_id: &str) -> Vec<String> {
        let column_id = ColumnId::from(column_id);
        let data = self
            .backend
            .board(&"p1".into())
            .expect("store should hold the board");
        let mut tasks: Vec<Task> = data
            .tasks
            .into_iter()
            .filter(|t| t.column_id == column_id)
            .collect();
        tasks.sort_by_key(|t| t.position);
        tasks.into_iter().map(|t| t.id.to_string()).collect()
    }

    pub fn toast_messages(&self) -> Vec<String> {
        self.toasts
            .snapshot()
            .into_iter()
            .map(|t| t.message)
            .collect()
    }
}

/// Runs the `taskboard` binary against a throwaway config and data dir
pub struct BoardTest {
    pub temp_dir: TempDir,
}

impl BoardTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let prefs = temp_dir.path().join("prefs");
        let config = format!("preferences_dir: {}\nuser: tester\n", prefs.display());
        fs::write(temp_dir.path().join("config.yaml"), config).expect("Failed to write config");
        BoardTest { temp_dir }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_taskboard"))
            .args(args)
            .current_dir(self.temp_dir.path())
            .env("TASKBOARD_CONFIG", self.temp_dir.path().join("config.yaml"))
            .env("TASKBOARD_DATA_DIR", self.temp_dir.path().join("boards"))
            .env_remove("TASKBOARD_LOG")
            .output()
            .expect("Failed to execute taskboard command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let mut args = args.to_vec();
        args.push("--json");
        let stdout = self.run_success(&args);
        serde_json::from_str(&stdout).expect("command should print JSON")
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Command {:?} should have failed\nstdout: {}",
            args,
            String::from_utf8_lossy(&output.stdout)
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }
}
