use clap::{Parser, Subcommand};

use crate::types::Direction;

#[derive(Parser, Debug)]
#[command(name = "taskboard")]
#[command(about = "Kanban boards with optimistic reordering")]
#[command(version)]
pub struct Cli {
    /// Project to act on (default: from config)
    #[arg(short, long, global = true)]
    pub project: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a board with the configured default columns
    Init {
        /// Board name (default: the project id)
        #[arg(long)]
        name: Option<String>,

        /// Column title; repeat to replace the default columns
        #[arg(long = "column")]
        columns: Vec<String>,
    },

    /// List projects that have a board
    Projects,

    /// Render the board
    #[command(visible_alias = "s")]
    Show {
        /// Only show tasks whose title, description, or metadata match
        #[arg(long)]
        search: Option<String>,

        /// Only show these columns (id or title); repeatable
        #[arg(long = "column")]
        columns: Vec<String>,
    },

    /// Add a task; prompts for the fields when no title is given
    #[command(visible_alias = "a")]
    Add {
        title: Option<String>,

        /// Target column (id or title)
        #[arg(short, long)]
        column: Option<String>,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Move a task to a column
    Mv {
        /// Task ID (can be partial)
        task: String,

        /// Column id or title
        column: String,

        /// Zero-based slot in the column (default: the end)
        #[arg(short, long)]
        index: Option<usize>,
    },

    /// Change a task; prompts for the fields when none are given
    #[command(visible_alias = "e")]
    Edit {
        /// Task ID (can be partial)
        task: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long, conflicts_with = "clear_description")]
        description: Option<String>,

        #[arg(long)]
        clear_description: bool,
    },

    /// Delete a task
    Rm {
        /// Task ID (can be partial)
        task: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Add or remove a task label
    Label {
        /// Task ID (can be partial)
        task: String,

        name: String,

        #[arg(long)]
        remove: bool,
    },

    /// Set a task's notes; no text clears them
    Note {
        /// Task ID (can be partial)
        task: String,

        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Manage columns
    Column {
        #[command(subcommand)]
        action: ColumnAction,
    },

    /// Show board totals and per-column counts
    Stats,
}

#[derive(Subcommand, Debug)]
pub enum ColumnAction {
    /// List columns with their preferences
    Ls,

    /// Add a column; prompts for the title when none is given
    Add { title: Option<String> },

    /// Rename a column; prompts when no title is given
    Rename {
        column: String,
        title: Option<String>,
    },

    /// Swap a column with its neighbour
    Move {
        column: String,

        /// left or right
        #[arg(value_parser = parse_direction)]
        direction: Direction,
    },

    /// Hide a column from the board
    Hide { column: String },

    /// Show a hidden column again
    Show { column: String },

    /// Collapse a column to its header
    Collapse { column: String },

    /// Expand a collapsed column
    Expand { column: String },
}

fn parse_direction(s: &str) -> Result<Direction, String> {
    s.parse()
        .map_err(|_| "Invalid direction. Must be one of: left, right".to_string())
}
