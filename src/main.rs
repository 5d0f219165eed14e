use std::process::ExitCode;

use clap::Parser;
use owo_colors::AnsiColors;
use tracing_subscriber::EnvFilter;

use taskboard::Config;
use taskboard::cli::{Cli, ColumnAction, Commands};
use taskboard::commands::{
    cmd_add, cmd_column_add, cmd_column_collapse, cmd_column_hide, cmd_column_ls,
    cmd_column_move, cmd_column_rename, cmd_edit, cmd_init, cmd_label, cmd_mv, cmd_note,
    cmd_projects, cmd_rm, cmd_show, cmd_stats,
};
use taskboard::display::Styler;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("TASKBOARD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> taskboard::Result<()> {
    let config = Config::load()?;
    let project = cli.project.as_deref();
    let json = cli.json;

    match cli.command {
        Commands::Init { name, columns } => {
            cmd_init(&config, project, name.as_deref(), &columns, json).await
        }
        Commands::Projects => cmd_projects(&config, json).await,
        Commands::Show { search, columns } => {
            cmd_show(&config, project, search.as_deref(), &columns, json).await
        }
        Commands::Add {
            title,
            column,
            description,
        } => {
            cmd_add(
                &config,
                project,
                title.as_deref(),
                column.as_deref(),
                description.as_deref(),
                json,
            )
            .await
        }
        Commands::Mv {
            task,
            column,
            index,
        } => cmd_mv(&config, project, &task, &column, index, json).await,
        Commands::Edit {
            task,
            title,
            description,
            clear_description,
        } => {
            cmd_edit(
                &config,
                project,
                &task,
                title.as_deref(),
                description.as_deref(),
                clear_description,
                json,
            )
            .await
        }
        Commands::Rm { task, yes } => cmd_rm(&config, project, &task, yes, json).await,
        Commands::Label { task, name, remove } => {
            cmd_label(&config, project, &task, &name, remove, json).await
        }
        Commands::Note { task, text } => {
            let text = (!text.is_empty()).then(|| text.join(" "));
            cmd_note(&config, project, &task, text.as_deref(), json).await
        }
        Commands::Column { action } => match action {
            ColumnAction::Ls => cmd_column_ls(&config, project, json).await,
            ColumnAction::Add { title } => {
                cmd_column_add(&config, project, title.as_deref(), json).await
            }
            ColumnAction::Rename { column, title } => {
                cmd_column_rename(&config, project, &column, title.as_deref(), json).await
            }
            ColumnAction::Move { column, direction } => {
                cmd_column_move(&config, project, &column, direction, json).await
            }
            ColumnAction::Hide { column } => {
                cmd_column_hide(&config, project, &column, true, json).await
            }
            ColumnAction::Show { column } => {
                cmd_column_hide(&config, project, &column, false, json).await
            }
            ColumnAction::Collapse { column } => {
                cmd_column_collapse(&config, project, &column, true, json).await
            }
            ColumnAction::Expand { column } => {
                cmd_column_collapse(&config, project, &column, false, json).await
            }
        },
        Commands::Stats => cmd_stats(&config, project, json).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", Styler::for_stderr().paint("error:", AnsiColors::Red));
            ExitCode::FAILURE
        }
    }
}
