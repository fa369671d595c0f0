use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tidyboard::model::{NewTask, Priority, TaskPatch, TaskStatus};

mod cmd;

#[derive(Parser)]
#[command(name = "tidyboard")]
#[command(version, about = "Housekeeping task board in your terminal")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run against a throwaway in-memory store seeded with sample tasks
    #[arg(long, global = true)]
    pub demo: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the board grouped into columns
    Board {
        /// Stay open with a move/refresh prompt
        #[arg(short, long)]
        interact: bool,
    },
    /// Follow the board live, re-rendering on every store change
    Watch,
    /// List tasks as rows, newest first
    List {
        /// Only tasks in this column (dirty, assigned, in-progress, inspection, clean)
        #[arg(long)]
        status: Option<TaskStatus>,

        /// Only tasks assigned to this user id
        #[arg(long)]
        assignee: Option<String>,
    },
    /// Create a task
    Create {
        /// Card title
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        /// low, medium or high
        #[arg(long, default_value = "medium")]
        priority: Priority,

        /// Starting column
        #[arg(long, default_value = "dirty")]
        status: TaskStatus,

        /// Reporter user id
        #[arg(long, default_value = "cli")]
        by: String,

        /// Reporter display name
        #[arg(long)]
        by_name: Option<String>,

        /// Assignee user id
        #[arg(long)]
        assignee: Option<String>,

        /// Assignee display name
        #[arg(long)]
        assignee_name: Option<String>,

        /// Due date, RFC 3339 (e.g. 2026-09-01T12:00:00Z)
        #[arg(long)]
        due: Option<DateTime<Utc>>,
    },
    /// Move a task to another column
    Move {
        /// Full task id, as shown by `list`
        id: String,

        /// Target column (dirty, assigned, in-progress, inspection, clean)
        status: TaskStatus,
    },
    /// Edit fields of a task
    Update {
        /// Full task id, as shown by `list`
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        priority: Option<Priority>,

        /// Assignee user id
        #[arg(long)]
        assignee: Option<String>,

        /// Assignee display name
        #[arg(long)]
        assignee_name: Option<String>,

        /// Due date, RFC 3339
        #[arg(long)]
        due: Option<DateTime<Utc>>,
    },
    /// Delete a task
    Delete {
        /// Full task id, as shown by `list`
        id: String,

        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Print the board columns with their accent colors
    Columns,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Board { interact } => cmd::cmd_board(cli.demo, interact).await?,
        Commands::Watch => cmd::cmd_watch(cli.demo).await?,
        Commands::List { status, assignee } => cmd::cmd_list(cli.demo, status, assignee).await?,
        Commands::Create {
            title,
            description,
            priority,
            status,
            by,
            by_name,
            assignee,
            assignee_name,
            due,
        } => {
            let mut new_task = NewTask::new(title, by);
            new_task.description = description;
            new_task.priority = priority;
            new_task.status = status;
            new_task.created_by_name = by_name;
            new_task.assigned_to = assignee;
            new_task.assigned_to_name = assignee_name;
            new_task.due_date = due;
            cmd::cmd_create(cli.demo, new_task).await?
        }
        Commands::Move { id, status } => cmd::cmd_move(cli.demo, id, status).await?,
        Commands::Update {
            id,
            title,
            description,
            priority,
            assignee,
            assignee_name,
            due,
        } => {
            let patch = TaskPatch {
                title,
                description,
                status: None,
                priority,
                assigned_to: assignee,
                assigned_to_name: assignee_name,
                due_date: due,
            };
            cmd::cmd_update(cli.demo, id, patch).await?
        }
        Commands::Delete { id, force } => cmd::cmd_delete(cli.demo, id, force).await?,
        Commands::Columns => cmd::cmd_columns()?,
    }
    Ok(())
}

/// Log to stderr so rendered boards on stdout stay clean. `TIDYBOARD_LOG`
/// overrides the level the way `RUST_LOG` would.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("TIDYBOARD_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
