//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module   | Commands handled                              |
//! |----------|-----------------------------------------------|
//! | `board`  | `Board`, `Watch`                              |
//! | `tasks`  | `List`, `Create`, `Move`, `Update`, `Delete`, `Columns` |

pub mod board;
pub mod tasks;

pub use board::{cmd_board, cmd_watch};
pub use tasks::{cmd_columns, cmd_create, cmd_delete, cmd_list, cmd_move, cmd_update};

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use tidyboard::board::Board;
use tidyboard::config::StoreConfig;
use tidyboard::model::{NewTask, Priority, TaskStatus};
use tidyboard::store::{MemoryStore, RestStore, TableStore, TaskStore};

/// Open a board against the configured store, or against a seeded
/// in-memory store when `demo` is set.
pub(crate) async fn open_board(demo: bool) -> Result<Arc<Board>> {
    let store: Arc<dyn TableStore> = if demo {
        info!("demo mode: using an in-memory store");
        Arc::new(MemoryStore::new())
    } else {
        let config = StoreConfig::from_env()?;
        Arc::new(RestStore::new(config))
    };
    let board = Arc::new(Board::new(TaskStore::new(store)));
    if demo {
        seed_demo(&board).await?;
    }
    Ok(board)
}

/// Reload the board behind a spinner, surfacing the failure to the caller.
pub(crate) async fn refresh_with_spinner(board: &Board) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .expect("progress bar template is a valid static string"),
    );
    spinner.set_message("Loading board...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = board.refresh().await;
    spinner.finish_and_clear();
    result.map_err(Into::into)
}

/// A handful of plausible housekeeping tasks so demo mode has something
/// to show on every column.
async fn seed_demo(board: &Board) -> Result<()> {
    let seeds: [(&str, TaskStatus, Priority, Option<(&str, &str)>); 5] = [
        ("Clean lobby", TaskStatus::Dirty, Priority::Medium, None),
        (
            "Turn over suite 12",
            TaskStatus::Assigned,
            Priority::High,
            Some(("u-maria", "Maria")),
        ),
        (
            "Vacuum conference room",
            TaskStatus::InProgress,
            Priority::Low,
            Some(("u-jon", "Jon")),
        ),
        (
            "Inspect floor 3 hallway",
            TaskStatus::Inspection,
            Priority::Medium,
            None,
        ),
        ("Restock cart 2", TaskStatus::Clean, Priority::Low, None),
    ];
    for (title, status, priority, assignee) in seeds {
        let mut new_task = NewTask::new(title, "demo");
        new_task.status = status;
        new_task.priority = priority;
        if let Some((id, name)) = assignee {
            new_task.assigned_to = Some(id.to_string());
            new_task.assigned_to_name = Some(name.to_string());
        }
        board.create_task(new_task).await?;
    }
    Ok(())
}
