//! Task CRUD commands: `tidyboard list|create|move|update|delete|columns`.

use anyhow::{Result, bail};
use console::style;
use dialoguer::Confirm;

use tidyboard::model::{NewTask, TaskPatch, TaskStatus};
use tidyboard::ui::icons::{CHECK, WARN};
use tidyboard::ui::{render_stamps, render_task_row, status_style};

use super::{open_board, refresh_with_spinner};

pub async fn cmd_list(
    demo: bool,
    status: Option<TaskStatus>,
    assignee: Option<String>,
) -> Result<()> {
    let board = open_board(demo).await?;
    refresh_with_spinner(&board).await?;

    let tasks = match (status, assignee.as_deref()) {
        (Some(s), Some(a)) => board
            .tasks_by_status(s)
            .into_iter()
            .filter(|t| t.assigned_to.as_deref() == Some(a))
            .collect(),
        (Some(s), None) => board.tasks_by_status(s),
        (None, Some(a)) => board.tasks_by_assignee(a),
        (None, None) => board.snapshot().tasks,
    };

    if tasks.is_empty() {
        println!("No tasks.");
        return Ok(());
    }
    for task in &tasks {
        println!("{}", render_task_row(task));
    }
    println!();
    println!("{} task(s)", tasks.len());
    Ok(())
}

pub async fn cmd_create(demo: bool, new_task: NewTask) -> Result<()> {
    let board = open_board(demo).await?;
    let task = board.create_task(new_task).await?;
    println!(
        "{}Created '{}' in {}",
        CHECK,
        style(&task.title).bold(),
        status_style(task.status).apply_to(task.status.column_title())
    );
    println!("  id: {}", task.id);
    println!("  {}", style(render_stamps(&task)).dim());
    Ok(())
}

pub async fn cmd_move(demo: bool, id: String, status: TaskStatus) -> Result<()> {
    let board = open_board(demo).await?;
    board.move_task(&id, status).await?;

    let snapshot = board.snapshot();
    match snapshot.tasks.iter().find(|t| t.id == id) {
        Some(task) => {
            println!(
                "{}Moved '{}' to {}",
                CHECK,
                task.title,
                status_style(status).apply_to(status.column_title())
            );
            println!("  {}", style(render_stamps(task)).dim());
        }
        // The store treats an unknown id as a quiet no-op, so say so here.
        None => println!("{}No task with id {} on the board", WARN, id),
    }
    Ok(())
}

pub async fn cmd_update(demo: bool, id: String, patch: TaskPatch) -> Result<()> {
    if patch.is_empty() {
        bail!("Nothing to update; pass at least one field flag");
    }
    let board = open_board(demo).await?;
    board.update_task(&id, patch).await?;

    let snapshot = board.snapshot();
    match snapshot.tasks.iter().find(|t| t.id == id) {
        Some(task) => {
            println!("{}Updated '{}'", CHECK, task.title);
            println!("  {}", style(render_stamps(task)).dim());
        }
        None => println!("{}No task with id {} on the board", WARN, id),
    }
    Ok(())
}

pub async fn cmd_delete(demo: bool, id: String, force: bool) -> Result<()> {
    let board = open_board(demo).await?;
    if !force {
        let confirm = Confirm::new()
            .with_prompt(format!("Delete task {id}?"))
            .default(false)
            .interact()
            .unwrap_or(false);
        if !confirm {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }
    board.delete_task(&id).await?;
    println!("{}Deleted {}", CHECK, id);
    Ok(())
}

pub fn cmd_columns() -> Result<()> {
    println!();
    println!("Board columns");
    println!("=============");
    println!();
    for status in TaskStatus::ALL {
        println!(
            "  {} {:<13} {}",
            status_style(status).apply_to(format!("{:<13}", status.column_title())),
            status.as_str(),
            style(status.column_color()).dim()
        );
    }
    println!();
    Ok(())
}
