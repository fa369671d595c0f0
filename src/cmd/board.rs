//! Board view commands: `tidyboard board` and `tidyboard watch`.

use std::sync::Arc;

use anyhow::Result;
use console::{Term, style};
use dialoguer::Select;

use tidyboard::board::Board;
use tidyboard::model::TaskStatus;
use tidyboard::ui::icons::{BROOM, CHECK, WARN};
use tidyboard::ui::{render_banner, render_board, short_id};

use super::{open_board, refresh_with_spinner};

/// Render the board once; with `interact`, stay in a move/refresh loop.
pub async fn cmd_board(demo: bool, interact: bool) -> Result<()> {
    let board = open_board(demo).await?;
    refresh_with_spinner(&board).await?;
    render(&board);

    if !interact {
        return Ok(());
    }
    loop {
        let action = Select::new()
            .with_prompt("Action")
            .items(&["Move a task", "Refresh", "Quit"])
            .default(0)
            .interact()?;
        match action {
            0 => {
                if let Err(err) = move_flow(&board).await {
                    println!("{}{}", WARN, style(err).red());
                }
            }
            1 => {
                // Failure shows up in the banner; the loop keeps going.
                let _ = refresh_with_spinner(&board).await;
            }
            _ => break,
        }
        render(&board);
    }
    Ok(())
}

/// Follow the board live, re-rendering on every store change until ctrl-c.
pub async fn cmd_watch(demo: bool) -> Result<()> {
    let board = open_board(demo).await?;
    let _ = board.refresh().await;
    Arc::clone(&board).subscribe_to_store().await?;

    let mut state = board.watch();
    let term = Term::stdout();
    draw(&term, &board)?;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                draw(&term, &board)?;
            }
        }
    }
    board.unsubscribe();
    Ok(())
}

/// Pick a task, pick a target column, move it.
async fn move_flow(board: &Board) -> Result<()> {
    let snapshot = board.snapshot();
    if snapshot.tasks.is_empty() {
        println!("Nothing to move.");
        return Ok(());
    }
    let labels: Vec<String> = snapshot
        .tasks
        .iter()
        .map(|t| format!("{} [{}] ({})", t.title, short_id(&t.id), t.status))
        .collect();
    let picked = Select::new()
        .with_prompt("Which task")
        .items(&labels)
        .default(0)
        .interact()?;
    let task = &snapshot.tasks[picked];

    let columns: Vec<&str> = TaskStatus::ALL.iter().map(|s| s.column_title()).collect();
    let target = Select::new()
        .with_prompt("Move to")
        .items(&columns)
        .default(0)
        .interact()?;
    let status = TaskStatus::ALL[target];

    board.move_task(&task.id, status).await?;
    println!(
        "{}Moved '{}' to {}",
        CHECK,
        task.title,
        status.column_title()
    );
    Ok(())
}

fn render(board: &Board) {
    let snapshot = board.snapshot();
    let banner = render_banner(&snapshot, board.is_live());
    if !banner.is_empty() {
        println!("{banner}");
    }
    println!();
    print!("{}", render_board(&board.columns()));
}

fn draw(term: &Term, board: &Board) -> Result<()> {
    term.clear_screen()?;
    println!(
        "{}Housekeeping board {}",
        BROOM,
        style("(ctrl-c to quit)").dim()
    );
    render(board);
    Ok(())
}
