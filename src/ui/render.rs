//! Board rendering for the terminal.
//!
//! Pure string builders: every function returns text for the caller to
//! print, which keeps rendering testable without a terminal attached.

use console::{Color, Style, StyledObject, style};

use crate::board::BoardSnapshot;
use crate::model::{BoardColumn, Priority, Task, TaskStatus};
use crate::ui::icons::{CLOCK, CROSS, LIVE};

/// Terminal styling for a status column, approximating the board theme's
/// hex accents with the nearest ANSI colors.
pub fn status_style(status: TaskStatus) -> Style {
    let color = match status {
        TaskStatus::Dirty => Color::Red,
        TaskStatus::Assigned => Color::Yellow,
        TaskStatus::InProgress => Color::Blue,
        TaskStatus::Inspection => Color::Magenta,
        TaskStatus::Clean => Color::Green,
    };
    Style::new().fg(color).bold()
}

/// Marker rendered before a card title.
pub fn priority_marker(priority: Priority) -> StyledObject<&'static str> {
    match priority {
        Priority::Low => style("·").dim(),
        Priority::Medium => style("•").yellow(),
        Priority::High => style("▲").red().bold(),
    }
}

/// Render the whole board, one column section at a time.
pub fn render_board(columns: &[BoardColumn]) -> String {
    let mut out = String::new();
    for column in columns {
        out.push_str(&render_column(column));
        out.push('\n');
    }
    out
}

fn render_column(column: &BoardColumn) -> String {
    let mut out = String::new();
    let header = format!("{} ({})", column.title, column.tasks.len());
    out.push_str(&format!("{}\n", status_style(column.status).apply_to(header)));
    if column.tasks.is_empty() {
        out.push_str(&format!("  {}\n", style("(empty)").dim()));
        return out;
    }
    for task in &column.tasks {
        out.push_str(&render_card(task));
    }
    out
}

/// One card line on the board: marker, title, assignee, short id.
fn render_card(task: &Task) -> String {
    let mut line = format!("  {} {}", priority_marker(task.priority), task.title);
    if let Some(assignee) = task.assignee_display() {
        line.push_str(&format!(" {}", style(format!("@{assignee}")).cyan()));
    }
    line.push_str(&format!(
        " {}\n",
        style(format!("[{}]", short_id(&task.id))).dim()
    ));
    line
}

/// One row of the flat task listing, with the full id for copy-paste.
pub fn render_task_row(task: &Task) -> String {
    // Pad before styling so escape codes do not throw off the column width.
    let status = format!("{:<12}", task.status.as_str());
    let mut row = format!(
        "{}  {} {} {}",
        style(&task.id).dim(),
        status_style(task.status).apply_to(status),
        priority_marker(task.priority),
        task.title,
    );
    if let Some(assignee) = task.assignee_display() {
        row.push_str(&format!(" {}", style(format!("@{assignee}")).cyan()));
    }
    row
}

/// Lifecycle stamps for a task, oldest to newest.
pub fn render_stamps(task: &Task) -> String {
    let mut parts = vec![format!("created {}", task.created_at.format("%Y-%m-%d %H:%M"))];
    if let Some(started) = task.started_at {
        parts.push(format!("started {}", started.format("%H:%M:%S")));
    }
    if let Some(completed) = task.completed_at {
        parts.push(format!("finished {}", completed.format("%H:%M:%S")));
    }
    parts.push(format!("updated {}", task.updated_at.format("%H:%M:%S")));
    format!("{}{}", CLOCK, parts.join(", "))
}

/// Status banner above the board: live indicator, loading, latest error.
/// Empty when there is nothing to report.
pub fn render_banner(snapshot: &BoardSnapshot, live: bool) -> String {
    let mut parts = Vec::new();
    if live {
        parts.push(format!("{}{}", LIVE, style("live").green()));
    }
    if snapshot.loading {
        parts.push(style("refreshing...").dim().to_string());
    }
    if let Some(error) = &snapshot.error {
        parts.push(format!("{}{}", CROSS, style(error).red()));
    }
    parts.join("  ")
}

/// First id segment, enough to recognize a card on the rendered board.
pub fn short_id(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}
