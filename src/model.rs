//! Data models for the housekeeping board.
//!
//! Everything here mirrors the hosted `tasks` table (snake_case columns on
//! the wire) plus the five fixed columns the board renders. Statuses and
//! board columns are the same enum: a task's status IS its column.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a housekeeping task, in board-column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Dirty,
    Assigned,
    InProgress,
    Inspection,
    Clean,
}

impl TaskStatus {
    /// Every status, in the order columns appear on the board.
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::Dirty,
        TaskStatus::Assigned,
        TaskStatus::InProgress,
        TaskStatus::Inspection,
        TaskStatus::Clean,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Dirty => "dirty",
            TaskStatus::Assigned => "assigned",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Inspection => "inspection",
            TaskStatus::Clean => "clean",
        }
    }

    /// Column header shown above this status on the board.
    pub fn column_title(&self) -> &'static str {
        match self {
            TaskStatus::Dirty => "Dirty",
            TaskStatus::Assigned => "Assigned",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Inspection => "Inspection",
            TaskStatus::Clean => "Clean",
        }
    }

    /// Column accent color (hex triplet, as stored in the board theme).
    pub fn column_color(&self) -> &'static str {
        match self {
            TaskStatus::Dirty => "#ef4444",
            TaskStatus::Assigned => "#f59e0b",
            TaskStatus::InProgress => "#3b82f6",
            TaskStatus::Inspection => "#8b5cf6",
            TaskStatus::Clean => "#10b981",
        }
    }

    /// Moving a task into this status marks work as begun.
    pub fn begins_work(&self) -> bool {
        matches!(self, TaskStatus::InProgress)
    }

    /// Moving a task into this status marks work as finished.
    pub fn finishes_work(&self) -> bool {
        matches!(self, TaskStatus::Clean)
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dirty" => Ok(TaskStatus::Dirty),
            "assigned" => Ok(TaskStatus::Assigned),
            "in-progress" => Ok(TaskStatus::InProgress),
            "inspection" => Ok(TaskStatus::Inspection),
            "clean" => Ok(TaskStatus::Clean),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency of a task. Rendered as a marker on each card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!("Invalid priority: {}", s)),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of the `tasks` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub assigned_to_name: Option<String>,
    pub created_by: String,
    #[serde(default)]
    pub created_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

impl Task {
    /// Name to show for the assignee, falling back to the raw id.
    pub fn assignee_display(&self) -> Option<&str> {
        self.assigned_to_name
            .as_deref()
            .or(self.assigned_to.as_deref())
    }
}

/// Fields a caller supplies when creating a task. The store assigns the id;
/// the client stamps `created_at`/`updated_at` at insert time.
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub created_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTask {
    /// New task with the defaults every fresh card gets: status `dirty`,
    /// priority `medium`, empty description.
    pub fn new(title: impl Into<String>, created_by: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            status: TaskStatus::Dirty,
            priority: Priority::Medium,
            created_by: created_by.into(),
            created_by_name: None,
            assigned_to: None,
            assigned_to_name: None,
            due_date: None,
        }
    }
}

/// Partial update for a task. Only the fields that are `Some` go on the
/// wire; `updated_at` is stamped by the store client, not the caller.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.assigned_to.is_none()
            && self.assigned_to_name.is_none()
            && self.due_date.is_none()
    }
}

/// One rendered board column: a status plus the tasks currently in it.
#[derive(Debug, Clone)]
pub struct BoardColumn {
    pub status: TaskStatus,
    pub title: &'static str,
    pub color: &'static str,
    pub tasks: Vec<Task>,
}

impl BoardColumn {
    pub fn empty(status: TaskStatus) -> Self {
        Self {
            status,
            title: status.column_title(),
            color: status.column_color(),
            tasks: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrip() {
        for status in TaskStatus::ALL {
            let parsed: TaskStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn status_wire_strings_are_kebab_case() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(serde_json::to_string(&TaskStatus::Dirty).unwrap(), "\"dirty\"");
        let parsed: TaskStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(parsed, TaskStatus::InProgress);
    }

    #[test]
    fn invalid_status_is_rejected() {
        let err = "todo".parse::<TaskStatus>().unwrap_err();
        assert!(err.contains("Invalid status"));
    }

    #[test]
    fn priority_roundtrip() {
        for priority in [Priority::Low, Priority::Medium, Priority::High] {
            let parsed: Priority = priority.as_str().parse().unwrap();
            assert_eq!(parsed, priority);
        }
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn columns_carry_titles_and_colors() {
        let expected = [
            (TaskStatus::Dirty, "Dirty", "#ef4444"),
            (TaskStatus::Assigned, "Assigned", "#f59e0b"),
            (TaskStatus::InProgress, "In Progress", "#3b82f6"),
            (TaskStatus::Inspection, "Inspection", "#8b5cf6"),
            (TaskStatus::Clean, "Clean", "#10b981"),
        ];
        for (status, title, color) in expected {
            assert_eq!(status.column_title(), title);
            assert_eq!(status.column_color(), color);
        }
    }

    #[test]
    fn work_stamps_follow_status() {
        assert!(TaskStatus::InProgress.begins_work());
        assert!(TaskStatus::Clean.finishes_work());
        assert!(!TaskStatus::Dirty.begins_work());
        assert!(!TaskStatus::Inspection.finishes_work());
    }

    #[test]
    fn task_decodes_from_store_row() {
        let row = serde_json::json!({
            "id": "a1b2",
            "title": "Clean lobby",
            "description": "",
            "status": "dirty",
            "priority": "medium",
            "created_by": "u-1",
            "created_at": "2026-08-01T09:00:00Z",
            "updated_at": "2026-08-01T09:00:00Z"
        });
        let task: Task = serde_json::from_value(row).unwrap();
        assert_eq!(task.title, "Clean lobby");
        assert_eq!(task.status, TaskStatus::Dirty);
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.started_at.is_none());
        assert!(task.completed_at.is_none());
        assert!(task.assignee_display().is_none());
    }

    #[test]
    fn assignee_display_prefers_name() {
        let mut task: Task = serde_json::from_value(serde_json::json!({
            "id": "t-9",
            "title": "Restock cart",
            "status": "assigned",
            "priority": "low",
            "created_by": "u-1",
            "created_at": "2026-08-01T09:00:00Z",
            "updated_at": "2026-08-01T09:00:00Z"
        }))
        .unwrap();
        task.assigned_to = Some("u-7".into());
        assert_eq!(task.assignee_display(), Some("u-7"));
        task.assigned_to_name = Some("Maria".into());
        assert_eq!(task.assignee_display(), Some("Maria"));
    }

    #[test]
    fn patch_serializes_only_set_fields() {
        let patch = TaskPatch {
            title: Some("Deep clean suite 4".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj["title"], "Deep clean suite 4");
        assert!(TaskPatch::default().is_empty());
        assert!(!patch.is_empty());
    }

    #[test]
    fn new_task_defaults() {
        let new = NewTask::new("Clean lobby", "u-1");
        assert_eq!(new.status, TaskStatus::Dirty);
        assert_eq!(new.priority, Priority::Medium);
        assert!(new.description.is_empty());
        let value = serde_json::to_value(&new).unwrap();
        assert!(value.get("assigned_to").is_none());
        assert_eq!(value["created_by"], "u-1");
    }
}
