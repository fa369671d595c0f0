//! Reactive board state over the task store.
//!
//! `Board` owns the in-memory task collection and publishes immutable
//! `BoardSnapshot`s through a watch channel; renderers and the live watch
//! command consume snapshots instead of poking at store state. Refreshes
//! are serialized behind an async gate so overlapping reloads land in
//! arrival order.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::{debug, warn};

use crate::errors::StoreError;
use crate::model::{BoardColumn, NewTask, Task, TaskPatch, TaskStatus};
use crate::store::{EventFilter, TaskStore};

/// Immutable view of board state at one instant.
#[derive(Debug, Clone, Default)]
pub struct BoardSnapshot {
    /// Every task, newest first.
    pub tasks: Vec<Task>,
    /// True while a reload is in flight.
    pub loading: bool,
    /// Message of the most recent failed store operation. Cleared by the
    /// next successful refresh.
    pub error: Option<String>,
}

pub struct Board {
    store: TaskStore,
    state: watch::Sender<BoardSnapshot>,
    refresh_gate: Mutex<()>,
}

impl Board {
    pub fn new(store: TaskStore) -> Self {
        let (state, _) = watch::channel(BoardSnapshot::default());
        Self {
            store,
            state,
            refresh_gate: Mutex::new(()),
        }
    }

    /// Current state, cloned out of the watch channel.
    pub fn snapshot(&self) -> BoardSnapshot {
        self.state.borrow().clone()
    }

    /// Live state for watchers; signals on every change.
    pub fn watch(&self) -> watch::Receiver<BoardSnapshot> {
        self.state.subscribe()
    }

    /// Reload every task from the store.
    ///
    /// On failure the previous collection stays put and the error message
    /// lands in the snapshot; the next successful refresh clears it.
    pub async fn refresh(&self) -> Result<(), StoreError> {
        let _serialized = self.refresh_gate.lock().await;
        self.state.send_modify(|s| s.loading = true);
        match self.store.list_tasks().await {
            Ok(tasks) => {
                debug!(count = tasks.len(), "board refreshed");
                self.state.send_modify(|s| {
                    s.tasks = tasks;
                    s.loading = false;
                    s.error = None;
                });
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "board refresh failed");
                let message = err.to_string();
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.error = Some(message);
                });
                Err(err)
            }
        }
    }

    /// Create a task and reload the board. Returns the stored task with
    /// its assigned id.
    pub async fn create_task(&self, new_task: NewTask) -> Result<Task, StoreError> {
        match self.store.create_task(new_task).await {
            Ok(task) => {
                debug!(id = %task.id, "task created");
                let _ = self.refresh().await;
                Ok(task)
            }
            Err(err) => {
                self.record_error(&err);
                Err(err)
            }
        }
    }

    /// Move a task to another column, then reload.
    pub async fn move_task(&self, id: &str, status: TaskStatus) -> Result<(), StoreError> {
        match self.store.update_task_status(id, status).await {
            Ok(()) => self.refresh().await,
            Err(err) => {
                self.record_error(&err);
                Err(err)
            }
        }
    }

    /// Patch task fields, then reload.
    pub async fn update_task(&self, id: &str, patch: TaskPatch) -> Result<(), StoreError> {
        match self.store.update_task(id, patch).await {
            Ok(()) => self.refresh().await,
            Err(err) => {
                self.record_error(&err);
                Err(err)
            }
        }
    }

    /// Delete a task, then reload.
    pub async fn delete_task(&self, id: &str) -> Result<(), StoreError> {
        match self.store.delete_task(id).await {
            Ok(()) => self.refresh().await,
            Err(err) => {
                self.record_error(&err);
                Err(err)
            }
        }
    }

    /// Tasks currently in `status`, preserving newest-first order.
    pub fn tasks_by_status(&self, status: TaskStatus) -> Vec<Task> {
        self.state
            .borrow()
            .tasks
            .iter()
            .filter(|t| t.status == status)
            .cloned()
            .collect()
    }

    /// Tasks assigned to the given user id.
    pub fn tasks_by_assignee(&self, user_id: &str) -> Vec<Task> {
        self.state
            .borrow()
            .tasks
            .iter()
            .filter(|t| t.assigned_to.as_deref() == Some(user_id))
            .cloned()
            .collect()
    }

    /// The five fixed columns with their current tasks. Every task lands
    /// in exactly one column.
    pub fn columns(&self) -> Vec<BoardColumn> {
        let snapshot = self.state.borrow();
        TaskStatus::ALL
            .iter()
            .map(|status| {
                let mut column = BoardColumn::empty(*status);
                column.tasks = snapshot
                    .tasks
                    .iter()
                    .filter(|t| t.status == *status)
                    .cloned()
                    .collect();
                column
            })
            .collect()
    }

    /// Follow store changes: every notice triggers a refresh. Replaces
    /// any previous subscription.
    pub async fn subscribe_to_store(self: Arc<Self>) -> Result<(), StoreError> {
        // The callback keeps only a weak handle, so a board dropped
        // without unsubscribing still releases its channel on drop.
        let board = Arc::downgrade(&self);
        self.store
            .subscribe_to_changes(EventFilter::All, move || {
                let Some(board) = board.upgrade() else {
                    return;
                };
                tokio::spawn(async move {
                    let _ = board.refresh().await;
                });
            })
            .await
    }

    /// Stop following store changes. Safe to call when not subscribed.
    pub fn unsubscribe(&self) {
        self.store.unsubscribe();
    }

    /// Whether the board currently follows a live change feed.
    pub fn is_live(&self) -> bool {
        self.store.is_subscribed()
    }

    fn record_error(&self, err: &StoreError) {
        warn!(error = %err, "store operation failed");
        let message = err.to_string();
        self.state.send_modify(|s| s.error = Some(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;
    use crate::store::MemoryStore;

    fn board() -> Board {
        Board::new(TaskStore::new(Arc::new(MemoryStore::new())))
    }

    #[test]
    fn fresh_board_is_empty_and_quiet() {
        let board = board();
        let snapshot = board.snapshot();
        assert!(snapshot.tasks.is_empty());
        assert!(!snapshot.loading);
        assert!(snapshot.error.is_none());
        assert!(!board.is_live());
    }

    #[tokio::test]
    async fn columns_partition_every_task() {
        let board = board();
        for (title, status) in [
            ("Lobby", TaskStatus::Dirty),
            ("Suite 4", TaskStatus::Dirty),
            ("Gym", TaskStatus::InProgress),
            ("Pool deck", TaskStatus::Clean),
        ] {
            let mut new_task = NewTask::new(title, "u-1");
            new_task.status = status;
            board.create_task(new_task).await.unwrap();
        }

        let columns = board.columns();
        assert_eq!(columns.len(), 5);
        let total: usize = columns.iter().map(|c| c.tasks.len()).sum();
        assert_eq!(total, board.snapshot().tasks.len());
        for column in &columns {
            assert!(column.tasks.iter().all(|t| t.status == column.status));
        }
        assert_eq!(columns[0].tasks.len(), 2); // dirty
        assert_eq!(columns[1].tasks.len(), 0); // assigned
        assert_eq!(columns[2].tasks.len(), 1); // in-progress
        assert_eq!(columns[4].tasks.len(), 1); // clean
    }

    #[tokio::test]
    async fn filters_select_by_status_and_assignee() {
        let board = board();
        let mut for_maria = NewTask::new("Suite 7", "u-1");
        for_maria.assigned_to = Some("u-maria".to_string());
        for_maria.status = TaskStatus::Assigned;
        board.create_task(for_maria).await.unwrap();

        let mut high = NewTask::new("Ballroom", "u-1");
        high.priority = Priority::High;
        board.create_task(high).await.unwrap();

        assert_eq!(board.tasks_by_status(TaskStatus::Assigned).len(), 1);
        assert_eq!(board.tasks_by_status(TaskStatus::Clean).len(), 0);
        let maria_tasks = board.tasks_by_assignee("u-maria");
        assert_eq!(maria_tasks.len(), 1);
        assert_eq!(maria_tasks[0].title, "Suite 7");
        assert!(board.tasks_by_assignee("u-ghost").is_empty());
    }

    #[tokio::test]
    async fn refresh_clears_loading_flag() {
        let board = board();
        board.refresh().await.unwrap();
        assert!(!board.snapshot().loading);
    }

    #[tokio::test]
    async fn dropped_board_releases_its_subscription() {
        let board = Arc::new(board());
        Arc::clone(&board).subscribe_to_store().await.unwrap();
        assert!(board.is_live());

        let weak = Arc::downgrade(&board);
        drop(board);
        assert!(
            weak.upgrade().is_none(),
            "subscription holds no strong board handle"
        );
    }
}
