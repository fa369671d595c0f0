//! Clients for the hosted table store.
//!
//! `TableStore` is the generic row-store seam: select/insert/update/delete
//! over JSON rows, plus a payload-free change feed. `RestStore` talks to
//! the hosted service; `MemoryStore` backs tests and demo mode. `TaskStore`
//! sits on top and speaks `Task` instead of raw rows, owning the timestamp
//! stamping rules and the single live subscription.

pub mod memory;
pub mod realtime;
pub mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::errors::StoreError;
use crate::model::{NewTask, Task, TaskPatch, TaskStatus};

/// Table that holds every housekeeping task.
pub const TASKS_TABLE: &str = "tasks";

/// Buffer size for change feeds. Notices carry no payload, so a shallow
/// queue is enough; subscribers re-fetch anyway.
pub(crate) const FEED_CAPACITY: usize = 32;

/// What kind of row change a feed is reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Insert => "insert",
            ChangeKind::Update => "update",
            ChangeKind::Delete => "delete",
        }
    }
}

/// Which change kinds a subscription wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFilter {
    Insert,
    Update,
    Delete,
    All,
}

impl EventFilter {
    pub fn matches(&self, kind: ChangeKind) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Insert => kind == ChangeKind::Insert,
            EventFilter::Update => kind == ChangeKind::Update,
            EventFilter::Delete => kind == ChangeKind::Delete,
        }
    }

    /// Event name used when joining a realtime channel.
    pub fn as_wire(&self) -> &'static str {
        match self {
            EventFilter::All => "*",
            EventFilter::Insert => "INSERT",
            EventFilter::Update => "UPDATE",
            EventFilter::Delete => "DELETE",
        }
    }
}

/// Stream of change notices for one table.
///
/// Notices carry no row payloads; subscribers re-fetch the table on every
/// notice. Dropping the feed releases the underlying channel.
#[derive(Debug)]
pub struct ChangeFeed {
    rx: mpsc::Receiver<ChangeKind>,
}

impl ChangeFeed {
    pub fn new(rx: mpsc::Receiver<ChangeKind>) -> Self {
        Self { rx }
    }

    /// Next change notice, or `None` once the channel is gone.
    pub async fn recv(&mut self) -> Option<ChangeKind> {
        self.rx.recv().await
    }
}

/// Generic client for one hosted table service. Implementations must be
/// shareable behind an `Arc` across tasks.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// All rows of `table`, newest first by `order_column`.
    async fn select_all(&self, table: &str, order_column: &str) -> Result<Vec<Value>, StoreError>;

    /// Insert `row` and return the stored representation, including the
    /// store-assigned id.
    async fn insert(&self, table: &str, row: Value) -> Result<Value, StoreError>;

    /// Apply `patch` to the row with the given id. An id that matches
    /// nothing succeeds as a no-op, matching the REST dialect.
    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<(), StoreError>;

    /// Delete the row with the given id. A missing id is a no-op.
    async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError>;

    /// Open a change feed for `table`, filtered to `events`.
    async fn subscribe(&self, table: &str, events: EventFilter)
    -> Result<ChangeFeed, StoreError>;
}

/// Typed client for the `tasks` table.
///
/// Owns the stamping rules: inserts get `created_at`/`updated_at`, every
/// mutation refreshes `updated_at`, and status moves stamp `started_at` or
/// `completed_at` when the target status calls for it. Also owns the one
/// live subscription; re-subscribing releases the previous channel first.
pub struct TaskStore {
    store: Arc<dyn TableStore>,
    subscription: Mutex<Option<JoinHandle<()>>>,
}

impl TaskStore {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self {
            store,
            subscription: Mutex::new(None),
        }
    }

    /// Every task, newest first.
    pub async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let rows = self.store.select_all(TASKS_TABLE, "created_at").await?;
        rows.into_iter().map(decode_task).collect()
    }

    /// Insert a task. The client stamps both timestamps with one clock
    /// read, so a fresh task satisfies `created_at == updated_at`; the
    /// store assigns the id.
    pub async fn create_task(&self, new_task: NewTask) -> Result<Task, StoreError> {
        if new_task.title.trim().is_empty() {
            return Err(required_field("title"));
        }
        if new_task.created_by.trim().is_empty() {
            return Err(required_field("created_by"));
        }
        let now = Utc::now();
        let mut row = encode(&new_task)?;
        if let Value::Object(obj) = &mut row {
            obj.insert("created_at".to_string(), json!(now));
            obj.insert("updated_at".to_string(), json!(now));
        }
        let stored = self.store.insert(TASKS_TABLE, row).await?;
        decode_task(stored)
    }

    /// Move a task to a new status. Stamps `updated_at` always, plus
    /// `started_at` when work begins and `completed_at` when it finishes.
    /// Re-entering a stamping status overwrites the earlier stamp.
    pub async fn update_task_status(&self, id: &str, status: TaskStatus) -> Result<(), StoreError> {
        let now = Utc::now();
        let mut patch = json!({ "status": status, "updated_at": now });
        if status.begins_work() {
            patch["started_at"] = json!(now);
        }
        if status.finishes_work() {
            patch["completed_at"] = json!(now);
        }
        debug!(id, status = status.as_str(), "moving task");
        self.store.update(TASKS_TABLE, id, patch).await
    }

    /// Apply a field patch. `updated_at` is stamped here, never by callers.
    pub async fn update_task(&self, id: &str, patch: TaskPatch) -> Result<(), StoreError> {
        let mut row = encode(&patch)?;
        if let Value::Object(obj) = &mut row {
            obj.insert("updated_at".to_string(), json!(Utc::now()));
        }
        debug!(id, "patching task");
        self.store.update(TASKS_TABLE, id, row).await
    }

    pub async fn delete_task(&self, id: &str) -> Result<(), StoreError> {
        debug!(id, "deleting task");
        self.store.delete(TASKS_TABLE, id).await
    }

    /// Subscribe to task-table changes; `on_change` runs once per notice.
    /// Any previous subscription is released first, so a client never
    /// holds more than one channel.
    pub async fn subscribe_to_changes<F>(
        &self,
        events: EventFilter,
        on_change: F,
    ) -> Result<(), StoreError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.unsubscribe();
        let mut feed = self.store.subscribe(TASKS_TABLE, events).await?;
        let handle = tokio::spawn(async move {
            while let Some(kind) = feed.recv().await {
                debug!(kind = kind.as_str(), "tasks table changed");
                on_change();
            }
            debug!("change feed closed");
        });
        if let Some(previous) = self.slot().replace(handle) {
            previous.abort();
        }
        Ok(())
    }

    /// Drop the live subscription, releasing its channel. Safe to call
    /// repeatedly or when nothing is subscribed.
    pub fn unsubscribe(&self) {
        if let Some(handle) = self.slot().take() {
            handle.abort();
        }
    }

    /// Whether a live subscription is currently held.
    pub fn is_subscribed(&self) -> bool {
        self.slot().as_ref().is_some_and(|handle| !handle.is_finished())
    }

    fn slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for TaskStore {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

fn decode_task(row: Value) -> Result<Task, StoreError> {
    serde_json::from_value(row).map_err(|source| StoreError::MalformedRow {
        table: TASKS_TABLE.to_string(),
        source,
    })
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Value, StoreError> {
    serde_json::to_value(value).map_err(|source| StoreError::MalformedRow {
        table: TASKS_TABLE.to_string(),
        source,
    })
}

fn required_field(field: &'static str) -> StoreError {
    StoreError::Rejected {
        operation: "insert",
        table: TASKS_TABLE.to_string(),
        status: 400,
        message: format!("{field} must not be empty"),
    }
}
