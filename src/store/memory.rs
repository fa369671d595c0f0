//! In-memory table store backing tests and demo mode.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde_json::{Value, json};
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use super::{ChangeFeed, ChangeKind, EventFilter, FEED_CAPACITY, TableStore};
use crate::errors::StoreError;

/// Rows per table in insertion order, with a broadcast channel feeding
/// subscribers. Row-matching semantics mirror the hosted service: updates
/// and deletes that match nothing succeed quietly.
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    changes: broadcast::Sender<(String, ChangeKind)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(FEED_CAPACITY);
        Self {
            tables: Mutex::new(HashMap::new()),
            changes,
        }
    }

    fn tables(&self) -> MutexGuard<'_, HashMap<String, Vec<Value>>> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, table: &str, kind: ChangeKind) {
        // send fails only when nobody is listening, which is fine
        let _ = self.changes.send((table.to_string(), kind));
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn select_all(&self, table: &str, order_column: &str) -> Result<Vec<Value>, StoreError> {
        let mut rows = self
            .tables()
            .get(table)
            .cloned()
            .unwrap_or_default();
        // Stable sort keeps insertion order for rows without a usable key.
        rows.sort_by(|a, b| order_key(b, order_column).cmp(&order_key(a, order_column)));
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, StoreError> {
        let Value::Object(mut obj) = row else {
            return Err(StoreError::Rejected {
                operation: "insert",
                table: table.to_string(),
                status: 400,
                message: "row must be a JSON object".to_string(),
            });
        };
        obj.entry("id".to_string())
            .or_insert_with(|| json!(Uuid::new_v4().to_string()));
        let stored = Value::Object(obj);
        self.tables()
            .entry(table.to_string())
            .or_default()
            .push(stored.clone());
        self.notify(table, ChangeKind::Insert);
        Ok(stored)
    }

    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<(), StoreError> {
        let Value::Object(patch) = patch else {
            return Err(StoreError::Rejected {
                operation: "update",
                table: table.to_string(),
                status: 400,
                message: "patch must be a JSON object".to_string(),
            });
        };
        let mut matched = false;
        if let Some(rows) = self.tables().get_mut(table) {
            for row in rows.iter_mut() {
                if row_id(row) != Some(id) {
                    continue;
                }
                if let Value::Object(obj) = row {
                    for (key, value) in &patch {
                        obj.insert(key.clone(), value.clone());
                    }
                }
                matched = true;
            }
        }
        if matched {
            self.notify(table, ChangeKind::Update);
        }
        Ok(())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError> {
        let mut removed = false;
        if let Some(rows) = self.tables().get_mut(table) {
            let before = rows.len();
            rows.retain(|row| row_id(row) != Some(id));
            removed = rows.len() < before;
        }
        if removed {
            self.notify(table, ChangeKind::Delete);
        }
        Ok(())
    }

    async fn subscribe(
        &self,
        table: &str,
        events: EventFilter,
    ) -> Result<ChangeFeed, StoreError> {
        let mut source = self.changes.subscribe();
        let (tx, rx) = mpsc::channel(FEED_CAPACITY);
        let table = table.to_string();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tx.closed() => break,
                    received = source.recv() => match received {
                        Ok((changed, kind)) if changed == table && events.matches(kind) => {
                            if tx.send(kind).await.is_err() {
                                break;
                            }
                        }
                        Ok(_) => {}
                        Err(broadcast::error::RecvError::Lagged(_)) => continue,
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
        });
        Ok(ChangeFeed::new(rx))
    }
}

fn row_id(row: &Value) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

/// Timestamp sort key. RFC 3339 strings with mixed sub-second precision do
/// not sort lexicographically, so parse before comparing.
fn order_key(row: &Value, column: &str) -> Option<DateTime<FixedOffset>> {
    row.get(column)?
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
}
