//! REST client for the hosted table store.
//!
//! Speaks the store's REST dialect: rows are addressed with query filters
//! (`?id=eq.{id}`), inserts ask for the stored representation back via the
//! `Prefer` header, and the anon key rides in both the `apikey` header and
//! the bearer token.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

use super::{ChangeFeed, EventFilter, TableStore, realtime};
use crate::config::StoreConfig;
use crate::errors::StoreError;

pub struct RestStore {
    client: Client,
    config: StoreConfig,
}

impl RestStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
    }
}

#[async_trait]
impl TableStore for RestStore {
    async fn select_all(&self, table: &str, order_column: &str) -> Result<Vec<Value>, StoreError> {
        let order = order_desc(order_column);
        let response = self
            .authed(self.client.get(self.config.rest_url(table)))
            .query(&[("select", "*"), ("order", order.as_str())])
            .send()
            .await?;
        let response = reject_errors(response, "select", table).await?;
        let body = response.text().await?;
        decode_rows(&body, table)
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, StoreError> {
        let response = self
            .authed(self.client.post(self.config.rest_url(table)))
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await?;
        let response = reject_errors(response, "insert", table).await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        let rows = decode_rows(&body, table)?;
        single_row(rows).ok_or_else(|| StoreError::Rejected {
            operation: "insert",
            table: table.to_string(),
            status,
            message: "store returned no representation".to_string(),
        })
    }

    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<(), StoreError> {
        let filter = id_filter(id);
        let response = self
            .authed(self.client.patch(self.config.rest_url(table)))
            .query(&[("id", filter.as_str())])
            .json(&patch)
            .send()
            .await?;
        reject_errors(response, "update", table).await?;
        Ok(())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError> {
        let filter = id_filter(id);
        let response = self
            .authed(self.client.delete(self.config.rest_url(table)))
            .query(&[("id", filter.as_str())])
            .send()
            .await?;
        reject_errors(response, "delete", table).await?;
        Ok(())
    }

    async fn subscribe(
        &self,
        table: &str,
        events: EventFilter,
    ) -> Result<ChangeFeed, StoreError> {
        realtime::open_feed(&self.config, table, events).await
    }
}

/// `order` query value for newest-first listing.
fn order_desc(column: &str) -> String {
    format!("{column}.desc")
}

/// Row filter addressing a single id.
fn id_filter(id: &str) -> String {
    format!("eq.{id}")
}

/// The store always answers with a JSON array of rows, even for single-row
/// representations.
fn decode_rows(body: &str, table: &str) -> Result<Vec<Value>, StoreError> {
    serde_json::from_str(body).map_err(|source| StoreError::MalformedRow {
        table: table.to_string(),
        source,
    })
}

fn single_row(rows: Vec<Value>) -> Option<Value> {
    rows.into_iter().next()
}

async fn reject_errors(
    response: Response,
    operation: &'static str,
    table: &str,
) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(StoreError::Rejected {
        operation,
        table: table.to_string(),
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_param_targets_column_descending() {
        assert_eq!(order_desc("created_at"), "created_at.desc");
    }

    #[test]
    fn id_filter_uses_eq_operator() {
        assert_eq!(id_filter("a1b2-c3"), "eq.a1b2-c3");
    }

    #[test]
    fn decode_rows_accepts_representation_arrays() {
        let body = r#"[{"id":"t-1","title":"Clean lobby"}]"#;
        let rows = decode_rows(body, "tasks").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(single_row(rows).unwrap()["id"], "t-1");
    }

    #[test]
    fn decode_rows_rejects_non_json_bodies() {
        let err = decode_rows("<html>gateway error</html>", "tasks").unwrap_err();
        assert!(matches!(err, StoreError::MalformedRow { .. }));
        assert!(err.to_string().contains("tasks"));
    }

    #[test]
    fn empty_representation_yields_no_row() {
        let rows = decode_rows("[]", "tasks").unwrap();
        assert!(single_row(rows).is_none());
    }
}
