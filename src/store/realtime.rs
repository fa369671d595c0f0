//! Realtime change feed over the store's phoenix-style websocket.
//!
//! The client joins one channel per table, keeps the socket alive with
//! heartbeats on the shared `phoenix` topic, and forwards row changes as
//! payload-free notices. When the socket dies the feed simply ends;
//! callers decide whether to reopen it.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use super::{ChangeFeed, ChangeKind, EventFilter, FEED_CAPACITY};
use crate::config::StoreConfig;
use crate::errors::StoreError;

/// The store drops peers that stay quiet; it expects a heartbeat roughly
/// twice a minute.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Open a websocket feed of change notices for `table`.
pub(super) async fn open_feed(
    config: &StoreConfig,
    table: &str,
    events: EventFilter,
) -> Result<ChangeFeed, StoreError> {
    let url = config.realtime_url();
    let (stream, _) = tokio_tungstenite::connect_async(&url)
        .await
        .map_err(|e| StoreError::Channel(format!("connect failed: {e}")))?;
    let (mut write, mut read) = stream.split();

    let topic = channel_topic(table);
    let join = join_message(&topic, table, events, &config.api_key);
    write
        .send(Message::Text(join.to_string()))
        .await
        .map_err(|e| StoreError::Channel(format!("join failed: {e}")))?;
    debug!(topic = %topic, "joined realtime channel");

    let (tx, rx) = mpsc::channel(FEED_CAPACITY);
    let (hb_tx, mut hb_rx) = mpsc::channel::<()>(1);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(HEARTBEAT_INTERVAL);
        loop {
            interval.tick().await;
            if hb_tx.send(()).await.is_err() {
                break;
            }
        }
    });

    tokio::spawn(async move {
        let mut heartbeat_ref: u64 = 1;
        loop {
            tokio::select! {
                _ = tx.closed() => {
                    debug!(topic = %topic, "feed dropped, leaving channel");
                    break;
                }
                _ = hb_rx.recv() => {
                    heartbeat_ref += 1;
                    let heartbeat = heartbeat_message(heartbeat_ref);
                    if write.send(Message::Text(heartbeat.to_string())).await.is_err() {
                        warn!("realtime heartbeat failed, closing feed");
                        break;
                    }
                }
                msg = read.next() => {
                    let text = match msg {
                        Some(Ok(Message::Text(text))) => text.to_string(),
                        Some(Ok(Message::Close(_))) | None => {
                            warn!("realtime socket closed by the store");
                            break;
                        }
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => {
                            warn!(error = %e, "realtime socket error");
                            break;
                        }
                    };
                    let Ok(message) = serde_json::from_str::<Value>(&text) else {
                        continue;
                    };
                    if let Some(reason) = error_reply(&message, &topic) {
                        warn!(reason = %reason, "realtime channel rejected");
                        break;
                    }
                    if let Some(kind) = change_kind(&message, &topic) {
                        if events.matches(kind) && tx.send(kind).await.is_err() {
                            break;
                        }
                    }
                }
            }
        }
    });

    Ok(ChangeFeed::new(rx))
}

fn channel_topic(table: &str) -> String {
    format!("realtime:public:{table}")
}

/// Channel join frame. The row-change config tells newer servers which
/// events to forward; older servers ignore it and forward everything on
/// the topic.
fn join_message(topic: &str, table: &str, events: EventFilter, access_token: &str) -> Value {
    json!({
        "topic": topic,
        "event": "phx_join",
        "ref": "1",
        "payload": {
            "access_token": access_token,
            "config": {
                "postgres_changes": [
                    { "event": events.as_wire(), "schema": "public", "table": table }
                ]
            }
        }
    })
}

/// Keepalive frame on the shared `phoenix` topic.
fn heartbeat_message(reference: u64) -> Value {
    json!({
        "topic": "phoenix",
        "event": "heartbeat",
        "ref": reference.to_string(),
        "payload": {}
    })
}

/// Extract the change kind from a row-change frame on `topic`.
///
/// Handles both wire shapes: bare `INSERT`/`UPDATE`/`DELETE` events, and
/// the wrapped form where the kind sits at `payload.data.type`.
fn change_kind(message: &Value, topic: &str) -> Option<ChangeKind> {
    if message.get("topic").and_then(Value::as_str) != Some(topic) {
        return None;
    }
    match message.get("event").and_then(Value::as_str)? {
        event @ ("INSERT" | "UPDATE" | "DELETE") => kind_from_wire(event),
        "postgres_changes" => {
            let wrapped = message.get("payload")?.get("data")?.get("type")?;
            kind_from_wire(wrapped.as_str()?)
        }
        _ => None,
    }
}

fn kind_from_wire(event: &str) -> Option<ChangeKind> {
    match event {
        "INSERT" => Some(ChangeKind::Insert),
        "UPDATE" => Some(ChangeKind::Update),
        "DELETE" => Some(ChangeKind::Delete),
        _ => None,
    }
}

/// A failed join reply or channel crash on `topic`.
fn error_reply(message: &Value, topic: &str) -> Option<String> {
    if message.get("topic").and_then(Value::as_str) != Some(topic) {
        return None;
    }
    match message.get("event").and_then(Value::as_str)? {
        "phx_error" => Some("channel crashed".to_string()),
        "phx_reply" => {
            let payload = message.get("payload")?;
            if payload.get("status").and_then(Value::as_str) != Some("error") {
                return None;
            }
            let reason = payload
                .get("response")
                .and_then(|r| r.get("reason"))
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            Some(reason.to_string())
        }
        _ => None,
    }
}
