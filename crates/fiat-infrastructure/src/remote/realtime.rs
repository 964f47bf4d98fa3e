//! Websocket client for the backend's realtime channel.
//!
//! The server speaks Phoenix channel framing: every frame is a JSON object
//! with `topic`, `event`, `payload` and `ref`. We join one topic per table,
//! send a heartbeat every 30 seconds, and turn `postgres_changes` frames into
//! [`ChangeEvent`]s published on a [`ChangeHub`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use fiat_core::realtime::{ChangeEvent, ChangeHub, ChangeKind};
use fiat_core::session::SessionContext;
use fiat_core::{FiatError, Result};
use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use crate::config::BackendSettings;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);
const MIN_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Pumps server-side row changes into a [`ChangeHub`] until cancelled.
pub struct RealtimeFeed {
    settings: BackendSettings,
    session: SessionContext,
    hub: ChangeHub,
    next_ref: AtomicU64,
}

impl RealtimeFeed {
    pub fn new(settings: BackendSettings, session: SessionContext, hub: ChangeHub) -> Self {
        Self {
            settings,
            session,
            hub,
            next_ref: AtomicU64::new(1),
        }
    }

    /// `wss://<host>/realtime/v1/websocket?apikey=...&vsn=1.0.0`
    pub fn websocket_url(&self) -> Result<String> {
        let url = &self.settings.url;
        let rest = if let Some(rest) = url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            return Err(FiatError::config(format!(
                "backend URL must start with http:// or https://, got '{url}'"
            )));
        };
        Ok(format!(
            "{rest}/realtime/v1/websocket?apikey={}&vsn=1.0.0",
            self.settings.anon_key
        ))
    }

    /// Runs the feed on a background task, reconnecting with backoff until
    /// `cancel` fires.
    pub fn spawn(self, tables: Vec<String>, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(tables, cancel).await })
    }

    async fn run(&self, tables: Vec<String>, cancel: CancellationToken) {
        let mut backoff = Backoff::default();
        loop {
            let mut joined = false;
            match self.run_connection(&tables, &cancel, &mut joined).await {
                Ok(()) => break,
                Err(e) => tracing::warn!("Realtime connection lost: {}", e),
            }
            if joined {
                backoff.reset();
            }
            let delay = backoff.next_delay();
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }
        tracing::info!("Realtime feed stopped");
    }

    /// One connection lifetime. `Ok` only when cancelled. `joined` is set
    /// once every join frame has been sent.
    async fn run_connection(
        &self,
        tables: &[String],
        cancel: &CancellationToken,
        joined: &mut bool,
    ) -> Result<()> {
        let url = self.websocket_url()?;
        let (stream, _) = tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            connected = connect_async(url.as_str()) => connected.map_err(ws_error)?,
        };
        let (mut write, mut read) = stream.split();
        tracing::info!("Realtime connected, joining {} table(s)", tables.len());

        let token = self
            .session
            .session()
            .map(|s| s.access_token)
            .unwrap_or_else(|| self.settings.anon_key.clone());
        for table in tables {
            let frame = join_frame(table, &token, &self.make_ref());
            write.send(Message::Text(frame)).await.map_err(ws_error)?;
        }
        *joined = true;

        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
        heartbeat.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    let _ = write.send(Message::Close(None)).await;
                    return Ok(());
                }
                _ = heartbeat.tick() => {
                    let frame = heartbeat_frame(&self.make_ref());
                    write.send(Message::Text(frame)).await.map_err(ws_error)?;
                }
                message = read.next() => match message {
                    Some(Ok(Message::Text(text))) => self.handle_frame(&text),
                    Some(Ok(Message::Ping(data))) => {
                        write.send(Message::Pong(data)).await.map_err(ws_error)?;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        return Err(FiatError::remote_unavailable("realtime connection closed"));
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(ws_error(e)),
                },
            }
        }
    }

    fn handle_frame(&self, text: &str) {
        match parse_frame(text) {
            Some(Frame::Change(event)) => {
                self.hub.publish(event);
            }
            Some(Frame::JoinFailed { topic, reason }) => {
                tracing::warn!("Realtime join of {} failed: {}", topic, reason);
            }
            Some(Frame::Other) | None => {}
        }
    }

    fn make_ref(&self) -> String {
        self.next_ref.fetch_add(1, Ordering::Relaxed).to_string()
    }
}

/// Reconnect delay, doubling per attempt up to [`MAX_BACKOFF`].
#[derive(Debug)]
struct Backoff {
    current: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            current: MIN_BACKOFF,
        }
    }
}

impl Backoff {
    fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(MAX_BACKOFF);
        delay
    }

    fn reset(&mut self) {
        self.current = MIN_BACKOFF;
    }
}

fn ws_error(err: tokio_tungstenite::tungstenite::Error) -> FiatError {
    FiatError::remote_unavailable(format!("realtime: {err}"))
}

fn topic(table: &str) -> String {
    format!("realtime:public:{table}")
}

pub(crate) fn join_frame(table: &str, access_token: &str, msg_ref: &str) -> String {
    json!({
        "topic": topic(table),
        "event": "phx_join",
        "payload": {
            "config": {
                "postgres_changes": [
                    {"event": "*", "schema": "public", "table": table}
                ]
            },
            "access_token": access_token
        },
        "ref": msg_ref
    })
    .to_string()
}

pub(crate) fn heartbeat_frame(msg_ref: &str) -> String {
    json!({
        "topic": "phoenix",
        "event": "heartbeat",
        "payload": {},
        "ref": msg_ref
    })
    .to_string()
}

#[derive(Debug, PartialEq)]
pub(crate) enum Frame {
    Change(ChangeEvent),
    JoinFailed { topic: String, reason: String },
    Other,
}

/// Classifies a server frame. `None` for anything that is not a JSON frame.
pub(crate) fn parse_frame(text: &str) -> Option<Frame> {
    let frame: Value = serde_json::from_str(text).ok()?;
    let event = frame.get("event")?.as_str()?;
    let payload = frame.get("payload").cloned().unwrap_or(Value::Null);

    match event {
        "postgres_changes" => {
            let data = payload.get("data")?;
            let table = data.get("table")?.as_str()?.to_string();
            let kind: ChangeKind = data
                .get("type")
                .or_else(|| data.get("eventType"))?
                .as_str()?
                .parse()
                .ok()?;
            let record = data.get("record").cloned().unwrap_or(Value::Null);
            let old_record = data.get("old_record").cloned().filter(|v| !v.is_null());
            Some(Frame::Change(ChangeEvent {
                table,
                kind,
                record,
                old_record,
            }))
        }
        "phx_reply" if payload.get("status").and_then(Value::as_str) == Some("error") => {
            let topic = frame
                .get("topic")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let reason = payload
                .get("response")
                .map(|r| r.to_string())
                .unwrap_or_default();
            Some(Frame::JoinFailed { topic, reason })
        }
        _ => Some(Frame::Other),
    }
}
