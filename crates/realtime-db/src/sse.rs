//! Server-sent events as streamed by the REST endpoint.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{StoreError, StoreResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub event: String,
    pub data: String,
}

/// Accumulates chunks and hands out complete events.
#[derive(Debug, Default)]
pub struct EventParser {
    buffer: Vec<u8>,
}

impl EventParser {
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<RawEvent> {
        self.buffer.extend(chunk.iter().filter(|&&byte| byte != b'\r'));
        let mut events = Vec::new();
        while let Some(end) = self.buffer.windows(2).position(|pair| pair == b"\n\n") {
            let message: Vec<u8> = self.buffer.drain(..end + 2).collect();
            if let Some(event) = parse_message(&String::from_utf8_lossy(&message)) {
                events.push(event);
            }
        }
        events
    }
}

fn parse_message(message: &str) -> Option<RawEvent> {
    let mut event = None;
    let mut data: Vec<&str> = Vec::new();
    for line in message.lines() {
        if line.starts_with(':') {
            continue;
        }
        let (field, value) = line.split_once(':').unwrap_or((line, ""));
        let value = value.strip_prefix(' ').unwrap_or(value);
        match field {
            "event" => event = Some(value.to_owned()),
            "data" => data.push(value),
            _ => {}
        }
    }
    if event.is_none() && data.is_empty() {
        return None;
    }
    Some(RawEvent {
        event: event.unwrap_or_else(|| "message".to_owned()),
        data: data.join("\n"),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Replace the value at `path` (relative to the subscribed location).
    Put { path: String, data: Value },
    /// Merge the given children into the value at `path`.
    Patch { path: String, data: Map<String, Value> },
    KeepAlive,
}

#[derive(Deserialize)]
struct Payload<T> {
    path: String,
    data: T,
}

impl StreamEvent {
    /// Interprets a raw event. `Ok(None)` for event types we do not act on.
    pub fn from_raw(raw: &RawEvent) -> StoreResult<Option<Self>> {
        let event = match raw.event.as_str() {
            "put" => {
                let payload: Payload<Value> = serde_json::from_str(&raw.data)?;
                StreamEvent::Put {
                    path: payload.path,
                    data: payload.data,
                }
            }
            "patch" => {
                let payload: Payload<Map<String, Value>> = serde_json::from_str(&raw.data)?;
                StreamEvent::Patch {
                    path: payload.path,
                    data: payload.data,
                }
            }
            "keep-alive" => StreamEvent::KeepAlive,
            "cancel" => return Err(StoreError::Cancelled(reason(&raw.data, "permission denied"))),
            "auth_revoked" => return Err(StoreError::Cancelled(reason(&raw.data, "auth revoked"))),
            other => {
                tracing::debug!(event = other, "ignoring unknown stream event");
                return Ok(None);
            }
        };
        Ok(Some(event))
    }
}

fn reason(data: &str, fallback: &str) -> String {
    match serde_json::from_str::<Value>(data) {
        Ok(Value::String(text)) => text,
        _ if data.is_empty() || data == "null" => fallback.to_owned(),
        _ => data.to_owned(),
    }
}
