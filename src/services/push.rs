//! Push feed over the home-automation WebSocket API.
//!
//! Frame flow: `auth_required` -> we send `auth` -> `auth_ok` -> we send the subscription
//! -> `result` -> `event` frames carrying area snapshots. `PushSession` is the protocol
//! state machine and does no I/O; `run` wires it to a `tungstenite` socket.

use core::fmt;
use std::error::Error;

use log::{debug, info, warn};
use serde_json::{Value, json};
use tungstenite::Message;
use url::Url;

use crate::models::smart_heating::Area;

#[derive(Debug)]
pub enum PushError {
    Url(String),
    WebSocket(Box<tungstenite::Error>),
    Protocol(String),
    AuthRejected(String),
}

impl fmt::Display for PushError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PushError::Url(s) => write!(f, "invalid websocket url: {}", s),
            PushError::WebSocket(e) => write!(f, "websocket error: {}", e),
            PushError::Protocol(s) => write!(f, "protocol error: {}", s),
            PushError::AuthRejected(s) => write!(f, "authentication rejected: {}", s),
        }
    }
}

impl Error for PushError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PushError::WebSocket(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<tungstenite::Error> for PushError {
    fn from(value: tungstenite::Error) -> Self {
        PushError::WebSocket(Box::new(value))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PushState {
    AwaitingAuthRequest,
    Authenticating,
    Subscribing { id: u64 },
    Streaming { id: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PushAction {
    /// Send this text frame back.
    Reply(String),
    /// Area snapshots from an event; may cover only some areas.
    Areas(Vec<Area>),
    Idle,
}

pub struct PushSession {
    token: String,
    subscribe_type: String,
    state: PushState,
    next_id: u64,
}

impl PushSession {
    pub fn new(token: impl Into<String>, subscribe_type: impl Into<String>) -> Self {
        PushSession {
            token: token.into(),
            subscribe_type: subscribe_type.into(),
            state: PushState::AwaitingAuthRequest,
            next_id: 1,
        }
    }

    pub fn state(&self) -> PushState {
        self.state
    }

    pub fn handle(&mut self, frame: &str) -> Result<PushAction, PushError> {
        let msg: Value =
            serde_json::from_str(frame).map_err(|e| PushError::Protocol(format!("unparsable frame: {}", e)))?;
        let kind = msg.get("type").and_then(Value::as_str).unwrap_or_default();

        match (self.state, kind) {
            (PushState::AwaitingAuthRequest, "auth_required") => {
                self.state = PushState::Authenticating;
                Ok(PushAction::Reply(
                    json!({ "type": "auth", "access_token": self.token }).to_string(),
                ))
            }
            (PushState::Authenticating, "auth_ok") => {
                let id = self.next_id;
                self.next_id += 1;
                self.state = PushState::Subscribing { id };
                Ok(PushAction::Reply(
                    json!({ "id": id, "type": self.subscribe_type }).to_string(),
                ))
            }
            (_, "auth_invalid") => {
                let reason = msg.get("message").and_then(Value::as_str).unwrap_or("no reason given");
                Err(PushError::AuthRejected(reason.to_string()))
            }
            (PushState::Subscribing { id }, "result") if msg.get("id").and_then(Value::as_u64) == Some(id) => {
                if msg.get("success").and_then(Value::as_bool) == Some(true) {
                    self.state = PushState::Streaming { id };
                    info!("Push feed subscribed ({})", self.subscribe_type);
                    Ok(PushAction::Idle)
                } else {
                    let reason = msg
                        .pointer("/error/message")
                        .and_then(Value::as_str)
                        .unwrap_or("subscription refused");
                    Err(PushError::Protocol(reason.to_string()))
                }
            }
            (PushState::Streaming { id }, "event") if msg.get("id").and_then(Value::as_u64) == Some(id) => {
                let event = msg.get("event").cloned().unwrap_or(Value::Null);
                Ok(PushAction::Areas(areas_from_event(&event)?))
            }
            (state, kind) => {
                debug!("Push feed: ignoring '{}' frame in state {:?}", kind, state);
                Ok(PushAction::Idle)
            }
        }
    }
}

/// Events carry `areas` either directly or under `data`, as a list or keyed by area id;
/// single-area updates use `area`.
fn areas_from_event(event: &Value) -> Result<Vec<Area>, PushError> {
    let payload = event.get("data").unwrap_or(event);
    let decode = |v: &Value| {
        serde_json::from_value::<Area>(v.clone()).map_err(|e| PushError::Protocol(format!("bad area in event: {}", e)))
    };
    match (payload.get("areas"), payload.get("area")) {
        (Some(Value::Array(items)), _) => items.iter().map(decode).collect(),
        (Some(Value::Object(items)), _) => items.values().map(decode).collect(),
        (_, Some(single)) => Ok(vec![decode(single)?]),
        _ => Ok(Vec::new()),
    }
}

/// `http(s)://host:port` -> `ws(s)://host:port/api/websocket`.
pub fn websocket_url(host: &str) -> Result<Url, PushError> {
    let mut url = Url::parse(host).map_err(|e| PushError::Url(format!("{}: {}", host, e)))?;
    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(PushError::Url(format!("unsupported scheme '{}'", other))),
    };
    url.set_scheme(scheme)
        .map_err(|_| PushError::Url(format!("cannot switch {} to {}", host, scheme)))?;
    url.set_path("/api/websocket");
    url.set_query(None);
    Ok(url)
}

/// Connect, authenticate, subscribe and hand every area update to `on_areas` until the
/// server closes the socket.
pub fn run(
    host: &str,
    token: &str,
    subscribe_type: &str,
    mut on_areas: impl FnMut(Vec<Area>),
) -> Result<(), PushError> {
    let url = websocket_url(host)?;
    info!("Connecting push feed: {}", url);
    let (mut socket, _) = tungstenite::connect(url.as_str())?;
    let mut session = PushSession::new(token, subscribe_type);

    loop {
        let text = match socket.read()? {
            Message::Text(text) => text,
            Message::Close(frame) => {
                warn!("Push feed closed by server: {:?}", frame);
                return Ok(());
            }
            _ => continue,
        };
        match session.handle(text.as_str())? {
            PushAction::Reply(reply) => socket.send(Message::Text(reply.into()))?,
            PushAction::Areas(areas) => {
                debug!("Push feed: {} area update(s)", areas.len());
                on_areas(areas);
            }
            PushAction::Idle => {}
        }
    }
}
