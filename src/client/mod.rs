//! HTTP client for the `smart_heating` add-on REST API.
//!
//! - Blocking; one method per endpoint, grouped by resource area in the submodules.
//! - Every method performs exactly one request. No retries, no caching, no batching.
//! - Any non-2xx status is an error; callers decide whether to log, surface or ignore it.
//! - Uses the models in `crate::models::smart_heating`.

mod areas;
mod config;
mod efficiency;
mod history;
mod import_export;
mod metrics;
mod opentherm;
mod safety;
pub mod transport;
mod users;
mod vacation;

use serde::de::DeserializeOwned;
use serde_json::Value;

pub use transport::{ApiRequest, ApiResponse, Transport, UreqTransport};

#[derive(Debug)]
pub enum ClientError {
    Transport(String),
    Http { status: u16, message: String },
    Json(serde_path_to_error::Error<serde_json::Error>),
    Encode(serde_json::Error),
    Url(String),
    InvalidArgument(String),
}

impl core::fmt::Display for ClientError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ClientError::Transport(s) => write!(f, "transport error: {}", s),
            ClientError::Http { status, message } => write!(f, "http {}: {}", status, message),
            ClientError::Json(e) => write!(f, "json error at {}: {}", e.path(), e.inner()),
            ClientError::Encode(e) => write!(f, "request encoding error: {}", e),
            ClientError::Url(s) => write!(f, "invalid url: {}", s),
            ClientError::InvalidArgument(s) => write!(f, "invalid argument: {}", s),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Json(e) => Some(e.inner()),
            ClientError::Encode(e) => Some(e),
            _ => None,
        }
    }
}

pub struct SmartHeatingClient<T: Transport = UreqTransport> {
    transport: T,
}

impl SmartHeatingClient<UreqTransport> {
    pub fn new(host: &str, token: Option<String>) -> Result<Self, ClientError> {
        Ok(SmartHeatingClient {
            transport: UreqTransport::new(host, token)?,
        })
    }
}

impl<T: Transport> SmartHeatingClient<T> {
    pub fn with_transport(transport: T) -> Self {
        SmartHeatingClient { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute and return the raw body of a successful response.
    fn send(&self, request: ApiRequest) -> Result<Vec<u8>, ClientError> {
        log::debug!("{} {}", request.method, request.path());
        let resp = self.transport.execute(&request)?;
        if !resp.status.is_success() {
            let message = match String::from_utf8(resp.body) {
                Ok(s) if !s.trim().is_empty() => s,
                _ => String::from("<no body>"),
            };
            return Err(ClientError::Http {
                status: resp.status.as_u16(),
                message,
            });
        }
        Ok(resp.body)
    }

    fn fetch<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ClientError> {
        let body = self.send(request)?;
        let de = &mut serde_json::Deserializer::from_slice(&body);
        serde_path_to_error::deserialize(de).map_err(ClientError::Json)
    }

    /// Commands answer with a small acknowledgement object, sometimes with nothing at all.
    fn command(&self, request: ApiRequest) -> Result<Value, ClientError> {
        let body = self.send(request)?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        let de = &mut serde_json::Deserializer::from_slice(&body);
        serde_path_to_error::deserialize(de).map_err(ClientError::Json)
    }
}

fn encode<S: serde::Serialize>(value: &S) -> Result<Value, ClientError> {
    serde_json::to_value(value).map_err(ClientError::Encode)
}
