//! Request description and the transport seam underneath `SmartHeatingClient`.
//!
//! - `ApiRequest` is a plain value: method, path segments below the API base, query pairs
//!   and an optional JSON body. Building one never touches the network.
//! - `Transport` executes a request and hands back status + raw body. The client decides
//!   what counts as success.
//! - `UreqTransport` is the blocking production transport.

use http::{Method, StatusCode};
use serde_json::Value;
use url::Url;

use super::ClientError;

/// Path of the add-on's REST API below the home-automation host.
pub const API_BASE_SEGMENTS: [&str; 2] = ["api", "smart_heating"];

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ApiRequest {
            method,
            segments: segments.into_iter().map(|s| s.as_ref().to_string()).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(Method::GET, segments)
    }

    pub fn post<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(Method::POST, segments)
    }

    pub fn delete<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(Method::DELETE, segments)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Path relative to the API base, unencoded (`/efficiency/report/a1`).
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Absolute URL below `base`; segments and query values are percent-encoded here.
    pub fn url(&self, base: &Url) -> Result<Url, ClientError> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Url(format!("base url cannot carry a path: {}", base)))?
            .pop_if_empty()
            .extend(&self.segments);
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        Ok(url)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

pub trait Transport {
    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ClientError>;
}

/// Blocking transport on a shared `ureq` agent with an optional bearer token.
pub struct UreqTransport {
    agent: ureq::Agent,
    base: Url,
    token: Option<String>,
}

impl UreqTransport {
    /// `host` is the home-automation origin (`http://homeassistant.local:8123`); the API base
    /// path is appended.
    pub fn new(host: &str, token: Option<String>) -> Result<Self, ClientError> {
        let mut base = Url::parse(host).map_err(|e| ClientError::Url(format!("{}: {}", host, e)))?;
        base.path_segments_mut()
            .map_err(|_| ClientError::Url(format!("url cannot carry a path: {}", host)))?
            .pop_if_empty()
            .extend(API_BASE_SEGMENTS);

        // Status handling is the client's job; keep error bodies readable.
        let config = ureq::Agent::config_builder().http_status_as_error(false).build();
        let agent = ureq::Agent::new_with_config(config);

        Ok(UreqTransport { agent, base, token })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ClientError> {
        let url = request.url(&self.base)?;
        let mut builder = http::Request::builder()
            .method(request.method.clone())
            .uri(url.as_str())
            .header("Accept", "application/json");
        if let Some(token) = &self.token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        let result = match &request.body {
            Some(body) => {
                let bytes = serde_json::to_vec(body).map_err(ClientError::Encode)?;
                let req = builder
                    .header("Content-Type", "application/json")
                    .body(bytes)
                    .map_err(|e| ClientError::Transport(e.to_string()))?;
                self.agent.run(req)
            }
            None => {
                let req = builder.body(()).map_err(|e| ClientError::Transport(e.to_string()))?;
                self.agent.run(req)
            }
        };

        let mut response = result.map_err(|e| ClientError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Records every request and answers from a queue; an empty queue answers `200 {}`.
    #[derive(Default)]
    pub(crate) struct RecordingTransport {
        requests: RefCell<Vec<ApiRequest>>,
        responses: RefCell<VecDeque<Result<ApiResponse, String>>>,
    }

    impl RecordingTransport {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn respond(&self, status: u16, body: &str) {
            self.responses.borrow_mut().push_back(Ok(ApiResponse {
                status: StatusCode::from_u16(status).expect("valid status"),
                body: body.as_bytes().to_vec(),
            }));
        }

        pub(crate) fn fail(&self, message: &str) {
            self.responses.borrow_mut().push_back(Err(message.to_string()));
        }

        pub(crate) fn requests(&self) -> Vec<ApiRequest> {
            self.requests.borrow().clone()
        }

        pub(crate) fn last(&self) -> ApiRequest {
            self.requests.borrow().last().cloned().expect("at least one request")
        }
    }

    impl Transport for RecordingTransport {
        fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ClientError> {
            self.requests.borrow_mut().push(request.clone());
            match self.responses.borrow_mut().pop_front() {
                Some(Ok(resp)) => Ok(resp),
                Some(Err(message)) => Err(ClientError::Transport(message)),
                None => Ok(ApiResponse {
                    status: StatusCode::OK,
                    body: b"{}".to_vec(),
                }),
            }
        }
    }
}
