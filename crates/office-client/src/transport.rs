use std::future::Future;
use std::sync::Arc;

use crate::error::ClientError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// A backend call, relative to the API base.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiReply {
    pub status: u16,
    pub body: String,
}

impl ApiReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Moves a request to the backend and brings back whatever it answered.
///
/// Only transport failures are errors here; non-2xx replies come back as
/// `Ok` and are interpreted by [`crate::ApiClient`]. The returned future is
/// not required to be `Send` so browser fetch futures fit.
pub trait Transport {
    fn send(&self, request: ApiRequest) -> impl Future<Output = Result<ApiReply, ClientError>>;
}

impl<T: Transport> Transport for Arc<T> {
    fn send(&self, request: ApiRequest) -> impl Future<Output = Result<ApiReply, ClientError>> {
        (**self).send(request)
    }
}
