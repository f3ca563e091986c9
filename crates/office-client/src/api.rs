use office_types::{ApiResponse, ErrorEnvelope};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::session::SessionGuard;
use crate::transport::{ApiReply, ApiRequest, Method, Transport};

/// Envelope-aware client. Attaches the current bearer token and turns
/// non-2xx replies into [`ClientError::Server`].
pub struct ApiClient<T> {
    transport: T,
    session: Option<SessionGuard>,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            session: None,
        }
    }

    pub fn with_session(mut self, session: SessionGuard) -> Self {
        self.session = Some(session);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn get<R: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<ApiResponse<R>, ClientError> {
        let mut request = ApiRequest::new(Method::Get, path);
        request.query = query;
        self.dispatch(request).await
    }

    pub async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<R>, ClientError> {
        let mut request = ApiRequest::new(Method::Post, path);
        request.body = Some(encode(body)?);
        self.dispatch(request).await
    }

    pub async fn put<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<R>, ClientError> {
        let mut request = ApiRequest::new(Method::Put, path);
        request.body = Some(encode(body)?);
        self.dispatch(request).await
    }

    pub async fn delete<R: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ApiResponse<R>, ClientError> {
        self.dispatch(ApiRequest::new(Method::Delete, path)).await
    }

    async fn dispatch<R: DeserializeOwned>(
        &self,
        mut request: ApiRequest,
    ) -> Result<ApiResponse<R>, ClientError> {
        request.bearer = self.session.as_ref().and_then(SessionGuard::token);
        let method = request.method;
        let path = request.path.clone();

        let reply = self.transport.send(request).await?;
        debug!("{method:?} {path} -> {}", reply.status);
        if !reply.is_success() {
            return Err(server_error(&reply));
        }

        serde_json::from_str(&reply.body).map_err(|e| {
            warn!("undecodable response from {path}: {e}");
            ClientError::Codec(format!("{path}: {e}"))
        })
    }
}

fn encode<B: Serialize>(body: &B) -> Result<serde_json::Value, ClientError> {
    serde_json::to_value(body).map_err(|e| ClientError::Codec(e.to_string()))
}

fn server_error(reply: &ApiReply) -> ClientError {
    let message = serde_json::from_str::<ErrorEnvelope>(&reply.body)
        .ok()
        .map(|envelope| envelope.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("HTTP {}", reply.status));
    ClientError::Server {
        status: reply.status,
        message,
    }
}
