use reqwest::Url;
use tracing::debug;

use crate::error::ClientError;
use crate::transport::{ApiReply, ApiRequest, Method, Transport};

/// reqwest-backed transport. Works natively and in the browser.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(baseUrl: &str) -> Result<Self, ClientError> {
        // joining relative paths needs the trailing slash
        let normalized = if baseUrl.ends_with('/') {
            baseUrl.to_string()
        } else {
            format!("{baseUrl}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| ClientError::Transport(format!("invalid api base url {baseUrl}: {e}")))?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiReply, ClientError> {
        let url = self
            .base_url
            .join(request.path.trim_start_matches('/'))
            .map_err(|e| ClientError::Transport(format!("invalid path {}: {e}", request.path)))?;

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };
        debug!("{method} {url}");

        let mut builder = self.client.request(method, url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(ApiReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let transport = HttpTransport::new("http://localhost:8080/backoffice").unwrap();
        assert_eq!(transport.base_url().as_str(), "http://localhost:8080/backoffice/");
        let joined = transport.base_url().join("api/brands").unwrap();
        assert_eq!(joined.as_str(), "http://localhost:8080/backoffice/api/brands");
    }

    #[test]
    fn rejects_unparsable_base() {
        assert!(matches!(
            HttpTransport::new("not a url"),
            Err(ClientError::Transport(_))
        ));
    }
}
