//! HTTP client abstraction for testability

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderValue, Method};

/// A request ready to be sent to the backend
#[derive(Debug, Clone)]
pub struct BackendRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

/// Raw response from the backend, uninterpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendResponse {
    pub status: u16,
    pub content_type: Option<HeaderValue>,
    pub body: Vec<u8>,
}

impl BackendResponse {
    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstraction over HTTP client for dependency injection
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient: Send + Sync {
    /// Send the request and return the status, content type and body
    async fn send(&self, request: BackendRequest) -> crate::Result<BackendResponse>;
}

/// Production HTTP client using reqwest
#[derive(Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, request: BackendRequest) -> crate::Result<BackendResponse> {
        let BackendRequest {
            method,
            url,
            headers,
            body,
        } = request;
        tracing::debug!("{} {}", method, url);

        let mut builder = self.client.request(method.clone(), &url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| crate::GatewayError::Http(format!("{} {} failed: {}", method, url, e)))?;

        let status = response.status().as_u16();
        let success = response.status().is_success();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .cloned();
        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            // Non-2xx: the status is the diagnostic.
            Err(e) if !success => {
                tracing::warn!("{} {} -> {}: body unreadable: {}", method, url, status, e);
                Vec::new()
            }
            Err(e) => {
                return Err(crate::GatewayError::Http(format!(
                    "Reading response body: {}",
                    e
                )))
            }
        };

        tracing::debug!("{} {} -> {} ({} bytes)", method, url, status, body.len());
        Ok(BackendResponse {
            status,
            content_type,
            body,
        })
    }
}
