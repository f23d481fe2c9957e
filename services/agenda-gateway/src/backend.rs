//! Client for the upstream booking backend

use std::sync::Arc;

use axum::http::{HeaderMap, Method};

use crate::io::{BackendRequest, BackendResponse, HttpClient};

/// Issues calls against the configured backend origin
#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, http: Arc<dyn HttpClient>) -> Self {
        let base_url = base_url.into();
        tracing::debug!("Created BackendClient for {}", base_url);
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base, path and `?query` concatenated as-is. Empty queries are dropped.
    pub fn target_url(&self, path: &str, query: Option<&str>) -> String {
        match query.filter(|q| !q.is_empty()) {
            Some(query) => format!("{}{}?{}", self.base_url, path, query),
            None => format!("{}{}", self.base_url, path),
        }
    }

    /// Issue one call. Transport failures are returned, never retried.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        query: Option<&str>,
        headers: HeaderMap,
        body: Option<Vec<u8>>,
    ) -> crate::Result<BackendResponse> {
        let url = self.target_url(path, query);
        self.http
            .send(BackendRequest {
                method,
                url,
                headers,
                body,
            })
            .await
    }

    /// Shorthand for a bodiless GET
    pub async fn get(&self, path: &str) -> crate::Result<BackendResponse> {
        self.call(Method::GET, path, None, HeaderMap::new(), None)
            .await
    }
}
