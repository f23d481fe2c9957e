//! Passthrough forwarding of `/api/*` requests to the backend
//!
//! Every resource route is an entry in [`ROUTES`]; a single [`forward`]
//! function serves all of them. The backend path is the inbound path with the
//! `/api` mount prefix removed, so path parameters travel verbatim. Status,
//! content type and body come back from the backend untouched.

use axum::body::{Body, Bytes};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::response::Response;
use axum::routing::MethodFilter;

use crate::backend::BackendClient;
use crate::GatewayError;

/// Prefix under which the passthrough routes are mounted
pub const API_PREFIX: &str = "/api";

/// Content type used for forwarded bodies and for bodiless backend replies
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// HTTP methods a passthrough entry may accept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl ForwardMethod {
    fn filter(self) -> MethodFilter {
        match self {
            ForwardMethod::Get => MethodFilter::GET,
            ForwardMethod::Post => MethodFilter::POST,
            ForwardMethod::Put => MethodFilter::PUT,
            ForwardMethod::Delete => MethodFilter::DELETE,
        }
    }
}

/// One forwarded resource path
#[derive(Debug, Clone, Copy)]
pub struct ProxyRoute {
    /// Backend path template, axum syntax (`/clientes/{id}`)
    pub path: &'static str,
    pub methods: &'static [ForwardMethod],
    /// Forward the inbound query string
    pub forward_query: bool,
}

impl ProxyRoute {
    /// Path the route is mounted at on the gateway
    pub fn mount_path(&self) -> String {
        format!("{}{}", API_PREFIX, self.path)
    }

    pub fn method_filter(&self) -> Option<MethodFilter> {
        self.methods
            .iter()
            .map(|m| m.filter())
            .reduce(MethodFilter::or)
    }
}

/// All passthrough routes exposed to the UI
pub const ROUTES: &[ProxyRoute] = &[
    ProxyRoute {
        path: "/clientes",
        methods: &[ForwardMethod::Get, ForwardMethod::Post],
        forward_query: true,
    },
    ProxyRoute {
        path: "/clientes/{id}",
        methods: &[ForwardMethod::Get, ForwardMethod::Put, ForwardMethod::Delete],
        forward_query: false,
    },
    ProxyRoute {
        path: "/agendamentos",
        methods: &[ForwardMethod::Get, ForwardMethod::Post],
        forward_query: false,
    },
    ProxyRoute {
        path: "/availability",
        methods: &[ForwardMethod::Get],
        forward_query: true,
    },
    ProxyRoute {
        path: "/servicos",
        methods: &[ForwardMethod::Get, ForwardMethod::Post],
        forward_query: false,
    },
    ProxyRoute {
        path: "/servicos/{id}",
        methods: &[ForwardMethod::Get, ForwardMethod::Put, ForwardMethod::Delete],
        forward_query: false,
    },
];

/// Methods whose body is forwarded as JSON
pub fn carries_body(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT || *method == Method::PATCH
}

/// Forward one inbound request and mirror the backend's reply.
///
/// Exactly one backend call is made. Transport failures are returned as
/// [`GatewayError::Http`] and rendered by the framework as a bare 500.
pub async fn forward(
    backend: &BackendClient,
    route: &ProxyRoute,
    method: Method,
    uri: &Uri,
    body: Bytes,
) -> crate::Result<Response> {
    let inbound_path = uri.path();
    let backend_path = inbound_path
        .strip_prefix(API_PREFIX)
        .unwrap_or(inbound_path);
    let query = if route.forward_query { uri.query() } else { None };

    let mut headers = HeaderMap::new();
    let body = if carries_body(&method) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        Some(body.to_vec())
    } else {
        None
    };

    tracing::debug!(
        "Forwarding {} {} -> {}",
        method,
        inbound_path,
        backend.target_url(backend_path, query)
    );

    let response = backend
        .call(method, backend_path, query, headers, body)
        .await?;

    let status = StatusCode::from_u16(response.status).map_err(|e| {
        GatewayError::Http(format!("Backend returned invalid status {}: {}", response.status, e))
    })?;
    let content_type = response
        .content_type
        .unwrap_or_else(|| HeaderValue::from_static(JSON_CONTENT_TYPE));

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, content_type)
        .body(Body::from(response.body))
        .map_err(|e| GatewayError::Server(format!("Building passthrough response: {}", e)))
}
