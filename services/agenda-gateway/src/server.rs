//! HTTP surface exposed to the UI

use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::{delete, get, on};
use axum::{Json, Router};
use serde::Deserialize;

use crate::backend::BackendClient;
use crate::loader::Loader;
use crate::notifications::{NotificationKind, NotificationStore};
use crate::proxy::{self, ProxyRoute, ROUTES};

/// State shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub backend: BackendClient,
    pub loader: Loader,
    pub notifications: NotificationStore,
}

impl AppState {
    pub fn new(backend: BackendClient, notifications: NotificationStore) -> Self {
        Self {
            loader: Loader::new(backend.clone()),
            backend,
            notifications,
        }
    }
}

/// Build the gateway router
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new();
    for route in ROUTES {
        let Some(filter) = route.method_filter() else {
            continue;
        };
        router = router.route(
            &route.mount_path(),
            on(
                filter,
                move |State(state): State<AppState>, method: Method, uri: Uri, body: Bytes| {
                    passthrough(state, route, method, uri, body)
                },
            ),
        );
    }

    router
        .route("/pages/clientes", get(clients_page_handler))
        .route("/pages/servicos", get(services_page_handler))
        .route("/pages/agendamentos", get(appointments_page_handler))
        .route(
            "/notifications",
            get(list_notifications_handler).post(push_notification_handler),
        )
        .route("/notifications/{id}", delete(dismiss_notification_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

async fn passthrough(
    state: AppState,
    route: &'static ProxyRoute,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> crate::Result<axum::response::Response> {
    proxy::forward(&state.backend, route, method, &uri, body).await
}

async fn clients_page_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.loader.clients_page().await)
}

async fn services_page_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.loader.services_page().await)
}

async fn appointments_page_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.loader.appointments_page().await)
}

/// Body of `POST /notifications`
#[derive(Debug, Deserialize)]
struct PushNotification {
    #[serde(default)]
    kind: NotificationKind,
    message: String,
    #[serde(default)]
    ttl_ms: Option<u64>,
}

async fn list_notifications_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.notifications.snapshot())
}

async fn push_notification_handler(
    State(state): State<AppState>,
    Json(request): Json<PushNotification>,
) -> impl IntoResponse {
    let notification = state.notifications.push(
        request.kind,
        request.message,
        request.ttl_ms.map(Duration::from_millis),
    );
    (StatusCode::CREATED, Json(notification))
}

async fn dismiss_notification_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> StatusCode {
    if state.notifications.dismiss(id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}
