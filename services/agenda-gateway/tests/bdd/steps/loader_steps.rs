//! BDD step definitions for the page loading feature

use std::collections::HashMap;
use std::sync::Arc;

use agenda_gateway::backend::BackendClient;
use agenda_gateway::io::{BackendRequest, BackendResponse, HttpClient};
use agenda_gateway::loader::Loader;
use agenda_gateway::GatewayError;
use axum::http::HeaderValue;
use cucumber::{given, then, when};

use crate::world::{GatewayWorld, StubReply};

const STUB_ORIGIN: &str = "http://stub-backend";

/// Backend that answers from a fixed script, by path
#[derive(Debug)]
struct StubBackend {
    replies: HashMap<String, StubReply>,
}

#[async_trait::async_trait]
impl HttpClient for StubBackend {
    async fn send(&self, request: BackendRequest) -> agenda_gateway::Result<BackendResponse> {
        let path = request
            .url
            .strip_prefix(STUB_ORIGIN)
            .unwrap_or(&request.url);
        match self.replies.get(path) {
            Some(StubReply::Respond { status, body }) => Ok(BackendResponse {
                status: *status,
                content_type: Some(HeaderValue::from_static("application/json")),
                body: body.as_bytes().to_vec(),
            }),
            Some(StubReply::Unreachable) | None => Err(GatewayError::Http(format!(
                "GET {} failed: connection refused",
                request.url
            ))),
        }
    }
}

fn loader(world: &GatewayWorld) -> Loader {
    let stub = StubBackend {
        replies: world.backend_replies.clone(),
    };
    Loader::new(BackendClient::new(STUB_ORIGIN, Arc::new(stub)))
}

fn page(world: &GatewayWorld) -> &serde_json::Value {
    world.page.as_ref().expect("no page loaded")
}

#[given(expr = "the backend answers {string} with status {int} and body {string}")]
fn backend_answers(world: &mut GatewayWorld, path: String, status: u16, body: String) {
    world
        .backend_replies
        .insert(path, StubReply::Respond { status, body });
}

#[given(expr = "the backend cannot be reached for {string}")]
fn backend_unreachable(world: &mut GatewayWorld, path: String) {
    world.backend_replies.insert(path, StubReply::Unreachable);
}

#[when("the clients page is loaded")]
async fn load_clients(world: &mut GatewayWorld) {
    let page = loader(world).clients_page().await;
    world.page = Some(serde_json::to_value(page).expect("page serializes"));
}

#[when("the services page is loaded")]
async fn load_services(world: &mut GatewayWorld) {
    let page = loader(world).services_page().await;
    world.page = Some(serde_json::to_value(page).expect("page serializes"));
}

#[when("the appointments page is loaded")]
async fn load_appointments(world: &mut GatewayWorld) {
    let page = loader(world).appointments_page().await;
    world.page = Some(serde_json::to_value(page).expect("page serializes"));
}

#[then(expr = "the page has {int} entries in {string}")]
fn page_has_entries(world: &mut GatewayWorld, count: usize, field: String) {
    let entries = page(world)[field.as_str()]
        .as_array()
        .unwrap_or_else(|| panic!("field '{}' is not a list", field));
    assert_eq!(entries.len(), count);
}

#[then(expr = "the page field {string} equals the backend body for {string}")]
fn page_field_matches_backend(world: &mut GatewayWorld, field: String, path: String) {
    let Some(StubReply::Respond { body, .. }) = world.backend_replies.get(&path) else {
        panic!("no scripted reply for '{}'", path);
    };
    let sent: serde_json::Value = serde_json::from_str(body).expect("scripted body is JSON");
    assert_eq!(page(world)[field.as_str()], sent);
}

#[then(expr = "the page reports an error mentioning {string}")]
fn page_error_mentions(world: &mut GatewayWorld, expected: String) {
    let error = page(world)["error"]
        .as_str()
        .expect("page has no error field");
    assert!(
        error.contains(&expected),
        "Expected error to mention '{}', got '{}'",
        expected,
        error
    );
}

#[then("the page reports no error")]
fn page_no_error(world: &mut GatewayWorld) {
    assert!(page(world).get("error").is_none());
}
