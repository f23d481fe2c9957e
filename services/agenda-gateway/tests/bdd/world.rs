//! BDD test world for the agenda gateway

use std::collections::HashMap;

use agenda_gateway::notifications::{Notification, NotificationStore};
use cucumber::World;

/// Scripted reply for one backend path
#[derive(Debug, Clone)]
pub enum StubReply {
    Respond { status: u16, body: String },
    Unreachable,
}

#[derive(Debug, Default, World)]
pub struct GatewayWorld {
    // Notification store testing
    pub store: Option<NotificationStore>,
    pub pushed: Vec<Notification>,
    pub last_dismissal: Option<bool>,

    // Page loading testing
    pub backend_replies: HashMap<String, StubReply>,
    pub page: Option<serde_json::Value>,
}
