//! BDD step definitions for the agenda gateway

pub mod loader_steps;
pub mod notification_steps;
