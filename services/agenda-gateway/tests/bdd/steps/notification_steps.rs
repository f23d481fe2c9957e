//! BDD step definitions for the notification store feature

use std::time::Duration;

use agenda_gateway::notifications::{NotificationKind, NotificationStore};
use cucumber::{given, then, when};

use crate::world::GatewayWorld;

fn parse_kind(s: &str) -> NotificationKind {
    match s {
        "success" => NotificationKind::Success,
        "error" => NotificationKind::Error,
        "info" => NotificationKind::Info,
        other => panic!("Unknown notification kind: {}", other),
    }
}

fn store(world: &GatewayWorld) -> &NotificationStore {
    world.store.as_ref().expect("store not set")
}

#[given(expr = "a notification store with a default time-to-live of {int} ms")]
fn store_with_ttl(world: &mut GatewayWorld, ttl_ms: u64) {
    world.store = Some(NotificationStore::new(Duration::from_millis(ttl_ms)));
}

#[when(expr = "a(n) {word} notification {string} is pushed")]
fn push_default_ttl(world: &mut GatewayWorld, kind: String, message: String) {
    let created = store(world).push(parse_kind(&kind), message, None);
    world.pushed.push(created);
}

#[when(expr = "a(n) {word} notification {string} is pushed with a time-to-live of {int} ms")]
fn push_with_ttl(world: &mut GatewayWorld, kind: String, message: String, ttl_ms: u64) {
    let created = store(world).push(
        parse_kind(&kind),
        message,
        Some(Duration::from_millis(ttl_ms)),
    );
    world.pushed.push(created);
}

#[when(expr = "{int} ms elapse")]
async fn time_elapses(_world: &mut GatewayWorld, ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    for _ in 0..3 {
        tokio::task::yield_now().await;
    }
}

#[when(expr = "notification {int} is dismissed")]
fn dismiss(world: &mut GatewayWorld, id: u64) {
    let removed = store(world).dismiss(id);
    world.last_dismissal = Some(removed);
}

#[then(expr = "the notifications shown are {string}")]
fn shown_are(world: &mut GatewayWorld, expected: String) {
    let expected: Vec<u64> = expected
        .split(',')
        .map(|id| id.trim().parse().expect("ids must be numbers"))
        .collect();
    let shown: Vec<u64> = store(world).snapshot().iter().map(|n| n.id).collect();
    assert_eq!(shown, expected);
}

#[then("no notifications are shown")]
fn none_shown(world: &mut GatewayWorld) {
    assert!(store(world).snapshot().is_empty());
}

#[then(expr = "the newest notification reads {string}")]
fn newest_reads(world: &mut GatewayWorld, message: String) {
    let snapshot = store(world).snapshot();
    let newest = snapshot.first().expect("no notifications shown");
    assert_eq!(newest.message, message);
}

#[then(expr = "every pushed notification has a time-to-live of {int} ms")]
fn pushed_ttl(world: &mut GatewayWorld, ttl_ms: u64) {
    assert!(!world.pushed.is_empty());
    assert!(world.pushed.iter().all(|n| n.ttl_ms == ttl_ms));
}

#[then("the dismissal succeeded")]
fn dismissal_succeeded(world: &mut GatewayWorld) {
    assert_eq!(world.last_dismissal, Some(true));
}

#[then("the dismissal found nothing")]
fn dismissal_found_nothing(world: &mut GatewayWorld) {
    assert_eq!(world.last_dismissal, Some(false));
}
