use std::path::PathBuf;
use std::time::{Duration, Instant};

use super::debouncer::{DEBOUNCE_MS, Debouncer, REBUILD_COOLDOWN_MS, is_temp_file};
use crate::session::FileEvent;

fn make_event(paths: Vec<&str>, kind: notify::EventKind) -> notify::Event {
    notify::Event {
        kind,
        paths: paths.into_iter().map(PathBuf::from).collect(),
        attrs: Default::default(),
    }
}

fn modify_kind() -> notify::EventKind {
    notify::EventKind::Modify(notify::event::ModifyKind::Data(
        notify::event::DataChange::Any,
    ))
}

fn metadata_kind() -> notify::EventKind {
    notify::EventKind::Modify(notify::event::ModifyKind::Metadata(
        notify::event::MetadataKind::WriteTime,
    ))
}

fn create_kind() -> notify::EventKind {
    notify::EventKind::Create(notify::event::CreateKind::File)
}

fn remove_kind() -> notify::EventKind {
    notify::EventKind::Remove(notify::event::RemoveKind::File)
}

fn path(p: &str) -> PathBuf {
    PathBuf::from(p)
}

#[test]
fn test_debouncer_empty() {
    let debouncer = Debouncer::new();
    assert!(!debouncer.is_ready());
}

#[test]
fn test_event_routing_by_kind() {
    let mut debouncer = Debouncer::new();

    debouncer.add_event(&make_event(vec!["/spritegen/a.svg"], create_kind()));
    debouncer.add_event(&make_event(vec!["/spritegen/b.svg"], modify_kind()));
    debouncer.add_event(&make_event(vec!["/spritegen/c.svg"], remove_kind()));

    assert_eq!(debouncer.changes.len(), 3);
    assert_eq!(debouncer.changes[&path("/spritegen/a.svg")], FileEvent::Add);
    assert_eq!(debouncer.changes[&path("/spritegen/b.svg")], FileEvent::Change);
    assert_eq!(debouncer.changes[&path("/spritegen/c.svg")], FileEvent::Unlink);
}

#[test]
fn test_metadata_change_ignored() {
    let mut debouncer = Debouncer::new();
    debouncer.add_event(&make_event(vec!["/spritegen/a.svg"], metadata_kind()));
    assert!(debouncer.changes.is_empty());
    assert!(debouncer.last_event.is_none());
}

#[test]
fn test_temp_file_ignored() {
    let mut debouncer = Debouncer::new();

    debouncer.add_event(&make_event(vec!["/spritegen/real.svg"], modify_kind()));
    let first_time = debouncer.last_event.unwrap();

    std::thread::sleep(Duration::from_millis(5));

    debouncer.add_event(&make_event(vec!["/spritegen/.real.svg.swp"], modify_kind()));
    assert_eq!(debouncer.last_event.unwrap(), first_time);
    assert_eq!(debouncer.changes.len(), 1);
}

#[test]
fn test_is_temp_file() {
    assert!(is_temp_file(&path("icon.svg~")));
    assert!(is_temp_file(&path("icon.svg.bak")));
    assert!(is_temp_file(&path(".icon.svg")));
    assert!(!is_temp_file(&path("icon.svg")));
}

#[test]
fn test_dedup_first_event_wins() {
    let mut debouncer = Debouncer::new();

    debouncer.add_event(&make_event(vec!["/spritegen/a.svg"], create_kind()));
    debouncer.add_event(&make_event(vec!["/spritegen/a.svg"], modify_kind()));

    assert_eq!(debouncer.changes.len(), 1);
    assert_eq!(debouncer.changes[&path("/spritegen/a.svg")], FileEvent::Add);
}

#[test]
fn test_remove_then_create_restores() {
    let mut debouncer = Debouncer::new();

    debouncer.add_event(&make_event(vec!["/spritegen/a.svg"], remove_kind()));
    debouncer.add_event(&make_event(vec!["/spritegen/a.svg"], create_kind()));

    assert_eq!(debouncer.changes.len(), 1);
    assert_eq!(debouncer.changes[&path("/spritegen/a.svg")], FileEvent::Add);
}

#[test]
fn test_create_then_remove_discards() {
    let mut debouncer = Debouncer::new();

    debouncer.add_event(&make_event(vec!["/spritegen/a.svg"], create_kind()));
    debouncer.add_event(&make_event(vec!["/spritegen/a.svg"], remove_kind()));

    assert!(debouncer.changes.is_empty(), "created+removed should discard");
}

#[test]
fn test_modify_then_remove_upgrades() {
    let mut debouncer = Debouncer::new();

    debouncer.add_event(&make_event(vec!["/spritegen/a.svg"], modify_kind()));
    debouncer.add_event(&make_event(vec!["/spritegen/a.svg"], remove_kind()));

    assert_eq!(debouncer.changes.len(), 1);
    assert_eq!(debouncer.changes[&path("/spritegen/a.svg")], FileEvent::Unlink);
}

#[test]
fn test_take_if_ready_sorted() {
    let mut debouncer = Debouncer::new();
    debouncer.add_event(&make_event(
        vec!["/spritegen/z.svg", "/spritegen/a.svg", "/spritegen/m.svg"],
        modify_kind(),
    ));

    assert!(debouncer.take_if_ready().is_none(), "debounce window still open");

    debouncer.last_event = Some(Instant::now() - Duration::from_millis(DEBOUNCE_MS + 50));
    let events = debouncer.take_if_ready().unwrap();
    let paths: Vec<_> = events.iter().map(|(p, _)| p.clone()).collect();
    assert_eq!(
        paths,
        vec![
            path("/spritegen/a.svg"),
            path("/spritegen/m.svg"),
            path("/spritegen/z.svg")
        ]
    );
    assert!(debouncer.changes.is_empty());
    assert!(debouncer.last_flush.is_some());
}

#[test]
fn test_cooldown_blocks_flush() {
    let mut debouncer = Debouncer::new();
    debouncer.add_event(&make_event(vec!["/spritegen/a.svg"], modify_kind()));
    debouncer.last_event = Some(Instant::now() - Duration::from_millis(DEBOUNCE_MS + 50));
    debouncer.last_flush = Some(Instant::now());

    assert!(!debouncer.is_ready());
}

#[test]
fn test_sleep_duration_no_events() {
    let debouncer = Debouncer::new();
    assert!(debouncer.sleep_duration() >= Duration::from_secs(3600));
}

#[test]
fn test_sleep_duration_after_event() {
    let mut debouncer = Debouncer::new();
    debouncer.last_event = Some(Instant::now());

    let dur = debouncer.sleep_duration();
    assert!(dur >= Duration::from_millis(DEBOUNCE_MS - 10));
    assert!(dur <= Duration::from_millis(DEBOUNCE_MS + 10));
}

#[test]
fn test_sleep_duration_respects_cooldown() {
    let mut debouncer = Debouncer::new();
    debouncer.last_event = Some(Instant::now());
    debouncer.last_flush = Some(Instant::now());

    let dur = debouncer.sleep_duration();
    assert!(dur >= Duration::from_millis(REBUILD_COOLDOWN_MS - 10));
    assert!(dur <= Duration::from_millis(REBUILD_COOLDOWN_MS + 10));
}
