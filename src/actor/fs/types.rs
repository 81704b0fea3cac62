use crate::session::FileEvent;

/// Map a notify event kind to a file event.
///
/// Metadata-only changes (mtime/atime/chmod noise) are dropped: touching
/// them can trigger endless rebuild loops.
pub(super) fn file_event(kind: &notify::EventKind) -> Option<FileEvent> {
    use notify::EventKind;
    use notify::event::ModifyKind;

    match kind {
        EventKind::Create(_) => Some(FileEvent::Add),
        EventKind::Remove(_) => Some(FileEvent::Unlink),
        EventKind::Modify(ModifyKind::Metadata(_)) => None,
        EventKind::Modify(_) => Some(FileEvent::Change),
        _ => None,
    }
}
