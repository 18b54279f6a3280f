//! Classify notify events that concern the rules file.

use notify::{Event, EventKind};

/// Rules file change that warrants a reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulesFileEvent {
    Created,
    Changed,
    Deleted,
}

/// Map a raw notify event to a rules file event.
///
/// Only events naming `file_name` count; access events and other files in the
/// project root are dropped. Renames surface as modify events and are treated
/// as changes, since the reload re-checks whether the file still exists.
pub(super) fn classify(event: &Event, file_name: &str) -> Option<RulesFileEvent> {
    let names_rules_file = event
        .paths
        .iter()
        .any(|p| p.file_name().is_some_and(|n| n == file_name));
    if !names_rules_file {
        return None;
    }

    match &event.kind {
        EventKind::Create(_) => Some(RulesFileEvent::Created),
        EventKind::Modify(_) | EventKind::Any => Some(RulesFileEvent::Changed),
        EventKind::Remove(_) => Some(RulesFileEvent::Deleted),
        _ => None,
    }
}
