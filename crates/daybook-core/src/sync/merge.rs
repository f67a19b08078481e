//! Conflict resolution and set merge.

use std::collections::HashMap;

use crate::models::{Note, NoteId};

/// Resolve a conflict between two records sharing the same ID.
///
/// Whole-record last-write-wins on `updated_at`, strict comparison. Ties
/// keep `a` — an explicit, arbitrary tie-break, not guaranteed stable
/// across implementations.
#[must_use]
pub fn resolve(a: Note, b: Note) -> Note {
    if b.updated_at > a.updated_at {
        b
    } else {
        a
    }
}

/// Merge two note collections into one consistent collection.
///
/// IDs present in only one side are carried through; IDs present in both
/// are resolved with [`resolve`], the `primary` entry as first argument.
/// Idempotent; output order is not significant, callers re-sort for display.
#[must_use]
pub fn merge(primary: Vec<Note>, secondary: Vec<Note>) -> Vec<Note> {
    let mut by_id: HashMap<NoteId, Note> = primary
        .into_iter()
        .map(|note| (note.id.clone(), note))
        .collect();

    for candidate in secondary {
        match by_id.remove(&candidate.id) {
            Some(existing) => {
                by_id.insert(candidate.id.clone(), resolve(existing, candidate));
            }
            None => {
                by_id.insert(candidate.id.clone(), candidate);
            }
        }
    }

    by_id.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn note(id: &str, hour: u32, content: &str) -> Note {
        let at = Utc.with_ymd_and_hms(2026, 1, 25, hour, 0, 0).unwrap();
        Note {
            id: id.into(),
            title: id.to_string(),
            content: content.to_string(),
            created_at: at,
            updated_at: at,
            is_synced: false,
            remote_file_id: None,
        }
    }

    fn sorted(mut notes: Vec<Note>) -> Vec<Note> {
        notes.sort_by(|a, b| a.id.cmp(&b.id));
        notes
    }

    #[test]
    fn test_resolve_keeps_newer_record_whole() {
        let older = note("x", 1, "old");
        let newer = note("x", 2, "new");

        assert_eq!(resolve(older.clone(), newer.clone()), newer);
        assert_eq!(resolve(newer.clone(), older), newer);
    }

    #[test]
    fn test_resolve_updated_at_is_max() {
        let a = note("x", 3, "a");
        let b = note("x", 7, "b");
        let winner = resolve(a.clone(), b.clone());
        assert_eq!(winner.updated_at, a.updated_at.max(b.updated_at));
    }

    #[test]
    fn test_resolve_tie_keeps_first_argument() {
        let first = note("x", 5, "first");
        let second = note("x", 5, "second");
        assert_eq!(resolve(first.clone(), second), first);
    }

    #[test]
    fn test_merge_carries_one_sided_ids() {
        let merged = merge(vec![note("a", 1, "a")], vec![note("b", 2, "b")]);
        assert_eq!(
            sorted(merged),
            sorted(vec![note("a", 1, "a"), note("b", 2, "b")])
        );
    }

    #[test]
    fn test_merge_resolves_shared_ids() {
        let merged = merge(
            vec![note("x", 1, "stale"), note("a", 1, "a")],
            vec![note("x", 4, "fresh")],
        );
        assert_eq!(
            sorted(merged),
            sorted(vec![note("a", 1, "a"), note("x", 4, "fresh")])
        );
    }

    #[test]
    fn test_merge_is_idempotent() {
        let a = vec![note("x", 1, "stale"), note("a", 2, "a")];
        let b = vec![note("x", 4, "fresh"), note("b", 3, "b")];

        let once = merge(a, b.clone());
        let twice = merge(once.clone(), b);
        assert_eq!(sorted(once), sorted(twice));
    }
}
