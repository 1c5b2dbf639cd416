//! Ward note operations.

use crate::models::WardNote;

/// Add a ward-wide note, newest first. Whitespace-only text is dropped and
/// `None` is returned.
pub fn add_ward_note(notes: &[WardNote], text: &str, now: i64) -> Option<(Vec<WardNote>, WardNote)> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let note = WardNote::new(trimmed.to_string(), now);
    let mut next = Vec::with_capacity(notes.len() + 1);
    next.push(note.clone());
    next.extend_from_slice(notes);
    Some((next, note))
}

/// Remove a ward note by id; `None` when the id is unknown.
pub fn delete_ward_note(notes: &[WardNote], id: &str) -> Option<Vec<WardNote>> {
    notes.iter().position(|n| n.id == id)?;
    Some(notes.iter().filter(|n| n.id != id).cloned().collect())
}
