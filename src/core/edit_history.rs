// edit_history module - snapshot-based undo/redo
use std::time::Instant;

/// Document text and cursor at one point in time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub text: String,
    pub cursor: usize,
}

impl Snapshot {
    pub fn new(text: impl Into<String>, cursor: usize) -> Self {
        Self {
            text: text.into(),
            cursor,
        }
    }
}

#[derive(Clone, Debug)]
pub struct EditHistory {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_history: usize,

    // For grouping rapid edits (like continuous typing)
    last_edit_time: Option<Instant>,
    grouping_threshold_ms: u128,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new(500)
    }
}

impl EditHistory {
    pub fn new(max_history: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_history,
            last_edit_time: None,
            grouping_threshold_ms: 500, // Group edits within 500ms
        }
    }

    /// Records the state before an edit.
    ///
    /// Typing edits that follow each other within the grouping threshold
    /// collapse into the first one, so one undo removes the whole burst.
    pub fn record(&mut self, before: Snapshot, typing: bool) {
        self.record_at(before, typing, Instant::now());
    }

    pub fn record_at(&mut self, before: Snapshot, typing: bool, now: Instant) {
        self.redo_stack.clear();

        let grouped = typing
            && !self.undo_stack.is_empty()
            && self
                .last_edit_time
                .is_some_and(|last| now.duration_since(last).as_millis() <= self.grouping_threshold_ms);

        self.last_edit_time = if typing { Some(now) } else { None };
        if grouped {
            return;
        }

        self.undo_stack.push(before);

        // Limit stack size
        if self.undo_stack.len() > self.max_history {
            self.undo_stack.remove(0);
        }
    }

    /// Returns the state to restore; `current` becomes redoable.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let snapshot = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        self.last_edit_time = None;
        Some(snapshot)
    }

    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        self.last_edit_time = None;
        Some(snapshot)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.last_edit_time = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn undo_then_redo() {
        let mut history = EditHistory::new(10);
        history.record(Snapshot::new("", 0), false);

        let restored = history.undo(Snapshot::new("abc", 3)).unwrap();
        assert_eq!(restored, Snapshot::new("", 0));
        assert!(history.can_redo());

        let again = history.redo(restored).unwrap();
        assert_eq!(again, Snapshot::new("abc", 3));
        assert!(history.undo(Snapshot::new("x", 1)).is_some());
        assert!(history.undo(Snapshot::new("x", 1)).is_none());
    }

    #[test]
    fn rapid_typing_is_grouped() {
        let mut history = EditHistory::new(10);
        let start = Instant::now();

        history.record_at(Snapshot::new("", 0), true, start);
        history.record_at(Snapshot::new("a", 1), true, start + Duration::from_millis(100));
        history.record_at(Snapshot::new("ab", 2), true, start + Duration::from_millis(200));

        assert_eq!(history.undo(Snapshot::new("abc", 3)), Some(Snapshot::new("", 0)));
        assert!(!history.can_undo());
    }

    #[test]
    fn pause_starts_a_new_group() {
        let mut history = EditHistory::new(10);
        let start = Instant::now();

        history.record_at(Snapshot::new("", 0), true, start);
        history.record_at(Snapshot::new("a", 1), true, start + Duration::from_millis(900));

        assert_eq!(history.undo(Snapshot::new("ab", 2)), Some(Snapshot::new("a", 1)));
        assert!(history.can_undo());
    }

    #[test]
    fn commands_are_never_grouped() {
        let mut history = EditHistory::new(10);
        let now = Instant::now();

        history.record_at(Snapshot::new("a", 1), false, now);
        history.record_at(Snapshot::new("**a**", 5), false, now);

        assert_eq!(history.undo(Snapshot::new("> **a**", 7)), Some(Snapshot::new("**a**", 5)));
    }

    #[test]
    fn new_edit_clears_redo() {
        let mut history = EditHistory::new(10);
        history.record(Snapshot::new("", 0), false);
        history.undo(Snapshot::new("a", 1));
        history.record(Snapshot::new("", 0), false);
        assert!(!history.can_redo());
    }

    #[test]
    fn stack_is_limited() {
        let mut history = EditHistory::new(2);
        for n in 0..5 {
            history.record(Snapshot::new(n.to_string(), 0), false);
        }
        assert_eq!(history.undo(Snapshot::new("5", 0)).unwrap().text, "4");
        assert_eq!(history.undo(Snapshot::new("4", 0)).unwrap().text, "3");
        assert!(history.undo(Snapshot::new("3", 0)).is_none());
    }
}
