use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(0);

/// One recorded prompt and the response it produced.
///
/// Entries are only created by [`HistoryStore::append`] and never change
/// afterwards. The position is fixed at append time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    request: String,
    response: String,
    index: usize,
    store_id: u64,
}

impl Entry {
    pub fn request(&self) -> &str {
        &self.request
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    /// 0-based position in the history.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Append-only prompt history with a single navigation cursor.
///
/// The cursor is `None` exactly when the history is empty. Once the first
/// entry is appended it always points at a valid entry.
#[derive(Debug)]
pub struct HistoryStore {
    id: u64,
    entries: Vec<Entry>,
    cursor: Option<usize>,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore {
    pub fn new() -> Self {
        Self {
            id: NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed),
            entries: Vec::new(),
            cursor: None,
        }
    }

    /// Adds an entry at the tail and makes it current.
    pub fn append(&mut self, request: impl Into<String>, response: impl Into<String>) -> &Entry {
        let index = self.entries.len();
        self.entries.push(Entry {
            request: request.into(),
            response: response.into(),
            index,
            store_id: self.id,
        });
        self.cursor = Some(index);
        log::trace!("history: appended entry {}", index);

        &self.entries[index]
    }

    pub fn step_prev(&mut self) -> bool {
        match self.cursor {
            Some(pos) if pos > 0 => {
                self.cursor = Some(pos - 1);
                true
            }
            _ => false,
        }
    }

    pub fn step_next(&mut self) -> bool {
        match self.cursor {
            Some(pos) if pos + 1 < self.entries.len() => {
                self.cursor = Some(pos + 1);
                true
            }
            _ => false,
        }
    }

    pub fn has_prev(&self) -> bool {
        matches!(self.cursor, Some(pos) if pos > 0)
    }

    pub fn has_next(&self) -> bool {
        matches!(self.cursor, Some(pos) if pos + 1 < self.entries.len())
    }

    pub fn current(&self) -> Option<&Entry> {
        self.cursor.and_then(|pos| self.entries.get(pos))
    }

    /// Moves the cursor straight to `index`. Out of range leaves it untouched.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index < self.entries.len() {
            self.cursor = Some(index);
            true
        } else {
            false
        }
    }

    /// Moves the cursor to `entry` if it was appended to this history.
    /// Entries from another store are rejected even when their content matches.
    pub fn jump_to_entry(&mut self, entry: &Entry) -> bool {
        if entry.store_id != self.id {
            return false;
        }
        match self.entries.get(entry.index) {
            Some(stored) if stored == entry => self.jump_to(entry.index),
            _ => false,
        }
    }

    pub fn all_entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> HistoryStore {
        let mut store = HistoryStore::new();
        store.append("A", "a");
        store.append("B", "b");
        store.append("C", "c");
        store
    }

    fn pairs(entries: &[Entry]) -> Vec<(&str, &str)> {
        entries.iter().map(|e| (e.request(), e.response())).collect()
    }

    fn assert_cursor_invariant(store: &HistoryStore) {
        assert_eq!(store.current_index().is_none(), store.is_empty());
        if let Some(pos) = store.current_index() {
            assert!(pos < store.size());
        }
    }

    #[test]
    fn test_fresh_store() {
        let store = HistoryStore::new();
        assert_eq!(store.size(), 0);
        assert!(store.current().is_none());
        assert!(!store.has_prev());
        assert!(!store.has_next());
        assert_eq!(store.current_index(), None);
    }

    #[test]
    fn test_navigation_on_empty_store_is_noop() {
        let mut store = HistoryStore::new();
        assert!(!store.step_prev());
        assert!(!store.step_next());
        assert!(!store.jump_to(0));
        assert_cursor_invariant(&store);
    }

    #[test]
    fn test_append_selects_new_entry() {
        let mut store = HistoryStore::new();
        let entry = store.append("what is rust?", "a language");
        assert_eq!(entry.request(), "what is rust?");
        assert_eq!(entry.response(), "a language");
        assert_eq!(entry.index(), 0);

        let current = store.current().unwrap();
        assert_eq!(current.request(), "what is rust?");
        assert_eq!(current.response(), "a language");
        assert_eq!(store.current_index(), Some(store.size() - 1));
    }

    #[test]
    fn test_append_after_navigation_moves_cursor_to_tail() {
        let mut store = abc();
        store.jump_to(0);
        store.append("D", "d");
        assert_eq!(store.current_index(), Some(3));
        assert!(!store.has_next());
    }

    #[test]
    fn test_empty_strings_and_duplicates_are_kept() {
        let mut store = HistoryStore::new();
        store.append("", "");
        store.append("same", "x");
        store.append("same", "x");
        assert_eq!(store.size(), 3);
        assert_eq!(pairs(store.all_entries()), vec![("", ""), ("same", "x"), ("same", "x")]);
    }

    #[test]
    fn test_step_prev_to_head() {
        let mut store = abc();
        assert_eq!(store.current_index(), Some(2));
        assert!(store.step_prev());
        assert!(store.step_prev());
        assert_eq!(store.current_index(), Some(0));
        assert!(!store.has_prev());
        assert!(!store.step_prev());
        assert_eq!(store.current_index(), Some(0));
    }

    #[test]
    fn test_step_next_after_reaching_head() {
        let mut store = abc();
        store.step_prev();
        store.step_prev();
        assert!(store.step_next());
        assert_eq!(store.current_index(), Some(1));
        let current = store.current().unwrap();
        assert_eq!((current.request(), current.response()), ("B", "b"));
    }

    #[test]
    fn test_step_next_at_tail_is_noop() {
        let mut store = abc();
        assert!(!store.has_next());
        assert!(!store.step_next());
        assert_eq!(store.current_index(), Some(2));
    }

    #[test]
    fn test_single_entry_has_no_neighbours() {
        let mut store = HistoryStore::new();
        store.append("only", "one");
        assert!(!store.has_prev());
        assert!(!store.has_next());
        assert!(!store.step_prev());
        assert!(!store.step_next());
        assert_eq!(store.current_index(), Some(0));
    }

    #[test]
    fn test_jump_to_index() {
        for start in 0..3 {
            let mut store = abc();
            store.jump_to(start);
            assert!(store.jump_to(2));
            assert_eq!(store.current_index(), Some(2));
            let current = store.current().unwrap();
            assert_eq!((current.request(), current.response()), ("C", "c"));
        }
    }

    #[test]
    fn test_jump_out_of_range_is_noop() {
        let mut store = abc();
        store.jump_to(1);
        assert!(!store.jump_to(3));
        assert!(!store.jump_to(usize::MAX));
        assert_eq!(store.current_index(), Some(1));
    }

    #[test]
    fn test_jump_to_entry() {
        let mut store = abc();
        let first = store.all_entries()[0].clone();
        assert!(store.jump_to_entry(&first));
        assert_eq!(store.current_index(), Some(0));
        assert!(store.has_next());
    }

    #[test]
    fn test_jump_to_foreign_entry_is_noop() {
        let mut store = abc();
        let mut other = HistoryStore::new();
        let foreign = other.append("X", "x").clone();
        assert!(!store.jump_to_entry(&foreign));
        assert_eq!(store.current_index(), Some(2));

        let mut later = HistoryStore::new();
        for _ in 0..5 {
            later.append("A", "a");
        }
        let out_of_range = later.all_entries()[4].clone();
        assert!(!store.jump_to_entry(&out_of_range));
        assert_eq!(store.current_index(), Some(2));
    }

    #[test]
    fn test_jump_to_same_content_entry_from_other_store_is_noop() {
        let mut store = HistoryStore::new();
        store.append("A", "a");
        store.append("B", "b");

        let mut other = HistoryStore::new();
        let twin = other.append("A", "a").clone();
        assert_eq!(twin.index(), store.all_entries()[0].index());
        assert_eq!(twin.request(), store.all_entries()[0].request());

        assert!(!store.jump_to_entry(&twin));
        assert_eq!(store.current_index(), Some(1));
    }

    #[test]
    fn test_all_entries_unaffected_by_cursor() {
        let mut store = abc();
        let before = store.all_entries().to_vec();
        store.step_prev();
        store.jump_to(0);
        store.step_next();
        assert_eq!(store.all_entries(), before.as_slice());
        assert_eq!(pairs(&before), vec![("A", "a"), ("B", "b"), ("C", "c")]);
        assert!(before.iter().enumerate().all(|(i, e)| e.index() == i));
    }

    #[test]
    fn test_invariants_over_mixed_operations() {
        let mut store = HistoryStore::new();
        assert_cursor_invariant(&store);

        for step in 0..40usize {
            match step % 5 {
                0 => {
                    store.append(format!("q{step}"), format!("r{step}"));
                    assert_eq!(store.current_index(), Some(store.size() - 1));
                }
                1 => {
                    let before = store.current_index();
                    let could = store.has_prev();
                    assert_eq!(store.step_prev(), could);
                    if !could {
                        assert_eq!(store.current_index(), before);
                    }
                }
                2 => {
                    let before = store.current_index();
                    let could = store.has_next();
                    assert_eq!(store.step_next(), could);
                    if !could {
                        assert_eq!(store.current_index(), before);
                    }
                }
                3 => {
                    store.jump_to(step % 4);
                }
                _ => {
                    store.step_prev();
                    store.step_prev();
                }
            }
            assert_cursor_invariant(&store);
        }
    }
}
