//! Per-user memory for the "remember" and "recall" actions.

use std::collections::HashMap;

/// Returned by [`MemoryStore::recall`] when nothing is stored for a user.
pub const NO_DATA_SENTINEL: &str = "No data available";

/// Maps a user identifier to the last value remembered for them.
///
/// # Details
/// Remember overwrites unconditionally, recall on an unknown key resolves to
/// a sentinel instead of failing, and there is no deletion or expiry. The
/// store lives only for the process lifetime and has a single in-process
/// owner, so no concurrency control is needed.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` for `user_id`, replacing any previous value.
    pub fn remember(&mut self, user_id: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(user_id.into(), value.into());
    }

    /// Looks up the last value remembered for `user_id`.
    ///
    /// # Returns
    /// The stored value, or [`NO_DATA_SENTINEL`] when the user is unknown.
    pub fn recall(&self, user_id: &str) -> &str {
        self.entries
            .get(user_id)
            .map(String::as_str)
            .unwrap_or(NO_DATA_SENTINEL)
    }

    /// Number of users with a remembered value.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been remembered yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_user_resolves_to_sentinel() {
        let store = MemoryStore::new();
        assert_eq!(store.recall("nobody"), NO_DATA_SENTINEL);
    }

    #[test]
    fn remember_then_recall_round_trips() {
        let mut store = MemoryStore::new();
        store.remember("alice", "prefers quiet scans");
        assert_eq!(store.recall("alice"), "prefers quiet scans");
    }

    #[test]
    fn remember_overwrites_unconditionally() {
        let mut store = MemoryStore::new();
        store.remember("bob", "first");
        store.remember("bob", "second");
        assert_eq!(store.recall("bob"), "second");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn users_are_independent() {
        let mut store = MemoryStore::new();
        store.remember("alice", "a");
        assert_eq!(store.recall("bob"), NO_DATA_SENTINEL);
        assert!(!store.is_empty());
    }
}
