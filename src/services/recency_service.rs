//! Per (category, difficulty) memory of recently served question texts.
//!
//! Each key owns a [`RecencyWindow`]: a fixed-capacity, insertion-ordered set
//! backed by a single [`LruCache`]. Entries are never promoted on lookup, so
//! the cache's eviction order is exactly insertion order and the ordered
//! history and the membership index cannot drift apart.

use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

pub const DEFAULT_CAPACITY: usize = 50;

/// Key normalization: both fields trimmed and lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecencyKey {
    category: String,
    difficulty: String,
}

impl RecencyKey {
    pub fn new(category: &str, difficulty: &str) -> Self {
        Self {
            category: category.trim().to_lowercase(),
            difficulty: difficulty.trim().to_lowercase(),
        }
    }
}

pub struct RecencyWindow {
    entries: LruCache<String, ()>,
}

impl RecencyWindow {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Returns `false` when the text was already present.
    pub fn insert(&mut self, text: &str) -> bool {
        if self.entries.contains(text) {
            return false;
        }
        if let Some((evicted, ())) = self.entries.push(text.to_string(), ()) {
            tracing::debug!(evicted = %evicted, "Recency window full, dropped oldest question");
        }
        true
    }

    pub fn contains(&self, text: &str) -> bool {
        self.entries.contains(text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest first.
    #[cfg(test)]
    pub fn texts(&self) -> Vec<String> {
        self.entries.iter().rev().map(|(k, _)| k.clone()).collect()
    }
}

/// Process-wide recency state, shared by handle.
///
/// A single coarse lock guards the key map. Every operation under it is
/// bounded and never awaits.
#[derive(Clone)]
pub struct RecencyTracker {
    capacity: NonZeroUsize,
    windows: Arc<Mutex<HashMap<RecencyKey, RecencyWindow>>>,
}

impl Default for RecencyTracker {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl RecencyTracker {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            capacity,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn mark_seen(&self, category: &str, difficulty: &str, question: &str) {
        let key = RecencyKey::new(category, difficulty);
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        let window = windows
            .entry(key)
            .or_insert_with(|| RecencyWindow::new(self.capacity));
        if window.insert(question) {
            tracing::debug!(
                category = %category.trim(),
                difficulty = %difficulty.trim(),
                seen = window.len(),
                "Recorded question as seen"
            );
        }
    }

    pub fn is_seen(&self, category: &str, difficulty: &str, question: &str) -> bool {
        let key = RecencyKey::new(category, difficulty);
        let windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        windows
            .get(&key)
            .map(|w| w.contains(question))
            .unwrap_or(false)
    }

    pub fn seen_count(&self, category: &str, difficulty: &str) -> usize {
        let key = RecencyKey::new(category, difficulty);
        let windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        windows.get(&key).map(RecencyWindow::len).unwrap_or(0)
    }
}
