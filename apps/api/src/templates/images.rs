//! Scoped image URL cache.
//!
//! Maps avatar storage paths to public URLs. One cache belongs to one layout
//! session (or one stateless request) and is evicted when that owner is torn
//! down; there is no process-wide instance.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

#[derive(Debug)]
pub struct ImageUrlCache {
    base_url: String,
    entries: Mutex<HashMap<String, String>>,
}

impl ImageUrlCache {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Public URL for `storage_path`, cached after the first lookup.
    ///
    /// Blank paths and paths with `..` segments resolve to nothing.
    pub fn resolve(&self, storage_path: &str) -> Option<String> {
        let path = storage_path.trim().trim_start_matches('/');
        if path.is_empty() || path.split('/').any(|segment| segment == "..") {
            return None;
        }

        let mut entries = self.entries();
        let url = entries
            .entry(path.to_string())
            .or_insert_with(|| format!("{}/{}", self.base_url, path));
        Some(url.clone())
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached URL. Returns how many were evicted.
    pub fn evict_all(&self) -> usize {
        let mut entries = self.entries();
        let evicted = entries.len();
        entries.clear();
        debug!(evicted, "Image URL cache evicted");
        evicted
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
