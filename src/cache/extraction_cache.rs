use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

/// Thread-safe LRU cache for extraction adapter responses
///
/// Caches the adapter's raw output per prompt to avoid redundant API calls
/// when the same passage is extracted more than once. Uses LRU eviction to
/// maintain bounded memory usage.
pub struct ExtractionCache {
    cache: Mutex<LruCache<String, String>>,
}

impl ExtractionCache {
    /// Create a new extraction cache with the specified capacity
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of responses to cache
    ///
    /// # Panics
    ///
    /// Panics if capacity is 0 (LRU cache requires non-zero capacity)
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity.max(1))
            .expect("Cache capacity must be at least 1");

        Self {
            cache: Mutex::new(LruCache::new(cap)),
        }
    }

    /// Get the cached adapter output for a prompt
    ///
    /// # Returns
    ///
    /// Some(output) if found in cache, None otherwise
    pub fn get(&self, prompt: &str) -> Option<String> {
        self.cache
            .lock()
            .unwrap()
            .get(prompt)
            .cloned()
    }

    /// Store an adapter output in the cache
    pub fn put(&self, prompt: String, output: String) {
        self.cache
            .lock()
            .unwrap()
            .put(prompt, output);
    }

    /// Get the current number of cached entries
    pub fn len(&self) -> usize {
        self.cache.lock().unwrap().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.lock().unwrap().is_empty()
    }

    /// Clear all entries from the cache
    pub fn clear(&self) {
        self.cache.lock().unwrap().clear();
    }
}
