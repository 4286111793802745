//! Downloaded image cache
//!
//! Keeps recently downloaded images by URL so paging back and forth does not
//! download them again. The whole cache is dropped on memory pressure.

use crate::image::Image;
use lru::LruCache;
use std::num::NonZeroUsize;

pub struct RemoteImageCache {
    entries: LruCache<String, Image>,
}

impl RemoteImageCache {
    /// A cache holding at most `capacity` images (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Look up `url`, marking it most recently used
    pub fn get(&mut self, url: &str) -> Option<Image> {
        self.entries.get(url).cloned()
    }

    /// Store a downloaded image, evicting the least recently used one when full
    pub fn insert(&mut self, url: impl Into<String>, image: Image) {
        self.entries.put(url.into(), image);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            tracing::debug!("RemoteImageCache: dropping {} images", self.entries.len());
        }
        self.entries.clear();
    }
}
