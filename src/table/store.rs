//! The lock-guarded current mapping.

use std::sync::{Arc, PoisonError, RwLock};

use crate::table::loader::Mapping;

/// Holds the active [`Mapping`] behind a reader/writer lock.
///
/// The lock only guards the `Arc`; readers never wait on disk I/O, and a
/// replace is a pointer swap under the write lock.
#[derive(Debug, Default)]
pub struct Store {
    current: RwLock<Arc<Mapping>>,
}

impl Store {
    pub fn new(mapping: Mapping) -> Self {
        Self {
            current: RwLock::new(Arc::new(mapping)),
        }
    }

    /// Look up `key` in the current mapping.
    pub fn get(&self, key: &str) -> Option<String> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        guard.get(key).cloned()
    }

    /// Install `mapping`, returning the one it replaced.
    pub fn replace(&self, mapping: Mapping) -> Arc<Mapping> {
        let next = Arc::new(mapping);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }

    /// The current mapping, for consistent multi-key reads.
    pub fn snapshot(&self) -> Arc<Mapping> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    pub fn len(&self) -> usize {
        self.current.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(&str, &str)]) -> Mapping {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_get_and_replace() {
        let store = Store::new(mapping(&[("cat", "dog")]));
        assert_eq!(store.get("cat").as_deref(), Some("dog"));
        assert_eq!(store.get("dog"), None);

        let old = store.replace(mapping(&[("dog", "cat")]));
        assert_eq!(old.get("cat").map(String::as_str), Some("dog"));
        assert_eq!(store.get("cat"), None);
        assert_eq!(store.get("dog").as_deref(), Some("cat"));
    }

    #[test]
    fn test_snapshot_is_stable_across_replace() {
        let store = Store::new(mapping(&[("a", "1"), ("b", "1")]));
        let snap = store.snapshot();
        store.replace(mapping(&[("a", "2")]));

        assert_eq!(snap.len(), 2);
        assert_eq!(snap.get("a").map(String::as_str), Some("1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_readers_never_see_mixed_mappings() {
        let store = Arc::new(Store::new(mapping(&[("a", "0"), ("b", "0")])));

        let writer = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for i in 1..200 {
                    let v = i.to_string();
                    store.replace(mapping(&[("a", &v), ("b", &v)]));
                }
            })
        };

        for _ in 0..1000 {
            let snap = store.snapshot();
            assert_eq!(snap.get("a"), snap.get("b"));
        }
        writer.join().unwrap();
    }
}
