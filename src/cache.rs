use alloc::collections::BTreeMap;

use crate::{factory::Value, key::Key};

/// Instance table: explicit instances and memoized factory results
#[derive(Default, Clone)]
pub(crate) struct Cache {
    map: BTreeMap<Key, Value>,
}

impl Cache {
    #[inline]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self { map: BTreeMap::new() }
    }

    #[inline]
    #[must_use]
    pub(crate) fn get(&self, key: &Key) -> Option<Value> {
        self.map.get(key).cloned()
    }

    #[inline]
    #[must_use]
    pub(crate) fn contains(&self, key: &Key) -> bool {
        self.map.contains_key(key)
    }

    #[inline]
    pub(crate) fn insert(&mut self, key: Key, value: Value) -> Option<Value> {
        self.map.insert(key, value)
    }

    /// Moves all values of `other` into the cache, `other` wins on collision
    #[inline]
    pub(crate) fn append(&mut self, other: Cache) {
        self.map.extend(other.map);
    }

    #[inline]
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::Cache;
    use crate::{factory::Value, key::Key};

    use alloc::sync::Arc;

    #[test]
    fn test_append_overwrites() {
        let shared: Value = Arc::new(1u8);

        let mut cache = Cache::new();
        cache.insert(Key::new("title"), Arc::new(0u8));
        cache.insert(Key::new("text"), shared.clone());

        let mut other = Cache::new();
        other.insert(Key::new("title"), Arc::new(2u8));
        other.insert(Key::new("text1"), Arc::new(3u8));

        cache.append(other);

        assert_eq!(cache.len(), 3);
        assert_eq!(*cache.get(&Key::new("title")).unwrap().downcast::<u8>().unwrap(), 2);
        assert_eq!(*cache.get(&Key::new("text1")).unwrap().downcast::<u8>().unwrap(), 3);
        assert!(Arc::ptr_eq(&cache.get(&Key::new("text")).unwrap(), &shared));
    }
}
