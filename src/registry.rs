use alloc::{collections::BTreeMap, vec::Vec};

use crate::{factory::Provider, key::Key};

/// Factory table, last registration for a key wins
#[derive(Default, Clone)]
pub(crate) struct Registry {
    providers: BTreeMap<Key, Provider>,
}

impl Registry {
    #[inline]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            providers: BTreeMap::new(),
        }
    }

    #[inline]
    #[must_use]
    pub(crate) fn get(&self, key: &Key) -> Option<Provider> {
        self.providers.get(key).cloned()
    }

    #[inline]
    #[must_use]
    pub(crate) fn contains(&self, key: &Key) -> bool {
        self.providers.contains_key(key)
    }

    #[inline]
    pub(crate) fn insert(&mut self, key: Key, provider: Provider) -> Option<Provider> {
        self.providers.insert(key, provider)
    }

    /// Moves all providers of `other` into the registry, `other` wins on collision
    #[inline]
    pub(crate) fn append(&mut self, other: Registry) {
        self.providers.extend(other.providers);
    }

    #[inline]
    #[must_use]
    pub(crate) fn keys(&self) -> Vec<Key> {
        self.providers.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Registry;
    use crate::{
        config::Config,
        factory::{boxed_factory, Provider},
        key::Key,
        Context,
    };

    use alloc::{sync::Arc, vec};

    #[test]
    fn test_insert_last_wins() {
        let mut registry = Registry::new();
        assert!(registry.insert(Key::new("a"), Provider::Constant(Arc::new(1u8))).is_none());

        let previous = registry.insert(
            Key::new("a"),
            Provider::Factory {
                factory: boxed_factory(|_: &Context| Ok(2u8)),
                config: Config::default(),
            },
        );

        assert!(matches!(previous, Some(Provider::Constant(_))));
        assert!(matches!(registry.get(&Key::new("a")), Some(Provider::Factory { .. })));
        assert_eq!(registry.keys(), vec![Key::new("a")]);
    }

    #[test]
    fn test_append_and_keys() {
        let mut registry = Registry::new();
        registry.insert(Key::new("title"), Provider::Constant(Arc::new(1u8)));

        let mut other = Registry::new();
        other.insert(Key::new("text1"), Provider::Constant(Arc::new(2u8)));
        other.insert(Key::new("title"), Provider::Constant(Arc::new(3u8)));

        registry.append(other);

        assert_eq!(registry.keys(), vec![Key::new("text1"), Key::new("title")]);
        let Some(Provider::Constant(title)) = registry.get(&Key::new("title")) else {
            panic!("title should be a constant");
        };
        assert_eq!(*title.downcast::<u8>().unwrap(), 3);
        assert!(registry.contains(&Key::new("text1")));
        assert!(!registry.contains(&Key::new("text2")));
    }
}
