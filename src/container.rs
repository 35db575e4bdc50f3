use alloc::{sync::Arc, vec::Vec};
use core::fmt;
use parking_lot::Mutex;
use tracing::{debug, error, info_span};

use crate::{
    cache::Cache,
    config::Config,
    context::Context,
    errors::{InstantiateErrorKind, ResolveErrorKind},
    factory::{boxed_factory, Provider, Value},
    key::{IntoKey, Key},
    lock::InFlight,
    registry::Registry,
};

/// Dependency-injection container.
///
/// Maps keys to factories or instances. Factories are invoked lazily on the first resolve of their key,
/// and the produced value is cached and returned by every later resolve.
///
/// Cloning the container is cheap and returns a handle to the same registrations and cache.
#[derive(Clone)]
pub struct Container {
    context: Context,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// Creates an empty container
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            context: Context {
                inner: Arc::new(ContainerInner {
                    registry: Mutex::new(Registry::new()),
                    cache: Mutex::new(Cache::new()),
                    in_flight: InFlight::default(),
                }),
            },
        }
    }

    #[inline]
    pub(crate) fn from_context(context: Context) -> Self {
        Self { context }
    }

    /// Read/write view passed to factories. Created once per container.
    #[inline]
    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Registers a factory under the key, replacing a previous factory.
    ///
    /// # Warning
    /// If the key was already resolved, the cached value keeps being returned and the new factory is never called.
    pub fn register<F, T>(&self, key: impl IntoKey, factory: F) -> &Self
    where
        F: Fn(&Context) -> Result<T, InstantiateErrorKind> + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        self.register_with_config(key, factory, Config::default())
    }

    pub fn register_with_config<F, T>(&self, key: impl IntoKey, factory: F, config: Config) -> &Self
    where
        F: Fn(&Context) -> Result<T, InstantiateErrorKind> + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        self.inner().register(
            key.into_key(),
            Provider::Factory {
                factory: boxed_factory(factory),
                config,
            },
        );
        self
    }

    /// Registers a ready value in place of a factory.
    /// Unlike [`Self::register_instance`], the key is listed by [`Self::registered_types`].
    pub fn register_constant<T: Send + Sync + 'static>(&self, key: impl IntoKey, value: T) -> &Self {
        self.inner().register(key.into_key(), Provider::Constant(Arc::new(value)));
        self
    }

    /// Registers an instance, replacing a previous instance or cached value of the key
    pub fn register_instance<T: Send + Sync + 'static>(&self, key: impl IntoKey, value: T) -> &Self {
        self.register_instance_rc(key, Arc::new(value))
    }

    pub fn register_instance_rc<T: Send + Sync + 'static>(&self, key: impl IntoKey, value: Arc<T>) -> &Self {
        self.inner().register_instance(key.into_key(), value);
        self
    }

    /// Resolves the value registered under the key.
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::NotFound`] if neither an instance nor a factory is registered for the key
    /// - Returns [`ResolveErrorKind::CircularDependency`] if the key's factory transitively requires the key itself
    /// - Returns [`ResolveErrorKind::IncorrectType`] if the value isn't a `T`
    /// - Returns [`ResolveErrorKind::Factory`] if a factory failed
    #[inline]
    pub fn resolve<T: Send + Sync + 'static>(&self, key: impl IntoKey) -> Result<Arc<T>, ResolveErrorKind> {
        self.context.get(key)
    }

    /// Resolves the value registered under the key without checking its type
    #[allow(clippy::missing_errors_doc)]
    #[inline]
    pub fn resolve_any(&self, key: impl IntoKey) -> Result<Value, ResolveErrorKind> {
        self.context.get_any(key)
    }

    /// Copies instances and factories of `other` into this container, `other`'s entries win on collision.
    ///
    /// Values are shared with `other`, not copied.
    /// Merged factories run against this container, so they pull their dependencies from it.
    pub fn merge_container(&self, other: &Container) -> &Self {
        if Arc::ptr_eq(self.inner(), other.inner()) {
            return self;
        }

        // Snapshot first, so the locks of both containers are never held at the same time
        let instances = other.inner().cache.lock().clone();
        let providers = other.inner().registry.lock().clone();

        self.inner().cache.lock().append(instances);
        self.inner().registry.lock().append(providers);

        debug!("Merged container");
        self
    }

    /// Keys with a registered factory or constant.
    /// Keys known only through [`Self::register_instance`] aren't included.
    #[must_use]
    pub fn registered_types(&self) -> Vec<Key> {
        self.inner().registry.lock().keys()
    }

    /// Checks whether an instance or a factory is registered for the key
    #[must_use]
    pub fn contains(&self, key: impl IntoKey) -> bool {
        let key = key.into_key();
        self.inner().cache.lock().contains(&key) || self.inner().registry.lock().contains(&key)
    }

    #[inline]
    fn inner(&self) -> &Arc<ContainerInner> {
        &self.context.inner
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("registered_types", &self.registered_types())
            .field("instances", &self.inner().cache.lock().len())
            .finish()
    }
}

pub(crate) struct ContainerInner {
    registry: Mutex<Registry>,
    cache: Mutex<Cache>,
    in_flight: InFlight,
}

impl ContainerInner {
    pub(crate) fn register(&self, key: Key, provider: Provider) {
        debug!(%key, ?provider, "Registered");
        self.registry.lock().insert(key, provider);
    }

    pub(crate) fn register_instance(&self, key: Key, value: Value) {
        debug!(%key, "Registered instance");
        self.cache.lock().insert(key, value);
    }

    pub(crate) fn resolve(&self, key: &Key, context: &Context) -> Result<Value, ResolveErrorKind> {
        let span = info_span!("resolve", %key);
        let _guard = span.enter();

        if let Some(value) = self.cache.lock().get(key) {
            debug!("Found in cache");
            return Ok(value);
        }
        debug!("Not found in cache");

        if !self.registry.lock().contains(key) {
            let err = ResolveErrorKind::NotFound { key: key.clone() };
            error!("{}", err);
            return Err(err);
        }

        let _in_flight = match self.in_flight.acquire(key) {
            Ok(guard) => guard,
            Err(err) => {
                error!("{}", err);
                return Err(err);
            }
        };

        // Another thread may have resolved the key while we were waiting for it
        if let Some(value) = self.cache.lock().get(key) {
            debug!("Found in cache after waiting");
            return Ok(value);
        }

        let Some(provider) = self.registry.lock().get(key) else {
            let err = ResolveErrorKind::NotFound { key: key.clone() };
            error!("{}", err);
            return Err(err);
        };

        match provider {
            Provider::Constant(value) => {
                self.cache.lock().insert(key.clone(), value.clone());
                debug!("Constant cached");
                Ok(value)
            }
            Provider::Factory { factory, config } => match factory(context) {
                Ok(value) => {
                    if config.cache_provides {
                        self.cache.lock().insert(key.clone(), value.clone());
                        debug!("Cached");
                    }
                    Ok(value)
                }
                // Already logged where it was created
                Err(InstantiateErrorKind::Resolve(err)) => Err(*err),
                Err(InstantiateErrorKind::Custom(source)) => {
                    let err = ResolveErrorKind::Factory { key: key.clone(), source };
                    error!("{}", err);
                    Err(err)
                }
            },
        }
    }
}
