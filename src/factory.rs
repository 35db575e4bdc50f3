use alloc::sync::Arc;
use core::{any::Any, fmt};
use tracing::debug;

use crate::{config::Config, context::Context, errors::InstantiateErrorKind};

/// Type-erased value stored by the container
pub type Value = Arc<dyn Any + Send + Sync>;

pub(crate) type BoxedFactory = Arc<dyn Fn(&Context) -> Result<Value, InstantiateErrorKind> + Send + Sync>;

#[must_use]
pub(crate) fn boxed_factory<F, T>(factory: F) -> BoxedFactory
where
    F: Fn(&Context) -> Result<T, InstantiateErrorKind> + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    Arc::new(move |context: &Context| -> Result<Value, InstantiateErrorKind> {
        let value = factory(context)?;

        debug!("Instantiated");

        Ok(Arc::new(value))
    })
}

/// Entry of the factory table
#[derive(Clone)]
pub(crate) enum Provider {
    Factory { factory: BoxedFactory, config: Config },
    /// Pre-resolved value registered in place of a factory
    Constant(Value),
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Factory { config, .. } => f.debug_struct("Factory").field("config", config).finish_non_exhaustive(),
            Self::Constant(_) => f.write_str("Constant"),
        }
    }
}

#[derive(Clone)]
pub(crate) enum BindingKind {
    Factory { factory: BoxedFactory, config: Config },
    Instance(Value),
}

/// What [`crate::Context::set`] registers: a factory or a ready instance.
///
/// Built with [`factory`], [`factory_with_config`] or [`instance`].
#[derive(Clone)]
pub struct Binding(pub(crate) BindingKind);

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            BindingKind::Factory { config, .. } => f.debug_struct("Binding::Factory").field("config", config).finish_non_exhaustive(),
            BindingKind::Instance(_) => f.write_str("Binding::Instance"),
        }
    }
}

/// Wraps a factory to be registered through [`crate::Context::set`]
#[inline]
#[must_use]
pub fn factory<F, T>(factory: F) -> Binding
where
    F: Fn(&Context) -> Result<T, InstantiateErrorKind> + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    factory_with_config(factory, Config::default())
}

#[inline]
#[must_use]
pub fn factory_with_config<F, T>(factory: F, config: Config) -> Binding
where
    F: Fn(&Context) -> Result<T, InstantiateErrorKind> + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    Binding(BindingKind::Factory {
        factory: boxed_factory(factory),
        config,
    })
}

/// Wraps a value that was created outside the container
#[inline]
#[must_use]
pub fn instance<T: Send + Sync + 'static>(value: T) -> Binding {
    Binding(BindingKind::Instance(Arc::new(value)))
}

#[cfg(test)]
mod tests {
    use super::{boxed_factory, factory, instance, BindingKind};
    use crate::{Container, Context, InstantiateErrorKind, ResolveErrorKind};

    use alloc::sync::Arc;
    use core::sync::atomic::{AtomicU8, Ordering};
    use tracing::debug;
    use tracing_test::traced_test;

    struct Request(bool);

    #[test]
    #[traced_test]
    fn test_boxed_factory() {
        let call_count = Arc::new(AtomicU8::new(0));

        let boxed = boxed_factory({
            let call_count = call_count.clone();
            move |_: &Context| {
                call_count.fetch_add(1, Ordering::SeqCst);

                debug!("Call factory request");
                Ok(Request(true))
            }
        });

        let container = Container::new();
        let value_1 = boxed(container.context()).unwrap();
        let value_2 = boxed(container.context()).unwrap();

        assert!(value_1.downcast::<Request>().unwrap().0);
        assert!(value_2.downcast::<Request>().unwrap().0);
        // Caching is done by the container, not by the boxed factory
        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    #[traced_test]
    fn test_boxed_factory_nested_error() {
        let boxed = boxed_factory(|ctx| Ok(Request(*ctx.get::<bool>("flag")?)));

        let container = Container::new();
        let err = boxed(container.context()).err().unwrap();

        assert!(matches!(
            err,
            InstantiateErrorKind::Resolve(nested) if matches!(*nested, ResolveErrorKind::NotFound { .. }),
        ));
    }

    #[test]
    fn test_binding_kind() {
        assert!(matches!(factory(|_| Ok(Request(false))).0, BindingKind::Factory { .. }));
        assert!(matches!(instance(Request(false)).0, BindingKind::Instance(_)));
    }
}
