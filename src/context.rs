use alloc::sync::Arc;
use core::any::type_name;
use tracing::error;

use crate::{
    container::{Container, ContainerInner},
    errors::ResolveErrorKind,
    factory::{Binding, BindingKind, Provider, Value},
    key::IntoKey,
};

/// Read/write view of a [`Container`].
///
/// Factories receive it to pull their dependencies, external code can use it to register.
/// It holds no state of its own, every call is forwarded to the container it was created with.
#[derive(Clone)]
pub struct Context {
    pub(crate) inner: Arc<ContainerInner>,
}

impl Context {
    /// Resolves a dependency, equivalent to [`Container::resolve`]
    #[allow(clippy::missing_errors_doc)]
    pub fn get<T: Send + Sync + 'static>(&self, key: impl IntoKey) -> Result<Arc<T>, ResolveErrorKind> {
        let key = key.into_key();
        let value = self.inner.resolve(&key, self)?;

        value.downcast::<T>().map_err(|_| {
            let err = ResolveErrorKind::IncorrectType {
                key,
                expected: type_name::<T>(),
            };
            error!("{}", err);
            err
        })
    }

    /// Resolves a dependency without checking its type
    #[allow(clippy::missing_errors_doc)]
    pub fn get_any(&self, key: impl IntoKey) -> Result<Value, ResolveErrorKind> {
        self.inner.resolve(&key.into_key(), self)
    }

    /// Registers a factory ([`Container::register`]) or an instance ([`Container::register_instance`])
    /// depending on the binding
    pub fn set(&self, key: impl IntoKey, binding: Binding) -> &Self {
        let key = key.into_key();
        match binding.0 {
            BindingKind::Factory { factory, config } => self.inner.register(key, Provider::Factory { factory, config }),
            BindingKind::Instance(value) => self.inner.register_instance(key, value),
        }
        self
    }

    /// Returns a handle to the container this view belongs to
    #[inline]
    #[must_use]
    pub fn container(&self) -> Container {
        Container::from_context(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use crate::{factory, instance, Container, Context, ResolveErrorKind};

    use alloc::{string::String, sync::Arc};
    use core::sync::atomic::{AtomicU8, Ordering};
    use tracing_test::traced_test;

    struct C;
    struct A(Arc<C>);

    #[test]
    #[traced_test]
    fn test_set_factory_registers() {
        let container = Container::new();
        let ctx = container.context();

        ctx.set("depC", factory(|_| Ok(C)))
            .set("depA", factory(|ctx| Ok(A(ctx.get("depC")?))));

        let a = ctx.get::<A>("depA").unwrap();
        let c = ctx.get::<C>("depC").unwrap();

        assert!(Arc::ptr_eq(&a.0, &c));
        assert_eq!(container.registered_types().len(), 2);
    }

    #[test]
    #[traced_test]
    fn test_set_instance_registers_instance() {
        let container = Container::new();
        let ctx = container.context();

        ctx.set("c3", instance(String::from("c3")));

        assert_eq!(*ctx.get::<String>("c3").unwrap(), "c3");
        // Instances aren't listed as registered types
        assert!(container.registered_types().is_empty());
    }

    #[test]
    #[traced_test]
    fn test_get_incorrect_type() {
        let container = Container::new();
        container.register_instance("x", 1u8);

        assert!(matches!(
            container.context().get::<String>("x"),
            Err(ResolveErrorKind::IncorrectType { expected, .. }) if expected == core::any::type_name::<String>(),
        ));
        assert!(container.context().get_any("x").is_ok());
    }

    #[test]
    #[traced_test]
    fn test_context_is_shared_with_factories() {
        let seen = Arc::new(AtomicU8::new(0));

        let container = Container::new();
        container.register("view", {
            let seen = seen.clone();
            let id = Arc::as_ptr(&container.context().inner) as usize;
            move |ctx: &Context| {
                if Arc::as_ptr(&ctx.inner) as usize == id {
                    seen.fetch_add(1, Ordering::SeqCst);
                }
                Ok(())
            }
        });
        container.resolve::<()>("view").unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_container_handle() {
        let container = Container::new();
        let handle = container.context().container();
        handle.register_instance("title", String::from("Hello"));

        assert_eq!(*container.resolve::<String>("title").unwrap(), "Hello");
    }
}
