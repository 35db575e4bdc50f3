//! Minimal dependency-injection container with lazy, memoized and cycle-detecting resolution.
//!
//! Values are registered under string keys, either directly as instances or as factories.
//! A factory receives the container's [`Context`] and pulls its own dependencies from it.
//! It runs on the first resolve of its key, and its result is cached for every later resolve.
//!
//! ```
//! use memodi::Container;
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: Arc<String>,
//! }
//!
//! let container = Container::new();
//! container
//!     .register_instance("url", String::from("postgres://localhost"))
//!     .register("database", |ctx| Ok(Database { url: ctx.get("url")? }));
//!
//! let database = container.resolve::<Database>("database")?;
//! assert_eq!(*database.url, "postgres://localhost");
//! assert!(Arc::ptr_eq(&database, &container.resolve::<Database>("database")?));
//! # Ok::<(), memodi::ResolveErrorKind>(())
//! ```

extern crate alloc;

pub(crate) mod cache;
pub(crate) mod config;
pub(crate) mod container;
pub(crate) mod context;
pub(crate) mod errors;
pub(crate) mod factory;
pub(crate) mod key;
pub(crate) mod lock;
pub(crate) mod registry;

pub use config::Config;
pub use container::Container;
pub use context::Context;
pub use errors::{InstantiateErrorKind, ResolveErrorKind};
pub use factory::{factory, factory_with_config, instance, Binding, Value};
pub use key::{IntoKey, Key, Named, TypeKey};
