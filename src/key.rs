use alloc::{borrow::Cow, string::String, sync::Arc};
use core::{any::type_name, borrow::Borrow, fmt};

/// Canonical name a factory or an instance is registered under.
///
/// Two keys are equal iff their names are equal, there is no other notion of "type" in the container.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(Arc<str>);

impl Key {
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Key of a type with a caller-supplied stable name
    #[inline]
    #[must_use]
    pub fn of<T: Named + ?Sized>() -> Self {
        TypeKey::of::<T>().into_key()
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({:?})", &*self.0)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Key {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Key {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Stable name of a type used as a key.
///
/// [`core::any::type_name`] isn't guaranteed to be stable between compiler versions,
/// so types that are looked up by type should name themselves.
pub trait Named {
    fn name() -> &'static str;
}

/// A type descriptor, normalized to a [`Key`] on registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeKey {
    name: Cow<'static, str>,
}

impl TypeKey {
    #[inline]
    #[must_use]
    pub fn of<T: Named + ?Sized>() -> Self {
        Self {
            name: Cow::Borrowed(T::name()),
        }
    }

    /// Descriptor built from the compiler type name with module paths stripped,
    /// so `alloc::vec::Vec<app::User>` becomes `Vec<User>`.
    #[inline]
    #[must_use]
    pub fn short_name_of<T: ?Sized>() -> Self {
        Self {
            name: Cow::Owned(short_name(type_name::<T>())),
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit_once("::").map_or(path, |(_, name)| name)
}

fn short_name(full: &str) -> String {
    let is_delimiter = |c: char| matches!(c, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&' | '*');

    let mut short = String::with_capacity(full.len());
    let mut rest = full;
    while let Some(pos) = rest.find(is_delimiter) {
        let (path, tail) = rest.split_at(pos);
        short.push_str(last_segment(path));
        // Delimiters are all ASCII
        short.push_str(&tail[..1]);
        rest = &tail[1..];
    }
    short.push_str(last_segment(rest));
    short
}

/// Conversion into the canonical [`Key`]
pub trait IntoKey {
    fn into_key(self) -> Key;
}

impl IntoKey for Key {
    #[inline]
    fn into_key(self) -> Key {
        self
    }
}

impl IntoKey for &Key {
    #[inline]
    fn into_key(self) -> Key {
        self.clone()
    }
}

impl IntoKey for &str {
    #[inline]
    fn into_key(self) -> Key {
        Key::new(self)
    }
}

impl IntoKey for String {
    #[inline]
    fn into_key(self) -> Key {
        Key::new(self)
    }
}

impl IntoKey for &String {
    #[inline]
    fn into_key(self) -> Key {
        Key::new(self.as_str())
    }
}

impl IntoKey for TypeKey {
    #[inline]
    fn into_key(self) -> Key {
        match self.name {
            Cow::Borrowed(name) => Key::new(name),
            Cow::Owned(name) => Key::new(name),
        }
    }
}

impl IntoKey for &TypeKey {
    #[inline]
    fn into_key(self) -> Key {
        Key::new(self.name())
    }
}
