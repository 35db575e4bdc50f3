use crate::key::Key;

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("No instance or factory registered for key `{key}`")]
    NotFound { key: Key },
    #[error("Circular dependency detected while resolving key `{key}`")]
    CircularDependency { key: Key },
    #[error("Incorrect type registered for key `{key}`, expected: {expected}")]
    IncorrectType { key: Key, expected: &'static str },
    #[error("Factory for key `{key}` failed")]
    Factory {
        key: Key,
        #[source]
        source: anyhow::Error,
    },
}

impl ResolveErrorKind {
    /// Key the error was raised for
    #[must_use]
    pub fn key(&self) -> &Key {
        match self {
            Self::NotFound { key } | Self::CircularDependency { key } | Self::IncorrectType { key, .. } | Self::Factory { key, .. } => key,
        }
    }
}
