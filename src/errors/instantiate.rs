use alloc::boxed::Box;

use super::ResolveErrorKind;

/// Error returned by a factory.
///
/// Dependencies read through the context fail with [`ResolveErrorKind`], which converts into
/// [`InstantiateErrorKind::Resolve`] so `?` works inside factories.
/// The container unwraps it and returns the nested error to the caller as is.
#[derive(thiserror::Error, Debug)]
pub enum InstantiateErrorKind {
    #[error(transparent)]
    Resolve(Box<ResolveErrorKind>),
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

impl From<ResolveErrorKind> for InstantiateErrorKind {
    #[inline]
    fn from(err: ResolveErrorKind) -> Self {
        Self::Resolve(Box::new(err))
    }
}
