/// Config for a factory
/// ## Fields
/// - `cache_provides`:
///   If `true`, the value produced by the factory is cached under its key and returned by every later resolve.
///   If `false`, the factory runs on every resolve and nothing is cached.
///
///   This does **not** affect the dependencies the factory reads from the context,
///   each of them follows the config it was registered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub cache_provides: bool,
}

impl Config {
    /// Config of a factory that is invoked on every resolve
    #[inline]
    #[must_use]
    pub const fn transient() -> Self {
        Self { cache_provides: false }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self { cache_provides: true }
    }
}
