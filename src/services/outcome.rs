use serde::Serialize;

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Fresh data from the remote collaborator
    Remote,
    /// Genuine data served from the cache
    Cache,
    /// Locally built substitute after a failure, fresh or cached
    Fallback,
    /// Input handed back untouched because there was nothing to do
    Unchanged,
}

/// A value that is always usable, annotated with its origin.
///
/// Services never return errors to the player; this lets callers that care
/// tell genuine data from degraded data.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub origin: Origin,
}

impl<T> Resolved<T> {
    pub fn new(value: T, origin: Origin) -> Self {
        Self { value, origin }
    }

    pub fn remote(value: T) -> Self {
        Self::new(value, Origin::Remote)
    }

    pub fn fallback(value: T) -> Self {
        Self::new(value, Origin::Fallback)
    }

    pub fn unchanged(value: T) -> Self {
        Self::new(value, Origin::Unchanged)
    }

    /// Re-tag a stored value as served from the cache; fallbacks stay fallbacks
    pub fn from_cache(self) -> Self {
        let origin = match self.origin {
            Origin::Fallback => Origin::Fallback,
            _ => Origin::Cache,
        };
        Self::new(self.value, origin)
    }

    pub fn is_degraded(&self) -> bool {
        self.origin == Origin::Fallback
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolved<U> {
        Resolved::new(f(self.value), self.origin)
    }
}

impl<T> std::ops::Deref for Resolved<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}
