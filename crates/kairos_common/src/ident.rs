//! Interned identifiers for component, signal, and unit names.

use lasso::ThreadedRodeo;
use serde::{Deserialize, Serialize};

/// An interned name for any entity in a circuit description.
///
/// Identifiers are `u32` keys into an [`Interner`], giving O(1) equality and
/// O(1) copying. They are resolved back to strings only for diagnostics and
/// hierarchical path rendering.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Ident(u32);

impl Ident {
    /// Creates an `Ident` from a raw key, primarily for deserialization and
    /// tests. In normal use identifiers come from [`Interner::intern`].
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` key.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

// SAFETY: `Ident` wraps a `u32`, which always fits in `usize` on supported
// platforms; `try_from_usize` rejects indices that do not fit in `u32`.
unsafe impl lasso::Key for Ident {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(Ident)
    }
}

/// Thread-safe string interner for entity names.
pub struct Interner {
    rodeo: ThreadedRodeo<Ident>,
}

impl Interner {
    /// Creates an empty interner.
    pub fn new() -> Self {
        Self {
            rodeo: ThreadedRodeo::new(),
        }
    }

    /// Interns a string, returning its [`Ident`]. Interning the same string
    /// twice returns the same identifier.
    pub fn intern(&self, s: &str) -> Ident {
        self.rodeo.get_or_intern(s)
    }

    /// Resolves an [`Ident`] back to its string.
    ///
    /// # Panics
    ///
    /// Panics if the identifier was not produced by this interner.
    pub fn resolve(&self, ident: Ident) -> &str {
        self.rodeo.resolve(&ident)
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_is_stable() {
        let i = Interner::new();
        let a = i.intern("clk");
        let b = i.intern("clk");
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_strings_distinct_idents() {
        let i = Interner::new();
        assert_ne!(i.intern("a"), i.intern("b"));
    }

    #[test]
    fn resolve_roundtrip() {
        let i = Interner::new();
        let id = i.intern("counter");
        assert_eq!(i.resolve(id), "counter");
    }

    #[test]
    fn raw_roundtrip() {
        let id = Ident::from_raw(7);
        assert_eq!(id.as_raw(), 7);
    }

    #[test]
    fn default_is_empty_interner() {
        let i = Interner::default();
        let id = i.intern("x");
        assert_eq!(i.resolve(id), "x");
    }
}
