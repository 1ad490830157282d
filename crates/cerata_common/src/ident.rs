//! Interned names for types, nodes, edges and graphs.

use std::fmt;

use lasso::ThreadedRodeo;
use serde::{Deserialize, Serialize};

/// An interned name.
///
/// Every named object in a Cerata graph stores its name as an `Ident`, an index
/// into the [`Interner`] shared by the pool that owns the object. Copying and
/// comparing names is therefore a `u32` operation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Ident(u32);

impl Ident {
    /// Creates an `Ident` from a raw index. Intended for tests.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index of this identifier.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

// SAFETY: an `Ident` is a `u32`, which always fits in `usize` on supported
// targets; `try_from_usize` rejects indices that do not fit back.
unsafe impl lasso::Key for Ident {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(Ident)
    }
}

/// Thread-safe string interner backed by [`lasso::ThreadedRodeo`].
///
/// Interning is append-only, so one interner can be shared (behind an `Arc`)
/// by a pool and every copy made of it.
pub struct Interner {
    rodeo: ThreadedRodeo<Ident>,
}

impl Interner {
    /// Creates an empty interner. The empty string is always interned first.
    pub fn new() -> Self {
        let rodeo = ThreadedRodeo::new();
        rodeo.get_or_intern_static("");
        Self { rodeo }
    }

    /// Interns `s` and returns its identifier.
    pub fn get_or_intern(&self, s: &str) -> Ident {
        self.rodeo.get_or_intern(s)
    }

    /// Returns the identifier of `s` if it has been interned before.
    pub fn get(&self, s: &str) -> Option<Ident> {
        self.rodeo.get(s)
    }

    /// The identifier of the empty string.
    pub fn empty(&self) -> Ident {
        self.rodeo.get_or_intern_static("")
    }

    /// Resolves an identifier back to its string.
    ///
    /// # Panics
    ///
    /// Panics if `ident` was not created by this interner.
    pub fn resolve(&self, ident: Ident) -> &str {
        self.rodeo.resolve(&ident)
    }

    /// Joins `root` and the non-empty `parts` with `sep`.
    ///
    /// An empty root is skipped, so `join("", [a, b], "_")` is `a_b`.
    pub fn join(&self, root: &str, parts: &[Ident], sep: &str) -> String {
        let mut out = String::from(root);
        for part in parts {
            let s = self.resolve(*part);
            if s.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push_str(sep);
            }
            out.push_str(s);
        }
        out
    }

    /// Number of distinct strings interned so far.
    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    /// Returns `true` if nothing besides the empty string was interned.
    pub fn is_empty(&self) -> bool {
        self.rodeo.len() <= 1
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interner")
            .field("len", &self.rodeo.len())
            .finish()
    }
}
