//! String interning for O(1) identifier equality.
//!
//! Every identifier name flowing through the pipeline — AST `Symbol` nodes,
//! `SymbolDef` names, bundler collision-resolution renames — is interned
//! once. Comparing two names then costs one integer compare regardless of
//! length, which matters most in the scope analyzer's lookup chain and the
//! bundler's root-scope uniqueness check.
//!
//! ```
//! use jsbundle_base::{Interner, Name};
//!
//! let mut interner = Interner::new();
//! let a = interner.intern("exports");
//! let b = interner.intern("exports");
//! let c = interner.intern("require");
//!
//! assert_eq!(a, b);
//! assert_ne!(a, c);
//! assert_eq!(interner.resolve(a), "exports");
//! ```

use std::collections::HashMap;

/// A lightweight handle to an interned identifier name.
///
/// `Name` is `Copy` and compares in O(1) regardless of string length. Use
/// [`Interner::resolve`] to recover the original text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Name(u32);

impl Name {
    /// The empty-string name, always at index 0.
    pub const EMPTY: Name = Name(0);

    /// The interner-relative dense index of this name.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// A string interner providing O(1) equality comparison via [`Name`] handles.
pub struct Interner {
    map: HashMap<String, Name>,
    vec: Vec<String>,
}

impl Interner {
    /// Creates an interner with only the empty string pre-interned.
    pub fn new() -> Self {
        let mut interner = Interner {
            map: HashMap::new(),
            vec: Vec::new(),
        };
        interner.vec.push(String::new());
        interner.map.insert(String::new(), Name::EMPTY);
        interner
    }

    /// Interns a string, returning its handle.
    ///
    /// Returns the existing handle if the string was already interned.
    pub fn intern(&mut self, s: &str) -> Name {
        if let Some(&name) = self.map.get(s) {
            return name;
        }
        let name = Name(self.vec.len() as u32);
        self.vec.push(s.to_string());
        self.map.insert(s.to_string(), name);
        name
    }

    /// Resolves a handle back to its string.
    ///
    /// # Panics
    ///
    /// Panics if `name` was not produced by this interner.
    pub fn resolve(&self, name: Name) -> &str {
        &self.vec[name.0 as usize]
    }

    /// Interns a name that is guaranteed not to collide with any existing
    /// binding in `taken`, prefixed by `base` and suffixed by `suffix`.
    ///
    /// Used by the bundler's collision-resolution step (`MakeUniqueName`):
    /// tries `base`, then `base_suffix`, then `base_suffix2`, ... until a
    /// name outside `taken` is found.
    pub fn intern_unique(
        &mut self,
        base: &str,
        suffix: &str,
        taken: impl Fn(Name) -> bool,
    ) -> Name {
        let candidate = self.intern(base);
        if !taken(candidate) {
            return candidate;
        }
        let mut n = 1u32;
        loop {
            let text = if n == 1 {
                format!("{base}{suffix}")
            } else {
                format!("{base}{suffix}{n}")
            };
            let candidate = self.intern(&text);
            if !taken(candidate) {
                return candidate;
            }
            n += 1;
        }
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
    fn interning_same_string_twice_yields_same_name() {
        let mut interner = Interner::new();
        let a = interner.intern("x");
        let b = interner.intern("x");
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_strings_get_distinct_names() {
        let mut interner = Interner::new();
        let a = interner.intern("x");
        let b = interner.intern("y");
        assert_ne!(a, b);
    }

    #[test]
    fn resolve_recovers_original_text() {
        let mut interner = Interner::new();
        let name = interner.intern("hello");
        assert_eq!(interner.resolve(name), "hello");
    }

    #[test]
    fn intern_unique_avoids_collisions() {
        let mut interner = Interner::new();
        let taken_name = interner.intern("x");
        let unique = interner.intern_unique("x", "_a", |n| n == taken_name);
        assert_ne!(unique, taken_name);
        assert_eq!(interner.resolve(unique), "x_a");
    }

    #[test]
    fn intern_unique_walks_past_multiple_collisions() {
        let mut interner = Interner::new();
        let x = interner.intern("x");
        let x_a = interner.intern("x_a");
        let unique = interner.intern_unique("x", "_a", |n| n == x || n == x_a);
        assert_eq!(interner.resolve(unique), "x_a2");
    }
}
