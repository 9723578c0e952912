use indexmap::IndexSet;
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Mutex;

/// An interned identifier.
///
/// Identifiers are interned into a global table rather than carried around as
/// owned `String`s on every AST node: two `Variable` nodes that spell the same
/// name compare and hash in O(1), and an environment frame keyed by `Symbol`
/// avoids re-hashing the full string on every lookup.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

static INTERNER: Lazy<Mutex<IndexSet<String>>> = Lazy::new(|| Mutex::new(IndexSet::new()));

impl Symbol {
    /// Interns `name`, returning the `Symbol` for it (allocating a fresh slot
    /// only the first time a given spelling is seen).
    pub fn intern(name: &str) -> Self {
        let mut table = INTERNER.lock().unwrap();
        if let Some(index) = table.get_index_of(name) {
            return Self(index as u32);
        }
        let (index, _) = table.insert_full(name.to_owned());
        Self(index as u32)
    }

    /// Returns the interned string.
    pub fn as_str(&self) -> String {
        let table = INTERNER.lock().unwrap();
        table.get_index(self.0 as usize).cloned().unwrap_or_default()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Symbol::intern(value)
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Symbol::intern(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_dedups() {
        let a = Symbol::intern("foo");
        let b = Symbol::intern("foo");
        let c = Symbol::intern("bar");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str(), "foo");
    }
}
