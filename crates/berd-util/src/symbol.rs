//! String interning.
//!
//! Identifiers appear everywhere in an interpreter: scope maps, function
//! tables, class registries, reactive dependency sets. Interning collapses
//! each distinct name to a 4-byte [`Symbol`] so equality and hashing are
//! integer operations, and the same name always produces the same handle.
//!
//! The table is global, thread-safe, and leak-on-purpose: interned strings
//! are boxed and leaked to obtain `'static` references. The set of unique
//! names in any program is bounded, names are small, and never freeing them
//! removes all lifetime bookkeeping from the hot path.

use std::fmt;
use std::sync::{LazyLock, RwLock};

use dashmap::DashMap;

/// Global string table, initialized on first use.
static TABLE: LazyLock<StringTable> = LazyLock::new(StringTable::new);

/// An interned string handle.
///
/// Two `Symbol`s are equal if and only if they were interned from equal
/// strings.
///
/// # Examples
///
/// ```
/// use berd_util::Symbol;
///
/// let a = Symbol::intern("lifetime");
/// let b = Symbol::intern("lifetime");
/// let c = Symbol::intern("priority");
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// assert_eq!(a.as_str(), "lifetime");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// Interns a string, returning its stable handle.
    pub fn intern(string: &str) -> Self {
        TABLE.intern(string)
    }

    /// Returns the string this symbol was interned from.
    pub fn as_str(self) -> &'static str {
        TABLE.get(self)
    }

    /// Raw table index, for debugging.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::intern(s)
    }
}

/// Thread-safe interner storage.
///
/// `map` answers "is this string already interned?" without locking the
/// whole table; `strings` answers the reverse lookup by index. Both hold
/// leaked `'static` references to the same allocations.
struct StringTable {
    map: DashMap<&'static str, u32, ahash::RandomState>,
    strings: RwLock<Vec<&'static str>>,
}

impl StringTable {
    fn new() -> Self {
        Self {
            map: DashMap::with_capacity_and_hasher(256, ahash::RandomState::new()),
            strings: RwLock::new(Vec::with_capacity(256)),
        }
    }

    fn intern(&self, string: &str) -> Symbol {
        if let Some(index) = self.map.get(string) {
            return Symbol(*index);
        }

        let mut strings = self.strings.write().expect("interner lock poisoned");
        // A racing thread may have inserted the same string between the
        // lookup above and taking the write lock.
        if let Some(index) = self.map.get(string) {
            return Symbol(*index);
        }
        let leaked: &'static str = Box::leak(string.to_owned().into_boxed_str());
        let index = strings.len() as u32;
        strings.push(leaked);
        self.map.insert(leaked, index);
        Symbol(index)
    }

    fn get(&self, symbol: Symbol) -> &'static str {
        let strings = self.strings.read().expect("interner lock poisoned");
        strings[symbol.0 as usize]
    }
}
