//! The `const const const` store.
//!
//! A flat, global, scope-independent name table. The store itself happily
//! overwrites; the write-once contract ("cannot be redeclared, cannot be
//! assigned") is enforced by the evaluator, which checks membership before
//! any declaration or assignment touches a name.

use berd_util::{FxHashMap, Symbol};

use crate::value::Value;

#[derive(Default)]
pub struct ConstStore {
    values: FxHashMap<Symbol, Value>,
}

impl ConstStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `name`, replacing any previous definition.
    pub fn define(&mut self, name: Symbol, value: Value) {
        self.values.insert(name, value);
    }

    pub fn try_get(&self, name: Symbol) -> Option<&Value> {
        self.values.get(&name)
    }

    pub fn contains(&self, name: Symbol) -> bool {
        self.values.contains_key(&name)
    }
}
