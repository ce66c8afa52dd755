//! The variable store: scoped names with priorities, histories and
//! lifetimes.
//!
//! Each scope maps a name to a stack of entries ordered by declaration
//! time; the top of the stack is the live binding. A re-declaration with
//! lower priority than the current top is silently dropped, while an
//! equal-or-higher one shadows it. The shadowed entry is retained so that
//! lifetime expiry of the winner falls back to a still-live older binding.

use std::time::Instant;

use berd_util::{FxHashMap, Symbol};

use crate::value::Value;

/// Maximum number of values a history retains.
pub const HISTORY_CAP: usize = 100;

/// Binding mutability from the declaration's two keywords. The first word
/// governs reassignment of the binding, the second mutation of the value's
/// contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutability {
    ConstConst,
    ConstVar,
    VarConst,
    VarVar,
}

impl Mutability {
    /// Whether `name = value` may rebind.
    pub fn reassignable(&self) -> bool {
        matches!(self, Mutability::VarConst | Mutability::VarVar)
    }

    /// Whether the value's contents (array entries) may be edited.
    pub fn contents_mutable(&self) -> bool {
        matches!(self, Mutability::ConstVar | Mutability::VarVar)
    }
}

/// Expiry attached to a declaration.
#[derive(Clone, Copy, Debug)]
pub enum Lifetime {
    /// Expires after covering `count` statements of the declaring list.
    Lines { count: u32, declared_at: usize },
    /// Expires `duration` seconds after creation.
    Seconds { duration: f64, created: Instant },
    /// Never expires (explicit `<Infinity>`).
    Infinity,
}

impl Lifetime {
    fn expired(&self, current_statement: usize, now: Instant) -> bool {
        match self {
            Lifetime::Lines { count, declared_at } => {
                current_statement > declared_at + (*count as usize).saturating_sub(1)
            }
            Lifetime::Seconds { duration, created } => {
                now.duration_since(*created).as_secs_f64() >= *duration
            }
            Lifetime::Infinity => false,
        }
    }
}

/// A bounded value history with a cursor.
///
/// The cursor always indexes a valid position while the history is
/// non-empty; recording a value truncates any forward entries past the
/// cursor, then appends and trims to [`HISTORY_CAP`] from the oldest end.
#[derive(Clone, Debug, Default)]
pub struct History {
    values: Vec<Value>,
    cursor: usize,
}

impl History {
    pub fn seeded(initial: Value) -> Self {
        Self {
            values: vec![initial],
            cursor: 0,
        }
    }

    /// Appends `value` unless it is strictly equal to the value at the
    /// cursor.
    pub fn record(&mut self, value: &Value) {
        if let Some(current) = self.values.get(self.cursor) {
            if current.strict_eq(value) {
                return;
            }
        }
        self.values.truncate(self.cursor + 1);
        self.values.push(value.clone());
        if self.values.len() > HISTORY_CAP {
            let excess = self.values.len() - HISTORY_CAP;
            self.values.drain(..excess);
        }
        self.cursor = self.values.len() - 1;
    }

    /// Moves the cursor back one step. Returns the value there, or `None`
    /// at the oldest end.
    pub fn step_back(&mut self) -> Option<Value> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.values[self.cursor].clone())
    }

    /// Moves the cursor forward one step. Returns the value there, or
    /// `None` at the newest end.
    pub fn step_forward(&mut self) -> Option<Value> {
        if self.cursor + 1 >= self.values.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.values[self.cursor].clone())
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

/// One declared binding.
#[derive(Clone, Debug)]
pub struct VariableEntry {
    pub value: Value,
    pub mutability: Mutability,
    pub priority: i32,
    pub lifetime: Option<Lifetime>,
    history: History,
}

impl VariableEntry {
    pub fn new(
        value: Value,
        mutability: Mutability,
        priority: i32,
        lifetime: Option<Lifetime>,
    ) -> Self {
        let history = History::seeded(value.clone());
        Self {
            value,
            mutability,
            priority,
            lifetime,
            history,
        }
    }

    /// Replaces the current value and records it in the history.
    pub fn set_value(&mut self, value: Value) {
        self.history.record(&value);
        self.value = value;
    }

    /// Moves back one history step; returns whether the value changed.
    pub fn step_back(&mut self) -> bool {
        match self.history.step_back() {
            Some(value) => {
                self.value = value;
                true
            }
            None => false,
        }
    }

    /// Moves forward one history step; returns whether the value changed.
    pub fn step_forward(&mut self) -> bool {
        match self.history.step_forward() {
            Some(value) => {
                self.value = value;
                true
            }
            None => false,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }
}

/// Why an assignment was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    NotFound,
    NotAssignable,
    ContentsImmutable,
}

/// The scoped variable dictionary.
pub struct VariableStore {
    scopes: Vec<FxHashMap<Symbol, Vec<VariableEntry>>>,
}

impl Default for VariableStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableStore {
    pub fn new() -> Self {
        Self {
            scopes: vec![FxHashMap::default()],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    /// Pops the innermost scope. The global scope is never popped.
    pub fn pop_scope(&mut self) {
        debug_assert!(self.scopes.len() > 1, "attempted to pop the global scope");
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Declares into the innermost scope. A lower-priority re-declaration
    /// of an existing name is silently dropped; otherwise the new entry
    /// shadows the old one, which stays behind for lifetime fallback.
    pub fn declare(
        &mut self,
        name: Symbol,
        mutability: Mutability,
        value: Value,
        priority: i32,
        lifetime: Option<Lifetime>,
    ) {
        let scope = self.scopes.last_mut().expect("scope stack is never empty");
        let stack = scope.entry(name).or_default();
        if let Some(top) = stack.last() {
            if top.priority > priority {
                return;
            }
        }
        stack.push(VariableEntry::new(value, mutability, priority, lifetime));
    }

    /// Rebinds `name`, innermost scope outwards.
    pub fn assign(&mut self, name: Symbol, value: Value) -> Result<(), AssignError> {
        match self.entry_mut(name) {
            Some(entry) => {
                if !entry.mutability.reassignable() {
                    return Err(AssignError::NotAssignable);
                }
                entry.set_value(value);
                Ok(())
            }
            None => Err(AssignError::NotFound),
        }
    }

    /// Replaces the value of `name` as a contents edit (index assignment),
    /// which is governed by the second declaration keyword.
    pub fn mutate_contents(&mut self, name: Symbol, value: Value) -> Result<(), AssignError> {
        match self.entry_mut(name) {
            Some(entry) => {
                if !entry.mutability.contents_mutable() {
                    return Err(AssignError::ContentsImmutable);
                }
                entry.set_value(value);
                Ok(())
            }
            None => Err(AssignError::NotFound),
        }
    }

    pub fn get(&self, name: Symbol) -> Option<&Value> {
        self.entry(name).map(|entry| &entry.value)
    }

    pub fn entry(&self, name: Symbol) -> Option<&VariableEntry> {
        for scope in self.scopes.iter().rev() {
            if let Some(entry) = scope.get(&name).and_then(|stack| stack.last()) {
                return Some(entry);
            }
        }
        None
    }

    pub fn entry_mut(&mut self, name: Symbol) -> Option<&mut VariableEntry> {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(entry) = scope.get_mut(&name).and_then(|stack| stack.last_mut()) {
                return Some(entry);
            }
        }
        None
    }

    /// Removes `name` from the innermost scope holding it.
    pub fn delete(&mut self, name: Symbol) -> bool {
        for scope in self.scopes.iter_mut().rev() {
            if scope.remove(&name).is_some() {
                return true;
            }
        }
        false
    }

    /// Drops every entry whose lifetime has run out, exposing shadowed
    /// older entries where present.
    pub fn expire_lifetimes(&mut self, current_statement: usize, now: Instant) {
        for scope in &mut self.scopes {
            scope.retain(|_, stack| {
                stack.retain(|entry| match &entry.lifetime {
                    Some(lifetime) => !lifetime.expired(current_statement, now),
                    None => true,
                });
                !stack.is_empty()
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str) -> Symbol {
        Symbol::intern(name)
    }

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    #[test]
    fn test_declare_get_assign() {
        let mut store = VariableStore::new();
        store.declare(sym("x"), Mutability::VarVar, num(1.0), 1, None);
        assert!(store.get(sym("x")).unwrap().strict_eq(&num(1.0)));
        store.assign(sym("x"), num(2.0)).unwrap();
        assert!(store.get(sym("x")).unwrap().strict_eq(&num(2.0)));
    }

    #[test]
    fn test_assign_errors() {
        let mut store = VariableStore::new();
        assert_eq!(
            store.assign(sym("ghost"), num(1.0)),
            Err(AssignError::NotFound)
        );
        store.declare(sym("c"), Mutability::ConstConst, num(1.0), 1, None);
        assert_eq!(
            store.assign(sym("c"), num(2.0)),
            Err(AssignError::NotAssignable)
        );
        assert_eq!(
            store.mutate_contents(sym("c"), num(2.0)),
            Err(AssignError::ContentsImmutable)
        );
    }

    #[test]
    fn test_const_var_contents() {
        let mut store = VariableStore::new();
        store.declare(sym("xs"), Mutability::ConstVar, num(1.0), 1, None);
        assert_eq!(
            store.assign(sym("xs"), num(2.0)),
            Err(AssignError::NotAssignable)
        );
        assert_eq!(store.mutate_contents(sym("xs"), num(2.0)), Ok(()));
    }

    #[test]
    fn test_scope_shadowing_and_pop() {
        let mut store = VariableStore::new();
        store.declare(sym("x"), Mutability::VarVar, num(1.0), 1, None);
        store.push_scope();
        store.declare(sym("x"), Mutability::VarVar, num(2.0), 1, None);
        assert!(store.get(sym("x")).unwrap().strict_eq(&num(2.0)));
        store.pop_scope();
        assert!(store.get(sym("x")).unwrap().strict_eq(&num(1.0)));
    }

    #[test]
    fn test_priority_rules() {
        let mut store = VariableStore::new();
        store.declare(sym("x"), Mutability::VarVar, num(1.0), 3, None);
        // Lower priority is silently ignored.
        store.declare(sym("x"), Mutability::VarVar, num(2.0), 1, None);
        assert!(store.get(sym("x")).unwrap().strict_eq(&num(1.0)));
        // Equal priority shadows.
        store.declare(sym("x"), Mutability::VarVar, num(3.0), 3, None);
        assert!(store.get(sym("x")).unwrap().strict_eq(&num(3.0)));
    }

    #[test]
    fn test_lifetime_fallback_to_shadowed_entry() {
        let mut store = VariableStore::new();
        store.declare(sym("x"), Mutability::VarVar, num(1.0), 1, None);
        store.declare(
            sym("x"),
            Mutability::VarVar,
            num(2.0),
            2,
            Some(Lifetime::Lines {
                count: 1,
                declared_at: 0,
            }),
        );
        assert!(store.get(sym("x")).unwrap().strict_eq(&num(2.0)));
        store.expire_lifetimes(1, Instant::now());
        // The winner expired; the shadowed declaration is live again.
        assert!(store.get(sym("x")).unwrap().strict_eq(&num(1.0)));
    }

    #[test]
    fn test_lines_lifetime_window() {
        let lifetime = Lifetime::Lines {
            count: 2,
            declared_at: 3,
        };
        assert!(!lifetime.expired(3, Instant::now()));
        assert!(!lifetime.expired(4, Instant::now()));
        assert!(lifetime.expired(5, Instant::now()));
    }

    #[test]
    fn test_seconds_lifetime() {
        let created = Instant::now();
        let spent = Lifetime::Seconds {
            duration: 0.0,
            created,
        };
        assert!(spent.expired(0, Instant::now()));
        let fresh = Lifetime::Seconds {
            duration: 5.0,
            created,
        };
        assert!(!fresh.expired(0, Instant::now()));
    }

    #[test]
    fn test_history_round_trip() {
        let mut store = VariableStore::new();
        store.declare(sym("x"), Mutability::VarVar, num(1.0), 1, None);
        store.assign(sym("x"), num(2.0)).unwrap();
        store.assign(sym("x"), num(3.0)).unwrap();
        let entry = store.entry(sym("x")).unwrap();
        let recorded: Vec<f64> = entry
            .history()
            .values()
            .iter()
            .map(|v| v.to_number())
            .collect();
        assert_eq!(recorded, vec![1.0, 2.0, 3.0]);
        assert_eq!(entry.history().cursor(), 2);
    }

    #[test]
    fn test_history_previous_next_idempotence() {
        let mut store = VariableStore::new();
        store.declare(sym("x"), Mutability::VarVar, num(1.0), 1, None);
        store.assign(sym("x"), num(2.0)).unwrap();
        let entry = store.entry_mut(sym("x")).unwrap();
        assert!(entry.step_back());
        assert!(entry.value.strict_eq(&num(1.0)));
        assert!(entry.step_forward());
        assert!(entry.value.strict_eq(&num(2.0)));
        // At the newest end, forward is a no-op.
        assert!(!entry.step_forward());
    }

    #[test]
    fn test_history_no_op_on_equal_value() {
        let mut history = History::seeded(num(1.0));
        history.record(&num(1.0));
        assert_eq!(history.values().len(), 1);
    }

    #[test]
    fn test_history_truncates_forward_entries() {
        let mut history = History::seeded(num(1.0));
        history.record(&num(2.0));
        history.record(&num(3.0));
        history.step_back();
        history.record(&num(9.0));
        let values: Vec<f64> = history.values().iter().map(|v| v.to_number()).collect();
        assert_eq!(values, vec![1.0, 2.0, 9.0]);
        assert_eq!(history.cursor(), 2);
    }

    #[test]
    fn test_history_cap() {
        let mut history = History::seeded(num(0.0));
        for i in 1..=150 {
            history.record(&num(i as f64));
        }
        assert_eq!(history.values().len(), HISTORY_CAP);
        assert_eq!(history.values()[0].to_number(), 51.0);
        assert_eq!(history.cursor(), HISTORY_CAP - 1);
    }

    #[test]
    fn test_delete() {
        let mut store = VariableStore::new();
        store.declare(sym("x"), Mutability::VarVar, num(1.0), 1, None);
        assert!(store.delete(sym("x")));
        assert!(store.get(sym("x")).is_none());
        assert!(!store.delete(sym("x")));
    }
}
