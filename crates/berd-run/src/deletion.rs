//! The deletion set.
//!
//! `delete 3!` does not remove a binding, it outlaws the value: any later
//! expression that evaluates to a strictly equal primitive is an error.
//! Only numbers, strings and boolean states can be deleted.

use berd_util::FxHashSet;

use crate::value::{BoolState, Value, EPSILON_EQ};

#[derive(Default)]
pub struct DeletionSet {
    numbers: Vec<f64>,
    strings: FxHashSet<String>,
    bools: FxHashSet<BoolState>,
}

impl DeletionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a primitive to the set. Returns `false` for non-primitives,
    /// which cannot be deleted.
    pub fn add(&mut self, value: &Value) -> bool {
        match value {
            Value::Number(n) => {
                if !self.numbers.iter().any(|d| (d - n).abs() <= EPSILON_EQ) {
                    self.numbers.push(*n);
                }
                true
            }
            Value::Str(s) => {
                self.strings.insert(s.to_string());
                true
            }
            Value::Bool(state) => {
                self.bools.insert(*state);
                true
            }
            _ => false,
        }
    }

    /// Whether `value` is strictly equal to a deleted primitive.
    pub fn is_deleted(&self, value: &Value) -> bool {
        match value {
            Value::Number(n) => self.numbers.iter().any(|d| (d - n).abs() <= EPSILON_EQ),
            Value::Str(s) => self.strings.contains(s.as_ref() as &str),
            Value::Bool(state) => self.bools.contains(state),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deleted_number() {
        let mut set = DeletionSet::new();
        assert!(set.add(&Value::Number(3.0)));
        assert!(set.is_deleted(&Value::Number(3.0)));
        assert!(set.is_deleted(&Value::Number(3.0 + 1e-12)));
        assert!(!set.is_deleted(&Value::Number(4.0)));
    }

    #[test]
    fn test_deleted_string_and_bool() {
        let mut set = DeletionSet::new();
        set.add(&Value::string("gone"));
        set.add(&Value::Bool(BoolState::Maybe));
        assert!(set.is_deleted(&Value::string("gone")));
        assert!(set.is_deleted(&Value::Bool(BoolState::Maybe)));
        assert!(!set.is_deleted(&Value::Bool(BoolState::True)));
    }

    #[test]
    fn test_non_primitives_not_deletable() {
        let mut set = DeletionSet::new();
        assert!(!set.add(&Value::array_from_vec(vec![])));
        assert!(!set.add(&Value::Undefined));
        assert!(!set.is_deleted(&Value::Undefined));
    }
}
