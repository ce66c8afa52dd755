//! Internal control-flow signals.
//!
//! `return`, `break`, `continue` and `try again` are not errors: they are
//! values that propagate up through statement evaluation until a construct
//! that understands them catches them. A signal escaping its legal
//! boundary becomes a Context diagnostic at that boundary.

use crate::value::Value;

/// The outcome of evaluating a statement or statement list.
#[derive(Clone, Debug)]
pub enum Flow {
    /// Execution proceeds normally.
    Normal,
    /// A `return` travelling up to the active call frame.
    Return(Value),
    /// A `break` travelling up to the innermost loop.
    Break,
    /// A `continue` travelling up to the innermost loop.
    Continue,
    /// A `try again` travelling up to the innermost `if`.
    TryAgain,
}

impl Flow {
    pub fn is_normal(&self) -> bool {
        matches!(self, Flow::Normal)
    }
}
