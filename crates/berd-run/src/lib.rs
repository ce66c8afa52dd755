//! berd-run - The tree-walking runtime for the berd interpreter.
//!
//! Executes a parsed program with the full runtime state the language
//! demands: a scoped variable store with per-name priorities, bounded
//! value histories and expiring lifetimes, a global write-once const
//! store, singleton class instances with per-field histories, reactive
//! `when` subscriptions driven by a FIFO mutation queue, a deletion set
//! over primitive values, and a bidirectional statement loop whose
//! direction `reverse!`/`forward!` flip per statement list.
//!
//! Everything is owned by one [`Interp`] value; there is no global state
//! beyond the string interner. Output from `print` goes to the writer the
//! interpreter is constructed with.

pub mod builtins;
pub mod classes;
pub mod consts;
pub mod deletion;
pub mod flow;
pub mod interp;
pub mod store;
pub mod value;
pub mod when;

pub use flow::Flow;
pub use interp::Interp;
pub use store::{History, Lifetime, Mutability, VariableStore, HISTORY_CAP};
pub use value::{BoolState, NumKey, Value};

use std::io::Write;

/// Parses and executes `source`, writing program output to `out`.
///
/// Returns the writer (with whatever was printed before any failure) and
/// the run result.
///
/// # Example
///
/// ```
/// let (out, result) = berd_run::run_source("print \"hi\"!", Vec::new());
/// assert!(result.is_ok());
/// assert_eq!(String::from_utf8(out).unwrap(), "hi\n");
/// ```
pub fn run_source<W: Write>(source: &str, out: W) -> (W, berd_util::Result<()>) {
    let program = match berd_par::parse(source) {
        Ok(program) => program,
        Err(e) => return (out, Err(e)),
    };
    let mut interp = Interp::new(out);
    let result = interp.run(&program);
    (interp.into_output(), result)
}
