//! berd-util - Foundation types for the berd interpreter.
//!
//! This crate provides the pieces every other phase depends on:
//!
//! - [`Span`] and [`SourceMap`] for source location tracking. Tokens carry
//!   byte-offset spans; the parser measures inter-token whitespace from
//!   them, and the driver translates offsets to line/column for rendering.
//! - [`Symbol`], an interned string handle. Identifier-heavy structures
//!   (scopes, function tables, class registries, dependency sets) key by
//!   `Symbol` so name comparison is an integer comparison.
//! - [`Diagnostic`] and [`ErrorKind`], the single language-error type. All
//!   fallible core APIs return [`Result`].

pub mod diagnostic;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, ErrorKind, Result};
pub use span::{SourceMap, Span};
pub use symbol::Symbol;

// Re-export commonly used collections
pub use rustc_hash::FxHashMap;
pub use rustc_hash::FxHashSet;
