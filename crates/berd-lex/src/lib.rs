//! berd-lex - Lexical analysis for the berd interpreter.
//!
//! The lexer turns UTF-8 source text into a stream of position-tagged
//! [`Token`]s. Two properties matter more here than in a conventional
//! tokenizer:
//!
//! - **Offsets are load-bearing.** The parser derives operator precedence
//!   from the whitespace *between* tokens, so every token records its exact
//!   byte span and nothing may shift it.
//! - **Repetition carries meaning.** Many operators are runs of one
//!   character whose length selects the operation (`=`/`==`/`===`/`====`
//!   are four different comparisons, `\\\\` is a cube root, `~~` is cosine,
//!   `!!!` is priority three). Runs are collapsed into single tokens with a
//!   count instead of being re-assembled downstream.
//!
//! Lexing is fail-fast: the first unrecognised character aborts with a
//! [`berd_util::Diagnostic`] carrying the byte offset.

pub mod cursor;
pub mod lexer;
pub mod token;

pub use cursor::Cursor;
pub use lexer::{tokenize, Lexer};
pub use token::{Keyword, Token, TokenKind};
