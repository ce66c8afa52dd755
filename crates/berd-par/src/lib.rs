//! berd-par - Parser for the berd interpreter.
//!
//! A recursive-descent parser with two unusual contextual rules layered on
//! top of a Pratt expression core:
//!
//! - **Whitespace-weighted precedence.** The effective precedence of a
//!   binary operator is its table level minus a dominant penalty per space
//!   around it, so `1 + 2*3` groups the multiplication first and
//!   `1+2 * 3` groups the addition first regardless of the table.
//! - **Parentheses are whitespace.** `(` and `)` are skipped wherever an
//!   expression is being read, but their bytes still count toward the
//!   whitespace penalty of neighbouring operators. That is the whole
//!   mechanism by which `(a + b) * c` groups conventionally: the `*` ends
//!   up more spaced-out than the `+`.
//!
//! Statement structure (declarations with priorities and lifetimes,
//! reactive `when` rules, `if`/`idk`/`else`, update statements, classes) is
//! ordinary recursive descent over the token stream. Parsing is fail-fast:
//! the first unexpected token aborts with a diagnostic carrying its span.

pub mod ast;
mod expr;
mod numword;
mod pattern;
mod stmt;

pub use ast::*;
pub use numword::words_to_number;

use berd_util::{Diagnostic, FxHashSet, Result, Span, Symbol};

use berd_lex::{Token, TokenKind};

/// Lexes and parses a complete source string.
///
/// # Example
///
/// ```
/// use berd_par::{parse, StmtKind};
///
/// let program = parse("var var x = 1!  print x!").unwrap();
/// assert_eq!(program.len(), 2);
/// assert!(matches!(program[0].kind, StmtKind::VarDecl { .. }));
/// ```
pub fn parse(source: &str) -> Result<Program> {
    let tokens = berd_lex::tokenize(source)?;
    Parser::with_source(tokens, source).parse_program()
}

/// Statement terminator: a run of `!` (priority) and/or `?` (debug).
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Terminator {
    /// Declaration priority; defaults to 1 when no `!` is present, 0 for
    /// the inverted `¡`.
    pub priority: i32,
    /// Number of `?` marks; non-zero means "print this".
    pub debug: u8,
}

/// The parser state over a lexed token stream.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Original source, used to see line breaks between tokens. Paren-less
    /// argument lists and conditional branches never continue across a
    /// newline.
    source: Option<String>,
    /// Names declared so far, per lexical scope. Consulted by the
    /// number-word literal rule: a declared name never starts a number.
    declared: Vec<FxHashSet<Symbol>>,
    /// Inside a `when` header, `matches`/`where` end the expression instead
    /// of starting a call argument.
    in_when_header: bool,
}

impl Parser {
    /// Creates a parser over `tokens`, which must end with `Eof` (as
    /// produced by [`berd_lex::tokenize`]).
    pub fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(matches!(
            tokens.last().map(|t| &t.kind),
            Some(TokenKind::Eof)
        ));
        Self {
            tokens,
            pos: 0,
            source: None,
            declared: Vec::new(),
            in_when_header: false,
        }
    }

    /// Creates a parser that also knows the source text, enabling the
    /// newline-sensitive continuation rules.
    pub fn with_source(tokens: Vec<Token>, source: &str) -> Self {
        let mut parser = Self::new(tokens);
        parser.source = Some(source.to_owned());
        parser
    }

    /// Parses the whole token stream into a program.
    pub fn parse_program(&mut self) -> Result<Program> {
        self.declared.push(FxHashSet::default());
        let mut stmts = Vec::new();
        while !self.at_end() {
            stmts.push(self.parse_stmt()?);
        }
        self.declared.pop();
        Ok(stmts)
    }

    // =========================================================================
    // TOKEN STREAM PRIMITIVES
    // =========================================================================

    pub(crate) fn kind(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    pub(crate) fn peek_kind(&self, offset: usize) -> &TokenKind {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    pub(crate) fn span(&self) -> Span {
        self.tokens[self.pos].span
    }

    pub(crate) fn at_end(&self) -> bool {
        matches!(self.kind(), TokenKind::Eof)
    }

    /// Consumes and returns the current token. At end of input the `Eof`
    /// token is returned without moving.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if !self.at_end() {
            self.pos += 1;
        }
        token
    }

    /// Consumes the current token if it matches `kind`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes a token of `kind` or fails with a contextual message.
    pub(crate) fn expect(&mut self, kind: &TokenKind, context: &str) -> Result<Token> {
        if self.kind() == kind {
            Ok(self.advance())
        } else {
            Err(self.error(format!(
                "expected {} {}, found {}",
                kind.describe(),
                context,
                self.kind().describe()
            )))
        }
    }

    /// A parse error at the current token.
    pub(crate) fn error(&self, message: impl Into<String>) -> Diagnostic {
        Diagnostic::parse(message, self.span())
    }

    // =========================================================================
    // NAMES
    // =========================================================================

    /// The name carried by a token, treating keywords as plain words.
    pub(crate) fn token_name(kind: &TokenKind) -> Option<Symbol> {
        match kind {
            TokenKind::Ident(sym) => Some(*sym),
            TokenKind::Kw(kw) => Some(Symbol::intern(kw.lexeme())),
            _ => None,
        }
    }

    /// Consumes an identifier-like token (identifier or keyword) as a name.
    pub(crate) fn parse_name(&mut self, what: &str) -> Result<(Symbol, Span)> {
        match Self::token_name(self.kind()) {
            Some(sym) => {
                let span = self.span();
                self.advance();
                Ok((sym, span))
            }
            None => Err(self.error(format!(
                "expected {what}, found {}",
                self.kind().describe()
            ))),
        }
    }

    pub(crate) fn push_declared(&mut self) {
        self.declared.push(FxHashSet::default());
    }

    pub(crate) fn pop_declared(&mut self) {
        self.declared.pop();
    }

    pub(crate) fn declare_name(&mut self, name: Symbol) {
        if let Some(scope) = self.declared.last_mut() {
            scope.insert(name);
        }
    }

    /// Whether `name` is declared in any enclosing parse scope.
    pub(crate) fn is_declared(&self, name: Symbol) -> bool {
        self.declared.iter().any(|scope| scope.contains(&name))
    }

    /// `matches`/`where` act as header terminators inside `when`.
    pub(crate) fn is_stop_word(&self, name: Symbol) -> bool {
        self.in_when_header && (name.as_str() == "matches" || name.as_str() == "where")
    }

    pub(crate) fn with_when_header<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let saved = self.in_when_header;
        self.in_when_header = true;
        let result = f(self);
        self.in_when_header = saved;
        result
    }

    // =========================================================================
    // WHITESPACE MEASUREMENT
    // =========================================================================

    /// End offset of the nearest non-parenthesis token before index `idx`,
    /// or the token's own start when there is none (zero gap).
    pub(crate) fn prev_real_end(&self, idx: usize) -> usize {
        for j in (0..idx).rev() {
            match self.tokens[j].kind {
                TokenKind::LParen | TokenKind::RParen => continue,
                _ => return self.tokens[j].span.end,
            }
        }
        self.tokens[idx].span.start
    }

    /// Start offset of the nearest non-parenthesis token at or after `idx`.
    pub(crate) fn next_real_start(&self, idx: usize) -> usize {
        for j in idx..self.tokens.len() {
            match self.tokens[j].kind {
                TokenKind::LParen | TokenKind::RParen => continue,
                _ => return self.tokens[j].span.start,
            }
        }
        self.tokens[self.tokens.len() - 1].span.start
    }

    /// Total whitespace width around the operator spanning token indices
    /// `first..=last`. Skipped parentheses land inside the measured gaps,
    /// which is exactly how they act as whitespace.
    pub(crate) fn op_whitespace(&self, first: usize, last: usize) -> i32 {
        let left = self.tokens[first].span.start - self.prev_real_end(first);
        let right = self
            .next_real_start(last + 1)
            .saturating_sub(self.tokens[last].span.end);
        (left + right) as i32
    }

    /// Whether the stretch from the previously consumed token to the next
    /// real token at `idx` stays on one line. Without source text (bare
    /// token-stream parsing) everything counts as one line.
    pub(crate) fn same_line_continuation(&self, idx: usize) -> bool {
        let Some(source) = &self.source else {
            return true;
        };
        if idx == 0 {
            return true;
        }
        let from = self.tokens[idx - 1].span.end.min(source.len());
        let to = self.next_real_start(idx).min(source.len()).max(from);
        !source[from..to].contains('\n')
    }

    /// Skips `(` and `)` tokens, which are whitespace in expression
    /// position. A `(` that opens a range literal is left alone.
    pub(crate) fn skip_parens(&mut self) {
        loop {
            match self.kind() {
                TokenKind::RParen => {
                    self.pos += 1;
                }
                TokenKind::LParen if !self.looks_like_range(self.pos) => {
                    self.pos += 1;
                }
                _ => return,
            }
        }
    }

    /// Whether the bracket token at `idx` opens a range literal: a
    /// top-level `..` appears before the bracket nesting closes.
    pub(crate) fn looks_like_range(&self, idx: usize) -> bool {
        if !matches!(
            self.tokens[idx].kind,
            TokenKind::LParen | TokenKind::LBracket | TokenKind::RBracket
        ) {
            return false;
        }
        let mut depth = 0usize;
        for token in &self.tokens[idx + 1..] {
            match token.kind {
                TokenKind::DotDot if depth == 0 => return true,
                TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RParen | TokenKind::RBracket => {
                    if depth == 0 {
                        return false;
                    }
                    depth -= 1;
                }
                TokenKind::LBrace
                | TokenKind::RBrace
                | TokenKind::Bang(_)
                | TokenKind::Question(_)
                | TokenKind::Eof => return false,
                _ => {}
            }
        }
        false
    }

    // =========================================================================
    // TERMINATORS
    // =========================================================================

    /// Parses an optional statement terminator: any mix of `!`, `¡` and `?`
    /// runs. Returns priority 1 and debug 0 when nothing is present.
    pub(crate) fn parse_terminator(&mut self) -> Terminator {
        let mut priority = None;
        let mut debug: u8 = 0;
        loop {
            match self.kind() {
                TokenKind::Bang(n) => {
                    priority = Some(*n as i32);
                    self.advance();
                }
                TokenKind::InvertedBang => {
                    priority = Some(0);
                    self.advance();
                }
                TokenKind::Question(n) => {
                    debug = debug.saturating_add(*n);
                    self.advance();
                }
                _ => break,
            }
        }
        Terminator {
            priority: priority.unwrap_or(1),
            debug,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
