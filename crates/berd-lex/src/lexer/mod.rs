//! The lexer core: dispatch, whitespace and comment handling.
//!
//! Specialised scanning lives in the sibling modules:
//! [`identifier`](self::identifier) for names and keywords,
//! [`number`](self::number) for numeric literals,
//! [`operator`](self::operator) for punctuation and counted runs, and
//! [`string`](self::string) for flexible-quote string literals.

mod identifier;
mod number;
mod operator;
mod string;

use berd_util::{Diagnostic, Result, Span};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

pub use identifier::{is_ident_continue, is_ident_start};

/// Lexes a whole source string into tokens, ending with [`TokenKind::Eof`].
///
/// Fails on the first unrecognised character.
///
/// # Example
///
/// ```
/// use berd_lex::{tokenize, TokenKind};
///
/// let tokens = tokenize("var var x = 1!").unwrap();
/// assert!(matches!(tokens.last().unwrap().kind, TokenKind::Eof));
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

/// Lexer for berd source code.
pub struct Lexer<'a> {
    /// Character cursor for source traversal.
    pub(crate) cursor: Cursor<'a>,
    /// Starting byte offset of the token being scanned.
    pub(crate) token_start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer over `source`.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            token_start: 0,
        }
    }

    /// Returns the next token.
    ///
    /// Skips whitespace and comments, records the token start offset, then
    /// dispatches on the first character. Returns [`TokenKind::Eof`]
    /// indefinitely once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments();

        self.token_start = self.cursor.position();

        if self.cursor.is_at_end() {
            return Ok(self.token(TokenKind::Eof));
        }

        let c = self.cursor.current_char();
        match c {
            '(' => Ok(self.single(TokenKind::LParen)),
            ')' => Ok(self.single(TokenKind::RParen)),
            '[' => Ok(self.single(TokenKind::LBracket)),
            ']' => Ok(self.single(TokenKind::RBracket)),
            '{' => Ok(self.single(TokenKind::LBrace)),
            '}' => Ok(self.single(TokenKind::RBrace)),
            ',' => Ok(self.single(TokenKind::Comma)),
            '¡' => Ok(self.single(TokenKind::InvertedBang)),
            ';' => Ok(self.single(TokenKind::Semi)),
            '"' | '\'' => self.lex_string(),
            c if c.is_ascii_digit() => self.lex_number(),
            '.' if self.cursor.peek_next().is_ascii_digit() => self.lex_number(),
            '@' if is_ident_continue(self.cursor.peek_next()) => Ok(self.lex_identifier()),
            '@' => Ok(self.single(TokenKind::At)),
            c if is_ident_start(c) => Ok(self.lex_identifier()),
            _ => self.lex_operator(),
        }
    }

    /// Skips whitespace and `//` line comments.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            self.cursor.advance_while(char::is_whitespace);
            if self.cursor.current_char() == '/' && self.cursor.peek_next() == '/' {
                self.cursor.advance_while(|c| c != '\n');
            } else {
                return;
            }
        }
    }

    /// Consumes one character and wraps `kind` with the current span.
    fn single(&mut self, kind: TokenKind) -> Token {
        self.cursor.advance();
        self.token(kind)
    }

    /// Wraps `kind` in a token spanning from `token_start` to the cursor.
    pub(crate) fn token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.span())
    }

    /// Span of the token currently being scanned.
    pub(crate) fn span(&self) -> Span {
        Span::new(self.token_start, self.cursor.position())
    }

    /// Builds a fatal lex error at the current token.
    pub(crate) fn error(&self, message: impl Into<String>) -> Diagnostic {
        Diagnostic::lex(message, self.span())
    }
}

// =============================================================================
// TESTS
// =============================================================================
