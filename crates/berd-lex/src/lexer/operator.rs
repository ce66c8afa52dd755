//! Operator and punctuation lexing.
//!
//! This is where character runs collapse into counted tokens. The run
//! length is semantic: `=` through `====` are four different equality
//! tiers, a `\` run encodes a root degree, a `~` run selects a trig
//! function, and `!`/`?`/`:` runs feed statement terminators and the
//! conditional expression.

use berd_util::Result;

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes an operator starting at the current character.
    ///
    /// The caller has already ruled out grouping punctuation, literals and
    /// identifiers; anything unmatched here is a fatal lex error.
    pub(crate) fn lex_operator(&mut self) -> Result<Token> {
        let c = self.cursor.current_char();
        let kind = match c {
            '+' => {
                self.cursor.advance();
                if self.cursor.eat('+') {
                    TokenKind::PlusPlus
                } else {
                    TokenKind::Plus
                }
            }
            '-' => {
                self.cursor.advance();
                if self.cursor.eat('-') {
                    TokenKind::MinusMinus
                } else {
                    TokenKind::Minus
                }
            }
            '*' => match self.run('*') {
                1 => TokenKind::Star,
                n => TokenKind::StarRun(n),
            },
            '/' => {
                self.cursor.advance();
                TokenKind::Slash
            }
            '%' => {
                self.cursor.advance();
                TokenKind::Percent
            }
            '&' => {
                self.cursor.advance();
                TokenKind::Amp
            }
            '^' => {
                self.cursor.advance();
                TokenKind::Caret
            }
            '|' => {
                self.cursor.advance();
                if self.cursor.eat('|') {
                    TokenKind::PipePipe
                } else {
                    TokenKind::Pipe
                }
            }
            '<' => {
                self.cursor.advance();
                if self.cursor.eat('=') {
                    TokenKind::LtEq
                } else if self.cursor.eat('<') {
                    TokenKind::Shl
                } else if self.cursor.eat('>') {
                    TokenKind::MinOp
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                self.cursor.advance();
                if self.cursor.eat('=') {
                    TokenKind::GtEq
                } else if self.cursor.eat('>') {
                    TokenKind::Shr
                } else if self.cursor.eat('<') {
                    TokenKind::MaxOp
                } else {
                    TokenKind::Gt
                }
            }
            '=' => match self.run('=') {
                1 if self.cursor.eat('>') => TokenKind::FatArrow,
                1 => TokenKind::Assign,
                2 => TokenKind::EqEq,
                3 => TokenKind::EqEqEq,
                4 => TokenKind::EqEqEqEq,
                _ => return Err(self.error("too many '=' in a row")),
            },
            '\\' => TokenKind::RootRun(self.run('\\')),
            '~' => TokenKind::TildeRun(self.run('~')),
            '!' => TokenKind::Bang(self.run('!')),
            '?' => TokenKind::Question(self.run('?')),
            ':' => TokenKind::Colon(self.run(':')),
            '.' => {
                self.cursor.advance();
                if self.cursor.eat('.') {
                    if self.cursor.eat('.') {
                        TokenKind::DotDotDot
                    } else {
                        TokenKind::DotDot
                    }
                } else {
                    return Err(self.error("unexpected character '.'"));
                }
            }
            '⌊' => {
                self.cursor.advance();
                if self.cursor.eat('⌋') {
                    TokenKind::MinOp
                } else {
                    return Err(self.error("expected '⌋' after '⌊'"));
                }
            }
            '⌈' => {
                self.cursor.advance();
                if self.cursor.eat('⌉') {
                    TokenKind::MaxOp
                } else {
                    return Err(self.error("expected '⌉' after '⌈'"));
                }
            }
            '▷' => {
                self.cursor.advance();
                TokenKind::ClampOp
            }
            '↻' => {
                self.cursor.advance();
                TokenKind::WrapOp
            }
            _ => {
                self.cursor.advance();
                return Err(self.error(format!("unexpected character '{c}'")));
            }
        };
        Ok(self.token(kind))
    }

    /// Consumes a run of `c`, saturating the count at `u8::MAX`.
    fn run(&mut self, c: char) -> u8 {
        self.cursor.eat_run(c).min(u8::MAX as usize) as u8
    }
}
