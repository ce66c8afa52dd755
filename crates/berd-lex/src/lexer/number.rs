//! Numeric literal lexing.
//!
//! Decimal literals with an optional fractional part. The dot is only
//! consumed when a digit follows, so `1..5` lexes as `1`, `..`, `5`.

use berd_util::Result;

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a number starting at the current character.
    pub(crate) fn lex_number(&mut self) -> Result<Token> {
        self.cursor.advance_while(|c| c.is_ascii_digit());

        if self.cursor.current_char() == '.' && self.cursor.peek_next().is_ascii_digit() {
            self.cursor.advance();
            self.cursor.advance_while(|c| c.is_ascii_digit());
        }

        let text = self
            .cursor
            .slice(self.token_start, self.cursor.position());
        match text.parse::<f64>() {
            Ok(value) => Ok(self.token(TokenKind::Number(value))),
            Err(_) => Err(self.error(format!("invalid numeric literal '{text}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{tokenize, TokenKind};

    fn first(source: &str) -> TokenKind {
        tokenize(source).unwrap().remove(0).kind
    }

    #[test]
    fn test_integer() {
        assert_eq!(first("42"), TokenKind::Number(42.0));
    }

    #[test]
    fn test_fraction() {
        assert_eq!(first("3.25"), TokenKind::Number(3.25));
    }

    #[test]
    fn test_leading_dot() {
        assert_eq!(first(".5"), TokenKind::Number(0.5));
    }

    #[test]
    fn test_range_dots_not_consumed() {
        let tokens = tokenize("1..5").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Number(1.0));
        assert_eq!(tokens[1].kind, TokenKind::DotDot);
        assert_eq!(tokens[2].kind, TokenKind::Number(5.0));
    }

    #[test]
    fn test_lone_dot_is_an_error() {
        assert!(tokenize("7 .").is_err());
    }
}
