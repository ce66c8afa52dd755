//! String literal lexing with flexible quoting.
//!
//! A string opens with any run of one quote character (`"` or `'`) and
//! closes at the next run of the same character that is at least as long;
//! exactly the opening length is consumed, so `''x''` and `"x"` are the
//! same string. An even-length quote run with no closer on the line reads
//! as an empty string split into open and close halves, which is what makes
//! the plain `""` work.

use berd_util::Result;

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a string literal starting at the current quote character.
    pub(crate) fn lex_string(&mut self) -> Result<Token> {
        let quote = self.cursor.current_char();
        let open = self.cursor.eat_run(quote);
        let content_start = self.cursor.position();

        let mut content = String::new();
        loop {
            let c = self.cursor.current_char();

            if self.cursor.is_at_end() || c == '\n' {
                // No closing run on this line. An even opening run can be
                // re-read as open + close around an empty string.
                if open % 2 == 0 {
                    self.cursor.set_position(content_start);
                    return Ok(self.token(TokenKind::Str(String::new())));
                }
                return Err(self.error("unterminated string literal"));
            }

            if c == quote {
                let run_start = self.cursor.position();
                let run = self.cursor.eat_run(quote);
                if run >= open {
                    // Consume exactly the opening run; any excess quotes
                    // belong to whatever comes next.
                    self.cursor.set_position(run_start + open * quote.len_utf8());
                    return Ok(self.token(TokenKind::Str(content)));
                }
                for _ in 0..run {
                    content.push(quote);
                }
                continue;
            }

            if c == '\\' {
                self.cursor.advance();
                let escaped = self.cursor.current_char();
                if self.cursor.is_at_end() {
                    return Err(self.error("unterminated string literal"));
                }
                content.push(match escaped {
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    other => other,
                });
                self.cursor.advance();
                continue;
            }

            content.push(c);
            self.cursor.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{tokenize, TokenKind};

    fn string(source: &str) -> String {
        let tokens = tokenize(source).unwrap();
        match tokens.into_iter().next().unwrap().kind {
            TokenKind::Str(s) => s,
            other => panic!("expected string, got {other:?}"),
        }
    }

    #[test]
    fn test_double_and_single_quotes() {
        assert_eq!(string("\"hello\""), "hello");
        assert_eq!(string("'hello'"), "hello");
    }

    #[test]
    fn test_multi_quote_delimiters() {
        assert_eq!(string("''hello''"), "hello");
        assert_eq!(string("\"\"\"hi\"\"\""), "hi");
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(string("\"\""), "");
        assert_eq!(string("''''"), "");
    }

    #[test]
    fn test_inner_quotes_shorter_than_opener() {
        assert_eq!(string("''it's fine''"), "it's fine");
    }

    #[test]
    fn test_escapes() {
        assert_eq!(string(r#""a\nb\tc""#), "a\nb\tc");
        assert_eq!(string(r#""say \"hi\"""#), "say \"hi\"");
        assert_eq!(string(r#""back\\slash""#), "back\\slash");
    }

    #[test]
    fn test_unknown_escape_passes_through() {
        assert_eq!(string(r#""\q""#), "q");
    }

    #[test]
    fn test_unterminated_is_fatal() {
        assert!(tokenize("\"oops").is_err());
        assert!(tokenize("'''unclosed").is_err());
    }

    #[test]
    fn test_string_then_more_tokens() {
        let tokens = tokenize("'a' 'b'").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Str("a".into()));
        assert_eq!(tokens[1].kind, TokenKind::Str("b".into()));
    }
}
