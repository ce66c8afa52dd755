//! Identifier and keyword lexing.
//!
//! Identifiers are any run of Unicode letters, digits, underscores, `@`,
//! or emoji. Keywords are carved out of the identifier space by lexeme; the
//! parser decides where a keyword may still act as a plain name.

use berd_util::Symbol;

use crate::token::{Keyword, Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes an identifier or keyword starting at the current character.
    pub(crate) fn lex_identifier(&mut self) -> Token {
        self.cursor.advance_while(is_ident_continue);
        let text = self
            .cursor
            .slice(self.token_start, self.cursor.position());
        match Keyword::from_lexeme(text) {
            Some(kw) => self.token(TokenKind::Kw(kw)),
            None => self.token(TokenKind::Ident(Symbol::intern(text))),
        }
    }
}

/// Returns true if `c` can start an identifier.
pub fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '@' || is_emoji(c)
}

/// Returns true if `c` can continue an identifier.
pub fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_numeric()
}

/// Rough emoji detection over the common emoji blocks.
///
/// Precision does not matter much here: anything matched simply becomes part
/// of a name. The operator code points used by the language (`⌊`, `▷`, `↻`,
/// …) all live below these ranges and stay operators.
fn is_emoji(c: char) -> bool {
    matches!(u32::from(c),
        0x1F000..=0x1FAFF   // Mahjong .. Symbols and Pictographs Extended-A
        | 0x2600..=0x27BF   // Miscellaneous Symbols, Dingbats
        | 0x2B00..=0x2BFF   // Miscellaneous Symbols and Arrows
        | 0xFE0F            // variation selector used by emoji sequences
        | 0x200D            // zero-width joiner
    )
}

#[cfg(test)]
mod tests {
    use crate::{tokenize, TokenKind};
    use berd_util::Symbol;

    fn single_ident(source: &str) -> Symbol {
        let tokens = tokenize(source).unwrap();
        match &tokens[0].kind {
            TokenKind::Ident(sym) => *sym,
            other => panic!("expected identifier, got {other:?}"),
        }
    }

    #[test]
    fn test_ascii_identifier() {
        assert_eq!(single_ident("score_2"), Symbol::intern("score_2"));
    }

    #[test]
    fn test_unicode_identifier() {
        assert_eq!(single_ident("imię"), Symbol::intern("imię"));
    }

    #[test]
    fn test_emoji_identifier() {
        assert_eq!(single_ident("🦆"), Symbol::intern("🦆"));
        assert_eq!(single_ident("x🦆y"), Symbol::intern("x🦆y"));
    }

    #[test]
    fn test_keyword_not_identifier() {
        let tokens = tokenize("maybe").unwrap();
        assert!(matches!(tokens[0].kind, TokenKind::Kw(_)));
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(single_ident("whenever"), Symbol::intern("whenever"));
    }

    #[test]
    fn test_digits_cannot_start() {
        let tokens = tokenize("2x").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Number(2.0));
        assert_eq!(tokens[1].kind, TokenKind::Ident(Symbol::intern("x")));
    }
}
