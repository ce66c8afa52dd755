//! Property-based tests for the lexer.

use berd_lex::{tokenize, TokenKind};
use proptest::prelude::*;

proptest! {
    /// The lexer must never panic, whatever bytes it is fed.
    #[test]
    fn lexing_never_panics(source in "\\PC*") {
        let _ = tokenize(&source);
    }

    /// Token spans are non-overlapping and ordered, and every span lies
    /// inside the source. This is what the whitespace-weighted precedence
    /// machinery in the parser relies on.
    #[test]
    fn spans_are_monotonic(source in "[ a-z0-9+*=!?:~<>,()\\[\\]{}\"'\\\\-]{0,80}") {
        if let Ok(tokens) = tokenize(&source) {
            let mut last_end = 0;
            for token in &tokens {
                prop_assert!(token.span.start >= last_end);
                prop_assert!(token.span.end >= token.span.start);
                prop_assert!(token.span.end <= source.len());
                last_end = token.span.end;
            }
            prop_assert_eq!(&tokens.last().unwrap().kind, &TokenKind::Eof);
        }
    }

    /// Plain ASCII identifiers always round-trip through the interner.
    #[test]
    fn identifiers_round_trip(name in "[a-z_][a-z0-9_]{0,12}") {
        prop_assume!(berd_lex::Keyword::from_lexeme(&name).is_none());
        let tokens = tokenize(&name).unwrap();
        match &tokens[0].kind {
            TokenKind::Ident(sym) => prop_assert_eq!(sym.as_str(), name),
            other => prop_assert!(false, "expected identifier, got {:?}", other),
        }
    }

    /// Numbers survive lexing with their value intact.
    #[test]
    fn numbers_round_trip(int in 0u32..1_000_000, frac in 0u32..1000) {
        let source = format!("{int}.{frac:03}");
        let expected: f64 = source.parse().unwrap();
        let tokens = tokenize(&source).unwrap();
        prop_assert_eq!(&tokens[0].kind, &TokenKind::Number(expected));
    }
}
