//! Pattern parsing for destructuring declarations and `when ... matches`.

use berd_lex::{Keyword, TokenKind};
use berd_util::Result;

use crate::ast::*;
use crate::Parser;

impl Parser {
    /// Parses a pattern: a binding name, a literal, an array pattern, or an
    /// object pattern.
    pub(crate) fn parse_pattern(&mut self) -> Result<Pattern> {
        let span = self.span();
        match self.kind().clone() {
            TokenKind::LBracket => self.parse_array_pattern(),
            TokenKind::LBrace => self.parse_object_pattern(),
            TokenKind::Number(n) => {
                self.advance();
                Ok(Pattern {
                    kind: PatternKind::Literal(Expr::new(ExprKind::Number(n), span)),
                    span,
                })
            }
            TokenKind::Minus => {
                self.advance();
                let inner = self.span();
                match self.kind().clone() {
                    TokenKind::Number(n) => {
                        self.advance();
                        let span = span.to(inner);
                        Ok(Pattern {
                            kind: PatternKind::Literal(Expr::new(ExprKind::Number(-n), span)),
                            span,
                        })
                    }
                    other => Err(self.error(format!(
                        "expected number after '-' in pattern, found {}",
                        other.describe()
                    ))),
                }
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Pattern {
                    kind: PatternKind::Literal(Expr::new(ExprKind::Str(s), span)),
                    span,
                })
            }
            TokenKind::Kw(Keyword::True) => {
                self.advance();
                Ok(Pattern {
                    kind: PatternKind::Literal(Expr::new(ExprKind::Bool(BoolLit::True), span)),
                    span,
                })
            }
            TokenKind::Kw(Keyword::False) => {
                self.advance();
                Ok(Pattern {
                    kind: PatternKind::Literal(Expr::new(ExprKind::Bool(BoolLit::False), span)),
                    span,
                })
            }
            TokenKind::Kw(Keyword::Maybe) => {
                self.advance();
                Ok(Pattern {
                    kind: PatternKind::Literal(Expr::new(ExprKind::Bool(BoolLit::Maybe), span)),
                    span,
                })
            }
            TokenKind::Kw(Keyword::Undefined) => {
                self.advance();
                Ok(Pattern {
                    kind: PatternKind::Literal(Expr::new(ExprKind::Undefined, span)),
                    span,
                })
            }
            _ => {
                let (name, span) = self.parse_name("pattern")?;
                Ok(Pattern {
                    kind: PatternKind::Binding(name),
                    span,
                })
            }
        }
    }

    /// `[p, p = default, ...rest]`
    fn parse_array_pattern(&mut self) -> Result<Pattern> {
        let start = self.span();
        self.advance(); // [
        let mut elements = Vec::new();
        let mut rest = None;
        loop {
            if matches!(self.kind(), TokenKind::RBracket) || self.at_end() {
                break;
            }
            if self.eat(&TokenKind::DotDotDot) {
                let (name, _) = self.parse_name("rest binding")?;
                rest = Some(name);
                break;
            }
            let pattern = self.parse_pattern()?;
            let default = if self.eat(&TokenKind::Assign) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            elements.push(PatternElem { pattern, default });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        let close = self.expect(&TokenKind::RBracket, "to close array pattern")?;
        Ok(Pattern {
            kind: PatternKind::Array { elements, rest },
            span: start.to(close.span),
        })
    }

    /// `{name, name: alias, name = default}`
    fn parse_object_pattern(&mut self) -> Result<Pattern> {
        let start = self.span();
        self.advance(); // {
        let mut fields = Vec::new();
        loop {
            if matches!(self.kind(), TokenKind::RBrace) || self.at_end() {
                break;
            }
            let (name, _) = self.parse_name("field name")?;
            let binding = if matches!(self.kind(), TokenKind::Colon(1)) {
                self.advance();
                let (alias, _) = self.parse_name("field alias")?;
                alias
            } else {
                name
            };
            let default = if self.eat(&TokenKind::Assign) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            fields.push(FieldPattern {
                name,
                binding,
                default,
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        let close = self.expect(&TokenKind::RBrace, "to close object pattern")?;
        Ok(Pattern {
            kind: PatternKind::Object { fields },
            span: start.to(close.span),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one_pattern(source: &str) -> Pattern {
        let mut parser = Parser::new(berd_lex::tokenize(source).unwrap());
        parser.parse_pattern().expect("pattern parse failure")
    }

    #[test]
    fn test_binding() {
        assert!(matches!(
            parse_one_pattern("x").kind,
            PatternKind::Binding(_)
        ));
    }

    #[test]
    fn test_literal_patterns() {
        assert!(matches!(
            parse_one_pattern("42").kind,
            PatternKind::Literal(Expr {
                kind: ExprKind::Number(n),
                ..
            }) if n == 42.0
        ));
        assert!(matches!(
            parse_one_pattern("-3").kind,
            PatternKind::Literal(Expr {
                kind: ExprKind::Number(n),
                ..
            }) if n == -3.0
        ));
        assert!(matches!(
            parse_one_pattern("maybe").kind,
            PatternKind::Literal(Expr {
                kind: ExprKind::Bool(BoolLit::Maybe),
                ..
            })
        ));
    }

    #[test]
    fn test_array_pattern_with_default_and_rest() {
        match parse_one_pattern("[a, b = 2, ...rest]").kind {
            PatternKind::Array { elements, rest } => {
                assert_eq!(elements.len(), 2);
                assert!(elements[0].default.is_none());
                assert!(elements[1].default.is_some());
                assert_eq!(rest.unwrap().as_str(), "rest");
            }
            other => panic!("expected array pattern, got {other:?}"),
        }
    }

    #[test]
    fn test_object_pattern_forms() {
        match parse_one_pattern("{x, y: alias, z = 0}").kind {
            PatternKind::Object { fields } => {
                assert_eq!(fields.len(), 3);
                assert_eq!(fields[0].name, fields[0].binding);
                assert_eq!(fields[1].binding.as_str(), "alias");
                assert!(fields[2].default.is_some());
            }
            other => panic!("expected object pattern, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_array_pattern() {
        match parse_one_pattern("[[a, b], c]").kind {
            PatternKind::Array { elements, .. } => {
                assert!(matches!(
                    elements[0].pattern.kind,
                    PatternKind::Array { .. }
                ));
            }
            other => panic!("expected array pattern, got {other:?}"),
        }
    }
}
